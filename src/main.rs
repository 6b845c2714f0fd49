mod auth;
mod config;
mod db;
mod errors;
mod models;
mod routes;
mod store;

use crate::config::Config;
use crate::db::Db;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::middleware::Logger;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use env_logger::Env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Init logger to show info by default, but can be overridden by RUST_LOG
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cfg = Config::load_or_die();

    let db = Db::connect_and_migrate(&cfg.database_path)
        .await
        .expect("database init failed");

    log::info!("Starting server at {}", cfg.listen);

    let listen_addr = cfg.listen.clone();
    HttpServer::new(move || {
        let cors = Cors::permissive()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
            .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(Data::new(cfg.clone()))
            .app_data(Data::new(db.clone()))
            .configure(routes::configure)
    })
    .bind(listen_addr)?
    .run()
    .await
}
