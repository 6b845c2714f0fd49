pub mod auth;
pub mod health;
pub mod posts;
pub mod profile;

use actix_web::web;

/// Registers the whole API tree; shared between the server and the
/// service tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/register", web::post().to(auth::register))
            .route("/login", web::post().to(auth::login))
            .route("/logout", web::post().to(auth::logout))
            .route("/profile", web::get().to(profile::get_profile))
            .route("/profile", web::put().to(profile::update_profile))
            .route("/posts", web::get().to(posts::feed))
            .route("/posts", web::post().to(posts::create_post))
            .route("/my-posts", web::get().to(posts::my_posts))
            .route("/posts/{id}", web::put().to(posts::edit_post))
            .route("/posts/{id}", web::delete().to(posts::delete_post))
            .route("/posts/{id}/like", web::post().to(posts::toggle_like))
            .route("/posts/{id}/comment", web::post().to(posts::add_comment))
            .route("/health", web::get().to(health::health_check)),
    );
}
