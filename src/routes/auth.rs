use crate::{auth, config::Config, db::Db, errors::ApiError, store};
use crate::models::user::PublicUser;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterReq {
    pub username: String,
    pub email: String,
    pub password: String,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

pub async fn register(
    cfg: web::Data<Config>,
    db: web::Data<Db>,
    body: web::Json<RegisterReq>,
) -> Result<HttpResponse, ApiError> {
    if body.username.is_empty() || body.email.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest("all fields required".into()));
    }

    // Hashing is CPU-bound, keep it off the worker thread.
    let password = body.password.clone();
    let hash = web::block(move || auth::hash_password(&password))
        .await
        .map_err(|_| ApiError::Internal)??;

    let user = store::users::create(
        &db,
        &body.username,
        &body.email,
        &hash,
        body.bio.as_deref().unwrap_or(""),
        body.avatar_url.as_deref().unwrap_or(""),
    )
    .await?;

    let token = auth::create_session_token(&user.id, &cfg)?;
    Ok(HttpResponse::Created()
        .cookie(auth::session_cookie(token))
        .json(serde_json::json!({
            "message": "Registered",
            "user": PublicUser::from(user),
        })))
}

#[derive(Deserialize)]
pub struct LoginReq {
    pub email: String,
    pub password: String,
}

pub async fn login(
    cfg: web::Data<Config>,
    db: web::Data<Db>,
    body: web::Json<LoginReq>,
) -> Result<HttpResponse, ApiError> {
    if body.email.is_empty() || body.password.is_empty() {
        return Err(ApiError::BadRequest("all fields required".into()));
    }

    let user = store::users::find_by_email(&db, &body.email).await?;
    let Some(user) = user else {
        // burn the same hashing cost as a real verification so the
        // response does not reveal whether the email exists
        let password = body.password.clone();
        let _ = web::block(move || auth::hash_password(&password)).await;
        return Err(ApiError::BadRequest("invalid credentials".into()));
    };

    let password = body.password.clone();
    let hash = user.password_hash.clone();
    let ok = web::block(move || auth::verify_password(&hash, &password))
        .await
        .map_err(|_| ApiError::Internal)?;
    if !ok {
        return Err(ApiError::BadRequest("invalid credentials".into()));
    }

    let token = auth::create_session_token(&user.id, &cfg)?;
    Ok(HttpResponse::Ok()
        .cookie(auth::session_cookie(token))
        .json(serde_json::json!({
            "message": "Logged in",
            "user": PublicUser::from(user),
        })))
}

pub async fn logout() -> HttpResponse {
    HttpResponse::Ok()
        .cookie(auth::clear_session_cookie())
        .json(serde_json::json!({ "message": "Logged out" }))
}
