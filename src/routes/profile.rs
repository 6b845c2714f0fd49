use crate::{auth::AuthUser, db::Db, errors::ApiError, store};
use crate::models::user::{ProfileUser, PublicUser};
use actix_web::{HttpResponse, web};
use serde::Deserialize;

pub async fn get_profile(db: web::Data<Db>, user: AuthUser) -> Result<HttpResponse, ApiError> {
    let record = store::users::find_by_id(&db, &user.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(HttpResponse::Ok().json(ProfileUser::from(record)))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileReq {
    pub username: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

pub async fn update_profile(
    db: web::Data<Db>,
    user: AuthUser,
    body: web::Json<UpdateProfileReq>,
) -> Result<HttpResponse, ApiError> {
    if body.username.as_deref() == Some("") {
        return Err(ApiError::BadRequest("username must not be empty".into()));
    }
    let updated = store::users::update(
        &db,
        &user.user_id,
        body.username.as_deref(),
        body.bio.as_deref(),
        body.avatar_url.as_deref(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Profile updated",
        "user": PublicUser::from(updated),
    })))
}
