use crate::{auth::AuthUser, db::Db, errors::ApiError, store};
use actix_web::{HttpResponse, web};
use serde::Deserialize;

pub const MAX_LEN: usize = 280;

fn validate_text(text: &str, what: &str) -> Result<(), ApiError> {
    let len = text.chars().count();
    if len == 0 || len > MAX_LEN {
        return Err(ApiError::BadRequest(format!("invalid {what}")));
    }
    Ok(())
}

// The mutation is committed before the read-back; a failure to expand is
// a display problem, not a failed write.
async fn read_back(db: &Db, post_id: &str) -> Result<crate::models::post::PostView, ApiError> {
    store::posts::find_view(db, post_id)
        .await?
        .ok_or(ApiError::Internal)
}

/// Checks the post exists and the caller wrote it, in that order, so a
/// missing post is 404 and somebody else's post is 403.
async fn require_owner(db: &Db, post_id: &str, user_id: &str) -> Result<(), ApiError> {
    let author = store::posts::author_of(db, post_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    if author != user_id {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}

#[derive(Deserialize)]
pub struct CreatePostReq {
    pub content: String,
}

pub async fn create_post(
    db: web::Data<Db>,
    user: AuthUser,
    body: web::Json<CreatePostReq>,
) -> Result<HttpResponse, ApiError> {
    validate_text(&body.content, "content")?;
    let post_id = store::posts::create(&db, &user.user_id, &body.content).await?;
    let view = read_back(&db, &post_id).await?;
    Ok(HttpResponse::Created().json(view))
}

pub async fn feed(db: web::Data<Db>) -> Result<HttpResponse, ApiError> {
    let posts = store::posts::list_recent(&db, store::posts::FEED_LIMIT).await?;
    Ok(HttpResponse::Ok().json(posts))
}

pub async fn my_posts(db: web::Data<Db>, user: AuthUser) -> Result<HttpResponse, ApiError> {
    let posts = store::posts::list_by_author(&db, &user.user_id).await?;
    Ok(HttpResponse::Ok().json(posts))
}

pub async fn edit_post(
    db: web::Data<Db>,
    user: AuthUser,
    path: web::Path<String>,
    body: web::Json<CreatePostReq>,
) -> Result<HttpResponse, ApiError> {
    let post_id = path.into_inner();
    validate_text(&body.content, "content")?;
    require_owner(&db, &post_id, &user.user_id).await?;
    store::posts::update_content(&db, &post_id, &body.content).await?;
    let view = read_back(&db, &post_id).await?;
    Ok(HttpResponse::Ok().json(view))
}

pub async fn delete_post(
    db: web::Data<Db>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let post_id = path.into_inner();
    require_owner(&db, &post_id, &user.user_id).await?;
    store::posts::delete(&db, &post_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "message": "Deleted" })))
}

pub async fn toggle_like(
    db: web::Data<Db>,
    user: AuthUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let post_id = path.into_inner();
    // a delete racing this check makes the write fail as a store error;
    // store failures are terminal, not retried
    store::posts::author_of(&db, &post_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    store::posts::toggle_like(&db, &post_id, &user.user_id).await?;
    let view = read_back(&db, &post_id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[derive(Deserialize)]
pub struct CommentReq {
    pub text: String,
}

pub async fn add_comment(
    db: web::Data<Db>,
    user: AuthUser,
    path: web::Path<String>,
    body: web::Json<CommentReq>,
) -> Result<HttpResponse, ApiError> {
    let post_id = path.into_inner();
    validate_text(&body.text, "comment")?;
    store::posts::author_of(&db, &post_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    store::posts::append_comment(&db, &post_id, &user.user_id, &body.text).await?;
    let view = read_back(&db, &post_id).await?;
    Ok(HttpResponse::Created().json(view))
}
