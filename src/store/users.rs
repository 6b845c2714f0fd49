use crate::db::Db;
use crate::errors::ApiError;
use crate::models::user::User;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

const USER_COLS: &str = "id, username, email, password_hash, bio, avatar_url, created_at";

fn user_from_row(row: &SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        bio: row.get("bio"),
        avatar_url: row.get("avatar_url"),
        created_at: row.get("created_at"),
    }
}

/// Inserts a new user. Email uniqueness is enforced by the store at write
/// time; a violation surfaces as `DuplicateEmail`.
pub async fn create(
    db: &Db,
    username: &str,
    email: &str,
    password_hash: &str,
    bio: &str,
    avatar_url: &str,
) -> Result<User, ApiError> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now();

    let res = sqlx::query(
        "INSERT INTO users(id, username, email, password_hash, bio, avatar_url, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(bio)
    .bind(avatar_url)
    .bind(now)
    .execute(&db.0)
    .await;

    if let Err(e) = res {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.message().contains("UNIQUE") {
                return Err(ApiError::DuplicateEmail);
            }
        }
        return Err(e.into());
    }

    Ok(User {
        id,
        username: username.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        bio: bio.to_string(),
        avatar_url: avatar_url.to_string(),
        created_at: now,
    })
}

// Includes the password hash; only the login path should read this.
pub async fn find_by_email(db: &Db, email: &str) -> Result<Option<User>, ApiError> {
    let row = sqlx::query(&format!("SELECT {USER_COLS} FROM users WHERE email = ?"))
        .bind(email)
        .fetch_optional(&db.0)
        .await?;
    Ok(row.as_ref().map(user_from_row))
}

pub async fn find_by_id(db: &Db, id: &str) -> Result<Option<User>, ApiError> {
    let row = sqlx::query(&format!("SELECT {USER_COLS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(&db.0)
        .await?;
    Ok(row.as_ref().map(user_from_row))
}

/// Partial profile update; absent fields keep their current value.
pub async fn update(
    db: &Db,
    id: &str,
    username: Option<&str>,
    bio: Option<&str>,
    avatar_url: Option<&str>,
) -> Result<User, ApiError> {
    let res = sqlx::query(
        "UPDATE users SET username = COALESCE(?, username), bio = COALESCE(?, bio), avatar_url = COALESCE(?, avatar_url) WHERE id = ?",
    )
    .bind(username)
    .bind(bio)
    .bind(avatar_url)
    .bind(id)
    .execute(&db.0)
    .await?;

    if res.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }
    find_by_id(db, id).await?.ok_or(ApiError::NotFound)
}
