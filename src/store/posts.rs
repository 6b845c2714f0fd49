use crate::db::Db;
use crate::errors::ApiError;
use crate::models::post::{CommentView, PostView, UserDisplay};
use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use std::collections::HashMap;

/// How many posts the public feed serves at most.
pub const FEED_LIMIT: i64 = 100;

const POST_COLS: &str = "p.id, p.content, p.created_at, p.updated_at, \
     u.id AS author_id, u.username AS author_name, u.avatar_url AS author_avatar";

pub async fn create(db: &Db, author_id: &str, content: &str) -> Result<String, ApiError> {
    let id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now();
    sqlx::query("INSERT INTO posts(id, author_id, content, created_at, updated_at) VALUES (?, ?, ?, ?, ?)")
        .bind(&id)
        .bind(author_id)
        .bind(content)
        .bind(now)
        .bind(now)
        .execute(&db.0)
        .await?;
    Ok(id)
}

pub async fn author_of(db: &Db, post_id: &str) -> Result<Option<String>, ApiError> {
    let row = sqlx::query("SELECT author_id FROM posts WHERE id = ?")
        .bind(post_id)
        .fetch_optional(&db.0)
        .await?;
    Ok(row.map(|r| r.get("author_id")))
}

pub async fn update_content(db: &Db, post_id: &str, content: &str) -> Result<(), ApiError> {
    let res = sqlx::query("UPDATE posts SET content = ?, updated_at = ? WHERE id = ?")
        .bind(content)
        .bind(Utc::now())
        .bind(post_id)
        .execute(&db.0)
        .await?;
    if res.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(())
}

// Likes and comments go with the post (ON DELETE CASCADE).
pub async fn delete(db: &Db, post_id: &str) -> Result<(), ApiError> {
    let res = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(post_id)
        .execute(&db.0)
        .await?;
    if res.rows_affected() == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(())
}

/// Adds the user's like if absent, removes it if present. Membership is
/// a presence check plus one row write, never a counter.
pub async fn toggle_like(db: &Db, post_id: &str, user_id: &str) -> Result<(), ApiError> {
    let existing = sqlx::query("SELECT 1 FROM post_likes WHERE post_id = ? AND user_id = ?")
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(&db.0)
        .await?;

    if existing.is_some() {
        sqlx::query("DELETE FROM post_likes WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .execute(&db.0)
            .await?;
    } else {
        sqlx::query("INSERT INTO post_likes(post_id, user_id, created_at) VALUES (?, ?, ?)")
            .bind(post_id)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&db.0)
            .await?;
    }
    Ok(())
}

pub async fn append_comment(
    db: &Db,
    post_id: &str,
    user_id: &str,
    text: &str,
) -> Result<(), ApiError> {
    sqlx::query("INSERT INTO post_comments(post_id, user_id, text, created_at) VALUES (?, ?, ?, ?)")
        .bind(post_id)
        .bind(user_id)
        .bind(text)
        .bind(Utc::now())
        .execute(&db.0)
        .await?;
    Ok(())
}

pub async fn find_view(db: &Db, post_id: &str) -> Result<Option<PostView>, ApiError> {
    let rows = sqlx::query(&format!(
        "SELECT {POST_COLS} FROM posts p INNER JOIN users u ON u.id = p.author_id WHERE p.id = ?"
    ))
    .bind(post_id)
    .fetch_all(&db.0)
    .await?;
    Ok(expand(db, rows).await?.into_iter().next())
}

pub async fn list_recent(db: &Db, limit: i64) -> Result<Vec<PostView>, ApiError> {
    let rows = sqlx::query(&format!(
        "SELECT {POST_COLS} FROM posts p INNER JOIN users u ON u.id = p.author_id \
         ORDER BY p.created_at DESC, p.rowid DESC LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(&db.0)
    .await?;
    expand(db, rows).await
}

pub async fn list_by_author(db: &Db, author_id: &str) -> Result<Vec<PostView>, ApiError> {
    let rows = sqlx::query(&format!(
        "SELECT {POST_COLS} FROM posts p INNER JOIN users u ON u.id = p.author_id \
         WHERE p.author_id = ? ORDER BY p.created_at DESC, p.rowid DESC"
    ))
    .bind(author_id)
    .fetch_all(&db.0)
    .await?;
    expand(db, rows).await
}

/// Turns base post rows into fully expanded views. Likes and comments for
/// the whole page are fetched in one query each and grouped by post.
async fn expand(db: &Db, rows: Vec<SqliteRow>) -> Result<Vec<PostView>, ApiError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let post_ids: Vec<String> = rows.iter().map(|r| r.get::<String, _>("id")).collect();
    let placeholders: String = post_ids.iter().map(|_| "?").collect::<Vec<_>>().join(",");

    let likes_sql = format!(
        "SELECT post_id, user_id FROM post_likes WHERE post_id IN ({placeholders}) ORDER BY created_at ASC"
    );
    let mut likes_q = sqlx::query(&likes_sql);
    for pid in &post_ids {
        likes_q = likes_q.bind(pid);
    }
    let like_rows = likes_q.fetch_all(&db.0).await?;
    let mut likes_map: HashMap<String, Vec<String>> = HashMap::new();
    for r in like_rows {
        let pid: String = r.get("post_id");
        likes_map.entry(pid).or_default().push(r.get("user_id"));
    }

    let comments_sql = format!(
        "SELECT c.post_id, c.text, c.created_at, u.id AS commenter_id, u.username, u.avatar_url \
         FROM post_comments c INNER JOIN users u ON u.id = c.user_id \
         WHERE c.post_id IN ({placeholders}) ORDER BY c.rowid ASC"
    );
    let mut comments_q = sqlx::query(&comments_sql);
    for pid in &post_ids {
        comments_q = comments_q.bind(pid);
    }
    let comment_rows = comments_q.fetch_all(&db.0).await?;
    let mut comments_map: HashMap<String, Vec<CommentView>> = HashMap::new();
    for r in comment_rows {
        let pid: String = r.get("post_id");
        comments_map.entry(pid).or_default().push(CommentView {
            user: UserDisplay {
                id: r.get("commenter_id"),
                username: r.get("username"),
                avatar_url: r.get("avatar_url"),
            },
            text: r.get("text"),
            created_at: r.get::<DateTime<Utc>, _>("created_at"),
        });
    }

    let views = rows
        .into_iter()
        .map(|r| {
            let id: String = r.get("id");
            let likes = likes_map.remove(&id).unwrap_or_default();
            let comments = comments_map.remove(&id).unwrap_or_default();
            PostView {
                author: UserDisplay {
                    id: r.get("author_id"),
                    username: r.get("author_name"),
                    avatar_url: r.get("author_avatar"),
                },
                content: r.get("content"),
                likes,
                comments,
                created_at: r.get("created_at"),
                updated_at: r.get("updated_at"),
                id,
            }
        })
        .collect();
    Ok(views)
}
