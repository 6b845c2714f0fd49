use serde::Serialize;
use chrono::{DateTime, Utc};

/// Full user record as stored. The password hash stays internal; nothing
/// serialized to a client includes it.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub bio: String,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
}

/// What register/login/profile-update hand back.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub avatar_url: String,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            bio: u.bio,
            avatar_url: u.avatar_url,
        }
    }
}

/// GET /api/profile payload: the record minus the hash.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUser {
    pub id: String,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for ProfileUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            bio: u.bio,
            avatar_url: u.avatar_url,
            created_at: u.created_at,
        }
    }
}
