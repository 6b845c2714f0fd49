use serde::Serialize;
use chrono::{DateTime, Utc};

/// Display projection for an author or commenter. Responses never carry a
/// bare user id where one of these fits.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserDisplay {
    pub id: String,
    pub username: String,
    pub avatar_url: String,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub user: UserDisplay,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Fully expanded post as served to clients: author and commenters joined
/// to their display projections, likes as the list of liker ids.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub author: UserDisplay,
    pub content: String,
    pub likes: Vec<String>,
    pub comments: Vec<CommentView>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
