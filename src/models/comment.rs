use serde::{Deserialize, Serialize};

/// Represents the 'comments' table of the remote store.
///
/// `post_id` is a plain foreign key; comments are looked up by an explicit
/// query on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "crate::utils::time::deserialize_timestamp")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Row sent to the store when a comment is added.
#[derive(Debug, Serialize)]
pub struct NewComment {
    pub post_id: i64,
    pub content: String,
}

/// DTO for adding a comment.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub content: String,
}

impl CreateCommentRequest {
    /// Whitespace-only comments are dropped without an error.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}
