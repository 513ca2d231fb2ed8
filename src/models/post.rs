use serde::{Deserialize, Serialize};
use validator::Validate;

use super::tag::{self, Tag};
use crate::utils::validation::validate_not_blank;

/// Represents the 'posts' table of the remote store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "tag::deserialize_stored")]
    pub tag: Option<Tag>,

    /// Shared secret chosen at creation, compared verbatim to unlock edit
    /// and delete. Never sent back to clients.
    #[serde(default, skip_serializing)]
    pub secret_key: Option<String>,

    #[serde(default)]
    pub upvotes: i64,

    #[serde(default, deserialize_with = "crate::utils::time::deserialize_timestamp")]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Post {
    /// Verbatim comparison; a missing answer never matches.
    pub fn secret_matches(&self, attempt: Option<&str>) -> bool {
        match attempt {
            Some(attempt) => self.secret_key.as_deref().unwrap_or_default() == attempt,
            None => false,
        }
    }
}

/// Row sent to the store when a post is created.
#[derive(Debug, Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub tag: Option<Tag>,
    pub secret_key: String,
}

/// Columns the edit screen may change.
#[derive(Debug, Serialize)]
pub struct PostPatch {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub tag: Option<Tag>,
}

#[derive(Debug, Serialize)]
pub struct UpvotePatch {
    pub upvotes: i64,
}

/// Image attached to the creation form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: bytes::Bytes,
}

/// Creation form as submitted.
#[derive(Debug, Default, Validate)]
pub struct CreatePostForm {
    #[validate(custom(function = validate_not_blank, message = "Post title is required."))]
    pub title: String,
    pub content: String,
    pub tag: Option<Tag>,
    pub secret_key: String,
    pub image: Option<ImageUpload>,
}

impl CreatePostForm {
    pub fn into_row(self, image_url: Option<String>) -> NewPost {
        NewPost {
            title: self.title,
            content: self.content,
            image_url,
            tag: self.tag,
            secret_key: self.secret_key,
        }
    }
}

/// DTO for the edit screen's save action.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(custom(function = validate_not_blank, message = "Post title is required."))]
    pub title: String,

    #[serde(default)]
    pub content: String,

    /// Plain text field stored as typed; blank clears the image.
    #[serde(default)]
    pub image_url: String,

    #[serde(default)]
    pub tag: String,
}

/// Body of the edit gate.
#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    pub secret_key: Option<String>,
}

/// Body of the delete action.
#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub secret_key: Option<String>,

    /// Explicit confirmation; without it nothing is deleted.
    #[serde(default)]
    pub confirm: bool,
}
