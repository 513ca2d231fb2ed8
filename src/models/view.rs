// src/models/view.rs

//! Payloads returned by the screens.

use serde::Serialize;

use super::{comment::Comment, listing::SortMode, post::Post, tag::Tag};
use crate::utils::time::display_timestamp;

/// Shown instead of any screen while the data service is not configured.
pub const SETUP_MESSAGE: &str = "The forum is not connected to its data service yet. \
Set SUPABASE_URL and SUPABASE_ANON_KEY (in the environment or a .env file) \
and restart the server.";

pub const NO_POSTS_MESSAGE: &str = "No posts found.";

pub const NO_COMMENTS_MESSAGE: &str = "No comments yet.";

/// Envelope of every screen: either the static setup view or the screen's
/// own payload.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Screen<T> {
    SetupRequired {
        message: &'static str,
        back: &'static str,
    },
    Ready(T),
}

impl<T> Screen<T> {
    pub fn setup_required() -> Self {
        Screen::SetupRequired {
            message: SETUP_MESSAGE,
            back: "/",
        }
    }
}

/// Outcome of one fetch whose failure should not take the whole screen
/// down. The pending state is the request still in flight.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Section<T> {
    Loaded { data: T },
    Failed { message: &'static str },
}

/// One line of the listing.
#[derive(Debug, Serialize)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub created_at: String,
    pub upvotes: i64,
    pub tag: Option<Tag>,
    pub link: String,
}

impl From<&Post> for PostSummary {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            created_at: display_timestamp(post.created_at),
            upvotes: post.upvotes,
            tag: post.tag,
            link: format!("/post/{}", post.id),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListingView {
    pub sort: SortMode,
    pub search: String,
    pub tag: String,
    pub posts: Vec<PostSummary>,
    /// Set when nothing survives the filters.
    pub message: Option<&'static str>,
}

/// Full post as shown on the detail screen.
#[derive(Debug, Serialize)]
pub struct PostView {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub tag: Option<Tag>,
    pub upvotes: i64,
    pub created_at: String,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content.unwrap_or_default(),
            image_url: post.image_url.filter(|url| !url.is_empty()),
            tag: post.tag,
            upvotes: post.upvotes,
            created_at: display_timestamp(post.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: i64,
    pub content: String,
    pub created_at: String,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content,
            created_at: display_timestamp(comment.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DetailView {
    pub post: PostView,
    pub comments: Section<Vec<CommentView>>,
    /// Set when the comments loaded and there are none.
    pub comments_message: Option<&'static str>,
}

impl DetailView {
    pub fn new(post: PostView, comments: Section<Vec<CommentView>>) -> Self {
        let comments_message = match &comments {
            Section::Loaded { data } if data.is_empty() => Some(NO_COMMENTS_MESSAGE),
            _ => None,
        };
        Self {
            post,
            comments,
            comments_message,
        }
    }
}

/// Field description for client-side form rendering.
#[derive(Debug, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: &'static str,
    pub required: bool,
}

#[derive(Debug, Serialize)]
pub struct CreateFormView {
    pub fields: Vec<FormField>,
    pub tags: Vec<&'static str>,
}

/// Current values loaded into the edit form.
#[derive(Debug, Serialize)]
pub struct EditFormView {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub tag: String,
    pub tags: Vec<&'static str>,
}

impl From<Post> for EditFormView {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content.unwrap_or_default(),
            image_url: post.image_url.unwrap_or_default(),
            tag: post.tag.map(|t| t.as_str().to_string()).unwrap_or_default(),
            tags: tag_names(),
        }
    }
}

pub fn tag_names() -> Vec<&'static str> {
    Tag::ALL.iter().map(Tag::as_str).collect()
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: i64,
    pub redirect: &'static str,
}

/// Result of a moderation or save action: what to tell the user and where
/// to go next.
#[derive(Debug, Default, Serialize)]
pub struct ActionOutcome {
    pub done: bool,
    pub alert: Option<&'static str>,
    pub warning: Option<&'static str>,
    pub redirect: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn setup_envelope_is_tagged() {
        let screen: Screen<ListingView> = Screen::setup_required();
        let value = serde_json::to_value(&screen).unwrap();
        assert_eq!(value["status"], json!("setup_required"));
        assert_eq!(value["message"], json!(SETUP_MESSAGE));
    }

    #[test]
    fn ready_envelope_flattens_payload() {
        let screen = Screen::Ready(Created { id: 3, redirect: "/" });
        let value = serde_json::to_value(&screen).unwrap();
        assert_eq!(value, json!({ "status": "ready", "id": 3, "redirect": "/" }));
    }

    fn post_view() -> PostView {
        PostView {
            id: 1,
            title: "t".to_string(),
            content: String::new(),
            image_url: None,
            tag: None,
            upvotes: 0,
            created_at: String::new(),
        }
    }

    #[test]
    fn empty_comment_list_gets_a_message() {
        let view = DetailView::new(post_view(), Section::Loaded { data: Vec::new() });
        assert_eq!(view.comments_message, Some(NO_COMMENTS_MESSAGE));

        let view = DetailView::new(
            post_view(),
            Section::Loaded {
                data: vec![CommentView {
                    id: 1,
                    content: "amen".to_string(),
                    created_at: String::new(),
                }],
            },
        );
        assert_eq!(view.comments_message, None);

        let view = DetailView::new(
            post_view(),
            Section::Failed {
                message: "Comments could not be loaded.",
            },
        );
        assert_eq!(view.comments_message, None);
    }

    #[test]
    fn failed_section_carries_only_a_message() {
        let section: Section<Vec<CommentView>> = Section::Failed {
            message: "Comments could not be loaded.",
        };
        assert_eq!(
            serde_json::to_value(&section).unwrap(),
            json!({ "status": "failed", "message": "Comments could not be loaded." })
        );
    }
}
