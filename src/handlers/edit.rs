use axum::{
    Json,
    extract::{Path, State},
};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        post::{Post, PostPatch, UpdatePostRequest},
        tag::Tag,
        view::{ActionOutcome, EditFormView, Screen},
    },
    queries::{self, POSTS},
    supabase::DataAccess,
};

/// Current values for the edit form.
///
/// Reachable by anyone who knows the id: the secret key is only asked for by
/// the detail screen's edit action.
pub async fn edit_form(
    State(data): State<DataAccess>,
    Path(id): Path<i64>,
) -> Result<Json<Screen<EditFormView>>, AppError> {
    let Some(client) = data.client() else {
        return Ok(Json(Screen::setup_required()));
    };

    let post = queries::find_post(client, id)
        .await
        .map_err(|e| AppError::upstream("Failed to load post.", e))?
        .ok_or(AppError::NotFound("Post not found.".to_string()))?;

    Ok(Json(Screen::Ready(EditFormView::from(post))))
}

/// Save title, content, image URL and tag.
pub async fn update_post(
    State(data): State<DataAccess>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<ActionOutcome>, AppError> {
    let client = data.client().ok_or(AppError::NotConfigured)?;

    payload.validate()?;
    let tag = Tag::parse_optional(&payload.tag)?;

    let image_url = Some(payload.image_url.trim().to_string()).filter(|url| !url.is_empty());
    let patch = PostPatch {
        title: payload.title,
        content: payload.content,
        image_url,
        tag,
    };

    let updated: Vec<Post> = client
        .from(POSTS)
        .eq("id", id)
        .update(&patch)
        .await
        .map_err(|e| AppError::upstream("Failed to update post.", e))?;

    if updated.is_empty() {
        return Err(AppError::NotFound("Post not found.".to_string()));
    }

    tracing::info!(post_id = id, "Post updated");

    Ok(Json(ActionOutcome {
        done: true,
        alert: Some("Post updated!"),
        warning: None,
        redirect: Some(format!("/post/{}", id)),
    }))
}
