use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    config::Config,
    error::AppError,
    models::{
        comment::{CreateCommentRequest, NewComment},
        post::{DeleteRequest, Post, UnlockRequest, UpvotePatch},
        view::{ActionOutcome, CommentView, DetailView, PostView, Screen, Section},
    },
    queries::{self, COMMENTS, POSTS},
    supabase::{DataAccess, DataClient, storage::object_path_from_public_url},
};

const INCORRECT_SECRET: &str = "Incorrect secret key.";

/// Post detail with its comments.
///
/// The post and the comment list are fetched concurrently; a failed comment
/// fetch is reported inside the view instead of failing the screen.
pub async fn get_post(
    State(data): State<DataAccess>,
    Path(id): Path<i64>,
) -> Result<Json<Screen<DetailView>>, AppError> {
    let Some(client) = data.client() else {
        return Ok(Json(Screen::setup_required()));
    };

    let (post, comments) = tokio::join!(
        queries::find_post(client, id),
        queries::list_comments(client, id)
    );

    let post = post
        .map_err(|e| AppError::upstream("Failed to load post.", e))?
        .ok_or_else(post_not_found)?;

    let comments = match comments {
        Ok(comments) => Section::Loaded {
            data: comments.into_iter().map(CommentView::from).collect(),
        },
        Err(e) => {
            tracing::error!("Failed to load comments for post {}: {}", id, e);
            Section::Failed {
                message: "Comments could not be loaded.",
            }
        }
    };

    Ok(Json(Screen::Ready(DetailView::new(PostView::from(post), comments))))
}

/// Add one upvote.
///
/// The response is the record the data service returned after the write,
/// not a locally incremented copy.
pub async fn upvote(
    State(data): State<DataAccess>,
    Path(id): Path<i64>,
) -> Result<Json<PostView>, AppError> {
    let client = data.client().ok_or(AppError::NotConfigured)?;
    let post = load_post(client, id).await?;

    let updated: Vec<Post> = client
        .from(POSTS)
        .eq("id", id)
        .update(&UpvotePatch {
            upvotes: post.upvotes + 1,
        })
        .await
        .map_err(|e| AppError::upstream("Failed to upvote post.", e))?;

    // Deleted between the read and the write.
    let post = updated.into_iter().next().ok_or_else(post_not_found)?;

    Ok(Json(PostView::from(post)))
}

/// Add a comment and return the refreshed list.
///
/// Blank comments are dropped silently with `204 No Content`.
pub async fn add_comment(
    State(data): State<DataAccess>,
    Path(id): Path<i64>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<Response, AppError> {
    let client = data.client().ok_or(AppError::NotConfigured)?;

    if payload.is_blank() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let row = NewComment {
        post_id: id,
        content: payload.content,
    };
    let _: Vec<serde_json::Value> = client
        .from(COMMENTS)
        .insert(&[row])
        .await
        .map_err(|e| AppError::upstream("Failed to add comment.", e))?;

    let comments = queries::list_comments(client, id)
        .await
        .map_err(|e| AppError::upstream("Failed to load comments.", e))?;

    let comments: Vec<CommentView> = comments.into_iter().map(CommentView::from).collect();
    Ok((StatusCode::CREATED, Json(comments)).into_response())
}

/// Edit gate: the right secret key yields the edit screen's path.
pub async fn unlock_edit(
    State(data): State<DataAccess>,
    Path(id): Path<i64>,
    Json(payload): Json<UnlockRequest>,
) -> Result<Json<ActionOutcome>, AppError> {
    let client = data.client().ok_or(AppError::NotConfigured)?;
    let post = load_post(client, id).await?;

    if !post.secret_matches(payload.secret_key.as_deref()) {
        tracing::info!(post_id = id, "Edit refused: wrong secret key");
        return Err(AppError::Forbidden(INCORRECT_SECRET.to_string()));
    }

    Ok(Json(ActionOutcome {
        done: true,
        redirect: Some(format!("/edit/{}", id)),
        ..ActionOutcome::default()
    }))
}

/// Delete a post after the secret key and an explicit confirmation.
///
/// The stored image is removed first. Losing that step only produces a
/// warning; the post is deleted regardless. Comments are left in place.
pub async fn delete_post(
    State(data): State<DataAccess>,
    State(config): State<Config>,
    Path(id): Path<i64>,
    Json(payload): Json<DeleteRequest>,
) -> Result<Json<ActionOutcome>, AppError> {
    let client = data.client().ok_or(AppError::NotConfigured)?;
    let post = load_post(client, id).await?;

    if !post.secret_matches(payload.secret_key.as_deref()) {
        tracing::info!(post_id = id, "Delete refused: wrong secret key");
        return Err(AppError::Forbidden(INCORRECT_SECRET.to_string()));
    }

    if !payload.confirm {
        return Ok(Json(ActionOutcome::default()));
    }

    let mut warning = None;
    if let Some(path) = post
        .image_url
        .as_deref()
        .and_then(|url| object_path_from_public_url(url, &config.image_bucket))
    {
        if let Err(e) = client.storage(&config.image_bucket).remove(&[path]).await {
            tracing::error!("Image delete failed for post {}: {}", id, e);
            warning = Some("Image could not be deleted, but the post will be removed.");
        }
    }

    client
        .from(POSTS)
        .eq("id", id)
        .delete()
        .await
        .map_err(|e| AppError::upstream("Failed to delete post.", e))?;

    tracing::info!(post_id = id, "Post deleted");

    Ok(Json(ActionOutcome {
        done: true,
        alert: Some("Post deleted."),
        warning,
        redirect: Some("/".to_string()),
    }))
}

async fn load_post(client: &DataClient, id: i64) -> Result<Post, AppError> {
    queries::find_post(client, id)
        .await
        .map_err(|e| AppError::upstream("Failed to load post.", e))?
        .ok_or_else(post_not_found)
}

fn post_not_found() -> AppError {
    AppError::NotFound("Post not found.".to_string())
}
