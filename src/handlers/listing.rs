use axum::{
    Json,
    extract::{Query, State},
};

use crate::{
    error::AppError,
    models::{
        listing::ListingParams,
        view::{ListingView, NO_POSTS_MESSAGE, PostSummary, Screen},
    },
    queries,
    supabase::DataAccess,
};

/// Home screen: every post, sorted server-side, filtered by title and tag.
///
/// Without a configured data service this returns the setup view and makes
/// no request.
pub async fn list_posts(
    State(data): State<DataAccess>,
    Query(params): Query<ListingParams>,
) -> Result<Json<Screen<ListingView>>, AppError> {
    let Some(client) = data.client() else {
        return Ok(Json(Screen::setup_required()));
    };

    let filter = params.filter();

    let posts = queries::list_posts(client, params.sort)
        .await
        .map_err(|e| AppError::upstream("Failed to load posts.", e))?;

    let posts: Vec<PostSummary> = filter.apply(&posts).into_iter().map(PostSummary::from).collect();
    let message = posts.is_empty().then_some(NO_POSTS_MESSAGE);

    Ok(Json(Screen::Ready(ListingView {
        sort: params.sort,
        search: params.q.unwrap_or_default(),
        tag: filter.tag.label().to_string(),
        posts,
        message,
    })))
}
