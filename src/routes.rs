// src/routes.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{create, detail, edit, listing},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Four screens: `/`, `/create`, `/post/{id}`, `/edit/{id}`.
/// * Detail screen actions live under `/post/{id}/...`.
/// * Applies global middleware (Trace, CORS) and the upload size limit.
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
        HeaderValue::from_static("http://localhost:5173"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE]);

    let post_routes = Router::new()
        .route("/{id}", get(detail::get_post))
        .route("/{id}/upvote", post(detail::upvote))
        .route("/{id}/comments", post(detail::add_comment))
        .route("/{id}/edit", post(detail::unlock_edit))
        .route("/{id}/delete", post(detail::delete_post));

    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(listing::list_posts))
        .route(
            "/create",
            get(create::create_form)
                .post(create::create_post)
                .layer(DefaultBodyLimit::max(upload_limit)),
        )
        .nest("/post", post_routes)
        .route(
            "/edit/{id}",
            get(edit::edit_form)
                .put(edit::update_post)
                .post(edit::update_post),
        )
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
