// src/error.rs

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::{
    models::{tag::UnknownTag, view::SETUP_MESSAGE},
    supabase::DataError,
    utils::validation::first_message,
};

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request (validation)
    BadRequest(String),

    // 403 Forbidden (wrong secret key)
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 413 Payload Too Large (upload over the configured limit)
    PayloadTooLarge(String),

    // 503 Service Unavailable: no data service configured
    NotConfigured,

    // 502 Bad Gateway: the data service failed. Only `message` reaches the
    // user; `source` goes to the log.
    Upstream {
        message: &'static str,
        source: DataError,
    },
}

impl AppError {
    pub fn upstream(message: &'static str, source: DataError) -> Self {
        AppError::Upstream { message, source }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::NotConfigured => {
                (StatusCode::SERVICE_UNAVAILABLE, SETUP_MESSAGE.to_string())
            }
            AppError::Upstream { message, source } => {
                tracing::error!("{} cause: {}", message, source);
                (StatusCode::BAD_GATEWAY, message.to_string())
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::BadRequest(first_message(&errors))
    }
}

impl From<UnknownTag> for AppError {
    fn from(err: UnknownTag) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Keeps the status the multipart extractor chose, so a body over the
/// upload limit is a 413 rather than a plain bad request.
impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        match err.status() {
            StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(err.body_text()),
            _ => AppError::BadRequest(err.body_text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_hides_the_cause() {
        let response = AppError::upstream(
            "Failed to create post.",
            DataError::Unavailable("db on fire".to_string()),
        )
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn statuses_follow_variants() {
        assert_eq!(
            AppError::Forbidden("Incorrect secret key.".into()).into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::NotConfigured.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::NotFound("Post not found.".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::PayloadTooLarge("length limit exceeded".into())
                .into_response()
                .status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }
}
