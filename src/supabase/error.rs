// src/supabase/error.rs

/// Failures raised by the data-access client.
///
/// Never shown to end users; the screen layer logs these and replies with a
/// generic message.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("request to data service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("data service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected payload from data service: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid data service configuration: {0}")]
    InvalidConfig(String),

    #[error("data service unavailable: {0}")]
    Unavailable(String),
}

impl From<url::ParseError> for DataError {
    fn from(err: url::ParseError) -> Self {
        DataError::InvalidConfig(err.to_string())
    }
}
