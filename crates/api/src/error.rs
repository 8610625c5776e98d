//! API error types.

use fsupload_protocol::{RequestError, ValidationError};

/// Errors from the platform API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP error {status} {status_text}: {body}")]
    Http {
        status: u16,
        status_text: String,
        body: String,
    },

    #[error("GraphQL error: {}", render_errors(.errors))]
    GraphQl { errors: Vec<serde_json::Value> },

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("authentication failed: {status} - {status_text}")]
    Auth { status: u16, status_text: String },

    #[error("invalid header value for {0}")]
    InvalidHeader(&'static str),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn render_errors(errors: &[serde_json::Value]) -> String {
    serde_json::to_string(errors).unwrap_or_else(|_| format!("{errors:?}"))
}

impl From<RequestError> for ApiError {
    fn from(e: RequestError) -> Self {
        match e {
            RequestError::Validation(v) => ApiError::Validation(v),
            RequestError::Json(j) => ApiError::Json(j),
        }
    }
}
