use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Pre-flight rejection of a batch. Raised before any network call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Nothing survived the kind's minimum-field filter.
    NoValidRecords {
        /// What the caller has to supply for this kind.
        hint: &'static str,
    },
    /// More records survived than a single call accepts.
    BatchTooLarge { len: usize, max: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NoValidRecords { hint } => {
                write!(f, "no valid records: {}", hint)
            }
            ValidationError::BatchTooLarge { len, max } => write!(
                f,
                "batch too large: {} names supplied, a maximum of {} is allowed per request",
                len, max
            ),
        }
    }
}

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// The batch was rejected before dispatch.
    Validation(ValidationError),
    /// Non-2xx answer or network failure reported by the transport.
    Transport(String),
    /// Bad request error (unknown operation, unreadable body).
    BadRequest(String),
    /// The Namsor account rejected the configured API key.
    Unauthorized(String),
    /// Internal server error.
    InternalError(String),
}

impl AppError {
    /// Returns the validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            AppError::Validation(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(e) => write!(f, "Validation error: {}", e),
            AppError::Transport(msg) => write!(f, "Transport error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Validation and transport messages are returned verbatim, so the
    /// caller sees Namsor's own status and error text. Internal failures are
    /// logged and reported generically.
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::Validation(e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            AppError::Transport(msg) => {
                tracing::error!("Namsor transport error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Unauthorized(msg) => {
                tracing::warn!("Credential check rejected: {}", msg);
                (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err)
    }
}
