use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use cosmoscope_core::CoreError;

// ==============================================================================
// Error Type
// ==============================================================================

#[derive(Debug)]
pub(crate) enum AppError {
    BadRequest(String),
    NotFound(String),
    NotImplemented(String),
    BadGateway(String),
    Unavailable(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::NotImplemented(msg) => (StatusCode::NOT_IMPLEMENTED, msg),
            Self::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg),
            Self::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err.root() {
            CoreError::InvalidQuery(_) => Self::BadRequest(message),
            CoreError::ClientUnavailable => Self::Unavailable(message),
            CoreError::InvalidConfig(_) => Self::Internal(message),
            CoreError::Unsupported(_) => Self::NotImplemented(message),
            CoreError::Rpc(_) | CoreError::InvalidData(_) | CoreError::Transport { .. } => {
                Self::BadGateway(message)
            }
        }
    }
}
