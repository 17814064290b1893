//! Application-wide error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use leshan_core::CoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A request body that does not decode.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("AI service error: {0}")]
    Ai(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Core(CoreError::Busy) => StatusCode::CONFLICT,
            Self::Core(CoreError::EntityNotFound(_) | CoreError::MomentNotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            Self::Core(_) | Self::BadRequest(_) | Self::Json(_) => StatusCode::BAD_REQUEST,
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::Http(_) | Self::Ai(_) => StatusCode::BAD_GATEWAY,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
