use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use tracing::error;

use super::models::ErrorResponse;
use crate::llm::LLMError;

/// Failures of an API request, each mapped to one HTTP response
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("No question provided")]
    MissingQuestion,

    #[error("No YouTube video ID provided")]
    MissingVideoId,

    #[error("Invalid JSON body: {0}")]
    InvalidBody(String),

    #[error("Failed to get AI response")]
    Upstream {
        status: u16,
        details: serde_json::Value,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<LLMError> for ApiError {
    fn from(e: LLMError) -> Self {
        match e {
            LLMError::Upstream { status, details } => ApiError::Upstream { status, details },
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MissingQuestion => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("No question provided"),
            ),
            ApiError::MissingVideoId => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("No YouTube video ID provided"),
            ),
            ApiError::InvalidBody(_) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("Invalid JSON body"),
            ),
            ApiError::Upstream { status, details } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                ErrorResponse::new("Failed to get AI response").with_details(details),
            ),
            ApiError::Internal(message) => {
                error!("Internal error while handling request: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new("Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
