//! API module for the YouTube Gemini Backend
//!
//! Exposes `POST /ask-gemini` plus welcome and health endpoints.

use anyhow::Result;

pub mod error;
pub mod handlers;
pub mod models;
pub mod server;

pub use error::ApiError;
pub use models::{AskRequest, AskResponse, ErrorResponse};
pub use server::{build_router, AppState};

/// API Server for handling REST requests
pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Start the API server, returning once it shuts down
    pub async fn start(self) -> Result<()> {
        server::start_http_server(self.state).await
    }
}
