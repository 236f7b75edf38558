//! YouTube Gemini Backend
//!
//! Answers questions about YouTube videos by pulling their captions and
//! relaying a composed prompt to the Gemini generative-language API.

pub mod api;
pub mod config;
pub mod llm;
pub mod prompt;
pub mod transcript;

// Re-export main types for easy access
pub use crate::api::{build_router, ApiServer, AppState};
pub use crate::config::{Config, ConfigBuilder};
pub use crate::llm::{create_llm, Answer, LLMError, LLM, NO_RESPONSE_SENTINEL};
pub use crate::prompt::compose_prompt;
pub use crate::transcript::{CaptionSource, Transcript, TranscriptFetcher};

/// Result type for crate-level operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for startup and configuration
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}
