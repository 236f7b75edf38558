pub mod providers;

use async_trait::async_trait;

use crate::config::LLMConfig;

pub use providers::GeminiProvider;

/// Answer text used when the model reply has no usable text
pub const NO_RESPONSE_SENTINEL: &str = "No response from AI.";

/// Error types for answer generation
#[derive(thiserror::Error, Debug)]
pub enum LLMError {
    /// The API answered with a non-success status
    #[error("LLM API rejected request with status {status}")]
    Upstream {
        status: u16,
        details: serde_json::Value,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Answer produced by the model
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub text: String,
    pub tokens_used: Option<u32>,
}

impl Answer {
    pub fn new(text: Option<&str>, tokens_used: Option<u32>) -> Self {
        let text = text
            .filter(|t| !t.is_empty())
            .unwrap_or(NO_RESPONSE_SENTINEL)
            .to_string();

        Self { text, tokens_used }
    }

    pub fn is_sentinel(&self) -> bool {
        self.text == NO_RESPONSE_SENTINEL
    }
}

/// Trait for LLM providers
#[async_trait]
pub trait LLM: Send + Sync {
    /// Send one prompt, single attempt
    async fn generate(&self, prompt: &str) -> Result<Answer, LLMError>;
    fn model(&self) -> &str;
}

/// Create LLM instance based on configuration
pub fn create_llm(config: &LLMConfig) -> Result<Box<dyn LLM>, LLMError> {
    Ok(Box::new(GeminiProvider::new(config.clone())?))
}
