use super::{Answer, LLMError, LLM};
use crate::config::LLMConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Gemini provider implementation
pub struct GeminiProvider {
    config: LLMConfig,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    usage_metadata: Option<GeminiUsage>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiUsage {
    #[serde(rename = "totalTokenCount")]
    total_token_count: Option<u32>,
}

impl GeminiRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

impl GeminiResponse {
    /// candidates[0].content.parts[0].text
    fn answer_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }

    fn into_answer(self) -> Answer {
        let tokens_used = self
            .usage_metadata
            .as_ref()
            .and_then(|u| u.total_token_count);
        Answer::new(self.answer_text(), tokens_used)
    }
}

impl GeminiProvider {
    pub fn new(config: LLMConfig) -> Result<Self, LLMError> {
        let api_key = match config.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key.to_string(),
            _ => return Err(LLMError::Configuration("Gemini API key required".to_string())),
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            config,
            api_key,
            client,
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Upstream error body as JSON, or as a JSON string when it is not JSON
    fn error_details(body: String) -> serde_json::Value {
        match serde_json::from_str(&body) {
            Ok(details) => details,
            Err(_) => serde_json::Value::String(body),
        }
    }
}

#[async_trait]
impl LLM for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<Answer, LLMError> {
        let request = GeminiRequest::from_prompt(prompt);

        debug!("Sending request to Gemini API ({} prompt chars)", prompt.len());

        let response = self
            .client
            .post(self.generate_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!("Gemini API error {}: {}", status, text);
            return Err(LLMError::Upstream {
                status: status.as_u16(),
                details: Self::error_details(text),
            });
        }

        let body = response.text().await?;
        let gemini_response: GeminiResponse = serde_json::from_str(&body).unwrap_or_else(|e| {
            warn!("Unexpected Gemini response shape: {}", e);
            GeminiResponse::default()
        });

        let answer = gemini_response.into_answer();
        if answer.is_sentinel() {
            warn!("Gemini response had no answer text");
        }
        debug!("Gemini answered ({:?} tokens)", answer.tokens_used);

        Ok(answer)
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
