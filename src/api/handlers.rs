//! API request handlers

use tracing::{debug, info, warn};

use super::error::ApiError;
use super::models::{AskRequest, AskResponse, HealthResponse, WelcomeResponse};
use super::server::AppState;
use crate::prompt::compose_prompt;
use crate::transcript::{normalize_video_id, Transcript};

/// Returns the value only if it has non-whitespace content
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Handle a question about a video: validate, fetch captions, ask the model
pub async fn ask(state: &AppState, request: AskRequest) -> Result<AskResponse, ApiError> {
    let question = non_blank(request.question).ok_or(ApiError::MissingQuestion)?;

    let transcript = match (non_blank(request.video_id), non_blank(request.transcript)) {
        (Some(video_id), _) => {
            let video_id = normalize_video_id(&video_id);
            info!("❓ Question for video {}", video_id);
            state.fetcher.fetch(&video_id).await
        }
        (None, Some(text)) => {
            warn!("Request supplied a raw transcript without videoId (deprecated)");
            Transcript::Found(text)
        }
        (None, None) => return Err(ApiError::MissingVideoId),
    };

    let prompt = compose_prompt(&transcript, &question);
    debug!(
        "Composed prompt ({} chars, transcript available: {})",
        prompt.len(),
        transcript.is_available()
    );

    let answer = state.llm.generate(&prompt).await?;

    Ok(AskResponse {
        answer: answer.text,
    })
}

/// Handle requests to the root path
pub fn welcome() -> WelcomeResponse {
    WelcomeResponse {
        message: "Welcome to the YouTube Gemini Backend API!".to_string(),
    }
}

/// Handle health check requests
pub fn health_check() -> HealthResponse {
    HealthResponse {
        status: "healthy".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("   ".to_string())), None);
        assert_eq!(non_blank(Some(" x ".to_string())), Some(" x ".to_string()));
    }

    #[test]
    fn test_health_check_reports_package() {
        let health = health_check();
        assert_eq!(health.status, "healthy");
        assert_eq!(health.service, "youtube-gemini-backend");
        assert!(chrono::DateTime::parse_from_rfc3339(&health.timestamp).is_ok());
    }
}
