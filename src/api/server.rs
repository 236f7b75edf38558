//! HTTP server implementation for the API

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use std::any::Any as PanicPayload;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use super::{
    error::ApiError,
    handlers,
    models::{AskRequest, ErrorResponse},
};
use crate::config::Config;
use crate::llm::{create_llm, LLM};
use crate::transcript::{TimedTextSource, TranscriptFetcher};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub fetcher: Arc<TranscriptFetcher>,
    pub llm: Arc<dyn LLM>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(fetcher: TranscriptFetcher, llm: Arc<dyn LLM>, config: Config) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            llm,
            config: Arc::new(config),
        }
    }

    /// Wire the production caption source and Gemini provider
    pub fn from_config(config: Config) -> Result<Self> {
        let source =
            TimedTextSource::new(&config.transcript.base_url, config.transcript.timeout_seconds)?;
        let fetcher = TranscriptFetcher::new(Box::new(source), config.transcript.language.clone());
        let llm: Arc<dyn LLM> = Arc::from(create_llm(&config.llm)?);

        Ok(Self::new(fetcher, llm, config))
    }
}

/// Build the application router with routes and middleware
pub fn build_router(app_state: AppState) -> Router {
    // Configure CORS to allow browser access
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(welcome_handler))
        .route("/health", get(health_handler))
        .route("/ask-gemini", post(ask_handler))
        .fallback(not_found_handler)
        .with_state(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CatchPanicLayer::custom(panic_response)),
        )
}

/// Turn a handler panic into the generic 500 body
fn panic_response(payload: Box<dyn PanicPayload + Send + 'static>) -> Response {
    let message = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!("Handler panicked: {}", message);

    ApiError::Internal(format!("handler panicked: {}", message)).into_response()
}

/// Configure and start the HTTP server
pub async fn start_http_server(app_state: AppState) -> Result<()> {
    let address = app_state.config.bind_address();
    info!("🚀 Starting HTTP server on {}", address);
    info!("🤖 Using model {}", app_state.llm.model());

    let app = build_router(app_state);

    // Bind and serve
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("🌐 API server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("🛑 Shutdown signal received, draining connections");
}

/// Welcome handler
async fn welcome_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(handlers::welcome()))
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(handlers::health_check()))
}

/// Read the ask body the way a JSON body parser would: a body that is not
/// declared as JSON, or is empty, reads as an empty request. Only malformed
/// JSON is rejected.
fn parse_ask_body(headers: &HeaderMap, body: &[u8]) -> Result<AskRequest, ApiError> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| {
            let mime = mime.trim().to_ascii_lowercase();
            mime == "application/json" || mime.ends_with("+json")
        })
        .unwrap_or(false);

    if !is_json || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AskRequest::default());
    }

    match serde_json::from_slice::<serde_json::Value>(body) {
        Ok(value) => Ok(AskRequest::from_json(&value)),
        Err(e) => {
            warn!("Rejected request body: {}", e);
            Err(ApiError::InvalidBody(e.to_string()))
        }
    }
}

/// Ask handler
async fn ask_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let request = match parse_ask_body(&headers, &body) {
        Ok(request) => request,
        Err(e) => return e.into_response(),
    };

    match handlers::ask(&state, request).await {
        Ok(data) => (StatusCode::OK, Json(data)).into_response(),
        Err(e) => e.into_response(),
    }
}

/// 404 response for unknown routes
async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Endpoint not found")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(content_type: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(content_type) = content_type {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        headers
    }

    #[test]
    fn test_non_json_bodies_read_as_empty_request() {
        for (content_type, body) in [
            (None, ""),
            (None, r#"{"question":"ignored"}"#),
            (Some("application/json"), ""),
            (Some("application/json"), "  \n"),
            (Some("text/plain"), "hello"),
        ] {
            let request = parse_ask_body(&headers_with(content_type), body.as_bytes()).unwrap();
            assert!(request.question.is_none(), "{:?} {:?}", content_type, body);
            assert!(request.video_id.is_none());
        }
    }

    #[test]
    fn test_json_body_with_charset_is_parsed() {
        let request = parse_ask_body(
            &headers_with(Some("application/json; charset=utf-8")),
            br#"{"question":"Q","videoId":"abc123"}"#,
        )
        .unwrap();
        assert_eq!(request.question.as_deref(), Some("Q"));
        assert_eq!(request.video_id.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let result = parse_ask_body(&headers_with(Some("application/json")), b"{not json");
        assert!(matches!(result, Err(ApiError::InvalidBody(_))));
    }

    #[test]
    fn test_panic_response_is_generic_500() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
