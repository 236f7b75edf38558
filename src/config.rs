use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

use crate::{Error, Result};

/// Configuration for the YouTube Gemini Backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener settings
    pub server: ServerConfig,

    /// Gemini API settings
    pub llm: LLMConfig,

    /// Caption retrieval settings
    pub transcript: TranscriptConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

/// Gemini API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LLMConfig {
    /// API key, sent as the `key` query parameter
    pub api_key: Option<String>,

    /// Base URL of the generative-language API
    pub endpoint: String,

    /// Model to use
    pub model: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Base URL of the timedtext caption endpoint
    pub base_url: String,

    /// Caption language requested for both tracks
    pub language: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-pro".to_string(),
            timeout_seconds: 60,
        }
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.youtube.com/api/timedtext".to_string(),
            language: "en".to_string(),
            timeout_seconds: 15,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            llm: LLMConfig::default(),
            transcript: TranscriptConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file (explicit path or well-known locations),
    /// then apply environment overrides
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match explicit_path {
            Some(path) => Self::from_file(path)?,
            None => Self::discover(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)?;
        let config = toml::from_str(&config_str)?;
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    fn discover() -> Self {
        let config_paths = [
            "youtube-gemini-backend.toml",
            "config/youtube-gemini-backend.toml",
        ];

        for path in &config_paths {
            let path = Path::new(path);
            if !path.exists() {
                continue;
            }
            match Self::from_file(path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!("Failed to parse config file {}: {}", path.display(), e),
            }
        }

        Self::default()
    }

    /// Override fields from environment-style variables
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = lookup("GEMINI_API_KEY") {
            self.llm.api_key = Some(api_key);
        }

        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
            }
        }

        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }

        if let Some(model) = lookup("GEMINI_MODEL") {
            self.llm.model = model;
        }

        if let Some(endpoint) = lookup("GEMINI_ENDPOINT") {
            self.llm.endpoint = endpoint;
        }

        if let Some(base_url) = lookup("TRANSCRIPT_BASE_URL") {
            self.transcript.base_url = base_url;
        }

        if let Some(language) = lookup("TRANSCRIPT_LANGUAGE") {
            self.transcript.language = language;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        match self.llm.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {}
            _ => {
                return Err(Error::Configuration(
                    "GEMINI_API_KEY must be set".to_string(),
                ))
            }
        }

        if self.server.port == 0 {
            return Err(Error::Configuration("port must be greater than 0".to_string()));
        }

        if self.llm.model.trim().is_empty() {
            return Err(Error::Configuration("model must not be empty".to_string()));
        }

        Url::parse(&self.llm.endpoint)?;
        Url::parse(&self.transcript.base_url)?;

        tracing::info!("✅ Configuration validation passed");
        Ok(())
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "YouTube Gemini Backend Configuration:\n\
            - Listen: {}\n\
            - Model: {}\n\
            - Gemini Endpoint: {}\n\
            - Caption Source: {}\n\
            - Caption Language: {}",
            self.bind_address(),
            self.llm.model,
            self.llm.endpoint,
            self.transcript.base_url,
            self.transcript.language,
        )
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    pub fn with_host(mut self, host: String) -> Self {
        self.config.server.host = host;
        self
    }

    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.config.llm.api_key = Some(api_key);
        self
    }

    pub fn with_llm_endpoint(mut self, endpoint: String) -> Self {
        self.config.llm.endpoint = endpoint;
        self
    }

    pub fn with_model(mut self, model: String) -> Self {
        self.config.llm.model = model;
        self
    }

    pub fn with_transcript_base_url(mut self, base_url: String) -> Self {
        self.config.transcript.base_url = base_url;
        self
    }

    pub fn with_language(mut self, language: String) -> Self {
        self.config.transcript.language = language;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
