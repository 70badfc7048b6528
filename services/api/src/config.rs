//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_MODEL_ID: &str = "gpt-3.5-turbo";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful travel assistant.";
pub const DEFAULT_FAILURE_MESSAGE: &str = "Something went wrong. Try again.";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const HUGGING_FACE_BASE_URL: &str = "https://api-inference.huggingface.co";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which provider protocol the generation client speaks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderKind {
    /// Role-tagged chat completions (OpenAI style).
    Chat,
    /// A single `inputs` string (Hugging Face inference style).
    Raw,
}

impl ProviderKind {
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Chat => OPENAI_BASE_URL,
            Self::Raw => HUGGING_FACE_BASE_URL,
        }
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub api_key: Option<String>,
    pub model_id: String,
    pub provider: ProviderKind,
    pub provider_base_url: String,
    pub request_timeout: Duration,
    pub system_prompt: String,
    pub failure_message: String,
    pub allowed_origin: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        // --- Server Settings ---
        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let host = host
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidValue("HOST".to_string(), e.to_string()))?;
        let port = match var("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), e.to_string()))?,
            None => DEFAULT_PORT,
        };

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- Provider Settings ---
        let api_key = var("API_KEY").or_else(|| var("OPENAI_API_KEY"));
        let model_id = var("MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string());

        let provider = match var("PROVIDER").as_deref().map(str::to_lowercase).as_deref() {
            None | Some("chat") => ProviderKind::Chat,
            Some("raw") => ProviderKind::Raw,
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    "PROVIDER".to_string(),
                    format!("'{}' is not one of 'chat' or 'raw'", other),
                ))
            }
        };
        let provider_base_url = var("PROVIDER_BASE_URL")
            .unwrap_or_else(|| provider.default_base_url().to_string())
            .trim_end_matches('/')
            .to_string();

        let request_timeout = match var("REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidValue("REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(30),
        };

        // --- Presentation Settings ---
        let system_prompt = var("SYSTEM_PROMPT").unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());
        let failure_message =
            var("FAILURE_MESSAGE").unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());
        let allowed_origin = var("ALLOWED_ORIGIN");

        Ok(Self {
            bind_address: SocketAddr::new(host, port),
            log_level,
            api_key,
            model_id,
            provider,
            provider_base_url,
            request_timeout,
            system_prompt,
            failure_message,
            allowed_origin,
        })
    }

    /// The provider credential, which the server cannot start without.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar("API_KEY".to_string()))
    }
}
