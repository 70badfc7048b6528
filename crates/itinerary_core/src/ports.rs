//! crates/itinerary_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific providers or storage backends.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for the storage port and the favorites store.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Provider Errors
//=========================================================================================

/// The failure taxonomy of a generation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Bad or missing input; raised before any network call.
    Validation,
    RateLimited,
    /// The provider answered but the payload is unusable.
    InvalidResponse,
    /// The provider returned an explicit error payload.
    Upstream,
    Network,
    Timeout,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::RateLimited => "rate_limited",
            Self::InvalidResponse => "invalid_response",
            Self::Upstream => "upstream",
            Self::Network => "network",
            Self::Timeout => "timeout",
        };
        f.write_str(name)
    }
}

/// User-visible fallback when a provider answers without any itinerary text.
pub const NO_ITINERARY_RETURNED: &str = "No itinerary returned.";

/// A typed failure from the generation path.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    /// The provider payload that caused the failure, when there was one.
    pub raw: Option<Value>,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            raw: None,
        }
    }

    pub fn with_raw(mut self, raw: Value) -> Self {
        self.raw = Some(raw);
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Validation, message)
    }

    pub fn upstream(message: impl Into<String>, raw: Value) -> Self {
        Self::new(ProviderErrorKind::Upstream, message).with_raw(raw)
    }

    pub fn no_itinerary() -> Self {
        Self::new(ProviderErrorKind::InvalidResponse, NO_ITINERARY_RETURNED)
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ProviderErrorKind::Validation
    }
}

/// A convenience type alias for `Result<T, ProviderError>`.
pub type ProviderResult<T> = Result<T, ProviderError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait TextGenerationProvider: Send + Sync {
    /// Generates text for a prompt with exactly one outbound call.
    ///
    /// Implementations reject blank prompts with `Validation` before touching
    /// the network and never retry.
    async fn generate(&self, prompt: &str) -> ProviderResult<String>;
}

/// A durable key-value slot holding one serialized value per key.
pub trait FavoritesSlot {
    /// Returns the stored value, or `None` if nothing was written yet.
    fn read(&self, key: &str) -> PortResult<Option<String>>;

    /// Replaces the stored value in one step.
    fn write(&mut self, key: &str, value: &str) -> PortResult<()>;
}

/// Rejects prompts that are empty after trimming.
pub fn ensure_prompt(prompt: &str) -> ProviderResult<&str> {
    let trimmed = prompt.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::validation("Prompt must not be empty."));
    }
    Ok(trimmed)
}
