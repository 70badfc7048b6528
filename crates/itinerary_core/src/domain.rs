//! crates/itinerary_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any transport or storage format, except
//! for `FavoriteEntry`, whose JSON shape is the persisted favorites format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ports::{ProviderError, ProviderResult};

/// The trip details collected by the structured itinerary form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredFields {
    pub destination: String,
    pub days: u32,
    pub interests: String,
}

impl StructuredFields {
    /// All three fields are filled in and the trip lasts at least one day.
    pub fn is_complete(&self) -> bool {
        self.days > 0 && !self.destination.trim().is_empty() && !self.interests.trim().is_empty()
    }

    /// Composes the natural-language prompt sent to the provider.
    pub fn derive_prompt(&self) -> String {
        format!(
            "Create a {}-day itinerary for a trip to {} focusing on {}.",
            self.days,
            self.destination.trim(),
            self.interests.trim()
        )
    }
}

/// A single request for an itinerary, either free-form or structured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItineraryRequest {
    pub prompt: Option<String>,
    pub structured_fields: Option<StructuredFields>,
}

impl ItineraryRequest {
    pub fn from_prompt(prompt: impl Into<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            structured_fields: None,
        }
    }

    pub fn from_fields(fields: StructuredFields) -> Self {
        Self {
            prompt: None,
            structured_fields: Some(fields),
        }
    }

    /// Resolves the prompt that will be forwarded to the provider.
    ///
    /// Complete structured fields take precedence over a free-form prompt.
    /// Incomplete structured fields fall back to the prompt; if that is also
    /// missing or blank the request is rejected with a validation error.
    pub fn resolve_prompt(&self) -> ProviderResult<String> {
        if let Some(fields) = self.structured_fields.as_ref().filter(|f| f.is_complete()) {
            return Ok(fields.derive_prompt());
        }

        match self.prompt.as_deref().map(str::trim) {
            Some(prompt) if !prompt.is_empty() => Ok(prompt.to_string()),
            _ => Err(ProviderError::validation(
                "A prompt or a destination, number of days and interests are required.",
            )),
        }
    }
}

/// The normalized outcome of one successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItineraryResult {
    pub text: String,
    pub generated_at: DateTime<Utc>,
}

impl ItineraryResult {
    pub fn new(text: String) -> Self {
        Self {
            text,
            generated_at: Utc::now(),
        }
    }

    /// The itinerary split into display lines.
    pub fn lines(&self) -> Vec<&str> {
        itinerary_lines(&self.text)
    }
}

/// Splits generated text into trimmed, non-empty lines for display or export.
pub fn itinerary_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// A user-saved itinerary.
///
/// `text` always holds the full itinerary as it was at save time; any
/// shortening for display happens in the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    pub id: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl FavoriteEntry {
    pub fn new(text: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            text,
            created_at: Utc::now(),
        }
    }
}
