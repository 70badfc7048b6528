//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser client and the API
//! server, and their conversion into core domain requests.

use itinerary_core::domain::{ItineraryRequest, StructuredFields};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

//=========================================================================================
// Payloads Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Body of `POST /api/itinerary`.
#[derive(Deserialize, Debug, ToSchema)]
pub struct PromptPayload {
    /// Free-form request, e.g. "A relaxed week in Lisbon with kids".
    #[serde(default)]
    pub prompt: Option<String>,
}

impl From<PromptPayload> for ItineraryRequest {
    fn from(payload: PromptPayload) -> Self {
        ItineraryRequest {
            prompt: payload.prompt,
            structured_fields: None,
        }
    }
}

/// Body of `POST /generate-itinerary`.
#[derive(Deserialize, Debug, ToSchema)]
pub struct TripFieldsPayload {
    #[serde(default)]
    pub destination: Option<String>,
    /// A positive number of days. Form inputs may send it as a string.
    #[serde(default)]
    #[schema(value_type = Option<u32>)]
    pub days: Option<DaysValue>,
    #[serde(default)]
    pub interests: Option<String>,
}

/// Number inputs arrive as JSON numbers or as their string form ("3").
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum DaysValue {
    Count(i64),
    Fraction(f64),
    Text(String),
}

impl DaysValue {
    /// The day count, or 0 when the value is not a positive integer.
    pub fn days(&self) -> u32 {
        let count = match self {
            Self::Count(count) => *count,
            Self::Fraction(value) => whole_days(*value),
            Self::Text(text) => {
                let text = text.trim();
                text.parse::<i64>()
                    .unwrap_or_else(|_| text.parse::<f64>().map(whole_days).unwrap_or(0))
            }
        };
        u32::try_from(count).unwrap_or(0)
    }
}

/// `3.0` counts as three days; `2.5`, NaN and out-of-range values count as none.
fn whole_days(value: f64) -> i64 {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= u32::MAX as f64 {
        value as i64
    } else {
        0
    }
}

impl From<TripFieldsPayload> for ItineraryRequest {
    fn from(payload: TripFieldsPayload) -> Self {
        ItineraryRequest::from_fields(StructuredFields {
            destination: payload.destination.unwrap_or_default(),
            days: payload.days.as_ref().map(DaysValue::days).unwrap_or(0),
            interests: payload.interests.unwrap_or_default(),
        })
    }
}

//=========================================================================================
// Payloads Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// A generated itinerary.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ItineraryResponse {
    pub itinerary: String,
}

/// Returned with every 4xx and 5xx status.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Provider detail, present on 5xx responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
