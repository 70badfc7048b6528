//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::config::Config;
use crate::web::protocol::{ErrorResponse, ItineraryResponse, PromptPayload, TripFieldsPayload};
use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use itinerary_core::domain::ItineraryRequest;
use itinerary_core::ports::ProviderError;
use std::sync::Arc;
use tracing::warn;
use utoipa::OpenApi;

pub const HEALTH_MESSAGE: &str = "SmartTour API is running 🚀";

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        prompt_itinerary_handler,
        generate_itinerary_handler,
    ),
    components(
        schemas(PromptPayload, TripFieldsPayload, ItineraryResponse, ErrorResponse)
    ),
    tags(
        (name = "SmartTour API", description = "Relays itinerary prompts to a text-generation provider.")
    )
)]
pub struct ApiDoc;

type ErrorReply = (StatusCode, Json<ErrorResponse>);

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Liveness check.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "The service is up", body = String))
)]
pub async fn health_handler() -> &'static str {
    HEALTH_MESSAGE
}

/// Generate an itinerary from a free-form prompt.
#[utoipa::path(
    post,
    path = "/api/itinerary",
    request_body = PromptPayload,
    responses(
        (status = 200, description = "Itinerary generated", body = ItineraryResponse),
        (status = 400, description = "Missing or blank prompt", body = ErrorResponse),
        (status = 500, description = "The provider failed", body = ErrorResponse)
    )
)]
pub async fn prompt_itinerary_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<PromptPayload>, JsonRejection>,
) -> Result<Json<ItineraryResponse>, ErrorReply> {
    let Json(payload) = payload.map_err(bad_json)?;
    relay(&app_state, payload.into()).await
}

/// Generate an itinerary from destination, number of days and interests.
#[utoipa::path(
    post,
    path = "/generate-itinerary",
    request_body = TripFieldsPayload,
    responses(
        (status = 200, description = "Itinerary generated", body = ItineraryResponse),
        (status = 400, description = "Missing or invalid trip fields", body = ErrorResponse),
        (status = 500, description = "The provider failed", body = ErrorResponse)
    )
)]
pub async fn generate_itinerary_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<TripFieldsPayload>, JsonRejection>,
) -> Result<Json<ItineraryResponse>, ErrorReply> {
    let Json(payload) = payload.map_err(bad_json)?;
    relay(&app_state, payload.into()).await
}

//=========================================================================================
// Helpers
//=========================================================================================

async fn relay(
    app_state: &AppState,
    request: ItineraryRequest,
) -> Result<Json<ItineraryResponse>, ErrorReply> {
    match app_state.relay.handle(&request).await {
        Ok(result) => Ok(Json(ItineraryResponse {
            itinerary: result.text,
        })),
        Err(e) => Err(error_reply(&app_state.config, e)),
    }
}

fn bad_json(rejection: JsonRejection) -> ErrorReply {
    warn!("Rejected malformed request body: {}", rejection.body_text());
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: rejection.body_text(),
            details: None,
        }),
    )
}

/// Validation failures go back verbatim as 400s; everything else becomes a
/// 500 with the configured user-facing message and the provider detail.
pub fn error_reply(config: &Config, e: ProviderError) -> ErrorReply {
    if e.is_validation() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.message,
                details: None,
            }),
        );
    }
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: config.failure_message.clone(),
            details: Some(e.message),
        }),
    )
}
