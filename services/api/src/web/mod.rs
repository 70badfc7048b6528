pub mod protocol;
pub mod rest;
pub mod state;

pub use rest::{generate_itinerary_handler, health_handler, prompt_itinerary_handler};

use crate::config::Config;
use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use state::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Builds the API router with CORS applied.
pub fn router(app_state: Arc<AppState>) -> Router {
    let cors = cors_layer(&app_state.config);

    Router::new()
        .route("/", get(health_handler))
        .route("/api/itinerary", post(prompt_itinerary_handler))
        .route("/generate-itinerary", post(generate_itinerary_handler))
        .layer(cors)
        .with_state(app_state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    match config.allowed_origin.as_deref() {
        Some(origin) => match origin.parse::<HeaderValue>() {
            Ok(origin) => cors.allow_origin(origin),
            Err(_) => {
                warn!("ALLOWED_ORIGIN '{}' is not a valid header value; allowing any origin", origin);
                cors.allow_origin(Any)
            }
        },
        None => cors.allow_origin(Any),
    }
}
