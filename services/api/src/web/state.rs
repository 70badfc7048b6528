//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use itinerary_core::relay::ItineraryRelay;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
///
/// Everything in here is read-only after startup; requests share no mutable state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub relay: ItineraryRelay,
}
