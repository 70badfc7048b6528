pub mod domain;
pub mod favorites;
pub mod ports;
pub mod relay;

pub use domain::{itinerary_lines, FavoriteEntry, ItineraryRequest, ItineraryResult, StructuredFields};
pub use favorites::{FavoritesPolicy, FavoritesStore, MemorySlot, FAVORITES_KEY};
pub use ports::{
    FavoritesSlot, PortError, PortResult, ProviderError, ProviderErrorKind, ProviderResult,
    TextGenerationProvider, NO_ITINERARY_RETURNED,
};
pub use relay::ItineraryRelay;
