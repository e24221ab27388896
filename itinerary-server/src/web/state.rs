//! Application state for the web layer.

use std::sync::Arc;

use crate::store::ItineraryStore;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Itineraries loaded at startup; read-only from the handlers' side
    pub store: Arc<dyn ItineraryStore>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(store: Arc<dyn ItineraryStore>) -> Self {
        Self { store }
    }
}
