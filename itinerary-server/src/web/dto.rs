//! Data transfer objects for web requests and responses.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Itinerary, ItineraryId};

use super::diff::Difference;

/// Query for `/v1/search`.
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// Origin airport code, any case
    #[serde(default)]
    pub source: String,

    /// Destination airport code, any case
    #[serde(default)]
    pub destination: String,

    /// Selection name; absent means "list them all"
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Query for `/v1/compare`.
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub ticket1: String,

    #[serde(default)]
    pub ticket2: String,
}

/// An itinerary as returned to clients, with derived figures alongside.
#[derive(Debug, Serialize)]
pub struct ItineraryView<'a> {
    #[serde(flatten)]
    pub itinerary: &'a Itinerary,

    /// Single-adult total
    pub total_price: Decimal,

    pub total_duration_mins: i64,
    pub flight_duration_mins: i64,
    pub transfer_duration_mins: i64,
}

impl<'a> ItineraryView<'a> {
    pub fn new(itinerary: &'a Itinerary) -> Self {
        Self {
            itinerary,
            total_price: itinerary.total_price(),
            total_duration_mins: itinerary.total_duration().num_minutes(),
            flight_duration_mins: itinerary.flight_duration().num_minutes(),
            transfer_duration_mins: itinerary.transfer_duration().num_minutes(),
        }
    }
}

/// Response for `/v1/compare`.
#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub ticket1: ItineraryId,
    pub ticket2: ItineraryId,

    /// Empty when the two itineraries match field for field
    pub differences: Vec<Difference>,
}

/// Response for `/healthz`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: &'static str,

    /// Itineraries currently loaded
    pub itineraries: usize,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
