//! Itineraries and their flight segments.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use super::{AirportCode, ChargeType, FlightTime, Pricing, RateType};

/// Store-assigned itinerary identifier.
///
/// Identifiers are random, never derived from content, so two identical
/// feed records still get distinct ids.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ItineraryId(Uuid);

impl ItineraryId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItineraryId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ItineraryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl fmt::Debug for ItineraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItineraryId({})", self.0)
    }
}

impl fmt::Display for ItineraryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A single flight within an itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// Marketing carrier name, e.g. "China Southern Airlines".
    pub carrier: String,
    /// Carrier code from the `id` attribute, e.g. "CZ".
    pub carrier_id: Option<String>,
    pub flight_number: String,
    pub source: AirportCode,
    pub destination: AirportCode,
    pub departure: FlightTime,
    pub arrival: FlightTime,
    /// Booking class letter.
    pub class: String,
    /// `None` when the feed gives something other than a count.
    pub number_of_stops: Option<u32>,
    pub fare_basis: Option<String>,
    pub warning_text: Option<String>,
    pub ticket_type: String,
}

impl Segment {
    /// Time in the air for this flight.
    pub fn duration(&self) -> Duration {
        self.arrival - self.departure
    }
}

/// One priced trip option.
///
/// Durations are recomputed from the segments on every call; nothing
/// derived is cached on the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Itinerary {
    /// Assigned once, by the store, at insertion.
    pub id: Option<ItineraryId>,
    pub onward: Vec<Segment>,
    #[serde(rename = "return")]
    pub return_segments: Vec<Segment>,
    pub pricing: Option<Pricing>,
}

impl Itinerary {
    /// Origin of the first onward flight and destination of the last one.
    ///
    /// Returns `None` for an itinerary with no onward flights, which cannot
    /// be filed under any route.
    pub fn route(&self) -> Option<(AirportCode, AirportCode)> {
        let first = self.onward.first()?;
        let last = self.onward.last()?;
        Some((first.source.clone(), last.destination.clone()))
    }

    /// Cost of the first matching charge, or zero.
    pub fn price(&self, charge_type: &ChargeType, rate_type: &RateType) -> Decimal {
        self.pricing
            .as_ref()
            .and_then(|p| p.find(charge_type, rate_type))
            .unwrap_or(Decimal::ZERO)
    }

    /// The single-adult total used by every ranking criterion.
    pub fn total_price(&self) -> Decimal {
        self.price(&ChargeType::TotalAmount, &RateType::SingleAdult)
    }

    /// First departure to last arrival, transfers included.
    pub fn total_duration(&self) -> Duration {
        match (self.onward.first(), self.onward.last()) {
            (Some(first), Some(last)) => last.arrival - first.departure,
            _ => Duration::zero(),
        }
    }

    /// Sum of time in the air over the onward flights.
    pub fn flight_duration(&self) -> Duration {
        self.onward
            .iter()
            .fold(Duration::zero(), |acc, s| acc + s.duration())
    }

    /// Sum of ground time between consecutive onward flights.
    pub fn transfer_duration(&self) -> Duration {
        self.onward
            .windows(2)
            .fold(Duration::zero(), |acc, pair| {
                acc + (pair[1].departure - pair[0].arrival)
            })
    }
}
