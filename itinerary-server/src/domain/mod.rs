//! Domain types for flight itineraries.
//!
//! Values here are built by the feed reader and never mutated once the
//! store has them, apart from the identifier the store assigns on insert.

mod airport;
mod itinerary;
mod pricing;
mod time;

#[cfg(test)]
pub(crate) mod testing;

pub use airport::{AirportCode, InvalidAirport};
pub use itinerary::{Itinerary, ItineraryId, Segment};
pub use pricing::{Charge, ChargeType, Pricing, RateType};
pub use time::{FEED_TIME_FORMAT, FlightTime};
