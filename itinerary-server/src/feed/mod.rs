//! Itinerary feed decoding.
//!
//! A feed file is an airline search response holding any number of priced
//! itineraries. [`ItineraryReader`] streams them out one at a time.

mod error;
mod reader;

pub use error::{FeedError, RecordError};
pub use reader::ItineraryReader;
