//! Itinerary storage and route-level selection.
//!
//! Itineraries are filed under the route they fly (first onward source to
//! last onward destination). Each route keeps five running selections that
//! are updated as itineraries arrive, so a "best" lookup never scans.

mod bucket;
mod memory;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::{AirportCode, Itinerary, ItineraryId};

pub use bucket::RouteBucket;
pub use memory::MemoryStore;

/// Ranking used to pick a single itinerary for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Criterion {
    Cheapest,
    MostExpensive,
    Shortest,
    Longest,
    /// Balance of value for money, price, time in the air and transfers.
    Optimal,
}

impl Criterion {
    pub const ALL: [Criterion; 5] = [
        Criterion::Cheapest,
        Criterion::MostExpensive,
        Criterion::Shortest,
        Criterion::Longest,
        Criterion::Optimal,
    ];

    /// Name as used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Cheapest => "cheapest",
            Criterion::MostExpensive => "mostExpensive",
            Criterion::Shortest => "shortest",
            Criterion::Longest => "longest",
            Criterion::Optimal => "optimal",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A criterion name that isn't one of the five.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown selection type {0:?}")]
pub struct UnknownCriterion(pub String);

impl FromStr for Criterion {
    type Err = UnknownCriterion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Criterion::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCriterion(s.to_string()))
    }
}

/// Error from store lookups.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No itinerary has this identifier
    #[error("itinerary {0} not found")]
    NotFound(ItineraryId),
}

/// Shared itinerary storage.
///
/// Writers and readers may call in from any thread; every operation sees
/// either all or none of a concurrent insert.
pub trait ItineraryStore: Send + Sync {
    /// File an itinerary under its route and assign it a fresh id.
    ///
    /// Itineraries without onward flights have no route; they are dropped
    /// and `None` is returned.
    fn insert(&self, itinerary: Itinerary) -> Option<ItineraryId>;

    /// Every itinerary for a route in insertion order; empty for an
    /// unknown route.
    fn itineraries(&self, source: &AirportCode, destination: &AirportCode) -> Vec<Arc<Itinerary>>;

    /// The current selection for a route, `None` for an unknown route.
    fn best(
        &self,
        criterion: Criterion,
        source: &AirportCode,
        destination: &AirportCode,
    ) -> Option<Arc<Itinerary>>;

    fn get(&self, id: ItineraryId) -> Result<Arc<Itinerary>, StoreError>;

    /// Number of stored itineraries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criterion_names_round_trip_through_from_str() {
        for criterion in Criterion::ALL {
            assert_eq!(criterion.as_str().parse::<Criterion>(), Ok(criterion));
        }
    }

    #[test]
    fn criterion_names_are_case_sensitive() {
        assert_eq!(
            "MostExpensive".parse::<Criterion>(),
            Err(UnknownCriterion("MostExpensive".into()))
        );
        assert!("".parse::<Criterion>().is_err());
    }

    #[test]
    fn criterion_serde_matches_query_names() {
        let json = serde_json::to_string(&Criterion::MostExpensive).unwrap();
        assert_eq!(json, "\"mostExpensive\"");
        let back: Criterion = serde_json::from_str("\"optimal\"").unwrap();
        assert_eq!(back, Criterion::Optimal);
    }
}
