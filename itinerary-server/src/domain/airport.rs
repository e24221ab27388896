//! Airport code types.

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

/// Error returned when a queried airport code is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid airport code: {reason}")]
pub struct InvalidAirport {
    reason: &'static str,
}

/// An airport code as the feed names it.
///
/// Feeds mostly carry 3-letter IATA codes, but anything else (ICAO codes,
/// city codes, odd casing) is kept rather than rejected. Codes are trimmed
/// and uppercased so that `dxb` and `DXB` land in the same route bucket.
///
/// # Examples
///
/// ```
/// use itinerary_server::domain::AirportCode;
///
/// assert_eq!(AirportCode::new("DXB").as_str(), "DXB");
/// assert_eq!(AirportCode::new(" omdb ").as_str(), "OMDB");
///
/// // Query input must look like a code
/// assert_eq!(AirportCode::parse_normalized(" bkk ").unwrap().as_str(), "BKK");
/// assert!(AirportCode::parse_normalized("New York").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AirportCode(Arc<str>);

impl AirportCode {
    /// Wrap feed text. Never fails; an empty code is kept as empty.
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s.trim().to_ascii_uppercase()))
    }

    /// Parse user input: surrounding whitespace is trimmed and letters are
    /// uppercased. The rest must be non-empty ASCII letters or digits.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidAirport> {
        let s = s.trim();

        if s.is_empty() {
            return Err(InvalidAirport {
                reason: "must not be empty",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidAirport {
                reason: "must be ASCII letters or digits",
            });
        }

        Ok(Self::new(s))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AirportCode({})", self.as_str())
    }
}

impl fmt::Display for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AirportCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
