//! Flight timestamps.
//!
//! Feed files carry departure and arrival times in a compact
//! `YYYY-MM-DDTHHMM` form with no zone. A value that does not parse is not
//! an error: the segment keeps the zero timestamp instead, and durations
//! computed from it are wrong but defined.

use std::fmt;
use std::ops::Sub;

use chrono::{Duration, NaiveDateTime};
use serde::{Serialize, Serializer};

/// `chrono` format string for feed timestamps.
pub const FEED_TIME_FORMAT: &str = "%Y-%m-%dT%H%M";

/// A local departure or arrival time as given by the feed.
///
/// # Examples
///
/// ```
/// use itinerary_server::domain::FlightTime;
///
/// let dep = FlightTime::parse_lenient("2018-10-27T0100");
/// let arr = FlightTime::parse_lenient("2018-10-27T1200");
/// assert_eq!((arr - dep).num_hours(), 11);
///
/// // Garbage yields the zero timestamp rather than an error
/// assert!(FlightTime::parse_lenient("27/10/2018 01:00").is_zero());
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlightTime(NaiveDateTime);

impl FlightTime {
    /// The zero timestamp (UNIX epoch) used for unparsable input.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Wrap an already-parsed date-time.
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    /// Parse a strict `YYYY-MM-DDTHHMM` value.
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(s.trim(), FEED_TIME_FORMAT)
            .ok()
            .map(Self)
    }

    /// Parse a feed value, falling back to [`FlightTime::zero`].
    pub fn parse_lenient(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Whether this is the zero timestamp.
    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// Returns the underlying date-time.
    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl Sub for FlightTime {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        self.0.signed_duration_since(rhs.0)
    }
}

impl fmt::Debug for FlightTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FlightTime({})", self)
    }
}

impl fmt::Display for FlightTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(FEED_TIME_FORMAT))
    }
}

impl Serialize for FlightTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
