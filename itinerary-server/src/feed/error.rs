//! Feed decoding error types.

use std::io;
use std::path::PathBuf;

/// Errors produced while reading a feed file.
///
/// Only [`FeedError::Record`] leaves the reader usable; every other variant
/// ends the file.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    /// The file could not be opened
    #[error("failed to open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    /// The XML stream itself is broken (bad syntax, I/O failure mid-read)
    #[error("malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The document ended in the middle of an itinerary
    #[error("document ended inside itinerary #{0}")]
    Truncated(usize),

    /// One itinerary could not be decoded; the next one may still be fine
    #[error("itinerary #{index} skipped: {reason}")]
    Record { index: usize, reason: RecordError },
}

impl FeedError {
    /// Whether reading can carry on with the next record.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, FeedError::Record { .. })
    }
}

/// Why a single itinerary element was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// A flight lacks a field we can't do without
    #[error("flight is missing <{0}>")]
    MissingField(&'static str),

    /// Charge cost is not a decimal number
    #[error("bad cost {0:?}")]
    InvalidCost(String),

    /// Text or attribute content could not be unescaped
    #[error("unreadable content: {0}")]
    Content(String),
}
