//! Flight itinerary server.
//!
//! Loads airline search responses from disk into an in-memory store,
//! indexed by route, and answers "what flies from A to B, and which option
//! is cheapest / fastest / best value?"

pub mod config;
pub mod domain;
pub mod feed;
pub mod ingest;
pub mod store;
pub mod web;
