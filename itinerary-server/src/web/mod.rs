//! Web layer for the itinerary server.
//!
//! Read-only JSON endpoints over the store: route search, itinerary
//! comparison and a health check.

mod diff;
mod dto;
mod routes;
mod state;

pub use diff::{Difference, diff};
pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
