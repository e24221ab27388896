//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::domain::{AirportCode, ItineraryId};
use crate::store::{Criterion, StoreError};

use super::diff::diff;
use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/search", get(search))
        .route("/v1/compare", get(compare))
        .route("/healthz", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "I'm ok",
        itineraries: state.store.len(),
    })
}

/// Itineraries for a route: all of them, or the one a selection picks.
async fn search(
    State(state): State<AppState>,
    Query(req): Query<SearchRequest>,
) -> Result<Response, AppError> {
    let source = parse_airport("source", &req.source)?;
    let destination = parse_airport("destination", &req.destination)?;

    match req.kind.as_deref().filter(|kind| !kind.is_empty()) {
        None => {
            let itineraries = state.store.itineraries(&source, &destination);
            let views: Vec<ItineraryView> = itineraries
                .iter()
                .map(|itinerary| ItineraryView::new(itinerary))
                .collect();
            Ok(Json(views).into_response())
        }
        Some(kind) => {
            let criterion: Criterion = kind.parse().map_err(|e| AppError::BadRequest {
                message: format!("{e}"),
            })?;
            let best = state.store.best(criterion, &source, &destination);
            let view = best.as_deref().map(ItineraryView::new);
            Ok(Json(view).into_response())
        }
    }
}

/// Field-by-field differences between two stored itineraries.
async fn compare(
    State(state): State<AppState>,
    Query(req): Query<CompareRequest>,
) -> Result<Json<CompareResponse>, AppError> {
    let ticket1 = parse_id("ticket1", &req.ticket1)?;
    let ticket2 = parse_id("ticket2", &req.ticket2)?;

    let left = state.store.get(ticket1)?;
    let right = state.store.get(ticket2)?;

    let left = serde_json::to_value(ItineraryView::new(&left)).map_err(AppError::internal)?;
    let right = serde_json::to_value(ItineraryView::new(&right)).map_err(AppError::internal)?;

    Ok(Json(CompareResponse {
        ticket1,
        ticket2,
        differences: diff(&left, &right),
    }))
}

fn parse_airport(field: &str, value: &str) -> Result<AirportCode, AppError> {
    AirportCode::parse_normalized(value).map_err(|e| AppError::BadRequest {
        message: format!("Invalid {field} airport {value:?}: {e}"),
    })
}

fn parse_id(field: &str, value: &str) -> Result<ItineraryId, AppError> {
    value.parse().map_err(|e| AppError::BadRequest {
        message: format!("Invalid {field} id {value:?}: {e}"),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl AppError {
    fn internal(e: impl std::fmt::Display) -> Self {
        AppError::Internal {
            message: e.to_string(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(_) => AppError::NotFound {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "Request failed");
        } else {
            debug!(%status, %message, "Request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
