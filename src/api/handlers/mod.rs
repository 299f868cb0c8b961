//! API Handlers

pub mod bookings;
pub mod clients;
pub mod health;
pub mod reservations;
pub mod rooms;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Json;
use tracing::error;

use crate::api::dto::ApiResponse;
use crate::application::{
    AvailabilityService, BookingOrchestrator, PricingCalculator, ReservationLifecycle,
};
use crate::domain::{BookingError, ClientRepository, ReservationRepository, RoomRepository};

/// Shared state for all booking-core routes
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<dyn RoomRepository>,
    pub clients: Arc<dyn ClientRepository>,
    pub reservations: Arc<dyn ReservationRepository>,
    pub availability: Arc<AvailabilityService>,
    pub pricing: PricingCalculator,
    pub lifecycle: Arc<ReservationLifecycle>,
    pub orchestrator: Arc<BookingOrchestrator>,
}

pub(crate) type ApiError = (StatusCode, Json<ApiResponse<()>>);

/// Maps domain outcomes onto HTTP statuses. Conflict-shaped failures
/// (double booking, illegal transition, lost optimistic lock, policy
/// windows) all answer 409.
pub(crate) fn error_response(e: BookingError) -> ApiError {
    let status = match &e {
        BookingError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        BookingError::NotFound { .. } => StatusCode::NOT_FOUND,
        BookingError::RoomUnavailable { .. }
        | BookingError::InvalidTransition { .. }
        | BookingError::EditNotAllowed(_)
        | BookingError::StaleVersion { .. } => StatusCode::CONFLICT,
        BookingError::Forbidden(_) => StatusCode::FORBIDDEN,
        BookingError::Storage(_) => {
            error!(error = %e, "storage fault surfaced to API");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(ApiResponse::error(e.to_string())))
}

pub(crate) fn invalid(message: impl Into<String>) -> ApiError {
    error_response(BookingError::InvalidInput(message.into()))
}
