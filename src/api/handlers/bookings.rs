//! Booking pipeline handler
//!
//! Drives the orchestrated capture → select → resolve → commit pipeline in
//! one request. Nothing is persisted until the commit succeeds.

use axum::{extract::State, http::StatusCode, Json};

use crate::api::dto::{ApiResponse, CreateBookingRequest, ReservationDto};
use crate::api::extract::ValidatedJson;
use crate::api::handlers::{error_response, invalid, ApiError, AppState};
use crate::application::CandidateProfile;
use crate::domain::ReservationSource;

fn parse_source(s: Option<&str>) -> Result<ReservationSource, ApiError> {
    match s {
        None => Ok(ReservationSource::Online),
        Some(s) => {
            ReservationSource::parse(s).ok_or_else(|| invalid(format!("unknown source {:?}", s)))
        }
    }
}

/// Book a stay
///
/// Answers 409 when a concurrent booking took one of the rooms between
/// search and commit.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Reservation created", body = ApiResponse<ReservationDto>),
        (status = 404, description = "A listed room does not exist"),
        (status = 409, description = "A room is no longer available"),
        (status = 422, description = "Invalid dates, party or client profile")
    )
)]
pub async fn create_booking(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationDto>>), ApiError> {
    let source = parse_source(req.source.as_deref())?;
    let orchestrator = &state.orchestrator;

    let mut workflow = orchestrator
        .capture_stay(
            orchestrator.begin(),
            req.check_in,
            req.check_out,
            req.adults,
            req.children.unwrap_or(0),
        )
        .map_err(error_response)?;
    for room_id in &req.room_ids {
        workflow = orchestrator
            .select_room(workflow, *room_id)
            .await
            .map_err(error_response)?;
    }
    let workflow = orchestrator
        .resolve_client(
            workflow,
            &req.email,
            &CandidateProfile {
                name: req.name,
                phone: req.phone,
            },
        )
        .await
        .map_err(error_response)?;
    let reservation = orchestrator
        .commit(workflow, source)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(reservation.into())),
    ))
}
