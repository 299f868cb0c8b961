//! Reservation lifecycle handlers
//!
//! Each transition endpoint drives the state machine through the lifecycle
//! service; the defaults encode who normally performs the step (admin
//! confirms/rejects, front-desk agents handle check-in/out, the system
//! completes, guests cancel).

use axum::{
    extract::{Path, Query, State},
    Json,
};
use crate::api::dto::{
    ApiResponse, PaginatedResponse, ReservationDto, ReservationListQuery, TransitionRequest,
    UpdateStayRequest,
};
use crate::api::extract::ValidatedJson;
use crate::api::handlers::{error_response, invalid, ApiError, AppState};
use crate::domain::{Actor, BookingError, ReservationStatus, StayRange};
use crate::shared::validations::validate_pagination;
use crate::shared::PaginationParams;

fn parse_actor(s: &str) -> Result<Actor, ApiError> {
    match s {
        "admin" => Ok(Actor::Admin),
        "agent" => Ok(Actor::Agent),
        "client" => Ok(Actor::Client),
        "system" => Ok(Actor::System),
        other => Err(invalid(format!("unknown actor {:?}", other))),
    }
}

fn actor_or(body: &Option<Json<TransitionRequest>>, default: Actor) -> Result<Actor, ApiError> {
    match body.as_ref().and_then(|b| b.actor.as_deref()) {
        Some(s) => parse_actor(s),
        None => Ok(default),
    }
}

fn reason_of(body: &Option<Json<TransitionRequest>>) -> Option<String> {
    body.as_ref().and_then(|b| b.reason.clone())
}

/// List reservations, newest first
#[utoipa::path(
    get,
    path = "/api/v1/reservations",
    tag = "Reservations",
    params(ReservationListQuery),
    responses(
        (status = 200, description = "One page of reservations", body = ApiResponse<PaginatedResponse<ReservationDto>>),
        (status = 422, description = "Unknown status filter")
    )
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    Query(query): Query<ReservationListQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<ReservationDto>>>, ApiError> {
    let (page, limit) = validate_pagination(query.page, query.limit);
    let status = query
        .status
        .as_deref()
        .map(|s| {
            ReservationStatus::parse(s).ok_or_else(|| invalid(format!("unknown status {:?}", s)))
        })
        .transpose()?;

    if let Some(client_id) = query.client_id {
        let mine = state
            .reservations
            .find_for_client(client_id)
            .await
            .map_err(error_response)?;
        let matching: Vec<ReservationDto> = mine
            .into_iter()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .map(ReservationDto::from)
            .collect();
        let total = matching.len() as u64;
        let params = PaginationParams { page, limit };
        let items: Vec<ReservationDto> = matching
            .into_iter()
            .skip(params.offset() as usize)
            .take(limit as usize)
            .collect();
        return Ok(Json(ApiResponse::success(PaginatedResponse::new(
            items, total, page, limit,
        ))));
    }

    let result = state
        .reservations
        .list(PaginationParams { page, limit }, status)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        result.map(ReservationDto::from).into(),
    )))
}

/// Fetch a reservation by ID
#[utoipa::path(
    get,
    path = "/api/v1/reservations/{id}",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let reservation = state
        .reservations
        .find_by_id(id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| {
            error_response(BookingError::NotFound {
                entity: "Reservation",
                field: "id",
                value: id.to_string(),
            })
        })?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

async fn apply_transition(
    state: &AppState,
    id: i32,
    requested: ReservationStatus,
    actor: Actor,
    reason: Option<String>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let reservation = state
        .lifecycle
        .transition(id, requested, actor, reason)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}

/// Confirm a pending reservation (admin)
#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/confirm",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    request_body(content = TransitionRequest, description = "Optional actor override"),
    responses(
        (status = 200, description = "Reservation confirmed", body = ApiResponse<ReservationDto>),
        (status = 403, description = "Actor may not confirm"),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Not confirmable from its current state")
    )
)]
pub async fn confirm_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Option<Json<TransitionRequest>>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let actor = actor_or(&body, Actor::Admin)?;
    apply_transition(&state, id, ReservationStatus::Confirmed, actor, None).await
}

/// Reject a pending reservation (admin, reason required)
#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/reject",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    request_body = TransitionRequest,
    responses(
        (status = 200, description = "Reservation rejected", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Not rejectable from its current state"),
        (status = 422, description = "Missing rejection reason")
    )
)]
pub async fn reject_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Option<Json<TransitionRequest>>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let actor = actor_or(&body, Actor::Admin)?;
    let reason = reason_of(&body);
    apply_transition(&state, id, ReservationStatus::Canceled, actor, reason).await
}

/// Check a guest in (front desk)
#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/check-in",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    request_body(content = TransitionRequest, description = "Optional actor override"),
    responses(
        (status = 200, description = "Guest checked in", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Not checked-in-able (state or date)")
    )
)]
pub async fn check_in_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Option<Json<TransitionRequest>>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let actor = actor_or(&body, Actor::Agent)?;
    apply_transition(&state, id, ReservationStatus::CheckedIn, actor, None).await
}

/// Check a guest out (front desk)
#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/check-out",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    request_body(content = TransitionRequest, description = "Optional actor override"),
    responses(
        (status = 200, description = "Guest checked out", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Guest is not checked in")
    )
)]
pub async fn check_out_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Option<Json<TransitionRequest>>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let actor = actor_or(&body, Actor::Agent)?;
    apply_transition(&state, id, ReservationStatus::CheckedOut, actor, None).await
}

/// Close out a checked-out stay
#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/complete",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    request_body(content = TransitionRequest, description = "Optional actor override"),
    responses(
        (status = 200, description = "Stay completed", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Stay is not checked out")
    )
)]
pub async fn complete_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Option<Json<TransitionRequest>>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let actor = actor_or(&body, Actor::System)?;
    apply_transition(&state, id, ReservationStatus::Completed, actor, None).await
}

/// Cancel a reservation
///
/// Defaults to the guest role, which is bound by the pre-check-in lockout
/// window; staff may cancel with an explicit actor.
#[utoipa::path(
    post,
    path = "/api/v1/reservations/{id}/cancel",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    request_body(content = TransitionRequest, description = "Optional actor and reason"),
    responses(
        (status = 200, description = "Reservation canceled", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Not cancelable (state or lockout window)")
    )
)]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Option<Json<TransitionRequest>>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let actor = actor_or(&body, Actor::Client)?;
    let reason = reason_of(&body);
    apply_transition(&state, id, ReservationStatus::Canceled, actor, reason).await
}

/// Edit a reservation's stay in place
///
/// Reprices at current rates, re-checks availability excluding the
/// reservation's own hold, and bumps the version.
#[utoipa::path(
    put,
    path = "/api/v1/reservations/{id}/stay",
    tag = "Reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    request_body = UpdateStayRequest,
    responses(
        (status = 200, description = "Reservation updated and repriced", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Reservation not found"),
        (status = 409, description = "Rooms taken, state not editable, or inside lockout"),
        (status = 422, description = "Invalid stay parameters")
    )
)]
pub async fn update_reservation_stay(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateStayRequest>,
) -> Result<Json<ApiResponse<ReservationDto>>, ApiError> {
    let stay = StayRange::new(req.check_in, req.check_out).map_err(error_response)?;
    let reservation = state
        .lifecycle
        .update_interval(id, stay, req.adults, req.children.unwrap_or(0))
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(reservation.into())))
}
