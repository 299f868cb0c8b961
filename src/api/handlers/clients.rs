//! Client REST handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use crate::api::dto::{
    ApiResponse, ClientDto, CreateClientRequest, PaginatedResponse, PaginationQuery,
    ReservationDto,
};
use crate::api::extract::ValidatedJson;
use crate::api::handlers::{error_response, ApiError, AppState};
use crate::domain::{BookingError, NewClient};
use crate::shared::validations::validate_pagination;
use crate::shared::PaginationParams;

/// List registered clients
#[utoipa::path(
    get,
    path = "/api/v1/clients",
    tag = "Clients",
    params(PaginationQuery),
    responses(
        (status = 200, description = "One page of clients", body = ApiResponse<PaginatedResponse<ClientDto>>)
    )
)]
pub async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<ClientDto>>>, ApiError> {
    let (page, limit) = validate_pagination(query.page, query.limit);
    let result = state
        .clients
        .list(PaginationParams { page, limit })
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        result.map(ClientDto::from).into(),
    )))
}

/// Register a client directly (staff-assisted flow)
#[utoipa::path(
    post,
    path = "/api/v1/clients",
    tag = "Clients",
    request_body = CreateClientRequest,
    responses(
        (status = 201, description = "Client registered", body = ApiResponse<ClientDto>),
        (status = 422, description = "Invalid profile or email already registered")
    )
)]
pub async fn create_client(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateClientRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ClientDto>>), ApiError> {
    let client = state
        .clients
        .create(NewClient {
            name: req.name,
            email: req.email,
            phone: req.phone,
        })
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(client.into())),
    ))
}

/// Fetch a client by ID
#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}",
    tag = "Clients",
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client profile", body = ApiResponse<ClientDto>),
        (status = 404, description = "Client not found")
    )
)]
pub async fn get_client(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ClientDto>>, ApiError> {
    let client = state
        .clients
        .find_by_id(id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| {
            error_response(BookingError::NotFound {
                entity: "Client",
                field: "id",
                value: id.to_string(),
            })
        })?;
    Ok(Json(ApiResponse::success(client.into())))
}

/// A client's reservations, newest first
#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}/reservations",
    tag = "Clients",
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Reservation history", body = ApiResponse<Vec<ReservationDto>>),
        (status = 404, description = "Client not found")
    )
)]
pub async fn client_reservations(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<ReservationDto>>>, ApiError> {
    if state
        .clients
        .find_by_id(id)
        .await
        .map_err(error_response)?
        .is_none()
    {
        return Err(error_response(BookingError::NotFound {
            entity: "Client",
            field: "id",
            value: id.to_string(),
        }));
    }
    let reservations = state
        .reservations
        .find_for_client(id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        reservations.into_iter().map(ReservationDto::from).collect(),
    )))
}
