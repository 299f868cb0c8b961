//! Room inventory, availability search and price preview handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use crate::api::dto::{
    ApiResponse, AvailabilityQuery, CreateRoomRequest, EmptyData, PaginatedResponse,
    PaginationQuery, QuoteDto, QuoteRequest, RoomDto, UpdateRoomRequest,
};
use crate::api::extract::ValidatedJson;
use crate::api::handlers::{error_response, invalid, ApiError, AppState};
use crate::domain::{NewRoom, RoomFilters, RoomSort, RoomType, RoomView, StayRange};
use crate::shared::validations::validate_pagination;
use crate::shared::PaginationParams;

fn parse_room_type(s: &str) -> Result<RoomType, ApiError> {
    RoomType::parse(s).ok_or_else(|| invalid(format!("unknown room type {:?}", s)))
}

fn parse_view(s: &str) -> Result<RoomView, ApiError> {
    RoomView::parse(s).ok_or_else(|| invalid(format!("unknown view {:?}", s)))
}

fn parse_sort(s: Option<&str>) -> Result<RoomSort, ApiError> {
    match s {
        None | Some("recommended") => Ok(RoomSort::Recommended),
        Some("price_asc") => Ok(RoomSort::PriceAsc),
        Some("price_desc") => Ok(RoomSort::PriceDesc),
        Some(other) => Err(invalid(format!("unknown sort {:?}", other))),
    }
}

/// List all rooms (active and disabled)
#[utoipa::path(
    get,
    path = "/api/v1/rooms",
    tag = "Rooms",
    params(PaginationQuery),
    responses(
        (status = 200, description = "One page of rooms", body = ApiResponse<PaginatedResponse<RoomDto>>)
    )
)]
pub async fn list_rooms(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<PaginatedResponse<RoomDto>>>, ApiError> {
    let (page, limit) = validate_pagination(query.page, query.limit);
    let result = state
        .rooms
        .list(PaginationParams { page, limit })
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(result.map(RoomDto::from).into())))
}

/// Register a new room
#[utoipa::path(
    post,
    path = "/api/v1/rooms",
    tag = "Rooms",
    request_body = CreateRoomRequest,
    responses(
        (status = 201, description = "Room registered", body = ApiResponse<RoomDto>),
        (status = 422, description = "Invalid room data")
    )
)]
pub async fn create_room(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CreateRoomRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RoomDto>>), ApiError> {
    let new = NewRoom {
        number: req.number,
        room_type: parse_room_type(&req.room_type)?,
        floor: req.floor,
        nightly_rate: req.nightly_rate,
        max_guests: req.max_guests,
        view: parse_view(&req.view)?,
        features: req.features.unwrap_or_default(),
        is_featured: req.is_featured.unwrap_or(false),
    };
    let room = state.rooms.create(new).await.map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(room.into())),
    ))
}

/// Update a room's mutable fields
#[utoipa::path(
    put,
    path = "/api/v1/rooms/{id}",
    tag = "Rooms",
    params(("id" = i32, Path, description = "Room ID")),
    request_body = UpdateRoomRequest,
    responses(
        (status = 200, description = "Updated room", body = ApiResponse<RoomDto>),
        (status = 404, description = "Room not found"),
        (status = 422, description = "Invalid room data")
    )
)]
pub async fn update_room(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(req): ValidatedJson<UpdateRoomRequest>,
) -> Result<Json<ApiResponse<RoomDto>>, ApiError> {
    let existing = state
        .rooms
        .find_by_id(id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| {
            error_response(crate::domain::BookingError::NotFound {
                entity: "Room",
                field: "id",
                value: id.to_string(),
            })
        })?;

    let mut room = existing;
    room.number = req.number;
    room.room_type = parse_room_type(&req.room_type)?;
    room.floor = req.floor;
    room.nightly_rate = req.nightly_rate;
    room.max_guests = req.max_guests;
    room.view = parse_view(&req.view)?;
    if let Some(features) = req.features {
        room.features = features;
    }
    if let Some(is_featured) = req.is_featured {
        room.is_featured = is_featured;
    }
    if let Some(is_active) = req.is_active {
        room.is_active = is_active;
    }
    let updated = state.rooms.update(room).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(updated.into())))
}

/// Soft-disable a room
///
/// The room disappears from availability search; existing reservations
/// keep referencing it.
#[utoipa::path(
    delete,
    path = "/api/v1/rooms/{id}",
    tag = "Rooms",
    params(("id" = i32, Path, description = "Room ID")),
    responses(
        (status = 200, description = "Room disabled", body = ApiResponse<EmptyData>),
        (status = 404, description = "Room not found")
    )
)]
pub async fn deactivate_room(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    state.rooms.deactivate(id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

/// Search rooms free for a stay
///
/// Capacity, filters and the no-overlap rule applied; an empty list is a
/// normal answer.
#[utoipa::path(
    get,
    path = "/api/v1/availability",
    tag = "Availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Rooms free for the stay", body = ApiResponse<Vec<RoomDto>>),
        (status = 422, description = "Invalid search parameters")
    )
)]
pub async fn search_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<Vec<RoomDto>>>, ApiError> {
    let stay = StayRange::new(query.check_in, query.check_out).map_err(error_response)?;
    let filters = RoomFilters {
        room_type: query.room_type.as_deref().map(parse_room_type).transpose()?,
        view: query.view.as_deref().map(parse_view).transpose()?,
        max_price: query.max_price,
        features: query
            .features
            .as_deref()
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default(),
    };
    let sort = parse_sort(query.sort.as_deref())?;

    let rooms = state
        .availability
        .find_available_rooms(
            &stay,
            query.adults,
            query.children.unwrap_or(0),
            &filters,
            sort,
        )
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(
        rooms.into_iter().map(RoomDto::from).collect(),
    )))
}

/// Price preview for a room and stay
///
/// Pure arithmetic; no hold is placed.
#[utoipa::path(
    post,
    path = "/api/v1/quotes",
    tag = "Availability",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Priced stay breakdown", body = ApiResponse<QuoteDto>),
        (status = 404, description = "Room not found"),
        (status = 422, description = "Invalid stay parameters")
    )
)]
pub async fn preview_quote(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<QuoteRequest>,
) -> Result<Json<ApiResponse<QuoteDto>>, ApiError> {
    let stay = StayRange::new(req.check_in, req.check_out).map_err(error_response)?;
    let room = state
        .rooms
        .find_by_id(req.room_id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| {
            error_response(crate::domain::BookingError::NotFound {
                entity: "Room",
                field: "id",
                value: req.room_id.to_string(),
            })
        })?;
    let quote = state.pricing.price_room(&room, &stay);
    Ok(Json(ApiResponse::success(quote.into())))
}
