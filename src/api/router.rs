//! API Router with Swagger UI

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto::*;
use crate::api::handlers::{bookings, clients, health, reservations, rooms, AppState};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Rooms + availability
        rooms::list_rooms,
        rooms::create_room,
        rooms::update_room,
        rooms::deactivate_room,
        rooms::search_availability,
        rooms::preview_quote,
        // Bookings
        bookings::create_booking,
        // Reservations
        reservations::list_reservations,
        reservations::get_reservation,
        reservations::confirm_reservation,
        reservations::reject_reservation,
        reservations::check_in_reservation,
        reservations::check_out_reservation,
        reservations::complete_reservation,
        reservations::cancel_reservation,
        reservations::update_reservation_stay,
        // Clients
        clients::list_clients,
        clients::create_client,
        clients::get_client,
        clients::client_reservations,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            EmptyData,
            PaginationQuery,
            PaginatedResponse<RoomDto>,
            PaginatedResponse<ClientDto>,
            PaginatedResponse<ReservationDto>,
            // Health
            health::HealthResponse,
            // Rooms + availability
            RoomDto,
            CreateRoomRequest,
            UpdateRoomRequest,
            AvailabilityQuery,
            QuoteRequest,
            QuoteDto,
            // Bookings
            CreateBookingRequest,
            // Reservations
            ReservationDto,
            ReservationListQuery,
            TransitionRequest,
            UpdateStayRequest,
            // Clients
            ClientDto,
            CreateClientRequest,
        )
    ),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Rooms", description = "Room inventory management"),
        (name = "Availability", description = "Availability search and price preview"),
        (name = "Bookings", description = "Orchestrated booking pipeline"),
        (name = "Reservations", description = "Reservation lifecycle"),
        (name = "Clients", description = "Guest profiles"),
    ),
    info(
        title = "Solara PMS API",
        description = "Reservation booking and availability core for a hotel property management system",
    )
)]
pub struct ApiDoc;

/// Build the application router: REST endpoints, CORS, request tracing and
/// Swagger UI.
pub fn create_api_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/v1/health", get(health::health_check))
        // Rooms + availability
        .route("/api/v1/rooms", get(rooms::list_rooms).post(rooms::create_room))
        .route(
            "/api/v1/rooms/{id}",
            put(rooms::update_room).delete(rooms::deactivate_room),
        )
        .route("/api/v1/availability", get(rooms::search_availability))
        .route("/api/v1/quotes", post(rooms::preview_quote))
        // Bookings
        .route("/api/v1/bookings", post(bookings::create_booking))
        // Reservations
        .route("/api/v1/reservations", get(reservations::list_reservations))
        .route("/api/v1/reservations/{id}", get(reservations::get_reservation))
        .route(
            "/api/v1/reservations/{id}/confirm",
            post(reservations::confirm_reservation),
        )
        .route(
            "/api/v1/reservations/{id}/reject",
            post(reservations::reject_reservation),
        )
        .route(
            "/api/v1/reservations/{id}/check-in",
            post(reservations::check_in_reservation),
        )
        .route(
            "/api/v1/reservations/{id}/check-out",
            post(reservations::check_out_reservation),
        )
        .route(
            "/api/v1/reservations/{id}/complete",
            post(reservations::complete_reservation),
        )
        .route(
            "/api/v1/reservations/{id}/cancel",
            post(reservations::cancel_reservation),
        )
        .route(
            "/api/v1/reservations/{id}/stay",
            put(reservations::update_reservation_stay),
        )
        // Clients
        .route(
            "/api/v1/clients",
            get(clients::list_clients).post(clients::create_client),
        )
        .route("/api/v1/clients/{id}", get(clients::get_client))
        .route(
            "/api/v1/clients/{id}/reservations",
            get(clients::client_reservations),
        )
        .with_state(state);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
