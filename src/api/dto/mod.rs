//! API data transfer objects

pub mod booking;
pub mod client;
pub mod common;
pub mod reservation;
pub mod room;

pub use booking::CreateBookingRequest;
pub use client::{ClientDto, CreateClientRequest};
pub use common::{ApiResponse, EmptyData, PaginatedResponse, PaginationQuery};
pub use reservation::{
    ReservationDto, ReservationListQuery, TransitionRequest, UpdateStayRequest,
};
pub use room::{
    AvailabilityQuery, CreateRoomRequest, QuoteDto, QuoteRequest, RoomDto, UpdateRoomRequest,
};
