//! Core business entities, types and repository traits

pub mod client;
pub mod reservation;
pub mod room;

// Re-export commonly used types
pub use client::{Client, ClientRepository, NewClient};
pub use reservation::{
    Actor, NewReservation, Reservation, ReservationRepository, ReservationSource,
    ReservationStatus, StayRange,
};
pub use room::{NewRoom, Room, RoomFilters, RoomRepository, RoomSort, RoomType, RoomView};

pub use crate::shared::types::errors::{BookingError, BookingResult};
