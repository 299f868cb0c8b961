//! Database entities

pub mod client;
pub mod reservation;
pub mod reservation_room;
pub mod room;
