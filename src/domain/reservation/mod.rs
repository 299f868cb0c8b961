pub mod model;
pub mod repository;

pub use model::{
    Actor, NewReservation, Reservation, ReservationSource, ReservationStatus, StayRange,
};
pub use repository::ReservationRepository;
