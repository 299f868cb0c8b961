use thiserror::Error;

use crate::domain::reservation::ReservationStatus;

/// Expected booking outcomes. Every variant except `Storage` is a
/// domain-validation failure the caller can act on; `Storage` is the single
/// opaque infrastructure fault surfaced across the service boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Room {room_id} is not available for the requested dates")]
    RoomUnavailable { room_id: i32 },

    #[error("Cannot move reservation from {from} to {requested}")]
    InvalidTransition {
        from: ReservationStatus,
        requested: ReservationStatus,
    },

    #[error("Edit not allowed: {0}")]
    EditNotAllowed(String),

    #[error("Reservation {id} was modified concurrently; refetch and retry")]
    StaleVersion { id: i32 },

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl BookingError {
    /// Whether a single refetch-and-retry is a reasonable caller response.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StaleVersion { .. })
    }
}

/// Result type for booking-core operations
pub type BookingResult<T> = Result<T, BookingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_names_both_states() {
        let e = BookingError::InvalidTransition {
            from: ReservationStatus::Pending,
            requested: ReservationStatus::CheckedIn,
        };
        let msg = e.to_string();
        assert!(msg.contains("PENDING"));
        assert!(msg.contains("CHECKED_IN"));
    }

    #[test]
    fn stale_version_is_retryable() {
        assert!(BookingError::StaleVersion { id: 7 }.is_retryable());
        assert!(!BookingError::InvalidInput("x".into()).is_retryable());
    }

}
