//! Shared types and helpers used across layers

pub mod types;
pub mod validations;

pub use types::errors::{BookingError, BookingResult};
pub use types::pagination::{PaginatedResult, PaginationParams};
