//! Booking pipeline DTOs

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// One-shot booking request
///
/// Runs the whole pipeline server-side: capture dates, select the listed
/// rooms, resolve the client by email (staging a new profile when unknown),
/// then commit. Availability is re-verified at commit, so a stale search
/// result answers 409 rather than double-booking.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBookingRequest {
    /// Check-in date (inclusive)
    pub check_in: NaiveDate,
    /// Check-out date (exclusive)
    pub check_out: NaiveDate,
    #[validate(range(min = 1))]
    pub adults: u32,
    /// Default: 0
    pub children: Option<u32>,
    /// Rooms to book; at least one
    #[validate(length(min = 1))]
    pub room_ids: Vec<i32>,
    /// Client identity
    #[validate(email)]
    pub email: String,
    /// Required when the email is not yet registered
    pub name: Option<String>,
    pub phone: Option<String>,
    /// Channel: `online` (default, starts PENDING) or `agent` (starts CONFIRMED)
    pub source: Option<String>,
}
