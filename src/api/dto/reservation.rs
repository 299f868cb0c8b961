//! Reservation DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Reservation;

/// A booked stay
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReservationDto {
    pub id: i32,
    pub client_id: i32,
    /// Rooms held by this reservation
    pub room_ids: Vec<i32>,
    /// Check-in date (inclusive)
    pub check_in: NaiveDate,
    /// Check-out date (exclusive)
    pub check_out: NaiveDate,
    pub nights: i64,
    pub adults: u32,
    pub children: u32,
    #[schema(value_type = String, example = "330.00")]
    pub total_price: Decimal,
    /// Currency code (ISO 4217)
    pub currency: String,
    /// `PENDING`, `CONFIRMED`, `CHECKED_IN`, `CHECKED_OUT`, `COMPLETED`, `CANCELED`
    pub status: String,
    /// `online` or `agent`
    pub source: String,
    /// Present when an admin rejected the booking
    pub rejection_reason: Option<String>,
    pub feedback_given: bool,
    pub invoice_ref: Option<String>,
    /// Optimistic-lock counter; bumps on every change
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            client_id: r.client_id,
            room_ids: r.room_ids,
            check_in: r.stay.check_in(),
            check_out: r.stay.check_out(),
            nights: r.stay.nights(),
            adults: r.adults,
            children: r.children,
            total_price: r.total_price,
            currency: r.currency,
            status: r.status.as_str().to_string(),
            source: r.source.as_str().to_string(),
            rejection_reason: r.rejection_reason,
            feedback_given: r.feedback_given,
            invoice_ref: r.invoice_ref,
            version: r.version,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Lifecycle transition request
///
/// The body is optional on most transition endpoints; each endpoint has a
/// default acting role. A reject must carry a reason.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TransitionRequest {
    /// Acting role: `admin`, `agent`, `client`, `system`
    pub actor: Option<String>,
    /// Free-text reason; required when rejecting
    pub reason: Option<String>,
}

/// Edit-in-place of an existing reservation's stay
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStayRequest {
    /// New check-in date (inclusive)
    pub check_in: NaiveDate,
    /// New check-out date (exclusive)
    pub check_out: NaiveDate,
    #[validate(range(min = 1))]
    pub adults: u32,
    /// Default: 0
    pub children: Option<u32>,
}

/// Reservation list filter
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ReservationListQuery {
    /// Page number (1-based). Default: 1
    pub page: Option<u32>,
    /// Items per page (1-100). Default: 20
    pub limit: Option<u32>,
    /// Filter by status (e.g. `PENDING`)
    pub status: Option<String>,
    /// Filter by owning client
    pub client_id: Option<i32>,
}
