//! Room and availability DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::Room;

/// A hotel room
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoomDto {
    /// Unique room ID
    pub id: i32,
    /// Door number, unique within the property
    pub number: String,
    /// Room type: `simple`, `double`, `suite`, `family`, `deluxe`
    pub room_type: String,
    pub floor: i32,
    /// Nightly rate in major currency units
    #[schema(value_type = String, example = "120.00")]
    pub nightly_rate: Decimal,
    /// Maximum sleeping capacity
    pub max_guests: u32,
    /// View: `city`, `sea`, `garden`, `pool`, `mountain`
    pub view: String,
    /// Feature tags (e.g. `balcony`, `minibar`)
    pub features: Vec<String>,
    pub is_featured: bool,
    /// Inactive rooms are hidden from search but keep their history
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Room> for RoomDto {
    fn from(r: Room) -> Self {
        Self {
            id: r.id,
            number: r.number,
            room_type: r.room_type.as_str().to_string(),
            floor: r.floor,
            nightly_rate: r.nightly_rate,
            max_guests: r.max_guests,
            view: r.view.as_str().to_string(),
            features: r.features,
            is_featured: r.is_featured,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Room registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateRoomRequest {
    /// Door number
    #[validate(length(min = 1, max = 10))]
    pub number: String,
    /// Room type: `simple`, `double`, `suite`, `family`, `deluxe`
    pub room_type: String,
    pub floor: i32,
    /// Nightly rate in major currency units
    #[schema(value_type = String, example = "120.00")]
    pub nightly_rate: Decimal,
    /// Maximum sleeping capacity
    #[validate(range(min = 1, max = 16))]
    pub max_guests: u32,
    /// View: `city`, `sea`, `garden`, `pool`, `mountain`
    pub view: String,
    /// Feature tags (default: none)
    pub features: Option<Vec<String>>,
    /// Highlight in recommended ordering (default: false)
    pub is_featured: Option<bool>,
}

/// Room update request (full replace of mutable fields)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoomRequest {
    #[validate(length(min = 1, max = 10))]
    pub number: String,
    pub room_type: String,
    pub floor: i32,
    #[schema(value_type = String, example = "120.00")]
    pub nightly_rate: Decimal,
    #[validate(range(min = 1, max = 16))]
    pub max_guests: u32,
    pub view: String,
    pub features: Option<Vec<String>>,
    pub is_featured: Option<bool>,
    /// Soft-disable / re-enable
    pub is_active: Option<bool>,
}

/// Availability search query
#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct AvailabilityQuery {
    /// Check-in date (inclusive)
    pub check_in: NaiveDate,
    /// Check-out date (exclusive)
    pub check_out: NaiveDate,
    /// Adults in the party (at least 1)
    pub adults: u32,
    /// Children in the party. Default: 0
    pub children: Option<u32>,
    /// Filter by room type
    pub room_type: Option<String>,
    /// Filter by view
    pub view: Option<String>,
    /// Maximum nightly rate, inclusive
    #[param(value_type = Option<String>)]
    pub max_price: Option<Decimal>,
    /// Comma-separated feature tags; all must be present
    pub features: Option<String>,
    /// Ordering: `recommended` (default), `price_asc`, `price_desc`
    pub sort: Option<String>,
}

/// Price preview request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct QuoteRequest {
    pub room_id: i32,
    /// Check-in date (inclusive)
    pub check_in: NaiveDate,
    /// Check-out date (exclusive)
    pub check_out: NaiveDate,
    #[validate(range(min = 1))]
    pub adults: u32,
    /// Default: 0
    pub children: Option<u32>,
}

/// Priced stay breakdown
///
/// All amounts in major currency units, rounded once at the total.
#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteDto {
    /// Number of nights (at least 1)
    pub nights: i64,
    #[schema(value_type = String, example = "100.00")]
    pub nightly_rate: Decimal,
    #[schema(value_type = String, example = "300.00")]
    pub subtotal: Decimal,
    #[schema(value_type = String, example = "30.00")]
    pub tax: Decimal,
    #[schema(value_type = String, example = "330.00")]
    pub total: Decimal,
    /// Currency code (ISO 4217)
    pub currency: String,
}

impl From<crate::application::StayQuote> for QuoteDto {
    fn from(q: crate::application::StayQuote) -> Self {
        Self {
            nights: q.nights,
            nightly_rate: q.nightly_rate,
            subtotal: q.subtotal,
            tax: q.tax,
            total: q.total,
            currency: q.currency,
        }
    }
}
