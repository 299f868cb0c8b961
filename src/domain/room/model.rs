//! Room domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Room category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomType {
    Simple,
    Double,
    Suite,
    Family,
    Deluxe,
}

impl RoomType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Double => "double",
            Self::Suite => "suite",
            Self::Family => "family",
            Self::Deluxe => "deluxe",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "simple" => Some(Self::Simple),
            "double" => Some(Self::Double),
            "suite" => Some(Self::Suite),
            "family" => Some(Self::Family),
            "deluxe" => Some(Self::Deluxe),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoomType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the room looks out on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomView {
    City,
    Sea,
    Garden,
    Pool,
    Mountain,
}

impl RoomView {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::City => "city",
            Self::Sea => "sea",
            Self::Garden => "garden",
            Self::Pool => "pool",
            Self::Mountain => "mountain",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "city" => Some(Self::City),
            "sea" => Some(Self::Sea),
            "garden" => Some(Self::Garden),
            "pool" => Some(Self::Pool),
            "mountain" => Some(Self::Mountain),
            _ => None,
        }
    }
}

impl std::fmt::Display for RoomView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hotel room
///
/// Rooms are never deleted while reservations reference them; staff
/// soft-disable them via `is_active` instead.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: i32,
    /// Door number, e.g. "204"
    pub number: String,
    pub room_type: RoomType,
    pub floor: i32,
    /// Price per night
    pub nightly_rate: Decimal,
    /// Maximum number of guests (adults + children)
    pub max_guests: u32,
    pub view: RoomView,
    /// Free-form feature tags, e.g. "balcony", "minibar"
    pub features: Vec<String>,
    /// Highlighted in "recommended" search ordering
    pub is_featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Room {
    pub fn fits(&self, guests: u32) -> bool {
        self.max_guests >= guests
    }

    pub fn matches(&self, filters: &RoomFilters) -> bool {
        if let Some(room_type) = filters.room_type {
            if self.room_type != room_type {
                return false;
            }
        }
        if let Some(view) = filters.view {
            if self.view != view {
                return false;
            }
        }
        if let Some(max_price) = filters.max_price {
            if self.nightly_rate > max_price {
                return false;
            }
        }
        filters
            .features
            .iter()
            .all(|wanted| self.features.iter().any(|f| f.eq_ignore_ascii_case(wanted)))
    }
}

/// Data for registering a new room
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub number: String,
    pub room_type: RoomType,
    pub floor: i32,
    pub nightly_rate: Decimal,
    pub max_guests: u32,
    pub view: RoomView,
    pub features: Vec<String>,
    pub is_featured: bool,
}

/// Closed set of search filters. A `None`/empty field means "no constraint".
#[derive(Debug, Clone, Default)]
pub struct RoomFilters {
    pub room_type: Option<RoomType>,
    pub view: Option<RoomView>,
    /// Maximum nightly rate, inclusive
    pub max_price: Option<Decimal>,
    /// Every listed tag must be present on the room (case-insensitive)
    pub features: Vec<String>,
}

/// Search result ordering. Ties always break by room id so results are
/// deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomSort {
    /// Featured rooms first, then cheapest first
    #[default]
    Recommended,
    PriceAsc,
    PriceDesc,
}
