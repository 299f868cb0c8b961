//! Room entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rooms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Door number, unique within the property
    pub number: String,

    /// Room type: simple, double, suite, family, deluxe
    pub room_type: String,

    pub floor: i32,

    /// Nightly rate in smallest currency unit (cents)
    pub nightly_rate_cents: i64,

    pub max_guests: i32,

    /// View: city, sea, garden, pool, mountain
    pub view: String,

    /// JSON array of feature tags
    pub features: String,

    pub is_featured: bool,

    /// Soft-disable flag; inactive rooms are hidden from search
    pub is_active: bool,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reservation_room::Entity")]
    ReservationRooms,
}

impl Related<super::reservation_room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReservationRooms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
