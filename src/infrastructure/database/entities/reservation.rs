//! Reservation entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub client_id: i32,

    /// Half-open stay interval: [check_in, check_out)
    pub check_in: Date,
    pub check_out: Date,

    pub adults: i32,
    pub children: i32,

    /// Total in smallest currency unit (cents)
    pub total_price_cents: i64,

    /// Currency code (ISO 4217)
    pub currency: String,

    /// Status: PENDING, CONFIRMED, CHECKED_IN, CHECKED_OUT, COMPLETED, CANCELED
    pub status: String,

    /// Source channel: online, agent
    pub source: String,

    #[sea_orm(nullable)]
    pub rejection_reason: Option<String>,

    pub feedback_given: bool,

    #[sea_orm(nullable)]
    pub invoice_ref: Option<String>,

    /// Optimistic-lock counter
    pub version: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,

    #[sea_orm(has_many = "super::reservation_room::Entity")]
    ReservationRooms,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::reservation_room::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ReservationRooms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
