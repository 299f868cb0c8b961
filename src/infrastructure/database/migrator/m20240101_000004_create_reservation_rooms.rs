//! Create reservation_rooms junction table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_rooms::Rooms;
use super::m20240101_000003_create_reservations::Reservations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReservationRooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReservationRooms::ReservationId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReservationRooms::RoomId)
                            .integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(ReservationRooms::ReservationId)
                            .col(ReservationRooms::RoomId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_rooms_reservation")
                            .from(ReservationRooms::Table, ReservationRooms::ReservationId)
                            .to(Reservations::Table, Reservations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservation_rooms_room")
                            .from(ReservationRooms::Table, ReservationRooms::RoomId)
                            .to(Rooms::Table, Rooms::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservation_rooms_room")
                    .table(ReservationRooms::Table)
                    .col(ReservationRooms::RoomId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReservationRooms::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ReservationRooms {
    Table,
    ReservationId,
    RoomId,
}
