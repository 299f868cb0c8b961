//! Create reservations table

use sea_orm_migration::prelude::*;

use super::m20240101_000002_create_clients::Clients;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::ClientId).integer().not_null())
                    .col(ColumnDef::new(Reservations::CheckIn).date().not_null())
                    .col(ColumnDef::new(Reservations::CheckOut).date().not_null())
                    .col(
                        ColumnDef::new(Reservations::Adults)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Reservations::Children)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Reservations::TotalPriceCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Reservations::Currency)
                            .string()
                            .not_null()
                            .default("USD"),
                    )
                    .col(
                        ColumnDef::new(Reservations::Status)
                            .string()
                            .not_null()
                            .default("PENDING"),
                    )
                    .col(
                        ColumnDef::new(Reservations::Source)
                            .string()
                            .not_null()
                            .default("online"),
                    )
                    .col(ColumnDef::new(Reservations::RejectionReason).string())
                    .col(
                        ColumnDef::new(Reservations::FeedbackGiven)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Reservations::InvoiceRef).string())
                    .col(
                        ColumnDef::new(Reservations::Version)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_client")
                            .from(Reservations::Table, Reservations::ClientId)
                            .to(Clients::Table, Clients::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Availability checks scan by interval and status
        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_interval")
                    .table(Reservations::Table)
                    .col(Reservations::CheckIn)
                    .col(Reservations::CheckOut)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_status")
                    .table(Reservations::Table)
                    .col(Reservations::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_client")
                    .table(Reservations::Table)
                    .col(Reservations::ClientId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    ClientId,
    CheckIn,
    CheckOut,
    Adults,
    Children,
    TotalPriceCents,
    Currency,
    Status,
    Source,
    RejectionReason,
    FeedbackGiven,
    InvoiceRef,
    Version,
    CreatedAt,
    UpdatedAt,
}
