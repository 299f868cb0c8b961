//! Create rooms table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rooms::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rooms::Number).string().not_null())
                    .col(
                        ColumnDef::new(Rooms::RoomType)
                            .string()
                            .not_null()
                            .default("double"),
                    )
                    .col(ColumnDef::new(Rooms::Floor).integer().not_null().default(1))
                    .col(
                        ColumnDef::new(Rooms::NightlyRateCents)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Rooms::MaxGuests)
                            .integer()
                            .not_null()
                            .default(2),
                    )
                    .col(
                        ColumnDef::new(Rooms::View)
                            .string()
                            .not_null()
                            .default("city"),
                    )
                    .col(
                        ColumnDef::new(Rooms::Features)
                            .string()
                            .not_null()
                            .default("[]"),
                    )
                    .col(
                        ColumnDef::new(Rooms::IsFeatured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Rooms::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Rooms::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Rooms::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Door numbers are unique per property
        manager
            .create_index(
                Index::create()
                    .name("idx_rooms_number")
                    .table(Rooms::Table)
                    .col(Rooms::Number)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rooms::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Rooms {
    Table,
    Id,
    Number,
    RoomType,
    Floor,
    NightlyRateCents,
    MaxGuests,
    View,
    Features,
    IsFeatured,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
