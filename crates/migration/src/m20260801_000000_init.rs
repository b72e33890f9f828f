//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: authentication
//! - `boxes`: production entries with precomputed margin fields

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum Boxes {
    Table,
    Id,
    Date,
    BoxType,
    NumberOfBoxes,
    TotalCost,
    UnitCost,
    UnitMargin,
    TotalMargin,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Boxes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Boxes::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Boxes::Date).date().not_null())
                    .col(ColumnDef::new(Boxes::BoxType).string().not_null())
                    .col(
                        ColumnDef::new(Boxes::NumberOfBoxes)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Boxes::TotalCost).double().not_null())
                    .col(ColumnDef::new(Boxes::UnitCost).double().not_null())
                    .col(ColumnDef::new(Boxes::UnitMargin).double().not_null())
                    .col(ColumnDef::new(Boxes::TotalMargin).double().not_null())
                    .col(ColumnDef::new(Boxes::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // Listing always orders by creation time, newest first.
        manager
            .create_index(
                Index::create()
                    .name("idx-boxes-created_at")
                    .table(Boxes::Table)
                    .col(Boxes::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Boxes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}
