//! Create the `users` table.
//!
//! The unique key on `email` is the authoritative uniqueness guard; the
//! service layer translates violations into a duplicate-email conflict.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_len(Users::FirstName, 128).not_null())
                    .col(string_len(Users::LastName, 128).not_null())
                    .col(string_len(Users::Email, 255).unique_key().not_null())
                    .col(string_len(Users::Phone, 64).not_null())
                    .col(string_len(Users::Address, 255).not_null())
                    .col(string_len(Users::City, 128).not_null())
                    .col(string_len(Users::ZipCode, 32).not_null())
                    .col(string_len(Users::Country, 128).not_null())
                    .col(date(Users::DateOfBirth).not_null())
                    .col(string_len(Users::Gender, 64).not_null())
                    .col(timestamp_with_time_zone(Users::CreatedAt).not_null())
                    // Explicitly define nullable last_login to avoid conflicting NULL/NOT NULL
                    .col(
                        ColumnDef::new(Users::LastLogin)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(boolean(Users::IsActive).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    City,
    ZipCode,
    Country,
    DateOfBirth,
    Gender,
    CreatedAt,
    LastLogin,
    IsActive,
}
