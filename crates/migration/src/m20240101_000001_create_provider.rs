//! Create `provider` table.
//!
//! One row per provider account; `user_id` is the external account identity.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Provider::Table)
                    .if_not_exists()
                    .col(uuid(Provider::Id).primary_key())
                    .col(string_len(Provider::UserId, 128).unique_key().not_null())
                    .col(string_len(Provider::CompanyName, 64).unique_key().not_null())
                    .col(string_len(Provider::TypeOfProvider, 64).not_null())
                    .col(string_len(Provider::PhoneNumber, 32).not_null())
                    .col(integer(Provider::ExperienceYears).not_null())
                    .col(integer(Provider::HourlyRate).not_null())
                    .col(text(Provider::Bio).not_null())
                    .col(json_binary(Provider::OperatingDays).not_null())
                    .col(string_len(Provider::StartTime, 16).not_null())
                    .col(string_len(Provider::EndTime, 16).not_null())
                    .col(ColumnDef::new(Provider::ImageUrl).text().null())
                    .col(timestamp_with_time_zone(Provider::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Provider::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Provider::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Provider {
    Table,
    Id,
    UserId,
    CompanyName,
    TypeOfProvider,
    PhoneNumber,
    ExperienceYears,
    HourlyRate,
    Bio,
    OperatingDays,
    StartTime,
    EndTime,
    ImageUrl,
    CreatedAt,
    UpdatedAt,
}
