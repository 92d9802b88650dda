//! Secondary indexes for list and ownership lookups.
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_service_provider_id")
                    .table(Service::Table)
                    .col(Service::ProviderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_provider_service_position")
                    .table(ProviderService::Table)
                    .col(ProviderService::ProviderId)
                    .col(ProviderService::Position)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_provider_service_position").table(ProviderService::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_provider_id").table(Service::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Service { Table, ProviderId }

#[derive(DeriveIden)]
enum ProviderService { Table, ProviderId, Position }
