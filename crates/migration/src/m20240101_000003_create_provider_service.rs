//! Create `provider_service` table.
//!
//! Ordered list of service references owned by a provider. A service appears
//! in exactly one list, once.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ProviderService::Table)
                    .if_not_exists()
                    .col(uuid(ProviderService::ProviderId).not_null())
                    .col(uuid(ProviderService::ServiceId).unique_key().not_null())
                    .col(integer(ProviderService::Position).not_null())
                    .primary_key(
                        Index::create()
                            .col(ProviderService::ProviderId)
                            .col(ProviderService::ServiceId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_provider_service_provider")
                            .from(ProviderService::Table, ProviderService::ProviderId)
                            .to(Provider::Table, Provider::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_provider_service_service")
                            .from(ProviderService::Table, ProviderService::ServiceId)
                            .to(Service::Table, Service::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ProviderService::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ProviderService { Table, ProviderId, ServiceId, Position }

#[derive(DeriveIden)]
enum Provider { Table, Id }

#[derive(DeriveIden)]
enum Service { Table, Id }
