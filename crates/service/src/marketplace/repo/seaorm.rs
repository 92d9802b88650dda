use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use uuid::Uuid;
use tracing::warn;

use common::types::{
    CreateServiceInput, NewProvider, ProviderProfile, ServiceDetail, ServiceRecord, UpdateProfileInput,
    UpdateServiceInput,
};
use models::errors::ModelError;
use models::{provider, provider_service, service};

use crate::errors::{read_err, write_err, ServiceError};
use crate::marketplace::repository::MarketplaceRepository;

/// SeaORM-backed repository implementation.
pub struct SeaOrmMarketplaceRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmMarketplaceRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }

    async fn profile_of(&self, row: provider::Model) -> Result<ProviderProfile, ServiceError> {
        let ids = provider_service::list_service_ids(&self.db, row.id).await.map_err(read_err)?;
        row.into_profile(ids).map_err(read_err)
    }
}

fn db_read(e: sea_orm::DbErr) -> ServiceError { ServiceError::Lookup(e.to_string()) }

/// Unique-key rejections become `ServiceError::Conflict`.
fn db_write(e: sea_orm::DbErr) -> ServiceError { write_err(ModelError::from(e)) }

#[async_trait::async_trait]
impl MarketplaceRepository for SeaOrmMarketplaceRepository {
    async fn find_provider_by_user(&self, user_id: &str) -> Result<Option<ProviderProfile>, ServiceError> {
        match provider::find_by_user_id(&self.db, user_id).await.map_err(read_err)? {
            Some(row) => Ok(Some(self.profile_of(row).await?)),
            None => Ok(None),
        }
    }

    async fn insert_provider(&self, input: &NewProvider) -> Result<ProviderProfile, ServiceError> {
        let row = provider::create(&self.db, input).await.map_err(write_err)?;
        row.into_profile(vec![]).map_err(read_err)
    }

    async fn update_profile(&self, provider_id: Uuid, input: &UpdateProfileInput) -> Result<Option<ProviderProfile>, ServiceError> {
        let Some(found) = provider::Entity::find_by_id(provider_id).one(&self.db).await.map_err(db_read)? else {
            return Ok(None);
        };
        let updated = provider::profile_update(found, input)
            .map_err(write_err)?
            .update(&self.db)
            .await
            .map_err(db_write)?;
        Ok(Some(self.profile_of(updated).await?))
    }

    async fn company_name_taken(&self, company_name: &str, except: Uuid) -> Result<bool, ServiceError> {
        provider::company_name_taken(&self.db, company_name, except).await.map_err(read_err)
    }

    async fn get_service(&self, service_id: Uuid) -> Result<Option<ServiceDetail>, ServiceError> {
        let found = service::Entity::find_by_id(service_id)
            .find_also_related(provider::Entity)
            .one(&self.db)
            .await
            .map_err(db_read)?;
        let Some((svc, owner)) = found else { return Ok(None) };
        let owner = owner.ok_or_else(|| {
            ServiceError::Consistency(format!("service {service_id} references a missing provider"))
        })?;
        let service = svc.to_record().map_err(read_err)?;
        let provider = self.profile_of(owner).await?;
        Ok(Some(ServiceDetail { service, provider }))
    }

    async fn list_services(&self, provider_id: Uuid) -> Result<Vec<ServiceRecord>, ServiceError> {
        let rows = provider_service::Entity::find()
            .filter(provider_service::Column::ProviderId.eq(provider_id))
            .order_by_asc(provider_service::Column::Position)
            .find_also_related(service::Entity)
            .all(&self.db)
            .await
            .map_err(db_read)?;
        let mut out = Vec::with_capacity(rows.len());
        for (entry, svc) in rows {
            match svc {
                Some(svc) => out.push(svc.to_record().map_err(read_err)?),
                // FK cascade makes this unreachable unless the schema was bypassed
                None => warn!(service_id = %entry.service_id, %provider_id, "dangling_service_reference"),
            }
        }
        Ok(out)
    }

    async fn create_service(&self, provider_id: Uuid, input: &CreateServiceInput) -> Result<ServiceRecord, ServiceError> {
        let am = service::new_active(provider_id, input).map_err(write_err)?;
        let txn = self.db.begin().await.map_err(db_write)?;

        // Row lock serialises appends for the same provider.
        let owner = provider::Entity::find_by_id(provider_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_write)?;
        if owner.is_none() {
            txn.rollback().await.map_err(db_write)?;
            return Err(ServiceError::Consistency("provider not found or update has failed".into()));
        }

        let created = am.insert(&txn).await.map_err(db_write)?;
        provider_service::push(&txn, provider_id, created.id).await.map_err(write_err)?;
        txn.commit().await.map_err(db_write)?;
        created.to_record().map_err(read_err)
    }

    async fn update_service(&self, input: &UpdateServiceInput) -> Result<Option<ServiceRecord>, ServiceError> {
        let Some(found) = service::Entity::find_by_id(input.service_id).one(&self.db).await.map_err(db_read)? else {
            return Ok(None);
        };
        let updated = service::apply_update(found, input)
            .map_err(write_err)?
            .update(&self.db)
            .await
            .map_err(db_write)?;
        updated.to_record().map_err(read_err).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use common::types::{OperatingDays, Weekday};

    fn new_provider(tag: &str) -> NewProvider {
        NewProvider {
            user_id: format!("user-{tag}"),
            company_name: format!("Co {tag}"),
            type_of_provider: "Cleaning".into(),
            phone_number: "5551234".into(),
            experience_years: 3,
            hourly_rate: 80,
            bio: "Tidy homes".into(),
            operating_days: [Weekday::Friday, Weekday::Monday].into_iter().collect::<OperatingDays>(),
            start_time: "09:00".into(),
            end_time: "18:00".into(),
        }
    }

    fn create_input(user_id: &str, name: &str) -> CreateServiceInput {
        CreateServiceInput {
            user_id: user_id.into(),
            image_url: "https://cdn.example.com/a.png".into(),
            service_name: name.into(),
            type_of_service: "Cleaning".into(),
            description: "Every room".into(),
            duration: 30,
            price: 19.99,
            path: "/services".into(),
        }
    }

    #[tokio::test]
    async fn create_appends_in_order_and_populates_provider() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmMarketplaceRepository::new(db);
        let tag = Uuid::new_v4().simple().to_string()[..8].to_string();
        let owner = repo.insert_provider(&new_provider(&tag)).await?;

        let a = repo.create_service(owner.id, &create_input(&owner.user_id, "First")).await?;
        let b = repo.create_service(owner.id, &create_input(&owner.user_id, "Second")).await?;

        let listed: Vec<Uuid> = repo.list_services(owner.id).await?.into_iter().map(|s| s.id).collect();
        assert_eq!(listed, vec![a.id, b.id]);

        let detail = repo.get_service(b.id).await?.expect("service stored");
        assert_eq!(detail.provider.id, owner.id);
        assert_eq!(detail.provider.services_offered, vec![a.id, b.id]);
        assert_eq!(detail.provider.operating_days.names(), vec!["Monday", "Friday"]);
        Ok(())
    }

    #[tokio::test]
    async fn create_for_vanished_provider_writes_nothing() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmMarketplaceRepository::new(db);
        let ghost = Uuid::new_v4();
        let err = repo.create_service(ghost, &create_input("nobody", "Orphan")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Consistency(_)), "{err}");

        let orphans = service::Entity::find()
            .filter(service::Column::ProviderId.eq(ghost))
            .all(&repo.db)
            .await?;
        assert!(orphans.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn update_service_keeps_image_when_absent() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmMarketplaceRepository::new(db);
        let tag = Uuid::new_v4().simple().to_string()[..8].to_string();
        let owner = repo.insert_provider(&new_provider(&tag)).await?;
        let created = repo.create_service(owner.id, &create_input(&owner.user_id, "First")).await?;

        let input = UpdateServiceInput {
            service_id: created.id,
            image_url: None,
            service_name: "Renamed".into(),
            type_of_service: "Cleaning".into(),
            description: "Every room".into(),
            duration: 45,
            price: 25.0,
            path: "/services".into(),
        };
        let updated = repo.update_service(&input).await?.expect("service exists");
        assert_eq!(updated.image_url, created.image_url);
        assert_eq!(updated.duration, 45);

        let missing = UpdateServiceInput { service_id: Uuid::new_v4(), ..input };
        assert!(repo.update_service(&missing).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn company_names_are_checked_across_providers() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmMarketplaceRepository::new(db);
        let tag = Uuid::new_v4().simple().to_string()[..8].to_string();
        let owner = repo.insert_provider(&new_provider(&tag)).await?;
        assert!(!repo.company_name_taken(&owner.company_name, owner.id).await?);
        assert!(repo.company_name_taken(&owner.company_name, Uuid::nil()).await?);
        Ok(())
    }

    #[tokio::test]
    async fn unique_company_key_surfaces_as_conflict() -> anyhow::Result<()> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmMarketplaceRepository::new(db);
        let first = repo.insert_provider(&new_provider(&Uuid::new_v4().simple().to_string()[..8])).await?;
        let second = repo.insert_provider(&new_provider(&Uuid::new_v4().simple().to_string()[..8])).await?;

        // skips the pre-check, as a concurrent writer would
        let input = UpdateProfileInput {
            user_id: second.user_id.clone(),
            image_url: None,
            company_name: first.company_name.clone(),
            type_of_provider: "Cleaning".into(),
            phone_number: "5551234".into(),
            experience_years: 3,
            hourly_rate: 80,
            bio: "Tidy homes".into(),
            operating_days: OperatingDays::new(),
            start_time: "09:00".into(),
            end_time: "18:00".into(),
            path: "/profile".into(),
        };
        let err = repo.update_profile(second.id, &input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(ref m) if m == "company already exists"), "{err}");
        Ok(())
    }
}
