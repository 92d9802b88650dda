use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use common::types::{
    CreateServiceInput, NewProvider, ProviderProfile, ServiceDetail, ServiceRecord, UpdateProfileInput,
    UpdateServiceInput,
};
use common::ActionOutcome;
use models::{provider, service};

use crate::cache::CacheInvalidator;
use crate::errors::{write_err, ServiceError};
use crate::marketplace::repository::MarketplaceRepository;

pub type ActionResult<T> = Result<ActionOutcome<T>, ServiceError>;

/// Marketplace business service independent of web framework.
///
/// Every successful write revalidates the page path supplied by the caller.
#[derive(Clone)]
pub struct MarketplaceService {
    repo: Arc<dyn MarketplaceRepository>,
    cache: Arc<dyn CacheInvalidator>,
}

/// Keep validation, consistency and conflict failures as they are, wrap the
/// store's message as a persistence failure of `context`.
fn wrap_write(context: &str, e: ServiceError) -> ServiceError {
    match e {
        ServiceError::Persistence(m) | ServiceError::Lookup(m) => ServiceError::persistence(context, m),
        other => other,
    }
}

fn wrap_read(context: &str, e: ServiceError) -> ServiceError {
    match e {
        ServiceError::Persistence(m) | ServiceError::Lookup(m) => ServiceError::lookup(context, m),
        other => other,
    }
}

impl MarketplaceService {
    pub fn new(repo: Arc<dyn MarketplaceRepository>, cache: Arc<dyn CacheInvalidator>) -> Self { Self { repo, cache } }

    /// Fetch a service with its provider populated.
    ///
    /// # Examples
    /// ```
    /// use std::{sync::Arc, time::Duration};
    /// use service::{MarketplaceService, cache::PageCache, marketplace::repository::mock::MockMarketplaceRepository};
    /// let svc = MarketplaceService::new(Arc::new(MockMarketplaceRepository::default()), Arc::new(PageCache::new(10, Duration::from_secs(60))));
    /// let out = tokio_test::block_on(svc.get_service(&uuid::Uuid::new_v4().to_string())).unwrap();
    /// assert!(!out.is_ok());
    /// ```
    #[instrument(skip(self))]
    pub async fn get_service(&self, service_id: &str) -> ActionResult<ServiceDetail> {
        let id = Uuid::parse_str(service_id.trim())
            .map_err(|e| ServiceError::lookup("fetching a service", format!("invalid id {service_id:?}: {e}")))?;
        match self.repo.get_service(id).await.map_err(|e| wrap_read("fetching a service", e))? {
            Some(detail) => Ok(ActionOutcome::Ok(detail)),
            None => Ok(ActionOutcome::not_found("service")),
        }
    }

    /// Create a service for the provider behind `user_id` and append it to the
    /// provider's list.
    #[instrument(skip(self, input), fields(user_id = %input.user_id, path = %input.path))]
    pub async fn create_service(&self, input: CreateServiceInput) -> ActionResult<ServiceRecord> {
        service::validate_create(&input).map_err(write_err)?;

        let Some(owner) = self
            .repo
            .find_provider_by_user(&input.user_id)
            .await
            .map_err(|e| wrap_write("creating service", e))?
        else {
            info!("create_service_provider_missing");
            return Ok(ActionOutcome::not_found("provider"));
        };

        let created = self
            .repo
            .create_service(owner.id, &input)
            .await
            .inspect_err(|e| warn!(error = %e, provider_id = %owner.id, "create_service_failed"))
            .map_err(|e| wrap_write("creating service", e))?;

        info!(service_id = %created.id, provider_id = %owner.id, "service_created");
        self.cache.revalidate(&input.path).await;
        Ok(ActionOutcome::Ok(created))
    }

    /// Services of the provider behind `user_id`, in list order. A missing
    /// provider is a lookup failure; no services is an empty list.
    #[instrument(skip(self))]
    pub async fn fetch_services(&self, user_id: &str) -> Result<Vec<ServiceRecord>, ServiceError> {
        let owner = self
            .repo
            .find_provider_by_user(user_id)
            .await
            .map_err(|e| wrap_read("fetching services", e))?
            .ok_or_else(|| ServiceError::lookup("fetching services", "provider not found"))?;
        let services = self
            .repo
            .list_services(owner.id)
            .await
            .map_err(|e| wrap_read("fetching services", e))?;
        debug!(count = services.len(), "services_fetched");
        Ok(services)
    }

    /// Partial update of a service. Omitting `image_url` keeps the stored image.
    #[instrument(skip(self, input), fields(service_id = %input.service_id, path = %input.path))]
    pub async fn update_service(&self, input: UpdateServiceInput) -> ActionResult<ServiceRecord> {
        service::validate_update(&input).map_err(write_err)?;
        match self.repo.update_service(&input).await.map_err(|e| wrap_write("updating service", e))? {
            Some(updated) => {
                info!(image_replaced = input.image_url.is_some(), "service_updated");
                self.cache.revalidate(&input.path).await;
                Ok(ActionOutcome::Ok(updated))
            }
            None => Ok(ActionOutcome::not_found("service")),
        }
    }

    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: &str) -> ActionResult<ProviderProfile> {
        match self.repo.find_provider_by_user(user_id).await.map_err(|e| wrap_read("fetching profile", e))? {
            Some(p) => Ok(ActionOutcome::Ok(p)),
            None => Ok(ActionOutcome::not_found("provider")),
        }
    }

    /// Apply the profile form. Company names are unique across providers.
    #[instrument(skip(self, input), fields(user_id = %input.user_id, path = %input.path))]
    pub async fn update_profile(&self, input: UpdateProfileInput) -> ActionResult<ProviderProfile> {
        provider::validate_profile(&input).map_err(write_err)?;

        let Some(current) = self
            .repo
            .find_provider_by_user(&input.user_id)
            .await
            .map_err(|e| wrap_write("updating profile", e))?
        else {
            return Ok(ActionOutcome::not_found("provider"));
        };

        if self
            .repo
            .company_name_taken(&input.company_name, current.id)
            .await
            .map_err(|e| wrap_write("updating profile", e))?
        {
            info!(company_name = %input.company_name, "profile_company_conflict");
            return Ok(ActionOutcome::Conflict("company already exists".into()));
        }

        match self.repo.update_profile(current.id, &input).await.map_err(|e| wrap_write("updating profile", e)) {
            Ok(Some(updated)) => {
                info!(provider_id = %updated.id, "profile_updated");
                self.cache.revalidate(&input.path).await;
                Ok(ActionOutcome::Ok(updated))
            }
            Ok(None) => Ok(ActionOutcome::not_found("provider")),
            // another writer claimed the name after the check above
            Err(ServiceError::Conflict(m)) => {
                info!(company_name = %input.company_name, reason = %m, "profile_write_conflict");
                Ok(ActionOutcome::Conflict(m))
            }
            Err(e) => Err(e),
        }
    }

    /// Register a provider. Account creation itself happens elsewhere; this
    /// backs seeding and tests.
    #[instrument(skip(self, input), fields(user_id = %input.user_id))]
    pub async fn register_provider(&self, input: NewProvider) -> ActionResult<ProviderProfile> {
        provider::validate_new(&input).map_err(write_err)?;
        if self.repo.find_provider_by_user(&input.user_id).await.map_err(|e| wrap_write("registering provider", e))?.is_some() {
            return Ok(ActionOutcome::Conflict("provider already registered".into()));
        }
        if self
            .repo
            .company_name_taken(&input.company_name, Uuid::nil())
            .await
            .map_err(|e| wrap_write("registering provider", e))?
        {
            return Ok(ActionOutcome::Conflict("company already exists".into()));
        }
        match self.repo.insert_provider(&input).await.map_err(|e| wrap_write("registering provider", e)) {
            Ok(created) => {
                info!(provider_id = %created.id, "provider_registered");
                Ok(ActionOutcome::Ok(created))
            }
            Err(ServiceError::Conflict(m)) => Ok(ActionOutcome::Conflict(m)),
            Err(e) => Err(e),
        }
    }
}
