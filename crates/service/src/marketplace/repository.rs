use async_trait::async_trait;
use uuid::Uuid;

use common::types::{
    CreateServiceInput, NewProvider, ProviderProfile, ServiceDetail, ServiceRecord, UpdateProfileInput,
    UpdateServiceInput,
};

use crate::errors::ServiceError;

/// Persistence abstraction for providers and their services.
///
/// Reads fail with `ServiceError::Lookup`, writes with `ServiceError::Persistence`,
/// and writes rejected by a unique key (user id, company name) with
/// `ServiceError::Conflict`.
#[async_trait]
pub trait MarketplaceRepository: Send + Sync {
    async fn find_provider_by_user(&self, user_id: &str) -> Result<Option<ProviderProfile>, ServiceError>;
    async fn insert_provider(&self, input: &NewProvider) -> Result<ProviderProfile, ServiceError>;
    /// `None` when the provider no longer exists.
    async fn update_profile(&self, provider_id: Uuid, input: &UpdateProfileInput) -> Result<Option<ProviderProfile>, ServiceError>;
    async fn company_name_taken(&self, company_name: &str, except: Uuid) -> Result<bool, ServiceError>;

    /// Service with its provider populated.
    async fn get_service(&self, service_id: Uuid) -> Result<Option<ServiceDetail>, ServiceError>;
    /// Services of the provider in list order.
    async fn list_services(&self, provider_id: Uuid) -> Result<Vec<ServiceRecord>, ServiceError>;
    /// Persist the service and append it to the provider's list as one unit.
    /// Fails with `ServiceError::Consistency` and writes nothing when the
    /// provider is gone by the time the list is updated.
    async fn create_service(&self, provider_id: Uuid, input: &CreateServiceInput) -> Result<ServiceRecord, ServiceError>;
    /// `None` when no service has that id.
    async fn update_service(&self, input: &UpdateServiceInput) -> Result<Option<ServiceRecord>, ServiceError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    struct State {
        providers: HashMap<Uuid, ProviderProfile>,
        services: HashMap<Uuid, ServiceRecord>,
    }

    #[derive(Default)]
    pub struct MockMarketplaceRepository {
        state: Mutex<State>,
        /// Next `create_service` loses its provider between insert and append.
        vanish_provider_on_append: AtomicBool,
        /// Every write fails as if the store were unreachable.
        fail_writes: AtomicBool,
        /// `company_name_taken` answers false, as when another writer claims
        /// the name between the check and the write.
        stale_company_checks: AtomicBool,
    }

    impl MockMarketplaceRepository {
        pub fn vanish_provider_on_next_append(&self) {
            self.vanish_provider_on_append.store(true, Ordering::SeqCst);
        }

        pub fn set_fail_writes(&self, fail: bool) {
            self.fail_writes.store(fail, Ordering::SeqCst);
        }

        pub fn set_stale_company_checks(&self, stale: bool) {
            self.stale_company_checks.store(stale, Ordering::SeqCst);
        }

        /// Number of stored services, including any not referenced by a provider.
        pub fn service_count(&self) -> usize {
            self.state.lock().map(|s| s.services.len()).unwrap_or_default()
        }

        fn lock(&self) -> Result<MutexGuard<'_, State>, ServiceError> {
            self.state.lock().map_err(|_| ServiceError::Persistence("mock store poisoned".into()))
        }

        fn check_writable(&self) -> Result<(), ServiceError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(ServiceError::Persistence("store unavailable".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl MarketplaceRepository for MockMarketplaceRepository {
        async fn find_provider_by_user(&self, user_id: &str) -> Result<Option<ProviderProfile>, ServiceError> {
            let state = self.lock()?;
            Ok(state.providers.values().find(|p| p.user_id == user_id).cloned())
        }

        async fn insert_provider(&self, input: &NewProvider) -> Result<ProviderProfile, ServiceError> {
            self.check_writable()?;
            let mut state = self.lock()?;
            if state.providers.values().any(|p| p.user_id == input.user_id.trim()) {
                return Err(ServiceError::Conflict("provider already registered".into()));
            }
            if state.providers.values().any(|p| p.company_name == input.company_name.trim()) {
                return Err(ServiceError::Conflict("company already exists".into()));
            }
            let profile = ProviderProfile {
                id: Uuid::new_v4(),
                user_id: input.user_id.trim().to_string(),
                image_url: None,
                company_name: input.company_name.trim().to_string(),
                type_of_provider: input.type_of_provider.clone(),
                phone_number: input.phone_number.clone(),
                experience_years: input.experience_years,
                hourly_rate: input.hourly_rate,
                bio: input.bio.clone(),
                operating_days: input.operating_days.clone(),
                start_time: input.start_time.clone(),
                end_time: input.end_time.clone(),
                services_offered: vec![],
            };
            state.providers.insert(profile.id, profile.clone());
            Ok(profile)
        }

        async fn update_profile(&self, provider_id: Uuid, input: &UpdateProfileInput) -> Result<Option<ProviderProfile>, ServiceError> {
            self.check_writable()?;
            let mut state = self.lock()?;
            let company_name = input.company_name.trim();
            if state.providers.values().any(|p| p.id != provider_id && p.company_name == company_name) {
                return Err(ServiceError::Conflict("company already exists".into()));
            }
            let Some(p) = state.providers.get_mut(&provider_id) else { return Ok(None) };
            p.company_name = company_name.to_string();
            p.type_of_provider = input.type_of_provider.clone();
            p.phone_number = input.phone_number.clone();
            p.experience_years = input.experience_years;
            p.hourly_rate = input.hourly_rate;
            p.bio = input.bio.clone();
            p.operating_days = input.operating_days.clone();
            p.start_time = input.start_time.clone();
            p.end_time = input.end_time.clone();
            if let Some(url) = input.image_url.as_deref().filter(|u| !u.trim().is_empty()) {
                p.image_url = Some(url.to_string());
            }
            Ok(Some(p.clone()))
        }

        async fn company_name_taken(&self, company_name: &str, except: Uuid) -> Result<bool, ServiceError> {
            if self.stale_company_checks.load(Ordering::SeqCst) {
                return Ok(false);
            }
            let state = self.lock()?;
            Ok(state.providers.values().any(|p| p.id != except && p.company_name == company_name.trim()))
        }

        async fn get_service(&self, service_id: Uuid) -> Result<Option<ServiceDetail>, ServiceError> {
            let state = self.lock()?;
            let Some(service) = state.services.get(&service_id).cloned() else { return Ok(None) };
            let provider = state
                .providers
                .get(&service.provider_id)
                .cloned()
                .ok_or_else(|| ServiceError::Consistency(format!("service {service_id} references a missing provider")))?;
            Ok(Some(ServiceDetail { service, provider }))
        }

        async fn list_services(&self, provider_id: Uuid) -> Result<Vec<ServiceRecord>, ServiceError> {
            let state = self.lock()?;
            let Some(p) = state.providers.get(&provider_id) else { return Ok(vec![]) };
            Ok(p.services_offered.iter().filter_map(|id| state.services.get(id).cloned()).collect())
        }

        async fn create_service(&self, provider_id: Uuid, input: &CreateServiceInput) -> Result<ServiceRecord, ServiceError> {
            self.check_writable()?;
            let mut state = self.lock()?;
            let record = ServiceRecord {
                id: Uuid::new_v4(),
                provider_id,
                image_url: input.image_url.clone(),
                service_name: input.service_name.clone(),
                type_of_service: input.type_of_service.clone(),
                description: input.description.clone(),
                duration: input.duration,
                price: input.price,
            };
            state.services.insert(record.id, record.clone());

            if self.vanish_provider_on_append.swap(false, Ordering::SeqCst) {
                state.providers.remove(&provider_id);
            }
            match state.providers.get_mut(&provider_id) {
                Some(p) => {
                    p.services_offered.push(record.id);
                    Ok(record)
                }
                None => {
                    // roll back the insert
                    state.services.remove(&record.id);
                    Err(ServiceError::Consistency("provider not found or update has failed".into()))
                }
            }
        }

        async fn update_service(&self, input: &UpdateServiceInput) -> Result<Option<ServiceRecord>, ServiceError> {
            self.check_writable()?;
            let mut state = self.lock()?;
            let Some(s) = state.services.get_mut(&input.service_id) else { return Ok(None) };
            s.service_name = input.service_name.clone();
            s.type_of_service = input.type_of_service.clone();
            s.description = input.description.clone();
            s.duration = input.duration;
            s.price = input.price;
            if let Some(url) = input.image_url.as_deref().filter(|u| !u.trim().is_empty()) {
                s.image_url = url.to_string();
            }
            Ok(Some(s.clone()))
        }
    }
}
