use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use common::types::{NewProvider, OperatingDays, ProviderProfile, UpdateProfileInput};
use common::validation;

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "provider")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: String,
    #[sea_orm(unique)]
    pub company_name: String,
    pub type_of_provider: String,
    pub phone_number: String,
    pub experience_years: i32,
    pub hourly_rate: i32,
    #[sea_orm(column_type = "Text")]
    pub bio: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub operating_days: Json,
    pub start_time: String,
    pub end_time: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub image_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Service,
    ProviderService,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Service => Entity::has_many(crate::service::Entity).into(),
            Relation::ProviderService => Entity::has_many(crate::provider_service::Entity).into(),
        }
    }
}

impl Related<crate::service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl Related<crate::provider_service::Entity> for Entity {
    fn to() -> RelationDef { Relation::ProviderService.def() }
}

impl ActiveModelBehavior for ActiveModel {}

fn check(field: &str, res: validation::FieldResult<()>) -> Result<(), ModelError> {
    res.map_err(|msg| ModelError::field(field, msg))
}

fn to_column_int(field: &str, v: u32) -> Result<i32, ModelError> {
    i32::try_from(v).map_err(|_| ModelError::field(field, "is too large".into()))
}

/// Rules applied to every profile write.
pub fn validate_profile(input: &UpdateProfileInput) -> Result<(), ModelError> {
    check("companyName", validation::company_name(&input.company_name))?;
    check("typeOfProvider", validation::type_of_provider(&input.type_of_provider))?;
    check("phoneNumber", validation::phone_number(&input.phone_number))?;
    check("bio", validation::bio(&input.bio))?;
    check("startTime", validation::time_of_day(&input.start_time))?;
    check("endTime", validation::time_of_day(&input.end_time))?;
    if let Some(url) = &input.image_url {
        check("image_url", validation::image_url(url))?;
    }
    to_column_int("experienceYears", input.experience_years)?;
    to_column_int("hourlyRate", input.hourly_rate)?;
    Ok(())
}

/// Registration only requires identity and contact fields; the rest is
/// completed later through the profile form.
pub fn validate_new(input: &NewProvider) -> Result<(), ModelError> {
    if input.user_id.trim().is_empty() {
        return Err(ModelError::Validation("userId required".into()));
    }
    check("companyName", validation::company_name(&input.company_name))?;
    check("typeOfProvider", validation::type_of_provider(&input.type_of_provider))?;
    check("phoneNumber", validation::phone_number(&input.phone_number))?;
    Ok(())
}

fn days_to_json(days: &OperatingDays) -> Result<Json, ModelError> {
    serde_json::to_value(days).map_err(|e| ModelError::Corrupt(e.to_string()))
}

pub async fn create<C: ConnectionTrait>(db: &C, input: &NewProvider) -> Result<Model, ModelError> {
    validate_new(input)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(input.user_id.trim().to_string()),
        company_name: Set(input.company_name.trim().to_string()),
        type_of_provider: Set(input.type_of_provider.trim().to_string()),
        phone_number: Set(input.phone_number.trim().to_string()),
        experience_years: Set(to_column_int("experienceYears", input.experience_years)?),
        hourly_rate: Set(to_column_int("hourlyRate", input.hourly_rate)?),
        bio: Set(input.bio.clone()),
        operating_days: Set(days_to_json(&input.operating_days)?),
        start_time: Set(input.start_time.clone()),
        end_time: Set(input.end_time.clone()),
        image_url: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    // unique keys on user_id/company_name surface as ModelError::Conflict
    am.insert(db).await.map_err(ModelError::from)
}

pub async fn find_by_user_id<C: ConnectionTrait>(db: &C, user_id: &str) -> Result<Option<Model>, ModelError> {
    Entity::find()
        .filter(Column::UserId.eq(user_id.to_string()))
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Whether a provider other than `except` already uses `company_name`.
pub async fn company_name_taken<C: ConnectionTrait>(db: &C, company_name: &str, except: Uuid) -> Result<bool, ModelError> {
    let found = Entity::find()
        .filter(Column::CompanyName.eq(company_name.trim().to_string()))
        .filter(Column::Id.ne(except))
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(found.is_some())
}

/// Active model carrying a profile update; the stored image is kept unless a
/// non-empty `image_url` is supplied.
pub fn profile_update(found: Model, input: &UpdateProfileInput) -> Result<ActiveModel, ModelError> {
    let mut am: ActiveModel = found.into();
    am.company_name = Set(input.company_name.trim().to_string());
    am.type_of_provider = Set(input.type_of_provider.trim().to_string());
    am.phone_number = Set(input.phone_number.trim().to_string());
    am.experience_years = Set(to_column_int("experienceYears", input.experience_years)?);
    am.hourly_rate = Set(to_column_int("hourlyRate", input.hourly_rate)?);
    am.bio = Set(input.bio.clone());
    am.operating_days = Set(days_to_json(&input.operating_days)?);
    am.start_time = Set(input.start_time.trim().to_string());
    am.end_time = Set(input.end_time.trim().to_string());
    if let Some(url) = input.image_url.as_deref().filter(|u| !u.trim().is_empty()) {
        am.image_url = Set(Some(url.to_string()));
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am)
}

impl Model {
    pub fn operating_days(&self) -> Result<OperatingDays, ModelError> {
        serde_json::from_value(self.operating_days.clone())
            .map_err(|e| ModelError::Corrupt(format!("provider {} operating_days: {e}", self.id)))
    }

    /// Business view of the row; `services` is the provider's ordered list.
    pub fn into_profile(self, services: Vec<Uuid>) -> Result<ProviderProfile, ModelError> {
        let operating_days = self.operating_days()?;
        let experience_years = u32::try_from(self.experience_years)
            .map_err(|_| ModelError::Corrupt(format!("provider {} experience_years", self.id)))?;
        let hourly_rate = u32::try_from(self.hourly_rate)
            .map_err(|_| ModelError::Corrupt(format!("provider {} hourly_rate", self.id)))?;
        Ok(ProviderProfile {
            id: self.id,
            user_id: self.user_id,
            image_url: self.image_url,
            company_name: self.company_name,
            type_of_provider: self.type_of_provider,
            phone_number: self.phone_number,
            experience_years,
            hourly_rate,
            bio: self.bio,
            operating_days,
            start_time: self.start_time,
            end_time: self.end_time,
            services_offered: services,
        })
    }
}
