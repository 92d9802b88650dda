use sea_orm::{entity::prelude::*, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use common::types::{CreateServiceInput, ServiceRecord, UpdateServiceInput};
use common::validation;

use crate::errors::ModelError;
use crate::provider;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub provider_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub image_url: String,
    pub service_name: String,
    pub type_of_service: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub duration: i32,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Provider,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Provider => Entity::belongs_to(provider::Entity)
                .from(Column::ProviderId)
                .to(provider::Column::Id)
                .into(),
        }
    }
}

impl Related<provider::Entity> for Entity {
    fn to() -> RelationDef { Relation::Provider.def() }
}

impl ActiveModelBehavior for ActiveModel {}

fn check(field: &str, res: validation::FieldResult<()>) -> Result<(), ModelError> {
    res.map_err(|msg| ModelError::field(field, msg))
}

fn duration_column(minutes: u32) -> Result<i32, ModelError> {
    i32::try_from(minutes).map_err(|_| ModelError::field("duration", "is too large".into()))
}

pub fn validate_fields(
    service_name: &str,
    type_of_service: &str,
    description: &str,
    duration: u32,
    price: f64,
) -> Result<(), ModelError> {
    check("serviceName", validation::service_name(service_name))?;
    check("typeOfService", validation::type_of_service(type_of_service))?;
    check("description", validation::description(description))?;
    check("duration", validation::duration_minutes(duration))?;
    check("price", validation::price(price))?;
    duration_column(duration)?;
    Ok(())
}

pub fn validate_create(input: &CreateServiceInput) -> Result<(), ModelError> {
    validate_fields(&input.service_name, &input.type_of_service, &input.description, input.duration, input.price)?;
    check("image_url", validation::image_url(&input.image_url))
}

pub fn validate_update(input: &UpdateServiceInput) -> Result<(), ModelError> {
    validate_fields(&input.service_name, &input.type_of_service, &input.description, input.duration, input.price)?;
    if let Some(url) = &input.image_url {
        check("image_url", validation::image_url(url))?;
    }
    Ok(())
}

/// New row owned by `provider_id`. Not inserted.
pub fn new_active(provider_id: Uuid, input: &CreateServiceInput) -> Result<ActiveModel, ModelError> {
    validate_create(input)?;
    let now = Utc::now().into();
    Ok(ActiveModel {
        id: Set(Uuid::new_v4()),
        provider_id: Set(provider_id),
        image_url: Set(input.image_url.trim().to_string()),
        service_name: Set(input.service_name.trim().to_string()),
        type_of_service: Set(input.type_of_service.trim().to_string()),
        description: Set(input.description.clone()),
        duration: Set(duration_column(input.duration)?),
        price: Set(input.price),
        created_at: Set(now),
        updated_at: Set(now),
    })
}

/// Partial update: required fields always written, `image_url` only when a
/// non-empty value is supplied.
pub fn apply_update(found: Model, input: &UpdateServiceInput) -> Result<ActiveModel, ModelError> {
    validate_update(input)?;
    let mut am: ActiveModel = found.into();
    am.service_name = Set(input.service_name.trim().to_string());
    am.type_of_service = Set(input.type_of_service.trim().to_string());
    am.description = Set(input.description.clone());
    am.duration = Set(duration_column(input.duration)?);
    am.price = Set(input.price);
    if let Some(url) = input.image_url.as_deref().filter(|u| !u.trim().is_empty()) {
        am.image_url = Set(url.trim().to_string());
    }
    am.updated_at = Set(Utc::now().into());
    Ok(am)
}

impl Model {
    pub fn to_record(&self) -> Result<ServiceRecord, ModelError> {
        let duration = u32::try_from(self.duration)
            .map_err(|_| ModelError::Corrupt(format!("service {} duration", self.id)))?;
        Ok(ServiceRecord {
            id: self.id,
            provider_id: self.provider_id,
            image_url: self.image_url.clone(),
            service_name: self.service_name.clone(),
            type_of_service: self.type_of_service.clone(),
            description: self.description.clone(),
            duration,
            price: self.price,
        })
    }
}
