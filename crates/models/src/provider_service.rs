//! Ordered service list of a provider.

use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::{provider, service};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "provider_service")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub provider_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub service_id: Uuid,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Provider,
    Service,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Provider => Entity::belongs_to(provider::Entity)
                .from(Column::ProviderId)
                .to(provider::Column::Id)
                .into(),
            Relation::Service => Entity::belongs_to(service::Entity)
                .from(Column::ServiceId)
                .to(service::Column::Id)
                .into(),
        }
    }
}

impl Related<provider::Entity> for Entity {
    fn to() -> RelationDef { Relation::Provider.def() }
}

impl Related<service::Entity> for Entity {
    fn to() -> RelationDef { Relation::Service.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Append `service_id` to the end of the provider's list.
///
/// Callers must hold a lock on the provider row so two appends cannot pick
/// the same position.
pub async fn push<C: ConnectionTrait>(db: &C, provider_id: Uuid, service_id: Uuid) -> Result<Model, ModelError> {
    let last = Entity::find()
        .filter(Column::ProviderId.eq(provider_id))
        .order_by_desc(Column::Position)
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    let position = last.map(|m| m.position + 1).unwrap_or(0);
    let am = ActiveModel {
        provider_id: Set(provider_id),
        service_id: Set(service_id),
        position: Set(position),
    };
    am.insert(db).await.map_err(|e| ModelError::Db(e.to_string()))
}

/// Service ids of the provider in list order.
pub async fn list_service_ids<C: ConnectionTrait>(db: &C, provider_id: Uuid) -> Result<Vec<Uuid>, ModelError> {
    let rows = Entity::find()
        .filter(Column::ProviderId.eq(provider_id))
        .order_by_asc(Column::Position)
        .all(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(rows.into_iter().map(|r| r.service_id).collect())
}
