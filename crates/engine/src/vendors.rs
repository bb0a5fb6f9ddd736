//! Vendor profiles.
//!
//! A vendor account owns at most one profile. Bookings may reference a
//! profile by id, or carry manual vendor fields instead.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Vendor {
    pub id: Uuid,
    pub user_id: String,
    pub business_name: String,
    pub category: String,
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vendors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub business_name: String,
    pub category: String,
    pub city: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bookings::Entity")]
    Bookings,
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Vendor {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::InvalidId("invalid vendor id".to_string()))?;
        Ok(Self {
            id,
            user_id: model.user_id,
            business_name: model.business_name,
            category: model.category,
            city: model.city,
            created_at: model.created_at,
        })
    }
}
