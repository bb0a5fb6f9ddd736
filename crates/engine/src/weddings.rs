//! The wedding profile owned by a couple account.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A wedding profile. Bookings and budget lines both hang off a wedding.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Wedding {
    pub id: String,
    pub couple_id: String,
    pub bride_name: String,
    pub groom_name: String,
    pub wedding_date: NaiveDate,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub total_budget_minor: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Wedding {
    /// Days from `today` until the wedding date (negative once it has passed).
    pub fn days_until(&self, today: NaiveDate) -> i64 {
        (self.wedding_date - today).num_days()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "weddings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub couple_id: String,
    pub bride_name: String,
    pub groom_name: String,
    pub wedding_date: Date,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub total_budget_minor: i64,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bookings::Entity")]
    Bookings,
    #[sea_orm(has_many = "super::budget_lines::Entity")]
    BudgetLines,
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl Related<super::budget_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BudgetLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Wedding {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            couple_id: model.couple_id,
            bride_name: model.bride_name,
            groom_name: model.groom_name,
            wedding_date: model.wedding_date,
            venue: model.venue,
            city: model.city,
            total_budget_minor: model.total_budget_minor,
            notes: model.notes,
            created_at: model.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_until_counts_down_to_the_date() {
        let wedding = Wedding {
            id: "w".to_string(),
            couple_id: "alice".to_string(),
            bride_name: "Lucia".to_string(),
            groom_name: "Renzo".to_string(),
            wedding_date: NaiveDate::from_ymd_opt(2026, 9, 10).unwrap(),
            venue: None,
            city: None,
            total_budget_minor: 0,
            notes: None,
            created_at: Utc::now(),
        };

        let today = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        assert_eq!(wedding.days_until(today), 9);
        let after = NaiveDate::from_ymd_opt(2026, 9, 12).unwrap();
        assert_eq!(wedding.days_until(after), -2);
    }
}
