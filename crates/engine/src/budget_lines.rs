//! The budget ledger.
//!
//! Each wedding keeps at most one budget line per category; the unique index
//! on `(wedding_id, category)` backs that invariant in the store. Lines are
//! created manually by the couple or by the booking reconciliation ops.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

/// Closed set of ledger categories.
///
/// Adding a category means touching this enum and the service-type map below,
/// both checked at compile time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetCategory {
    Venue,
    Catering,
    Photography,
    Decoration,
    Makeup,
    Entertainment,
    Transportation,
    Invitations,
    Favors,
    Other,
}

impl BudgetCategory {
    pub const ALL: [Self; 10] = [
        Self::Venue,
        Self::Catering,
        Self::Photography,
        Self::Decoration,
        Self::Makeup,
        Self::Entertainment,
        Self::Transportation,
        Self::Invitations,
        Self::Favors,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Venue => "venue",
            Self::Catering => "catering",
            Self::Photography => "photography",
            Self::Decoration => "decoration",
            Self::Makeup => "makeup",
            Self::Entertainment => "entertainment",
            Self::Transportation => "transportation",
            Self::Invitations => "invitations",
            Self::Favors => "favors",
            Self::Other => "other",
        }
    }

    /// Maps a free-text service type onto a ledger category.
    ///
    /// Total: anything outside the fixed table (empty strings included)
    /// lands in [`BudgetCategory::Other`].
    pub fn from_service_type(service_type: &str) -> Self {
        match service_type.trim().to_lowercase().as_str() {
            "venue" => Self::Venue,
            "caterer" | "catering" => Self::Catering,
            "photographer" | "photography" => Self::Photography,
            "decorator" | "decoration" => Self::Decoration,
            "makeup" => Self::Makeup,
            "dj" | "entertainment" => Self::Entertainment,
            "transportation" => Self::Transportation,
            "invitations" => Self::Invitations,
            "favors" => Self::Favors,
            _ => Self::Other,
        }
    }
}

impl TryFrom<&str> for BudgetCategory {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "venue" => Ok(Self::Venue),
            "catering" => Ok(Self::Catering),
            "photography" => Ok(Self::Photography),
            "decoration" => Ok(Self::Decoration),
            "makeup" => Ok(Self::Makeup),
            "entertainment" => Ok(Self::Entertainment),
            "transportation" => Ok(Self::Transportation),
            "invitations" => Ok(Self::Invitations),
            "favors" => Ok(Self::Favors),
            "other" => Ok(Self::Other),
            other => Err(EngineError::InvalidCategory(format!(
                "invalid budget category: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BudgetLine {
    pub id: Uuid,
    pub wedding_id: String,
    pub category: BudgetCategory,
    pub estimated_cost_minor: i64,
    pub actual_cost_minor: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BudgetLine {
    /// Percentage by which the actual cost deviates from the estimate.
    ///
    /// A line with no estimate reports 0 rather than dividing by zero.
    pub fn variance_percentage(&self) -> f64 {
        if self.estimated_cost_minor == 0 {
            return 0.0;
        }
        ((self.actual_cost_minor - self.estimated_cost_minor) as f64
            / self.estimated_cost_minor as f64)
            * 100.0
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budget_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub wedding_id: String,
    pub category: String,
    pub estimated_cost_minor: i64,
    pub actual_cost_minor: i64,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::weddings::Entity",
        from = "Column::WeddingId",
        to = "super::weddings::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Weddings,
}

impl Related<super::weddings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Weddings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for BudgetLine {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::InvalidId("invalid budget line id".to_string()))?;
        let category = BudgetCategory::try_from(model.category.as_str())?;
        Ok(Self {
            id,
            wedding_id: model.wedding_id,
            category,
            estimated_cost_minor: model.estimated_cost_minor,
            actual_cost_minor: model.actual_cost_minor,
            notes: model.notes,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_type_mapping_matches_the_fixed_table() {
        let cases = [
            ("venue", BudgetCategory::Venue),
            ("caterer", BudgetCategory::Catering),
            ("catering", BudgetCategory::Catering),
            ("photographer", BudgetCategory::Photography),
            ("photography", BudgetCategory::Photography),
            ("decorator", BudgetCategory::Decoration),
            ("decoration", BudgetCategory::Decoration),
            ("makeup", BudgetCategory::Makeup),
            ("dj", BudgetCategory::Entertainment),
            ("entertainment", BudgetCategory::Entertainment),
            ("transportation", BudgetCategory::Transportation),
            ("invitations", BudgetCategory::Invitations),
            ("favors", BudgetCategory::Favors),
            ("other", BudgetCategory::Other),
        ];
        for (input, expected) in cases {
            assert_eq!(BudgetCategory::from_service_type(input), expected);
        }
    }

    #[test]
    fn service_type_mapping_is_total() {
        for input in ["", "   ", "fireworks", "DJ", "Catering", "PHOTOGRAPHER"] {
            let category = BudgetCategory::from_service_type(input);
            assert!(BudgetCategory::ALL.contains(&category));
        }
        assert_eq!(
            BudgetCategory::from_service_type("fireworks"),
            BudgetCategory::Other
        );
        assert_eq!(BudgetCategory::from_service_type(""), BudgetCategory::Other);
        assert_eq!(
            BudgetCategory::from_service_type("DJ"),
            BudgetCategory::Entertainment
        );
    }

    #[test]
    fn category_round_trips_through_strings() {
        for category in BudgetCategory::ALL {
            assert_eq!(
                BudgetCategory::try_from(category.as_str()).unwrap(),
                category
            );
        }
        assert!(BudgetCategory::try_from("flowers").is_err());
    }

    fn line(estimated: i64, actual: i64) -> BudgetLine {
        BudgetLine {
            id: Uuid::new_v4(),
            wedding_id: "w".to_string(),
            category: BudgetCategory::Catering,
            estimated_cost_minor: estimated,
            actual_cost_minor: actual,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn variance_is_zero_without_an_estimate() {
        assert_eq!(line(0, 50_000).variance_percentage(), 0.0);
    }

    #[test]
    fn variance_reports_percentage_over_estimate() {
        assert_eq!(line(100_000, 150_000).variance_percentage(), 50.0);
        assert_eq!(line(100_000, 75_000).variance_percentage(), -25.0);
    }
}
