use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::{BookingStatus, BudgetCategory, EngineError, ResultEngine};

mod access;
mod bookings;
mod budget;
mod reconcile;
mod vendors;
mod weddings;

pub use reconcile::{BudgetSyncError, BudgetSyncReport};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// Fields for creating a wedding profile.
#[derive(Clone, Debug)]
pub struct NewWedding {
    pub bride_name: String,
    pub groom_name: String,
    pub wedding_date: NaiveDate,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub total_budget_minor: i64,
    pub notes: Option<String>,
}

/// Partial update for a wedding profile. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct WeddingPatch {
    pub bride_name: Option<String>,
    pub groom_name: Option<String>,
    pub wedding_date: Option<NaiveDate>,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub total_budget_minor: Option<i64>,
    pub notes: Option<String>,
}

/// Fields for creating a booking.
///
/// Either `vendor_id` or the manual vendor fields should carry the display
/// identity; neither is enforced (matching the store schema).
#[derive(Clone, Debug)]
pub struct NewBooking {
    pub vendor_id: Option<Uuid>,
    pub vendor_name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub service_type: String,
    pub event_date: NaiveDate,
    pub status: Option<BookingStatus>,
    pub total_amount_minor: i64,
    pub advance_paid_minor: i64,
    pub notes: Option<String>,
}

/// Partial update for a booking (couple edit path).
#[derive(Clone, Debug, Default)]
pub struct BookingPatch {
    pub vendor_name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub service_type: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub status: Option<BookingStatus>,
    pub total_amount_minor: Option<i64>,
    pub notes: Option<String>,
}

/// Partial update for a budget line.
#[derive(Clone, Debug, Default)]
pub struct BudgetLinePatch {
    pub category: Option<BudgetCategory>,
    pub estimated_cost_minor: Option<i64>,
    pub actual_cost_minor: Option<i64>,
    pub notes: Option<String>,
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn require_non_negative(amount_minor: i64, label: &str) -> ResultEngine<i64> {
    if amount_minor < 0 {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be >= 0"
        )));
    }
    Ok(amount_minor)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
