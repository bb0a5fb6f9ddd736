//! Vendor bookings.
//!
//! A booking ties a wedding to a service provider, either a registered
//! vendor profile (`vendor_id`) or manual vendor details typed in by the
//! couple. Confirmed bookings feed the budget ledger through the
//! reconciliation ops.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for BookingStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::InvalidStatus(format!(
                "invalid booking status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub wedding_id: String,
    pub vendor_id: Option<Uuid>,
    pub vendor_name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub service_type: String,
    pub event_date: NaiveDate,
    pub status: BookingStatus,
    pub total_amount_minor: i64,
    pub advance_paid_minor: i64,
    pub final_paid_minor: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Outstanding balance: total minus everything paid so far.
    pub fn remaining_amount_minor(&self) -> i64 {
        self.total_amount_minor - (self.advance_paid_minor + self.final_paid_minor)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub wedding_id: String,
    pub vendor_id: Option<String>,
    pub vendor_name: Option<String>,
    pub contact_person: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub service_type: String,
    pub event_date: Date,
    pub status: String,
    pub total_amount_minor: i64,
    pub advance_paid_minor: i64,
    pub final_paid_minor: i64,
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
    #[sea_orm(
        belongs_to = "super::vendors::Entity",
        from = "Column::VendorId",
        to = "super::vendors::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Vendors,
}

impl Related<super::weddings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Weddings.def()
    }
}

impl Related<super::vendors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Booking {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&model.id)
            .map_err(|_| EngineError::InvalidId("invalid booking id".to_string()))?;
        let vendor_id = model
            .vendor_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|_| EngineError::InvalidId("invalid vendor id".to_string()))?;
        let status = BookingStatus::try_from(model.status.as_str())?;
        Ok(Self {
            id,
            wedding_id: model.wedding_id,
            vendor_id,
            vendor_name: model.vendor_name,
            contact_person: model.contact_person,
            email: model.email,
            phone: model.phone,
            address: model.address,
            service_type: model.service_type,
            event_date: model.event_date,
            status,
            total_amount_minor: model.total_amount_minor,
            advance_paid_minor: model.advance_paid_minor,
            final_paid_minor: model.final_paid_minor,
            notes: model.notes,
            created_at: model.created_at,
        })
    }
}

impl From<&Booking> for Model {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            wedding_id: booking.wedding_id.clone(),
            vendor_id: booking.vendor_id.map(|id| id.to_string()),
            vendor_name: booking.vendor_name.clone(),
            contact_person: booking.contact_person.clone(),
            email: booking.email.clone(),
            phone: booking.phone.clone(),
            address: booking.address.clone(),
            service_type: booking.service_type.clone(),
            event_date: booking.event_date,
            status: booking.status.as_str().to_string(),
            total_amount_minor: booking.total_amount_minor,
            advance_paid_minor: booking.advance_paid_minor,
            final_paid_minor: booking.final_paid_minor,
            notes: booking.notes.clone(),
            created_at: booking.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(total: i64, advance: i64, fin: i64) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            wedding_id: "w".to_string(),
            vendor_id: None,
            vendor_name: None,
            contact_person: None,
            email: None,
            phone: None,
            address: None,
            service_type: "catering".to_string(),
            event_date: NaiveDate::from_ymd_opt(2026, 9, 10).unwrap(),
            status: BookingStatus::Pending,
            total_amount_minor: total,
            advance_paid_minor: advance,
            final_paid_minor: fin,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn remaining_amount_subtracts_both_payments() {
        assert_eq!(booking(10_000, 3_000, 2_000).remaining_amount_minor(), 5_000);
        assert_eq!(booking(0, 0, 0).remaining_amount_minor(), 0);
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::Rejected,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::try_from(status.as_str()).unwrap(), status);
        }
        assert!(BookingStatus::try_from("paused").is_err());
    }
}
