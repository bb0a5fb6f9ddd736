use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod wedding {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WeddingNew {
        pub bride_name: String,
        pub groom_name: String,
        /// Wedding day, ISO `YYYY-MM-DD`.
        pub wedding_date: NaiveDate,
        pub venue: Option<String>,
        pub city: Option<String>,
        pub total_budget_minor: i64,
        pub notes: Option<String>,
    }

    /// Partial update; absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct WeddingUpdate {
        pub bride_name: Option<String>,
        pub groom_name: Option<String>,
        pub wedding_date: Option<NaiveDate>,
        pub venue: Option<String>,
        pub city: Option<String>,
        pub total_budget_minor: Option<i64>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WeddingView {
        pub id: String,
        pub bride_name: String,
        pub groom_name: String,
        pub wedding_date: NaiveDate,
        /// Whole days from today to the wedding; negative once it has passed.
        pub days_until: i64,
        pub venue: Option<String>,
        pub city: Option<String>,
        pub total_budget_minor: i64,
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WeddingCreated {
        pub id: String,
    }
}

pub mod vendor {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VendorNew {
        pub business_name: String,
        pub category: String,
        pub city: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VendorView {
        pub id: Uuid,
        pub business_name: String,
        pub category: String,
        pub city: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct VendorCreated {
        pub id: Uuid,
    }
}

pub mod booking {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BookingStatus {
        Pending,
        Confirmed,
        Rejected,
        Cancelled,
    }

    impl BookingStatus {
        /// Returns the canonical status string used by the engine/database.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Pending => "pending",
                Self::Confirmed => "confirmed",
                Self::Rejected => "rejected",
                Self::Cancelled => "cancelled",
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BookingNew {
        pub wedding_id: Option<String>,
        /// Registered vendor profile to book, if any.
        pub vendor_id: Option<Uuid>,
        /// Manual vendor details for providers without an account.
        pub vendor_name: Option<String>,
        pub contact_person: Option<String>,
        pub email: Option<String>,
        pub phone: Option<String>,
        pub address: Option<String>,
        pub service_type: String,
        pub event_date: NaiveDate,
        pub status: Option<BookingStatus>,
        pub total_amount_minor: i64,
        pub advance_paid_minor: Option<i64>,
        pub notes: Option<String>,
    }

    /// Partial update; absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BookingUpdate {
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

    /// Vendor accept/reject body. Only `confirmed` and `rejected` are valid.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BookingStatusUpdate {
        pub status: BookingStatus,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PaymentUpdate {
        pub advance_paid_minor: Option<i64>,
        pub final_paid_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BookingView {
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
        pub remaining_amount_minor: i64,
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BookingCreated {
        pub id: Uuid,
    }

    /// Per-status counts over the listed bookings.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BookingStats {
        pub total: usize,
        pub pending: usize,
        pub confirmed: usize,
        pub rejected: usize,
        pub cancelled: usize,
        /// Sum of confirmed booking totals.
        pub committed_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BookingListResponse {
        pub bookings: Vec<BookingView>,
        pub stats: BookingStats,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
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
        /// Returns the canonical category string used by the engine/database.
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
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetLineNew {
        pub wedding_id: Option<String>,
        pub category: BudgetCategory,
        pub estimated_cost_minor: i64,
        pub actual_cost_minor: Option<i64>,
        pub notes: Option<String>,
    }

    /// Partial update; absent fields are left untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BudgetLineUpdate {
        pub category: Option<BudgetCategory>,
        pub estimated_cost_minor: Option<i64>,
        pub actual_cost_minor: Option<i64>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetLineView {
        pub id: Uuid,
        pub wedding_id: String,
        pub category: BudgetCategory,
        pub estimated_cost_minor: i64,
        pub actual_cost_minor: i64,
        /// Spend relative to the estimate, in percent. 0 when no estimate.
        pub variance_percentage: f64,
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetLineCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BudgetSummary {
        pub total_budget_minor: i64,
        pub total_estimated_minor: i64,
        pub total_actual_minor: i64,
        /// Wedding budget minus actual spend; negative when over budget.
        pub remaining_minor: i64,
    }

    /// Warning for a category whose actual spend exceeds its estimate.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetAlert {
        pub category: BudgetCategory,
        pub overspend_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetListResponse {
        pub lines: Vec<BudgetLineView>,
        pub summary: BudgetSummary,
        pub alerts: Vec<BudgetAlert>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSyncRequest {
        pub wedding_id: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSyncResponse {
        pub synced_count: usize,
        pub total_confirmed: usize,
        /// Present only when some bookings failed to sync.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub errors: Option<Vec<BudgetSyncErrorView>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSyncErrorView {
        pub booking_id: String,
        pub error: String,
    }
}
