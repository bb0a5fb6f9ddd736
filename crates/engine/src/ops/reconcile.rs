//! Booking-to-budget reconciliation.
//!
//! Two policies write the same fact (a confirmed booking's total) into the
//! ledger with different merge rules:
//!
//! - a single confirmation ADDS the booking total to the category's actual
//!   cost, so several bookings accumulate into one line;
//! - the bulk sync CONVERGES the actual cost up to the booking total
//!   (replace-if-lower), so re-running it is idempotent.
//!
//! The asymmetry is kept on purpose; callers depend on both behaviors.
//! Budget writes use single conditional UPDATE statements instead of
//! read-modify-write, so concurrent confirmations in the same category
//! cannot lose updates, and the unique `(wedding_id, category)` index
//! resolves create races (the loser folds into the winner's line).

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, SqlErr, Statement, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{Booking, BookingStatus, BudgetCategory, EngineError, ResultEngine, bookings, budget_lines};

use super::{Engine, with_tx};

/// Outcome of a bulk budget sync.
///
/// The batch as a whole always succeeds; per-booking failures are collected
/// here instead of aborting the pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetSyncReport {
    pub synced_count: usize,
    pub total_confirmed: usize,
    pub errors: Vec<BudgetSyncError>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetSyncError {
    pub booking_id: String,
    pub error: String,
}

impl Engine {
    /// Best-effort reconciliation hook for booking saves.
    ///
    /// Edge-triggered: runs only when `booking` is now confirmed and
    /// `previous_status` was not. Never fails; a reconciliation error is
    /// logged and swallowed so the booking save it follows stays successful.
    pub async fn on_booking_confirmed(&self, booking: &Booking, previous_status: BookingStatus) {
        let model = bookings::Model::from(booking);
        self.reconcile_if_newly_confirmed(&model, previous_status)
            .await;
    }

    pub(super) async fn reconcile_if_newly_confirmed(
        &self,
        booking: &bookings::Model,
        previous_status: BookingStatus,
    ) {
        if booking.status != BookingStatus::Confirmed.as_str()
            || previous_status == BookingStatus::Confirmed
        {
            return;
        }
        if let Err(err) = self.reconcile_confirmed(booking).await {
            tracing::error!(
                booking_id = %booking.id,
                "failed to reconcile confirmed booking into budget: {err}"
            );
        }
    }

    async fn reconcile_confirmed(&self, booking: &bookings::Model) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.apply_confirmed_booking(&db_tx, booking).await
        })
    }

    /// Additive single-booking reconciliation.
    ///
    /// Increments the category line's actual cost by the booking total
    /// (estimate untouched), or creates the line with estimate = actual =
    /// total when the category has none yet.
    async fn apply_confirmed_booking(
        &self,
        db_tx: &DatabaseTransaction,
        booking: &bookings::Model,
    ) -> ResultEngine<()> {
        let total = checked_total(booking)?;
        let category = BudgetCategory::from_service_type(&booking.service_type);

        if self
            .increment_actual_cost(db_tx, &booking.wedding_id, category, total)
            .await?
        {
            return Ok(());
        }

        let display_name = self.booking_display_name(db_tx, booking).await?;
        let note = format!("Auto-created from booking: {display_name}");
        match self
            .insert_line_from_booking(db_tx, &booking.wedding_id, category, total, note)
            .await
        {
            Ok(()) => Ok(()),
            Err(EngineError::Database(err)) if is_unique_violation(&err) => {
                // Lost the create race; fold into the winner's line.
                if self
                    .increment_actual_cost(db_tx, &booking.wedding_id, category, total)
                    .await?
                {
                    Ok(())
                } else {
                    Err(EngineError::Database(err))
                }
            }
            Err(err) => Err(err),
        }
    }

    /// Bulk reconciliation of every confirmed booking for a wedding.
    ///
    /// Each booking is processed in its own transaction; a failing item is
    /// recorded in the report and the pass moves on. A second run with no
    /// intervening booking changes reports `synced_count = 0`.
    pub async fn sync_wedding_budget(
        &self,
        wedding_id: Option<&str>,
        user_id: &str,
    ) -> ResultEngine<BudgetSyncReport> {
        let (wedding_id, booking_models) = with_tx!(self, |db_tx| {
            let wedding = self
                .resolve_owned_wedding(&db_tx, wedding_id, user_id)
                .await?;
            let models = bookings::Entity::find()
                .filter(bookings::Column::WeddingId.eq(wedding.id.clone()))
                .filter(bookings::Column::Status.eq(BookingStatus::Confirmed.as_str()))
                .all(&db_tx)
                .await?;
            Ok::<_, EngineError>((wedding.id, models))
        })?;

        let mut synced_count = 0;
        let mut errors = Vec::new();
        for booking in &booking_models {
            let item: ResultEngine<bool> = with_tx!(self, |db_tx| {
                self.sync_budget_item(&db_tx, &wedding_id, booking).await
            });
            match item {
                Ok(true) => synced_count += 1,
                Ok(false) => {}
                Err(err) => {
                    tracing::warn!(booking_id = %booking.id, "budget sync skipped booking: {err}");
                    errors.push(BudgetSyncError {
                        booking_id: booking.id.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        Ok(BudgetSyncReport {
            synced_count,
            total_confirmed: booking_models.len(),
            errors,
        })
    }

    /// Ceiling reconciliation for one booking within a sync pass.
    ///
    /// Returns whether the item counted as synced: true when the line was
    /// raised or created, false when it already covers the booking total.
    async fn sync_budget_item(
        &self,
        db_tx: &DatabaseTransaction,
        wedding_id: &str,
        booking: &bookings::Model,
    ) -> ResultEngine<bool> {
        let total = checked_total(booking)?;
        let category = BudgetCategory::from_service_type(&booking.service_type);

        if self
            .find_budget_line(db_tx, wedding_id, category)
            .await?
            .is_some()
        {
            return self
                .converge_actual_cost(db_tx, wedding_id, category, total)
                .await;
        }

        let display_name = self.booking_display_name(db_tx, booking).await?;
        let note = format!("Synced from booking: {display_name}");
        match self
            .insert_line_from_booking(db_tx, wedding_id, category, total, note)
            .await
        {
            Ok(()) => Ok(true),
            Err(EngineError::Database(err)) if is_unique_violation(&err) => {
                self.converge_actual_cost(db_tx, wedding_id, category, total)
                    .await
            }
            Err(err) => Err(err),
        }
    }

    /// `actual_cost += amount` for the `(wedding, category)` line, as one
    /// statement. Returns false when no such line exists.
    async fn increment_actual_cost(
        &self,
        db_tx: &DatabaseTransaction,
        wedding_id: &str,
        category: BudgetCategory,
        amount_minor: i64,
    ) -> ResultEngine<bool> {
        let stmt = Statement::from_sql_and_values(
            db_tx.get_database_backend(),
            "UPDATE budget_lines \
             SET actual_cost_minor = actual_cost_minor + ? \
             WHERE wedding_id = ? AND category = ?",
            vec![
                amount_minor.into(),
                wedding_id.into(),
                category.as_str().into(),
            ],
        );
        let result = db_tx.execute(stmt).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Raises the line's actual cost to `amount_minor` when it is below it
    /// (and the estimate along with it), as one conditional statement.
    /// Returns false when the line already covers the amount.
    async fn converge_actual_cost(
        &self,
        db_tx: &DatabaseTransaction,
        wedding_id: &str,
        category: BudgetCategory,
        amount_minor: i64,
    ) -> ResultEngine<bool> {
        let stmt = Statement::from_sql_and_values(
            db_tx.get_database_backend(),
            "UPDATE budget_lines \
             SET actual_cost_minor = ?, \
                 estimated_cost_minor = MAX(estimated_cost_minor, ?) \
             WHERE wedding_id = ? AND category = ? AND actual_cost_minor < ?",
            vec![
                amount_minor.into(),
                amount_minor.into(),
                wedding_id.into(),
                category.as_str().into(),
                amount_minor.into(),
            ],
        );
        let result = db_tx.execute(stmt).await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_line_from_booking(
        &self,
        db_tx: &DatabaseTransaction,
        wedding_id: &str,
        category: BudgetCategory,
        amount_minor: i64,
        note: String,
    ) -> ResultEngine<()> {
        let active = budget_lines::ActiveModel {
            id: ActiveValue::Set(uuid::Uuid::new_v4().to_string()),
            wedding_id: ActiveValue::Set(wedding_id.to_string()),
            category: ActiveValue::Set(category.as_str().to_string()),
            estimated_cost_minor: ActiveValue::Set(amount_minor),
            actual_cost_minor: ActiveValue::Set(amount_minor),
            notes: ActiveValue::Set(Some(note)),
            created_at: ActiveValue::Set(chrono::Utc::now()),
        };
        active.insert(db_tx).await?;
        Ok(())
    }
}

fn checked_total(booking: &bookings::Model) -> ResultEngine<i64> {
    if booking.total_amount_minor < 0 {
        return Err(EngineError::InvalidAmount(
            "booking total amount must be >= 0".to_string(),
        ));
    }
    Ok(booking.total_amount_minor)
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
