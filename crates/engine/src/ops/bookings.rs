use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Booking, BookingStatus, EngineError, ResultEngine, bookings};

use super::{
    BookingPatch, Engine, NewBooking, normalize_optional_text, normalize_required_name,
    require_non_negative, with_tx,
};

impl Engine {
    /// Creates a booking request against the caller's wedding.
    ///
    /// A linked `vendor_id` must exist in the store; manual vendor fields are
    /// stored as given. Amounts are validated non-negative here, so only
    /// out-of-band writes can put malformed amounts in the store.
    pub async fn new_booking(
        &self,
        wedding_id: Option<&str>,
        user_id: &str,
        input: NewBooking,
    ) -> ResultEngine<Uuid> {
        let service_type = normalize_required_name(&input.service_type, "service type")?;
        let total_amount_minor = require_non_negative(input.total_amount_minor, "total amount")?;
        let advance_paid_minor = require_non_negative(input.advance_paid_minor, "advance paid")?;
        let status = input.status.unwrap_or(BookingStatus::Pending);

        with_tx!(self, |db_tx| {
            let wedding = self
                .resolve_owned_wedding(&db_tx, wedding_id, user_id)
                .await?;
            if let Some(vendor_id) = input.vendor_id {
                self.require_vendor_in_store(&db_tx, vendor_id).await?;
            }

            let id = Uuid::new_v4();
            let active = bookings::ActiveModel {
                id: ActiveValue::Set(id.to_string()),
                wedding_id: ActiveValue::Set(wedding.id),
                vendor_id: ActiveValue::Set(input.vendor_id.map(|v| v.to_string())),
                vendor_name: ActiveValue::Set(normalize_optional_text(
                    input.vendor_name.as_deref(),
                )),
                contact_person: ActiveValue::Set(normalize_optional_text(
                    input.contact_person.as_deref(),
                )),
                email: ActiveValue::Set(normalize_optional_text(input.email.as_deref())),
                phone: ActiveValue::Set(normalize_optional_text(input.phone.as_deref())),
                address: ActiveValue::Set(normalize_optional_text(input.address.as_deref())),
                service_type: ActiveValue::Set(service_type),
                event_date: ActiveValue::Set(input.event_date),
                status: ActiveValue::Set(status.as_str().to_string()),
                total_amount_minor: ActiveValue::Set(total_amount_minor),
                advance_paid_minor: ActiveValue::Set(advance_paid_minor),
                final_paid_minor: ActiveValue::Set(0),
                notes: ActiveValue::Set(normalize_optional_text(input.notes.as_deref())),
                created_at: ActiveValue::Set(Utc::now()),
            };
            active.insert(&db_tx).await?;
            Ok(id)
        })
    }

    /// Returns one booking; readable by the owning couple or the linked
    /// vendor account.
    pub async fn booking(&self, booking_id: Uuid, user_id: &str) -> ResultEngine<Booking> {
        with_tx!(self, |db_tx| {
            let model = self.require_booking(&db_tx, booking_id).await?;

            let wedding = self
                .find_wedding_by_id(&db_tx, &model.wedding_id)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("wedding not exists".to_string()))?;
            let is_couple = wedding.couple_id == user_id;
            let is_vendor = match model.vendor_id.as_deref() {
                Some(vendor_id) => self
                    .find_vendor_for_user(&db_tx, user_id)
                    .await?
                    .is_some_and(|v| v.id == vendor_id),
                None => false,
            };
            if !is_couple && !is_vendor {
                return Err(EngineError::KeyNotFound("booking not exists".to_string()));
            }

            Booking::try_from(model)
        })
    }

    /// Lists the couple's bookings, newest first.
    pub async fn list_bookings(
        &self,
        wedding_id: Option<&str>,
        user_id: &str,
    ) -> ResultEngine<Vec<Booking>> {
        with_tx!(self, |db_tx| {
            let wedding = self
                .resolve_owned_wedding(&db_tx, wedding_id, user_id)
                .await?;
            let models = bookings::Entity::find()
                .filter(bookings::Column::WeddingId.eq(wedding.id))
                .order_by_desc(bookings::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Booking::try_from).collect()
        })
    }

    /// Lists bookings addressed to the caller's vendor profile, newest first.
    pub async fn vendor_bookings(&self, user_id: &str) -> ResultEngine<Vec<Booking>> {
        with_tx!(self, |db_tx| {
            let vendor = self.require_vendor_profile(&db_tx, user_id).await?;
            let models = bookings::Entity::find()
                .filter(bookings::Column::VendorId.eq(vendor.id))
                .order_by_desc(bookings::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(Booking::try_from).collect()
        })
    }

    /// Couple edit of a booking.
    ///
    /// Accepts any of the four statuses (cancelling is only reachable here).
    /// When the edit moves a booking into `confirmed` from any other status,
    /// the budget ledger is reconciled after the edit commits; a failed
    /// reconciliation is logged and never fails the edit itself.
    pub async fn update_booking(
        &self,
        booking_id: Uuid,
        user_id: &str,
        patch: BookingPatch,
    ) -> ResultEngine<Booking> {
        let (old_status, updated) = with_tx!(self, |db_tx| {
            let (model, _wedding) = self
                .require_booking_owned(&db_tx, booking_id, user_id)
                .await?;
            let old_status = BookingStatus::try_from(model.status.as_str())?;

            let mut active = <bookings::ActiveModel as sea_orm::ActiveModelTrait>::default();
            if patch.vendor_name.is_some() {
                active.vendor_name =
                    ActiveValue::Set(normalize_optional_text(patch.vendor_name.as_deref()));
            }
            if patch.contact_person.is_some() {
                active.contact_person =
                    ActiveValue::Set(normalize_optional_text(patch.contact_person.as_deref()));
            }
            if patch.email.is_some() {
                active.email = ActiveValue::Set(normalize_optional_text(patch.email.as_deref()));
            }
            if patch.phone.is_some() {
                active.phone = ActiveValue::Set(normalize_optional_text(patch.phone.as_deref()));
            }
            if patch.address.is_some() {
                active.address =
                    ActiveValue::Set(normalize_optional_text(patch.address.as_deref()));
            }
            if let Some(service_type) = patch.service_type.as_deref() {
                active.service_type =
                    ActiveValue::Set(normalize_required_name(service_type, "service type")?);
            }
            if let Some(event_date) = patch.event_date {
                active.event_date = ActiveValue::Set(event_date);
            }
            if let Some(status) = patch.status {
                active.status = ActiveValue::Set(status.as_str().to_string());
            }
            if let Some(total_amount_minor) = patch.total_amount_minor {
                active.total_amount_minor =
                    ActiveValue::Set(require_non_negative(total_amount_minor, "total amount")?);
            }
            if patch.notes.is_some() {
                active.notes = ActiveValue::Set(normalize_optional_text(patch.notes.as_deref()));
            }

            // An empty patch is a no-op, not an empty UPDATE.
            let updated = if active.is_changed() {
                active.id = ActiveValue::Set(model.id.clone());
                active.update(&db_tx).await?
            } else {
                model
            };
            Ok::<_, EngineError>((old_status, updated))
        })?;

        self.reconcile_if_newly_confirmed(&updated, old_status).await;
        Booking::try_from(updated)
    }

    /// Vendor accept/reject. Only `confirmed` and `rejected` are valid here.
    ///
    /// Accepting reconciles the budget ledger after the save commits, with
    /// the same best-effort policy as couple edits.
    pub async fn update_booking_status(
        &self,
        booking_id: Uuid,
        user_id: &str,
        status: BookingStatus,
    ) -> ResultEngine<Booking> {
        if !matches!(status, BookingStatus::Confirmed | BookingStatus::Rejected) {
            return Err(EngineError::InvalidStatus(
                "use \"confirmed\" or \"rejected\"".to_string(),
            ));
        }

        let (old_status, updated) = with_tx!(self, |db_tx| {
            let model = self.require_booking(&db_tx, booking_id).await?;
            let vendor = self.require_vendor_profile(&db_tx, user_id).await?;
            if model.vendor_id.as_deref() != Some(vendor.id.as_str()) {
                return Err(EngineError::KeyNotFound("booking not exists".to_string()));
            }
            let old_status = BookingStatus::try_from(model.status.as_str())?;

            let active = bookings::ActiveModel {
                id: ActiveValue::Set(model.id.clone()),
                status: ActiveValue::Set(status.as_str().to_string()),
                ..Default::default()
            };
            let updated = active.update(&db_tx).await?;
            Ok::<_, EngineError>((old_status, updated))
        })?;

        self.reconcile_if_newly_confirmed(&updated, old_status).await;
        Booking::try_from(updated)
    }

    /// Records advance/final payments against a booking.
    pub async fn update_payment(
        &self,
        booking_id: Uuid,
        user_id: &str,
        advance_paid_minor: Option<i64>,
        final_paid_minor: Option<i64>,
    ) -> ResultEngine<Booking> {
        with_tx!(self, |db_tx| {
            let (model, _wedding) = self
                .require_booking_owned(&db_tx, booking_id, user_id)
                .await?;

            let mut active = <bookings::ActiveModel as sea_orm::ActiveModelTrait>::default();
            if let Some(advance) = advance_paid_minor {
                active.advance_paid_minor =
                    ActiveValue::Set(require_non_negative(advance, "advance paid")?);
            }
            if let Some(fin) = final_paid_minor {
                active.final_paid_minor =
                    ActiveValue::Set(require_non_negative(fin, "final paid")?);
            }

            let updated = if active.is_changed() {
                active.id = ActiveValue::Set(model.id.clone());
                active.update(&db_tx).await?
            } else {
                model
            };
            Booking::try_from(updated)
        })
    }

    /// Deletes a booking; owning couple only.
    pub async fn delete_booking(&self, booking_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let (model, _wedding) = self
                .require_booking_owned(&db_tx, booking_id, user_id)
                .await?;
            bookings::Entity::delete_by_id(model.id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
