//! Ownership lookups shared by the ops modules.
//!
//! Authorization follows the same convention as the rest of the engine:
//! a resource the caller may not touch is reported as `KeyNotFound`, so
//! callers cannot distinguish "absent" from "not yours".

use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, bookings, users, vendors, weddings};

use super::Engine;

impl Engine {
    /// Accounts are created out of band; ops that attach rows to one check
    /// it exists first so callers see `KeyNotFound` instead of a raw
    /// foreign-key failure.
    pub(super) async fn require_user(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))
    }

    pub(super) async fn find_wedding_by_id(
        &self,
        db: &DatabaseTransaction,
        wedding_id: &str,
    ) -> ResultEngine<Option<weddings::Model>> {
        weddings::Entity::find_by_id(wedding_id.to_string())
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn require_wedding_owner(
        &self,
        db: &DatabaseTransaction,
        wedding_id: &str,
        user_id: &str,
    ) -> ResultEngine<weddings::Model> {
        let model = self
            .find_wedding_by_id(db, wedding_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("wedding not exists".to_string()))?;
        if model.couple_id != user_id {
            return Err(EngineError::KeyNotFound("wedding not exists".to_string()));
        }
        Ok(model)
    }

    /// Resolves the wedding a couple operation targets.
    ///
    /// With an explicit id the wedding must belong to the caller; without
    /// one, the caller's most recently created wedding is used.
    pub(super) async fn resolve_owned_wedding(
        &self,
        db: &DatabaseTransaction,
        wedding_id: Option<&str>,
        user_id: &str,
    ) -> ResultEngine<weddings::Model> {
        if let Some(id) = wedding_id {
            return self.require_wedding_owner(db, id, user_id).await;
        }

        weddings::Entity::find()
            .filter(weddings::Column::CoupleId.eq(user_id.to_string()))
            .order_by_desc(weddings::Column::CreatedAt)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("wedding not exists".to_string()))
    }

    pub(super) async fn require_booking(
        &self,
        db: &DatabaseTransaction,
        booking_id: Uuid,
    ) -> ResultEngine<bookings::Model> {
        bookings::Entity::find_by_id(booking_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("booking not exists".to_string()))
    }

    /// Booking plus its wedding, checked against the couple's identity.
    pub(super) async fn require_booking_owned(
        &self,
        db: &DatabaseTransaction,
        booking_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<(bookings::Model, weddings::Model)> {
        let booking = self.require_booking(db, booking_id).await?;
        let wedding = self
            .find_wedding_by_id(db, &booking.wedding_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("wedding not exists".to_string()))?;
        if wedding.couple_id != user_id {
            return Err(EngineError::KeyNotFound("booking not exists".to_string()));
        }
        Ok((booking, wedding))
    }

    pub(super) async fn find_vendor_for_user(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<Option<vendors::Model>> {
        vendors::Entity::find()
            .filter(vendors::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn require_vendor_profile(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
    ) -> ResultEngine<vendors::Model> {
        self.find_vendor_for_user(db, user_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("vendor profile not exists".to_string()))
    }

    pub(super) async fn require_vendor_in_store(
        &self,
        db: &DatabaseTransaction,
        vendor_id: Uuid,
    ) -> ResultEngine<vendors::Model> {
        vendors::Entity::find_by_id(vendor_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("vendor not exists".to_string()))
    }

    pub(super) async fn vendor_display_name(
        &self,
        db: &DatabaseTransaction,
        vendor_id: &str,
    ) -> ResultEngine<Option<String>> {
        let model = vendors::Entity::find_by_id(vendor_id.to_string())
            .one(db)
            .await?;
        Ok(model.map(|m| m.business_name))
    }

    /// Display name used in budget provenance notes: linked vendor profile
    /// first, then the manual vendor name, then the literal "Vendor".
    pub(super) async fn booking_display_name(
        &self,
        db: &DatabaseTransaction,
        booking: &bookings::Model,
    ) -> ResultEngine<String> {
        if let Some(vendor_id) = booking.vendor_id.as_deref()
            && let Some(name) = self.vendor_display_name(db, vendor_id).await?
        {
            return Ok(name);
        }
        if let Some(name) = booking.vendor_name.as_deref()
            && !name.trim().is_empty()
        {
            return Ok(name.trim().to_string());
        }
        Ok("Vendor".to_string())
    }
}
