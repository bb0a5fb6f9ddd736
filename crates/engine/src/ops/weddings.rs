use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{ResultEngine, Wedding, weddings};

use super::{
    Engine, NewWedding, WeddingPatch, normalize_optional_text, normalize_required_name,
    require_non_negative, with_tx,
};

impl Engine {
    /// Creates a wedding profile for the couple account.
    pub async fn new_wedding(&self, user_id: &str, input: NewWedding) -> ResultEngine<String> {
        let bride_name = normalize_required_name(&input.bride_name, "bride")?;
        let groom_name = normalize_required_name(&input.groom_name, "groom")?;
        let total_budget_minor = require_non_negative(input.total_budget_minor, "total budget")?;

        let id = Uuid::new_v4().to_string();
        let active = weddings::ActiveModel {
            id: ActiveValue::Set(id.clone()),
            couple_id: ActiveValue::Set(user_id.to_string()),
            bride_name: ActiveValue::Set(bride_name),
            groom_name: ActiveValue::Set(groom_name),
            wedding_date: ActiveValue::Set(input.wedding_date),
            venue: ActiveValue::Set(normalize_optional_text(input.venue.as_deref())),
            city: ActiveValue::Set(normalize_optional_text(input.city.as_deref())),
            total_budget_minor: ActiveValue::Set(total_budget_minor),
            notes: ActiveValue::Set(normalize_optional_text(input.notes.as_deref())),
            created_at: ActiveValue::Set(Utc::now()),
        };

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            active.insert(&db_tx).await?;
            Ok(id)
        })
    }

    /// Returns the caller's wedding: a specific one when `wedding_id` is
    /// given, the most recent one otherwise.
    pub async fn wedding(
        &self,
        wedding_id: Option<&str>,
        user_id: &str,
    ) -> ResultEngine<Wedding> {
        with_tx!(self, |db_tx| {
            let model = self
                .resolve_owned_wedding(&db_tx, wedding_id, user_id)
                .await?;
            Ok(Wedding::from(model))
        })
    }

    /// Partial update of the wedding profile; owner only.
    pub async fn update_wedding(
        &self,
        wedding_id: &str,
        user_id: &str,
        patch: WeddingPatch,
    ) -> ResultEngine<Wedding> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_wedding_owner(&db_tx, wedding_id, user_id)
                .await?;

            let mut active = <weddings::ActiveModel as sea_orm::ActiveModelTrait>::default();
            if let Some(bride_name) = patch.bride_name.as_deref() {
                active.bride_name = ActiveValue::Set(normalize_required_name(bride_name, "bride")?);
            }
            if let Some(groom_name) = patch.groom_name.as_deref() {
                active.groom_name = ActiveValue::Set(normalize_required_name(groom_name, "groom")?);
            }
            if let Some(wedding_date) = patch.wedding_date {
                active.wedding_date = ActiveValue::Set(wedding_date);
            }
            if patch.venue.is_some() {
                active.venue = ActiveValue::Set(normalize_optional_text(patch.venue.as_deref()));
            }
            if patch.city.is_some() {
                active.city = ActiveValue::Set(normalize_optional_text(patch.city.as_deref()));
            }
            if let Some(total_budget_minor) = patch.total_budget_minor {
                active.total_budget_minor =
                    ActiveValue::Set(require_non_negative(total_budget_minor, "total budget")?);
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
            Ok(Wedding::from(updated))
        })
    }
}
