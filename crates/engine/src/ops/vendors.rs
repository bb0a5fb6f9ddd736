use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Vendor, vendors};

use super::{Engine, normalize_optional_text, normalize_required_name, with_tx};

impl Engine {
    /// Creates the vendor profile for an account. One profile per account.
    pub async fn new_vendor(
        &self,
        user_id: &str,
        business_name: &str,
        category: &str,
        city: Option<&str>,
    ) -> ResultEngine<Uuid> {
        let business_name = normalize_required_name(business_name, "business")?;
        let category = normalize_required_name(category, "category")?.to_lowercase();

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            if self.find_vendor_for_user(&db_tx, user_id).await?.is_some() {
                return Err(EngineError::ExistingKey(business_name));
            }

            let id = Uuid::new_v4();
            let active = vendors::ActiveModel {
                id: ActiveValue::Set(id.to_string()),
                user_id: ActiveValue::Set(user_id.to_string()),
                business_name: ActiveValue::Set(business_name),
                category: ActiveValue::Set(category),
                city: ActiveValue::Set(normalize_optional_text(city)),
                created_at: ActiveValue::Set(Utc::now()),
            };
            active.insert(&db_tx).await?;
            Ok(id)
        })
    }

    /// Returns the caller's vendor profile.
    pub async fn vendor_for_user(&self, user_id: &str) -> ResultEngine<Vendor> {
        with_tx!(self, |db_tx| {
            let model = self.require_vendor_profile(&db_tx, user_id).await?;
            Vendor::try_from(model)
        })
    }
}
