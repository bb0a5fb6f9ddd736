use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{BudgetCategory, BudgetLine, EngineError, ResultEngine, budget_lines};

use super::{BudgetLinePatch, Engine, normalize_optional_text, require_non_negative, with_tx};

impl Engine {
    /// Adds a manual budget line. One line per category per wedding; a
    /// second add for the same category is a conflict, not an update.
    pub async fn add_budget_line(
        &self,
        wedding_id: Option<&str>,
        user_id: &str,
        category: BudgetCategory,
        estimated_cost_minor: i64,
        actual_cost_minor: i64,
        notes: Option<&str>,
    ) -> ResultEngine<Uuid> {
        let estimated_cost_minor = require_non_negative(estimated_cost_minor, "estimated cost")?;
        let actual_cost_minor = require_non_negative(actual_cost_minor, "actual cost")?;

        with_tx!(self, |db_tx| {
            let wedding = self
                .resolve_owned_wedding(&db_tx, wedding_id, user_id)
                .await?;

            let exists = self
                .find_budget_line(&db_tx, &wedding.id, category)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(category.as_str().to_string()));
            }

            let id = Uuid::new_v4();
            let active = budget_lines::ActiveModel {
                id: ActiveValue::Set(id.to_string()),
                wedding_id: ActiveValue::Set(wedding.id),
                category: ActiveValue::Set(category.as_str().to_string()),
                estimated_cost_minor: ActiveValue::Set(estimated_cost_minor),
                actual_cost_minor: ActiveValue::Set(actual_cost_minor),
                notes: ActiveValue::Set(normalize_optional_text(notes)),
                created_at: ActiveValue::Set(Utc::now()),
            };
            active.insert(&db_tx).await?;
            Ok(id)
        })
    }

    /// Lists the budget ledger for the caller's wedding, oldest line first.
    pub async fn list_budget_lines(
        &self,
        wedding_id: Option<&str>,
        user_id: &str,
    ) -> ResultEngine<Vec<BudgetLine>> {
        with_tx!(self, |db_tx| {
            let wedding = self
                .resolve_owned_wedding(&db_tx, wedding_id, user_id)
                .await?;
            let models = budget_lines::Entity::find()
                .filter(budget_lines::Column::WeddingId.eq(wedding.id))
                .order_by_asc(budget_lines::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models.into_iter().map(BudgetLine::try_from).collect()
        })
    }

    /// Returns one budget line; owning couple only.
    pub async fn budget_line(&self, line_id: Uuid, user_id: &str) -> ResultEngine<BudgetLine> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_budget_line_owned(&db_tx, line_id, user_id)
                .await?;
            BudgetLine::try_from(model)
        })
    }

    /// Partial update of a budget line.
    ///
    /// Changing the category keeps the uniqueness invariant: moving onto a
    /// category that already has a line is a conflict.
    pub async fn update_budget_line(
        &self,
        line_id: Uuid,
        user_id: &str,
        patch: BudgetLinePatch,
    ) -> ResultEngine<BudgetLine> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_budget_line_owned(&db_tx, line_id, user_id)
                .await?;

            let mut active = <budget_lines::ActiveModel as sea_orm::ActiveModelTrait>::default();
            if let Some(category) = patch.category
                && category.as_str() != model.category
            {
                let taken = self
                    .find_budget_line(&db_tx, &model.wedding_id, category)
                    .await?
                    .is_some();
                if taken {
                    return Err(EngineError::ExistingKey(category.as_str().to_string()));
                }
                active.category = ActiveValue::Set(category.as_str().to_string());
            }
            if let Some(estimated) = patch.estimated_cost_minor {
                active.estimated_cost_minor =
                    ActiveValue::Set(require_non_negative(estimated, "estimated cost")?);
            }
            if let Some(actual) = patch.actual_cost_minor {
                active.actual_cost_minor =
                    ActiveValue::Set(require_non_negative(actual, "actual cost")?);
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
            BudgetLine::try_from(updated)
        })
    }

    /// Deletes a budget line; owning couple only.
    pub async fn delete_budget_line(&self, line_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_budget_line_owned(&db_tx, line_id, user_id)
                .await?;
            budget_lines::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Looks up the single line for `(wedding, category)`, if any.
    pub(super) async fn find_budget_line(
        &self,
        db: &DatabaseTransaction,
        wedding_id: &str,
        category: BudgetCategory,
    ) -> ResultEngine<Option<budget_lines::Model>> {
        budget_lines::Entity::find()
            .filter(budget_lines::Column::WeddingId.eq(wedding_id.to_string()))
            .filter(budget_lines::Column::Category.eq(category.as_str()))
            .one(db)
            .await
            .map_err(Into::into)
    }

    async fn require_budget_line_owned(
        &self,
        db: &DatabaseTransaction,
        line_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<budget_lines::Model> {
        let model = budget_lines::Entity::find_by_id(line_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("budget line not exists".to_string()))?;
        let wedding = self
            .find_wedding_by_id(db, &model.wedding_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("wedding not exists".to_string()))?;
        if wedding.couple_id != user_id {
            return Err(EngineError::KeyNotFound(
                "budget line not exists".to_string(),
            ));
        }
        Ok(model)
    }
}
