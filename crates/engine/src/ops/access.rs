use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, budgets, categories, transactions};

use super::Engine;

impl Engine {
    pub(super) async fn find_category_owned(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        category_id: Uuid,
    ) -> ResultEngine<Option<categories::Model>> {
        categories::Entity::find_by_id(category_id.to_string())
            .filter(categories::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await
            .map_err(Into::into)
    }

    pub(super) async fn require_category(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        category_id: Uuid,
    ) -> ResultEngine<categories::Model> {
        self.find_category_owned(db, user_id, category_id)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("Category".to_string()))
    }

    /// Checks a category reference coming from a transaction or budget payload.
    ///
    /// A missing or foreign category is reported as [`EngineError::InvalidCategory`]
    /// rather than [`EngineError::KeyNotFound`]: the addressed resource exists,
    /// only the reference inside it is bad.
    pub(super) async fn require_category_ref(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        category_id: Uuid,
    ) -> ResultEngine<categories::Model> {
        self.find_category_owned(db, user_id, category_id)
            .await?
            .ok_or_else(|| EngineError::InvalidCategory(category_id.to_string()))
    }

    pub(super) async fn require_transaction(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<transactions::Model> {
        transactions::Entity::find_by_id(transaction_id.to_string())
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("Transaction".to_string()))
    }

    pub(super) async fn require_budget(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        budget_id: Uuid,
    ) -> ResultEngine<budgets::Model> {
        budgets::Entity::find_by_id(budget_id.to_string())
            .filter(budgets::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("Budget".to_string()))
    }
}
