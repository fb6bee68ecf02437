use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Category, EngineError, ResultEngine, TransactionKind, categories, transactions};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Lists a user's categories sorted by name, optionally narrowed to one
    /// kind.
    pub async fn categories(
        &self,
        user_id: &str,
        kind: Option<TransactionKind>,
    ) -> ResultEngine<Vec<Category>> {
        with_tx!(self, |db_tx| {
            let mut query = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id.to_string()))
                .order_by_asc(categories::Column::Name);
            if let Some(kind) = kind {
                query = query.filter(categories::Column::Kind.eq(kind.as_str()));
            }
            let models = query.all(&db_tx).await?;
            let out = models
                .into_iter()
                .map(Category::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;
            Ok(out)
        })
    }

    /// Return a single category owned by the user.
    pub async fn category(&self, category_id: Uuid, user_id: &str) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, user_id, category_id).await?;
            Category::try_from(model)
        })
    }

    /// Add a new category.
    ///
    /// The `(name, kind)` pair must be unique per user. The same name may
    /// exist once as an expense and once as an income category.
    pub async fn new_category(
        &self,
        user_id: &str,
        name: &str,
        kind: TransactionKind,
    ) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;
        with_tx!(self, |db_tx| {
            let exists = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id.to_string()))
                .filter(categories::Column::Name.eq(name.clone()))
                .filter(categories::Column::Kind.eq(kind.as_str()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(
                    "Category with this name".to_string(),
                ));
            }

            let active = categories::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                user_id: ActiveValue::Set(user_id.to_string()),
                name: ActiveValue::Set(name.clone()),
                kind: ActiveValue::Set(kind.as_str().to_string()),
                created_at: ActiveValue::Set(Utc::now()),
            };
            let model = active.insert(&db_tx).await?;
            Category::try_from(model)
        })
    }

    /// Replaces a category's name and kind.
    pub async fn update_category(
        &self,
        category_id: Uuid,
        user_id: &str,
        name: &str,
        kind: TransactionKind,
    ) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, user_id, category_id).await?;

            let clash = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id.to_string()))
                .filter(categories::Column::Name.eq(name.clone()))
                .filter(categories::Column::Kind.eq(kind.as_str()))
                .filter(categories::Column::Id.ne(category_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if clash {
                return Err(EngineError::ExistingKey(
                    "Category with this name".to_string(),
                ));
            }

            let active = categories::ActiveModel {
                id: ActiveValue::Set(category_id.to_string()),
                name: ActiveValue::Set(name.clone()),
                kind: ActiveValue::Set(kind.as_str().to_string()),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;
            Category::try_from(model)
        })
    }

    /// Deletes a category that no transaction references.
    ///
    /// Budgets scoped to this category go with it via FK cascade.
    pub async fn delete_category(&self, category_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_category(&db_tx, user_id, category_id).await?;

            let in_use = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id.to_string()))
                .filter(transactions::Column::CategoryId.eq(category_id.to_string()))
                .one(&db_tx)
                .await?
                .is_some();
            if in_use {
                return Err(EngineError::CategoryInUse(category_id.to_string()));
            }

            categories::Entity::delete_by_id(category_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
