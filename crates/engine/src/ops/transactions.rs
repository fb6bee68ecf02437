use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    EngineError, ResultEngine, Transaction, TransactionDraft, TransactionKind, categories,
    transactions, util::month_bounds,
};

use super::balances::signed_amount;
use super::{Engine, with_tx};

/// Filters for listing transactions.
///
/// `month` and `year` narrow the list to one calendar month and only apply
/// when both are present; a lone value is ignored.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub month: Option<u32>,
    pub year: Option<i32>,
    /// If present, only transactions of this kind are returned.
    pub kind: Option<TransactionKind>,
    /// If present, only transactions in this category are returned.
    pub category_id: Option<Uuid>,
}

pub(super) fn validate_amount(amount: Decimal) -> ResultEngine<()> {
    if amount <= Decimal::ZERO {
        return Err(EngineError::InvalidAmount(
            "amount must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// Trims a free-text description, mapping whitespace-only input to `None`.
fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

impl Engine {
    /// Lists a user's transactions, newest first by date then creation time.
    ///
    /// Each entry carries the name of its category.
    pub async fn transactions(
        &self,
        user_id: &str,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db_tx| {
            let mut query = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id.to_string()))
                .find_also_related(categories::Entity)
                .order_by_desc(transactions::Column::Date)
                .order_by_desc(transactions::Column::CreatedAt);

            if let (Some(year), Some(month)) = (filter.year, filter.month) {
                let (start, end) = month_bounds(year, month)?;
                query = query
                    .filter(transactions::Column::Date.gte(start))
                    .filter(transactions::Column::Date.lt(end));
            }
            if let Some(kind) = filter.kind {
                query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
            }
            if let Some(category_id) = filter.category_id {
                query =
                    query.filter(transactions::Column::CategoryId.eq(category_id.to_string()));
            }

            let rows = query.all(&db_tx).await?;
            let mut out = Vec::with_capacity(rows.len());
            for (tx_model, category_model) in rows {
                let mut tx = Transaction::try_from(tx_model)?;
                tx.category_name = category_model.map(|category| category.name);
                out.push(tx);
            }
            Ok(out)
        })
    }

    /// Return a single transaction owned by the user, with its category name.
    pub async fn transaction(
        &self,
        transaction_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let row = transactions::Entity::find_by_id(transaction_id.to_string())
                .filter(transactions::Column::UserId.eq(user_id.to_string()))
                .find_also_related(categories::Entity)
                .one(&db_tx)
                .await?;
            let (tx_model, category_model) =
                row.ok_or_else(|| EngineError::KeyNotFound("Transaction".to_string()))?;
            let mut tx = Transaction::try_from(tx_model)?;
            tx.category_name = category_model.map(|category| category.name);
            Ok(tx)
        })
    }

    /// Records a transaction and moves the running balance by its signed
    /// amount, in one DB transaction.
    pub async fn new_transaction(
        &self,
        user_id: &str,
        draft: TransactionDraft,
    ) -> ResultEngine<Transaction> {
        let TransactionDraft {
            amount,
            date,
            category_id,
            kind,
            description,
        } = draft;
        validate_amount(amount)?;
        let description = normalize_optional_text(description.as_deref());
        with_tx!(self, |db_tx| {
            let category = self
                .require_category_ref(&db_tx, user_id, category_id)
                .await?;

            let active = transactions::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                user_id: ActiveValue::Set(user_id.to_string()),
                category_id: ActiveValue::Set(category_id.to_string()),
                amount: ActiveValue::Set(amount),
                date: ActiveValue::Set(date),
                kind: ActiveValue::Set(kind.as_str().to_string()),
                description: ActiveValue::Set(description.clone()),
                created_at: ActiveValue::Set(Utc::now()),
            };
            let model = active.insert(&db_tx).await?;

            self.apply_balance_delta(&db_tx, user_id, signed_amount(kind, amount))
                .await?;

            let mut tx = Transaction::try_from(model)?;
            tx.category_name = Some(category.name);
            Ok(tx)
        })
    }

    /// Replaces a transaction's fields and reconciles the running balance in
    /// one step: the applied delta is `signed(new) - signed(old)`, so a kind
    /// flip counts both the removal of the old effect and the new one.
    pub async fn update_transaction(
        &self,
        transaction_id: Uuid,
        user_id: &str,
        draft: TransactionDraft,
    ) -> ResultEngine<Transaction> {
        let TransactionDraft {
            amount,
            date,
            category_id,
            kind,
            description,
        } = draft;
        validate_amount(amount)?;
        let description = normalize_optional_text(description.as_deref());
        with_tx!(self, |db_tx| {
            let existing = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            let category = self
                .require_category_ref(&db_tx, user_id, category_id)
                .await?;

            let old_kind = TransactionKind::try_from(existing.kind.as_str())?;
            let delta = signed_amount(kind, amount) - signed_amount(old_kind, existing.amount);

            let active = transactions::ActiveModel {
                id: ActiveValue::Set(transaction_id.to_string()),
                category_id: ActiveValue::Set(category_id.to_string()),
                amount: ActiveValue::Set(amount),
                date: ActiveValue::Set(date),
                kind: ActiveValue::Set(kind.as_str().to_string()),
                description: ActiveValue::Set(description.clone()),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;

            self.apply_balance_delta(&db_tx, user_id, delta).await?;

            let mut tx = Transaction::try_from(model)?;
            tx.category_name = Some(category.name);
            Ok(tx)
        })
    }

    /// Deletes a transaction and reverts its effect on the running balance.
    pub async fn delete_transaction(
        &self,
        transaction_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let existing = self
                .require_transaction(&db_tx, user_id, transaction_id)
                .await?;
            let kind = TransactionKind::try_from(existing.kind.as_str())?;

            transactions::Entity::delete_by_id(transaction_id.to_string())
                .exec(&db_tx)
                .await?;

            self.apply_balance_delta(&db_tx, user_id, -signed_amount(kind, existing.amount))
                .await?;
            Ok(())
        })
    }
}
