use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use sea_orm::{ActiveValue, DatabaseTransaction, QueryFilter, TransactionTrait, prelude::*};

use crate::{ResultEngine, Solde, TransactionKind, solde, transactions};

use super::{Engine, with_tx};

impl Engine {
    /// Returns the balance row for a user, creating a zeroed one on first
    /// access.
    pub async fn solde(&self, user_id: &str) -> ResultEngine<Solde> {
        with_tx!(self, |db_tx| {
            let row = solde::Entity::find_by_id(user_id.to_string())
                .one(&db_tx)
                .await?;
            let balance = match row {
                Some(model) => Solde::from(model),
                None => {
                    let fresh = solde::ActiveModel {
                        user_id: ActiveValue::Set(user_id.to_string()),
                        initial_balance: ActiveValue::Set(Decimal::ZERO),
                        current_balance: ActiveValue::Set(Decimal::ZERO),
                    };
                    Solde::from(fresh.insert(&db_tx).await?)
                }
            };
            Ok(balance)
        })
    }

    /// Sets the starting balance.
    ///
    /// The running balance shifts by the same delta, so recorded transactions
    /// keep their effect.
    pub async fn set_initial_balance(
        &self,
        user_id: &str,
        initial: Decimal,
    ) -> ResultEngine<Solde> {
        with_tx!(self, |db_tx| {
            let row = solde::Entity::find_by_id(user_id.to_string())
                .one(&db_tx)
                .await?;
            let updated = match row {
                None => {
                    let fresh = solde::ActiveModel {
                        user_id: ActiveValue::Set(user_id.to_string()),
                        initial_balance: ActiveValue::Set(initial),
                        current_balance: ActiveValue::Set(initial),
                    };
                    fresh.insert(&db_tx).await?
                }
                Some(model) => {
                    let shifted = model.current_balance + (initial - model.initial_balance);
                    let active = solde::ActiveModel {
                        user_id: ActiveValue::Set(user_id.to_string()),
                        initial_balance: ActiveValue::Set(initial),
                        current_balance: ActiveValue::Set(shifted),
                    };
                    active.update(&db_tx).await?
                }
            };
            Ok(Solde::from(updated))
        })
    }

    /// Rebuilds the running balance from the ledger:
    /// `initial + sum(incomes) - sum(expenses)`.
    ///
    /// A missing balance row is recreated with a zero starting point.
    pub async fn recalculate_balance(&self, user_id: &str) -> ResultEngine<Solde> {
        with_tx!(self, |db_tx| {
            let row = solde::Entity::find_by_id(user_id.to_string())
                .one(&db_tx)
                .await?;
            let initial = row
                .as_ref()
                .map_or(Decimal::ZERO, |model| model.initial_balance);

            let income = self
                .sum_amounts(&db_tx, user_id, TransactionKind::Income, None, None)
                .await?;
            let expense = self
                .sum_amounts(&db_tx, user_id, TransactionKind::Expense, None, None)
                .await?;

            let active = solde::ActiveModel {
                user_id: ActiveValue::Set(user_id.to_string()),
                initial_balance: ActiveValue::Set(initial),
                current_balance: ActiveValue::Set(initial + income - expense),
            };
            let model = if row.is_some() {
                active.update(&db_tx).await?
            } else {
                active.insert(&db_tx).await?
            };
            Ok(Solde::from(model))
        })
    }

    /// Applies a signed delta to the running balance.
    ///
    /// Callers must run this inside the same transaction as the ledger write
    /// it accounts for. A missing balance row is created with a zero starting
    /// point.
    pub(super) async fn apply_balance_delta(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        delta: Decimal,
    ) -> ResultEngine<()> {
        let row = solde::Entity::find_by_id(user_id.to_string()).one(db).await?;
        match row {
            Some(model) => {
                let active = solde::ActiveModel {
                    user_id: ActiveValue::Set(user_id.to_string()),
                    current_balance: ActiveValue::Set(model.current_balance + delta),
                    ..Default::default()
                };
                active.update(db).await?;
            }
            None => {
                let fresh = solde::ActiveModel {
                    user_id: ActiveValue::Set(user_id.to_string()),
                    initial_balance: ActiveValue::Set(Decimal::ZERO),
                    current_balance: ActiveValue::Set(delta),
                };
                fresh.insert(db).await?;
            }
        }
        Ok(())
    }

    /// Sums transaction amounts for one user and kind, optionally restricted
    /// to a half-open date window and a category.
    pub(super) async fn sum_amounts(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        kind: TransactionKind,
        window: Option<(NaiveDate, NaiveDate)>,
        category_id: Option<Uuid>,
    ) -> ResultEngine<Decimal> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id.to_string()))
            .filter(transactions::Column::Kind.eq(kind.as_str()));
        if let Some((start, end)) = window {
            query = query
                .filter(transactions::Column::Date.gte(start))
                .filter(transactions::Column::Date.lt(end));
        }
        if let Some(category_id) = category_id {
            query = query.filter(transactions::Column::CategoryId.eq(category_id.to_string()));
        }
        let models = query.all(db).await?;
        Ok(models.into_iter().map(|model| model.amount).sum())
    }
}

/// Signs an amount by kind: incomes count positive, expenses negative.
pub(super) fn signed_amount(kind: TransactionKind, amount: Decimal) -> Decimal {
    match kind {
        TransactionKind::Income => amount,
        TransactionKind::Expense => -amount,
    }
}
