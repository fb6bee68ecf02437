use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use uuid::Uuid;

use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, Select, TransactionTrait, prelude::*,
};

use crate::{
    Budget, BudgetDraft, BudgetStatus, EngineError, ResultEngine, TransactionKind, budgets,
    categories, util::month_bounds,
};

use super::transactions::validate_amount;
use super::{Engine, with_tx};

fn validate_month(month: u32) -> ResultEngine<()> {
    if !(1..=12).contains(&month) {
        return Err(EngineError::InvalidAmount(format!("invalid month: {month}")));
    }
    Ok(())
}

/// Narrows a budget query to one slot. `NULL` category rows form their own
/// slot, so the overall budget of a month competes only with itself.
fn filter_slot(
    query: Select<budgets::Entity>,
    category_id: Option<Uuid>,
) -> Select<budgets::Entity> {
    match category_id {
        Some(id) => query.filter(budgets::Column::CategoryId.eq(id.to_string())),
        None => query.filter(budgets::Column::CategoryId.is_null()),
    }
}

impl Engine {
    /// Lists a user's budgets, most recent period first, each enriched with
    /// its spending status.
    ///
    /// `month` and `year` narrow the list to one period and only apply when
    /// both are present.
    pub async fn budgets(
        &self,
        user_id: &str,
        month: Option<u32>,
        year: Option<i32>,
    ) -> ResultEngine<Vec<BudgetStatus>> {
        with_tx!(self, |db_tx| {
            let mut query = budgets::Entity::find()
                .filter(budgets::Column::UserId.eq(user_id.to_string()))
                .find_also_related(categories::Entity)
                .order_by_desc(budgets::Column::Year)
                .order_by_desc(budgets::Column::Month);
            if let (Some(year), Some(month)) = (year, month) {
                query = query
                    .filter(budgets::Column::Year.eq(year))
                    .filter(budgets::Column::Month.eq(month));
            }
            let rows = query.all(&db_tx).await?;
            let mut out = Vec::with_capacity(rows.len());
            for (budget_model, category_model) in rows {
                let mut budget = Budget::try_from(budget_model)?;
                budget.category_name = category_model.map(|category| category.name);
                out.push(self.budget_status(&db_tx, user_id, budget).await?);
            }
            Ok(out)
        })
    }

    /// Return a single budget owned by the user, with its spending status.
    pub async fn budget(&self, budget_id: Uuid, user_id: &str) -> ResultEngine<BudgetStatus> {
        with_tx!(self, |db_tx| {
            let row = budgets::Entity::find_by_id(budget_id.to_string())
                .filter(budgets::Column::UserId.eq(user_id.to_string()))
                .find_also_related(categories::Entity)
                .one(&db_tx)
                .await?;
            let (budget_model, category_model) =
                row.ok_or_else(|| EngineError::KeyNotFound("Budget".to_string()))?;
            let mut budget = Budget::try_from(budget_model)?;
            budget.category_name = category_model.map(|category| category.name);
            self.budget_status(&db_tx, user_id, budget).await
        })
    }

    /// Add a new budget.
    ///
    /// A slot, `(year, month, category)` with the overall budget counting as
    /// its own category slot, can hold at most one budget per user.
    pub async fn new_budget(&self, user_id: &str, draft: BudgetDraft) -> ResultEngine<Budget> {
        let BudgetDraft {
            amount,
            month,
            year,
            category_id,
        } = draft;
        validate_amount(amount)?;
        validate_month(month)?;
        with_tx!(self, |db_tx| {
            let category = match category_id {
                Some(id) => Some(self.require_category_ref(&db_tx, user_id, id).await?),
                None => None,
            };

            let query = budgets::Entity::find()
                .filter(budgets::Column::UserId.eq(user_id.to_string()))
                .filter(budgets::Column::Year.eq(year))
                .filter(budgets::Column::Month.eq(month));
            let taken = filter_slot(query, category_id)
                .one(&db_tx)
                .await?
                .is_some();
            if taken {
                return Err(EngineError::ExistingKey(
                    "Budget for this period and category".to_string(),
                ));
            }

            let active = budgets::ActiveModel {
                id: ActiveValue::Set(Uuid::new_v4().to_string()),
                user_id: ActiveValue::Set(user_id.to_string()),
                category_id: ActiveValue::Set(category_id.map(|id| id.to_string())),
                amount: ActiveValue::Set(amount),
                month: ActiveValue::Set(month),
                year: ActiveValue::Set(year),
                created_at: ActiveValue::Set(Utc::now()),
            };
            let model = active.insert(&db_tx).await?;

            let mut budget = Budget::try_from(model)?;
            budget.category_name = category.map(|category| category.name);
            Ok(budget)
        })
    }

    /// Replaces a budget's amount, period and category scope.
    pub async fn update_budget(
        &self,
        budget_id: Uuid,
        user_id: &str,
        draft: BudgetDraft,
    ) -> ResultEngine<Budget> {
        let BudgetDraft {
            amount,
            month,
            year,
            category_id,
        } = draft;
        validate_amount(amount)?;
        validate_month(month)?;
        with_tx!(self, |db_tx| {
            self.require_budget(&db_tx, user_id, budget_id).await?;
            let category = match category_id {
                Some(id) => Some(self.require_category_ref(&db_tx, user_id, id).await?),
                None => None,
            };

            let query = budgets::Entity::find()
                .filter(budgets::Column::UserId.eq(user_id.to_string()))
                .filter(budgets::Column::Year.eq(year))
                .filter(budgets::Column::Month.eq(month))
                .filter(budgets::Column::Id.ne(budget_id.to_string()));
            let taken = filter_slot(query, category_id)
                .one(&db_tx)
                .await?
                .is_some();
            if taken {
                return Err(EngineError::ExistingKey(
                    "Budget for this period and category".to_string(),
                ));
            }

            let active = budgets::ActiveModel {
                id: ActiveValue::Set(budget_id.to_string()),
                category_id: ActiveValue::Set(category_id.map(|id| id.to_string())),
                amount: ActiveValue::Set(amount),
                month: ActiveValue::Set(month),
                year: ActiveValue::Set(year),
                ..Default::default()
            };
            let model = active.update(&db_tx).await?;

            let mut budget = Budget::try_from(model)?;
            budget.category_name = category.map(|category| category.name);
            Ok(budget)
        })
    }

    /// Delete a budget.
    pub async fn delete_budget(&self, budget_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_budget(&db_tx, user_id, budget_id).await?;
            budgets::Entity::delete_by_id(budget_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Computes the spending status of a budget: expenses recorded in its
    /// period (and category, when scoped) against the budgeted amount.
    ///
    /// The percentage is 0 when the budgeted amount is 0, and is not capped
    /// at 100.
    pub(super) async fn budget_status(
        &self,
        db: &DatabaseTransaction,
        user_id: &str,
        budget: Budget,
    ) -> ResultEngine<BudgetStatus> {
        let window = month_bounds(budget.year, budget.month)?;
        let spent = self
            .sum_amounts(
                db,
                user_id,
                TransactionKind::Expense,
                Some(window),
                budget.category_id,
            )
            .await?;

        let remaining = budget.amount - spent;
        let percentage = if budget.amount > Decimal::ZERO {
            (spent / budget.amount * Decimal::from(100))
                .to_f64()
                .unwrap_or(0.0)
        } else {
            0.0
        };

        Ok(BudgetStatus {
            budget,
            spent,
            remaining,
            percentage,
        })
    }
}
