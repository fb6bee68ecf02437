use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use sea_orm::{QueryFilter, QueryOrder, QuerySelect, TransactionTrait, prelude::*};

use crate::{
    Budget, BudgetStatus, ResultEngine, Transaction, TransactionKind, budgets, categories, solde,
    transactions,
    util::{month_bounds, month_name, shift_month_back},
};

use super::{Engine, with_tx};

/// One slice of the current month's spending, grouped by category.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryExpense {
    pub category: String,
    pub amount: Decimal,
}

/// Income and expense totals for one calendar month.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MonthlySummary {
    /// Three-letter English month name, `"Jan"` through `"Dec"`.
    pub month: String,
    pub year: i32,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Aggregates backing the landing screen, all scoped to one user.
#[derive(Clone, Debug, Serialize)]
pub struct DashboardData {
    pub balance: Decimal,
    pub initial_balance: Decimal,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub monthly_income: Decimal,
    pub monthly_expense: Decimal,
    /// Current month's expenses by category, largest first.
    pub expenses_by_category: Vec<CategoryExpense>,
    /// Trailing six months including the current one, oldest first.
    pub monthly_evolution: Vec<MonthlySummary>,
    /// The five newest transactions.
    pub recent_transactions: Vec<Transaction>,
    /// Current month's category-scoped budgets with their status.
    pub category_budgets: Vec<BudgetStatus>,
    pub current_month: u32,
    pub current_year: i32,
}

impl Engine {
    /// Assembles the dashboard aggregates for the month `today` falls in.
    ///
    /// A user without a balance row reports zero balances; the row is not
    /// created here.
    pub async fn dashboard(&self, user_id: &str, today: NaiveDate) -> ResultEngine<DashboardData> {
        let current_year = today.year();
        let current_month = today.month();
        let (month_start, month_end) = month_bounds(current_year, current_month)?;

        with_tx!(self, |db_tx| {
            let balance_row = solde::Entity::find_by_id(user_id.to_string())
                .one(&db_tx)
                .await?;
            let (initial_balance, balance) = balance_row
                .map_or((Decimal::ZERO, Decimal::ZERO), |model| {
                    (model.initial_balance, model.current_balance)
                });

            let total_income = self
                .sum_amounts(&db_tx, user_id, TransactionKind::Income, None, None)
                .await?;
            let total_expense = self
                .sum_amounts(&db_tx, user_id, TransactionKind::Expense, None, None)
                .await?;
            let monthly_income = self
                .sum_amounts(
                    &db_tx,
                    user_id,
                    TransactionKind::Income,
                    Some((month_start, month_end)),
                    None,
                )
                .await?;
            let monthly_expense = self
                .sum_amounts(
                    &db_tx,
                    user_id,
                    TransactionKind::Expense,
                    Some((month_start, month_end)),
                    None,
                )
                .await?;

            let expense_rows = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id.to_string()))
                .filter(transactions::Column::Kind.eq(TransactionKind::Expense.as_str()))
                .filter(transactions::Column::Date.gte(month_start))
                .filter(transactions::Column::Date.lt(month_end))
                .find_also_related(categories::Entity)
                .all(&db_tx)
                .await?;
            let mut totals: HashMap<String, (String, Decimal)> = HashMap::new();
            for (tx_model, category_model) in expense_rows {
                let Some(category_model) = category_model else {
                    continue;
                };
                let entry = totals
                    .entry(tx_model.category_id)
                    .or_insert((category_model.name, Decimal::ZERO));
                entry.1 += tx_model.amount;
            }
            let mut expenses_by_category: Vec<CategoryExpense> = totals
                .into_values()
                .map(|(category, amount)| CategoryExpense { category, amount })
                .collect();
            expenses_by_category.sort_by(|a, b| b.amount.cmp(&a.amount));

            let (oldest_year, oldest_month) = shift_month_back(current_year, current_month, 5);
            let (evolution_start, _) = month_bounds(oldest_year, oldest_month)?;
            let mut monthly_evolution: Vec<MonthlySummary> = (0..6)
                .rev()
                .map(|offset| {
                    let (year, month) = shift_month_back(current_year, current_month, offset);
                    MonthlySummary {
                        month: month_name(month).to_string(),
                        year,
                        income: Decimal::ZERO,
                        expense: Decimal::ZERO,
                    }
                })
                .collect();
            let evolution_rows = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id.to_string()))
                .filter(transactions::Column::Date.gte(evolution_start))
                .filter(transactions::Column::Date.lt(month_end))
                .all(&db_tx)
                .await?;
            for row in evolution_rows {
                let kind = TransactionKind::try_from(row.kind.as_str())?;
                let months_since = (row.date.year() - oldest_year) * 12
                    + (row.date.month() as i32 - oldest_month as i32);
                let Some(slot) = usize::try_from(months_since)
                    .ok()
                    .and_then(|index| monthly_evolution.get_mut(index))
                else {
                    continue;
                };
                match kind {
                    TransactionKind::Income => slot.income += row.amount,
                    TransactionKind::Expense => slot.expense += row.amount,
                }
            }

            let recent_rows = transactions::Entity::find()
                .filter(transactions::Column::UserId.eq(user_id.to_string()))
                .find_also_related(categories::Entity)
                .order_by_desc(transactions::Column::Date)
                .order_by_desc(transactions::Column::CreatedAt)
                .limit(5)
                .all(&db_tx)
                .await?;
            let mut recent_transactions = Vec::with_capacity(recent_rows.len());
            for (tx_model, category_model) in recent_rows {
                let mut tx = Transaction::try_from(tx_model)?;
                tx.category_name = category_model.map(|category| category.name);
                recent_transactions.push(tx);
            }

            let budget_rows = budgets::Entity::find()
                .filter(budgets::Column::UserId.eq(user_id.to_string()))
                .filter(budgets::Column::Year.eq(current_year))
                .filter(budgets::Column::Month.eq(current_month))
                .filter(budgets::Column::CategoryId.is_not_null())
                .find_also_related(categories::Entity)
                .all(&db_tx)
                .await?;
            let mut category_budgets = Vec::with_capacity(budget_rows.len());
            for (budget_model, category_model) in budget_rows {
                let mut budget = Budget::try_from(budget_model)?;
                budget.category_name = category_model.map(|category| category.name);
                category_budgets.push(self.budget_status(&db_tx, user_id, budget).await?);
            }

            Ok(DashboardData {
                balance,
                initial_balance,
                total_income,
                total_expense,
                monthly_income,
                monthly_expense,
                expenses_by_category,
                monthly_evolution,
                recent_transactions,
                category_budgets,
                current_month,
                current_year,
            })
        })
    }
}
