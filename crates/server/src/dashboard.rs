//! The aggregate dashboard endpoint.

use api_types::dashboard::{CategoryExpense, DashboardResponse, MonthlyPoint};
use axum::{Extension, Json, extract::State};
use chrono::Utc;

use crate::{
    ServerError, budgets::map_budget, server::ServerState, transactions::map_transaction, user,
};

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<DashboardResponse>, ServerError> {
    let data = state
        .engine
        .dashboard(&user.id, Utc::now().date_naive())
        .await?;

    Ok(Json(DashboardResponse {
        balance: data.balance,
        initial_balance: data.initial_balance,
        total_income: data.total_income,
        total_expense: data.total_expense,
        monthly_income: data.monthly_income,
        monthly_expense: data.monthly_expense,
        expenses_by_category: data
            .expenses_by_category
            .into_iter()
            .map(|entry| CategoryExpense {
                category: entry.category,
                amount: entry.amount,
            })
            .collect(),
        monthly_evolution: data
            .monthly_evolution
            .into_iter()
            .map(|point| MonthlyPoint {
                month: point.month,
                year: point.year,
                income: point.income,
                expense: point.expense,
            })
            .collect(),
        recent_transactions: data
            .recent_transactions
            .into_iter()
            .map(map_transaction)
            .collect(),
        category_budgets: data.category_budgets.into_iter().map(map_budget).collect(),
        current_month: data.current_month,
        current_year: data.current_year,
    }))
}
