//! Budget API endpoints.
//!
//! Budgets are always served with their read-time status fields (`spent`,
//! `remaining`, `percentage`), so create and update re-read the stored row
//! through the status-computing path before answering.

use api_types::budget::{BudgetListQuery, BudgetNew, BudgetResponse, BudgetView, BudgetsResponse};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user, validation};

pub(crate) fn map_budget(status: engine::BudgetStatus) -> BudgetView {
    let budget = status.budget;
    BudgetView {
        id: budget.id,
        amount: budget.amount,
        month: budget.month,
        year: budget.year,
        category_id: budget.category_id,
        category_name: budget.category_name,
        spent: status.spent,
        remaining: status.remaining,
        percentage: status.percentage,
        created_at: budget.created_at,
    }
}

fn draft_from(payload: BudgetNew) -> engine::BudgetDraft {
    let mut draft = engine::BudgetDraft::new(payload.amount, payload.month, payload.year);
    if let Some(category_id) = payload.category_id {
        draft = draft.category_id(category_id);
    }
    draft
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<BudgetListQuery>,
) -> Result<Json<BudgetsResponse>, ServerError> {
    let budgets = state
        .engine
        .budgets(&user.id, query.month, query.year)
        .await?
        .into_iter()
        .map(map_budget)
        .collect();

    Ok(Json(BudgetsResponse { budgets }))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BudgetResponse>, ServerError> {
    let budget = state.engine.budget(id, &user.id).await?;

    Ok(Json(BudgetResponse {
        budget: map_budget(budget),
    }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetResponse>), ServerError> {
    validation::budget(&payload)?;

    let created = state.engine.new_budget(&user.id, draft_from(payload)).await?;
    let budget = state.engine.budget(created.id, &user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(BudgetResponse {
            budget: map_budget(budget),
        }),
    ))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BudgetNew>,
) -> Result<Json<BudgetResponse>, ServerError> {
    validation::budget(&payload)?;

    let updated = state
        .engine
        .update_budget(id, &user.id, draft_from(payload))
        .await?;
    let budget = state.engine.budget(updated.id, &user.id).await?;

    Ok(Json(BudgetResponse {
        budget: map_budget(budget),
    }))
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(id, &user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
