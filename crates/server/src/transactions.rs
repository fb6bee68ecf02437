//! Transaction API endpoints.

use api_types::TransactionKind as ApiKind;
use api_types::transaction::{
    TransactionListQuery, TransactionNew, TransactionResponse, TransactionView,
    TransactionsResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user, validation};

pub(crate) fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

pub(crate) fn engine_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

pub(crate) fn map_transaction(transaction: engine::Transaction) -> TransactionView {
    TransactionView {
        id: transaction.id,
        amount: transaction.amount,
        date: transaction.date,
        kind: map_kind(transaction.kind),
        description: transaction.description,
        category_id: transaction.category_id,
        category_name: transaction.category_name,
        created_at: transaction.created_at,
    }
}

fn draft_from(payload: TransactionNew) -> engine::TransactionDraft {
    let mut draft = engine::TransactionDraft::new(
        payload.amount,
        payload.date,
        payload.category_id,
        engine_kind(payload.kind),
    );
    if let Some(description) = payload.description {
        draft = draft.description(description);
    }
    draft
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionListQuery>,
) -> Result<Json<TransactionsResponse>, ServerError> {
    let filter = engine::TransactionListFilter {
        month: query.month,
        year: query.year,
        kind: query.kind.map(engine_kind),
        category_id: query.category_id,
    };

    let transactions = state
        .engine
        .transactions(&user.id, &filter)
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();

    Ok(Json(TransactionsResponse { transactions }))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionResponse>, ServerError> {
    let transaction = state.engine.transaction(id, &user.id).await?;

    Ok(Json(TransactionResponse {
        transaction: map_transaction(transaction),
    }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionResponse>), ServerError> {
    validation::transaction(&payload)?;

    let transaction = state
        .engine
        .new_transaction(&user.id, draft_from(payload))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionResponse {
            transaction: map_transaction(transaction),
        }),
    ))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionNew>,
) -> Result<Json<TransactionResponse>, ServerError> {
    validation::transaction(&payload)?;

    let transaction = state
        .engine
        .update_transaction(id, &user.id, draft_from(payload))
        .await?;

    Ok(Json(TransactionResponse {
        transaction: map_transaction(transaction),
    }))
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(id, &user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
