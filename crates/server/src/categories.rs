//! Category API endpoints.

use api_types::category::{
    CategoriesResponse, CategoryListQuery, CategoryNew, CategoryResponse, CategoryView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    ServerError,
    server::ServerState,
    transactions::{engine_kind, map_kind},
    user, validation,
};

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: map_kind(category.kind),
        created_at: category.created_at,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<CategoryListQuery>,
) -> Result<Json<CategoriesResponse>, ServerError> {
    let categories = state
        .engine
        .categories(&user.id, query.kind.map(engine_kind))
        .await?
        .into_iter()
        .map(map_category)
        .collect();

    Ok(Json(CategoriesResponse { categories }))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CategoryResponse>, ServerError> {
    let category = state.engine.category(id, &user.id).await?;

    Ok(Json(CategoryResponse {
        category: map_category(category),
    }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryResponse>), ServerError> {
    validation::category(&payload)?;

    let category = state
        .engine
        .new_category(&user.id, &payload.name, engine_kind(payload.kind))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CategoryResponse {
            category: map_category(category),
        }),
    ))
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CategoryNew>,
) -> Result<Json<CategoryResponse>, ServerError> {
    validation::category(&payload)?;

    let category = state
        .engine
        .update_category(id, &user.id, &payload.name, engine_kind(payload.kind))
        .await?;

    Ok(Json(CategoryResponse {
        category: map_category(category),
    }))
}

pub async fn delete(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(id, &user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}
