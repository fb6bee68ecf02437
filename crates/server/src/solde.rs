//! Balance ("solde") API endpoints.

use api_types::solde::{InitialBalanceUpdate, SoldeResponse, SoldeView};
use axum::{Extension, Json, extract::State};

use crate::{ServerError, server::ServerState, user};

fn map_solde(solde: engine::Solde) -> SoldeView {
    SoldeView {
        initial_balance: solde.initial_balance,
        current_balance: solde.current_balance,
    }
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<SoldeResponse>, ServerError> {
    let solde = state.engine.solde(&user.id).await?;

    Ok(Json(SoldeResponse {
        solde: map_solde(solde),
    }))
}

pub async fn set_initial(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<InitialBalanceUpdate>,
) -> Result<Json<SoldeResponse>, ServerError> {
    let solde = state
        .engine
        .set_initial_balance(&user.id, payload.initial_balance)
        .await?;

    Ok(Json(SoldeResponse {
        solde: map_solde(solde),
    }))
}

pub async fn recalculate(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<SoldeResponse>, ServerError> {
    let solde = state.engine.recalculate_balance(&user.id).await?;

    Ok(Json(SoldeResponse {
        solde: map_solde(solde),
    }))
}
