use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use sea_orm::{DatabaseConnection, EntityTrait};

use std::sync::Arc;

use crate::{AuthConfig, budgets, categories, dashboard, solde, transactions, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
    pub auth: Arc<AuthConfig>,
}

/// Resolves the bearer token to a user row and stashes it in the request
/// extensions. Anything short of a valid token for an existing account is a
/// plain 401.
async fn auth(
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(TypedHeader(bearer)) = auth_header else {
        return Err(StatusCode::UNAUTHORIZED);
    };
    let Some(claims) = state.auth.verify_token(bearer.token()) else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    let user = user::Entity::find_by_id(claims.sub.as_str())
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/profile", get(user::profile))
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route(
            "/budgets/{id}",
            get(budgets::get).put(budgets::update).delete(budgets::delete),
        )
        .route("/solde", get(solde::get))
        .route("/solde/initial", put(solde::set_initial))
        .route("/solde/recalculate", post(solde::recalculate))
        .route("/dashboard", get(dashboard::get))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .route("/register", post(user::register))
        .route("/login", post(user::login))
        .with_state(state)
}

pub fn app(engine: Engine, db: DatabaseConnection, auth: AuthConfig) -> Router {
    router(ServerState {
        engine: Arc::new(engine),
        db,
        auth: Arc::new(auth),
    })
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    auth: AuthConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(engine, db, auth)).await
}
