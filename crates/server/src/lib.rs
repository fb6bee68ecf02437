use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{app, run_with_listener};
pub use user::AuthConfig;

mod budgets;
mod categories;
mod dashboard;
mod server;
mod solde;
mod transactions;
mod user;
mod validation;

pub enum ServerError {
    Engine(EngineError),
    /// Boundary validation failures, reported all at once.
    Validation(Vec<FieldError>),
    /// Credential failures; carries the one message shown for all of them.
    Auth(String),
    /// Faults that must not leak detail; logged, answered with a stock body.
    Internal(String),
}

/// A single failed boundary check in the `{field, message}` wire shape.
#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

#[derive(Serialize)]
struct Error {
    message: String,
}

#[derive(Serialize)]
struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::ExistingKey(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidCategory(_)
        | EngineError::CategoryInUse(_) => StatusCode::BAD_REQUEST,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "Server error.".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ServerError::Engine(err) => {
                let status = status_for_engine_error(&err);
                let message = message_for_engine_error(err);
                (status, Json(Error { message })).into_response()
            }
            ServerError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(ValidationErrors { errors })).into_response()
            }
            ServerError::Auth(message) => {
                (StatusCode::UNAUTHORIZED, Json(Error { message })).into_response()
            }
            ServerError::Internal(detail) => {
                tracing::error!("internal error: {detail}");
                let message = "Server error.".to_string();
                (StatusCode::INTERNAL_SERVER_ERROR, Json(Error { message })).into_response()
            }
        }
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("Budget".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflicts_map_to_400() {
        let conflicts = [
            EngineError::ExistingKey("Category with this name".to_string()),
            EngineError::InvalidAmount("amount must be > 0".to_string()),
            EngineError::InvalidCategory("x".to_string()),
            EngineError::CategoryInUse("x".to_string()),
        ];
        for err in conflicts {
            let res = ServerError::from(err).into_response();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn engine_database_maps_to_500() {
        let err = EngineError::Database(sea_orm::DbErr::Custom("boom".to_string()));
        let res = ServerError::from(err).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_maps_to_400() {
        let res = ServerError::Validation(vec![FieldError {
            field: "month",
            message: "Month must be between 1 and 12",
        }])
        .into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn auth_maps_to_401() {
        let res = ServerError::Auth("Invalid email or password.".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_maps_to_500() {
        let res = ServerError::Internal("token signing failed".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
