//! Account registration, login, and the token material behind the bearer
//! scheme. The entity here mirrors the engine's `users` table so the auth
//! middleware can load the requesting account without going through the
//! engine.

use api_types::user::{AuthResponse, Login, ProfileResponse, ProfileView, Register, UserView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::{Duration, Utc};
use engine::EngineError;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use sea_orm::{QueryFilter, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, validation};

/// bcrypt work factor for new password hashes.
const BCRYPT_COST: u32 = 10;

const BAD_CREDENTIALS: &str = "Invalid email or password.";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Claims carried by every issued token.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    /// User id (UUID string).
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signing material and token lifetime for the bearer scheme.
#[derive(Clone)]
pub struct AuthConfig {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_lifetime: Duration,
}

impl AuthConfig {
    pub fn new(secret: &str, token_days: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            token_lifetime: Duration::try_days(token_days).unwrap_or_else(|| Duration::days(7)),
        }
    }

    fn issue_token(&self, user_id: &str, email: &str) -> Result<String, ServerError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_lifetime).timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| ServerError::Internal(format!("token signing failed: {err}")))
    }

    /// Decodes and verifies a token, including its expiry.
    pub(crate) fn verify_token(&self, token: &str) -> Option<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .ok()
    }
}

async fn hash_password(password: String) -> Result<String, ServerError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .map_err(|err| ServerError::Internal(err.to_string()))?
        .map_err(|err| ServerError::Internal(err.to_string()))
}

async fn verify_password(password: String, hash: String) -> Result<bool, ServerError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|err| ServerError::Internal(err.to_string()))?
        .map_err(|err| ServerError::Internal(err.to_string()))
}

pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<Register>,
) -> Result<(StatusCode, Json<AuthResponse>), ServerError> {
    validation::register(&payload)?;

    let password_hash = hash_password(payload.password).await?;
    let user = state
        .engine
        .register_user(&payload.name, &payload.email, &password_hash)
        .await?;
    let token = state.auth.issue_token(&user.id.to_string(), &user.email)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserView {
                id: user.id,
                name: user.name,
                email: user.email,
            },
        }),
    ))
}

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<Login>,
) -> Result<Json<AuthResponse>, ServerError> {
    validation::login(&payload)?;

    let user = Entity::find()
        .filter(Column::Email.eq(payload.email.trim()))
        .one(&state.db)
        .await
        .map_err(EngineError::from)?;
    let Some(user) = user else {
        return Err(ServerError::Auth(BAD_CREDENTIALS.to_string()));
    };

    if !verify_password(payload.password, user.password.clone()).await? {
        return Err(ServerError::Auth(BAD_CREDENTIALS.to_string()));
    }

    let token = state.auth.issue_token(&user.id, &user.email)?;
    let id = Uuid::parse_str(&user.id).map_err(|err| ServerError::Internal(err.to_string()))?;

    Ok(Json(AuthResponse {
        token,
        user: UserView {
            id,
            name: user.name,
            email: user.email,
        },
    }))
}

pub async fn profile(
    Extension(user): Extension<Model>,
) -> Result<Json<ProfileResponse>, ServerError> {
    let id = Uuid::parse_str(&user.id).map_err(|err| ServerError::Internal(err.to_string()))?;

    Ok(Json(ProfileResponse {
        user: ProfileView {
            id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        },
    }))
}
