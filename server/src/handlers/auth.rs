//! Registration and login.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use api::AuthResponse;

use crate::auth::{hash_password, issue_token, verify_password};
use crate::error::ApiError;
use crate::router::AppState;
use crate::store::StoreError;

/// Both fields optional so missing ones map to 400 instead of a decode error.
#[derive(Debug, Deserialize)]
pub struct CredentialsBody {
    username: Option<String>,
    password: Option<String>,
}

impl CredentialsBody {
    fn require(self) -> Result<(String, String), ApiError> {
        match (self.username, self.password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Ok((u, p)),
            _ => Err(ApiError::BadRequest(
                "username and password required".into(),
            )),
        }
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let (username, password) = body.require()?;
    let hash = hash_password(&password)?;
    let user = state
        .store
        .create_user(&username, &hash)
        .await
        .map_err(|e| match e {
            StoreError::Duplicate => ApiError::Conflict("username taken".into()),
            other => other.into(),
        })?;
    tracing::info!(username = %user.username, "registered user");
    let token = issue_token(&user, &state.settings.auth.secret)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            username: user.username,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsBody>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (username, password) = body.require()?;
    // Same error for unknown username and wrong password, so responses don't
    // reveal which usernames exist.
    let invalid = || ApiError::Unauthorized("invalid".into());
    let user = state
        .store
        .user_by_username(&username)
        .await?
        .ok_or_else(invalid)?;
    if !verify_password(&password, &user.password_hash) {
        return Err(invalid());
    }
    let token = issue_token(&user, &state.settings.auth.secret)?;
    Ok(Json(AuthResponse {
        token,
        username: user.username,
    }))
}
