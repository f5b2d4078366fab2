//! # Password hashing and bearer tokens
//!
//! - Passwords are hashed with Argon2id (random salt, default parameters) and
//!   stored as PHC-format strings.
//! - Tokens are stateless HS256 JWTs carrying `{sub: user id, username}` with a
//!   7-day expiry. There is no server-side revocation; logout is client-side.
//! - [`AuthUser`] is the axum extractor protected routes take: the
//!   `Authorization` header must split into exactly two whitespace-separated
//!   parts, the second a token passing signature and expiry checks.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::router::AppState;
use crate::store::UserRecord;

/// Token lifetime: 7 days.
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Claims embedded in every token the server issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub username: String,
    /// Issued-at (Unix seconds).
    pub iat: i64,
    /// Expiry (Unix seconds), validated on every request.
    pub exp: i64,
}

/// Hash a password with Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC-format hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Issue a signed token for the given user.
pub fn issue_token(user: &UserRecord, secret: &str) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(anyhow::anyhow!("token encoding failed: {e}")))
}

/// Verify signature and expiry, returning the claims.
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, ApiError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthorized("invalid token".into()))
}

/// The authenticated caller, extracted from the `Authorization` header.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing auth".into()))?;
        let parts: Vec<&str> = header.split(' ').collect();
        if parts.len() != 2 {
            return Err(ApiError::Unauthorized("malformed auth".into()));
        }
        let claims = verify_token(parts[1], &state.settings.auth.secret)?;
        let id = claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| ApiError::Unauthorized("invalid token".into()))?;
        Ok(AuthUser {
            id,
            username: claims.username,
        })
    }
}
