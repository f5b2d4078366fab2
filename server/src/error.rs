//! Error taxonomy for the REST API.
//!
//! Every handler failure becomes a status code plus an `{"error": "..."}` JSON
//! body. Internal failures are logged and answered with a fixed message so
//! backend details never leak to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid required fields.
    #[error("{0}")]
    BadRequest(String),

    /// Missing/malformed/invalid token, or bad login credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated, but not the resource owner.
    #[error("{0}")]
    Forbidden(String),

    /// Unknown resource id.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate unique key (username).
    #[error("{0}")]
    Conflict(String),

    /// Unexpected store or library failure.
    #[error("server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => ApiError::Conflict("duplicate".into()),
            StoreError::Backend(err) => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(err) = &self {
            tracing::error!(error = %err, "request failed");
        }
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
