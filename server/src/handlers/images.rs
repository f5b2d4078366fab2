//! Base64 image upload and raw-byte serving.

use anyhow::Context as _;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Deserialize;
use uuid::Uuid;

use api::ImageCreated;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::router::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadBody {
    mime: Option<String>,
    data: Option<String>,
}

pub async fn upload(
    State(state): State<AppState>,
    _caller: AuthUser,
    Json(body): Json<UploadBody>,
) -> Result<(StatusCode, Json<ImageCreated>), ApiError> {
    let (Some(mime), Some(data)) = (
        body.mime.filter(|m| !m.is_empty()),
        body.data.filter(|d| !d.is_empty()),
    ) else {
        return Err(ApiError::BadRequest("mime and data required".into()));
    };
    let image = state.store.insert_image(&mime, &data).await?;
    Ok((
        StatusCode::CREATED,
        Json(ImageCreated {
            id: image.id.to_string(),
            url: format!("/api/images/{}", image.id),
        }),
    ))
}

pub async fn fetch(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: Uuid = id
        .parse()
        .map_err(|_| ApiError::NotFound("not found".into()))?;
    let image = state
        .store
        .image_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("not found".into()))?;
    let bytes = STANDARD
        .decode(image.data.as_bytes())
        .context("stored image is not valid base64")?;
    Ok(([(header::CONTENT_TYPE, image.mime)], bytes))
}
