//! Entry CRUD and listing.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use api::{DeleteAck, Entry, EntryKind};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::router::AppState;
use crate::sanitize::{is_blank, sanitize_body};
use crate::store::{EntryFilter, EntryRecord, NewEntryRecord};

const DEFAULT_LIMIT: u32 = 10;

/// The single ownership predicate shared by edit and delete.
fn is_owner(entry: &EntryRecord, caller: &AuthUser) -> bool {
    entry.owner_id == caller.id
}

/// Parse a path id, mapping garbage to the same 404 an unknown id gets.
fn parse_id(id: &str) -> Result<Uuid, ApiError> {
    id.parse()
        .map_err(|_| ApiError::NotFound("not found".into()))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    kind: Option<String>,
    page: Option<u32>,
    limit: Option<u32>,
    q: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Entry>>, ApiError> {
    let kind = match params.kind.as_deref() {
        None => None,
        Some(raw) => match raw.parse::<EntryKind>() {
            Ok(kind) => Some(kind),
            // A kind no entry can carry matches nothing.
            Err(_) => return Ok(Json(Vec::new())),
        },
    };
    let filter = EntryFilter {
        kind,
        q: params.q.filter(|q| !q.is_empty()),
        page: params.page.unwrap_or(0),
        limit: params.limit.unwrap_or(DEFAULT_LIMIT),
    };
    let entries = state.store.list_entries(&filter).await?;
    Ok(Json(entries.iter().map(EntryRecord::to_dto).collect()))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
    kind: Option<String>,
    title: Option<String>,
    body: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    caller: AuthUser,
    Json(body): Json<CreateBody>,
) -> Result<(StatusCode, Json<Entry>), ApiError> {
    let missing = || ApiError::BadRequest("kind and body required".into());
    let kind = body
        .kind
        .filter(|k| !k.is_empty())
        .ok_or_else(missing)?
        .parse::<EntryKind>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let raw = body.body.filter(|b| !b.is_empty()).ok_or_else(missing)?;

    let clean = sanitize_body(&raw);
    if is_blank(&clean) {
        return Err(ApiError::BadRequest("body required".into()));
    }

    let entry = state
        .store
        .insert_entry(NewEntryRecord {
            kind,
            title: body.title,
            body: clean,
            owner_id: caller.id,
            owner_name: caller.username.clone(),
        })
        .await?;
    tracing::debug!(id = %entry.id, kind = %entry.kind, "created entry");
    Ok((StatusCode::CREATED, Json(entry.to_dto())))
}

#[derive(Debug, Deserialize)]
pub struct EditBody {
    title: Option<String>,
    body: Option<String>,
}

pub async fn edit(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
    Json(body): Json<EditBody>,
) -> Result<Json<Entry>, ApiError> {
    let id = parse_id(&id)?;
    let entry = state
        .store
        .entry_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("not found".into()))?;
    if !is_owner(&entry, &caller) {
        return Err(ApiError::Forbidden("not owner".into()));
    }

    // An empty body is ignored; an empty title still replaces. A body that
    // survives only as markup noise must not blank the stored one.
    let clean = match body.body.filter(|b| !b.is_empty()) {
        Some(raw) => {
            let clean = sanitize_body(&raw);
            if is_blank(&clean) {
                return Err(ApiError::BadRequest("body required".into()));
            }
            Some(clean)
        }
        None => None,
    };
    let updated = state
        .store
        .update_entry(id, body.title, clean)
        .await?
        .ok_or_else(|| ApiError::NotFound("not found".into()))?;
    Ok(Json(updated.to_dto()))
}

pub async fn remove(
    State(state): State<AppState>,
    caller: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, ApiError> {
    let id = parse_id(&id)?;
    let entry = state
        .store
        .entry_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("not found".into()))?;
    if !is_owner(&entry, &caller) {
        return Err(ApiError::Forbidden("not owner".into()));
    }

    // Not idempotent on purpose: a repeat call 404s above instead of acking.
    if !state.store.delete_entry(id).await? {
        return Err(ApiError::NotFound("not found".into()));
    }
    tracing::debug!(id = %id, "deleted entry");
    Ok(Json(DeleteAck { ok: true }))
}
