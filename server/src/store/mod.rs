//! # Storage seam
//!
//! Handlers talk to a [`Store`] trait so the router can run against either the
//! Postgres implementation ([`postgres::PgStore`]) or the in-memory
//! [`MemoryStore`] used by tests.
//!
//! Records are the server-side shapes (real `Uuid`s, password hashes); the
//! client-safe projection is [`EntryRecord::to_dto`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use api::{Entry, EntryKind};

pub mod postgres;
pub use postgres::PgStore;

/// Failure inside a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique constraint (username) was violated.
    #[error("duplicate key")]
    Duplicate,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Duplicate,
            _ => StoreError::Backend(err.into()),
        }
    }
}

/// Full user row. Never crosses the wire.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Full entry row.
#[derive(Debug, Clone)]
pub struct EntryRecord {
    pub id: Uuid,
    pub kind: EntryKind,
    pub title: Option<String>,
    pub body: String,
    pub owner_id: Uuid,
    pub owner_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EntryRecord {
    /// Project into the wire model.
    pub fn to_dto(&self) -> Entry {
        Entry {
            id: self.id.to_string(),
            kind: self.kind,
            title: self.title.clone(),
            body: self.body.clone(),
            owner_id: self.owner_id.to_string(),
            owner_name: self.owner_name.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Stored image blob, still base64-encoded.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    pub id: Uuid,
    pub mime: String,
    pub data: String,
    pub created_at: DateTime<Utc>,
}

/// Fields of a new entry; timestamps and id are generated by the store.
#[derive(Debug, Clone)]
pub struct NewEntryRecord {
    pub kind: EntryKind,
    pub title: Option<String>,
    pub body: String,
    pub owner_id: Uuid,
    pub owner_name: String,
}

/// Listing filter: optional exact kind, optional case-insensitive literal
/// substring over title OR body, newest first, offset `page * limit`.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub kind: Option<EntryKind>,
    pub q: Option<String>,
    pub page: u32,
    pub limit: u32,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<UserRecord, StoreError>;

    async fn user_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn insert_entry(&self, new: NewEntryRecord) -> Result<EntryRecord, StoreError>;

    async fn entry_by_id(&self, id: Uuid) -> Result<Option<EntryRecord>, StoreError>;

    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<EntryRecord>, StoreError>;

    /// Apply a patch: `title` replaces when present (including empty), `body`
    /// replaces when present. Refreshes `updated_at`. `None` when the id is
    /// unknown.
    async fn update_entry(
        &self,
        id: Uuid,
        title: Option<String>,
        body: Option<String>,
    ) -> Result<Option<EntryRecord>, StoreError>;

    /// `true` when a row was actually deleted.
    async fn delete_entry(&self, id: Uuid) -> Result<bool, StoreError>;

    async fn insert_image(&self, mime: &str, data: &str) -> Result<ImageRecord, StoreError>;

    async fn image_by_id(&self, id: Uuid) -> Result<Option<ImageRecord>, StoreError>;
}

/// In-memory store for tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, UserRecord>,
    entries: HashMap<Uuid, EntryRecord>,
    images: HashMap<Uuid, ImageRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Lock poisoning only happens after a panicked test.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn matches_query(entry: &EntryRecord, q: &str) -> bool {
    let q = q.to_lowercase();
    entry
        .title
        .as_deref()
        .is_some_and(|t| t.to_lowercase().contains(&q))
        || entry.body.to_lowercase().contains(&q)
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<UserRecord, StoreError> {
        let mut inner = self.lock();
        if inner.users.values().any(|u| u.username == username) {
            return Err(StoreError::Duplicate);
        }
        let user = UserRecord {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn insert_entry(&self, new: NewEntryRecord) -> Result<EntryRecord, StoreError> {
        let now = Utc::now();
        let entry = EntryRecord {
            id: Uuid::new_v4(),
            kind: new.kind,
            title: new.title,
            body: new.body,
            owner_id: new.owner_id,
            owner_name: new.owner_name,
            created_at: now,
            updated_at: now,
        };
        self.lock().entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn entry_by_id(&self, id: Uuid) -> Result<Option<EntryRecord>, StoreError> {
        Ok(self.lock().entries.get(&id).cloned())
    }

    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<EntryRecord>, StoreError> {
        let inner = self.lock();
        let mut matched: Vec<EntryRecord> = inner
            .entries
            .values()
            .filter(|e| filter.kind.is_none_or(|k| e.kind == k))
            .filter(|e| filter.q.as_deref().is_none_or(|q| matches_query(e, q)))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let skip = (filter.page as usize).saturating_mul(filter.limit as usize);
        Ok(matched
            .into_iter()
            .skip(skip)
            .take(filter.limit as usize)
            .collect())
    }

    async fn update_entry(
        &self,
        id: Uuid,
        title: Option<String>,
        body: Option<String>,
    ) -> Result<Option<EntryRecord>, StoreError> {
        let mut inner = self.lock();
        let Some(entry) = inner.entries.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(title) = title {
            entry.title = Some(title);
        }
        if let Some(body) = body {
            entry.body = body;
        }
        entry.updated_at = Utc::now();
        Ok(Some(entry.clone()))
    }

    async fn delete_entry(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.lock().entries.remove(&id).is_some())
    }

    async fn insert_image(&self, mime: &str, data: &str) -> Result<ImageRecord, StoreError> {
        let image = ImageRecord {
            id: Uuid::new_v4(),
            mime: mime.to_string(),
            data: data.to_string(),
            created_at: Utc::now(),
        };
        self.lock().images.insert(image.id, image.clone());
        Ok(image)
    }

    async fn image_by_id(&self, id: Uuid) -> Result<Option<ImageRecord>, StoreError> {
        Ok(self.lock().images.get(&id).cloned())
    }
}
