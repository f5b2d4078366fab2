//! Postgres-backed [`Store`].
//!
//! Runtime (non-macro) queries against three tables created on startup. The
//! search filter escapes LIKE metacharacters so `q` is always matched as
//! literal text.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Row};
use uuid::Uuid;

use api::EntryKind;

use super::{
    EntryFilter, EntryRecord, ImageRecord, NewEntryRecord, Store, StoreError, UserRecord,
};

const ENTRY_COLUMNS: &str = "id, kind, title, body, owner_id, owner_name, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the tables if they don't exist.
    pub async fn init(pool: &PgPool) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )",
        )
        .execute(pool)
        .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS entries (
                id UUID PRIMARY KEY,
                kind TEXT NOT NULL,
                title TEXT,
                body TEXT NOT NULL,
                owner_id UUID NOT NULL REFERENCES users(id),
                owner_name TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )",
        )
        .execute(pool)
        .await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS images (
                id UUID PRIMARY KEY,
                mime TEXT NOT NULL,
                data TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )",
        )
        .execute(pool)
        .await?;
        Ok(())
    }
}

/// Raw entry row; `kind` still a string until parsed.
#[derive(FromRow)]
struct EntryRow {
    id: Uuid,
    kind: String,
    title: Option<String>,
    body: String,
    owner_id: Uuid,
    owner_name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EntryRow {
    fn into_record(self) -> Result<EntryRecord, StoreError> {
        let kind: EntryKind = self
            .kind
            .parse()
            .map_err(|e| StoreError::Backend(anyhow::Error::new(e)))?;
        Ok(EntryRecord {
            id: self.id,
            kind,
            title: self.title,
            body: self.body,
            owner_id: self.owner_id,
            owner_name: self.owner_name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn user_from_row(row: PgRow) -> Result<UserRecord, sqlx::Error> {
    Ok(UserRecord {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Escape `\`, `%` and `_` so user text matches literally inside LIKE.
fn escape_like(q: &str) -> String {
    let mut out = String::with_capacity(q.len());
    for c in q.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<UserRecord, StoreError> {
        let row = sqlx::query(
            "INSERT INTO users (id, username, password_hash, created_at)
             VALUES ($1, $2, $3, $4)
             RETURNING id, username, password_hash, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;
        Ok(user_from_row(row)?)
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        row.map(user_from_row).transpose().map_err(StoreError::from)
    }

    async fn insert_entry(&self, new: NewEntryRecord) -> Result<EntryRecord, StoreError> {
        let now = Utc::now();
        let row: EntryRow = sqlx::query_as(&format!(
            "INSERT INTO entries (id, kind, title, body, owner_id, owner_name, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING {ENTRY_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(new.kind.as_str())
        .bind(new.title)
        .bind(new.body)
        .bind(new.owner_id)
        .bind(new.owner_name)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;
        row.into_record()
    }

    async fn entry_by_id(&self, id: Uuid) -> Result<Option<EntryRecord>, StoreError> {
        let row: Option<EntryRow> =
            sqlx::query_as(&format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        row.map(EntryRow::into_record).transpose()
    }

    async fn list_entries(&self, filter: &EntryFilter) -> Result<Vec<EntryRecord>, StoreError> {
        let pattern = filter
            .q
            .as_deref()
            .map(|q| format!("%{}%", escape_like(q)));
        let offset = i64::from(filter.page) * i64::from(filter.limit);
        let rows: Vec<EntryRow> = sqlx::query_as(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries
             WHERE ($1::text IS NULL OR kind = $1)
               AND ($2::text IS NULL
                    OR title ILIKE $2 ESCAPE '\\'
                    OR body ILIKE $2 ESCAPE '\\')
             ORDER BY created_at DESC, id DESC
             OFFSET $3 LIMIT $4"
        ))
        .bind(filter.kind.map(|k| k.as_str().to_string()))
        .bind(pattern)
        .bind(offset)
        .bind(i64::from(filter.limit))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(EntryRow::into_record).collect()
    }

    async fn update_entry(
        &self,
        id: Uuid,
        title: Option<String>,
        body: Option<String>,
    ) -> Result<Option<EntryRecord>, StoreError> {
        let row: Option<EntryRow> = sqlx::query_as(&format!(
            "UPDATE entries
             SET title = COALESCE($2, title),
                 body = COALESCE($3, body),
                 updated_at = $4
             WHERE id = $1
             RETURNING {ENTRY_COLUMNS}"
        ))
        .bind(id)
        .bind(title)
        .bind(body)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        row.map(EntryRow::into_record).transpose()
    }

    async fn delete_entry(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_image(&self, mime: &str, data: &str) -> Result<ImageRecord, StoreError> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();
        sqlx::query("INSERT INTO images (id, mime, data, created_at) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(mime)
            .bind(data)
            .bind(created_at)
            .execute(&self.pool)
            .await?;
        Ok(ImageRecord {
            id,
            mime: mime.to_string(),
            data: data.to_string(),
            created_at,
        })
    }

    async fn image_by_id(&self, id: Uuid) -> Result<Option<ImageRecord>, StoreError> {
        let row = sqlx::query("SELECT id, mime, data, created_at FROM images WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row
            .map(|row| -> Result<ImageRecord, sqlx::Error> {
                Ok(ImageRecord {
                    id: row.try_get("id")?,
                    mime: row.try_get("mime")?,
                    data: row.try_get("data")?,
                    created_at: row.try_get("created_at")?,
                })
            })
            .transpose()?)
    }
}
