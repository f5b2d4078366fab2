//! # Wire models for entries, auth and images
//!
//! These types are `Serialize + Deserialize + PartialEq` so they can cross the
//! server/client boundary and be compared in UI diffing. Ids and timestamps are
//! carried as `String`/`chrono::DateTime<Utc>` so the same structs work in WASM.
//!
//! Field names are camelCase on the wire (`ownerName`, `createdAt`, ...), matching
//! the public REST interface.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The fixed content category of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Thought,
    Learning,
    Note,
}

impl EntryKind {
    /// All kinds, in the order the site displays them.
    pub const ALL: [EntryKind; 3] = [EntryKind::Thought, EntryKind::Learning, EntryKind::Note];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Thought => "thought",
            EntryKind::Learning => "learning",
            EntryKind::Note => "note",
        }
    }

    /// Section heading used by the web UI.
    pub fn heading(&self) -> &'static str {
        match self {
            EntryKind::Thought => "Thoughts",
            EntryKind::Learning => "Learnings",
            EntryKind::Note => "Notes",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thought" => Ok(EntryKind::Thought),
            "learning" => Ok(EntryKind::Learning),
            "note" => Ok(EntryKind::Note),
            other => Err(UnknownKind(other.to_string())),
        }
    }
}

/// Error returned when parsing an entry kind from a string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entry kind: {0}")]
pub struct UnknownKind(pub String);

/// A user-authored piece of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub kind: EntryKind,
    pub title: Option<String>,
    /// Sanitized HTML.
    pub body: String,
    pub owner_id: String,
    /// Username snapshot taken when the entry was created.
    pub owner_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /api/entries`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub body: String,
}

/// Payload for `PUT /api/entries/{id}`. Absent fields are left untouched;
/// a present-but-empty title clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Query parameters for `GET /api/entries`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub kind: Option<EntryKind>,
    pub page: u32,
    pub limit: u32,
    pub q: Option<String>,
}

impl ListQuery {
    pub fn for_kind(kind: EntryKind, page: u32, limit: u32) -> Self {
        Self {
            kind: Some(kind),
            page,
            limit,
            q: None,
        }
    }

    pub fn with_query(mut self, q: impl Into<String>) -> Self {
        let q = q.into();
        if !q.is_empty() {
            self.q = Some(q);
        }
        self
    }
}

/// Payload for register and login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Response from register and login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
}

/// Payload for `POST /api/images-json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUpload {
    pub mime: String,
    /// Base64-encoded image bytes.
    pub data: String,
}

/// Response from an image upload: the stable url serves the raw bytes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageCreated {
    pub id: String,
    pub url: String,
}

/// Acknowledgment returned by `DELETE /api/entries/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteAck {
    pub ok: bool,
}

/// Error body every failing endpoint returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_roundtrips_through_str() {
        for kind in EntryKind::ALL {
            assert_eq!(kind.as_str().parse::<EntryKind>().unwrap(), kind);
        }
        assert!("essay".parse::<EntryKind>().is_err());
    }

    #[test]
    fn entry_serializes_camel_case() {
        let entry = Entry {
            id: "e1".into(),
            kind: EntryKind::Note,
            title: Some("Hi".into()),
            body: "<p>hello</p>".into(),
            owner_id: "u1".into(),
            owner_name: "ann".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["kind"], "note");
        assert_eq!(value["ownerName"], "ann");
        assert!(value.get("createdAt").is_some());
        assert!(value.get("owner_name").is_none());
    }

    #[test]
    fn patch_skips_absent_fields() {
        let patch = EntryPatch {
            title: Some(String::new()),
            body: None,
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value["title"], "");
        assert!(value.get("body").is_none());
    }
}
