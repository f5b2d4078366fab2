//! # API crate — shared wire types and HTTP client for Inkpost
//!
//! Everything that crosses the server/client boundary lives here, so the axum
//! backend and the Dioxus frontends agree on one definition of the wire format.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`models`] | — | `Entry`, `EntryKind`, auth/image payloads and responses |
//! | [`client`] | `client` | Typed `reqwest` client for the REST API (fetch-backed on wasm) |
//! | [`session`] | — | Browser-persisted `Session` (bearer token + username) |

pub mod models;
pub mod session;

#[cfg(feature = "client")]
pub mod client;

pub use models::{
    AuthResponse, Credentials, DeleteAck, Entry, EntryKind, EntryPatch, ErrorBody, ImageCreated,
    ImageUpload, ListQuery, NewEntry,
};
pub use session::Session;

#[cfg(feature = "client")]
pub use client::{Client, ClientError};
