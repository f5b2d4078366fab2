//! Inkpost backend: a REST CRUD API over users, entries and images.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod router;
pub mod sanitize;
pub mod settings;
pub mod store;

pub use router::{build_router, AppState};
pub use settings::Settings;
