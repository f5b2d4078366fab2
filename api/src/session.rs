//! # Browser-persisted session
//!
//! The client keeps two independent pieces of state in persistent storage: the
//! bearer token (`site_token`) and the username (`site_user`). [`Session`] bundles
//! them into one explicit value that is loaded once at startup and passed into
//! components, instead of being read ad hoc from global storage.
//!
//! - **Web** (wasm32): `window.localStorage` via `web-sys`.
//! - **Native**: a process-local fallback, used by tests and non-browser targets.
//!
//! Logout is purely client-side: [`Session::clear`] removes both keys, the token
//! itself stays valid until it expires.

use serde::{Deserialize, Serialize};

const TOKEN_KEY: &str = "site_token";
const USER_KEY: &str = "site_user";

/// An authenticated identity as the client remembers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub username: String,
}

impl Session {
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
        }
    }

    /// Load the remembered session, if both token and username are present.
    pub fn load() -> Option<Session> {
        let token = storage_get(TOKEN_KEY)?;
        let username = storage_get(USER_KEY)?;
        if token.is_empty() || username.is_empty() {
            return None;
        }
        Some(Session { token, username })
    }

    /// Persist this session for future page loads.
    pub fn save(&self) {
        storage_set(TOKEN_KEY, &self.token);
        storage_set(USER_KEY, &self.username);
    }

    /// Forget the remembered session (client-side logout).
    pub fn clear() {
        storage_remove(TOKEN_KEY);
        storage_remove(USER_KEY);
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(target_arch = "wasm32")]
fn storage_get(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

#[cfg(target_arch = "wasm32")]
fn storage_set(key: &str, value: &str) {
    if let Some(storage) = local_storage() {
        if storage.set_item(key, value).is_err() {
            tracing::warn!("failed to persist {key}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn storage_remove(key: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(key);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod fallback {
    use std::collections::HashMap;
    use std::sync::Mutex;

    static STORE: Mutex<Option<HashMap<String, String>>> = Mutex::new(None);

    pub fn get(key: &str) -> Option<String> {
        STORE.lock().ok()?.as_ref()?.get(key).cloned()
    }

    pub fn set(key: &str, value: &str) {
        if let Ok(mut guard) = STORE.lock() {
            guard
                .get_or_insert_with(HashMap::new)
                .insert(key.to_string(), value.to_string());
        }
    }

    pub fn remove(key: &str) {
        if let Ok(mut guard) = STORE.lock() {
            if let Some(map) = guard.as_mut() {
                map.remove(key);
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn storage_get(key: &str) -> Option<String> {
    fallback::get(key)
}

#[cfg(not(target_arch = "wasm32"))]
fn storage_set(key: &str, value: &str) {
    fallback::set(key, value);
}

#[cfg(not(target_arch = "wasm32"))]
fn storage_remove(key: &str) {
    fallback::remove(key);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_clear_roundtrip() {
        Session::clear();
        assert_eq!(Session::load(), None);

        let session = Session::new("tok", "ann");
        session.save();
        assert_eq!(Session::load(), Some(session));

        Session::clear();
        assert_eq!(Session::load(), None);
    }
}
