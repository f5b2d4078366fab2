//! # Typed REST client
//!
//! One [`Client`] per frontend, constructed against a base url ("" for same-origin
//! in the browser) and optionally carrying the session's bearer token. Every
//! method maps 1:1 to an endpoint of the backend; non-2xx responses are decoded
//! into the `{error}` body and surfaced as [`ClientError::Api`].
//!
//! `reqwest` is fetch-backed on wasm32, so the same code serves the web app and
//! native callers.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::{
    AuthResponse, Credentials, DeleteAck, Entry, EntryPatch, ErrorBody, ImageCreated, ImageUpload,
    ListQuery, NewEntry,
};
use crate::session::Session;

/// Failure talking to the backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with an error status and (usually) an `{error}` body.
    #[error("{message}")]
    Api { status: StatusCode, message: String },
    /// The request never completed, or the response body was not valid JSON.
    #[error(transparent)]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Network(_) => None,
        }
    }
}

/// Typed client for the Inkpost REST API.
#[derive(Debug, Clone, Default)]
pub struct Client {
    base_url: String,
    http: reqwest::Client,
    token: Option<String>,
}

impl Client {
    /// Client without credentials. `base_url` is "" for same-origin requests.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
            token: None,
        }
    }

    /// Client authenticated with the given session's token.
    pub fn with_session(base_url: impl Into<String>, session: Option<&Session>) -> Self {
        let mut client = Self::new(base_url);
        client.token = session.map(|s| s.token.clone());
        client
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => format!("request failed with status {status}"),
        };
        Err(ClientError::Api { status, message })
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.send(self.request(Method::POST, "/api/auth/register").json(&body))
            .await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ClientError> {
        let body = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.send(self.request(Method::POST, "/api/auth/login").json(&body))
            .await
    }

    pub async fn list_entries(&self, query: &ListQuery) -> Result<Vec<Entry>, ClientError> {
        let mut params: Vec<(&str, String)> = Vec::new();
        if let Some(kind) = query.kind {
            params.push(("kind", kind.to_string()));
        }
        params.push(("page", query.page.to_string()));
        params.push(("limit", query.limit.to_string()));
        if let Some(q) = &query.q {
            params.push(("q", q.clone()));
        }
        self.send(self.request(Method::GET, "/api/entries").query(&params))
            .await
    }

    pub async fn create_entry(&self, new: &NewEntry) -> Result<Entry, ClientError> {
        self.send(self.request(Method::POST, "/api/entries").json(new))
            .await
    }

    pub async fn edit_entry(&self, id: &str, patch: &EntryPatch) -> Result<Entry, ClientError> {
        self.send(
            self.request(Method::PUT, &format!("/api/entries/{id}"))
                .json(patch),
        )
        .await
    }

    pub async fn delete_entry(&self, id: &str) -> Result<DeleteAck, ClientError> {
        self.send(self.request(Method::DELETE, &format!("/api/entries/{id}")))
            .await
    }

    pub async fn upload_image(&self, mime: &str, data: &str) -> Result<ImageCreated, ClientError> {
        let body = ImageUpload {
            mime: mime.to_string(),
            data: data.to_string(),
        };
        self.send(self.request(Method::POST, "/api/images-json").json(&body))
            .await
    }
}
