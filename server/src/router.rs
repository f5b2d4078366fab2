//! Router assembly and shared application state.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{auth, entries, images};
use crate::settings::Settings;
use crate::store::Store;

/// Allow small base64 image uploads in JSON bodies.
const BODY_LIMIT: usize = 6 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, settings: Settings) -> Self {
        Self {
            store,
            settings: Arc::new(settings),
        }
    }
}

/// The full application: API routes first, static frontend as the fallback.
pub fn build_router(state: AppState) -> Router {
    let assets = ServeDir::new(&state.settings.server.assets);
    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/entries", get(entries::list).post(entries::create))
        .route(
            "/api/entries/{id}",
            put(entries::edit).delete(entries::remove),
        )
        .route("/api/images-json", post(images::upload))
        .route("/api/images/{id}", get(images::fetch))
        .with_state(state)
        .fallback_service(assets)
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
