use std::sync::Arc;

use anyhow::Context as _;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use server::store::PgStore;
use server::{build_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = Settings::new().context("failed to load settings")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database.url())
        .await
        .context("failed to connect to database")?;
    PgStore::init(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("failed to initialize schema: {e}"))?;

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let state = AppState::new(Arc::new(PgStore::new(pool)), settings);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
