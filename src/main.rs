use anyhow::Context;
use tracing_subscriber::EnvFilter;

use complaints_api::config::AppConfig;
use complaints_api::database::{DatabaseManager, Store};
use complaints_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = AppConfig::from_env().context("loading configuration")?;
    tracing::info!("Starting Complaints API in {:?} mode", config.environment);

    let (store, pool) = match config.database.url {
        Some(_) => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::apply_schema(&pool).await?;
            (Store::postgres(pool.clone()), Some(pool))
        }
        None => {
            // Only reachable in development; other environments require DATABASE_URL.
            tracing::warn!("DATABASE_URL not set; using the in-memory store (data is lost on exit)");
            (Store::memory(), None)
        }
    };

    let bind_addr = config.bind_addr();
    let state = AppState::new(config, store, pool);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Complaints API listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server")?;
    Ok(())
}
