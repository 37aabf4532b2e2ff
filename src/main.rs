use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use sokol_admin::config::{config, DatabaseConfig};
use sokol_admin::database::{DatabaseManager, GroupStore, MemoryStore, PgStore, SeedData};
use sokol_admin::{is_production, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config();
    tracing::info!("Starting Sokol admin API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        if is_production!() {
            anyhow::bail!("JWT_SECRET must be set in production");
        }
        tracing::warn!("JWT_SECRET is empty; every mutating request will be refused");
    }

    let store = open_store(&config.database).await?;
    let state = AppState::new(store, config.security.jwt_secret.as_str());
    let app = routes::app(state, &config.security);

    let bind_addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Sokol admin API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// PostgreSQL when a URL is configured, otherwise the in-memory store
async fn open_store(database: &DatabaseConfig) -> anyhow::Result<Arc<dyn GroupStore>> {
    if database.url.is_some() {
        let pool = DatabaseManager::connect(database).await?;
        tracing::info!("Using PostgreSQL store");
        return Ok(Arc::new(PgStore::new(pool)));
    }

    let store = match &database.seed_file {
        Some(path) => {
            let seed = SeedData::load(path)?;
            tracing::info!(
                "Using in-memory store seeded from {} ({} member(s), {} program(s), {} location(s))",
                path,
                seed.members.len(),
                seed.programs.len(),
                seed.locations.len()
            );
            MemoryStore::with_seed(seed)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using an empty in-memory store");
            MemoryStore::new()
        }
    };
    Ok(Arc::new(store))
}
