use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;

use hrm_api::app::app;
use hrm_api::auth::TokenService;
use hrm_api::blob::{BlobStore, LocalBlobStore};
use hrm_api::config::AppConfig;
use hrm_api::state::AppState;
use hrm_api::store::{MemoryStore, PgStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up AUTH_SECRET, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.default_log_filter()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("starting HRM API in {:?} mode", config.environment);

    // Construct every collaborator once and hand them to the router
    // explicitly; nothing below relies on process-global state.
    let config = Arc::new(config);
    let tokens = Arc::new(TokenService::new(&config.token_secret, config.token_ttl));
    let blobs: Arc<dyn BlobStore> =
        Arc::new(LocalBlobStore::new(config.upload_dir.clone(), "/uploads"));

    let state = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect_lazy(url)?;
            let store = Arc::new(PgStore::new(pool));
            AppState {
                config: config.clone(),
                tokens,
                users: store.clone(),
                sessions: store.clone(),
                departments: store.clone(),
                employees: store,
                blobs,
                store_backend: "postgres",
            }
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store (data is not persisted)");
            let store = Arc::new(MemoryStore::new());
            AppState {
                config: config.clone(),
                tokens,
                users: store.clone(),
                sessions: store.clone(),
                departments: store.clone(),
                employees: store,
                blobs,
                store_backend: "memory",
            }
        }
    };

    let router = app(state);

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("HRM API listening on http://{}", bind_addr);

    axum::serve(listener, router).await?;
    Ok(())
}
