use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use calendar::config::{Config, StoreBackend};
use calendar::db::create_pool;
use calendar::llm_client::LlmClient;
use calendar::routes::build_router;
use calendar::state::AppState;
use calendar::store::{CalendarStore, InMemoryStore, PgCalendarStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Calendar API v{}", env!("CARGO_PKG_VERSION"));

    let store: Arc<dyn CalendarStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres store")?;
            Arc::new(PgCalendarStore::new(create_pool(url).await?))
        }
        StoreBackend::Memory => Arc::new(InMemoryStore::from_fixtures(
            config.fixture_seed,
            Utc::now().date_naive(),
        )),
    };
    info!("Calendar store ready ({:?})", config.store_backend);

    let llm = LlmClient::new(Duration::from_secs(config.llm_timeout_secs))?;
    info!("LLM client initialized (timeout {}s)", config.llm_timeout_secs);

    let state = AppState {
        store,
        llm,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the dashboard host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
