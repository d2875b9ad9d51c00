use anyhow::{bail, Context, Result};

/// Which `CalendarStore` backend the service runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Process-local store seeded from `fixtures::build_fixtures`.
    Memory,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    /// Required when `store_backend` is `Postgres`.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub fixture_seed: u64,
    pub llm_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let store_backend = parse_backend(
            &std::env::var("STORE_BACKEND").unwrap_or_else(|_| "postgres".to_string()),
        )?;

        let database_url = match store_backend {
            StoreBackend::Postgres => Some(require_env("DATABASE_URL")?),
            StoreBackend::Memory => std::env::var("DATABASE_URL").ok(),
        };

        Ok(Config {
            store_backend,
            database_url,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            fixture_seed: std::env::var("FIXTURE_SEED")
                .unwrap_or_else(|_| "42".to_string())
                .parse::<u64>()
                .context("FIXTURE_SEED must be an unsigned integer")?,
            llm_timeout_secs: std::env::var("LLM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse::<u64>()
                .context("LLM_TIMEOUT_SECS must be an unsigned integer")?,
        })
    }

    /// Configuration for tests and local runs: in-memory store, default seed.
    pub fn in_memory() -> Self {
        Config {
            store_backend: StoreBackend::Memory,
            database_url: None,
            port: 8080,
            rust_log: "info".to_string(),
            fixture_seed: 42,
            llm_timeout_secs: 120,
        }
    }
}

fn parse_backend(value: &str) -> Result<StoreBackend> {
    match value.trim().to_ascii_lowercase().as_str() {
        "postgres" | "pg" => Ok(StoreBackend::Postgres),
        "memory" | "mem" => Ok(StoreBackend::Memory),
        other => bail!("STORE_BACKEND must be 'postgres' or 'memory', got '{other}'"),
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
