use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::store::CalendarStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Posts and campaigns. Postgres in production, in-memory for local runs.
    pub store: Arc<dyn CalendarStore>,
    pub llm: LlmClient,
    pub config: Config,
}
