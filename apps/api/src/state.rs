use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LanguageModel;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when the LLM is disabled; guide requests then use templates.
    pub llm: Option<Arc<dyn LanguageModel>>,
    pub sessions: SessionStore,
    pub config: Config,
}
