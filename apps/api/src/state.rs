use std::sync::Arc;

use crate::analysis::session::AnalysisSession;
use crate::config::Config;
use crate::llm_client::InferenceClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable inference backend. Default: `OpenRouterClient`.
    pub inference: Arc<dyn InferenceClient>,
    /// The single page session this proxy serves; gates concurrent submissions.
    pub session: Arc<AnalysisSession>,
    pub config: Config,
}
