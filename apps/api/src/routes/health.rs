use axum::{extract::State, Json};
use serde::Serialize;

use crate::analysis::session::UiState;
use crate::llm_client::MODEL;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// Model every analysis is sent to.
    pub model: &'static str,
    /// Current panel of the page session; a long-lived `loading` means a stuck analysis.
    pub ui_state: UiState,
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        model: MODEL,
        ui_state: state.session.snapshot().ui_state,
    })
}
