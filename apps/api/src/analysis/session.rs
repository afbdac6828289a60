//! The analysis session: which panel the page shows and the status line.
//!
//! Exactly one `UiState` is active. Transitions follow the pipeline only:
//!
//! ```text
//! Initial ──submit──▶ Loading ──ok──▶ Results ──submit──▶ Loading
//!                        │
//!                        └─fail──▶ Error ──▶ Initial
//! ```
//!
//! A submission while `Loading` is rejected with `AppError::Busy`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiState {
    Initial,
    Loading,
    Results,
    /// Passed through on failure on the way back to `Initial`; never a resting state.
    Error,
}

impl UiState {
    pub fn can_transition_to(self, next: UiState) -> bool {
        matches!(
            (self, next),
            (UiState::Initial | UiState::Results, UiState::Loading)
                | (UiState::Loading, UiState::Results)
                | (UiState::Loading, UiState::Error)
                | (UiState::Error, UiState::Initial)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub ui_state: UiState,
    pub status: String,
    /// Failure notification of the last analysis, cleared by the next submission.
    pub error: Option<String>,
}

#[derive(Debug)]
struct SessionInner {
    state: UiState,
    status: String,
    error: Option<String>,
}

/// Shared between handlers via `AppState`. The lock is never held across an await.
#[derive(Debug)]
pub struct AnalysisSession {
    inner: Mutex<SessionInner>,
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self {
            inner: Mutex::new(SessionInner {
                state: UiState::Initial,
                status: "Waiting for input...".to_string(),
                error: None,
            }),
        }
    }
}

impl AnalysisSession {
    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.lock();
        SessionSnapshot {
            ui_state: inner.state,
            status: inner.status.clone(),
            error: inner.error.clone(),
        }
    }

    pub fn set_status(&self, status: &str) {
        self.lock().status = status.to_string();
    }

    pub fn set_error(&self, message: &str) {
        self.lock().error = Some(message.to_string());
    }

    /// Enters `Loading`. The returned ticket settles the session; dropping it
    /// unsettled (abandoned request) reverts to `Initial`.
    pub fn begin(self: &Arc<Self>) -> Result<LoadingTicket, AppError> {
        let mut inner = self.lock();
        if !inner.state.can_transition_to(UiState::Loading) {
            return Err(AppError::Busy);
        }
        transition(&mut inner, UiState::Loading);
        inner.error = None;
        Ok(LoadingTicket {
            session: Arc::clone(self),
            settled: false,
        })
    }
}

fn transition(inner: &mut SessionInner, next: UiState) {
    debug_assert!(
        inner.state.can_transition_to(next),
        "illegal transition {:?} -> {next:?}",
        inner.state
    );
    debug!(from = ?inner.state, to = ?next, "UI state transition");
    inner.state = next;
}

/// Proof that this caller owns the `Loading` state.
#[derive(Debug)]
pub struct LoadingTicket {
    session: Arc<AnalysisSession>,
    settled: bool,
}

impl LoadingTicket {
    pub fn succeed(mut self) {
        let mut inner = self.session.lock();
        transition(&mut inner, UiState::Results);
        self.settled = true;
    }

    pub fn fail(mut self) {
        revert(&self.session);
        self.settled = true;
    }
}

impl Drop for LoadingTicket {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Analysis abandoned while loading; reverting to initial panel");
            revert(&self.session);
        }
    }
}

fn revert(session: &AnalysisSession) {
    let mut inner = session.lock();
    transition(&mut inner, UiState::Error);
    transition(&mut inner, UiState::Initial);
}
