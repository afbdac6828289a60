//! Presentation of an `AnalysisResult`.
//!
//! The pipeline only talks to a `Presenter`; `ViewPresenter` records the
//! display regions into an `AnalysisView` for the HTTP response.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::Value;

use crate::analysis::interpret::display_text;
use crate::analysis::models::{AnalysisResult, AnalysisView, SuggestionView, Suggestions};
use crate::analysis::session::{AnalysisSession, UiState};

/// Display limit for the missing-keyword list.
pub const MAX_KEYWORDS: usize = 6;
/// Display limit for the suggestion list.
pub const MAX_SUGGESTIONS: usize = 3;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));

/// Display capability the pipeline renders into.
pub trait Presenter: Send {
    fn set_status(&mut self, status: &str);
    fn show_panel(&mut self, panel: UiState);
    fn render_score(&mut self, score: &str);
    fn render_keywords(&mut self, keywords: &[String]);
    fn render_suggestions(&mut self, suggestions: &[SuggestionView]);
    fn render_error(&mut self, message: &str);
}

/// `"<value>%"` with the value exactly as the model sent it.
pub fn score_text(score: &Value) -> String {
    format!("{}%", display_text(score))
}

/// Replaces every `**X**` span with `<b>X</b>`. Nothing else is escaped.
pub fn emphasize(text: &str) -> String {
    BOLD.replace_all(text, "<b>$1</b>").into_owned()
}

/// Projects the result onto the score, keyword and suggestion regions.
pub fn render_result(result: &AnalysisResult, presenter: &mut dyn Presenter) {
    presenter.render_score(&score_text(&result.score));

    let keywords = result
        .missing_keywords
        .as_deref()
        .map(|all| &all[..all.len().min(MAX_KEYWORDS)])
        .unwrap_or_default();
    presenter.render_keywords(keywords);

    let suggestions: Vec<SuggestionView> = match &result.suggestions {
        Suggestions::List(items) => items
            .iter()
            .take(MAX_SUGGESTIONS)
            .map(|tip| SuggestionView {
                text: emphasize(tip),
                rich: true,
            })
            .collect(),
        Suggestions::Single(tip) => vec![SuggestionView {
            text: tip.clone(),
            rich: false,
        }],
        Suggestions::Absent => Vec::new(),
    };
    presenter.render_suggestions(&suggestions);
}

/// Records regions into an `AnalysisView`. Status and failure notifications go
/// to the session, so `GET /api/v1/analysis/state` shows progress and errors.
pub struct ViewPresenter {
    view: AnalysisView,
    session: Arc<AnalysisSession>,
}

impl ViewPresenter {
    pub fn new(view: AnalysisView, session: Arc<AnalysisSession>) -> Self {
        Self { view, session }
    }

    pub fn into_view(self) -> AnalysisView {
        self.view
    }
}

impl Presenter for ViewPresenter {
    fn set_status(&mut self, status: &str) {
        self.view.status = status.to_string();
        self.session.set_status(status);
    }

    fn show_panel(&mut self, panel: UiState) {
        self.view.panel = panel;
    }

    fn render_score(&mut self, score: &str) {
        self.view.score = Some(score.to_string());
    }

    fn render_keywords(&mut self, keywords: &[String]) {
        self.view.missing_keywords = keywords.to_vec();
    }

    fn render_suggestions(&mut self, suggestions: &[SuggestionView]) {
        self.view.suggestions = suggestions.to_vec();
    }

    fn render_error(&mut self, message: &str) {
        self.session.set_error(message);
    }
}
