use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::analysis::session::UiState;

/// A file as it arrived in the upload, with whatever type the browser declared.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// One submission from the page. Consumed by the pipeline, never stored.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub job_description: String,
    pub resume: UploadedFile,
}

/// The `suggestions` field as the model returned it.
#[derive(Debug, Clone, PartialEq)]
pub enum Suggestions {
    List(Vec<String>),
    /// The model answered with one string instead of a list.
    Single(String),
    Absent,
}

/// Parsed model reply. Values are kept as permissive as the model sent them;
/// only the display limits are applied at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Raw JSON value; not clamped to 0–100.
    pub score: Value,
    /// `None` when the field is absent or not a list.
    pub missing_keywords: Option<Vec<String>>,
    pub suggestions: Suggestions,
}

/// A rendered suggestion entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionView {
    pub text: String,
    /// `true` when `text` carries `<b>` markup and must be inserted as HTML.
    pub rich: bool,
}

/// The display surface as the page should show it after one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisView {
    pub analysis_id: Uuid,
    pub panel: UiState,
    pub status: String,
    pub score: Option<String>,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<SuggestionView>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl AnalysisView {
    pub fn new(analysis_id: Uuid) -> Self {
        Self {
            analysis_id,
            panel: UiState::Initial,
            status: String::new(),
            score: None,
            missing_keywords: Vec::new(),
            suggestions: Vec::new(),
            completed_at: None,
        }
    }
}
