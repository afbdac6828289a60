//! The analysis pipeline: extract → prompt → infer → interpret → render.
//!
//! Stages run strictly in order. Any failure is surfaced once, through the
//! presenter, and the panel reverts to `Initial`; nothing is rendered into the
//! result regions unless the whole reply was interpreted.

use tracing::{debug, error};

use crate::analysis::extract::extract_text;
use crate::analysis::interpret::interpret;
use crate::analysis::models::{AnalysisRequest, AnalysisResult};
use crate::analysis::prompts::build_prompt;
use crate::analysis::render::{render_result, Presenter};
use crate::analysis::session::UiState;
use crate::errors::AppError;
use crate::llm_client::InferenceClient;

pub const STATUS_READING: &str = "Reading PDF...";
pub const STATUS_PROCESSING: &str = "Processing API...";
pub const STATUS_COMPLETE: &str = "Analysis Complete";
pub const STATUS_ERROR: &str = "Error";

/// Runs one analysis and renders its outcome into `presenter`.
pub async fn run_analysis(
    request: &AnalysisRequest,
    llm: &dyn InferenceClient,
    presenter: &mut dyn Presenter,
) -> Result<AnalysisResult, AppError> {
    presenter.show_panel(UiState::Loading);

    match analyze(request, llm, presenter).await {
        Ok(result) => {
            render_result(&result, presenter);
            presenter.set_status(STATUS_COMPLETE);
            presenter.show_panel(UiState::Results);
            Ok(result)
        }
        Err(e) => {
            error!("Analysis failed: {e:?}");
            presenter.render_error(&format!("Analysis Failed: {e}"));
            presenter.set_status(STATUS_ERROR);
            presenter.show_panel(UiState::Initial);
            Err(e)
        }
    }
}

async fn analyze(
    request: &AnalysisRequest,
    llm: &dyn InferenceClient,
    presenter: &mut dyn Presenter,
) -> Result<AnalysisResult, AppError> {
    presenter.set_status(STATUS_READING);
    let resume_text = extract_text(&request.resume).await?;
    debug!(chars = resume_text.len(), "Resume text extracted");

    presenter.set_status(STATUS_PROCESSING);
    let prompt = build_prompt(&request.job_description, &resume_text);
    let completion = llm.complete(&prompt).await?;

    interpret(&completion)
}
