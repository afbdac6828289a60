//! Axum route handlers for the Analysis API.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::analysis::models::{AnalysisRequest, AnalysisView, UploadedFile};
use crate::analysis::pipeline::run_analysis;
use crate::analysis::render::ViewPresenter;
use crate::analysis::session::SessionSnapshot;
use crate::errors::AppError;
use crate::state::AppState;

const MISSING_INPUT: &str = "Please provide both a Job Description and a Resume.";

/// POST /api/v1/analyze
///
/// Multipart form with a `job_description` text field and a `resume` file.
/// Rejected with 409 while another analysis is loading.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisView>, AppError> {
    let request = read_analysis_request(multipart, state.config.max_upload_bytes).await?;
    let ticket = state.session.begin()?;

    let analysis_id = Uuid::new_v4();
    info!(
        %analysis_id,
        file = request.resume.file_name.as_deref().unwrap_or("<unnamed>"),
        content_type = request.resume.content_type.as_deref().unwrap_or("<none>"),
        bytes = request.resume.bytes.len(),
        "Starting analysis"
    );

    let mut presenter =
        ViewPresenter::new(AnalysisView::new(analysis_id), Arc::clone(&state.session));

    match run_analysis(&request, state.inference.as_ref(), &mut presenter).await {
        Ok(_) => {
            ticket.succeed();
            let mut view = presenter.into_view();
            view.completed_at = Some(chrono::Utc::now());
            info!(%analysis_id, score = view.score.as_deref().unwrap_or(""), "Analysis complete");
            Ok(Json(view))
        }
        Err(e) => {
            ticket.fail();
            Err(e)
        }
    }
}

/// GET /api/v1/analysis/state
pub async fn handle_analysis_state(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.snapshot())
}

async fn read_analysis_request(
    mut multipart: Multipart,
    upload_limit: usize,
) -> Result<AnalysisRequest, AppError> {
    let mut job_description = None;
    let mut resume = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| {
            upload_error(e, upload_limit, |m| {
                AppError::Validation(format!("Invalid upload: {m}"))
            })
        })?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("job_description") => {
                let text = field.text().await.map_err(|e| {
                    upload_error(e, upload_limit, |m| {
                        AppError::Validation(format!("Invalid job description: {m}"))
                    })
                })?;
                job_description = Some(text);
            }
            Some("resume") => {
                let file_name = field
                    .file_name()
                    .filter(|n| !n.is_empty())
                    .map(str::to_owned);
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| upload_error(e, upload_limit, AppError::FileRead))?;
                // An empty file input still submits a part; it counts as no file.
                if file_name.is_some() && !bytes.is_empty() {
                    resume = Some(UploadedFile {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            _ => {}
        }
    }

    match (job_description, resume) {
        (Some(job_description), Some(resume)) if !job_description.is_empty() => {
            Ok(AnalysisRequest {
                job_description,
                resume,
            })
        }
        _ => Err(AppError::Validation(MISSING_INPUT.to_string())),
    }
}

/// Body-limit rejections become `UploadTooLarge`; anything else goes through `other`.
fn upload_error(
    err: MultipartError,
    upload_limit: usize,
    other: impl FnOnce(String) -> AppError,
) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::UploadTooLarge {
            limit: upload_limit,
        }
    } else {
        other(err.body_text())
    }
}
