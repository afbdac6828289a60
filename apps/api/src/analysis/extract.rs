//! Text extraction from uploaded résumés.
//!
//! PDFs are parsed page by page with `pdf-extract`; every other declared type
//! is read as UTF-8 text as-is.

use tracing::debug;

use crate::analysis::models::UploadedFile;
use crate::errors::AppError;

const PDF_MIME: &str = "application/pdf";

/// Returns the plain text of an uploaded file.
pub async fn extract_text(file: &UploadedFile) -> Result<String, AppError> {
    if is_pdf(file.content_type.as_deref()) {
        let bytes = file.bytes.clone();
        // PDF parsing is CPU-bound and may panic on hostile input.
        let pages = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| AppError::PdfParse(format!("PDF parser aborted: {e}")))?
        .map_err(AppError::PdfParse)?;

        debug!(pages = pages.len(), "Extracted PDF text");
        Ok(assemble_pages(&pages))
    } else {
        String::from_utf8(file.bytes.to_vec())
            .map_err(|e| AppError::FileRead(format!("file is not valid UTF-8 text ({e})")))
    }
}

/// `application/pdf`, ignoring case and any media-type parameters.
fn is_pdf(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case(PDF_MIME))
        .unwrap_or(false)
}

/// Joins each page's text fragments with single spaces and terminates every
/// page with `\n`, keeping page order.
fn assemble_pages(pages: &[String]) -> String {
    let mut text = String::new();
    for page in pages {
        let fragments: Vec<&str> = page
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        text.push_str(&fragments.join(" "));
        text.push('\n');
    }
    text
}
