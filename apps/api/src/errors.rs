use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Pipeline failures (file, PDF, network, malformed completion) carry a message
/// meant for the user; the page shows it verbatim in its failure notification.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("An analysis is already in progress")]
    Busy,

    #[error("The upload exceeds the {limit} byte limit")]
    UploadTooLarge { limit: usize },

    #[error("Could not read the uploaded file: {0}")]
    FileRead(String),

    #[error("Could not read the PDF: {0}")]
    PdfParse(String),

    /// Transport failure (`status` is `None`) or non-success HTTP status from
    /// the inference API.
    #[error("{message}")]
    Network { status: Option<u16>, message: String },

    #[error("The model returned an unreadable response: {0}")]
    MalformedResponse(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Http(e) => AppError::Network {
                status: None,
                message: format!("Network error: {e}"),
            },
            api @ LlmError::Api { status, .. } => AppError::Network {
                status: Some(status),
                message: api.to_string(),
            },
            LlmError::Parse(e) => AppError::MalformedResponse(e.to_string()),
            empty @ LlmError::EmptyContent => AppError::MalformedResponse(empty.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Busy => (StatusCode::CONFLICT, "ANALYSIS_IN_PROGRESS"),
            AppError::UploadTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "UPLOAD_TOO_LARGE"),
            AppError::FileRead(_) => (StatusCode::UNPROCESSABLE_ENTITY, "FILE_READ_ERROR"),
            AppError::PdfParse(_) => (StatusCode::UNPROCESSABLE_ENTITY, "PDF_PARSE_ERROR"),
            AppError::Network { .. } => (StatusCode::BAD_GATEWAY, "NETWORK_ERROR"),
            AppError::MalformedResponse(_) => (StatusCode::BAD_GATEWAY, "MALFORMED_RESPONSE"),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let message = match &self {
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_keeps_status_and_message() {
        let err: AppError = LlmError::Api {
            status: 401,
            message: "No auth credentials found".to_string(),
        }
        .into();
        match err {
            AppError::Network { status, message } => {
                assert_eq!(status, Some(401));
                assert_eq!(message, "API Error 401: No auth credentials found");
            }
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_content_is_malformed_response() {
        let err: AppError = LlmError::EmptyContent.into();
        assert!(matches!(err, AppError::MalformedResponse(_)));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::Busy.into_response().status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::UploadTooLarge { limit: 1024 }
                .into_response()
                .status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            AppError::PdfParse("bad xref".into()).into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::MalformedResponse("eof".into())
                .into_response()
                .status(),
            StatusCode::BAD_GATEWAY
        );
    }
}
