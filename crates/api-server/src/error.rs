//! HTTP mapping for handler failures. Every error body is `{"error": msg}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use report_orchestrator::ReportError;
use serde_json::json;
use statement_export::ExportError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<ReportError> for AppError {
    fn from(e: ReportError) -> Self {
        tracing::error!("Report failed: {}", e);
        AppError::Internal("Failed to fetch data".to_string())
    }
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::InvalidKind(_) => AppError::BadRequest(e.to_string()),
            ExportError::NoData | ExportError::NoSelection => AppError::NotFound(e.to_string()),
            ExportError::Source(_) | ExportError::Write(_) => {
                tracing::error!("Export failed: {}", e);
                AppError::Internal(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use report_core::SourceError;

    #[test]
    fn test_export_error_status() {
        let cases = [
            (ExportError::InvalidKind("x".into()), StatusCode::BAD_REQUEST),
            (ExportError::NoData, StatusCode::NOT_FOUND),
            (ExportError::NoSelection, StatusCode::NOT_FOUND),
            (ExportError::Source(SourceError::Timeout), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_report_error_hides_cause() {
        let err = ReportError::FetchFailed {
            symbol: "ZZZZ".into(),
            source: SourceError::NoData("ZZZZ".into()),
        };
        assert_eq!(AppError::from(err).to_string(), "Failed to fetch data");
    }
}
