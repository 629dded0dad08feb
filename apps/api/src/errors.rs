use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::feedback::submission::SubmissionError;
use crate::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<AnalysisError> for AppError {
    fn from(e: AnalysisError) -> Self {
        match e {
            AnalysisError::RateLimited => {
                AppError::RateLimited("Rate limit exceeded. Please try again later.".to_string())
            }
            AnalysisError::Upstream(msg) => AppError::Llm(msg),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        tracing::error!("Store error: {e}");
        AppError::Database("A database error occurred".to_string())
    }
}

impl From<SubmissionError> for AppError {
    fn from(e: SubmissionError) -> Self {
        let message = e.localized_message();
        match e {
            SubmissionError::EmptyFeedback { .. } => AppError::Validation(message),
            SubmissionError::RateLimited { .. } => AppError::RateLimited(message),
            SubmissionError::Analysis { source, .. } => {
                tracing::error!("Submission analysis failed: {source}");
                AppError::Llm(message)
            }
            SubmissionError::Persistence { source, .. } => {
                tracing::error!("Submission insert failed: {source}");
                AppError::Database(message)
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::RateLimited(msg) => {
                tracing::warn!("Rate limited: {msg}");
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED", msg.clone())
            }
            // Logged with its source where the store error is converted
            AppError::Database(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                msg.clone(),
            ),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, "LLM_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
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
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::models::Language;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn error_lines(&self) -> usize {
            let bytes = self.0.lock().unwrap();
            String::from_utf8_lossy(&bytes)
                .lines()
                .filter(|line| line.contains("ERROR"))
                .count()
        }
    }

    fn render_with_logs(make_error: impl FnOnce() -> AppError) -> (StatusCode, usize) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let status = tracing::subscriber::with_default(subscriber, || {
            make_error().into_response().status()
        });
        (status, logs.error_lines())
    }

    #[test]
    fn test_store_failure_is_logged_once() {
        let (status, errors) = render_with_logs(|| {
            AppError::from(StoreError::Unavailable("connection refused".to_string()))
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(errors, 1);
    }

    #[test]
    fn test_failed_insert_is_logged_once() {
        let (status, errors) = render_with_logs(|| {
            AppError::from(SubmissionError::Persistence {
                language: Language::En,
                source: StoreError::Unavailable("connection refused".to_string()),
            })
        });
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(errors, 1);
    }

    #[test]
    fn test_validation_is_bad_request() {
        let (status, errors) =
            render_with_logs(|| AppError::Validation("Text is required".to_string()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(errors, 0);
    }
}
