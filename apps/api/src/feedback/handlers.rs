use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::extractors::AppJson;
use crate::feedback::submission::{submit, SubmissionOutcome};
use crate::models::Language;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitFeedbackRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub language: Language,
}

/// POST /api/v1/feedback
///
/// Analyze-then-insert. Errors carry a message localized to the request language.
pub async fn handle_submit_feedback(
    State(state): State<AppState>,
    AppJson(request): AppJson<SubmitFeedbackRequest>,
) -> Result<(StatusCode, Json<SubmissionOutcome>), AppError> {
    let outcome = submit(
        state.analyzer.as_ref(),
        state.store.as_ref(),
        &request.text,
        request.language,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}
