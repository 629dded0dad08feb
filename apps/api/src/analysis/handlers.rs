use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::AnalysisResult;
use crate::errors::AppError;
use crate::extractors::AppJson;
use crate::models::Language;
use crate::state::AppState;

/// Placeholder text returned by the voice endpoint. Recognition runs on the
/// client's speech engine, not here.
pub const VOICE_STUB_TEXT: &str = "Voice recognition is handled by the browser's Web Speech API";

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceToTextRequest {
    #[serde(default)]
    pub audio_data: Option<String>,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Serialize)]
pub struct VoiceToTextResponse {
    pub text: String,
    pub success: bool,
}

/// POST /api/v1/analyze
///
/// Runs sentiment analysis without persisting anything.
pub async fn handle_analyze(
    State(state): State<AppState>,
    AppJson(request): AppJson<AnalyzeRequest>,
) -> Result<Json<AnalysisResult>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("Text is required".to_string()));
    }

    let result = state
        .analyzer
        .analyze(&request.text, request.language)
        .await?;

    Ok(Json(result))
}

/// POST /api/v1/voice-to-text
pub async fn handle_voice_to_text(
    AppJson(request): AppJson<VoiceToTextRequest>,
) -> Result<Json<VoiceToTextResponse>, AppError> {
    if request.audio_data.as_deref().map_or(true, str::is_empty) {
        return Err(AppError::Validation("Audio data is required".to_string()));
    }

    info!("Processing voice to text: language={}", request.language);

    Ok(Json(VoiceToTextResponse {
        text: VOICE_STUB_TEXT.to_string(),
        success: true,
    }))
}
