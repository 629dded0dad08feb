use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::extract::first_json_object;
use crate::analysis::prompts::{ANALYSIS_PROMPT, ANALYSIS_SYSTEM};
use crate::i18n::messages;
use crate::llm_client::prompts::JSON_OBJECT_INSTRUCTION;
use crate::llm_client::{CompletionProvider, LlmError};
use crate::models::{Language, Sentiment};

const NEUTRAL_SCORE: f64 = 0.5;

/// Derived fields of a feedback record, in the analysis endpoint's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub sentiment: Sentiment,
    pub sentiment_score: f64,
    pub positive_keywords: Vec<String>,
    pub negative_keywords: Vec<String>,
    pub response: String,
    pub suggestions: String,
}

impl AnalysisResult {
    /// The fixed neutral result substituted when the model reply is unusable.
    pub fn fallback(language: Language) -> Self {
        let msgs = messages(language);
        Self {
            sentiment: Sentiment::Neutral,
            sentiment_score: NEUTRAL_SCORE,
            positive_keywords: Vec::new(),
            negative_keywords: Vec::new(),
            response: msgs.fallback_response.to_string(),
            suggestions: msgs.fallback_suggestions.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Analysis provider is rate limited")]
    RateLimited,

    #[error("Analysis provider failed: {0}")]
    Upstream(String),
}

impl From<LlmError> for AnalysisError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::RateLimited(_) => AnalysisError::RateLimited,
            other => AnalysisError::Upstream(other.to_string()),
        }
    }
}

/// Produces the derived fields for a piece of feedback.
///
/// Carried in `AppState` as `Arc<dyn SentimentAnalyzer>`.
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str, language: Language)
        -> Result<AnalysisResult, AnalysisError>;
}

/// Loosely-typed model output. Every field is optional so a partially
/// conforming reply still yields a usable result.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    sentiment: Option<String>,
    sentiment_score: Option<f64>,
    #[serde(default)]
    positive_keywords: Option<Vec<String>>,
    #[serde(default)]
    negative_keywords: Option<Vec<String>>,
    response: Option<String>,
    suggestions: Option<String>,
}

impl RawAnalysis {
    fn normalize(self, language: Language) -> AnalysisResult {
        let fallback = AnalysisResult::fallback(language);
        let sentiment = self
            .sentiment
            .as_deref()
            .and_then(Sentiment::from_label)
            .unwrap_or(Sentiment::Neutral);
        let sentiment_score = self
            .sentiment_score
            .filter(|s| s.is_finite())
            .map(|s| s.clamp(0.0, 1.0))
            .unwrap_or(NEUTRAL_SCORE);

        AnalysisResult {
            sentiment,
            sentiment_score,
            positive_keywords: self.positive_keywords.unwrap_or_default(),
            negative_keywords: self.negative_keywords.unwrap_or_default(),
            response: non_blank(self.response).unwrap_or(fallback.response),
            suggestions: non_blank(self.suggestions).unwrap_or(fallback.suggestions),
        }
    }
}

fn non_blank(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

/// Adapts a completion reply into an `AnalysisResult`, substituting the
/// fallback when no JSON object can be extracted or parsed.
pub fn parse_analysis(reply: &str, language: Language) -> AnalysisResult {
    let Some(object) = first_json_object(reply) else {
        warn!("No JSON object in analysis reply, using fallback");
        return AnalysisResult::fallback(language);
    };
    match serde_json::from_str::<RawAnalysis>(object) {
        Ok(raw) => raw.normalize(language),
        Err(e) => {
            warn!("Failed to parse analysis reply: {e}, using fallback");
            AnalysisResult::fallback(language)
        }
    }
}

pub fn build_prompt(text: &str, language: Language) -> String {
    // language first so a literal "{language}" in user text survives
    ANALYSIS_PROMPT
        .replace("{language}", language.as_str())
        .replace("{text}", text)
}

/// Production analyzer backed by a chat-completion provider.
#[derive(Clone)]
pub struct LlmSentimentAnalyzer {
    provider: Arc<dyn CompletionProvider>,
    system: String,
}

impl LlmSentimentAnalyzer {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            system: format!("{ANALYSIS_SYSTEM}\n\n{JSON_OBJECT_INSTRUCTION}"),
        }
    }
}

#[async_trait]
impl SentimentAnalyzer for LlmSentimentAnalyzer {
    async fn analyze(
        &self,
        text: &str,
        language: Language,
    ) -> Result<AnalysisResult, AnalysisError> {
        info!(
            "Analyzing feedback: language={language}, text_length={}",
            text.chars().count()
        );
        let prompt = build_prompt(text, language);
        let reply = self.provider.complete(&self.system, &prompt).await?;
        debug!("Analysis reply received ({} bytes)", reply.len());
        Ok(parse_analysis(&reply, language))
    }
}
