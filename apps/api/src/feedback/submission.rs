//! The two-step submission pipeline: analysis, then a single insert.
//!
//! Strictly sequential. A failure at either step aborts the submission and
//! nothing is retried; an analysis result whose insert fails is discarded.

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::analysis::{AnalysisError, AnalysisResult, SentimentAnalyzer};
use crate::i18n::messages;
use crate::models::{FeedbackRecord, Language, NewFeedback, Notification};
use crate::store::{FeedbackStore, StoreError};

/// How long the AI response toast stays on screen.
pub const AI_RESPONSE_TOAST_MS: u64 = 8000;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("feedback text is empty")]
    EmptyFeedback { language: Language },

    #[error("analysis provider is rate limited")]
    RateLimited { language: Language },

    #[error("analysis failed: {source}")]
    Analysis {
        language: Language,
        source: AnalysisError,
    },

    #[error("insert failed: {source}")]
    Persistence {
        language: Language,
        source: StoreError,
    },
}

impl SubmissionError {
    pub fn language(&self) -> Language {
        match self {
            SubmissionError::EmptyFeedback { language }
            | SubmissionError::RateLimited { language }
            | SubmissionError::Analysis { language, .. }
            | SubmissionError::Persistence { language, .. } => *language,
        }
    }

    pub fn localized_message(&self) -> String {
        let msgs = messages(self.language());
        match self {
            SubmissionError::EmptyFeedback { .. } => msgs.empty_feedback,
            SubmissionError::RateLimited { .. } => msgs.rate_limited,
            SubmissionError::Analysis { .. } => msgs.analysis_failed,
            SubmissionError::Persistence { .. } => msgs.submit_failed,
        }
        .to_string()
    }

    pub fn notification(&self) -> Notification {
        Notification::error(
            messages(self.language()).error_title,
            self.localized_message(),
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub record: FeedbackRecord,
    /// Generic success first, then the AI-authored response.
    pub notifications: Vec<Notification>,
    pub clear_input: bool,
}

impl NewFeedback {
    pub fn from_analysis(text: &str, language: Language, analysis: AnalysisResult) -> Self {
        Self {
            original_text: text.to_string(),
            language,
            sentiment: analysis.sentiment,
            sentiment_score: analysis.sentiment_score,
            positive_keywords: analysis.positive_keywords,
            negative_keywords: analysis.negative_keywords,
            ai_response: analysis.response,
            ai_suggestions: analysis.suggestions,
        }
    }
}

/// Validates, analyzes and persists one piece of feedback.
pub async fn submit(
    analyzer: &dyn SentimentAnalyzer,
    store: &dyn FeedbackStore,
    text: &str,
    language: Language,
) -> Result<SubmissionOutcome, SubmissionError> {
    if text.trim().is_empty() {
        return Err(SubmissionError::EmptyFeedback { language });
    }

    let analysis = analyzer
        .analyze(text, language)
        .await
        .map_err(|source| match source {
            AnalysisError::RateLimited => SubmissionError::RateLimited { language },
            source => SubmissionError::Analysis { language, source },
        })?;

    let record = store
        .insert(NewFeedback::from_analysis(text, language, analysis))
        .await
        .map_err(|source| SubmissionError::Persistence { language, source })?;

    info!(
        "Feedback {} stored: sentiment={}, score={:.2}",
        record.id, record.sentiment, record.sentiment_score
    );

    let msgs = messages(language);
    let notifications = vec![
        Notification::info(msgs.success_title, msgs.success_description),
        Notification::info(msgs.ai_response_title, record.ai_response.clone())
            .with_duration_ms(AI_RESPONSE_TOAST_MS),
    ];

    Ok(SubmissionOutcome {
        record,
        notifications,
        clear_input: true,
    })
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::feed::ChangeFeed;
    use crate::models::{NotificationVariant, Sentiment};
    use crate::store::MemoryFeedbackStore;

    fn memory_store() -> MemoryFeedbackStore {
        MemoryFeedbackStore::new(ChangeFeed::new(16))
    }

    #[tokio::test]
    async fn test_blank_input_never_reaches_analyzer() {
        let analyzer = StubAnalyzer::returning(scenario_analysis());
        let store = memory_store();

        for text in ["", "   ", "\n\t "] {
            let err = submit(&analyzer, &store, text, Language::Ta).await.unwrap_err();
            assert!(matches!(err, SubmissionError::EmptyFeedback { .. }));
            assert_eq!(err.localized_message(), "கருத்தை உள்ளிடவும்");
            assert_eq!(err.notification().variant, NotificationVariant::Destructive);
        }

        assert_eq!(analyzer.call_count(), 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_successful_submission_persists_exactly_one_record() {
        let analyzer = StubAnalyzer::returning(scenario_analysis());
        let store = memory_store();

        let outcome = submit(&analyzer, &store, "Great service, very fast!", Language::En)
            .await
            .unwrap();

        let rows = store.list_recent(None).await.unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row, &outcome.record);
        assert_eq!(row.original_text, "Great service, very fast!");
        assert_eq!(row.language, Language::En);
        assert_eq!(row.sentiment, Sentiment::Positive);
        assert!((row.sentiment_score - 0.9).abs() < f64::EPSILON);
        assert_eq!(row.positive_keywords, vec!["fast", "great"]);
        assert!(row.negative_keywords.is_empty());
        assert_eq!(row.ai_response, "Thanks!");
        assert_eq!(row.ai_suggestions, "Keep it up");

        assert!(outcome.clear_input);
        assert_eq!(outcome.notifications.len(), 2);
        assert_eq!(outcome.notifications[0].title, "Success!");
        assert_eq!(outcome.notifications[1].description, "Thanks!");
        assert_eq!(outcome.notifications[1].duration_ms, Some(AI_RESPONSE_TOAST_MS));
    }

    #[tokio::test]
    async fn test_insert_failure_after_analysis_leaves_nothing() {
        let analyzer = StubAnalyzer::returning(scenario_analysis());

        let err = submit(&analyzer, &FailingStore, "Great service", Language::En)
            .await
            .unwrap_err();

        assert_eq!(analyzer.call_count(), 1);
        assert!(matches!(err, SubmissionError::Persistence { .. }));
        assert_eq!(err.localized_message(), "Failed to submit feedback");
    }

    #[tokio::test]
    async fn test_rate_limit_surfaces_distinctly_and_stores_nothing() {
        let analyzer = StubAnalyzer::rate_limited();
        let store = memory_store();

        let err = submit(&analyzer, &store, "Slow checkout", Language::En)
            .await
            .unwrap_err();

        assert!(matches!(err, SubmissionError::RateLimited { .. }));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_upstream_failure_aborts_submission() {
        let analyzer = StubAnalyzer::failing("gateway timeout");
        let store = memory_store();

        let err = submit(&analyzer, &store, "Slow checkout", Language::Ta)
            .await
            .unwrap_err();

        assert!(matches!(err, SubmissionError::Analysis { .. }));
        assert_eq!(err.language(), Language::Ta);
        assert!(store.is_empty().await);
    }
}
