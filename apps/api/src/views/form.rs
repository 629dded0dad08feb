use crate::analysis::SentimentAnalyzer;
use crate::feedback::submission::{submit, SubmissionError, SubmissionOutcome};
use crate::models::Language;
use crate::store::FeedbackStore;

/// State of the feedback form: the text field, the language selector, and the
/// in-flight flag that disables the submit control.
#[derive(Debug, Default)]
pub struct FeedbackForm {
    language: Language,
    text: String,
    submitting: bool,
}

impl FeedbackForm {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Replaces the text with a transcript handed over by voice capture.
    pub fn accept_transcript(&mut self, transcript: String) {
        self.text = transcript;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.text.trim().is_empty()
    }

    /// Marks the form as in flight and returns what to submit.
    /// Returns `None` while a submission is already running.
    pub fn begin_submit(&mut self) -> Option<(String, Language)> {
        if self.submitting {
            return None;
        }
        self.submitting = true;
        Some((self.text.clone(), self.language))
    }

    /// Clears the in-flight flag, and the text when the outcome asks for it.
    pub fn finish_submit(&mut self, result: &Result<SubmissionOutcome, SubmissionError>) {
        self.submitting = false;
        if matches!(result, Ok(outcome) if outcome.clear_input) {
            self.text.clear();
        }
    }

    /// Runs a whole submission. `None` means the control was disabled.
    pub async fn submit(
        &mut self,
        analyzer: &dyn SentimentAnalyzer,
        store: &dyn FeedbackStore,
    ) -> Option<Result<SubmissionOutcome, SubmissionError>> {
        let (text, language) = self.begin_submit()?;
        let result = submit(analyzer, store, &text, language).await;
        self.finish_submit(&result);
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::ChangeFeed;
    use crate::feedback::submission::test_support::{scenario_analysis, FailingStore, StubAnalyzer};
    use crate::store::MemoryFeedbackStore;

    #[tokio::test]
    async fn test_success_clears_text_and_flag() {
        let analyzer = StubAnalyzer::returning(scenario_analysis());
        let store = MemoryFeedbackStore::new(ChangeFeed::new(8));
        let mut form = FeedbackForm::new(Language::En);
        form.set_text("Great service, very fast!");
        assert!(form.can_submit());

        let result = form.submit(&analyzer, &store).await.unwrap();
        assert!(result.is_ok());
        assert_eq!(form.text(), "");
        assert!(!form.is_submitting());
    }

    #[tokio::test]
    async fn test_failure_keeps_text() {
        let analyzer = StubAnalyzer::returning(scenario_analysis());
        let mut form = FeedbackForm::new(Language::Ta);
        form.set_text("சேவை மெதுவாக உள்ளது");

        let result = form.submit(&analyzer, &FailingStore).await.unwrap();
        assert!(result.is_err());
        assert_eq!(form.text(), "சேவை மெதுவாக உள்ளது");
        assert!(!form.is_submitting());
    }

    #[test]
    fn test_in_flight_form_refuses_second_submit() {
        let mut form = FeedbackForm::new(Language::En);
        form.set_text("hello");
        assert_eq!(form.begin_submit(), Some(("hello".to_string(), Language::En)));
        assert!(!form.can_submit());
        assert_eq!(form.begin_submit(), None);
    }

    #[test]
    fn test_blank_text_disables_control() {
        let mut form = FeedbackForm::new(Language::En);
        form.set_text("   ");
        assert!(!form.can_submit());
    }

    #[test]
    fn test_transcript_replaces_text() {
        let mut form = FeedbackForm::new(Language::En);
        form.set_text("typed");
        form.accept_transcript("spoken words".to_string());
        assert_eq!(form.text(), "spoken words");
    }
}
