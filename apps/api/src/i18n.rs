// Localized user-facing strings. Every message the service shows a user goes through here.

use crate::models::{Language, Sentiment};

pub struct Messages {
    pub error_title: &'static str,
    pub empty_feedback: &'static str,
    pub success_title: &'static str,
    pub success_description: &'static str,
    pub ai_response_title: &'static str,
    pub submit_failed: &'static str,
    pub rate_limited: &'static str,
    pub analysis_failed: &'static str,
    pub fallback_response: &'static str,
    pub fallback_suggestions: &'static str,
    pub recording_started_title: &'static str,
    pub recording_started_description: &'static str,
    pub voice_error_prefix: &'static str,
    pub unsupported_title: &'static str,
    pub unsupported_description: &'static str,
    pub positive: &'static str,
    pub negative: &'static str,
    pub neutral: &'static str,
}

const EN: Messages = Messages {
    error_title: "Error",
    empty_feedback: "Please enter feedback",
    success_title: "Success!",
    success_description: "Your feedback has been analyzed",
    ai_response_title: "AI Response",
    submit_failed: "Failed to submit feedback",
    rate_limited: "Rate limit exceeded. Please try again later.",
    analysis_failed: "Feedback analysis failed",
    fallback_response: "Thank you for your feedback. We will carefully consider this.",
    fallback_suggestions: "We are continuously working to improve your experience.",
    recording_started_title: "Recording Started",
    recording_started_description: "Start speaking...",
    voice_error_prefix: "Voice recognition error",
    unsupported_title: "Not Supported",
    unsupported_description: "Voice input is not supported in this browser",
    positive: "Positive",
    negative: "Negative",
    neutral: "Neutral",
};

const TA: Messages = Messages {
    error_title: "பிழை",
    empty_feedback: "கருத்தை உள்ளிடவும்",
    success_title: "வெற்றி!",
    success_description: "உங்கள் கருத்து பகுப்பாய்வு செய்யப்பட்டது",
    ai_response_title: "AI பதில்",
    submit_failed: "கருத்தைச் சமர்ப்பிக்க முடியவில்லை",
    rate_limited: "கோரிக்கை வரம்பு மீறப்பட்டது. பின்னர் மீண்டும் முயற்சிக்கவும்.",
    analysis_failed: "கருத்து பகுப்பாய்வு தோல்வியடைந்தது",
    fallback_response: "உங்கள் கருத்துக்கு நன்றி. நாங்கள் இதை கவனமாக பரிசீலிப்போம்.",
    fallback_suggestions: "உங்கள் அனுபவத்தை மேம்படுத்த தொடர்ந்து முயற்சிக்கிறோம்.",
    recording_started_title: "பதிவு செய்யப்படுகிறது",
    recording_started_description: "பேசத் தொடங்குங்கள்...",
    voice_error_prefix: "குரல் அங்கீகாரப் பிழை",
    unsupported_title: "ஆதரிக்கப்படவில்லை",
    unsupported_description: "இந்த உலாவியில் குரல் உள்ளீடு ஆதரிக்கப்படவில்லை",
    positive: "நேர்மறை",
    negative: "எதிர்மறை",
    neutral: "நடுநிலை",
};

pub fn messages(language: Language) -> &'static Messages {
    match language {
        Language::En => &EN,
        Language::Ta => &TA,
    }
}

impl Messages {
    pub fn sentiment_label(&self, sentiment: Sentiment) -> &'static str {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
            Sentiment::Neutral => self.neutral,
        }
    }

    pub fn voice_error(&self, detail: &str) -> String {
        format!("{}: {detail}", self.voice_error_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tamil_labels_differ_from_english() {
        for s in Sentiment::ALL {
            assert_ne!(
                messages(Language::En).sentiment_label(s),
                messages(Language::Ta).sentiment_label(s)
            );
        }
    }

    #[test]
    fn test_voice_error_format() {
        assert_eq!(
            messages(Language::En).voice_error("no-speech"),
            "Voice recognition error: no-speech"
        );
    }
}
