//! Voice capture state machine.
//!
//! Drives a platform speech-recognition engine in continuous, interim-results
//! mode and hands the final transcript to the feedback form. The engine sits
//! behind [`SpeechEngine`]; its callbacks are fed back in through
//! [`VoiceCapture::on_result`], [`VoiceCapture::on_end`] and
//! [`VoiceCapture::on_error`].
//!
//! ```text
//!   Idle --toggle--> Recording --toggle--> Idle (transcript handed off)
//!                    Recording --error---> Idle
//!                    Recording --end-----> Recording (engine restarted)
//! ```

use thiserror::Error;
use tracing::{debug, warn};

use crate::i18n::messages;
use crate::models::{Language, Notification};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("{0}")]
    Engine(String),
}

/// Settings handed to the engine on every start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionSettings {
    pub continuous: bool,
    pub interim_results: bool,
    pub locale: &'static str,
}

impl RecognitionSettings {
    pub fn for_language(language: Language) -> Self {
        Self {
            continuous: true,
            interim_results: true,
            locale: language.speech_locale(),
        }
    }
}

pub trait SpeechEngine: Send {
    fn start(&mut self, settings: &RecognitionSettings) -> Result<(), SpeechError>;
    fn stop(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionSegment {
    pub transcript: String,
    pub is_final: bool,
}

/// One recognition callback: the full result list plus the index of the first
/// result that changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionEvent {
    pub result_index: usize,
    pub results: Vec<RecognitionSegment>,
}

impl RecognitionEvent {
    /// Finalized text if any segment is final, otherwise the interim text.
    pub fn display_text(&self) -> String {
        let mut finalized = String::new();
        let mut interim = String::new();
        for segment in self.results.iter().skip(self.result_index) {
            if segment.is_final {
                finalized.push_str(&segment.transcript);
                finalized.push(' ');
            } else {
                interim.push_str(&segment.transcript);
            }
        }
        if finalized.is_empty() {
            interim
        } else {
            finalized
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Recording,
}

type TranscriptCallback = Box<dyn FnMut(String) + Send>;

pub struct VoiceCapture<E: SpeechEngine> {
    engine: Option<E>,
    language: Language,
    state: CaptureState,
    transcript: String,
    on_transcript: TranscriptCallback,
    notifications: Vec<Notification>,
}

impl<E: SpeechEngine> VoiceCapture<E> {
    /// `engine` is `None` when the platform has no speech recognition; a
    /// single "not supported" notification is queued and toggles do nothing.
    pub fn new(
        engine: Option<E>,
        language: Language,
        on_transcript: impl FnMut(String) + Send + 'static,
    ) -> Self {
        let mut notifications = Vec::new();
        if engine.is_none() {
            let msgs = messages(language);
            notifications.push(Notification::error(
                msgs.unsupported_title,
                msgs.unsupported_description,
            ));
        }
        Self {
            engine,
            language,
            state: CaptureState::Idle,
            transcript: String::new(),
            on_transcript: Box::new(on_transcript),
            notifications,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == CaptureState::Recording
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn is_supported(&self) -> bool {
        self.engine.is_some()
    }

    /// Drains queued notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn toggle(&mut self) {
        match self.state {
            CaptureState::Recording => self.stop_recording(),
            CaptureState::Idle => self.start_recording(),
        }
    }

    fn start_recording(&mut self) {
        let settings = RecognitionSettings::for_language(self.language);
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        self.transcript.clear();
        if let Err(e) = engine.start(&settings) {
            self.fail(&e);
            return;
        }
        debug!("Voice capture started ({})", settings.locale);
        self.state = CaptureState::Recording;
        let msgs = messages(self.language);
        self.notifications.push(Notification::info(
            msgs.recording_started_title,
            msgs.recording_started_description,
        ));
    }

    fn stop_recording(&mut self) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };
        engine.stop();
        self.state = CaptureState::Idle;
        let transcript = std::mem::take(&mut self.transcript);
        let transcript = transcript.trim();
        if !transcript.is_empty() {
            (self.on_transcript)(transcript.to_string());
        }
        debug!("Voice capture stopped");
    }

    pub fn on_result(&mut self, event: &RecognitionEvent) {
        if self.state != CaptureState::Recording {
            return;
        }
        self.transcript = event.display_text();
    }

    /// The engine stopped on its own (e.g. silence timeout).
    pub fn on_end(&mut self) {
        if self.state != CaptureState::Recording {
            return;
        }
        let settings = RecognitionSettings::for_language(self.language);
        if let Some(engine) = self.engine.as_mut() {
            debug!("Speech engine ended while recording, restarting");
            if let Err(e) = engine.start(&settings) {
                self.fail(&e);
            }
        }
    }

    pub fn on_error(&mut self, error: SpeechError) {
        self.fail(&error);
    }

    /// Switches locale. A running capture is restarted with the new locale.
    pub fn set_language(&mut self, language: Language) {
        if language == self.language {
            return;
        }
        self.language = language;
        if self.state != CaptureState::Recording {
            return;
        }
        let settings = RecognitionSettings::for_language(language);
        if let Some(engine) = self.engine.as_mut() {
            engine.stop();
            if let Err(e) = engine.start(&settings) {
                self.fail(&e);
            }
        }
    }

    fn fail(&mut self, error: &SpeechError) {
        warn!("Speech recognition error: {error}");
        self.state = CaptureState::Idle;
        let msgs = messages(self.language);
        self.notifications.push(Notification::error(
            msgs.error_title,
            msgs.voice_error(&error.to_string()),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationVariant;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct EngineLog {
        starts: Vec<&'static str>,
        stops: usize,
    }

    struct FakeEngine {
        log: Arc<Mutex<EngineLog>>,
        refuse_start: bool,
    }

    impl SpeechEngine for FakeEngine {
        fn start(&mut self, settings: &RecognitionSettings) -> Result<(), SpeechError> {
            assert!(settings.continuous && settings.interim_results);
            if self.refuse_start {
                return Err(SpeechError::Engine("not-allowed".to_string()));
            }
            self.log.lock().unwrap().starts.push(settings.locale);
            Ok(())
        }

        fn stop(&mut self) {
            self.log.lock().unwrap().stops += 1;
        }
    }

    type Handoffs = Arc<Mutex<Vec<String>>>;

    fn capture(language: Language) -> (VoiceCapture<FakeEngine>, Arc<Mutex<EngineLog>>, Handoffs) {
        let log = Arc::new(Mutex::new(EngineLog::default()));
        let handoffs: Handoffs = Arc::new(Mutex::new(Vec::new()));
        let sink = handoffs.clone();
        let engine = FakeEngine {
            log: log.clone(),
            refuse_start: false,
        };
        let capture = VoiceCapture::new(Some(engine), language, move |text| {
            sink.lock().unwrap().push(text)
        });
        (capture, log, handoffs)
    }

    fn segment(text: &str, is_final: bool) -> RecognitionSegment {
        RecognitionSegment {
            transcript: text.to_string(),
            is_final,
        }
    }

    #[test]
    fn test_toggle_on_starts_engine_with_locale() {
        let (mut cap, log, _) = capture(Language::Ta);
        cap.toggle();
        assert_eq!(cap.state(), CaptureState::Recording);
        assert_eq!(log.lock().unwrap().starts, vec!["ta-IN"]);
        let notes = cap.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "பதிவு செய்யப்படுகிறது");
    }

    #[test]
    fn test_interim_then_final_text() {
        let (mut cap, _, _) = capture(Language::En);
        cap.toggle();

        cap.on_result(&RecognitionEvent {
            result_index: 0,
            results: vec![segment("great ser", false)],
        });
        assert_eq!(cap.transcript(), "great ser");

        cap.on_result(&RecognitionEvent {
            result_index: 0,
            results: vec![segment("great service", true), segment("very", false)],
        });
        assert_eq!(cap.transcript(), "great service ");
    }

    #[test]
    fn test_result_index_skips_earlier_results() {
        let event = RecognitionEvent {
            result_index: 1,
            results: vec![segment("old", true), segment("new", true)],
        };
        assert_eq!(event.display_text(), "new ");
    }

    #[test]
    fn test_toggle_off_hands_transcript_exactly_once() {
        let (mut cap, log, handoffs) = capture(Language::En);
        cap.toggle();
        cap.on_result(&RecognitionEvent {
            result_index: 0,
            results: vec![segment("Great service, very fast!", true)],
        });
        cap.toggle();

        assert_eq!(cap.state(), CaptureState::Idle);
        assert_eq!(cap.transcript(), "");
        assert_eq!(log.lock().unwrap().stops, 1);
        assert_eq!(*handoffs.lock().unwrap(), vec!["Great service, very fast!"]);

        cap.toggle();
        cap.toggle();
        assert_eq!(handoffs.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_toggle_off_without_speech_hands_nothing() {
        let (mut cap, _, handoffs) = capture(Language::En);
        cap.toggle();
        cap.toggle();
        assert!(handoffs.lock().unwrap().is_empty());
    }

    #[test]
    fn test_engine_end_while_recording_restarts() {
        let (mut cap, log, _) = capture(Language::En);
        cap.toggle();
        cap.on_end();
        assert_eq!(log.lock().unwrap().starts.len(), 2);
        assert!(cap.is_recording());

        cap.toggle();
        cap.on_end();
        assert_eq!(log.lock().unwrap().starts.len(), 2);
    }

    #[test]
    fn test_engine_error_returns_to_idle_with_notification() {
        let (mut cap, log, _) = capture(Language::En);
        cap.toggle();
        cap.take_notifications();

        cap.on_error(SpeechError::Engine("network".to_string()));
        assert_eq!(cap.state(), CaptureState::Idle);
        let notes = cap.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].variant, NotificationVariant::Destructive);
        assert_eq!(notes[0].description, "Voice recognition error: network");

        cap.on_end();
        assert_eq!(log.lock().unwrap().starts.len(), 1);
    }

    #[test]
    fn test_refused_start_stays_idle() {
        let engine = FakeEngine {
            log: Arc::new(Mutex::new(EngineLog::default())),
            refuse_start: true,
        };
        let mut cap = VoiceCapture::new(Some(engine), Language::En, |_| {});
        cap.toggle();
        assert_eq!(cap.state(), CaptureState::Idle);
        assert_eq!(cap.take_notifications().len(), 1);
    }

    #[test]
    fn test_unsupported_notifies_once_and_ignores_toggle() {
        let mut cap: VoiceCapture<FakeEngine> = VoiceCapture::new(None, Language::En, |_| {});
        assert!(!cap.is_supported());
        let notes = cap.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].title, "Not Supported");

        cap.toggle();
        assert_eq!(cap.state(), CaptureState::Idle);
        assert!(cap.take_notifications().is_empty());
    }

    #[test]
    fn test_language_switch_restarts_running_capture() {
        let (mut cap, log, _) = capture(Language::En);
        cap.toggle();
        cap.set_language(Language::Ta);
        let log = log.lock().unwrap();
        assert_eq!(log.starts, vec!["en-US", "ta-IN"]);
        assert_eq!(log.stops, 1);
    }
}
