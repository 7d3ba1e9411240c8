//! Text-to-speech playback. The engine is a process-wide singleton owned by
//! the dispatcher: starting a new utterance always preempts the previous one,
//! so at most one utterance is audible at any time.

mod espeak;

use std::fmt;

use log::{debug, warn};

use crate::error::SpeechError;

pub use espeak::{EspeakEngine, DEFAULT_PROGRAM};

/// Locale every utterance is spoken in.
pub const TARGET_LOCALE: &str = "zh-CN";
/// Playback speed relative to the engine's normal rate.
pub const SPEECH_RATE: f32 = 0.8;

/// One utterance handed to an engine.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub locale: &'static str,
    pub rate: f32,
}

impl SpeechRequest {
    /// Request for `text` with the fixed target locale and rate.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            locale: TARGET_LOCALE,
            rate: SPEECH_RATE,
        }
    }
}

/// The two operations the app needs from a speech backend.
pub trait SpeechEngine {
    /// Start speaking `request` without waiting for it to finish.
    fn speak(&mut self, request: &SpeechRequest) -> Result<(), SpeechError>;

    /// Stop whatever is queued or currently playing.
    fn cancel_all(&mut self);
}

/// Maps a text string to exactly one live speech request.
pub struct PlaybackDispatcher {
    engine: Option<Box<dyn SpeechEngine>>,
}

impl PlaybackDispatcher {
    pub fn new(engine: Box<dyn SpeechEngine>) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    /// Dispatcher for an environment without any speech capability. Every
    /// `play` call is a silent no-op.
    pub fn unavailable() -> Self {
        Self { engine: None }
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_some()
    }

    /// Cancel any in-flight utterance and start speaking `text`.
    ///
    /// Fire-and-forget: completion and engine failures are never reported to
    /// the caller.
    pub fn play(&mut self, text: &str) {
        let Some(engine) = self.engine.as_mut() else {
            return;
        };

        engine.cancel_all();
        let request = SpeechRequest::new(text);
        match engine.speak(&request) {
            Ok(()) => debug!("event=speak status=ok chars={}", text.chars().count()),
            Err(err) => warn!("event=speak status=error error={err}"),
        }
    }
}

impl fmt::Debug for PlaybackDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackDispatcher")
            .field("available", &self.is_available())
            .finish()
    }
}
