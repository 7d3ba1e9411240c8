use std::process::{Child, Command, Stdio};

use log::info;

use super::{SpeechEngine, SpeechRequest};
use crate::error::SpeechError;

/// Binary invoked when no other program is configured.
pub const DEFAULT_PROGRAM: &str = "espeak-ng";
/// espeak-ng's default speed in words per minute; `rate` scales this value.
const BASE_WORDS_PER_MINUTE: f32 = 175.0;

/// Speech engine backed by an external `espeak-ng` process. Each utterance is
/// one child process; cancelling kills and reaps it.
pub struct EspeakEngine {
    program: String,
    child: Option<Child>,
}

impl EspeakEngine {
    /// Probe `program --version` and return an engine only if it runs.
    pub fn detect(program: &str) -> Option<Self> {
        let version_check = Command::new(program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match version_check {
            Ok(status) if status.success() => {
                info!("event=speech_detect status=ok program={program}");
                Some(Self {
                    program: program.to_string(),
                    child: None,
                })
            }
            Ok(status) => {
                info!("event=speech_detect status=unavailable program={program} exit={status}");
                None
            }
            Err(err) => {
                info!("event=speech_detect status=unavailable program={program} error={err}");
                None
            }
        }
    }
}

impl SpeechEngine for EspeakEngine {
    fn speak(&mut self, request: &SpeechRequest) -> Result<(), SpeechError> {
        let voice = voice_for_locale(request.locale)
            .ok_or_else(|| SpeechError::UnsupportedLocale(request.locale.to_string()))?;

        let child = Command::new(&self.program)
            .arg("-v")
            .arg(voice)
            .arg("-s")
            .arg(words_per_minute(request.rate).to_string())
            .arg("--")
            .arg(&request.text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| SpeechError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        self.child = Some(child);
        Ok(())
    }

    fn cancel_all(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Ok(Some(_)) = child.try_wait() {
                return;
            }
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for EspeakEngine {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

/// espeak-ng voice name for a BCP 47 locale tag.
fn voice_for_locale(locale: &str) -> Option<&'static str> {
    match locale {
        "zh-CN" | "zh" | "cmn" => Some("cmn"),
        "yue" | "zh-HK" => Some("yue"),
        _ => None,
    }
}

fn words_per_minute(rate: f32) -> u32 {
    (BASE_WORDS_PER_MINUTE * rate).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::{SPEECH_RATE, TARGET_LOCALE};

    #[test]
    fn target_locale_maps_to_mandarin_voice() {
        assert_eq!(voice_for_locale(TARGET_LOCALE), Some("cmn"));
        assert_eq!(voice_for_locale("fr-FR"), None);
    }

    #[test]
    fn rate_scales_default_speed() {
        assert_eq!(words_per_minute(SPEECH_RATE), 140);
        assert_eq!(words_per_minute(1.0), 175);
    }

    #[test]
    fn missing_program_is_not_detected() {
        assert!(EspeakEngine::detect("hsk-flashcards-no-such-speech-binary").is_none());
    }
}
