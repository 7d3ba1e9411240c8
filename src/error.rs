use std::path::PathBuf;

use thiserror::Error;

/// Failures that can occur while loading the study content at startup.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {name}: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("HSK level must be between 1 and 6, got {0}")]
    InvalidLevel(u8),
}

/// Failures reported by a speech engine. The playback dispatcher logs these and
/// never hands them to its caller.
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no voice available for locale {0}")]
    UnsupportedLocale(String),
}
