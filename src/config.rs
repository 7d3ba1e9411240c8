use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use directories::BaseDirs;

use crate::content::{Filters, VocabularyPolicy};
use crate::models::HskLevel;
use crate::speech::{EspeakEngine, PlaybackDispatcher, DEFAULT_PROGRAM};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".hsk-flashcards";
/// Subfolder holding the rotating log files.
const LOG_DIR_NAME: &str = "logs";

/// Startup options. Nothing here is persisted; every run starts from these
/// values and the bundled content.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "hsk-flashcards",
    about = "Chinese Learn: vocabulary, conversation and grammar flashcards with spoken playback",
    version
)]
pub struct Config {
    /// Directory with vocabulary.json / conversation.json / patterns.json
    /// overriding the bundled copies.
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// What the vocabulary tab shows while no HSK level is selected.
    #[arg(long, value_enum, default_value_t = VocabularyPolicy::All)]
    pub vocabulary_policy: VocabularyPolicy,

    /// HSK level the patterns tab is pinned to.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=6))]
    pub pattern_level: u8,

    /// Disable spoken playback even if a speech engine is installed.
    #[arg(long)]
    pub no_speech: bool,

    /// Speech program to drive.
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_PROGRAM)]
    pub speech_program: String,

    /// error | warn | info | debug | trace
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Where log files are written. Defaults to ~/.hsk-flashcards/logs.
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Initial selector filters: conversation tab, no level filter.
    pub fn initial_filters(&self) -> Result<Filters> {
        Ok(Filters {
            policy: self.vocabulary_policy,
            pattern_level: HskLevel::new(self.pattern_level)?,
            ..Filters::default()
        })
    }

    /// Resolve the log directory, falling back to the user's home.
    pub fn log_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.log_dir {
            return Ok(dir.clone());
        }
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(base_dirs
            .home_dir()
            .join(DATA_DIR_NAME)
            .join(LOG_DIR_NAME))
    }

    /// Build the playback dispatcher, probing for the speech program unless
    /// speech is disabled.
    pub fn playback_dispatcher(&self) -> PlaybackDispatcher {
        if self.no_speech {
            return PlaybackDispatcher::unavailable();
        }
        match EspeakEngine::detect(&self.speech_program) {
            Some(engine) => PlaybackDispatcher::new(Box::new(engine)),
            None => PlaybackDispatcher::unavailable(),
        }
    }
}
