//! Core library surface for the HSK flashcards TUI.
//!
//! The `bin` target only parses configuration and wires these pieces together,
//! so everything worth testing lives here.
pub mod config;
pub mod content;
pub mod error;
pub mod logging;
pub mod models;
pub mod speech;
pub mod ui;

/// Content loading and the pure selector.
pub use content::{load_bundled, load_dataset, select, Filters, Item, ItemKey, VocabularyPolicy};

pub use config::Config;
pub use error::{ContentError, SpeechError};
pub use models::{Category, Dataset, HskLevel};
pub use speech::{PlaybackDispatcher, SpeechEngine, SpeechRequest};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
