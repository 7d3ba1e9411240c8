//! Binary entry point: parse options, start file logging, load the bundled
//! content, detect speech support and drive the Ratatui event loop until the
//! user exits.
use anyhow::Context;
use clap::Parser;
use hsk_flashcards::{load_dataset, logging, run_app, App, Config};

/// Returning a `Result` surfaces fatal startup problems (an unreadable data
/// override, malformed JSON) on the terminal before the TUI takes over.
fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let log_dir = config.log_dir()?;
    logging::init_logging(&config.log_level, &log_dir)?;

    let dataset = load_dataset(config.data_dir.as_deref()).context("failed to load content")?;
    let filters = config.initial_filters()?;
    let player = config.playback_dispatcher();

    let mut app = App::new(dataset, filters, player);
    run_app(&mut app)
}
