//! File logging bootstrap. The terminal belongs to the TUI, so every log line
//! goes to a rotating file instead of stderr.
//!
//! Initialization is idempotent for the same directory and level; a second
//! call that asks for something different is rejected instead of silently
//! reconfiguring the running logger.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;

const LOG_FILE_BASENAME: &str = "hsk-flashcards";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
const SUPPORTED_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: String,
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

/// Start the file logger at `level` inside `log_dir`.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<()> {
    let level = normalize_level(level)?;

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState> {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

        let logger = Logger::try_with_str(&level)
            .with_context(|| format!("invalid log level {level}"))?
            .log_to_file(
                FileSpec::default()
                    .directory(log_dir)
                    .basename(LOG_FILE_BASENAME),
            )
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .context("failed to start logger")?;

        info!(
            "event=app_start status=ok platform={} version={} level={} log_dir={}",
            std::env::consts::OS,
            env!("CARGO_PKG_VERSION"),
            level,
            log_dir.display()
        );

        Ok(LoggingState {
            level: level.clone(),
            log_dir: log_dir.to_path_buf(),
            _logger: logger,
        })
    })?;

    if state.log_dir != log_dir {
        return Err(anyhow!(
            "logging already initialized at {}; refusing to switch to {}",
            state.log_dir.display(),
            log_dir.display()
        ));
    }
    if state.level != level {
        return Err(anyhow!(
            "logging already initialized with level {}; refusing to switch to {}",
            state.level,
            level
        ));
    }

    Ok(())
}

fn normalize_level(level: &str) -> Result<String> {
    let normalized = level.trim().to_ascii_lowercase();
    if SUPPORTED_LEVELS.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(anyhow!(
            "unsupported log level {level:?}; expected one of {}",
            SUPPORTED_LEVELS.join(", ")
        ))
    }
}
