//! Logging init: stderr by default, or an append-only log file.

use std::{fs, path::Path, sync::Mutex};

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSection;

/// Filter used when neither `RUST_LOG` nor the config sets one. Kept at
/// `warn` so the interactive menu is not interleaved with request chatter.
pub const DEFAULT_FILTER: &str = "warn";

fn env_filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(configured.unwrap_or(DEFAULT_FILTER)))
}

/// Initializes the global subscriber from the `[logging]` section.
///
/// Fails if the log file cannot be opened; the caller can then fall back
/// to [`init_logging_stderr`].
pub fn init_logging(section: &LoggingSection) -> std::io::Result<()> {
    let filter = env_filter(section.filter.as_deref());

    match &section.file {
        Some(path) => {
            let file = open_log_file(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
            tracing::info!("photoapp logging initialized at {}", path.display());
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .init();
        }
    }
    Ok(())
}

/// Logging to stderr only, with the default filter.
pub fn init_logging_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(None))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn open_log_file(path: &Path) -> std::io::Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::OpenOptions::new().create(true).append(true).open(path)
}
