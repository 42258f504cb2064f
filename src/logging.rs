//! Logging setup
//!
//! Two layers on one registry:
//! - console (stderr): `RUST_LOG` if set, otherwise `warn`, or `debug` with `-v`
//! - run log: timestamped `info` lines appended to the configured log file
//!
//! A log file that cannot be opened is reported and skipped.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::warn;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbose: bool, log_file: Option<&Path>) {
    let default_level = if verbose { "debug" } else { "warn" };
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let mut open_error = None;
    let file_layer = log_file.and_then(|path| match open_log(path) {
        Ok(file) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .with_filter(LevelFilter::INFO),
        ),
        Err(e) => {
            open_error = Some((path.display().to_string(), e));
            None
        }
    });

    if tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        return;
    }

    if let Some((path, e)) = open_error {
        warn!("Cannot open run log {}: {}; logging to console only", path, e);
    }
}

/// Open `path` for appending, creating parent directories
fn open_log(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}
