//! Tracing setup for the command-line binary.
//!
//! Two layers are installed:
//! - a compact human-readable layer on stderr, filtered by `PDF_TOOLKIT_LOG`
//! - a JSON activity log appended to `<log dir>/activity.log` at `info` and above
//!
//! If the activity log cannot be opened the terminal layer still works.

use anyhow::{Context, Result};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use crate::config;

const LOG_FILE: &str = "activity.log";

/// Install the global subscriber.
///
/// Returns the activity log path when the file layer is active.
pub fn init(verbose: bool) -> Option<PathBuf> {
    let default_filter = if verbose {
        "pdf_toolkit=debug"
    } else {
        "pdf_toolkit=warn"
    };
    let filter = EnvFilter::try_from_env(config::LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let terminal = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_filter(filter);

    let mut log_path = None;
    let mut activity_error = None;
    let activity = match open_activity_log() {
        Ok((path, file)) => {
            log_path = Some(path);
            let layer = fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(Mutex::new(file))
                .with_filter(LevelFilter::INFO);
            Some(layer)
        }
        Err(e) => {
            activity_error = Some(e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(terminal)
        .with(activity)
        .init();

    if let Some(e) = activity_error {
        tracing::warn!(error = %format!("{e:#}"), "activity log disabled");
    }

    log_path
}

fn open_activity_log() -> Result<(PathBuf, File)> {
    let dir = config::log_dir()?;
    let path = dir.join(LOG_FILE);
    let file = open_append(&dir, &path)?;
    Ok((path, file))
}

fn open_append(dir: &Path, path: &Path) -> Result<File> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open {}", path.display()))
}
