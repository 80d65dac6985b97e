//! Runtime configuration for pdf-toolkit.
//!
//! Engines take every input as an explicit parameter, so the only settings
//! resolved here are where per-user files live and how the process was
//! started:
//! - `PDF_TOOLKIT_HOME` replaces both the config and the data directory
//! - `PDF_TOOLKIT_LOG` holds a tracing filter for terminal diagnostics

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::password::EncryptionPolicy;

/// Overrides the per-user base directory.
pub const HOME_ENV: &str = "PDF_TOOLKIT_HOME";

/// Tracing filter for the terminal log layer.
pub const LOG_ENV: &str = "PDF_TOOLKIT_LOG";

const APP_DIR: &str = "pdf-toolkit";

/// Directory holding `preferences.json`.
///
/// # Errors
///
/// Returns an error when neither `PDF_TOOLKIT_HOME` nor a platform config
/// directory is available.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(home) = home_override() {
        return Ok(home);
    }
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .context("no configuration directory available; set PDF_TOOLKIT_HOME")
}

/// Directory holding the activity log.
///
/// # Errors
///
/// Returns an error when neither `PDF_TOOLKIT_HOME` nor a platform data
/// directory is available.
pub fn log_dir() -> Result<PathBuf> {
    if let Some(home) = home_override() {
        return Ok(home.join("logs"));
    }
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR).join("logs"))
        .context("no data directory available; set PDF_TOOLKIT_HOME")
}

fn home_override() -> Option<PathBuf> {
    std::env::var_os(HOME_ENV)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Process-level settings taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct RunSettings {
    /// Encryption handling the run starts with.
    pub policy: EncryptionPolicy,

    /// Print the outcome as JSON instead of text.
    pub json: bool,

    /// Suppress non-error output.
    pub quiet: bool,

    /// Show debug output and raise the log level.
    pub verbose: bool,
}

impl RunSettings {
    /// Starting policy for a run, `SkipAll` when requested at startup.
    pub fn initial_policy(skip_all: bool) -> EncryptionPolicy {
        if skip_all {
            EncryptionPolicy::SkipAll
        } else {
            EncryptionPolicy::Ask
        }
    }
}
