//! Persisted user preferences.
//!
//! Remembers the last location used by each operation so a front end can
//! pre-fill it next time. Recording only happens while `save_preferences`
//! is enabled. The engines never read or write this file.
//!
//! # Examples
//!
//! ```no_run
//! use pdf_toolkit::preferences::{PreferenceSlot, PreferencesStore};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let mut store = PreferencesStore::open_default()?;
//! store.record(PreferenceSlot::Split, Path::new("/docs/report.pdf"))?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config;

const FILE_NAME: &str = "preferences.json";

/// Contents of `preferences.json`. Missing keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub save_preferences: bool,
    pub last_merged_input_file: Option<String>,
    pub last_renamed_file: Option<String>,
    pub last_split_file: Option<String>,
    pub last_extract_file: Option<String>,
    pub batch_last_merged_folder: Option<String>,
    pub batch_last_renamed_folder: Option<String>,
    pub batch_last_split_file: Option<String>,
}

/// Which remembered location to update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceSlot {
    MergedInput,
    Renamed,
    Split,
    Extract,
    BatchMerged,
    BatchRenamed,
    BatchSplit,
}

impl Preferences {
    fn slot_mut(&mut self, slot: PreferenceSlot) -> &mut Option<String> {
        match slot {
            PreferenceSlot::MergedInput => &mut self.last_merged_input_file,
            PreferenceSlot::Renamed => &mut self.last_renamed_file,
            PreferenceSlot::Split => &mut self.last_split_file,
            PreferenceSlot::Extract => &mut self.last_extract_file,
            PreferenceSlot::BatchMerged => &mut self.batch_last_merged_folder,
            PreferenceSlot::BatchRenamed => &mut self.batch_last_renamed_folder,
            PreferenceSlot::BatchSplit => &mut self.batch_last_split_file,
        }
    }

    /// Remembered location for `slot`.
    pub fn last(&self, slot: PreferenceSlot) -> Option<&str> {
        let value = match slot {
            PreferenceSlot::MergedInput => &self.last_merged_input_file,
            PreferenceSlot::Renamed => &self.last_renamed_file,
            PreferenceSlot::Split => &self.last_split_file,
            PreferenceSlot::Extract => &self.last_extract_file,
            PreferenceSlot::BatchMerged => &self.batch_last_merged_folder,
            PreferenceSlot::BatchRenamed => &self.batch_last_renamed_folder,
            PreferenceSlot::BatchSplit => &self.batch_last_split_file,
        };
        value.as_deref()
    }
}

/// Preferences bound to the file they are stored in.
#[derive(Debug)]
pub struct PreferencesStore {
    path: PathBuf,
    preferences: Preferences,
}

impl PreferencesStore {
    /// Open the store in the per-user config directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no config directory is available or the file
    /// cannot be created.
    pub fn open_default() -> Result<Self> {
        Self::open(config::config_dir()?.join(FILE_NAME))
    }

    /// Open the store at `path`, creating it with defaults if absent.
    ///
    /// A file that cannot be parsed is replaced by the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let preferences = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str(&text) {
                Ok(preferences) => Some(preferences),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "preferences file is invalid, resetting");
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };

        let needs_save = preferences.is_none();
        let store = Self {
            preferences: preferences.unwrap_or_default(),
            path,
        };
        if needs_save {
            store.save()?;
        }
        Ok(store)
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    /// Turn recording on or off.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        self.preferences.save_preferences = enabled;
        self.save()
    }

    /// Forget everything and disable recording.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn reset(&mut self) -> Result<()> {
        self.preferences = Preferences::default();
        self.save()
    }

    /// Remember `location` for `slot` if recording is enabled.
    ///
    /// Returns whether anything was stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn record(&mut self, slot: PreferenceSlot, location: &Path) -> Result<bool> {
        if !self.preferences.save_preferences {
            return Ok(false);
        }
        *self.preferences.slot_mut(slot) = Some(location.display().to_string());
        self.save()?;
        Ok(true)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let text = serde_json::to_string_pretty(&self.preferences)?;
        fs::write(&self.path, text)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }
}
