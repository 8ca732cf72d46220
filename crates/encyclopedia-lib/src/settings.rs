//! Persistent user settings.
//!
//! Settings live in `settings.json` under the platform config directory, or
//! under `ENCYCLOPEDIA_CONFIG_DIR` when set. A missing file yields defaults.

use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::stats::{TrainingRate, DEFAULT_TRAINING_RATE};

/// Environment variable overriding the settings directory.
pub const CONFIG_DIR_ENV: &str = "ENCYCLOPEDIA_CONFIG_DIR";

/// File name of the settings document.
pub const SETTINGS_FILE: &str = "settings.json";

/// Language used when none is configured.
pub const DEFAULT_LANGUAGE: &str = "en";

/// User preferences that survive between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Localization language code, e.g. `en`.
    pub language: String,
    /// Skill training rate in skill points per minute.
    pub training_rate: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            training_rate: DEFAULT_TRAINING_RATE,
        }
    }
}

impl Settings {
    /// Validated training rate.
    pub fn training_rate(&self) -> Result<TrainingRate> {
        TrainingRate::new(self.training_rate)
    }

    /// Load settings from `dir`, or defaults when no file exists.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(SETTINGS_FILE);
        if !path.exists() {
            debug!(path = %path.display(), "no settings file; using defaults");
            return Ok(Self::default());
        }
        let bytes = fs::read(&path)?;
        serde_json::from_slice(&bytes).map_err(|source| Error::SettingsParse { path, source })
    }

    /// Write settings into `dir`, replacing any previous file atomically.
    pub fn save_to(&self, dir: &Path) -> Result<PathBuf> {
        self.training_rate()?;
        fs::create_dir_all(dir)?;
        let path = dir.join(SETTINGS_FILE);

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(tmp.as_file_mut(), self)?;
        tmp.write_all(b"\n")?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|err| err.error)?;

        info!(path = %path.display(), "saved settings");
        Ok(path)
    }

    /// Load settings from the resolved config directory.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir()?)
    }

    /// Save settings into the resolved config directory.
    pub fn save(&self) -> Result<PathBuf> {
        self.save_to(&config_dir()?)
    }
}

/// Resolve the settings directory: `ENCYCLOPEDIA_CONFIG_DIR`, else the
/// platform config directory.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let dirs = ProjectDirs::from("com", "encyclopedia", "encyclopedia")
        .ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.config_dir().to_path_buf())
}
