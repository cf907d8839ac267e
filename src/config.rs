//! Tool settings: history location and default target folder.
//!
//! Shared state (the history file path, the default folder to organize) is
//! carried in an explicit [`Settings`] object rather than ambient globals, so
//! tests can point the engine and the history store at isolated temporary
//! paths.
//!
//! Settings load from a TOML file with the following structure:
//!
//! ```toml
//! history_file = "/home/user/Documents/tidydesk/organizer_history.json"
//! default_folder = "/home/user/Downloads"
//! ```
//!
//! Both keys are optional; unset values fall back to platform defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading settings.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Settings file not found at the explicitly requested path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// IO error while reading the settings file.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Settings file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid settings: {}", msg),
            ConfigError::IoError(msg) => write!(f, "IO error reading settings: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// User-configurable paths, with platform fallbacks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Where the history document lives. Defaults to
    /// `<Documents>/tidydesk/organizer_history.json`.
    #[serde(default)]
    pub history_file: Option<PathBuf>,

    /// The folder organized when the caller names none. Defaults to the
    /// platform Downloads directory, then the home directory.
    #[serde(default)]
    pub default_folder: Option<PathBuf>,
}

impl Settings {
    /// Load settings, with fallback to defaults.
    ///
    /// Lookup order:
    /// 1. If `config_path` is provided, load from that file (missing or
    ///    malformed is an error).
    /// 2. `.tidydeskrc.toml` in the current directory.
    /// 3. `~/.config/tidydesk/config.toml`.
    /// 4. Defaults.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(".tidydeskrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let home_config = config_dir.join("tidydesk").join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load settings from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if the file does not exist,
    /// `ConfigError::ConfigInvalid` if TOML parsing fails, and
    /// `ConfigError::IoError` if the file cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// The history file path, applying the platform default when unset.
    pub fn history_path(&self) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(crate::history::HistoryStore::default_path)
    }

    /// The target folder to organize when the caller provides none:
    /// the configured default, else Downloads, else home.
    pub fn target_folder(&self) -> PathBuf {
        self.default_folder.clone().unwrap_or_else(|| {
            dirs::download_dir()
                .filter(|p| p.exists())
                .or_else(dirs::home_dir)
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}
