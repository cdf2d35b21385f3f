// SPDX-License-Identifier: GPL-3.0-only

//! User configuration loaded from a JSON file.
//!
//! Every field has a default, so an empty object (`{}`) is a valid
//! configuration:
//!
//! ```json
//! {
//!     "default_language": "UK",
//!     "debug": false,
//!     "overlay_layout": "math",
//!     "layouts": {
//!         "DE": {
//!             "lower": "de_neo_lc",
//!             "upper": "de_neo_uc",
//!             "lower_altgr": "de_neo_lc_alt_gr",
//!             "upper_altgr": "de_neo_uc_alt_gr"
//!         }
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::app_settings;
use crate::layout::{Language, LanguageLayoutIds, LayoutResourceId};

/// User configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Language shown when a session starts.
    pub default_language: Language,
    /// Enables verbose state-transition logging.
    pub debug: bool,
    /// Resource identifier of the overlay layout.
    pub overlay_layout: LayoutResourceId,
    /// Per-language replacements for the built-in layout resources.
    pub layouts: HashMap<Language, LanguageLayoutIds>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_language: Language::default(),
            debug: false,
            overlay_layout: LayoutResourceId::new(app_settings::DEFAULT_OVERLAY_LAYOUT),
            layouts: HashMap::new(),
        }
    }
}

impl Config {
    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the string is not valid configuration
    /// JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::from)
    }

    /// Loads a configuration file.
    ///
    /// # Arguments
    ///
    /// * `path` - The JSON file to read
    ///
    /// # Returns
    ///
    /// The parsed configuration. Fields missing from the file keep their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Json`] if its content is invalid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            source,
            path: Some(path.to_path_buf()),
        })?;

        let config = Self::from_json(&content).map_err(|err| err.with_path(path))?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Loads the configuration, falling back to defaults when the file does
    /// not exist or cannot be parsed.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|err| Self::fallback(path, err))
    }

    /// Logs why `path` could not be used and returns the defaults.
    ///
    /// A missing file is expected and logged at info level; any other
    /// failure is a warning.
    #[must_use]
    pub fn fallback(path: &Path, err: ConfigError) -> Self {
        match err {
            ConfigError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "No configuration file, using defaults");
            }
            err => {
                tracing::warn!("Ignoring configuration: {}", err);
            }
        }
        Self::default()
    }

    /// Location of the configuration file.
    ///
    /// Uses the environment override if set, otherwise
    /// `<config dir>/<app id>/vkboard.json` where the config dir is the
    /// platform one (`$XDG_CONFIG_HOME` or `~/.config` on Linux).
    #[must_use]
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(app_settings::CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(app_settings::APP_ID)
            .join(app_settings::CONFIG_FILE_NAME)
    }

    /// Tracing directive matching the `debug` flag.
    #[must_use]
    pub fn log_directive(&self) -> &'static str {
        if self.debug {
            app_settings::DEBUG_LOG_DIRECTIVE
        } else {
            app_settings::DEFAULT_LOG_DIRECTIVE
        }
    }
}

// ============================================================================
// Error Handling Types
// ============================================================================

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration file could not be read
    Io {
        /// The underlying I/O error
        source: std::io::Error,
        /// File that caused the error
        path: Option<PathBuf>,
    },

    /// The configuration is not valid JSON or has unexpected fields
    Json {
        /// The underlying JSON error
        source: serde_json::Error,
        /// File being parsed
        path: Option<PathBuf>,
    },
}

impl ConfigError {
    /// Attaches a file path to the error.
    #[must_use]
    pub fn with_path(self, file: impl Into<PathBuf>) -> Self {
        match self {
            ConfigError::Io { source, .. } => ConfigError::Io {
                source,
                path: Some(file.into()),
            },
            ConfigError::Json { source, .. } => ConfigError::Json {
                source,
                path: Some(file.into()),
            },
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { source, path } => {
                write!(f, "I/O error")?;
                if let Some(path) = path {
                    write!(f, " reading '{}'", path.display())?;
                }
                write!(f, ": {}", source)
            }
            ConfigError::Json { source, path } => {
                write!(f, "Invalid configuration")?;
                if let Some(path) = path {
                    write!(f, " in '{}'", path.display())?;
                }
                write!(f, " at line {}: {}", source.line(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Json { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source, path: None }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source, path: None }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
