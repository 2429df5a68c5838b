//! Configuration file support.
//!
//! The configuration is read from `$XDG_CONFIG_HOME/zcalc/config.toml` (or the
//! platform equivalent) unless a path is given explicitly. Every field has a
//! default, so a partial file is fine.
//!
//! ```toml
//! [format]
//! grouping_separator = ","
//! decimal_separator = "."
//!
//! [ui]
//! width = 40
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculator::FormatConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("grouping and decimal separator are both {0:?}")]
    SameSeparators(char),

    #[error("{0:?} cannot be used as a separator")]
    InvalidSeparator(char),

    #[error("max_digits must be at least 1")]
    NoDigits,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub format: FormatConfig,
    pub ui: UiConfig,
}

/// Terminal front end settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Columns used for the panel and the history sidebar.
    pub width: usize,
    /// Whether the history sidebar starts open.
    pub show_history: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            width: 32,
            show_history: true,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("zcalc").join("config.toml"))
    }

    /// Load the configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// tried and defaults are used when nothing is there.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => {
                    tracing::debug!("no config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "loaded config file");
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let format = &self.format;

        for separator in [format.grouping_separator, format.decimal_separator] {
            if separator.is_ascii_digit() || separator == '-' {
                return Err(ConfigError::InvalidSeparator(separator));
            }
        }

        if format.grouping_separator == format.decimal_separator {
            return Err(ConfigError::SameSeparators(format.decimal_separator));
        }

        if format.max_digits == 0 {
            return Err(ConfigError::NoDigits);
        }

        Ok(())
    }
}
