//! Configuration module for manr
//!
//! Settings that would otherwise have to be given on every invocation:
//! manual roots, pager, formatter and output width. The configuration file
//! is optional; when it is missing every setting keeps its default.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ManConfig {
    /// Manual roots used when neither `-M` nor `MANPATH` is given
    #[serde(default)]
    pub manpath: Vec<PathBuf>,

    /// Pager command, used when neither `MANPAGER` nor `PAGER` is set
    #[serde(default)]
    pub pager: Option<String>,

    /// Formatter command for source pages; without one, sources are shown as they are
    #[serde(default)]
    pub formatter: Option<String>,

    /// Output width in columns
    #[serde(default)]
    pub width: Option<usize>,

    /// Report cross references to pages that do not exist
    #[serde(default)]
    pub check_xrefs: bool,
}

impl ManConfig {
    /// Get the path to the default config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("manr").join("config.toml"))
    }

    /// Load configuration from `path`, or from the default location
    ///
    /// A missing file at the default location yields the defaults. A file
    /// named explicitly must exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::config_path() {
                Ok(path) => (path, false),
                Err(e) => {
                    debug!("{e}, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !required && !path.exists() {
            debug!(path = %path.display(), "no configuration file");
            return Ok(Self::default());
        }

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml).required(required))
            .build()?;

        settings.try_deserialize()
    }
}
