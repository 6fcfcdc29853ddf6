//! Configuration loading.
//!
//! Configuration is stored in ~/.giztoy/chromaprint/config.yaml:
//!
//! ```yaml
//! format: auto
//! match:
//!   max_offset: 80
//!   min_score: 0.75
//!   max_simhash_distance: 15
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use giztoy_chromaprint::MatchConfig;
use serde::{Deserialize, Serialize};

use crate::input::InputFormat;

/// Default base configuration directory name.
pub const DEFAULT_BASE_DIR: &str = ".giztoy";
/// Application directory under the base directory.
pub const APP_NAME: &str = "chromaprint";
/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// CLI configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Default input format for fingerprint files.
    #[serde(default)]
    pub format: InputFormat,

    /// Matching thresholds.
    #[serde(default, rename = "match")]
    pub matching: MatchConfig,
}

impl Config {
    /// Gets the default config file path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| {
            home.join(DEFAULT_BASE_DIR)
                .join(APP_NAME)
                .join(DEFAULT_CONFIG_FILE)
        })
    }
}

/// Loads configuration from `custom_path`, or from the default path.
///
/// An explicit path must exist. A missing default file yields defaults.
pub fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let (path, required) = match custom_path {
        Some(p) => (p.to_path_buf(), true),
        None => match Config::default_path() {
            Some(p) => (p, false),
            None => return Ok(Config::default()),
        },
    };

    if !required && !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: Config = serde_yaml::from_str(&content)
        .with_context(|| format!("parse config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}
