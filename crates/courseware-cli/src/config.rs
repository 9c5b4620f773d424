//! Settings file for the command-line host.
//!
//! ```toml
//! [autosave]
//! enabled = true
//! interval_seconds = 30
//!
//! [paths]
//! media_dir = "media"
//! output_dir = "output"
//!
//! [service]
//! base_url = "https://cdn.example.org"
//! auth_token = "..."
//! ```
//!
//! Every section and key is optional.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use courseware_model::ServiceContext;
use courseware_quiz::AutoSaveConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub autosave: AutoSaveConfig,
    pub paths: PathsConfig,
    /// Where uploaded media is served from. With an empty `base_url`,
    /// image blocks point at the stored file path.
    pub service: ServiceContext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub media_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            media_dir: PathBuf::from("media"),
            output_dir: PathBuf::from("output"),
        }
    }
}

/// Load settings from `path`, or defaults when no path is given.
///
/// A missing file yields defaults. A file that exists but cannot be read
/// or parsed is an error.
pub fn load_config(path: Option<&Path>) -> Result<CliConfig> {
    let Some(path) = path else {
        tracing::debug!("no config file given, using defaults");
        return Ok(CliConfig::default());
    };

    match fs::read_to_string(path) {
        Ok(content) => {
            let config: CliConfig = toml::from_str(&content)
                .with_context(|| format!("parse config {}", path.display()))?;
            tracing::info!("loaded config from {}", path.display());
            Ok(config)
        }
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
            tracing::info!("no config file found at {}, using defaults", path.display());
            Ok(CliConfig::default())
        }
        Err(error) => Err(error).with_context(|| format!("read config {}", path.display())),
    }
}
