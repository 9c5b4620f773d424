//! Auto-save configuration.

use serde::{Deserialize, Serialize};

/// Configuration for auto-save behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSaveConfig {
    /// Whether auto-save is enabled.
    pub enabled: bool,

    /// Seconds of session time between snapshots.
    ///
    /// A snapshot is only taken when answers changed since the last one.
    pub interval_seconds: u64,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_seconds: 30,
        }
    }
}

impl AutoSaveConfig {
    /// Create a disabled auto-save config.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Check if auto-save should trigger given the seconds since the last
    /// snapshot (or since the session started).
    pub fn should_save(&self, since_last_save: u64) -> bool {
        self.enabled && since_last_save >= self.interval_seconds.max(1)
    }
}
