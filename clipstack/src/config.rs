use crate::environment;
use anyhow::{Context as _, Result};
use clipstack_history::DEFAULT_MAX_ENTRIES;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_POLLING_INTERVAL_SECS: f64 = 5.0;

const CONFIG_FILE: &str = "config.json";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Clipboard polling cadence in seconds
    pub polling_interval_secs: f64,
    /// Bound on the unpinned portion of the history
    pub max_entries: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            polling_interval_secs: DEFAULT_POLLING_INTERVAL_SECS,
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

impl Config {
    /// Read the xdg config file; missing file means defaults
    pub fn load() -> Result<Self> {
        let path = environment::get_config_file(CONFIG_FILE)?;
        if !path.exists() {
            debug!("no config file at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = serde_json::from_str(&raw)
            .with_context(|| format!("invalid config {}", path.display()))?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// The polling cadence, floored at 100ms. Values `from_secs_f64` would
    /// reject (negative, NaN, infinite, overflowing) fall back to the default.
    pub fn polling_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.polling_interval_secs)
            .unwrap_or_else(|_| Duration::from_secs_f64(DEFAULT_POLLING_INTERVAL_SECS))
            .max(Duration::from_millis(100))
    }
}
