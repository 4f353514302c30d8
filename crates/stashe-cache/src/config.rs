use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Behavior knobs for a [`Cache`](crate::Cache).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Prefix of the human-readable summary produced by `Display`.
    pub label: String,
    /// Log a warning when the identifier changes while the cache holds
    /// data, since that data is left behind under the old identifier.
    pub warn_on_orphan: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            label: "stashe".into(),
            warn_on_orphan: true,
        }
    }
}

impl CacheConfig {
    /// Parse a config from TOML text. Missing fields take their defaults.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
