use std::path::PathBuf;

/// Errors from loading a [`CacheConfig`](crate::CacheConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config text is not valid TOML or has fields of the wrong type.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;
