/*
 * Error Module
 *
 * Configuration is the only place the simulation can fail. Everything that
 * could go wrong inside a tick is designed away, so these errors surface once
 * at startup (or when the control panel submits new parameters).
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating simulation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },

    #[error("spatial grid needs a cell size of at least 1 (got {cell_size})")]
    EmptyGrid { cell_size: f64 },
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
