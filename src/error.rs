//! Configuration errors
//!
//! The simulation itself never fails; only loading and parsing settings can.

use std::path::PathBuf;

/// Errors raised while building a [`crate::MatchSettings`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid colour {0:?}, expected #RRGGBB")]
    InvalidColor(String),

    #[error("unknown difficulty {0:?}")]
    UnknownDifficulty(String),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}
