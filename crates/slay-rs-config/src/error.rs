//! Config failures. All of them are fatal at startup.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A config document is not valid JSON5.
    #[error("cannot parse {origin}: {source}")]
    ParseFailed {
        origin: String,
        #[source]
        source: json5::Error,
    },
    /// The merged document does not fit the config model.
    #[error("config does not match schema: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// One key or env var holds a bad value.
    #[error("{path}: {message}")]
    InvalidField { path: String, message: String },
    /// A cross-field rule was violated.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFailed {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(origin: impl Into<String>, source: json5::Error) -> Self {
        Self::ParseFailed {
            origin: origin.into(),
            source,
        }
    }
}
