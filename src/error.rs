//! Crate-wide error types.
//!
//! Only configuration errors reject a run. Collaborator failures surface as
//! [`Error::Collaborator`], [`Error::Http`] or [`Error::Json`] from adapters
//! and are recovered by the engine as empty or missing data.

use thiserror::Error;

use crate::domain::error::DomainError;

/// Invalid or unreadable configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Malformed fixture document or market data payload.
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("market data request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid market data URL: {0}")]
    Url(#[from] url::ParseError),

    /// An upstream collaborator (order listing, market data, ledger) failed.
    #[error("collaborator error: {0}")]
    Collaborator(String),
}

pub type Result<T> = std::result::Result<T, Error>;
