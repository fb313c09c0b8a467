//! EVE Swagger Interface (ESI) client configuration.

use serde::Deserialize;

/// Environment variable holding the bearer token for structure markets.
pub const ACCESS_TOKEN_ENV: &str = "ESI_ACCESS_TOKEN";

/// ESI HTTP client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EsiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_datasource")]
    pub datasource: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Maximum number of attempts for transient failures.
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Backoff between retries in milliseconds.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Bearer token, loaded from `ESI_ACCESS_TOKEN` (never from the file).
    #[serde(skip)]
    pub access_token: Option<String>,
}

fn default_base_url() -> String {
    "https://esi.evetech.net/latest/".into()
}

fn default_datasource() -> String {
    "tranquility".into()
}

fn default_user_agent() -> String {
    format!("relister/{}", env!("CARGO_PKG_VERSION"))
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_connect_timeout_ms() -> u64 {
    3_000
}

const fn default_retry_max_attempts() -> u32 {
    3
}

const fn default_retry_backoff_ms() -> u64 {
    500
}

impl Default for EsiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            datasource: default_datasource(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            access_token: None,
        }
    }
}
