//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application
//! settings. Configuration is loaded from a TOML file with an environment
//! variable override for the ESI bearer token (`ESI_ACCESS_TOKEN`).
//!
//! # Example
//!
//! ```no_run
//! use relister::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("relister.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use url::Url;

use super::engine::{EngineConfig, RosterConfig, StructureConfig};
use super::logging::LoggingConfig;
use crate::adapter::outbound::esi::settings::{EsiConfig, ACCESS_TOKEN_ENV};
use crate::application::EngineSettings;
use crate::domain::{FeeSchedule, RepricePolicy};
use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Default policy and worker pool size.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Characters and stations a run covers when it names none.
    #[serde(default)]
    pub roster: RosterConfig,

    /// Optional private structure market.
    #[serde(default)]
    pub structure: Option<StructureConfig>,

    /// Sell-side fees used for profitability.
    #[serde(default)]
    pub fees: FeeSchedule,

    /// Live market data API.
    #[serde(default)]
    pub esi: EsiConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        // Bearer token comes from the environment only
        config.esi.access_token = std::env::var(ACCESS_TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty());

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is
    /// malformed, or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    pub fn validate(&self) -> Result<()> {
        self.engine.policy()?;

        if self.engine.max_workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_workers",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if !self.logging.is_known_format() {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("unknown log format '{}' (expected pretty or json)", self.logging.format),
            }
            .into());
        }

        for (field, rate) in [
            ("sales_tax", self.fees.sales_tax),
            ("broker_fee", self.fees.broker_fee),
        ] {
            if rate < Decimal::ZERO || rate >= Decimal::ONE {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be in [0, 1)".to_string(),
                }
                .into());
            }
        }
        if self.fees.sales_tax + self.fees.broker_fee >= Decimal::ONE {
            return Err(ConfigError::InvalidValue {
                field: "fees",
                reason: "sales_tax + broker_fee must be below 1".to_string(),
            }
            .into());
        }

        if let Some(structure) = &self.structure {
            if structure.id.get() <= 0 {
                return Err(ConfigError::InvalidValue {
                    field: "structure.id",
                    reason: "must be a positive location id".to_string(),
                }
                .into());
            }
        }

        if self.esi.base_url.is_empty() {
            return Err(ConfigError::MissingField { field: "base_url" }.into());
        }
        if let Err(e) = Url::parse(&self.esi.base_url) {
            return Err(ConfigError::InvalidValue {
                field: "base_url",
                reason: e.to_string(),
            }
            .into());
        }
        if self.esi.timeout_ms == 0 || self.esi.connect_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_ms",
                reason: "timeouts must be greater than 0".to_string(),
            }
            .into());
        }
        if self.esi.retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry_max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// The configured default policy.
    #[allow(clippy::result_large_err)]
    pub fn policy(&self) -> Result<RepricePolicy> {
        Ok(self.engine.policy()?)
    }

    /// Engine settings derived from the roster, structure and fee sections.
    #[must_use]
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            seller_characters: self.roster.seller_characters.clone(),
            tracked_stations: self.roster.tracked_stations.clone(),
            structure: self.structure.as_ref().map(StructureConfig::venue),
            fees: self.fees,
            max_workers: self.engine.max_workers,
        }
    }
}
