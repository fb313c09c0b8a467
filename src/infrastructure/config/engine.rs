//! Engine, roster and structure configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use crate::application::scheduler::DEFAULT_MAX_WORKERS;
use crate::domain::{
    CharacterId, GroupingMode, RepricePolicy, StationId, StructureVenue, Units,
};
use crate::error::ConfigError;

/// Default repricing policy and worker pool size.
///
/// Every policy knob can be overridden per run.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// `perOrder`, `perCharacter` or `global`.
    #[serde(default = "default_grouping_mode")]
    pub grouping_mode: String,
    #[serde(default = "default_min_undercut_volume_ratio")]
    pub min_undercut_volume_ratio: Decimal,
    #[serde(default = "default_min_undercut_units")]
    pub min_undercut_units: Units,
    #[serde(default = "default_expiry_refresh_days")]
    pub expiry_refresh_days: u32,
    /// Upper bound on concurrent competitor fetch workers.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
}

fn default_grouping_mode() -> String {
    GroupingMode::default().as_str().to_string()
}

fn default_min_undercut_volume_ratio() -> Decimal {
    dec!(0.15)
}

const fn default_min_undercut_units() -> Units {
    1
}

const fn default_expiry_refresh_days() -> u32 {
    2
}

const fn default_max_workers() -> usize {
    DEFAULT_MAX_WORKERS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grouping_mode: default_grouping_mode(),
            min_undercut_volume_ratio: default_min_undercut_volume_ratio(),
            min_undercut_units: default_min_undercut_units(),
            expiry_refresh_days: default_expiry_refresh_days(),
            max_workers: default_max_workers(),
        }
    }
}

impl EngineConfig {
    /// The configured default policy.
    pub fn policy(&self) -> Result<RepricePolicy, ConfigError> {
        let policy = RepricePolicy {
            grouping_mode: self.grouping_mode.parse()?,
            min_undercut_volume_ratio: self.min_undercut_volume_ratio,
            min_undercut_units: self.min_undercut_units,
            expiry_refresh_days: self.expiry_refresh_days,
        };
        policy.validate()?;
        Ok(policy)
    }
}

/// Default scope used when a run names no characters or stations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RosterConfig {
    #[serde(default)]
    pub seller_characters: Vec<CharacterId>,
    #[serde(default)]
    pub tracked_stations: Vec<StationId>,
}

/// The trader's private structure market.
#[derive(Debug, Clone, Deserialize)]
pub struct StructureConfig {
    pub id: StationId,
    #[serde(default)]
    pub name: String,
    /// Character whose token is used for the authenticated book fetch.
    #[serde(default)]
    pub auth_character: Option<CharacterId>,
}

impl StructureConfig {
    #[must_use]
    pub fn venue(&self) -> StructureVenue {
        let name = if self.name.is_empty() {
            format!("Structure {}", self.id)
        } else {
            self.name.clone()
        };
        StructureVenue {
            id: self.id,
            name,
            auth_character: self.auth_character,
        }
    }
}
