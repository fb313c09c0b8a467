//! Trading policy knobs selected per engine run.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::money::Units;
use crate::error::ConfigError;

/// How own orders are grouped before the decision rule runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupingMode {
    /// Every order is evaluated independently.
    PerOrder,
    /// One active order per (character, station, item-type).
    PerCharacter,
    /// One active order per (station, item-type) across all characters.
    #[default]
    Global,
}

impl GroupingMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PerOrder => "perOrder",
            Self::PerCharacter => "perCharacter",
            Self::Global => "global",
        }
    }

    /// Grouped modes consult daily sales volume for laddering.
    #[must_use]
    pub const fn is_grouped(self) -> bool {
        !matches!(self, Self::PerOrder)
    }
}

impl fmt::Display for GroupingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupingMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        match normalized.as_str() {
            "perorder" => Ok(Self::PerOrder),
            "percharacter" => Ok(Self::PerCharacter),
            "global" => Ok(Self::Global),
            _ => Err(ConfigError::InvalidValue {
                field: "grouping_mode",
                reason: format!("unknown grouping mode '{s}' (expected perOrder, perCharacter or global)"),
            }),
        }
    }
}

/// Policy applied by the decision engine for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepricePolicy {
    pub grouping_mode: GroupingMode,
    /// Fraction of the order's listed volume competitors must show before
    /// the engine reacts.
    pub min_undercut_volume_ratio: Decimal,
    /// Absolute competitor volume floor.
    pub min_undercut_units: Units,
    /// Orders expiring within this many days get a refresh nudge.
    pub expiry_refresh_days: u32,
}

impl Default for RepricePolicy {
    fn default() -> Self {
        Self {
            grouping_mode: GroupingMode::default(),
            min_undercut_volume_ratio: dec!(0.15),
            min_undercut_units: 1,
            expiry_refresh_days: 2,
        }
    }
}

impl RepricePolicy {
    /// Reject settings that would produce misleading recommendations.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_undercut_volume_ratio < Decimal::ZERO
            || self.min_undercut_volume_ratio > Decimal::ONE
        {
            return Err(ConfigError::InvalidValue {
                field: "min_undercut_volume_ratio",
                reason: format!("{} is outside [0, 1]", self.min_undercut_volume_ratio),
            });
        }
        Ok(())
    }

    /// Competitor volume required before reacting to an order of
    /// `volume_total` units.
    #[must_use]
    pub fn volume_threshold(&self, volume_total: Units) -> Decimal {
        (self.min_undercut_volume_ratio * Decimal::from(volume_total))
            .max(Decimal::from(self.min_undercut_units))
    }
}
