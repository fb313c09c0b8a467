//! Repricing decisions, the engine's unit of output.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::id::{CharacterId, OrderId, PairKey, StationId, TypeId};
use super::money::{Price, Units};

/// Why an order should be repriced. A decision may carry several tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasonTag {
    /// A relevant competitor is listed below the order.
    Undercut,
    /// The order is close to expiring and should be refreshed.
    Expiry,
    /// The order is one of a two-listing price ladder.
    Ladder,
}

impl ReasonTag {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undercut => "undercut",
            Self::Expiry => "expiry",
            Self::Ladder => "ladder",
        }
    }
}

impl fmt::Display for ReasonTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order expiry metadata, evaluated against the run's single `now`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryInfo {
    pub expires_at: DateTime<Utc>,
    /// Negative once the order has already expired.
    pub hours_remaining: Decimal,
    pub is_expiring_soon: bool,
}

/// Projected outcome of selling the remaining units at the suggested price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profitability {
    pub unit_cost: Price,
    /// Per-unit proceeds after fees.
    pub net_unit_price: Price,
    pub profit_per_unit: Price,
    pub total_profit: Price,
    pub margin_percent: Decimal,
    pub would_be_loss_after: bool,
}

/// A recommendation to reprice one order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepriceDecision {
    pub order_id: OrderId,
    pub character_id: CharacterId,
    pub station_id: StationId,
    pub type_id: TypeId,
    /// Display name of the item; filled in by the report assembler.
    pub item_name: String,
    pub volume_remain: Units,
    pub current_price: Price,
    /// The competitor price that triggered the decision, or the order's own
    /// price when only expiry did.
    pub competitor_price: Price,
    #[serde(rename = "suggestedNewPriceTicked")]
    pub suggested_price: Price,
    pub expiry: Option<ExpiryInfo>,
    pub reasons: Vec<ReasonTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profitability: Option<Profitability>,
}

impl RepriceDecision {
    #[must_use]
    pub const fn pair(&self) -> PairKey {
        PairKey::new(self.station_id, self.type_id)
    }

    #[must_use]
    pub fn has_reason(&self, reason: ReasonTag) -> bool {
        self.reasons.contains(&reason)
    }

    #[must_use]
    pub fn with_profitability(mut self, profitability: Option<Profitability>) -> Self {
        self.profitability = profitability;
        self
    }

    #[must_use]
    pub fn with_item_name(mut self, name: impl Into<String>) -> Self {
        self.item_name = name.into();
        self
    }
}
