//! The trader's own listed orders.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::id::{CharacterId, OrderId, PairKey, StationId, TypeId};
use super::money::{Price, Units};

/// An order the trader currently has listed.
///
/// Sourced fresh on every engine run and never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraderOrder {
    pub order_id: OrderId,
    pub character_id: CharacterId,
    pub station_id: StationId,
    pub type_id: TypeId,
    pub price: Price,
    pub volume_remain: Units,
    pub volume_total: Units,
    /// When the order was (re)issued, if known.
    #[serde(default)]
    pub issued: Option<DateTime<Utc>>,
    /// Listing duration in days, if known.
    #[serde(default)]
    pub duration_days: Option<u32>,
    #[serde(default)]
    pub is_buy_order: bool,
}

impl TraderOrder {
    /// The (station, item-type) pair this order trades on.
    #[must_use]
    pub const fn pair(&self) -> PairKey {
        PairKey::new(self.station_id, self.type_id)
    }

    /// Absolute expiry instant, when both issue time and a non-zero duration
    /// are known.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let issued = self.issued?;
        let days = self.duration_days.filter(|d| *d > 0)?;
        issued.checked_add_signed(Duration::days(i64::from(days)))
    }

    /// Check the order's data-integrity invariants.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.price <= Price::ZERO {
            return Err(DomainError::NonPositivePrice {
                order_id: self.order_id,
                price: self.price,
            });
        }
        if self.volume_total == 0 {
            return Err(DomainError::EmptyOrder {
                order_id: self.order_id,
            });
        }
        if self.volume_remain > self.volume_total {
            return Err(DomainError::RemainingExceedsTotal {
                order_id: self.order_id,
                remaining: self.volume_remain,
                total: self.volume_total,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn order() -> TraderOrder {
        TraderOrder {
            order_id: OrderId::new(1),
            character_id: CharacterId::new(7),
            station_id: StationId::new(60_003_760),
            type_id: TypeId::new(34),
            price: dec!(5.5),
            volume_remain: 10,
            volume_total: 10,
            issued: Some(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()),
            duration_days: Some(90),
            is_buy_order: false,
        }
    }

    #[test]
    fn expiry_is_issue_plus_duration() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        assert_eq!(order().expires_at(), Some(expected));
    }

    #[test]
    fn no_expiry_without_duration() {
        let mut o = order();
        o.duration_days = None;
        assert_eq!(o.expires_at(), None);

        o.duration_days = Some(0);
        assert_eq!(o.expires_at(), None);
    }

    #[test]
    fn validate_rejects_remaining_above_total() {
        let mut o = order();
        o.volume_remain = 11;
        assert!(matches!(
            o.validate(),
            Err(DomainError::RemainingExceedsTotal { .. })
        ));
    }

    #[test]
    fn validate_rejects_non_positive_price() {
        let mut o = order();
        o.price = dec!(0);
        assert!(matches!(
            o.validate(),
            Err(DomainError::NonPositivePrice { .. })
        ));
        assert!(order().validate().is_ok());
    }
}
