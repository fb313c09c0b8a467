//! Sell-side fee schedule.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;

use super::money::Price;

/// Fees deducted from sell proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FeeSchedule {
    /// Sales tax charged on every completed sale (0.036 = 3.6%).
    #[serde(default = "default_sales_tax")]
    pub sales_tax: Decimal,
    /// Broker fee charged by the venue.
    #[serde(default = "default_broker_fee")]
    pub broker_fee: Decimal,
    /// Goods are moved by contract instead of the market; no fees apply.
    #[serde(default)]
    pub contracts: bool,
}

fn default_sales_tax() -> Decimal {
    dec!(0.036)
}

fn default_broker_fee() -> Decimal {
    dec!(0.015)
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            sales_tax: default_sales_tax(),
            broker_fee: default_broker_fee(),
            contracts: false,
        }
    }
}

impl FeeSchedule {
    /// Proceeds per unit after fees.
    #[must_use]
    pub fn net_unit_price(&self, price: Price) -> Price {
        if self.contracts {
            price
        } else {
            price * (Decimal::ONE - self.sales_tax - self.broker_fee)
        }
    }
}
