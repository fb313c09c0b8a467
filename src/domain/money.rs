//! Monetary types for price and volume representation.

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Whole item units. Market volumes are never fractional.
pub type Units = u64;
