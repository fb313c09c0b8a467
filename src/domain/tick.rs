//! Market pricing grid.
//!
//! A step is one tick of the reference price's own magnitude, so one tick
//! below 100 is 99.9 (the 0.1 tick of 100) rather than 99.99. The tick keeps
//! roughly four significant digits and grows with magnitude:
//!
//! | price range         | tick    |
//! |---------------------|---------|
//! | below 100           | 0.01    |
//! | 100 to 999.99       | 0.1     |
//! | 1,000 to 9,999      | 1       |
//! | 10,000 to 99,999    | 10      |
//! | and so on           | x10     |
//!
//! The decision engine only depends on the [`PriceGrid`] trait, so tests can
//! substitute a simpler grid.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::money::Price;

const MIN_TICK: Decimal = dec!(0.01);
const SIGNIFICANT_DIGITS: u32 = 4;

/// A deterministic price -> price stepping function.
pub trait PriceGrid: Send + Sync {
    /// The next representable price strictly below `price`, or a non-positive
    /// sentinel when no smaller positive price exists.
    fn next_cheaper(&self, price: Price) -> Price;

    /// The next representable price strictly above `price`.
    fn next_dearer(&self, price: Price) -> Price;
}

/// The in-game four-significant-digit grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignificantDigitGrid;

impl PriceGrid for SignificantDigitGrid {
    fn next_cheaper(&self, price: Price) -> Price {
        next_cheaper_tick(price)
    }

    fn next_dearer(&self, price: Price) -> Price {
        next_dearer_tick(price)
    }
}

/// Tick size for a reference price.
#[must_use]
pub fn tick_size(price: Price) -> Price {
    let digits = integer_digits(price);
    if digits > SIGNIFICANT_DIGITS {
        // At most 10^25 for the widest decimal, which always fits.
        (SIGNIFICANT_DIGITS..digits)
            .try_fold(Decimal::ONE, |tick, _| tick.checked_mul(Decimal::TEN))
            .unwrap_or(Decimal::MAX)
    } else {
        Decimal::new(1, SIGNIFICANT_DIGITS - digits).max(MIN_TICK)
    }
}

/// One tick cheaper than `price`. Returns zero when nothing positive remains.
#[must_use]
pub fn next_cheaper_tick(price: Price) -> Price {
    if price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let tick = tick_size(price);
    let aligned = (price / tick).floor() * tick;
    let candidate = if aligned < price { aligned } else { aligned - tick };
    if candidate <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        candidate.normalize()
    }
}

/// One tick dearer than `price`.
///
/// Saturates at the largest representable grid price when the next step
/// would leave the decimal range.
#[must_use]
pub fn next_dearer_tick(price: Price) -> Price {
    let price = price.max(Decimal::ZERO);
    let tick = tick_size(price);
    let aligned = (price / tick).floor() * tick;
    aligned.checked_add(tick).unwrap_or(aligned).normalize()
}

fn integer_digits(price: Price) -> u32 {
    price
        .trunc()
        .to_u128()
        .and_then(u128::checked_ilog10)
        .map_or(0, |log| log + 1)
}
