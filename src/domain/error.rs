//! Domain validation errors for core domain types.
//!
//! These errors are raised when upstream data violates a domain invariant.
//! Ingestion code drops the offending record and logs the error instead of
//! propagating it, so one malformed order never poisons a whole run.

use thiserror::Error;

use super::id::OrderId;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Orders must carry a positive unit price.
    #[error("order {order_id} has non-positive price {price}")]
    NonPositivePrice {
        /// The offending order.
        order_id: OrderId,
        /// The invalid price that was provided.
        price: rust_decimal::Decimal,
    },

    /// Orders must have been listed with at least one unit.
    #[error("order {order_id} has zero total volume")]
    EmptyOrder {
        /// The offending order.
        order_id: OrderId,
    },

    /// Remaining units can never exceed the originally listed units.
    #[error("order {order_id} has {remaining} units remaining of {total} listed")]
    RemainingExceedsTotal {
        /// The offending order.
        order_id: OrderId,
        /// Units still listed.
        remaining: u64,
        /// Units originally listed.
        total: u64,
    },
}
