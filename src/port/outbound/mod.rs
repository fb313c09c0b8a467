//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the read-only collaborators the engine consumes:
//! order listing, market data, sales history, cost records and display names.

pub mod ledger;
pub mod market;
pub mod names;
pub mod orders;
