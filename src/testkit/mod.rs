//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`domain`] - Builders for orders, listings and timestamps.
//! - [`fixture`] - Fluent builder for [`MarketFixture`](crate::adapter::outbound::fixture::MarketFixture).
//! - [`market`] - Instrumented market data source that counts calls and
//!   tracks peak concurrency.

pub mod domain;
pub mod fixture;
pub mod market;
