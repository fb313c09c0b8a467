//! Relister - sell-order repricing advisor for EVE Online market traders.
//!
//! Given a trader's open sell orders and the competing order books, the
//! engine recommends which orders to reprice and to what. It is read-only:
//! it reports, it never modifies orders.
//!
//! # Architecture
//!
//! Hexagonal layout:
//!
//! - [`domain`] - Orders, listings, the pricing grid, policies and decisions
//! - [`port`] - Collaborator traits (orders, market data, sales history,
//!   costs, names)
//! - [`application`] - The repricing pipeline: collect, fetch, decide,
//!   estimate profit, assemble
//! - [`adapter`] - ESI HTTP client, JSON fixture and the CLI
//! - [`infrastructure`] - Configuration and logging
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use relister::adapter::outbound::fixture::MarketFixture;
//! use relister::application::{EnginePorts, EngineSettings, RepriceEngine, RepriceRequest};
//!
//! # async fn demo() -> relister::error::Result<()> {
//! let fixture = Arc::new(MarketFixture::from_path("fixture.json")?);
//! let engine = RepriceEngine::new(EnginePorts::shared(fixture), EngineSettings::default());
//! let report = engine.run(&RepriceRequest::default(), chrono::Utc::now()).await?;
//! println!("{} groups", report.len());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
