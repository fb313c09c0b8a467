//! Application services (use cases).
//!
//! [`engine::RepriceEngine`] drives one run through the pipeline:
//! collect own orders, resolve and fetch competitor books, decide, estimate
//! profitability, then assemble the report.

pub mod collector;
pub mod decision;
pub mod engine;
pub mod profit;
pub mod report;
pub mod scheduler;
pub mod snapshot;

pub use engine::{EnginePorts, EngineSettings, RepriceEngine, RepriceRequest};
