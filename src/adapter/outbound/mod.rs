//! Outbound adapters (driven side).

pub mod esi;
pub mod fixture;
