//! EVE Swagger Interface adapter for live market data.

pub mod client;
pub mod dto;
pub mod settings;

pub use client::EsiClient;
pub use settings::EsiConfig;
