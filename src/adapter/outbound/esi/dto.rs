//! ESI response payloads.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::{CompetitorListing, Price, StationId, TypeId, TypedListing, Units};

#[derive(Debug, Clone, Deserialize)]
pub struct StationDto {
    pub name: String,
    pub system_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemDto {
    pub constellation_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConstellationDto {
    pub region_id: i64,
}

/// One entry of a region or structure order book.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketOrderDto {
    pub order_id: i64,
    pub type_id: i64,
    pub location_id: i64,
    pub price: f64,
    pub volume_remain: Units,
    #[serde(default)]
    pub is_buy_order: bool,
}

impl MarketOrderDto {
    /// ISK prices carry two decimals. Non-finite prices are rejected.
    fn decimal_price(&self) -> Option<Price> {
        Decimal::from_f64(self.price).map(|p| p.round_dp(2))
    }

    #[must_use]
    pub fn location(&self) -> StationId {
        StationId::new(self.location_id)
    }

    #[must_use]
    pub fn listing(&self) -> Option<CompetitorListing> {
        self.decimal_price()
            .map(|price| CompetitorListing::new(price, self.volume_remain))
    }

    #[must_use]
    pub fn typed_listing(&self) -> Option<TypedListing> {
        self.decimal_price().map(|price| TypedListing {
            type_id: TypeId::new(self.type_id),
            price,
            volume: self.volume_remain,
        })
    }
}
