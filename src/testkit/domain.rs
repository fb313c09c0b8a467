//! Builders for domain primitives used across tests.
//!
//! Orders default to a 100 ISK, 10/10 unit sell order of item type 34 at
//! Jita 4-4 owned by character 1, with no issue date.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::{
    CharacterId, CompetitorListing, OrderId, Price, StationId, TraderOrder, TypeId, Units,
};

/// Jita IV - Moon 4 - Caldari Navy Assembly Plant.
pub const JITA: StationId = StationId::new(60_003_760);

/// Start building an order with the given id.
pub fn order(id: i64) -> OrderBuilder {
    OrderBuilder::new(id)
}

/// Create a competitor listing.
pub fn listing(price: Price, volume: Units) -> CompetitorListing {
    CompetitorListing::new(price, volume)
}

/// Parse an RFC 3339 timestamp.
pub fn ts(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .expect("valid RFC 3339 timestamp")
        .with_timezone(&Utc)
}

/// Fluent builder for [`TraderOrder`].
#[derive(Debug, Clone)]
pub struct OrderBuilder {
    order: TraderOrder,
}

impl OrderBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            order: TraderOrder {
                order_id: OrderId::new(id),
                character_id: CharacterId::new(1),
                station_id: JITA,
                type_id: TypeId::new(34),
                price: dec!(100),
                volume_remain: 10,
                volume_total: 10,
                issued: None,
                duration_days: None,
                is_buy_order: false,
            },
        }
    }

    pub fn character(mut self, id: i64) -> Self {
        self.order.character_id = CharacterId::new(id);
        self
    }

    pub fn at(mut self, station: StationId) -> Self {
        self.order.station_id = station;
        self
    }

    pub fn type_id(mut self, id: i64) -> Self {
        self.order.type_id = TypeId::new(id);
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.order.price = price;
        self
    }

    pub fn remaining(mut self, remain: Units, total: Units) -> Self {
        self.order.volume_remain = remain;
        self.order.volume_total = total;
        self
    }

    pub fn issued(mut self, at: DateTime<Utc>, duration_days: u32) -> Self {
        self.order.issued = Some(at);
        self.order.duration_days = Some(duration_days);
        self
    }

    pub fn buy(mut self) -> Self {
        self.order.is_buy_order = true;
        self
    }

    pub fn build(self) -> TraderOrder {
        self.order
    }
}
