//! Fluent builder for [`MarketFixture`].

use rust_decimal::Decimal;

use crate::adapter::outbound::fixture::{
    FixtureCharacter, FixtureCost, FixtureCycle, FixtureListing, FixtureSales, FixtureType,
    MarketFixture,
};
use crate::domain::{
    CharacterId, CycleId, PairKey, RegionId, StationId, StationRegion, TraderOrder, TypeId,
    TypedListing, Units,
};

#[derive(Debug, Clone, Default)]
pub struct FixtureBuilder {
    fixture: MarketFixture,
}

impl FixtureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a character. Their orders are re-owned to `id`.
    pub fn character(mut self, id: i64, name: &str, orders: Vec<TraderOrder>) -> Self {
        let id = CharacterId::new(id);
        let orders = orders
            .into_iter()
            .map(|mut o| {
                o.character_id = id;
                o
            })
            .collect();
        self.fixture.characters.push(FixtureCharacter {
            id,
            name: name.to_string(),
            orders,
        });
        self
    }

    pub fn failing_character(mut self, id: i64) -> Self {
        self.fixture.failing_characters.push(CharacterId::new(id));
        self
    }

    pub fn station(mut self, station: StationId, name: &str, region: RegionId) -> Self {
        self.fixture.stations.push(StationRegion {
            station_id: station,
            name: name.to_string(),
            region_id: region,
        });
        self
    }

    pub fn region_lookup_fails(mut self) -> Self {
        self.fixture.region_lookup_fails = true;
        self
    }

    pub fn region_listing(
        mut self,
        station: StationId,
        type_id: TypeId,
        price: Decimal,
        volume: Units,
    ) -> Self {
        self.fixture.region_listings.push(FixtureListing {
            station_id: station,
            type_id,
            price,
            volume,
        });
        self
    }

    pub fn failing_pair(mut self, pair: PairKey) -> Self {
        self.fixture.failing_pairs.push(pair);
        self
    }

    pub fn structure_listing(mut self, type_id: TypeId, price: Decimal, volume: Units) -> Self {
        self.fixture.structure_listings.push(TypedListing {
            type_id,
            price,
            volume,
        });
        self
    }

    pub fn structure_unavailable(mut self) -> Self {
        self.fixture.structure_unavailable = true;
        self
    }

    pub fn snapshot_listing(mut self, type_id: TypeId, price: Decimal, volume: Units) -> Self {
        self.fixture
            .structure_snapshot
            .get_or_insert_with(Vec::new)
            .push(TypedListing {
                type_id,
                price,
                volume,
            });
        self
    }

    pub fn daily_sold(mut self, station: StationId, type_id: TypeId, units: Units) -> Self {
        self.fixture.daily_sold.push(FixtureSales {
            station_id: station,
            type_id,
            units,
        });
        self
    }

    pub fn sales_history_fails(mut self) -> Self {
        self.fixture.sales_history_fails = true;
        self
    }

    pub fn cost(mut self, station: StationId, type_id: TypeId, unit_cost: Decimal) -> Self {
        self.fixture.costs.push(FixtureCost {
            station_id: station,
            type_id,
            unit_cost,
            cycle_id: None,
        });
        self
    }

    pub fn cycle(mut self, id: &str, pairs: Vec<PairKey>) -> Self {
        self.fixture.cycles.push(FixtureCycle {
            id: CycleId::new(id),
            pairs,
        });
        self
    }

    pub fn item_type(mut self, id: i64, name: &str) -> Self {
        self.fixture.types.push(FixtureType {
            id: TypeId::new(id),
            name: name.to_string(),
        });
        self
    }

    pub fn build(self) -> MarketFixture {
        self.fixture
    }
}
