//! JSON market fixture.
//!
//! A captured or hand-written document describing everything the engine's
//! collaborators would otherwise answer live: character orders, station
//! regions, competitor books, sales volume, costs and names. Failure flags let
//! one document exercise degraded runs as well.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    CharacterId, CompetitorListing, CycleId, PairKey, Price, RegionId, StationId, StationRegion,
    TraderOrder, TypeId, TypedListing, Units,
};
use crate::error::{Error, Result};
use crate::port::{
    CostLedger, MarketDataSource, NameResolver, OrderSource, SalesHistory, StructureSnapshotStore,
};

/// A trader character and their open orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureCharacter {
    pub id: CharacterId,
    pub name: String,
    #[serde(default)]
    pub orders: Vec<TraderOrder>,
}

/// A competitor listing at a regional station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureListing {
    pub station_id: StationId,
    pub type_id: TypeId,
    pub price: Price,
    pub volume: Units,
}

/// Latest daily sold units for a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureSales {
    pub station_id: StationId,
    pub type_id: TypeId,
    pub units: Units,
}

/// Known unit cost for a pair, optionally tied to a trading cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureCost {
    pub station_id: StationId,
    pub type_id: TypeId,
    pub unit_cost: Price,
    #[serde(default)]
    pub cycle_id: Option<CycleId>,
}

/// Committed line items of a trading cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureCycle {
    pub id: CycleId,
    pub pairs: Vec<PairKey>,
}

/// Item type display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureType {
    pub id: TypeId,
    pub name: String,
}

/// Offline stand-in for every collaborator port.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketFixture {
    pub characters: Vec<FixtureCharacter>,
    /// Characters whose order listing fails.
    pub failing_characters: Vec<CharacterId>,
    pub stations: Vec<StationRegion>,
    /// Make the batch region lookup fail.
    pub region_lookup_fails: bool,
    pub region_listings: Vec<FixtureListing>,
    /// Pairs whose regional fetch fails.
    pub failing_pairs: Vec<PairKey>,
    /// The live structure book.
    pub structure_listings: Vec<TypedListing>,
    /// Make the live structure fetch fail.
    pub structure_unavailable: bool,
    /// The persisted structure snapshot, if one exists.
    pub structure_snapshot: Option<Vec<TypedListing>>,
    pub daily_sold: Vec<FixtureSales>,
    /// Make the sales history lookup fail.
    pub sales_history_fails: bool,
    pub costs: Vec<FixtureCost>,
    pub cycles: Vec<FixtureCycle>,
    pub types: Vec<FixtureType>,
}

impl MarketFixture {
    /// Load a fixture document from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Every character with orders in the fixture.
    #[must_use]
    pub fn character_ids(&self) -> Vec<CharacterId> {
        self.characters.iter().map(|c| c.id).collect()
    }

    /// Every station with a known region.
    #[must_use]
    pub fn station_ids(&self) -> Vec<StationId> {
        self.stations.iter().map(|s| s.station_id).collect()
    }
}

fn failure(what: impl Into<String>) -> Error {
    Error::Collaborator(what.into())
}

#[async_trait]
impl OrderSource for MarketFixture {
    async fn list_active_sell_orders(&self, character: CharacterId) -> Result<Vec<TraderOrder>> {
        if self.failing_characters.contains(&character) {
            return Err(failure(format!("order listing failed for character {character}")));
        }
        Ok(self
            .characters
            .iter()
            .find(|c| c.id == character)
            .map(|c| c.orders.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl MarketDataSource for MarketFixture {
    async fn resolve_station_regions(
        &self,
        stations: &[StationId],
    ) -> Result<HashMap<StationId, StationRegion>> {
        if self.region_lookup_fails {
            return Err(failure("station region lookup failed"));
        }
        Ok(self
            .stations
            .iter()
            .filter(|s| stations.contains(&s.station_id))
            .map(|s| (s.station_id, s.clone()))
            .collect())
    }

    async fn fetch_region_station_sell_listings(
        &self,
        _region: RegionId,
        station: StationId,
        type_id: TypeId,
    ) -> Result<Vec<CompetitorListing>> {
        let pair = PairKey::new(station, type_id);
        if self.failing_pairs.contains(&pair) {
            return Err(failure(format!("market fetch failed for {pair}")));
        }
        Ok(self
            .region_listings
            .iter()
            .filter(|l| l.station_id == station && l.type_id == type_id)
            .map(|l| CompetitorListing::new(l.price, l.volume))
            .collect())
    }

    async fn fetch_structure_sell_listings(
        &self,
        structure: StationId,
        _auth_character: CharacterId,
    ) -> Result<Vec<TypedListing>> {
        if self.structure_unavailable {
            return Err(failure(format!("structure {structure} order book unavailable")));
        }
        Ok(self.structure_listings.clone())
    }
}

#[async_trait]
impl StructureSnapshotStore for MarketFixture {
    async fn fetch_cached_structure_snapshot(
        &self,
        structure: StationId,
    ) -> Result<Vec<TypedListing>> {
        self.structure_snapshot
            .clone()
            .ok_or_else(|| failure(format!("no snapshot persisted for structure {structure}")))
    }
}

#[async_trait]
impl SalesHistory for MarketFixture {
    async fn latest_daily_sold_units(&self, pairs: &[PairKey]) -> Result<HashMap<PairKey, Units>> {
        if self.sales_history_fails {
            return Err(failure("sales history unavailable"));
        }
        Ok(self
            .daily_sold
            .iter()
            .map(|s| (PairKey::new(s.station_id, s.type_id), s.units))
            .filter(|(pair, _)| pairs.contains(pair))
            .collect())
    }
}

#[async_trait]
impl CostLedger for MarketFixture {
    async fn unit_cost(&self, pair: PairKey, cycle: Option<&CycleId>) -> Result<Option<Price>> {
        let matching = self
            .costs
            .iter()
            .filter(|c| PairKey::new(c.station_id, c.type_id) == pair);

        // A cycle-specific cost wins over an unscoped one.
        let mut unscoped = None;
        for cost in matching {
            match (&cost.cycle_id, cycle) {
                (Some(id), Some(wanted)) if id == wanted => return Ok(Some(cost.unit_cost)),
                (None, _) => unscoped = unscoped.or(Some(cost.unit_cost)),
                _ => {}
            }
        }
        Ok(unscoped)
    }

    async fn committed_pairs(&self, cycle: &CycleId) -> Result<HashSet<PairKey>> {
        self.cycles
            .iter()
            .find(|c| &c.id == cycle)
            .map(|c| c.pairs.iter().copied().collect())
            .ok_or_else(|| failure(format!("unknown cycle {cycle}")))
    }
}

#[async_trait]
impl NameResolver for MarketFixture {
    async fn item_type_names(&self, ids: &[TypeId]) -> Result<HashMap<TypeId, String>> {
        Ok(self
            .types
            .iter()
            .filter(|t| ids.contains(&t.id))
            .map(|t| (t.id, t.name.clone()))
            .collect())
    }

    async fn character_names(&self, ids: &[CharacterId]) -> Result<HashMap<CharacterId, String>> {
        Ok(self
            .characters
            .iter()
            .filter(|c| ids.contains(&c.id))
            .map(|c| (c.id, c.name.clone()))
            .collect())
    }

    async fn station_names(&self, ids: &[StationId]) -> Result<HashMap<StationId, String>> {
        Ok(self
            .stations
            .iter()
            .filter(|s| ids.contains(&s.station_id))
            .map(|s| (s.station_id, s.name.clone()))
            .collect())
    }
}
