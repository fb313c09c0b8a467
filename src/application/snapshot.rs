//! Market snapshot provider.
//!
//! Resolves where each (station, item-type) pair trades and fetches its
//! sell-side book. Region lookups happen once per run for every station up
//! front. The private structure market is fetched as a whole book, falling
//! back to the last persisted snapshot when the live fetch fails.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::listing::{group_by_type, sanitize_listings};
use crate::domain::{
    CompetitorListing, PairKey, StationId, StationRegion, StructureVenue, TypeId,
};
use crate::error::Result;
use crate::port::{MarketDataSource, StructureSnapshotStore};

/// Sanitized structure order book keyed by item type.
#[derive(Debug, Clone, Default)]
pub struct StructureBook {
    by_type: HashMap<TypeId, Vec<CompetitorListing>>,
}

impl StructureBook {
    /// Listings for one item type; empty when nobody else sells it there.
    #[must_use]
    pub fn listings_for(&self, type_id: TypeId) -> Vec<CompetitorListing> {
        self.by_type.get(&type_id).cloned().unwrap_or_default()
    }
}

/// Per-run market snapshot provider.
pub struct SnapshotProvider {
    market: Arc<dyn MarketDataSource>,
    snapshots: Arc<dyn StructureSnapshotStore>,
    structure: Option<StructureVenue>,
    regions: HashMap<StationId, StationRegion>,
}

impl SnapshotProvider {
    /// Resolve regions for every regular station in one batch.
    ///
    /// A failed batch lookup leaves every station unresolved, which makes
    /// their pairs yield empty listings rather than failing the run.
    pub async fn prepare(
        market: Arc<dyn MarketDataSource>,
        snapshots: Arc<dyn StructureSnapshotStore>,
        structure: Option<StructureVenue>,
        stations: &[StationId],
    ) -> Self {
        let regular: Vec<StationId> = stations
            .iter()
            .copied()
            .filter(|s| structure.as_ref().map_or(true, |v| v.id != *s))
            .collect();

        let regions = if regular.is_empty() {
            HashMap::new()
        } else {
            match market.resolve_station_regions(&regular).await {
                Ok(regions) => regions,
                Err(e) => {
                    warn!(stations = regular.len(), error = %e, "Station region lookup failed");
                    HashMap::new()
                }
            }
        };

        for station in &regular {
            if !regions.contains_key(station) {
                warn!(station_id = %station, "No trade region for station, competitors will be empty");
            }
        }

        Self {
            market,
            snapshots,
            structure,
            regions,
        }
    }

    /// Whether a station is the configured private structure.
    #[must_use]
    pub fn is_structure(&self, station: StationId) -> bool {
        self.structure.as_ref().is_some_and(|v| v.id == station)
    }

    /// Display names known from region resolution and the structure config.
    #[must_use]
    pub fn station_names(&self) -> HashMap<StationId, String> {
        let mut names: HashMap<StationId, String> = self
            .regions
            .values()
            .map(|r| (r.station_id, r.name.clone()))
            .collect();
        if let Some(venue) = &self.structure {
            names.insert(venue.id, venue.name.clone());
        }
        names
    }

    /// Sorted competitor listings for one pair.
    pub async fn fetch(&self, pair: PairKey) -> Result<Vec<CompetitorListing>> {
        if self.is_structure(pair.station_id) {
            return Ok(self
                .fetch_structure_book()
                .await
                .map(|book| book.listings_for(pair.type_id))
                .unwrap_or_default());
        }

        let Some(region) = self.regions.get(&pair.station_id) else {
            debug!(pair = %pair, "Station has no region, no competitors");
            return Ok(Vec::new());
        };

        let listings = self
            .market
            .fetch_region_station_sell_listings(region.region_id, pair.station_id, pair.type_id)
            .await?;
        Ok(sanitize_listings(listings))
    }

    /// Fetch the structure's whole book once.
    ///
    /// Tries the live authenticated fetch first and falls back to the last
    /// persisted snapshot. Returns `None` when neither is available.
    pub async fn fetch_structure_book(&self) -> Option<StructureBook> {
        let venue = self.structure.as_ref()?;

        if let Some(auth) = venue.auth_character {
            match self.market.fetch_structure_sell_listings(venue.id, auth).await {
                Ok(book) => {
                    info!(structure_id = %venue.id, listings = book.len(), "Fetched structure order book");
                    return Some(StructureBook {
                        by_type: group_by_type(book),
                    });
                }
                Err(e) => {
                    warn!(structure_id = %venue.id, error = %e, "Structure fetch failed, using cached snapshot");
                }
            }
        } else {
            debug!(structure_id = %venue.id, "No auth character for structure, using cached snapshot");
        }

        match self.snapshots.fetch_cached_structure_snapshot(venue.id).await {
            Ok(book) => Some(StructureBook {
                by_type: group_by_type(book),
            }),
            Err(e) => {
                warn!(structure_id = %venue.id, error = %e, "No structure snapshot available");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CharacterId, RegionId};
    use crate::testkit::fixture::FixtureBuilder;
    use rust_decimal_macros::dec;

    const JITA: StationId = StationId::new(60_003_760);
    const STRUCTURE: StationId = StationId::new(1_035_466_617_946);
    const TRITANIUM: TypeId = TypeId::new(34);

    fn venue(auth: Option<i64>) -> StructureVenue {
        StructureVenue {
            id: STRUCTURE,
            name: "Home Citadel".into(),
            auth_character: auth.map(CharacterId::new),
        }
    }

    #[tokio::test]
    async fn region_listings_are_sanitized_and_sorted() {
        let fixture = Arc::new(
            FixtureBuilder::new()
                .station(JITA, "Jita IV - Moon 4", RegionId::new(10_000_002))
                .region_listing(JITA, TRITANIUM, dec!(6), 10)
                .region_listing(JITA, TRITANIUM, dec!(5), 10)
                .region_listing(JITA, TRITANIUM, dec!(4), 0)
                .build(),
        );
        let provider = SnapshotProvider::prepare(fixture.clone(), fixture, None, &[JITA]).await;

        let listings = provider.fetch(PairKey::new(JITA, TRITANIUM)).await.unwrap();
        let prices: Vec<_> = listings.iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![dec!(5), dec!(6)]);
    }

    #[tokio::test]
    async fn unresolved_station_yields_empty_listings() {
        let fixture = Arc::new(
            FixtureBuilder::new()
                .region_listing(JITA, TRITANIUM, dec!(5), 10)
                .build(),
        );
        let provider = SnapshotProvider::prepare(fixture.clone(), fixture, None, &[JITA]).await;

        let listings = provider.fetch(PairKey::new(JITA, TRITANIUM)).await.unwrap();
        assert!(listings.is_empty());
    }

    #[tokio::test]
    async fn structure_falls_back_to_snapshot() {
        let fixture = Arc::new(
            FixtureBuilder::new()
                .structure_listing(TRITANIUM, dec!(7), 5)
                .snapshot_listing(TRITANIUM, dec!(8), 5)
                .structure_unavailable()
                .build(),
        );
        let provider =
            SnapshotProvider::prepare(fixture.clone(), fixture, Some(venue(Some(1))), &[STRUCTURE])
                .await;

        let listings = provider.fetch(PairKey::new(STRUCTURE, TRITANIUM)).await.unwrap();
        assert_eq!(listings[0].price, dec!(8));
    }

    #[tokio::test]
    async fn structure_prefers_live_book() {
        let fixture = Arc::new(
            FixtureBuilder::new()
                .structure_listing(TRITANIUM, dec!(7), 5)
                .snapshot_listing(TRITANIUM, dec!(8), 5)
                .build(),
        );
        let provider =
            SnapshotProvider::prepare(fixture.clone(), fixture, Some(venue(Some(1))), &[STRUCTURE])
                .await;

        let book = provider.fetch_structure_book().await.unwrap();
        assert_eq!(book.listings_for(TRITANIUM)[0].price, dec!(7));
        assert_eq!(provider.station_names()[&STRUCTURE], "Home Citadel");
    }

    #[tokio::test]
    async fn structure_without_auth_uses_snapshot() {
        let fixture = Arc::new(
            FixtureBuilder::new()
                .structure_listing(TRITANIUM, dec!(7), 5)
                .snapshot_listing(TRITANIUM, dec!(8), 5)
                .build(),
        );
        let provider =
            SnapshotProvider::prepare(fixture.clone(), fixture, Some(venue(None)), &[STRUCTURE])
                .await;

        let book = provider.fetch_structure_book().await.unwrap();
        assert_eq!(book.listings_for(TRITANIUM)[0].price, dec!(8));
    }
}
