//! Market data ports for competitor order books.
//!
//! Regional stations are queried per (region, station, item-type). Player
//! structures have no region and expose one paged book for every item type,
//! which requires authentication; a snapshot store persisted elsewhere acts
//! as the fallback when the live fetch fails.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{
    CharacterId, CompetitorListing, RegionId, StationId, StationRegion, TypeId, TypedListing,
};
use crate::error::Result;

/// Live market data source.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Batch lookup of station names and regions. Stations that cannot be
    /// resolved are simply absent from the returned map.
    async fn resolve_station_regions(
        &self,
        stations: &[StationId],
    ) -> Result<HashMap<StationId, StationRegion>>;

    /// Sell-side listings for one item type at one station of a region.
    async fn fetch_region_station_sell_listings(
        &self,
        region: RegionId,
        station: StationId,
        type_id: TypeId,
    ) -> Result<Vec<CompetitorListing>>;

    /// Every sell-side listing on a structure, across all pages, fetched
    /// with the credentials of `auth_character`.
    async fn fetch_structure_sell_listings(
        &self,
        structure: StationId,
        auth_character: CharacterId,
    ) -> Result<Vec<TypedListing>>;
}

/// Most recent structure order book persisted by an external collaborator.
#[async_trait]
pub trait StructureSnapshotStore: Send + Sync {
    async fn fetch_cached_structure_snapshot(&self, structure: StationId)
        -> Result<Vec<TypedListing>>;
}
