//! Instrumented [`MarketDataSource`] wrapper.
//!
//! Counts every call reaching the wrapped source and records the highest
//! number of regional fetches that were in flight at once. An optional delay
//! keeps fetches overlapping long enough for the peak to be meaningful.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{
    CharacterId, CompetitorListing, RegionId, StationId, StationRegion, TypeId, TypedListing,
};
use crate::error::Result;
use crate::port::MarketDataSource;

pub struct CountingMarket {
    inner: Arc<dyn MarketDataSource>,
    delay: Duration,
    region_lookups: AtomicUsize,
    listing_fetches: AtomicUsize,
    structure_fetches: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl CountingMarket {
    pub fn new(inner: Arc<dyn MarketDataSource>) -> Self {
        Self {
            inner,
            delay: Duration::ZERO,
            region_lookups: AtomicUsize::new(0),
            listing_fetches: AtomicUsize::new(0),
            structure_fetches: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Hold every regional fetch open for `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn region_lookups(&self) -> usize {
        self.region_lookups.load(Ordering::SeqCst)
    }

    pub fn listing_fetches(&self) -> usize {
        self.listing_fetches.load(Ordering::SeqCst)
    }

    pub fn structure_fetches(&self) -> usize {
        self.structure_fetches.load(Ordering::SeqCst)
    }

    /// Every call that reached the wrapped source.
    pub fn total_calls(&self) -> usize {
        self.region_lookups() + self.listing_fetches() + self.structure_fetches()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MarketDataSource for CountingMarket {
    async fn resolve_station_regions(
        &self,
        stations: &[StationId],
    ) -> Result<HashMap<StationId, StationRegion>> {
        self.region_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve_station_regions(stations).await
    }

    async fn fetch_region_station_sell_listings(
        &self,
        region: RegionId,
        station: StationId,
        type_id: TypeId,
    ) -> Result<Vec<CompetitorListing>> {
        self.listing_fetches.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let result = self
            .inner
            .fetch_region_station_sell_listings(region, station, type_id)
            .await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn fetch_structure_sell_listings(
        &self,
        structure: StationId,
        auth_character: CharacterId,
    ) -> Result<Vec<TypedListing>> {
        self.structure_fetches.fetch_add(1, Ordering::SeqCst);
        self.inner
            .fetch_structure_sell_listings(structure, auth_character)
            .await
    }
}
