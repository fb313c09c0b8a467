//! Competitor fetch scheduler.
//!
//! A small worker pool drains a shared queue of (station, item-type) pairs.
//! Each worker takes up to [`CALLS_PER_WORKER`] pairs at a time and fetches
//! them concurrently, so the market data source never sees more than
//! `workers * CALLS_PER_WORKER` requests in flight. Workers write disjoint
//! keys of a shared table, which is only read after every worker has joined.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use dashmap::DashMap;
use futures_util::future::join_all;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::snapshot::SnapshotProvider;
use crate::domain::{CompetitorListing, PairKey};

/// Default upper bound on concurrent workers.
pub const DEFAULT_MAX_WORKERS: usize = 8;

/// Underlying market data calls a single worker may have in flight.
pub const CALLS_PER_WORKER: usize = 2;

/// Competitor listings for every pair that could be fetched.
///
/// A pair that is absent could not be fetched at all; a pair with an empty
/// list was fetched and simply has no competitors.
#[derive(Debug, Clone, Default)]
pub struct CompetitorBook {
    listings: HashMap<PairKey, Vec<CompetitorListing>>,
}

impl CompetitorBook {
    #[must_use]
    pub fn new(listings: HashMap<PairKey, Vec<CompetitorListing>>) -> Self {
        Self { listings }
    }

    /// Listings for a pair, or `None` when the fetch failed.
    #[must_use]
    pub fn get(&self, pair: PairKey) -> Option<&[CompetitorListing]> {
        self.listings.get(&pair).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

type ResultTable = Arc<DashMap<PairKey, Vec<CompetitorListing>>>;

/// Bounded fan-out of snapshot fetches.
pub struct CompetitorScheduler {
    provider: Arc<SnapshotProvider>,
    max_workers: usize,
}

impl CompetitorScheduler {
    #[must_use]
    pub fn new(provider: Arc<SnapshotProvider>, max_workers: usize) -> Self {
        Self {
            provider,
            max_workers: max_workers.max(1),
        }
    }

    /// Fetch each distinct pair exactly once.
    pub async fn fetch_all(&self, pairs: &[PairKey]) -> CompetitorBook {
        let results: ResultTable = Arc::new(DashMap::new());

        let (structure_pairs, regular): (Vec<PairKey>, Vec<PairKey>) = pairs
            .iter()
            .copied()
            .partition(|pair| self.provider.is_structure(pair.station_id));

        if !structure_pairs.is_empty() {
            match self.provider.fetch_structure_book().await {
                Some(book) => {
                    for pair in structure_pairs {
                        results.insert(pair, book.listings_for(pair.type_id));
                    }
                }
                None => {
                    warn!(pairs = structure_pairs.len(), "Structure book unavailable, skipping undercut checks there");
                }
            }
        }

        let workers = regular.len().min(self.max_workers);
        let queue = Arc::new(Mutex::new(regular.into_iter().collect::<VecDeque<_>>()));

        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                tokio::spawn(run_worker(
                    worker,
                    Arc::clone(&queue),
                    Arc::clone(&self.provider),
                    Arc::clone(&results),
                ))
            })
            .collect();
        for joined in join_all(handles).await {
            if let Err(e) = joined {
                warn!(error = %e, "Competitor fetch worker aborted");
            }
        }

        let listings: HashMap<PairKey, Vec<CompetitorListing>> = match Arc::try_unwrap(results) {
            Ok(table) => table.into_iter().collect(),
            Err(shared) => shared
                .iter()
                .map(|entry| (*entry.key(), entry.value().clone()))
                .collect(),
        };

        info!(
            requested = pairs.len(),
            fetched = listings.len(),
            workers,
            "Competitor books fetched"
        );
        CompetitorBook::new(listings)
    }
}

async fn run_worker(
    worker: usize,
    queue: Arc<Mutex<VecDeque<PairKey>>>,
    provider: Arc<SnapshotProvider>,
    results: ResultTable,
) {
    loop {
        let batch: Vec<PairKey> = {
            let mut queue = queue.lock();
            (0..CALLS_PER_WORKER).map_while(|_| queue.pop_front()).collect()
        };
        if batch.is_empty() {
            break;
        }

        let fetches = batch.into_iter().map(|pair| {
            let provider = &provider;
            async move { (pair, provider.fetch(pair).await) }
        });

        for (pair, outcome) in join_all(fetches).await {
            match outcome {
                Ok(listings) => {
                    debug!(worker, pair = %pair, listings = listings.len(), "Fetched competitors");
                    results.insert(pair, listings);
                }
                Err(e) => {
                    warn!(worker, pair = %pair, error = %e, "Competitor fetch failed");
                }
            }
        }
    }
}
