//! Repricing engine entry point.
//!
//! One run reads the trader's orders and the market, decides, and returns a
//! report. Nothing is written anywhere.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::collector::{CollectScope, OrderCollector};
use super::decision::DecisionEngine;
use super::profit::ProfitEstimator;
use super::report::{assemble, ReportNames};
use super::scheduler::{CompetitorScheduler, DEFAULT_MAX_WORKERS};
use super::snapshot::SnapshotProvider;
use crate::domain::{
    CharacterId, CycleId, FeeSchedule, PairKey, PriceGrid, ReportGroup, RepriceDecision,
    RepricePolicy, SignificantDigitGrid, StationId, StructureVenue, TypeId, Units,
};
use crate::error::Result;
use crate::port::{
    CostLedger, MarketDataSource, NameResolver, OrderSource, SalesHistory, StructureSnapshotStore,
};

/// Every collaborator the engine talks to.
#[derive(Clone)]
pub struct EnginePorts {
    pub orders: Arc<dyn OrderSource>,
    pub market: Arc<dyn MarketDataSource>,
    pub snapshots: Arc<dyn StructureSnapshotStore>,
    pub history: Arc<dyn SalesHistory>,
    pub ledger: Arc<dyn CostLedger>,
    pub names: Arc<dyn NameResolver>,
    pub grid: Arc<dyn PriceGrid>,
}

impl EnginePorts {
    /// Use one object for every collaborator, with the in-game price grid.
    pub fn shared<T>(source: Arc<T>) -> Self
    where
        T: OrderSource
            + MarketDataSource
            + StructureSnapshotStore
            + SalesHistory
            + CostLedger
            + NameResolver
            + 'static,
    {
        Self {
            orders: source.clone(),
            market: source.clone(),
            snapshots: source.clone(),
            history: source.clone(),
            ledger: source.clone(),
            names: source,
            grid: Arc::new(SignificantDigitGrid),
        }
    }

    /// Replace the live market data source.
    #[must_use]
    pub fn with_market(mut self, market: Arc<dyn MarketDataSource>) -> Self {
        self.market = market;
        self
    }
}

/// Deployment settings that stay fixed across runs.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Used when a request names no characters.
    pub seller_characters: Vec<CharacterId>,
    /// Used when a request names no stations.
    pub tracked_stations: Vec<StationId>,
    pub structure: Option<StructureVenue>,
    pub fees: FeeSchedule,
    pub max_workers: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            seller_characters: Vec::new(),
            tracked_stations: Vec::new(),
            structure: None,
            fees: FeeSchedule::default(),
            max_workers: DEFAULT_MAX_WORKERS,
        }
    }
}

/// Parameters of one run.
#[derive(Debug, Clone, Default)]
pub struct RepriceRequest {
    pub character_ids: Vec<CharacterId>,
    pub station_ids: Vec<StationId>,
    pub cycle_id: Option<CycleId>,
    pub policy: RepricePolicy,
}

/// Sell-order repricing engine.
pub struct RepriceEngine {
    ports: EnginePorts,
    settings: EngineSettings,
}

impl RepriceEngine {
    #[must_use]
    pub fn new(ports: EnginePorts, settings: EngineSettings) -> Self {
        Self { ports, settings }
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Produce a repricing report as of `now`.
    ///
    /// Only an invalid policy fails the run; collaborator failures degrade
    /// the report instead.
    pub async fn run(
        &self,
        request: &RepriceRequest,
        now: DateTime<Utc>,
    ) -> Result<Vec<ReportGroup>> {
        request.policy.validate()?;

        let scope = self.scope(request);
        let collected = OrderCollector::new(self.ports.orders.clone(), self.ports.ledger.clone())
            .collect(&scope)
            .await;
        if collected.is_empty() {
            info!("No sell orders in scope");
            return Ok(Vec::new());
        }

        let provider = Arc::new(
            SnapshotProvider::prepare(
                self.ports.market.clone(),
                self.ports.snapshots.clone(),
                self.settings.structure.clone(),
                &collected.stations(),
            )
            .await,
        );
        let pairs = collected.pairs();
        let book = CompetitorScheduler::new(provider.clone(), self.settings.max_workers)
            .fetch_all(&pairs)
            .await;

        let daily_sold = if request.policy.grouping_mode.is_grouped() {
            self.daily_sold(&pairs).await
        } else {
            HashMap::new()
        };

        let decisions = DecisionEngine::new(&request.policy, self.ports.grid.as_ref(), now)
            .decide(&collected, &book, &daily_sold);
        if decisions.is_empty() {
            info!(orders = collected.len(), "No repricing needed");
            return Ok(Vec::new());
        }

        let decisions = ProfitEstimator::new(self.ports.ledger.clone(), self.settings.fees)
            .annotate(decisions, scope.cycle.as_ref())
            .await;

        let names = self.resolve_names(&decisions, provider.station_names()).await;
        let report = assemble(decisions, &names);

        info!(
            orders = collected.len(),
            groups = report.len(),
            decisions = report.iter().map(|g| g.decisions.len()).sum::<usize>(),
            "Repricing report ready"
        );
        Ok(report)
    }

    fn scope(&self, request: &RepriceRequest) -> CollectScope {
        let characters = if request.character_ids.is_empty() {
            self.settings.seller_characters.clone()
        } else {
            request.character_ids.clone()
        };
        let stations = if request.station_ids.is_empty() {
            self.settings.tracked_stations.clone()
        } else {
            request.station_ids.clone()
        };

        CollectScope {
            characters,
            stations,
            cycle: request.cycle_id.clone(),
        }
    }

    async fn daily_sold(&self, pairs: &[PairKey]) -> HashMap<PairKey, Units> {
        match self.ports.history.latest_daily_sold_units(pairs).await {
            Ok(sold) => sold,
            Err(e) => {
                warn!(pairs = pairs.len(), error = %e, "Sales history unavailable, laddering disabled");
                HashMap::new()
            }
        }
    }

    async fn resolve_names(
        &self,
        decisions: &[RepriceDecision],
        known_stations: HashMap<StationId, String>,
    ) -> ReportNames {
        let types: Vec<TypeId> = distinct(decisions.iter().map(|d| d.type_id));
        let characters: Vec<CharacterId> = distinct(decisions.iter().map(|d| d.character_id));
        let stations: Vec<StationId> = distinct(decisions.iter().map(|d| d.station_id));

        let names = &self.ports.names;
        let (types, characters, stations) = tokio::join!(
            names.item_type_names(&types),
            names.character_names(&characters),
            names.station_names(&stations),
        );

        let mut stations = settle("station", stations);
        for (id, name) in known_stations {
            stations.entry(id).or_insert(name);
        }

        ReportNames {
            characters: settle("character", characters),
            stations,
            types: settle("item type", types),
        }
    }
}

fn distinct<T: Ord>(ids: impl Iterator<Item = T>) -> Vec<T> {
    ids.collect::<BTreeSet<_>>().into_iter().collect()
}

fn settle<K, V>(kind: &str, outcome: Result<HashMap<K, V>>) -> HashMap<K, V> {
    outcome.unwrap_or_else(|e| {
        warn!(kind, error = %e, "Name lookup failed, using fallback names");
        HashMap::new()
    })
}
