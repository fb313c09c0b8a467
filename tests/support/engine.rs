//! Engine wiring shared by integration tests.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use relister::adapter::outbound::fixture::MarketFixture;
use relister::application::{EnginePorts, EngineSettings, RepriceEngine, RepriceRequest};
use relister::domain::{
    CharacterId, GroupingMode, RegionId, ReportGroup, RepriceDecision, RepricePolicy, StationId,
};
use relister::testkit::domain::ts;
use relister::testkit::market::CountingMarket;

pub const FORGE: RegionId = RegionId::new(10_000_002);
pub const AMARR: StationId = StationId::new(60_008_494);
pub const DOMAIN: RegionId = RegionId::new(10_000_043);

/// The instant every scenario is evaluated at.
pub fn now() -> DateTime<Utc> {
    ts("2024-06-01T00:00:00Z")
}

pub fn settings(characters: &[i64], stations: &[StationId]) -> EngineSettings {
    EngineSettings {
        seller_characters: characters.iter().copied().map(CharacterId::new).collect(),
        tracked_stations: stations.to_vec(),
        ..Default::default()
    }
}

pub fn request(mode: GroupingMode) -> RepriceRequest {
    RepriceRequest {
        policy: RepricePolicy {
            grouping_mode: mode,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// An engine whose market data goes through a [`CountingMarket`].
pub fn counted_engine(
    fixture: MarketFixture,
    settings: EngineSettings,
    delay: Duration,
) -> (RepriceEngine, Arc<CountingMarket>) {
    let fixture = Arc::new(fixture);
    let market = Arc::new(CountingMarket::new(fixture.clone()).with_delay(delay));
    let ports = EnginePorts::shared(fixture).with_market(market.clone());
    (RepriceEngine::new(ports, settings), market)
}

pub fn engine(fixture: MarketFixture, settings: EngineSettings) -> RepriceEngine {
    RepriceEngine::new(EnginePorts::shared(Arc::new(fixture)), settings)
}

/// Every decision in the report, in report order.
pub fn decisions(report: &[ReportGroup]) -> Vec<&RepriceDecision> {
    report.iter().flat_map(|g| g.decisions.iter()).collect()
}
