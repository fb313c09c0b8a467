//! Handler for the `run` command.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::adapter::inbound::cli::command::RunArgs;
use crate::adapter::inbound::cli::{output, report};
use crate::adapter::outbound::esi::EsiClient;
use crate::adapter::outbound::fixture::MarketFixture;
use crate::application::{EnginePorts, RepriceEngine, RepriceRequest};
use crate::domain::{CharacterId, CycleId, StationId};
use crate::error::Result;
use crate::infrastructure::config::Config;

/// Execute the run command.
pub async fn execute(config: &Config, args: &RunArgs) -> Result<()> {
    let fixture = Arc::new(MarketFixture::from_path(&args.fixture)?);

    let mut ports = EnginePorts::shared(Arc::clone(&fixture));
    if args.live_market {
        info!(base_url = %config.esi.base_url, "Using live ESI market data");
        ports = ports.with_market(Arc::new(EsiClient::from_config(&config.esi)?));
    }

    let mut settings = config.engine_settings();
    if settings.seller_characters.is_empty() {
        settings.seller_characters = fixture.character_ids();
    }
    if settings.tracked_stations.is_empty() {
        settings.tracked_stations = fixture.station_ids();
        if let Some(venue) = &settings.structure {
            settings.tracked_stations.push(venue.id);
        }
    }

    let request = build_request(config, args)?;
    let now = args.now.unwrap_or_else(Utc::now);
    let report = RepriceEngine::new(ports, settings)
        .run(&request, now)
        .await?;

    if output::is_json() {
        output::json_output(serde_json::to_value(&report)?);
    } else {
        report::print(&report, &request, now);
    }
    Ok(())
}

/// Merge command-line overrides into the configured policy.
#[allow(clippy::result_large_err)]
pub fn build_request(config: &Config, args: &RunArgs) -> Result<RepriceRequest> {
    let mut policy = config.policy()?;
    if let Some(mode) = &args.mode {
        policy.grouping_mode = mode.parse()?;
    }
    if let Some(ratio) = args.ratio {
        policy.min_undercut_volume_ratio = ratio;
    }
    if let Some(units) = args.min_units {
        policy.min_undercut_units = units;
    }
    if let Some(days) = args.expiry_days {
        policy.expiry_refresh_days = days;
    }
    policy.validate()?;

    Ok(RepriceRequest {
        character_ids: args.characters.iter().copied().map(CharacterId::new).collect(),
        station_ids: args.stations.iter().copied().map(StationId::new).collect(),
        cycle_id: args.cycle.as_deref().map(CycleId::new),
        policy,
    })
}
