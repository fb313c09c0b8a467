//! Final report shape.

use serde::Serialize;

use super::decision::RepriceDecision;
use super::id::{CharacterId, StationId};

/// All decisions for one character at one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportGroup {
    pub character_id: CharacterId,
    pub character_name: String,
    pub station_id: StationId,
    pub station_name: String,
    pub decisions: Vec<RepriceDecision>,
}
