//! Station and structure venue metadata.

use serde::{Deserialize, Serialize};

use super::id::{CharacterId, RegionId, StationId};

/// Mapping from a station to its trade region and display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StationRegion {
    pub station_id: StationId,
    pub name: String,
    pub region_id: RegionId,
}

/// The trader's private structure market.
///
/// It has no region; its order book is fetched directly with the credentials
/// of `auth_character`, or read from the last persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureVenue {
    pub id: StationId,
    pub name: String,
    #[serde(default)]
    pub auth_character: Option<CharacterId>,
}
