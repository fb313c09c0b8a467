//! Report assembly.

use std::collections::{BTreeMap, HashMap};

use crate::domain::{CharacterId, RepriceDecision, ReportGroup, StationId, TypeId};

/// Display names resolved for one report.
#[derive(Debug, Clone, Default)]
pub struct ReportNames {
    pub characters: HashMap<CharacterId, String>,
    pub stations: HashMap<StationId, String>,
    pub types: HashMap<TypeId, String>,
}

impl ReportNames {
    #[must_use]
    pub fn character(&self, id: CharacterId) -> String {
        self.characters
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("Character {id}"))
    }

    #[must_use]
    pub fn station(&self, id: StationId) -> String {
        self.stations
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("Station {id}"))
    }

    #[must_use]
    pub fn item(&self, id: TypeId) -> String {
        self.types
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("Type {id}"))
    }
}

/// Group decisions by (character, station) and sort them for display.
#[must_use]
pub fn assemble(decisions: Vec<RepriceDecision>, names: &ReportNames) -> Vec<ReportGroup> {
    let mut groups: BTreeMap<(CharacterId, StationId), Vec<RepriceDecision>> = BTreeMap::new();
    for decision in decisions {
        let name = names.item(decision.type_id);
        groups
            .entry((decision.character_id, decision.station_id))
            .or_default()
            .push(decision.with_item_name(name));
    }

    groups
        .into_iter()
        .map(|((character_id, station_id), mut decisions)| {
            decisions.sort_by(|a, b| {
                a.item_name
                    .cmp(&b.item_name)
                    .then(a.order_id.cmp(&b.order_id))
            });
            ReportGroup {
                character_id,
                character_name: names.character(character_id),
                station_id,
                station_name: names.station(station_id),
                decisions,
            }
        })
        .collect()
}
