//! Own-order collection.
//!
//! Fans out one order-listing call per character, waits for all of them to
//! settle, then filters what came back down to the run's scope. A failing
//! character contributes no orders; it never aborts the run.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{debug, info, warn};

use crate::domain::{CharacterId, CycleId, PairKey, Price, StationId, TraderOrder};
use crate::port::{CostLedger, OrderSource};

/// What to collect for one run. Empty lists have already been replaced by
/// the configured rosters.
#[derive(Debug, Clone, Default)]
pub struct CollectScope {
    pub characters: Vec<CharacterId>,
    pub stations: Vec<StationId>,
    pub cycle: Option<CycleId>,
}

/// The trader's in-scope sell orders, partitioned by (station, item-type).
#[derive(Debug, Clone, Default)]
pub struct CollectedOrders {
    by_pair: BTreeMap<PairKey, Vec<TraderOrder>>,
}

impl CollectedOrders {
    /// Partition a flat list of orders by pair.
    #[must_use]
    pub fn from_orders(orders: impl IntoIterator<Item = TraderOrder>) -> Self {
        let mut by_pair: BTreeMap<PairKey, Vec<TraderOrder>> = BTreeMap::new();
        for order in orders {
            by_pair.entry(order.pair()).or_default().push(order);
        }
        for orders in by_pair.values_mut() {
            orders.sort_by_key(|o| o.order_id);
        }
        Self { by_pair }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_pair.is_empty()
    }

    /// Total number of orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_pair.values().map(Vec::len).sum()
    }

    /// Distinct pairs, ascending.
    #[must_use]
    pub fn pairs(&self) -> Vec<PairKey> {
        self.by_pair.keys().copied().collect()
    }

    /// Distinct stations, ascending.
    #[must_use]
    pub fn stations(&self) -> Vec<StationId> {
        self.by_pair
            .keys()
            .map(|pair| pair.station_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Orders at one pair, ordered by order id.
    #[must_use]
    pub fn orders_at(&self, pair: PairKey) -> &[TraderOrder] {
        self.by_pair.get(&pair).map_or(&[], Vec::as_slice)
    }

    /// Every (pair, orders) partition in pair order.
    pub fn iter(&self) -> impl Iterator<Item = (PairKey, &[TraderOrder])> {
        self.by_pair.iter().map(|(pair, orders)| (*pair, orders.as_slice()))
    }

    /// The trader's own listed prices at a pair, across all characters.
    #[must_use]
    pub fn own_prices(&self, pair: PairKey) -> Vec<Price> {
        let mut prices: Vec<Price> = self.orders_at(pair).iter().map(|o| o.price).collect();
        prices.sort();
        prices.dedup();
        prices
    }
}

/// Gathers the trader's active sell orders.
pub struct OrderCollector {
    orders: Arc<dyn OrderSource>,
    ledger: Arc<dyn CostLedger>,
}

impl OrderCollector {
    #[must_use]
    pub fn new(orders: Arc<dyn OrderSource>, ledger: Arc<dyn CostLedger>) -> Self {
        Self { orders, ledger }
    }

    /// Collect in-scope sell orders.
    pub async fn collect(&self, scope: &CollectScope) -> CollectedOrders {
        let fetches = scope.characters.iter().map(|&character| {
            let source = Arc::clone(&self.orders);
            async move { (character, source.list_active_sell_orders(character).await) }
        });
        let settled = join_all(fetches).await;

        let stations: HashSet<StationId> = scope.stations.iter().copied().collect();
        let mut kept = Vec::new();
        for (character, outcome) in settled {
            let orders = match outcome {
                Ok(orders) => orders,
                Err(e) => {
                    warn!(character_id = %character, error = %e, "Failed to list orders, skipping character");
                    continue;
                }
            };
            let listed = orders.len();
            kept.extend(
                orders
                    .into_iter()
                    .filter(|o| !o.is_buy_order)
                    .filter(|o| stations.contains(&o.station_id))
                    .filter(|o| match o.validate() {
                        Ok(()) => true,
                        Err(e) => {
                            warn!(error = %e, "Dropping malformed order");
                            false
                        }
                    }),
            );
            debug!(character_id = %character, listed, "Listed character orders");
        }

        if let Some(cycle) = &scope.cycle {
            let committed = match self.ledger.committed_pairs(cycle).await {
                Ok(pairs) => pairs,
                Err(e) => {
                    warn!(cycle_id = %cycle, error = %e, "Failed to load cycle line items, no orders in scope");
                    HashSet::new()
                }
            };
            kept.retain(|o| committed.contains(&o.pair()));
        }

        let collected = CollectedOrders::from_orders(kept);
        info!(
            orders = collected.len(),
            pairs = collected.by_pair.len(),
            "Collected own sell orders"
        );
        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::domain::{order, OrderBuilder};
    use crate::testkit::fixture::FixtureBuilder;
    use rust_decimal_macros::dec;

    const JITA: StationId = StationId::new(60_003_760);
    const AMARR: StationId = StationId::new(60_008_494);

    fn collector(fixture: FixtureBuilder) -> OrderCollector {
        let fixture = Arc::new(fixture.build());
        OrderCollector::new(fixture.clone(), fixture)
    }

    fn scope(characters: &[i64], stations: &[StationId]) -> CollectScope {
        CollectScope {
            characters: characters.iter().map(|c| CharacterId::new(*c)).collect(),
            stations: stations.to_vec(),
            cycle: None,
        }
    }

    #[tokio::test]
    async fn discards_buy_orders_and_out_of_scope_stations() {
        let fixture = FixtureBuilder::new()
            .character(1, "Seller", vec![
                order(10).at(JITA).build(),
                order(11).at(AMARR).build(),
                OrderBuilder::new(12).at(JITA).buy().build(),
            ]);

        let collected = collector(fixture).collect(&scope(&[1], &[JITA])).await;

        assert_eq!(collected.len(), 1);
        assert_eq!(collected.stations(), vec![JITA]);
    }

    #[tokio::test]
    async fn failing_character_does_not_abort_siblings() {
        let fixture = FixtureBuilder::new()
            .character(1, "Broken", vec![order(10).at(JITA).build()])
            .character(2, "Healthy", vec![order(20).at(JITA).build()])
            .failing_character(1);

        let collected = collector(fixture).collect(&scope(&[1, 2], &[JITA])).await;

        assert_eq!(collected.len(), 1);
        let pair = collected.pairs()[0];
        assert_eq!(collected.orders_at(pair)[0].order_id.get(), 20);
    }

    #[tokio::test]
    async fn cycle_scope_keeps_only_committed_pairs() {
        let kept = order(10).at(JITA).type_id(34).build();
        let dropped = order(11).at(JITA).type_id(35).build();
        let fixture = FixtureBuilder::new()
            .character(1, "Seller", vec![kept, dropped])
            .cycle("c-1", vec![PairKey::new(JITA, crate::domain::TypeId::new(34))]);

        let mut scope = scope(&[1], &[JITA]);
        scope.cycle = Some(CycleId::new("c-1"));
        let collected = collector(fixture).collect(&scope).await;

        assert_eq!(collected.len(), 1);
        assert_eq!(collected.pairs()[0].type_id.get(), 34);
    }

    #[tokio::test]
    async fn malformed_orders_are_dropped() {
        let fixture = FixtureBuilder::new().character(1, "Seller", vec![
            order(10).at(JITA).remaining(5, 4).build(),
            order(11).at(JITA).price(dec!(0)).build(),
        ]);

        let collected = collector(fixture).collect(&scope(&[1], &[JITA])).await;
        assert!(collected.is_empty());
    }

    #[test]
    fn own_prices_are_deduplicated() {
        let collected = CollectedOrders::from_orders(vec![
            order(1).at(JITA).price(dec!(10)).build(),
            order(2).at(JITA).price(dec!(10)).build(),
            order(3).at(JITA).price(dec!(12)).build(),
        ]);
        let pair = collected.pairs()[0];
        assert_eq!(collected.own_prices(pair), vec![dec!(10), dec!(12)]);
    }
}
