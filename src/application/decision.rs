//! Repricing decision engine.
//!
//! Pure and synchronous: every input (own orders, competitor books, sales
//! volume and the current instant) is gathered before this runs, so two runs
//! over identical inputs produce identical decisions.
//!
//! # Single-order rule
//!
//! 1. The volume threshold is `max(ratio * volume_total, min_units)`.
//! 2. Walk competitor listings cheapest first, skipping prices the trader
//!    lists at themselves, and accumulate volume. The first price below the
//!    order's own price at which the accumulated volume reaches the threshold
//!    is the target.
//! 3. A target below the order's price suggests one tick under the target
//!    (`undercut`).
//! 4. Otherwise an order close to expiry is nudged one tick under its own
//!    price (`expiry`).
//!
//! # Grouping
//!
//! `perCharacter` and `global` group orders and only actively manage the
//! group's member with the least stock left. When the market turns over more
//! than that order's remaining units in a day, the next order is laddered
//! directly above it.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use super::collector::CollectedOrders;
use super::scheduler::CompetitorBook;
use crate::domain::{
    CharacterId, CompetitorListing, ExpiryInfo, GroupingMode, PairKey, Price, PriceGrid,
    ReasonTag, RepriceDecision, RepricePolicy, TraderOrder, Units,
};

/// What the single-order rule recommends for one order.
#[derive(Debug, Clone, PartialEq)]
struct Suggestion {
    competitor_price: Price,
    suggested_price: Price,
    reason: ReasonTag,
}

/// Result of running the single-order rule.
#[derive(Debug, Clone, PartialEq)]
struct Evaluation {
    suggestion: Option<Suggestion>,
    expiry: Option<ExpiryInfo>,
}

/// Grouping key for the grouped modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum GroupKey {
    Character(CharacterId, PairKey),
    Pair(PairKey),
}

/// Applies a [`RepricePolicy`] to the trader's orders.
pub struct DecisionEngine<'a> {
    policy: &'a RepricePolicy,
    grid: &'a dyn PriceGrid,
    now: DateTime<Utc>,
}

impl<'a> DecisionEngine<'a> {
    #[must_use]
    pub fn new(policy: &'a RepricePolicy, grid: &'a dyn PriceGrid, now: DateTime<Utc>) -> Self {
        Self { policy, grid, now }
    }

    /// Decide reprices for every collected order.
    ///
    /// `daily_sold` is only consulted by the grouped modes.
    #[must_use]
    pub fn decide(
        &self,
        orders: &CollectedOrders,
        book: &CompetitorBook,
        daily_sold: &HashMap<PairKey, Units>,
    ) -> Vec<RepriceDecision> {
        let decisions: Vec<RepriceDecision> = match self.policy.grouping_mode {
            GroupingMode::PerOrder => orders
                .iter()
                .flat_map(|(pair, group)| {
                    let own_prices = orders.own_prices(pair);
                    let listings = book.get(pair);
                    group.iter().filter_map(move |order| {
                        let evaluation = self.evaluate(order, listings, &own_prices);
                        evaluation.into_decision(order)
                    })
                })
                .collect(),
            GroupingMode::PerCharacter | GroupingMode::Global => {
                let mut groups: BTreeMap<GroupKey, Vec<&TraderOrder>> = BTreeMap::new();
                for (pair, group) in orders.iter() {
                    for order in group {
                        let key = if self.policy.grouping_mode == GroupingMode::Global {
                            GroupKey::Pair(pair)
                        } else {
                            GroupKey::Character(order.character_id, pair)
                        };
                        groups.entry(key).or_default().push(order);
                    }
                }

                groups
                    .into_values()
                    .flat_map(|group| self.decide_group(group, orders, book, daily_sold))
                    .collect()
            }
        };

        debug!(
            mode = %self.policy.grouping_mode,
            orders = orders.len(),
            decisions = decisions.len(),
            "Repricing decisions made"
        );
        decisions
    }

    fn decide_group(
        &self,
        mut group: Vec<&TraderOrder>,
        orders: &CollectedOrders,
        book: &CompetitorBook,
        daily_sold: &HashMap<PairKey, Units>,
    ) -> Vec<RepriceDecision> {
        group.sort_by_key(|o| (o.volume_remain, o.order_id));
        let Some(&first) = group.first() else {
            return Vec::new();
        };

        let pair = first.pair();
        let own_prices = orders.own_prices(pair);
        let listings = book.get(pair);
        let first_eval = self.evaluate(first, listings, &own_prices);

        let sells_through_first = daily_sold
            .get(&pair)
            .is_some_and(|sold| *sold > first.volume_remain);
        if let Some(&second) = group.get(1).filter(|_| sells_through_first) {
            let second_eval = self.evaluate(second, listings, &own_prices);
            if let Some(ladder) = self.ladder(first, &first_eval, second, &second_eval) {
                return ladder;
            }
        }

        first_eval.into_decision(first).into_iter().collect()
    }

    /// Price the first order strictly under the second and the second one
    /// tick above the first.
    fn ladder(
        &self,
        first: &TraderOrder,
        first_eval: &Evaluation,
        second: &TraderOrder,
        second_eval: &Evaluation,
    ) -> Option<Vec<RepriceDecision>> {
        let anchor = match (&second_eval.suggestion, &first_eval.suggestion) {
            (Some(s2), _) => s2.suggested_price,
            (None, Some(s1)) => self.grid.next_dearer(s1.suggested_price),
            (None, None) => return None,
        };

        let mut first_price = self.grid.next_cheaper(anchor);
        if let Some(s1) = &first_eval.suggestion {
            first_price = first_price.min(s1.suggested_price);
        }
        if first_price <= Decimal::ZERO {
            return None;
        }

        let first_competitor = first_eval
            .suggestion
            .as_ref()
            .or(second_eval.suggestion.as_ref())
            .map_or(anchor, |s| s.competitor_price);
        let second_competitor = second_eval
            .suggestion
            .as_ref()
            .or(first_eval.suggestion.as_ref())
            .map_or(anchor, |s| s.competitor_price);

        let mut first_reasons: Vec<ReasonTag> =
            first_eval.suggestion.iter().map(|s| s.reason).collect();
        first_reasons.push(ReasonTag::Ladder);

        Some(vec![
            build_decision(
                first,
                first_competitor,
                first_price,
                first_eval.expiry,
                first_reasons,
            ),
            build_decision(
                second,
                second_competitor,
                anchor,
                second_eval.expiry,
                vec![ReasonTag::Ladder],
            ),
        ])
    }

    /// The single-order rule.
    fn evaluate(
        &self,
        order: &TraderOrder,
        listings: Option<&[CompetitorListing]>,
        own_prices: &[Price],
    ) -> Evaluation {
        let expiry = self.expiry_info(order);

        let mut suggestion = listings
            .and_then(|listings| self.target_competitor_price(order, listings, own_prices))
            .filter(|target| order.price > *target)
            .and_then(|target| {
                let price = self.grid.next_cheaper(target);
                (price > Decimal::ZERO).then_some(Suggestion {
                    competitor_price: target,
                    suggested_price: price,
                    reason: ReasonTag::Undercut,
                })
            });

        if suggestion.is_none() && expiry.is_some_and(|e| e.is_expiring_soon) {
            let price = self.grid.next_cheaper(order.price);
            if price > Decimal::ZERO {
                suggestion = Some(Suggestion {
                    competitor_price: order.price,
                    suggested_price: price,
                    reason: ReasonTag::Expiry,
                });
            }
        }

        Evaluation { suggestion, expiry }
    }

    /// First competitor price under the order's that has enough volume at or
    /// below it. Stops at the first qualifying price rather than searching
    /// for a cheaper one.
    fn target_competitor_price(
        &self,
        order: &TraderOrder,
        listings: &[CompetitorListing],
        own_prices: &[Price],
    ) -> Option<Price> {
        let threshold = self.policy.volume_threshold(order.volume_total);
        let mut accumulated = Decimal::ZERO;

        for listing in listings {
            if own_prices.contains(&listing.price) {
                continue;
            }
            if listing.price >= order.price {
                break;
            }
            accumulated += Decimal::from(listing.volume);
            if accumulated >= threshold {
                return Some(listing.price);
            }
        }
        None
    }

    fn expiry_info(&self, order: &TraderOrder) -> Option<ExpiryInfo> {
        let expires_at = order.expires_at()?;
        let remaining = expires_at - self.now;
        let hours_remaining =
            (Decimal::from(remaining.num_minutes()) / Decimal::from(60)).round_dp(2);
        let window = chrono::Duration::days(i64::from(self.policy.expiry_refresh_days));

        Some(ExpiryInfo {
            expires_at,
            hours_remaining,
            is_expiring_soon: remaining <= window,
        })
    }
}

impl Evaluation {
    fn into_decision(self, order: &TraderOrder) -> Option<RepriceDecision> {
        let suggestion = self.suggestion?;
        Some(build_decision(
            order,
            suggestion.competitor_price,
            suggestion.suggested_price,
            self.expiry,
            vec![suggestion.reason],
        ))
    }
}

fn build_decision(
    order: &TraderOrder,
    competitor_price: Price,
    suggested_price: Price,
    expiry: Option<ExpiryInfo>,
    reasons: Vec<ReasonTag>,
) -> RepriceDecision {
    RepriceDecision {
        order_id: order.order_id,
        character_id: order.character_id,
        station_id: order.station_id,
        type_id: order.type_id,
        item_name: String::new(),
        volume_remain: order.volume_remain,
        current_price: order.price,
        competitor_price,
        suggested_price,
        expiry,
        reasons,
        profitability: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tick::next_cheaper_tick;
    use crate::domain::{SignificantDigitGrid, StationId, TypeId};
    use crate::testkit::domain::{listing, order, ts};
    use rust_decimal_macros::dec;

    const JITA: StationId = StationId::new(60_003_760);
    const TYPE: TypeId = TypeId::new(34);

    fn pair() -> PairKey {
        PairKey::new(JITA, TYPE)
    }

    fn now() -> DateTime<Utc> {
        ts("2024-06-01T00:00:00Z")
    }

    fn run(
        policy: RepricePolicy,
        orders: Vec<TraderOrder>,
        listings: Option<Vec<CompetitorListing>>,
        daily_sold: Option<Units>,
    ) -> Vec<RepriceDecision> {
        let orders = CollectedOrders::from_orders(orders);
        let book = CompetitorBook::new(listings.into_iter().map(|l| (pair(), l)).collect());
        let sold: HashMap<PairKey, Units> = daily_sold.into_iter().map(|s| (pair(), s)).collect();
        DecisionEngine::new(&policy, &SignificantDigitGrid, now()).decide(&orders, &book, &sold)
    }

    fn per_order() -> RepricePolicy {
        RepricePolicy {
            grouping_mode: GroupingMode::PerOrder,
            ..Default::default()
        }
    }

    fn global() -> RepricePolicy {
        RepricePolicy {
            grouping_mode: GroupingMode::Global,
            ..Default::default()
        }
    }

    #[test]
    fn expiring_order_without_competitors_gets_refresh_nudge() {
        let a = order(1)
            .at(JITA)
            .type_id(34)
            .price(dec!(110))
            .remaining(10, 10)
            .issued(now() - chrono::Duration::days(89), 90)
            .build();

        let decisions = run(per_order(), vec![a], Some(vec![]), None);

        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].reasons, vec![ReasonTag::Expiry]);
        assert_eq!(decisions[0].suggested_price, next_cheaper_tick(dec!(110)));
        assert_eq!(decisions[0].competitor_price, dec!(110));
        let expiry = decisions[0].expiry.unwrap();
        assert!(expiry.is_expiring_soon);
        assert_eq!(expiry.hours_remaining, dec!(24));
    }

    #[test]
    fn undercut_requires_threshold_volume() {
        // Threshold is max(0.15 * 100, 1) = 15 units.
        let o = order(1).at(JITA).type_id(34).price(dec!(110)).remaining(100, 100).build();

        let thin = run(per_order(), vec![o.clone()], Some(vec![listing(dec!(100), 14)]), None);
        assert!(thin.is_empty());

        let deep = run(
            per_order(),
            vec![o],
            Some(vec![listing(dec!(100), 14), listing(dec!(105), 1)]),
            None,
        );
        assert_eq!(deep.len(), 1);
        assert_eq!(deep[0].competitor_price, dec!(105));
        assert_eq!(deep[0].suggested_price, dec!(104.9));
        assert_eq!(deep[0].reasons, vec![ReasonTag::Undercut]);
    }

    #[test]
    fn stops_at_first_sufficient_price() {
        let o = order(1).at(JITA).type_id(34).price(dec!(110)).remaining(1, 1).build();
        let decisions = run(
            per_order(),
            vec![o],
            Some(vec![listing(dec!(90), 5), listing(dec!(95), 5)]),
            None,
        );
        assert_eq!(decisions[0].competitor_price, dec!(90));
    }

    #[test]
    fn own_prices_are_never_targets() {
        let mine = order(1).at(JITA).type_id(34).price(dec!(110)).remaining(1, 1).build();
        let alt = order(2).at(JITA).type_id(34).price(dec!(100)).remaining(1, 1).character(2).build();

        // The 100 listing is the trader's own alt; only 104 counts.
        let decisions = run(
            per_order(),
            vec![mine, alt],
            Some(vec![listing(dec!(100), 50), listing(dec!(104), 1)]),
            None,
        );

        let mine = decisions.iter().find(|d| d.order_id.get() == 1).unwrap();
        assert_eq!(mine.competitor_price, dec!(104));
        assert!(decisions.iter().all(|d| d.competitor_price != dec!(100)));
    }

    #[test]
    fn competitors_above_price_are_ignored() {
        let o = order(1).at(JITA).type_id(34).price(dec!(100)).remaining(1, 1).build();
        let decisions = run(
            per_order(),
            vec![o],
            Some(vec![listing(dec!(100), 50), listing(dec!(120), 50)]),
            None,
        );
        assert!(decisions.is_empty());
    }

    #[test]
    fn missing_book_still_evaluates_expiry() {
        let fresh = order(1).at(JITA).type_id(34).price(dec!(50)).build();
        let stale = order(2)
            .at(JITA)
            .type_id(34)
            .price(dec!(50))
            .issued(now() - chrono::Duration::days(30), 30)
            .build();

        let decisions = run(per_order(), vec![fresh, stale], None, None);

        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].order_id.get(), 2);
        assert_eq!(decisions[0].reasons, vec![ReasonTag::Expiry]);
    }

    #[test]
    fn global_mode_ladders_when_market_sells_through_first_order() {
        let x = order(1).at(JITA).type_id(34).price(dec!(110)).remaining(5, 100).build();
        let y = order(2).at(JITA).type_id(34).price(dec!(111)).remaining(100, 100).character(2).build();

        let decisions = run(global(), vec![x, y], Some(vec![listing(dec!(100), 50)]), Some(10));

        assert_eq!(decisions.len(), 2);
        let one_below = next_cheaper_tick(dec!(100));
        let two_below = next_cheaper_tick(one_below);

        assert_eq!(decisions[0].order_id.get(), 1);
        assert_eq!(decisions[0].reasons, vec![ReasonTag::Undercut, ReasonTag::Ladder]);
        assert_eq!(decisions[0].suggested_price, two_below);

        assert_eq!(decisions[1].order_id.get(), 2);
        assert_eq!(decisions[1].reasons, vec![ReasonTag::Ladder]);
        assert_eq!(decisions[1].suggested_price, one_below);
    }

    #[test]
    fn no_ladder_when_first_order_outlasts_daily_volume() {
        let x = order(1).at(JITA).type_id(34).price(dec!(110)).remaining(20, 100).build();
        let y = order(2).at(JITA).type_id(34).price(dec!(111)).remaining(100, 100).build();

        let decisions = run(global(), vec![x, y], Some(vec![listing(dec!(100), 50)]), Some(10));

        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].order_id.get(), 1);
        assert_eq!(decisions[0].reasons, vec![ReasonTag::Undercut]);
        assert_eq!(decisions[0].suggested_price, next_cheaper_tick(dec!(100)));
    }

    #[test]
    fn no_ladder_without_sales_history() {
        let x = order(1).at(JITA).type_id(34).price(dec!(110)).remaining(5, 100).build();
        let y = order(2).at(JITA).type_id(34).price(dec!(111)).remaining(100, 100).build();

        let decisions = run(global(), vec![x, y], Some(vec![listing(dec!(100), 50)]), None);
        assert_eq!(decisions.len(), 1);
    }

    #[test]
    fn grouped_mode_with_nothing_to_do_yields_nothing() {
        let x = order(1).at(JITA).type_id(34).price(dec!(90)).remaining(5, 100).build();
        let y = order(2).at(JITA).type_id(34).price(dec!(95)).remaining(100, 100).build();

        let decisions = run(global(), vec![x, y], Some(vec![listing(dec!(100), 50)]), Some(1_000));
        assert!(decisions.is_empty());
    }

    #[test]
    fn per_character_mode_groups_characters_separately() {
        let a = order(1).at(JITA).type_id(34).price(dec!(110)).remaining(5, 100).character(1).build();
        let b = order(2).at(JITA).type_id(34).price(dec!(111)).remaining(100, 100).character(2).build();
        let policy = RepricePolicy {
            grouping_mode: GroupingMode::PerCharacter,
            ..Default::default()
        };

        // Each character's group has a single order, so there is nobody to
        // ladder with even though the market sells through order 1.
        let decisions = run(policy, vec![a, b], Some(vec![listing(dec!(100), 50)]), Some(10));

        assert_eq!(decisions.len(), 2);
        assert!(decisions.iter().all(|d| d.reasons == vec![ReasonTag::Undercut]));
    }

    #[test]
    fn per_character_mode_ladders_within_one_character() {
        let a = order(1).at(JITA).type_id(34).price(dec!(110)).remaining(5, 100).character(1).build();
        let b = order(2).at(JITA).type_id(34).price(dec!(111)).remaining(100, 100).character(1).build();
        let c = order(3).at(JITA).type_id(34).price(dec!(112)).remaining(100, 100).character(2).build();
        let policy = RepricePolicy {
            grouping_mode: GroupingMode::PerCharacter,
            ..Default::default()
        };

        let decisions = run(policy, vec![a, b, c], Some(vec![listing(dec!(100), 50)]), Some(10));
        let by_id = |id: i64| decisions.iter().find(|d| d.order_id.get() == id).unwrap();

        assert_eq!(decisions.len(), 3);
        assert_eq!(by_id(1).reasons, vec![ReasonTag::Undercut, ReasonTag::Ladder]);
        assert_eq!(by_id(1).suggested_price, dec!(99.89));
        assert_eq!(by_id(2).reasons, vec![ReasonTag::Ladder]);
        assert_eq!(by_id(2).suggested_price, dec!(99.9));
        assert_eq!(by_id(3).reasons, vec![ReasonTag::Undercut]);
        assert_eq!(by_id(3).suggested_price, dec!(99.9));
    }

    #[test]
    fn ladder_with_only_first_order_warranted_places_second_one_tick_above() {
        // Competitor at 100 only undercuts order 1; order 2 already sits below it.
        let x = order(1).at(JITA).type_id(34).price(dec!(110)).remaining(5, 100).build();
        let y = order(2).at(JITA).type_id(34).price(dec!(99)).remaining(100, 100).build();

        let decisions = run(global(), vec![x, y], Some(vec![listing(dec!(100), 50)]), Some(10));

        assert_eq!(decisions.len(), 2);
        assert_eq!(decisions[0].suggested_price, dec!(99.9));
        assert_eq!(decisions[1].suggested_price, dec!(99.91));
        assert!(decisions[0].suggested_price < decisions[1].suggested_price);
    }

    #[test]
    fn identical_inputs_give_identical_decisions() {
        let orders = vec![
            order(1).at(JITA).type_id(34).price(dec!(110)).remaining(5, 100).build(),
            order(2).at(JITA).type_id(34).price(dec!(111)).remaining(100, 100).build(),
        ];
        let book = Some(vec![listing(dec!(100), 50), listing(dec!(101), 10)]);

        let first = run(global(), orders.clone(), book.clone(), Some(10));
        let second = run(global(), orders, book, Some(10));
        assert_eq!(first, second);
    }
}
