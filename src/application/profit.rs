//! Profitability estimation for suggested prices.

use std::sync::Arc;

use futures_util::future::join_all;
use rust_decimal::Decimal;
use tracing::warn;

use crate::domain::{CycleId, FeeSchedule, Price, Profitability, RepriceDecision, Units};
use crate::port::CostLedger;

/// Project the outcome of selling `remaining` units at `price`.
///
/// Returns `None` when no positive unit cost is known.
#[must_use]
pub fn project(
    unit_cost: Option<Price>,
    price: Price,
    remaining: Units,
    fees: &FeeSchedule,
) -> Option<Profitability> {
    let unit_cost = unit_cost.filter(|c| *c > Decimal::ZERO)?;
    let net_unit_price = fees.net_unit_price(price);
    let profit_per_unit = net_unit_price - unit_cost;

    Some(Profitability {
        unit_cost,
        net_unit_price: net_unit_price.round_dp(2),
        profit_per_unit: profit_per_unit.round_dp(2),
        total_profit: (profit_per_unit * Decimal::from(remaining)).round_dp(2),
        margin_percent: (profit_per_unit / unit_cost * Decimal::ONE_HUNDRED).round_dp(2),
        would_be_loss_after: profit_per_unit < Decimal::ZERO,
    })
}

/// Attaches profitability to decisions using the cost ledger.
pub struct ProfitEstimator {
    ledger: Arc<dyn CostLedger>,
    fees: FeeSchedule,
}

impl ProfitEstimator {
    #[must_use]
    pub fn new(ledger: Arc<dyn CostLedger>, fees: FeeSchedule) -> Self {
        Self { ledger, fees }
    }

    /// Annotate every decision. Never drops a decision: a missing or failed
    /// cost lookup only leaves its profitability empty.
    pub async fn annotate(
        &self,
        decisions: Vec<RepriceDecision>,
        cycle: Option<&CycleId>,
    ) -> Vec<RepriceDecision> {
        let lookups = decisions.iter().map(|d| self.ledger.unit_cost(d.pair(), cycle));
        let costs = join_all(lookups).await;

        decisions
            .into_iter()
            .zip(costs)
            .map(|(decision, cost)| {
                let cost = match cost {
                    Ok(cost) => cost,
                    Err(e) => {
                        warn!(
                            order_id = %decision.order_id,
                            pair = %decision.pair(),
                            error = %e,
                            "Unit cost lookup failed"
                        );
                        None
                    }
                };
                let projection = project(
                    cost,
                    decision.suggested_price,
                    decision.volume_remain,
                    &self.fees,
                );
                decision.with_profitability(projection)
            })
            .collect()
    }
}
