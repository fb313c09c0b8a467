//! Sales history and trading-cycle cost ports.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use crate::domain::{CycleId, PairKey, Price, Units};
use crate::error::Result;

/// Observed market turnover.
#[async_trait]
pub trait SalesHistory: Send + Sync {
    /// Most recent daily sold-units figure for each pair. Pairs without
    /// history are absent.
    async fn latest_daily_sold_units(&self, pairs: &[PairKey]) -> Result<HashMap<PairKey, Units>>;
}

/// Committed trading-cycle line records.
#[async_trait]
pub trait CostLedger: Send + Sync {
    /// Known unit acquisition cost for a pair, optionally scoped to a cycle.
    async fn unit_cost(&self, pair: PairKey, cycle: Option<&CycleId>) -> Result<Option<Price>>;

    /// Pairs with committed line items in a cycle.
    async fn committed_pairs(&self, cycle: &CycleId) -> Result<HashSet<PairKey>>;
}
