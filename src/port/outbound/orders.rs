//! Order listing port.

use async_trait::async_trait;

use crate::domain::{CharacterId, TraderOrder};
use crate::error::Result;

/// Lists a character's currently open market orders.
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Active orders for one character. May include buy orders; callers
    /// filter them out. May fail per character.
    async fn list_active_sell_orders(&self, character: CharacterId) -> Result<Vec<TraderOrder>>;
}
