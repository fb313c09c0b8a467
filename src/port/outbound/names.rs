//! Display name lookups.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{CharacterId, StationId, TypeId};
use crate::error::Result;

/// Resolves identifiers to human-readable names for the report.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn item_type_names(&self, ids: &[TypeId]) -> Result<HashMap<TypeId, String>>;

    async fn character_names(&self, ids: &[CharacterId]) -> Result<HashMap<CharacterId, String>>;

    async fn station_names(&self, ids: &[StationId]) -> Result<HashMap<StationId, String>>;
}
