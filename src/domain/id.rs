//! Domain identifier types.
//!
//! Game identifiers are 64-bit integers. Each kind gets its own newtype so a
//! station id can never be passed where an item-type id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw identifier.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Return the raw identifier.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self::new(id)
            }
        }
    };
}

numeric_id!(
    /// Character (trader) identifier.
    CharacterId
);
numeric_id!(
    /// Station or structure (location) identifier.
    StationId
);
numeric_id!(
    /// Item type identifier.
    TypeId
);
numeric_id!(
    /// Market order identifier.
    OrderId
);
numeric_id!(
    /// Trade region identifier.
    RegionId
);

/// Trading cycle identifier.
///
/// Cycles are keyed by opaque strings assigned by the bookkeeping service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CycleId(String);

impl CycleId {
    /// Create a new `CycleId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the cycle ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CycleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CycleId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Composite key for everything tracked per (station, item-type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairKey {
    pub station_id: StationId,
    pub type_id: TypeId,
}

impl PairKey {
    #[must_use]
    pub const fn new(station_id: StationId, type_id: TypeId) -> Self {
        Self {
            station_id,
            type_id,
        }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.station_id, self.type_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_keys_order_by_station_then_type() {
        let a = PairKey::new(StationId::new(1), TypeId::new(9));
        let b = PairKey::new(StationId::new(2), TypeId::new(1));
        assert!(a < b);
        assert_eq!(a.to_string(), "1:9");
    }

    #[test]
    fn ids_deserialize_transparently() {
        let id: TypeId = serde_json::from_str("34").unwrap();
        assert_eq!(id, TypeId::new(34));
    }
}
