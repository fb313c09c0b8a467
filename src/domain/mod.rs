//! Exchange-agnostic domain types: orders, listings, the pricing grid and
//! repricing decisions.

pub mod decision;
pub mod error;
pub mod fees;
pub mod id;
pub mod listing;
pub mod money;
pub mod order;
pub mod policy;
pub mod report;
pub mod station;
pub mod tick;

pub use decision::{ExpiryInfo, Profitability, ReasonTag, RepriceDecision};
pub use fees::FeeSchedule;
pub use id::{CharacterId, CycleId, OrderId, PairKey, RegionId, StationId, TypeId};
pub use listing::{CompetitorListing, TypedListing};
pub use money::{Price, Units};
pub use order::TraderOrder;
pub use policy::{GroupingMode, RepricePolicy};
pub use report::ReportGroup;
pub use station::{StationRegion, StructureVenue};
pub use tick::{PriceGrid, SignificantDigitGrid};
