//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! The repricing engine never talks to the game API, a database or a
//! bookkeeping service directly. Every collaborator sits behind one of the
//! outbound traits below so that fixtures and fakes can stand in for them.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │  collector / scheduler  │
//!     ┌──────────────┤  decision / report      ├──────────────┐
//!     │              └─────────────────────────┘              │
//!     ▼                         ▼                             ▼
//! ┌──────────┐           ┌─────────────┐              ┌────────────┐
//! │ Orders & │           │ Cost ledger │              │   Names    │
//! │ market   │           │ & history   │              │            │
//! └──────────┘           └─────────────┘              └────────────┘
//! ```

pub mod outbound;

pub use outbound::ledger::{CostLedger, SalesHistory};
pub use outbound::market::{MarketDataSource, StructureSnapshotStore};
pub use outbound::names::NameResolver;
pub use outbound::orders::OrderSource;
