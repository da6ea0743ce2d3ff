//! Unit storage for Roost simulations.
//!
//! Every site keeps the units it currently holds in a
//! [`PartitionedPopulation`], every unit that leaves the simulation goes
//! back to the single [`UnitPool`], and brokers track dispatch order in a
//! [`RouteIndexPool`]. Nothing in this crate allocates per operation once
//! a population is constructed; the pool grows in fixed increments only.
//!
//! # Architecture
//!
//! ```text
//! UnitPool (one per world, LIFO stock of released units)
//!    │ request()                       ▲ release()
//!    ▼                                 │
//! PartitionedPopulation (one per site)
//! ├── dense: Vec<Unit>      [ infectious | non-infectious ]
//! └── SlotTable             Slot::Occupied { dense } / Slot::Free { next }
//!
//! RouteIndexPool (brokers only)
//! └── UnitKind → SiteId → RouteQueue (FIFO of SlotIndex, tombstones)
//! ```
//!
//! # Contracts
//!
//! Misuse (inserting into a full population, addressing a free slot)
//! panics. Callers that cannot guarantee the precondition check
//! [`PartitionedPopulation::available_space`] or
//! [`PartitionedPopulation::get`] first.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod pool;
pub mod population;
pub mod route;
mod slot;

// Public re-exports for the primary API surface.
pub use config::PoolConfig;
pub use error::InvariantViolation;
pub use pool::UnitPool;
pub use population::PartitionedPopulation;
pub use route::{RouteIndexPool, RouteQueue};
pub use slot::Slot;
