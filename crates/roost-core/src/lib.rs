//! Core types for the Roost trade-network epidemic simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental values shared across the workspace: identifiers,
//! the [`Unit`] record, strain bitmasks, and driver-level error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod strain;
pub mod unit;

pub use error::SiteError;
pub use id::{SiteId, SlotIndex, StrainId, TradedKinds, UnitId, UnitKind};
pub use strain::StrainSet;
pub use unit::{Movements, Unit};
