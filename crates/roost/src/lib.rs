//! Roost: partitioned unit storage for trade-network epidemic simulation.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Roost sub-crates. For most users, adding `roost` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use roost::prelude::*;
//!
//! const HEN: UnitKind = UnitKind(1);
//!
//! let config = WorldConfig::new(vec![
//!     SiteConfig::new(SiteKind::Origin, 100, [HEN]),
//!     SiteConfig::new(SiteKind::Broker, 50, [HEN]),
//!     SiteConfig::new(SiteKind::Marketplace, 200, [HEN]),
//! ]);
//! let mut world = World::new(config).unwrap();
//!
//! let farm = SiteId(0);
//! let broker = SiteId(1);
//! let market = SiteId(2);
//!
//! let id = world.spawn(farm, HEN, 0).unwrap();
//! assert!(world.infect(id, StrainId(3)).unwrap());
//! world.transfer(id, broker).unwrap();
//! world.route(id, market).unwrap();
//! assert_eq!(world.dispatch(broker, HEN, market).unwrap(), Some(id));
//!
//! let site = world.site(market).unwrap();
//! assert_eq!(site.len_infectious(), 1);
//! assert_eq!(site.population().infectious()[0].id, id);
//!
//! world.reset();
//! assert_eq!(world.pool().available(), 1);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `roost-core` | IDs, `Unit`, `StrainSet`, `SiteError` |
//! | [`arena`] | `roost-arena` | `PartitionedPopulation`, `UnitPool`, `RouteIndexPool` |
//! | [`engine`] | `roost-engine` | Holder kinds, `World`, configuration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and IDs (`roost-core`).
pub use roost_core as types;

/// Unit storage (`roost-arena`).
///
/// [`arena::PartitionedPopulation`] is the per-site container;
/// [`arena::UnitPool`] recycles units between runs.
pub use roost_arena as arena;

/// Sites and the world driver (`roost-engine`).
///
/// [`engine::World`] owns every [`engine::Holder`] and the unit pool.
pub use roost_engine as engine;

/// Common imports for typical Roost usage.
///
/// ```rust
/// use roost::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use roost_core::{SiteId, SlotIndex, StrainId, StrainSet, Unit, UnitId, UnitKind};

    // Errors
    pub use roost_core::SiteError;
    pub use roost_engine::ConfigError;

    // Storage
    pub use roost_arena::{PartitionedPopulation, PoolConfig, UnitPool};

    // Engine
    pub use roost_engine::{Holder, HoldsUnits, SiteConfig, SiteKind, World, WorldConfig};
}
