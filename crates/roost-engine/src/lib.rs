//! Sites and the world driver for Roost simulations.
//!
//! Provides the five holder kinds ([`Holder`]) that own unit populations,
//! and the [`World`] that ties them to the shared unit pool: spawning,
//! transfers, deaths, sales, infection flips, broker routing, and per-run
//! resets.
//!
//! Single-threaded and step-driven. Epidemic transition rules, contact
//! structure and trading decisions live with the caller; the world only
//! keeps storage consistent while they act.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod holder;
pub mod world;

pub use config::{ConfigError, SiteConfig, WorldConfig};
pub use holder::{
    Broker, Experiment, Holder, HoldsUnits, Marketplace, Origin, Reseller, SiteCore, SiteKind,
};
pub use world::{Location, World};
