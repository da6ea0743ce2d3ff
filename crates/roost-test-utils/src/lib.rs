//! Test utilities for Roost development.
//!
//! Provides a [`UnitBuilder`] for constructing units in a known state and
//! the free-standing fixtures in [`fixtures`] used across unit tests,
//! integration tests and benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    infectious_unit, init_logging, mixed_population, susceptible_unit, DEFAULT_KIND,
};

use roost_core::{SiteId, StrainId, Unit, UnitId, UnitKind};

/// Builder for units with preconfigured identity and infection state.
///
/// Starts from a [`Unit::placeholder`] stamped with origin 0, the given
/// serial and [`DEFAULT_KIND`].
pub struct UnitBuilder {
    unit: Unit,
}

impl UnitBuilder {
    pub fn new(serial: u32) -> Self {
        let mut unit = Unit::placeholder();
        unit.stamp(UnitId::new(0, serial), DEFAULT_KIND, 0);
        Self { unit }
    }

    pub fn origin(mut self, origin: u32) -> Self {
        self.unit.id.origin = origin;
        self
    }

    pub fn kind(mut self, kind: UnitKind) -> Self {
        self.unit.kind = kind;
        self
    }

    pub fn born(mut self, tick: u32) -> Self {
        self.unit.born = tick;
        self
    }

    /// Add `strain` to both the infection and immunity sets.
    pub fn infected_with(mut self, strain: StrainId) -> Self {
        self.unit.acquire(strain);
        self
    }

    /// Mark `strain` as previously carried but cleared.
    pub fn immune_to(mut self, strain: StrainId) -> Self {
        self.unit.immunity.insert(strain);
        self
    }

    pub fn owned_by(mut self, site: SiteId) -> Self {
        self.unit.owner = Some(site);
        self
    }

    pub fn build(self) -> Unit {
        self.unit
    }
}
