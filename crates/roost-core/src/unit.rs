//! The simulated animal unit and its movement counters.
//!
//! A [`Unit`] is a plain value. Ownership moves between a site's population
//! and the unit pool, so "exactly one owner" is enforced by the borrow
//! checker rather than by reference counting.

use crate::id::{SiteId, SlotIndex, StrainId, UnitId, UnitKind};
use crate::strain::StrainSet;

/// Counters describing how a unit has travelled through the network.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Movements {
    /// Number of times the unit passed through a broker.
    pub broker_hops: u16,
    /// Number of times the unit passed through a reseller.
    pub reseller_hops: u16,
    /// Number of times the unit was put back on sale after a failed sale.
    pub repurposed: u16,
}

impl Movements {
    /// Zero every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Record a pass through a broker.
    pub fn record_broker(&mut self) {
        self.broker_hops = self.broker_hops.saturating_add(1);
    }

    /// Record a pass through a reseller.
    pub fn record_reseller(&mut self) {
        self.reseller_hops = self.reseller_hops.saturating_add(1);
    }

    /// Record a repurposing.
    pub fn record_repurpose(&mut self) {
        self.repurposed = self.repurposed.saturating_add(1);
    }
}

/// One simulated animal.
///
/// `slot` is maintained by the population that stores the unit and must not
/// be written by anyone else. After a unit changes its infectious state the
/// owning site has to be told (see `swap_to_infected` / `swap_to_susceptible`
/// on the population) before any other population operation runs.
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    /// Globally unique identity.
    pub id: UnitId,
    /// Species or product line.
    pub kind: UnitKind,
    /// Strains currently carried.
    pub infection: StrainSet,
    /// Strains ever carried.
    pub immunity: StrainSet,
    /// Sparse position inside the owning population.
    pub slot: SlotIndex,
    /// Current owner. `None` marks a pooled (invalid) unit.
    pub owner: Option<SiteId>,
    /// Where a broker intends to deliver the unit.
    pub destination: Option<SiteId>,
    /// Tick at which the unit was stamped.
    pub born: u32,
    /// Movement history.
    pub movements: Movements,
}

impl Unit {
    /// A blank unit as produced by an empty pool.
    pub fn placeholder() -> Self {
        Self {
            id: UnitId::SENTINEL,
            kind: UnitKind::NONE,
            infection: StrainSet::EMPTY,
            immunity: StrainSet::EMPTY,
            slot: SlotIndex::DETACHED,
            owner: None,
            destination: None,
            born: 0,
            movements: Movements::default(),
        }
    }

    /// Re-stamp a recycled unit with a fresh identity and a susceptible,
    /// never-infected state.
    pub fn stamp(&mut self, id: UnitId, kind: UnitKind, born: u32) {
        self.id = id;
        self.kind = kind;
        self.infection.clear();
        self.immunity.clear();
        self.slot = SlotIndex::DETACHED;
        self.owner = None;
        self.destination = None;
        self.born = born;
        self.movements.reset();
    }

    /// Whether the unit currently sheds any strain.
    #[inline]
    pub fn is_infectious(&self) -> bool {
        !self.infection.is_empty()
    }

    /// Whether the unit is held by a site.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.owner.is_some()
    }

    /// Add a strain to both the infection and immunity sets.
    ///
    /// Returns `true` when this flipped the unit from non-infectious to
    /// infectious, i.e. when the owner must be told to swap.
    pub fn acquire(&mut self, strain: StrainId) -> bool {
        let was_infectious = self.is_infectious();
        self.infection.insert(strain);
        self.immunity.insert(strain);
        !was_infectious
    }

    /// Clear a strain from the infection set (immunity is kept).
    ///
    /// Returns `true` when this flipped the unit from infectious to
    /// non-infectious.
    pub fn clear_strain(&mut self, strain: StrainId) -> bool {
        let was_infectious = self.is_infectious();
        self.infection.remove(strain);
        was_infectious && !self.is_infectious()
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self::placeholder()
    }
}
