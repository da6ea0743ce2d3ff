//! Strongly-typed identifiers and the [`TradedKinds`] type alias.

use smallvec::SmallVec;
use std::fmt;

/// Identifies a holder site within a simulation world.
///
/// Sites are registered at world creation and assigned sequential IDs.
/// `SiteId(n)` corresponds to the n-th site in the world configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SiteId(pub u32);

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SiteId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Category of a unit (species or product line).
///
/// Route pools and site trading lists are keyed by kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitKind(pub u16);

impl UnitKind {
    /// Kind carried by placeholder units that have never been stamped.
    pub const NONE: UnitKind = UnitKind(0);
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for UnitKind {
    fn from(v: u16) -> Self {
        Self(v)
    }
}

/// Sparse-array handle identifying a unit's logical position inside the
/// population that currently owns it.
///
/// Stable for as long as the unit stays in the same population, no matter
/// how often the dense layout is reshuffled. Reissued to another unit once
/// the owner removes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex(pub u32);

impl SlotIndex {
    /// Slot value carried by units not stored in any population.
    pub const DETACHED: SlotIndex = SlotIndex(u32::MAX);

    /// The slot as a `usize` for indexing.
    #[inline]
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SlotIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Globally unique unit identity.
///
/// Composed of the origin site that minted the unit and a serial number
/// local to that origin, so origins can mint without coordination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitId {
    /// Numeric ID of the minting site.
    pub origin: u32,
    /// Serial number within the minting site.
    pub serial: u32,
}

impl UnitId {
    /// Identity of placeholder units handed out by an empty pool.
    pub const SENTINEL: UnitId = UnitId {
        origin: u32::MAX,
        serial: u32::MAX,
    };

    /// Create a new unit ID.
    pub fn new(origin: u32, serial: u32) -> Self {
        Self { origin, serial }
    }

    /// Whether this is the placeholder identity.
    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.origin, self.serial)
    }
}

/// Identifies a pathogen strain. Only strains `0..64` fit a [`StrainSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StrainId(pub u8);

impl fmt::Display for StrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for StrainId {
    fn from(v: u8) -> Self {
        Self(v)
    }
}

/// Unit kinds traded by a single site.
///
/// Uses `SmallVec<[UnitKind; 4]>` so the common case of one or two kinds
/// per site never touches the heap.
pub type TradedKinds = SmallVec<[UnitKind; 4]>;
