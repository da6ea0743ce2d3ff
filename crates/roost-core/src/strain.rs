//! Strain bitmask carried by every unit.

use std::fmt;

use crate::id::StrainId;

/// Set of pathogen strains packed into a `u64` bitmask.
///
/// Bit `n` is set when strain `StrainId(n)` is present. Strains `>= 64`
/// cannot be represented; inserting one panics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct StrainSet(u64);

impl StrainSet {
    /// Maximum number of distinct strains a set can hold.
    pub const CAPACITY: u8 = 64;

    /// The empty set.
    pub const EMPTY: StrainSet = StrainSet(0);

    /// Build a set from its raw bitmask.
    pub fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// The raw bitmask.
    pub fn bits(&self) -> u64 {
        self.0
    }

    /// Add a strain. Returns `true` if it was not already present.
    ///
    /// # Panics
    ///
    /// Panics if `strain.0 >= 64`.
    pub fn insert(&mut self, strain: StrainId) -> bool {
        let bit = Self::bit(strain);
        let added = self.0 & bit == 0;
        self.0 |= bit;
        added
    }

    /// Remove a strain. Returns `true` if it was present.
    pub fn remove(&mut self, strain: StrainId) -> bool {
        if strain.0 >= Self::CAPACITY {
            return false;
        }
        let bit = Self::bit(strain);
        let present = self.0 & bit != 0;
        self.0 &= !bit;
        present
    }

    /// Whether the strain is in the set.
    pub fn contains(&self, strain: StrainId) -> bool {
        strain.0 < Self::CAPACITY && self.0 & Self::bit(strain) != 0
    }

    /// Whether no strain is present.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of strains present.
    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }

    /// Remove every strain.
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    /// Iterate present strains in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = StrainId> + '_ {
        (0..Self::CAPACITY)
            .filter(move |&n| self.0 & (1u64 << n) != 0)
            .map(StrainId)
    }

    fn bit(strain: StrainId) -> u64 {
        assert!(
            strain.0 < Self::CAPACITY,
            "strain {strain} does not fit a 64-bit strain set"
        );
        1u64 << strain.0
    }
}

impl fmt::Display for StrainSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl FromIterator<StrainId> for StrainSet {
    fn from_iter<I: IntoIterator<Item = StrainId>>(iter: I) -> Self {
        let mut set = StrainSet::EMPTY;
        for strain in iter {
            set.insert(strain);
        }
        set
    }
}
