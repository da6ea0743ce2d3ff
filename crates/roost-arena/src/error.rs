//! Diagnostics for population self-checks.
//!
//! The population never returns these from a mutating operation; they are
//! produced only by
//! [`PartitionedPopulation::check_invariants`](crate::PartitionedPopulation::check_invariants).

use std::error::Error;
use std::fmt;

use roost_core::SlotIndex;

/// A broken structural invariant found by a population self-check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// More units are stored than the population's capacity.
    OverCapacity {
        /// Units stored.
        size: usize,
        /// Fixed capacity.
        capacity: usize,
    },
    /// The infectious boundary lies beyond the stored units.
    BoundaryOutOfRange {
        /// Boundary position.
        boundary: usize,
        /// Units stored.
        size: usize,
    },
    /// A unit sits on the wrong side of the infectious boundary.
    Misplaced {
        /// Dense position of the offending unit.
        dense: usize,
        /// Whether that unit is infectious.
        infectious: bool,
        /// Boundary position.
        boundary: usize,
    },
    /// A unit's slot does not point back at the unit's dense position.
    BrokenBackReference {
        /// Dense position of the unit.
        dense: usize,
        /// Slot the unit claims.
        slot: SlotIndex,
    },
    /// A slot is both free and occupied, or neither.
    FreeListCorrupted {
        /// Description of what was found.
        reason: String,
    },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OverCapacity { size, capacity } => {
                write!(f, "size {size} exceeds capacity {capacity}")
            }
            Self::BoundaryOutOfRange { boundary, size } => {
                write!(f, "boundary {boundary} exceeds size {size}")
            }
            Self::Misplaced {
                dense,
                infectious,
                boundary,
            } => {
                let state = if *infectious {
                    "infectious"
                } else {
                    "non-infectious"
                };
                write!(
                    f,
                    "{state} unit at dense {dense} is on the wrong side of boundary {boundary}"
                )
            }
            Self::BrokenBackReference { dense, slot } => {
                write!(f, "unit at dense {dense} claims slot {slot}, which points elsewhere")
            }
            Self::FreeListCorrupted { reason } => write!(f, "free list corrupted: {reason}"),
        }
    }
}

impl Error for InvariantViolation {}
