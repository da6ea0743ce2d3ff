//! Per-site unit storage with an infectious prefix.
//!
//! [`PartitionedPopulation`] is a sparse set: a dense `Vec<Unit>` that is
//! always compact, plus a fixed sparse table of [`Slot`](crate::Slot)s that
//! gives every stored unit a stable handle. The dense layer is split at
//! `boundary`:
//!
//! ```text
//!  dense:  | I | I | I | N | N | N | . | . |
//!            0       boundary       size   capacity
//!
//!  sparse: | ->2 | free | ->0 | ->4 | ->1 | free | ->3 | ->5 |
//! ```
//!
//! `[0, boundary)` holds infectious units and `[boundary, size)` the rest,
//! so infection sweeps only ever touch the prefix. Every operation keeps
//! the split by swapping elements across it and rebinding the two slots
//! involved; nothing is ever shifted.
//!
//! Dense positions are not stable. Any insert, remove or swap may move
//! other units, so callers hold on to [`SlotIndex`] handles and resolve
//! them on every access.

use std::slice;

use roost_core::{SlotIndex, Unit};

use crate::error::InvariantViolation;
use crate::pool::UnitPool;
use crate::slot::{Slot, SlotTable};

/// Fixed-capacity, infectious-first unit container owned by one site.
///
/// All operations are O(1). Contract violations (inserting past capacity,
/// addressing a free slot, removing from an empty population) panic; there
/// is no recoverable error path because the owning site checks capacity
/// before it commits to a move.
#[derive(Clone, Debug)]
pub struct PartitionedPopulation {
    dense: Vec<Unit>,
    slots: SlotTable,
    /// Dense position of the first non-infectious unit.
    boundary: usize,
    capacity: usize,
}

impl PartitionedPopulation {
    /// Create an empty population holding at most `capacity` units.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` does not fit in a `u32`.
    pub fn new(capacity: usize) -> Self {
        let sparse_len = u32::try_from(capacity)
            .unwrap_or_else(|_| panic!("population capacity {capacity} exceeds u32::MAX"));
        Self {
            dense: Vec::with_capacity(capacity),
            slots: SlotTable::new(sparse_len),
            boundary: 0,
            capacity,
        }
    }

    /// Store a unit and return its slot and final dense position.
    ///
    /// The slot is also written to `unit.slot`. An infectious unit is
    /// appended and then swapped with the first non-infectious unit, which
    /// moves that unit to the end.
    ///
    /// # Panics
    ///
    /// Panics if the population is full.
    pub fn insert(&mut self, mut unit: Unit) -> (SlotIndex, usize) {
        let Some(slot) = self.slots.acquire() else {
            panic!("population is full (capacity {})", self.capacity);
        };
        let infectious = unit.is_infectious();
        unit.slot = slot;

        let pos = self.dense.len();
        self.dense.push(unit);
        self.slots.bind(slot, pos);

        if !infectious {
            return (slot, pos);
        }
        let target = self.boundary;
        self.swap_dense(pos, target);
        self.boundary += 1;
        (slot, target)
    }

    /// Remove the unit in `slot` and hand it back to the caller.
    ///
    /// A non-infectious unit is swapped with the last unit and popped. An
    /// infectious unit is first swapped with the last infectious unit, then
    /// (if non-infectious units follow) with the last unit, so both regions
    /// stay contiguous. The freed slot becomes the head of the free list
    /// and the returned unit's slot is reset to [`SlotIndex::DETACHED`].
    ///
    /// The unit's infectious state must agree with its region, i.e. any
    /// state flip must already have been reported through
    /// [`swap_to_infected`](Self::swap_to_infected) or
    /// [`swap_to_susceptible`](Self::swap_to_susceptible).
    ///
    /// # Panics
    ///
    /// Panics if `slot` is free.
    pub fn remove(&mut self, slot: SlotIndex) -> Unit {
        let pos = self.dense_position(slot);

        let mut unit = if self.dense[pos].is_infectious() {
            debug_assert!(
                pos < self.boundary,
                "infectious unit in slot {slot} found past the boundary"
            );
            let last_infectious = self.boundary - 1;
            self.swap_dense(pos, last_infectious);
            self.boundary -= 1;
            self.take(last_infectious)
        } else {
            debug_assert!(
                pos >= self.boundary,
                "non-infectious unit in slot {slot} found inside the infectious region"
            );
            self.take(pos)
        };

        debug_assert_eq!(unit.slot, slot);
        self.slots.release(slot);
        unit.slot = SlotIndex::DETACHED;
        unit
    }

    /// Remove whichever unit occupies the last dense position.
    ///
    /// # Panics
    ///
    /// Panics if the population is empty.
    pub fn remove_last(&mut self) -> Unit {
        let Some(last) = self.dense.last() else {
            panic!("remove_last on an empty population");
        };
        let slot = last.slot;
        self.remove(slot)
    }

    /// Move a unit that just became infectious into the infectious region.
    ///
    /// Swaps it with the first non-infectious unit and advances the
    /// boundary. Both swapped units change dense position.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is free.
    pub fn swap_to_infected(&mut self, slot: SlotIndex) {
        let pos = self.dense_position(slot);
        debug_assert!(
            pos >= self.boundary,
            "unit in slot {slot} is already in the infectious region"
        );
        let target = self.boundary;
        self.swap_dense(pos, target);
        self.boundary += 1;
    }

    /// Move a unit that just stopped being infectious out of the
    /// infectious region.
    ///
    /// Swaps it with the last infectious unit and retreats the boundary.
    /// Both swapped units change dense position.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is free.
    pub fn swap_to_susceptible(&mut self, slot: SlotIndex) {
        let pos = self.dense_position(slot);
        debug_assert!(
            pos < self.boundary,
            "unit in slot {slot} is not in the infectious region"
        );
        let target = self.boundary - 1;
        self.swap_dense(pos, target);
        self.boundary -= 1;
    }

    /// Remove every unit and return it to `pool`.
    pub fn drain(&mut self, pool: &mut UnitPool) {
        while !self.dense.is_empty() {
            pool.release(self.remove_last());
        }
    }

    // ── Access ──────────────────────────────────────────────────

    /// The unit at dense position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[inline]
    pub fn by_dense(&self, index: usize) -> &Unit {
        &self.dense[index]
    }

    /// Mutable access by dense position.
    ///
    /// Changing the unit's infection state through this reference must be
    /// followed by the matching swap call.
    #[inline]
    pub fn by_dense_mut(&mut self, index: usize) -> &mut Unit {
        &mut self.dense[index]
    }

    /// The unit stored in `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is free or out of range.
    #[inline]
    pub fn by_slot(&self, slot: SlotIndex) -> &Unit {
        &self.dense[self.dense_position(slot)]
    }

    /// Mutable access by slot. Same caveat as [`by_dense_mut`](Self::by_dense_mut).
    #[inline]
    pub fn by_slot_mut(&mut self, slot: SlotIndex) -> &mut Unit {
        let pos = self.dense_position(slot);
        &mut self.dense[pos]
    }

    /// The unit stored in `slot`, or `None` if the slot is free or out of
    /// range. Use this to validate handles that may have gone stale.
    #[inline]
    pub fn get(&self, slot: SlotIndex) -> Option<&Unit> {
        self.slots.dense_of(slot).map(|pos| &self.dense[pos])
    }

    /// Checked mutable access by slot.
    #[inline]
    pub fn get_mut(&mut self, slot: SlotIndex) -> Option<&mut Unit> {
        let pos = self.slots.dense_of(slot)?;
        Some(&mut self.dense[pos])
    }

    /// Current dense position of the unit in `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is free or out of range.
    #[inline]
    pub fn dense_position(&self, slot: SlotIndex) -> usize {
        match self.slots.dense_of(slot) {
            Some(pos) => pos,
            None => panic!("slot {slot} does not hold a unit"),
        }
    }

    /// The sparse entry for `slot`, if in range.
    pub fn slot(&self, slot: SlotIndex) -> Option<&Slot> {
        self.slots.get(slot)
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Number of stored units.
    #[inline]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Number of stored infectious units (the boundary position).
    #[inline]
    pub fn len_infectious(&self) -> usize {
        self.boundary
    }

    /// Whether no unit is stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Whether every slot is taken.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.dense.len() == self.capacity
    }

    /// Fixed capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots left.
    #[inline]
    pub fn available_space(&self) -> usize {
        self.capacity - self.dense.len()
    }

    /// The slot the next insert will receive.
    pub fn first_free_slot(&self) -> Option<SlotIndex> {
        self.slots.free_head()
    }

    // ── Iteration ───────────────────────────────────────────────

    /// All stored units, infectious first.
    pub fn iter(&self) -> slice::Iter<'_, Unit> {
        self.dense.iter()
    }

    /// All stored units as a slice.
    pub fn as_slice(&self) -> &[Unit] {
        &self.dense
    }

    /// The infectious prefix.
    pub fn infectious(&self) -> &[Unit] {
        &self.dense[..self.boundary]
    }

    /// The non-infectious suffix.
    pub fn non_infectious(&self) -> &[Unit] {
        &self.dense[self.boundary..]
    }

    // ── Self-check ──────────────────────────────────────────────

    /// Verify every structural invariant.
    ///
    /// O(capacity). Intended for tests and debug tooling; no mutating
    /// operation calls it.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let size = self.dense.len();
        if size > self.capacity {
            return Err(InvariantViolation::OverCapacity {
                size,
                capacity: self.capacity,
            });
        }
        if self.boundary > size {
            return Err(InvariantViolation::BoundaryOutOfRange {
                boundary: self.boundary,
                size,
            });
        }

        for (dense, unit) in self.dense.iter().enumerate() {
            let infectious = unit.is_infectious();
            if infectious != (dense < self.boundary) {
                return Err(InvariantViolation::Misplaced {
                    dense,
                    infectious,
                    boundary: self.boundary,
                });
            }
            if self.slots.dense_of(unit.slot) != Some(dense) {
                return Err(InvariantViolation::BrokenBackReference {
                    dense,
                    slot: unit.slot,
                });
            }
        }

        let mut in_free_chain = vec![false; self.slots.len()];
        let mut free = 0usize;
        for slot in self.slots.free_chain() {
            let seen = in_free_chain.get_mut(slot.get()).ok_or_else(|| {
                InvariantViolation::FreeListCorrupted {
                    reason: format!("slot {slot} is out of range"),
                }
            })?;
            if *seen {
                return Err(InvariantViolation::FreeListCorrupted {
                    reason: format!("slot {slot} appears twice"),
                });
            }
            if self.slots.get(slot).is_some_and(Slot::is_occupied) {
                return Err(InvariantViolation::FreeListCorrupted {
                    reason: format!("occupied slot {slot} is on the free list"),
                });
            }
            *seen = true;
            free += 1;
        }
        if free + size != self.slots.len() {
            return Err(InvariantViolation::FreeListCorrupted {
                reason: format!(
                    "{free} free + {size} occupied != {} slots",
                    self.slots.len()
                ),
            });
        }
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────

    /// Swap two dense positions and rebind both slots.
    #[inline]
    fn swap_dense(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.dense.swap(a, b);
        self.slots.bind(self.dense[a].slot, a);
        self.slots.bind(self.dense[b].slot, b);
    }

    /// Swap-remove the unit at `pos`; the former last unit takes its place.
    #[inline]
    fn take(&mut self, pos: usize) -> Unit {
        let unit = self.dense.swap_remove(pos);
        if let Some(moved) = self.dense.get(pos) {
            self.slots.bind(moved.slot, pos);
        }
        unit
    }
}
