//! Sparse slots and the intrusive free list threaded through them.
//!
//! Every population owns one [`Slot`] per unit of capacity. A slot either
//! points at the dense position currently holding a unit, or links to the
//! next free slot. The chain of free slots is a LIFO stack whose head lives
//! in [`SlotTable`].

use roost_core::SlotIndex;

/// A single sparse entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Back-reference to the dense position of the unit owning this slot.
    Occupied {
        /// Dense position.
        dense: u32,
    },
    /// Unoccupied; `next` is the following free slot, `None` ends the chain.
    Free {
        /// Next free slot.
        next: Option<SlotIndex>,
    },
}

impl Slot {
    /// Whether the slot currently backs a unit.
    pub fn is_occupied(&self) -> bool {
        matches!(self, Self::Occupied { .. })
    }
}

/// Fixed-size sparse array plus the head of its free chain.
#[derive(Clone, Debug)]
pub(crate) struct SlotTable {
    slots: Vec<Slot>,
    free_head: Option<SlotIndex>,
}

impl SlotTable {
    /// All `capacity` slots free, chained in ascending order.
    pub(crate) fn new(capacity: u32) -> Self {
        let slots = (0..capacity)
            .map(|i| Slot::Free {
                next: (i + 1 < capacity).then_some(SlotIndex(i + 1)),
            })
            .collect();
        Self {
            slots,
            free_head: (capacity > 0).then_some(SlotIndex(0)),
        }
    }

    /// Pop the head of the free chain. `None` when every slot is taken.
    pub(crate) fn acquire(&mut self) -> Option<SlotIndex> {
        let head = self.free_head?;
        match self.slots[head.get()] {
            Slot::Free { next } => self.free_head = next,
            Slot::Occupied { .. } => unreachable!("free list head {head} is occupied"),
        }
        Some(head)
    }

    /// Push `slot` onto the free chain; it becomes the new head.
    pub(crate) fn release(&mut self, slot: SlotIndex) {
        debug_assert!(
            self.slots[slot.get()].is_occupied(),
            "double release of slot {slot}"
        );
        self.slots[slot.get()] = Slot::Free {
            next: self.free_head,
        };
        self.free_head = Some(slot);
    }

    /// Point `slot` at a dense position.
    #[inline]
    pub(crate) fn bind(&mut self, slot: SlotIndex, dense: usize) {
        self.slots[slot.get()] = Slot::Occupied {
            dense: dense as u32,
        };
    }

    /// Dense position behind `slot`, or `None` if the slot is free or out
    /// of range.
    #[inline]
    pub(crate) fn dense_of(&self, slot: SlotIndex) -> Option<usize> {
        match self.slots.get(slot.get())? {
            Slot::Occupied { dense } => Some(*dense as usize),
            Slot::Free { .. } => None,
        }
    }

    pub(crate) fn get(&self, slot: SlotIndex) -> Option<&Slot> {
        self.slots.get(slot.get())
    }

    pub(crate) fn free_head(&self) -> Option<SlotIndex> {
        self.free_head
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Walk the free chain from the head.
    ///
    /// Stops after `len()` steps so a corrupted (cyclic) chain cannot hang
    /// the caller; callers detect that case by counting.
    pub(crate) fn free_chain(&self) -> impl Iterator<Item = SlotIndex> + '_ {
        let mut cursor = self.free_head;
        let mut budget = self.slots.len() + 1;
        std::iter::from_fn(move || {
            if budget == 0 {
                return None;
            }
            budget -= 1;
            let current = cursor?;
            cursor = match self.slots.get(current.get()) {
                Some(Slot::Free { next }) => *next,
                _ => None,
            };
            Some(current)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_table_chains_every_slot_in_order() {
        let table = SlotTable::new(4);
        let chain: Vec<_> = table.free_chain().collect();
        assert_eq!(chain, vec![SlotIndex(0), SlotIndex(1), SlotIndex(2), SlotIndex(3)]);
    }

    #[test]
    fn zero_capacity_table_has_no_free_slot() {
        let mut table = SlotTable::new(0);
        assert_eq!(table.acquire(), None);
        assert_eq!(table.free_chain().count(), 0);
    }

    #[test]
    fn released_slot_is_reused_first() {
        let mut table = SlotTable::new(3);
        let a = table.acquire().unwrap();
        let b = table.acquire().unwrap();
        table.bind(a, 0);
        table.bind(b, 1);
        table.release(a);
        assert_eq!(table.acquire(), Some(a));
        assert_eq!(table.acquire(), Some(SlotIndex(2)));
        assert_eq!(table.acquire(), None);
    }

    #[test]
    fn dense_of_distinguishes_free_and_occupied() {
        let mut table = SlotTable::new(2);
        let s = table.acquire().unwrap();
        assert_eq!(table.dense_of(s), None);
        table.bind(s, 7);
        assert_eq!(table.dense_of(s), Some(7));
        assert_eq!(table.dense_of(SlotIndex(99)), None);
    }
}
