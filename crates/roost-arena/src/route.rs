//! FIFO routing queues of slot indices.
//!
//! A broker decides which of its stored units to dispatch next without
//! moving them: it queues each unit's [`SlotIndex`] under the unit's kind
//! and destination, and later pops indices in arrival order. A queue never
//! owns units. When a queued unit dies before dispatch, its entry is
//! tombstoned in place and skipped by [`RouteQueue::pop_front`].

use std::collections::VecDeque;

use indexmap::IndexMap;
use roost_core::{SiteId, SlotIndex, UnitKind};

/// One FIFO queue of slot indices.
///
/// Duplicate indices are not detected; callers queue each stored unit
/// at most once.
#[derive(Clone, Debug, Default)]
pub struct RouteQueue {
    /// `None` marks a tombstoned entry.
    entries: VecDeque<Option<SlotIndex>>,
    live: usize,
}

impl RouteQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `index` at the back.
    pub fn insert(&mut self, index: SlotIndex) {
        self.entries.push_back(Some(index));
        self.live += 1;
    }

    /// Pop the oldest live index, discarding tombstones in front of it.
    ///
    /// Returns `None` once no live entry remains.
    pub fn pop_front(&mut self) -> Option<SlotIndex> {
        while self.live > 0 {
            if let Some(index) = self.entries.pop_front().flatten() {
                self.live -= 1;
                return Some(index);
            }
        }
        // Only tombstones can be left behind.
        self.entries.clear();
        None
    }

    /// Tombstone the first live entry equal to `index`.
    ///
    /// Linear in the queue length. Returns `false` if `index` is not
    /// queued.
    pub fn mark_invalid(&mut self, index: SlotIndex) -> bool {
        match self.entries.iter_mut().find(|e| **e == Some(index)) {
            Some(entry) => {
                *entry = None;
                self.live -= 1;
                true
            }
            None => false,
        }
    }

    /// Whether `index` is queued and live.
    pub fn contains(&self, index: SlotIndex) -> bool {
        self.entries.contains(&Some(index))
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.live
    }

    /// Whether no live entry remains.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Drop every entry, live or tombstoned.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.live = 0;
    }
}

/// Route queues keyed by unit kind, then by destination site.
///
/// Both levels are [`IndexMap`]s so that iteration (and therefore
/// [`non_empty_destinations`](Self::non_empty_destinations)) follows
/// insertion order and runs are reproducible.
#[derive(Clone, Debug, Default)]
pub struct RouteIndexPool {
    routes: IndexMap<UnitKind, IndexMap<SiteId, RouteQueue>>,
}

impl RouteIndexPool {
    /// Create a pool with an empty route table for each of `kinds`.
    pub fn new(kinds: impl IntoIterator<Item = UnitKind>) -> Self {
        Self {
            routes: kinds.into_iter().map(|k| (k, IndexMap::new())).collect(),
        }
    }

    /// The queue for `(kind, destination)`, if one was ever created.
    pub fn queue(&self, kind: UnitKind, destination: SiteId) -> Option<&RouteQueue> {
        self.routes.get(&kind)?.get(&destination)
    }

    /// The queue for `(kind, destination)`, created empty on first use.
    pub fn queue_mut(&mut self, kind: UnitKind, destination: SiteId) -> &mut RouteQueue {
        self.routes
            .entry(kind)
            .or_default()
            .entry(destination)
            .or_default()
    }

    /// Queue `index` for dispatch to `destination`.
    pub fn insert(&mut self, kind: UnitKind, destination: SiteId, index: SlotIndex) {
        self.queue_mut(kind, destination).insert(index);
    }

    /// Next live index routed to `destination`, oldest first.
    pub fn pop_front(&mut self, kind: UnitKind, destination: SiteId) -> Option<SlotIndex> {
        self.routes
            .get_mut(&kind)?
            .get_mut(&destination)?
            .pop_front()
    }

    /// Tombstone `index` in the `(kind, destination)` queue.
    pub fn mark_invalid(&mut self, kind: UnitKind, destination: SiteId, index: SlotIndex) -> bool {
        self.routes
            .get_mut(&kind)
            .and_then(|by_dest| by_dest.get_mut(&destination))
            .is_some_and(|queue| queue.mark_invalid(index))
    }

    /// Live entries across every destination for `kind`.
    pub fn len_kind(&self, kind: UnitKind) -> usize {
        self.routes
            .get(&kind)
            .map_or(0, |by_dest| by_dest.values().map(RouteQueue::len).sum())
    }

    /// Live entries for one route.
    pub fn len_route(&self, kind: UnitKind, destination: SiteId) -> usize {
        self.queue(kind, destination).map_or(0, RouteQueue::len)
    }

    /// Live entries across all routes.
    pub fn len(&self) -> usize {
        self.routes
            .values()
            .flat_map(IndexMap::values)
            .map(RouteQueue::len)
            .sum()
    }

    /// Whether every queue is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty every queue. Routes stay registered.
    pub fn clear(&mut self) {
        for queue in self.routes.values_mut().flat_map(IndexMap::values_mut) {
            queue.clear();
        }
    }

    /// Empty every queue for `kind`.
    pub fn clear_kind(&mut self, kind: UnitKind) {
        if let Some(by_dest) = self.routes.get_mut(&kind) {
            by_dest.values_mut().for_each(RouteQueue::clear);
        }
    }

    /// Destinations with at least one live entry for `kind`, in first-use
    /// order.
    pub fn non_empty_destinations(&self, kind: UnitKind) -> Vec<SiteId> {
        self.routes.get(&kind).map_or_else(Vec::new, |by_dest| {
            by_dest
                .iter()
                .filter(|(_, queue)| !queue.is_empty())
                .map(|(dest, _)| *dest)
                .collect()
        })
    }

    /// Registered unit kinds.
    pub fn kinds(&self) -> impl Iterator<Item = UnitKind> + '_ {
        self.routes.keys().copied()
    }
}
