//! Reservoir of recyclable units.
//!
//! [`UnitPool`] hands units out to sites and takes them back when they
//! leave the simulation, so unit records are created once and reused for
//! the whole lifetime of the process, across runs.

use roost_core::Unit;

use crate::config::PoolConfig;

/// LIFO stock of released units.
///
/// The pool never fails: when the stock is empty, [`request`](Self::request)
/// constructs a fresh placeholder. When the stock is full,
/// [`release`](Self::release) grows it by the configured increment. Growth
/// only appends storage, and units are moved out by value, so no unit held
/// elsewhere is ever affected by it.
pub struct UnitPool {
    stock: Vec<Unit>,
    /// Logical capacity of `stock`; grows in `grow_by` steps.
    capacity: usize,
    grow_by: usize,
    /// Placeholders constructed because the stock was empty.
    created: u64,
}

impl UnitPool {
    /// Create an empty pool.
    ///
    /// # Panics
    ///
    /// Panics if `config.grow_by` is zero.
    pub fn new(config: PoolConfig) -> Self {
        assert!(config.grow_by > 0, "pool growth increment must be at least 1");
        Self {
            stock: Vec::with_capacity(config.initial_capacity),
            capacity: config.initial_capacity,
            grow_by: config.grow_by,
            created: 0,
        }
    }

    /// Create a pool pre-stocked with `count` placeholder units.
    ///
    /// The capacity is raised to `count` if the configured one is smaller.
    pub fn with_units(config: PoolConfig, count: usize) -> Self {
        let mut pool = Self::new(config);
        if count > pool.capacity {
            pool.stock.reserve_exact(count - pool.capacity);
            pool.capacity = count;
        }
        pool.stock.extend((0..count).map(|_| Unit::placeholder()));
        pool.created = count as u64;
        pool
    }

    /// Take a unit out of the pool.
    ///
    /// Returns the most recently released unit, or a new placeholder
    /// (no owner, sentinel identity) when the stock is empty. Callers are
    /// expected to [`stamp`](Unit::stamp) the unit before inserting it.
    pub fn request(&mut self) -> Unit {
        match self.stock.pop() {
            Some(unit) => unit,
            None => {
                self.created += 1;
                Unit::placeholder()
            }
        }
    }

    /// Return a unit to the pool.
    ///
    /// Clears the owner so the unit reads as invalid to anything still
    /// holding its identity. The caller must already have removed it from
    /// its population.
    pub fn release(&mut self, mut unit: Unit) {
        unit.owner = None;
        if self.stock.len() == self.capacity {
            self.stock.reserve_exact(self.grow_by);
            self.capacity += self.grow_by;
            log::debug!(
                "unit pool full at {} units, grown to {}",
                self.stock.len(),
                self.capacity
            );
        }
        self.stock.push(unit);
    }

    /// Number of units ready to be handed out.
    pub fn available(&self) -> usize {
        self.stock.len()
    }

    /// Whether the stock is empty.
    pub fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }

    /// Current logical capacity of the stock.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total placeholder units this pool has ever constructed.
    pub fn created(&self) -> u64 {
        self.created
    }
}

impl Default for UnitPool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roost_core::{SiteId, UnitId, UnitKind};

    #[test]
    fn empty_pool_hands_out_invalid_placeholder() {
        let mut pool = UnitPool::new(PoolConfig::new(4));
        let unit = pool.request();
        assert!(!unit.is_valid());
        assert!(unit.id.is_sentinel());
        assert_eq!(pool.created(), 1);
    }

    #[test]
    fn release_clears_owner() {
        let mut pool = UnitPool::new(PoolConfig::new(4));
        let mut unit = pool.request();
        unit.stamp(UnitId::new(0, 1), UnitKind(1), 0);
        unit.owner = Some(SiteId(2));
        pool.release(unit);
        let back = pool.request();
        assert_eq!(back.owner, None);
        assert_eq!(back.id, UnitId::new(0, 1));
    }

    #[test]
    fn reuse_is_lifo() {
        let mut pool = UnitPool::new(PoolConfig::new(4));
        for serial in 0..3 {
            let mut unit = Unit::placeholder();
            unit.stamp(UnitId::new(0, serial), UnitKind(1), 0);
            pool.release(unit);
        }
        assert_eq!(pool.request().id.serial, 2);
        assert_eq!(pool.request().id.serial, 1);
        assert_eq!(pool.request().id.serial, 0);
    }

    #[test]
    fn full_pool_grows_by_fixed_increment() {
        let mut pool = UnitPool::new(PoolConfig {
            initial_capacity: 2,
            grow_by: 3,
        });
        pool.release(Unit::placeholder());
        pool.release(Unit::placeholder());
        assert_eq!(pool.capacity(), 2);
        pool.release(Unit::placeholder());
        assert_eq!(pool.capacity(), 5);
        assert_eq!(pool.available(), 3);
    }

    #[test]
    fn with_units_prefills_stock() {
        let pool = UnitPool::with_units(PoolConfig::new(2), 10);
        assert_eq!(pool.available(), 10);
        assert!(pool.capacity() >= 10);
        assert_eq!(pool.created(), 10);
    }

    #[test]
    fn request_release_round_trip_keeps_available_count() {
        let mut pool = UnitPool::with_units(PoolConfig::new(8), 8);
        for _ in 0..100 {
            let unit = pool.request();
            pool.release(unit);
        }
        assert_eq!(pool.available(), 8);
        assert_eq!(pool.created(), 8);
    }

    #[test]
    #[should_panic(expected = "growth increment")]
    fn zero_growth_rejected() {
        let _ = UnitPool::new(PoolConfig {
            initial_capacity: 1,
            grow_by: 0,
        });
    }
}
