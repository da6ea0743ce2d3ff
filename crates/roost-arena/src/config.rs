//! Unit pool configuration parameters.

/// Configuration for the [`UnitPool`](crate::UnitPool).
///
/// Controls how much stock is reserved up front and by how much the stock
/// grows once it fills up. Both values are immutable after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of released units the pool can hold before it first grows.
    ///
    /// Default: 1024.
    pub initial_capacity: usize,

    /// Number of extra stock entries added each time the pool fills up.
    ///
    /// Default: 100_000. Must be at least 1.
    pub grow_by: usize,
}

impl PoolConfig {
    /// Default initial stock capacity.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

    /// Default growth increment.
    pub const DEFAULT_GROW_BY: usize = 100_000;

    /// Create a config with the given initial capacity and default growth.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            grow_by: Self::DEFAULT_GROW_BY,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_CAPACITY)
    }
}
