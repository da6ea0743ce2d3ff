//! World configuration, validation, and error types.
//!
//! [`WorldConfig`] is the builder-input for constructing a
//! [`World`](crate::World). [`validate()`](WorldConfig::validate) checks
//! structural invariants at startup so that no later operation can reach a
//! population contract violation through a bad configuration.

use std::error::Error;
use std::fmt;

use roost_arena::PoolConfig;
use roost_core::{SiteId, TradedKinds, UnitKind};

use crate::holder::SiteKind;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`WorldConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// No sites configured.
    NoSites,
    /// Site count exceeds `u32::MAX`.
    SiteCountOverflow {
        /// The configured count.
        value: usize,
    },
    /// A site was configured with zero capacity.
    ZeroCapacity {
        /// The offending site.
        site: SiteId,
    },
    /// A site capacity exceeds `u32::MAX` (slot indices are `u32`).
    CapacityOverflow {
        /// The offending site.
        site: SiteId,
        /// The configured capacity.
        capacity: usize,
    },
    /// A site trades no unit kind.
    NoTradedKinds {
        /// The offending site.
        site: SiteId,
    },
    /// A site lists a unit kind that is invalid or repeated.
    InvalidTradedKind {
        /// The offending site.
        site: SiteId,
        /// The offending kind.
        kind: UnitKind,
    },
    /// Unit pool growth increment is zero.
    PoolGrowthZero,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSites => write!(f, "no sites configured"),
            Self::SiteCountOverflow { value } => {
                write!(f, "site count {value} exceeds u32::MAX")
            }
            Self::ZeroCapacity { site } => write!(f, "site {site} has zero capacity"),
            Self::CapacityOverflow { site, capacity } => {
                write!(f, "site {site} capacity {capacity} exceeds u32::MAX")
            }
            Self::NoTradedKinds { site } => write!(f, "site {site} trades no unit kind"),
            Self::InvalidTradedKind { site, kind } => {
                write!(f, "site {site} lists invalid or repeated unit kind {kind}")
            }
            Self::PoolGrowthZero => write!(f, "pool grow_by must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

// ── SiteConfig ─────────────────────────────────────────────────────

/// Configuration for one site. Its [`SiteId`] is its position in
/// [`WorldConfig::sites`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteConfig {
    /// Holder kind.
    pub kind: SiteKind,
    /// Maximum number of units held at once.
    pub capacity: usize,
    /// Unit kinds the site accepts.
    pub traded: TradedKinds,
}

impl SiteConfig {
    /// Create a site config trading the given kinds.
    pub fn new(
        kind: SiteKind,
        capacity: usize,
        traded: impl IntoIterator<Item = UnitKind>,
    ) -> Self {
        Self {
            kind,
            capacity,
            traded: traded.into_iter().collect(),
        }
    }
}

// ── WorldConfig ────────────────────────────────────────────────────

/// Complete configuration for constructing a simulation world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Site definitions. `SiteId(n)` corresponds to `sites[n]`.
    pub sites: Vec<SiteConfig>,
    /// Unit pool sizing.
    pub pool: PoolConfig,
    /// Units constructed up front in the pool. Default: 0.
    pub prefill: usize,
    /// RNG seed for deterministic simulation.
    pub seed: u64,
}

impl WorldConfig {
    /// Default RNG seed.
    pub const DEFAULT_SEED: u64 = 0;

    /// Create a config for `sites` with default pool settings.
    pub fn new(sites: Vec<SiteConfig>) -> Self {
        Self {
            sites,
            pool: PoolConfig::default(),
            prefill: 0,
            seed: Self::DEFAULT_SEED,
        }
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Must have at least one site.
        if self.sites.is_empty() {
            return Err(ConfigError::NoSites);
        }
        // 1a. Site count must fit in u32 (SiteId is u32).
        if u32::try_from(self.sites.len()).is_err() {
            return Err(ConfigError::SiteCountOverflow {
                value: self.sites.len(),
            });
        }
        for (i, site) in self.sites.iter().enumerate() {
            let id = SiteId(i as u32);
            // 2. Capacity in 1..=u32::MAX.
            if site.capacity == 0 {
                return Err(ConfigError::ZeroCapacity { site: id });
            }
            if u32::try_from(site.capacity).is_err() {
                return Err(ConfigError::CapacityOverflow {
                    site: id,
                    capacity: site.capacity,
                });
            }
            // 3. Traded kinds non-empty, distinct, never NONE.
            if site.traded.is_empty() {
                return Err(ConfigError::NoTradedKinds { site: id });
            }
            for (j, &kind) in site.traded.iter().enumerate() {
                if kind == UnitKind::NONE || site.traded[..j].contains(&kind) {
                    return Err(ConfigError::InvalidTradedKind { site: id, kind });
                }
            }
        }
        // 4. Pool must be able to grow.
        if self.pool.grow_by == 0 {
            return Err(ConfigError::PoolGrowthZero);
        }
        Ok(())
    }

    /// Every unit kind traded by at least one site, in first-seen order.
    pub fn unit_kinds(&self) -> TradedKinds {
        let mut kinds = TradedKinds::new();
        for kind in self.sites.iter().flat_map(|s| s.traded.iter().copied()) {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }
}
