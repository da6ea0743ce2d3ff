//! Benchmark profiles for the Roost simulator.
//!
//! Provides pre-built [`WorldConfig`] networks for benchmarks:
//!
//! - [`reference_network`]: 4 origins feeding 2 brokers, 3 marketplaces and 6 resellers
//! - [`stress_network`]: the same shape at 10x the site capacities

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use roost_core::UnitKind;
use roost_engine::{SiteConfig, SiteKind, WorldConfig};

/// Unit kinds traded in the benchmark networks.
pub const KINDS: [UnitKind; 2] = [UnitKind(1), UnitKind(2)];

/// Build the reference network.
///
/// Sites are laid out in registry order: origins, then brokers, then
/// marketplaces, then resellers. Origins alternate between the two kinds;
/// every other site trades both.
pub fn reference_network(seed: u64) -> WorldConfig {
    network(seed, 1)
}

/// Build the stress network: [`reference_network`] with every capacity
/// multiplied by 10.
pub fn stress_network(seed: u64) -> WorldConfig {
    network(seed, 10)
}

/// Number of origin sites in both networks. Origins are `SiteId(0..ORIGINS)`.
pub const ORIGINS: u32 = 4;

fn network(seed: u64, scale: usize) -> WorldConfig {
    let mut sites = Vec::new();
    for i in 0..ORIGINS as usize {
        sites.push(SiteConfig::new(
            SiteKind::Origin,
            2_000 * scale,
            [KINDS[i % KINDS.len()]],
        ));
    }
    for _ in 0..2 {
        sites.push(SiteConfig::new(SiteKind::Broker, 1_000 * scale, KINDS));
    }
    for _ in 0..3 {
        sites.push(SiteConfig::new(SiteKind::Marketplace, 5_000 * scale, KINDS));
    }
    for _ in 0..6 {
        sites.push(SiteConfig::new(SiteKind::Reseller, 300 * scale, KINDS));
    }
    let mut config = WorldConfig::new(sites);
    config.prefill = 8_000 * scale;
    config.seed = seed;
    config
}
