//! The simulation driver.
//!
//! [`World`] owns every site, the single [`UnitPool`], and a registry
//! mapping each live [`UnitId`] to where it is stored. Units carry no
//! pointer to their owner; the registry resolves an identity to a
//! `(site, slot)` pair, and slots stay fixed for as long as a unit stays at
//! a site.
//!
//! Every public operation checks its preconditions (site exists, kind is
//! traded, capacity is left, strain fits a [`StrainSet`]) before touching
//! storage, so storage contract panics are unreachable through this API.

use indexmap::IndexMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use roost_arena::{InvariantViolation, UnitPool};
use roost_core::{SiteError, SiteId, SlotIndex, StrainId, StrainSet, Unit, UnitId, UnitKind};

use crate::config::{ConfigError, WorldConfig};
use crate::holder::{Holder, HoldsUnits, SiteKind};

/// Where a live unit is stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    /// Owning site.
    pub site: SiteId,
    /// Stable handle inside that site's population.
    pub slot: SlotIndex,
}

/// A trade network of sites plus the pool their units cycle through.
pub struct World {
    sites: Vec<Holder>,
    pool: UnitPool,
    locations: IndexMap<UnitId, Location>,
    rng: ChaCha8Rng,
    seed: u64,
    run: u32,
}

impl World {
    /// Validate `config` and build an empty world.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let sites: Vec<Holder> = config
            .sites
            .iter()
            .enumerate()
            .map(|(i, site)| Holder::new(SiteId(i as u32), site))
            .collect();
        let capacity: usize = config.sites.iter().map(|s| s.capacity).sum();
        log::info!(
            "world created: {} sites, {} unit kinds, total capacity {capacity}, seed {}",
            sites.len(),
            config.unit_kinds().len(),
            config.seed
        );
        Ok(Self {
            sites,
            pool: UnitPool::with_units(config.pool, config.prefill),
            locations: IndexMap::with_capacity(capacity),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            seed: config.seed,
            run: 0,
        })
    }

    // ── Unit lifecycle ──────────────────────────────────────────

    /// Create a unit of `kind` at origin site `site`.
    ///
    /// The unit is taken from the pool, given a fresh identity minted by
    /// the origin, and stored susceptible.
    pub fn spawn(&mut self, site: SiteId, kind: UnitKind, born: u32) -> Result<UnitId, SiteError> {
        Self::check_accepts(self.site_ref(site)?, kind)?;
        let origin = self
            .sites
            .get_mut(site.0 as usize)
            .and_then(Holder::as_origin_mut)
            .ok_or(SiteError::WrongSiteKind {
                site,
                operation: "spawn",
            })?;
        let id = origin.mint().ok_or(SiteError::SerialsExhausted { site })?;

        let mut unit = self.pool.request();
        unit.stamp(id, kind, born);
        let slot = origin.insert(unit);
        self.locations.insert(id, Location { site, slot });
        Ok(id)
    }

    /// Move unit `id` to site `to` and return its new slot.
    ///
    /// Fails without side effects if the destination is missing, full, or
    /// does not trade the unit's kind.
    pub fn transfer(&mut self, id: UnitId, to: SiteId) -> Result<SlotIndex, SiteError> {
        let from = self.locate(id)?;
        if from.site == to {
            return Err(SiteError::SelfTransfer { site: to });
        }
        let kind = self.stored_kind(from)?;
        if let Err(err) = Self::check_accepts(self.site_ref(to)?, kind) {
            log::debug!("transfer of {id} from site {} rejected: {err}", from.site);
            return Err(err);
        }

        let unit = self.site_ref_mut(from.site)?.remove(from.slot);
        let slot = self.site_ref_mut(to)?.insert(unit);
        self.locations.insert(id, Location { site: to, slot });
        Ok(slot)
    }

    /// Unit `id` died: remove it through the death hook and recycle it.
    pub fn cull(&mut self, id: UnitId) -> Result<(), SiteError> {
        let loc = self.locate(id)?;
        let unit = self.site_ref_mut(loc.site)?.remove_dead(loc.slot);
        self.retire(id, unit);
        Ok(())
    }

    /// Unit `id` left the simulation normally (sold to an end buyer,
    /// experiment finished): remove it and recycle it.
    pub fn sell(&mut self, id: UnitId) -> Result<(), SiteError> {
        let loc = self.locate(id)?;
        let unit = self.site_ref_mut(loc.site)?.remove(loc.slot);
        self.retire(id, unit);
        Ok(())
    }

    // ── Infection events ────────────────────────────────────────

    /// Infect unit `id` with `strain`.
    ///
    /// Returns `Ok(false)` if the unit is no longer in the simulation,
    /// which is expected for events scheduled before the unit left. The
    /// owning site is told to swap only when the unit becomes infectious.
    ///
    /// Fails with [`SiteError::StrainOutOfRange`] for a strain a
    /// [`StrainSet`] cannot hold.
    pub fn infect(&mut self, id: UnitId, strain: StrainId) -> Result<bool, SiteError> {
        if strain.0 >= StrainSet::CAPACITY {
            return Err(SiteError::StrainOutOfRange { strain });
        }
        let Some((site, slot)) = self.live_unit(id) else {
            return Ok(false);
        };
        let flipped = site
            .unit_mut(slot)
            .is_some_and(|unit| unit.acquire(strain));
        if flipped {
            site.swap_to_infected(slot);
        }
        Ok(true)
    }

    /// Clear `strain` from unit `id`.
    ///
    /// Returns `false` if the unit is no longer in the simulation. The
    /// owning site is told to swap only when the unit stops being
    /// infectious.
    pub fn recover(&mut self, id: UnitId, strain: StrainId) -> bool {
        let Some((site, slot)) = self.live_unit(id) else {
            return false;
        };
        let flipped = site
            .unit_mut(slot)
            .is_some_and(|unit| unit.clear_strain(strain));
        if flipped {
            site.swap_to_susceptible(slot);
        }
        true
    }

    // ── Routing ─────────────────────────────────────────────────

    /// Queue unit `id`, held by a broker, for dispatch to `destination`.
    pub fn route(&mut self, id: UnitId, destination: SiteId) -> Result<(), SiteError> {
        let loc = self.locate(id)?;
        self.site_ref(destination)?;
        let broker = self
            .site_ref_mut(loc.site)?
            .as_broker_mut()
            .ok_or(SiteError::WrongSiteKind {
                site: loc.site,
                operation: "route",
            })?;
        broker.route(loc.slot, destination);
        Ok(())
    }

    /// Dispatch the next unit of `kind` that `broker` has queued for
    /// `destination`.
    ///
    /// Returns `Ok(None)` when nothing is waiting. Destination checks run
    /// before the queue is touched, so a rejected dispatch loses no entry.
    pub fn dispatch(
        &mut self,
        broker: SiteId,
        kind: UnitKind,
        destination: SiteId,
    ) -> Result<Option<UnitId>, SiteError> {
        if broker == destination {
            return Err(SiteError::SelfTransfer { site: broker });
        }
        Self::check_accepts(self.site_ref(destination)?, kind)?;
        let source = self.site_ref_mut(broker)?;
        let Some(slot) = source
            .as_broker_mut()
            .ok_or(SiteError::WrongSiteKind {
                site: broker,
                operation: "dispatch",
            })?
            .next_for(kind, destination)
        else {
            return Ok(None);
        };
        let unit = source.remove(slot);
        let id = unit.id;
        let new_slot = self.site_ref_mut(destination)?.insert(unit);
        self.locations.insert(
            id,
            Location {
                site: destination,
                slot: new_slot,
            },
        );
        Ok(Some(id))
    }

    // ── Runs ────────────────────────────────────────────────────

    /// End the current run: return every unit to the pool and clear all
    /// per-run state. Sites, the pool and origin serial counters persist.
    pub fn reset(&mut self) {
        let live = self.locations.len();
        for site in &mut self.sites {
            site.reset(&mut self.pool);
        }
        self.locations.clear();
        self.run += 1;
        log::info!(
            "run {} reset: {live} units returned, {} pooled",
            self.run,
            self.pool.available()
        );
    }

    /// Number of completed resets.
    pub fn run(&self) -> u32 {
        self.run
    }

    /// Seed the world's RNG was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    // ── Queries ─────────────────────────────────────────────────

    /// The live unit with identity `id`.
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        let loc = self.locations.get(&id)?;
        self.sites.get(loc.site.0 as usize)?.unit(loc.slot)
    }

    /// Where unit `id` is stored.
    pub fn location(&self, id: UnitId) -> Option<Location> {
        self.locations.get(&id).copied()
    }

    /// The site registered as `id`.
    pub fn site(&self, id: SiteId) -> Option<&Holder> {
        self.sites.get(id.0 as usize)
    }

    /// Mutable access to a site.
    ///
    /// Storage changes made through this handle bypass the unit registry;
    /// use the lifecycle methods on [`World`] to move units.
    pub fn site_mut(&mut self, id: SiteId) -> Option<&mut Holder> {
        self.sites.get_mut(id.0 as usize)
    }

    /// All sites in registry order.
    pub fn sites(&self) -> &[Holder] {
        &self.sites
    }

    /// Sites of one kind.
    pub fn sites_of(&self, kind: SiteKind) -> impl Iterator<Item = &Holder> + '_ {
        self.sites.iter().filter(move |s| s.kind() == kind)
    }

    /// Units currently in the simulation.
    pub fn live_units(&self) -> usize {
        self.locations.len()
    }

    /// Infectious units across every site.
    pub fn infectious_units(&self) -> usize {
        self.sites.iter().map(|s| s.len_infectious()).sum()
    }

    /// The shared unit pool.
    pub fn pool(&self) -> &UnitPool {
        &self.pool
    }

    /// A uniformly chosen unit held at `site`.
    pub fn random_unit(&mut self, site: SiteId) -> Result<Option<UnitId>, SiteError> {
        let holder = self
            .sites
            .get(site.0 as usize)
            .ok_or(SiteError::UnknownSite { site })?;
        Ok(holder.random_unit(&mut self.rng).map(|u| u.id))
    }

    /// Run the population self-check on every site.
    pub fn check_invariants(&self) -> Result<(), (SiteId, InvariantViolation)> {
        for site in &self.sites {
            site.population()
                .check_invariants()
                .map_err(|v| (site.id(), v))?;
        }
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────

    fn locate(&self, id: UnitId) -> Result<Location, SiteError> {
        self.locations
            .get(&id)
            .copied()
            .ok_or(SiteError::UnknownUnit { unit: id })
    }

    fn site_ref(&self, site: SiteId) -> Result<&Holder, SiteError> {
        self.sites
            .get(site.0 as usize)
            .ok_or(SiteError::UnknownSite { site })
    }

    fn site_ref_mut(&mut self, site: SiteId) -> Result<&mut Holder, SiteError> {
        self.sites
            .get_mut(site.0 as usize)
            .ok_or(SiteError::UnknownSite { site })
    }

    fn stored_kind(&self, loc: Location) -> Result<UnitKind, SiteError> {
        self.site_ref(loc.site)?
            .unit(loc.slot)
            .map(|u| u.kind)
            .ok_or(SiteError::UnknownSite { site: loc.site })
    }

    fn live_unit(&mut self, id: UnitId) -> Option<(&mut Holder, SlotIndex)> {
        let loc = *self.locations.get(&id)?;
        let site = self.sites.get_mut(loc.site.0 as usize)?;
        Some((site, loc.slot))
    }

    fn check_accepts(site: &Holder, kind: UnitKind) -> Result<(), SiteError> {
        if !site.trades(kind) {
            return Err(SiteError::KindNotTraded {
                site: site.id(),
                kind,
            });
        }
        if site.available_space() == 0 {
            return Err(SiteError::SiteFull {
                site: site.id(),
                capacity: site.capacity(),
            });
        }
        Ok(())
    }

    fn retire(&mut self, id: UnitId, unit: Unit) {
        self.locations.swap_remove(&id);
        self.pool.release(unit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use roost_test_utils::init_logging;

    const HEN: UnitKind = UnitKind(1);
    const DUCK: UnitKind = UnitKind(2);
    const FARM: SiteId = SiteId(0);
    const BROKER: SiteId = SiteId(1);
    const MARKET: SiteId = SiteId(2);
    const LAB: SiteId = SiteId(3);

    fn world() -> World {
        init_logging();
        let mut cfg = WorldConfig::new(vec![
            SiteConfig::new(SiteKind::Origin, 8, [HEN]),
            SiteConfig::new(SiteKind::Broker, 4, [HEN, DUCK]),
            SiteConfig::new(SiteKind::Marketplace, 2, [HEN]),
            SiteConfig::new(SiteKind::Experiment, 2, [DUCK]),
        ]);
        cfg.seed = 7;
        World::new(cfg).unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let result = World::new(WorldConfig::new(Vec::new()));
        assert!(matches!(result, Err(ConfigError::NoSites)));
    }

    #[test]
    fn spawn_registers_unit_at_origin() {
        let mut w = world();
        let id = w.spawn(FARM, HEN, 5).unwrap();
        assert_eq!(id, UnitId::new(0, 0));
        let unit = w.unit(id).unwrap();
        assert_eq!(unit.owner, Some(FARM));
        assert_eq!(unit.born, 5);
        assert!(!unit.is_infectious());
        assert_eq!(w.live_units(), 1);
    }

    #[test]
    fn spawn_checks_site_kind_and_traded_kind() {
        let mut w = world();
        assert_eq!(
            w.spawn(MARKET, HEN, 0),
            Err(SiteError::WrongSiteKind {
                site: MARKET,
                operation: "spawn"
            })
        );
        assert_eq!(
            w.spawn(FARM, DUCK, 0),
            Err(SiteError::KindNotTraded {
                site: FARM,
                kind: DUCK
            })
        );
        assert_eq!(
            w.spawn(SiteId(42), HEN, 0),
            Err(SiteError::UnknownSite { site: SiteId(42) })
        );
        assert_eq!(w.live_units(), 0);
    }

    #[test]
    fn transfer_moves_unit_and_updates_registry() {
        let mut w = world();
        let id = w.spawn(FARM, HEN, 0).unwrap();
        let slot = w.transfer(id, BROKER).unwrap();
        assert_eq!(w.location(id), Some(Location { site: BROKER, slot }));
        assert_eq!(w.unit(id).unwrap().owner, Some(BROKER));
        assert_eq!(w.site(FARM).unwrap().len(), 0);
        assert_eq!(w.site(BROKER).unwrap().len(), 1);
    }

    #[test]
    fn rejected_transfer_leaves_unit_in_place() {
        let mut w = world();
        let ids: Vec<_> = (0..3).map(|_| w.spawn(FARM, HEN, 0).unwrap()).collect();
        w.transfer(ids[0], MARKET).unwrap();
        w.transfer(ids[1], MARKET).unwrap();
        assert_eq!(
            w.transfer(ids[2], MARKET),
            Err(SiteError::SiteFull {
                site: MARKET,
                capacity: 2
            })
        );
        assert_eq!(
            w.transfer(ids[2], LAB),
            Err(SiteError::KindNotTraded {
                site: LAB,
                kind: HEN
            })
        );
        assert_eq!(
            w.transfer(ids[2], FARM),
            Err(SiteError::SelfTransfer { site: FARM })
        );
        assert_eq!(w.location(ids[2]).unwrap().site, FARM);
        w.check_invariants().unwrap();
    }

    #[test]
    fn infection_flips_swap_exactly_once() {
        let mut w = world();
        let id = w.spawn(FARM, HEN, 0).unwrap();
        w.spawn(FARM, HEN, 0).unwrap();

        assert_eq!(w.infect(id, StrainId(0)), Ok(true));
        assert_eq!(w.infect(id, StrainId(1)), Ok(true));
        assert_eq!(w.infectious_units(), 1);
        w.check_invariants().unwrap();

        assert!(w.recover(id, StrainId(0)));
        assert_eq!(w.infectious_units(), 1);
        assert!(w.recover(id, StrainId(1)));
        assert_eq!(w.infectious_units(), 0);
        assert!(w.unit(id).unwrap().immunity.contains(StrainId(1)));
        w.check_invariants().unwrap();
    }

    #[test]
    fn events_for_departed_units_are_ignored() {
        let mut w = world();
        let id = w.spawn(FARM, HEN, 0).unwrap();
        w.sell(id).unwrap();
        assert_eq!(w.infect(id, StrainId(0)), Ok(false));
        assert!(!w.recover(id, StrainId(0)));
        assert_eq!(w.cull(id), Err(SiteError::UnknownUnit { unit: id }));
        assert!(w.unit(id).is_none());
    }

    #[test]
    fn cull_and_sell_recycle_units() {
        let mut w = world();
        let a = w.spawn(FARM, HEN, 0).unwrap();
        let b = w.spawn(FARM, HEN, 0).unwrap();
        w.infect(a, StrainId(0)).unwrap();
        w.cull(a).unwrap();
        w.sell(b).unwrap();
        assert_eq!(w.live_units(), 0);
        assert_eq!(w.pool().available(), 2);
        w.check_invariants().unwrap();
    }

    #[test]
    fn broker_routes_and_dispatches() {
        let mut w = world();
        let a = w.spawn(FARM, HEN, 0).unwrap();
        let b = w.spawn(FARM, HEN, 0).unwrap();
        w.transfer(a, BROKER).unwrap();
        w.transfer(b, BROKER).unwrap();
        w.route(a, MARKET).unwrap();
        w.route(b, MARKET).unwrap();

        assert_eq!(w.dispatch(BROKER, HEN, MARKET), Ok(Some(a)));
        assert_eq!(w.location(a).unwrap().site, MARKET);
        assert_eq!(w.unit(a).unwrap().destination, None);
        assert_eq!(w.dispatch(BROKER, HEN, MARKET), Ok(Some(b)));
        assert_eq!(w.dispatch(BROKER, HEN, MARKET).unwrap_err(), SiteError::SiteFull {
            site: MARKET,
            capacity: 2
        });
    }

    #[test]
    fn unit_leaving_broker_keeps_queue_order() {
        let mut w = world();
        let a = w.spawn(FARM, HEN, 0).unwrap();
        let b = w.spawn(FARM, HEN, 0).unwrap();
        let c = w.spawn(FARM, HEN, 0).unwrap();
        for id in [a, b] {
            w.transfer(id, BROKER).unwrap();
            w.route(id, MARKET).unwrap();
        }
        w.transfer(a, FARM).unwrap();
        let slot = w.transfer(c, BROKER).unwrap();
        assert_eq!(w.location(b).unwrap().slot, SlotIndex(1));
        assert_eq!(slot, SlotIndex(0));
        w.route(c, MARKET).unwrap();

        let routes = w.site(BROKER).unwrap().as_broker().unwrap().routes();
        assert_eq!(routes.len_route(HEN, MARKET), 2);
        assert_eq!(w.dispatch(BROKER, HEN, MARKET), Ok(Some(b)));
        assert_eq!(w.dispatch(BROKER, HEN, MARKET), Ok(Some(c)));
        assert!(w.site(BROKER).unwrap().as_broker().unwrap().routes().is_empty());
        w.check_invariants().unwrap();
    }

    #[test]
    fn strain_outside_set_is_rejected() {
        let mut w = world();
        let id = w.spawn(FARM, HEN, 0).unwrap();
        let top = StrainId(StrainSet::CAPACITY - 1);
        assert_eq!(w.infect(id, top), Ok(true));
        for strain in [StrainId(StrainSet::CAPACITY), StrainId(u8::MAX)] {
            assert_eq!(
                w.infect(id, strain),
                Err(SiteError::StrainOutOfRange { strain })
            );
            assert!(w.recover(id, strain));
        }
        assert_eq!(w.unit(id).unwrap().infection.len(), 1);
        assert_eq!(w.infectious_units(), 1);
        w.check_invariants().unwrap();
    }

    #[test]
    fn culled_unit_is_not_dispatched() {
        let mut w = world();
        let a = w.spawn(FARM, HEN, 0).unwrap();
        let b = w.spawn(FARM, HEN, 0).unwrap();
        for id in [a, b] {
            w.transfer(id, BROKER).unwrap();
            w.route(id, MARKET).unwrap();
        }
        w.cull(a).unwrap();
        assert_eq!(w.dispatch(BROKER, HEN, MARKET), Ok(Some(b)));
        assert_eq!(w.dispatch(BROKER, HEN, MARKET), Ok(None));
    }

    #[test]
    fn routing_requires_a_broker() {
        let mut w = world();
        let a = w.spawn(FARM, HEN, 0).unwrap();
        assert_eq!(
            w.route(a, MARKET),
            Err(SiteError::WrongSiteKind {
                site: FARM,
                operation: "route"
            })
        );
        assert_eq!(
            w.dispatch(FARM, HEN, MARKET),
            Err(SiteError::WrongSiteKind {
                site: FARM,
                operation: "dispatch"
            })
        );
    }

    #[test]
    fn reset_returns_every_unit_to_pool() {
        let mut w = world();
        for _ in 0..5 {
            w.spawn(FARM, HEN, 0).unwrap();
        }
        let id = w.spawn(FARM, HEN, 0).unwrap();
        w.transfer(id, BROKER).unwrap();
        w.route(id, MARKET).unwrap();

        w.reset();
        assert_eq!(w.run(), 1);
        assert_eq!(w.live_units(), 0);
        assert_eq!(w.pool().available(), 6);
        assert!(w.sites().iter().all(|s| s.is_empty()));
        let broker = w.site(BROKER).unwrap().as_broker().unwrap();
        assert!(broker.routes().is_empty());

        // Identities keep counting after a reset.
        assert_eq!(w.spawn(FARM, HEN, 0).unwrap(), UnitId::new(0, 6));
        assert_eq!(w.pool().created(), 6);
    }

    #[test]
    fn random_unit_comes_from_requested_site() {
        let mut w = world();
        let ids: Vec<_> = (0..4).map(|_| w.spawn(FARM, HEN, 0).unwrap()).collect();
        for _ in 0..20 {
            let pick = w.random_unit(FARM).unwrap().unwrap();
            assert!(ids.contains(&pick));
        }
        assert_eq!(w.random_unit(MARKET), Ok(None));
        assert!(w.random_unit(SiteId(9)).is_err());
    }
}
