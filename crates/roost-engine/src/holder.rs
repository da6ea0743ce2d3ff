//! Sites that hold units.
//!
//! Every site owns a [`PartitionedPopulation`] wrapped in a [`SiteCore`].
//! The five kinds of site differ only in a few storage hooks, so they are
//! modelled as one closed [`Holder`] enum whose variants all implement
//! [`HoldsUnits`]. The trait's provided methods cover the shared behaviour;
//! a variant overrides a hook only where it has extra bookkeeping:
//!
//! | Kind          | Extra behaviour                                        |
//! |---------------|--------------------------------------------------------|
//! | `Origin`      | mints [`UnitId`]s                                      |
//! | `Broker`      | counts hops, routes units, tombstones on removal       |
//! | `Marketplace` | none                                                   |
//! | `Reseller`    | counts hops                                            |
//! | `Experiment`  | counts repurposing                                     |

use std::fmt;

use rand::Rng;
use roost_arena::{PartitionedPopulation, RouteIndexPool, UnitPool};
use roost_core::{SiteId, SlotIndex, TradedKinds, Unit, UnitId, UnitKind};

use crate::config::SiteConfig;

// ── SiteKind ───────────────────────────────────────────────────────

/// The role a site plays in the trade network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SiteKind {
    /// Produces units.
    Origin,
    /// Collects units and dispatches them along routes.
    Broker,
    /// Sells units to resellers and end buyers.
    Marketplace,
    /// Buys at marketplaces and sells on.
    Reseller,
    /// Holds units for an experimental protocol.
    Experiment,
}

impl SiteKind {
    /// Lower-case name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Origin => "origin",
            Self::Broker => "broker",
            Self::Marketplace => "marketplace",
            Self::Reseller => "reseller",
            Self::Experiment => "experiment",
        }
    }
}

impl fmt::Display for SiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── SiteCore ───────────────────────────────────────────────────────

/// State shared by every kind of site.
#[derive(Clone, Debug)]
pub struct SiteCore {
    /// Registry index of this site.
    pub id: SiteId,
    /// Role of this site.
    pub kind: SiteKind,
    /// Unit kinds this site accepts.
    pub traded: TradedKinds,
    population: PartitionedPopulation,
}

impl SiteCore {
    /// Create an empty site from its configuration.
    pub fn new(id: SiteId, config: &SiteConfig) -> Self {
        Self {
            id,
            kind: config.kind,
            traded: config.traded.clone(),
            population: PartitionedPopulation::new(config.capacity),
        }
    }

    /// Read-only view of the stored units.
    pub fn population(&self) -> &PartitionedPopulation {
        &self.population
    }

    /// Whether this site accepts units of `kind`.
    pub fn trades(&self, kind: UnitKind) -> bool {
        self.traded.contains(&kind)
    }

    /// A uniformly chosen stored unit, or `None` if the site is empty.
    pub fn random_unit<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Unit> {
        if self.population.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.population.len());
        Some(self.population.by_dense(index))
    }

    fn admit(&mut self, mut unit: Unit) -> SlotIndex {
        unit.owner = Some(self.id);
        self.population.insert(unit).0
    }
}

// ── HoldsUnits ─────────────────────────────────────────────────────

/// Storage capability shared by all sites.
///
/// Slot arguments must name an occupied slot of this site; passing a free
/// one panics, as it does on [`PartitionedPopulation`].
pub trait HoldsUnits {
    /// Shared site state.
    fn core(&self) -> &SiteCore;

    /// Mutable shared site state.
    fn core_mut(&mut self) -> &mut SiteCore;

    /// Take ownership of `unit` and return its slot.
    ///
    /// Sets `unit.owner` to this site. The caller has already checked
    /// [`available_space`](Self::available_space).
    fn insert(&mut self, unit: Unit) -> SlotIndex {
        self.core_mut().admit(unit)
    }

    /// Hand back the unit in `slot` on a normal exit (sale, transfer).
    fn remove(&mut self, slot: SlotIndex) -> Unit {
        self.core_mut().population.remove(slot)
    }

    /// Hand back the unit in `slot` because it died.
    fn remove_dead(&mut self, slot: SlotIndex) -> Unit {
        self.remove(slot)
    }

    /// Report that the unit in `slot` became infectious.
    fn swap_to_infected(&mut self, slot: SlotIndex) {
        self.core_mut().population.swap_to_infected(slot);
    }

    /// Report that the unit in `slot` stopped being infectious.
    fn swap_to_susceptible(&mut self, slot: SlotIndex) {
        self.core_mut().population.swap_to_susceptible(slot);
    }

    /// The unit in `slot`, if occupied.
    fn unit(&self, slot: SlotIndex) -> Option<&Unit> {
        self.core().population.get(slot)
    }

    /// Mutable access to the unit in `slot`.
    ///
    /// A change to the unit's infection set that flips
    /// [`Unit::is_infectious`] must be followed by the matching swap.
    fn unit_mut(&mut self, slot: SlotIndex) -> Option<&mut Unit> {
        self.core_mut().population.get_mut(slot)
    }

    /// Units held.
    fn len(&self) -> usize {
        self.core().population.len()
    }

    /// Whether the site holds no unit.
    fn is_empty(&self) -> bool {
        self.core().population.is_empty()
    }

    /// Infectious units held.
    fn len_infectious(&self) -> usize {
        self.core().population.len_infectious()
    }

    /// Fixed capacity.
    fn capacity(&self) -> usize {
        self.core().population.capacity()
    }

    /// Free slots left.
    fn available_space(&self) -> usize {
        self.core().population.available_space()
    }

    /// Whether this site accepts units of `kind`.
    fn trades(&self, kind: UnitKind) -> bool {
        self.core().trades(kind)
    }

    /// Read-only view of the stored units.
    fn population(&self) -> &PartitionedPopulation {
        self.core().population()
    }

    /// Return every held unit to `pool` and clear per-run state.
    fn reset(&mut self, pool: &mut UnitPool) {
        self.core_mut().population.drain(pool);
    }
}

// ── Site kinds ─────────────────────────────────────────────────────

/// A site where units enter the simulation.
#[derive(Clone, Debug)]
pub struct Origin {
    core: SiteCore,
    next_serial: u32,
}

impl Origin {
    /// Create an empty origin site.
    pub fn new(core: SiteCore) -> Self {
        Self {
            core,
            next_serial: 0,
        }
    }

    /// Mint the next identity for a unit born here.
    ///
    /// Serials keep counting across runs, so an identity is never reused
    /// within a process. Returns `None` once every `u32` serial is spent.
    pub fn mint(&mut self) -> Option<UnitId> {
        let serial = self.next_serial;
        self.next_serial = serial.checked_add(1)?;
        Some(UnitId::new(self.core.id.0, serial))
    }

    /// Number of identities minted so far.
    pub fn minted(&self) -> u32 {
        self.next_serial
    }
}

impl HoldsUnits for Origin {
    fn core(&self) -> &SiteCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SiteCore {
        &mut self.core
    }
}

/// A site that collects units and dispatches them along routes.
///
/// Routed units are tracked in a [`RouteIndexPool`] by slot, so the order
/// of dispatch is independent of where the population keeps them.
#[derive(Clone, Debug)]
pub struct Broker {
    core: SiteCore,
    routes: RouteIndexPool,
}

impl Broker {
    /// Create an empty broker with route tables for its traded kinds.
    pub fn new(core: SiteCore) -> Self {
        let routes = RouteIndexPool::new(core.traded.iter().copied());
        Self { core, routes }
    }

    /// The broker's route queues.
    pub fn routes(&self) -> &RouteIndexPool {
        &self.routes
    }

    /// Queue the unit in `slot` for dispatch to `destination`.
    ///
    /// A unit that was already routed elsewhere is withdrawn from its old
    /// queue first, so each unit sits in at most one queue.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is free.
    pub fn route(&mut self, slot: SlotIndex, destination: SiteId) {
        let unit = self.core.population.by_slot_mut(slot);
        let kind = unit.kind;
        if let Some(previous) = unit.destination.replace(destination) {
            self.routes.mark_invalid(kind, previous, slot);
        }
        self.routes.insert(kind, destination, slot);
    }

    /// Pop the next unit of `kind` waiting for `destination` and clear its
    /// destination, so the unit is no longer routed.
    ///
    /// Entries whose slot no longer holds a matching unit are discarded on
    /// the way.
    pub fn next_for(&mut self, kind: UnitKind, destination: SiteId) -> Option<SlotIndex> {
        loop {
            let slot = self.routes.pop_front(kind, destination)?;
            let matches = self
                .core
                .population
                .get(slot)
                .is_some_and(|u| u.kind == kind && u.destination == Some(destination));
            if matches {
                self.core.population.by_slot_mut(slot).destination = None;
                return Some(slot);
            }
        }
    }

    /// Destinations with units of `kind` waiting.
    pub fn pending_destinations(&self, kind: UnitKind) -> Vec<SiteId> {
        self.routes.non_empty_destinations(kind)
    }

    /// Remove the unit in `slot`, tombstoning its route entry if it is
    /// still queued.
    fn withdraw(&mut self, slot: SlotIndex) -> Unit {
        let mut unit = self.core.population.remove(slot);
        if let Some(destination) = unit.destination.take() {
            self.routes.mark_invalid(unit.kind, destination, slot);
        }
        unit
    }
}

impl HoldsUnits for Broker {
    fn core(&self) -> &SiteCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SiteCore {
        &mut self.core
    }

    fn insert(&mut self, mut unit: Unit) -> SlotIndex {
        unit.movements.record_broker();
        unit.destination = None;
        self.core.admit(unit)
    }

    fn remove(&mut self, slot: SlotIndex) -> Unit {
        self.withdraw(slot)
    }

    fn remove_dead(&mut self, slot: SlotIndex) -> Unit {
        self.withdraw(slot)
    }

    fn reset(&mut self, pool: &mut UnitPool) {
        self.core.population.drain(pool);
        self.routes.clear();
    }
}

/// A site where units are sold.
#[derive(Clone, Debug)]
pub struct Marketplace {
    core: SiteCore,
}

impl Marketplace {
    /// Create an empty marketplace.
    pub fn new(core: SiteCore) -> Self {
        Self { core }
    }
}

impl HoldsUnits for Marketplace {
    fn core(&self) -> &SiteCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SiteCore {
        &mut self.core
    }
}

/// A site that buys at marketplaces and sells on.
#[derive(Clone, Debug)]
pub struct Reseller {
    core: SiteCore,
}

impl Reseller {
    /// Create an empty reseller.
    pub fn new(core: SiteCore) -> Self {
        Self { core }
    }
}

impl HoldsUnits for Reseller {
    fn core(&self) -> &SiteCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SiteCore {
        &mut self.core
    }

    fn insert(&mut self, mut unit: Unit) -> SlotIndex {
        unit.movements.record_reseller();
        self.core.admit(unit)
    }
}

/// A group of units held for an experimental protocol.
#[derive(Clone, Debug)]
pub struct Experiment {
    core: SiteCore,
}

impl Experiment {
    /// Create an empty experiment group.
    pub fn new(core: SiteCore) -> Self {
        Self { core }
    }
}

impl HoldsUnits for Experiment {
    fn core(&self) -> &SiteCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SiteCore {
        &mut self.core
    }

    fn insert(&mut self, mut unit: Unit) -> SlotIndex {
        unit.movements.record_repurpose();
        self.core.admit(unit)
    }
}

// ── Holder ─────────────────────────────────────────────────────────

/// Any site in the network.
#[derive(Clone, Debug)]
pub enum Holder {
    /// See [`Origin`].
    Origin(Origin),
    /// See [`Broker`].
    Broker(Broker),
    /// See [`Marketplace`].
    Marketplace(Marketplace),
    /// See [`Reseller`].
    Reseller(Reseller),
    /// See [`Experiment`].
    Experiment(Experiment),
}

impl Holder {
    /// Build an empty site of the configured kind.
    pub fn new(id: SiteId, config: &SiteConfig) -> Self {
        let core = SiteCore::new(id, config);
        match config.kind {
            SiteKind::Origin => Self::Origin(Origin::new(core)),
            SiteKind::Broker => Self::Broker(Broker::new(core)),
            SiteKind::Marketplace => Self::Marketplace(Marketplace::new(core)),
            SiteKind::Reseller => Self::Reseller(Reseller::new(core)),
            SiteKind::Experiment => Self::Experiment(Experiment::new(core)),
        }
    }

    /// Registry index of this site.
    pub fn id(&self) -> SiteId {
        self.core().id
    }

    /// Role of this site.
    pub fn kind(&self) -> SiteKind {
        match self {
            Self::Origin(_) => SiteKind::Origin,
            Self::Broker(_) => SiteKind::Broker,
            Self::Marketplace(_) => SiteKind::Marketplace,
            Self::Reseller(_) => SiteKind::Reseller,
            Self::Experiment(_) => SiteKind::Experiment,
        }
    }

    /// The origin behind this holder, if it is one.
    pub fn as_origin_mut(&mut self) -> Option<&mut Origin> {
        match self {
            Self::Origin(origin) => Some(origin),
            _ => None,
        }
    }

    /// The broker behind this holder, if it is one.
    pub fn as_broker(&self) -> Option<&Broker> {
        match self {
            Self::Broker(broker) => Some(broker),
            _ => None,
        }
    }

    /// Mutable broker access.
    pub fn as_broker_mut(&mut self) -> Option<&mut Broker> {
        match self {
            Self::Broker(broker) => Some(broker),
            _ => None,
        }
    }

    /// A uniformly chosen stored unit, or `None` if the site is empty.
    pub fn random_unit<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Unit> {
        self.core().random_unit(rng)
    }
}

impl HoldsUnits for Holder {
    fn core(&self) -> &SiteCore {
        match self {
            Self::Origin(s) => s.core(),
            Self::Broker(s) => s.core(),
            Self::Marketplace(s) => s.core(),
            Self::Reseller(s) => s.core(),
            Self::Experiment(s) => s.core(),
        }
    }

    fn core_mut(&mut self) -> &mut SiteCore {
        match self {
            Self::Origin(s) => s.core_mut(),
            Self::Broker(s) => s.core_mut(),
            Self::Marketplace(s) => s.core_mut(),
            Self::Reseller(s) => s.core_mut(),
            Self::Experiment(s) => s.core_mut(),
        }
    }

    fn insert(&mut self, unit: Unit) -> SlotIndex {
        match self {
            Self::Origin(s) => s.insert(unit),
            Self::Broker(s) => s.insert(unit),
            Self::Marketplace(s) => s.insert(unit),
            Self::Reseller(s) => s.insert(unit),
            Self::Experiment(s) => s.insert(unit),
        }
    }

    fn remove(&mut self, slot: SlotIndex) -> Unit {
        match self {
            Self::Origin(s) => s.remove(slot),
            Self::Broker(s) => s.remove(slot),
            Self::Marketplace(s) => s.remove(slot),
            Self::Reseller(s) => s.remove(slot),
            Self::Experiment(s) => s.remove(slot),
        }
    }

    fn remove_dead(&mut self, slot: SlotIndex) -> Unit {
        match self {
            Self::Origin(s) => s.remove_dead(slot),
            Self::Broker(s) => s.remove_dead(slot),
            Self::Marketplace(s) => s.remove_dead(slot),
            Self::Reseller(s) => s.remove_dead(slot),
            Self::Experiment(s) => s.remove_dead(slot),
        }
    }

    fn swap_to_infected(&mut self, slot: SlotIndex) {
        match self {
            Self::Origin(s) => s.swap_to_infected(slot),
            Self::Broker(s) => s.swap_to_infected(slot),
            Self::Marketplace(s) => s.swap_to_infected(slot),
            Self::Reseller(s) => s.swap_to_infected(slot),
            Self::Experiment(s) => s.swap_to_infected(slot),
        }
    }

    fn swap_to_susceptible(&mut self, slot: SlotIndex) {
        match self {
            Self::Origin(s) => s.swap_to_susceptible(slot),
            Self::Broker(s) => s.swap_to_susceptible(slot),
            Self::Marketplace(s) => s.swap_to_susceptible(slot),
            Self::Reseller(s) => s.swap_to_susceptible(slot),
            Self::Experiment(s) => s.swap_to_susceptible(slot),
        }
    }

    fn reset(&mut self, pool: &mut UnitPool) {
        match self {
            Self::Origin(s) => s.reset(pool),
            Self::Broker(s) => s.reset(pool),
            Self::Marketplace(s) => s.reset(pool),
            Self::Reseller(s) => s.reset(pool),
            Self::Experiment(s) => s.reset(pool),
        }
    }
}

impl fmt::Display for Holder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use roost_core::StrainId;
    use roost_test_utils::{infectious_unit, susceptible_unit, DEFAULT_KIND};

    fn holder(kind: SiteKind, capacity: usize) -> Holder {
        Holder::new(SiteId(3), &SiteConfig::new(kind, capacity, [DEFAULT_KIND]))
    }

    #[test]
    fn insert_stamps_owner() {
        let mut site = holder(SiteKind::Marketplace, 4);
        let slot = site.insert(susceptible_unit(1));
        assert_eq!(site.unit(slot).unwrap().owner, Some(SiteId(3)));
        assert_eq!(site.len(), 1);
        assert_eq!(site.available_space(), 3);
    }

    #[test]
    fn origin_mints_sequential_ids() {
        let mut site = holder(SiteKind::Origin, 1);
        let origin = site.as_origin_mut().unwrap();
        assert_eq!(origin.mint(), Some(UnitId::new(3, 0)));
        assert_eq!(origin.mint(), Some(UnitId::new(3, 1)));
        assert_eq!(origin.minted(), 2);
    }

    #[test]
    fn origin_stops_minting_when_serials_run_out() {
        let mut site = holder(SiteKind::Origin, 1);
        let origin = site.as_origin_mut().unwrap();
        origin.next_serial = u32::MAX - 1;
        assert_eq!(origin.mint(), Some(UnitId::new(3, u32::MAX - 1)));
        assert_eq!(origin.mint(), None);
        assert_eq!(origin.mint(), None);
        assert_eq!(origin.minted(), u32::MAX);
    }

    #[test]
    fn kind_matches_variant() {
        for kind in [
            SiteKind::Origin,
            SiteKind::Broker,
            SiteKind::Marketplace,
            SiteKind::Reseller,
            SiteKind::Experiment,
        ] {
            let site = holder(kind, 1);
            assert_eq!(site.kind(), kind);
            assert_eq!(site.core().kind, kind);
        }
        assert_eq!(holder(SiteKind::Broker, 1).to_string(), "broker 3");
    }

    #[test]
    fn movement_counters_follow_site_kind() {
        let mut broker = holder(SiteKind::Broker, 2);
        let slot = broker.insert(susceptible_unit(1));
        assert_eq!(broker.unit(slot).unwrap().movements.broker_hops, 1);

        let mut reseller = holder(SiteKind::Reseller, 2);
        let slot = reseller.insert(susceptible_unit(1));
        assert_eq!(reseller.unit(slot).unwrap().movements.reseller_hops, 1);

        let mut experiment = holder(SiteKind::Experiment, 2);
        let slot = experiment.insert(susceptible_unit(1));
        assert_eq!(experiment.unit(slot).unwrap().movements.repurposed, 1);
    }

    #[test]
    fn broker_dispatches_routed_units_in_order() {
        let mut site = holder(SiteKind::Broker, 4);
        let a = site.insert(susceptible_unit(1));
        let b = site.insert(infectious_unit(2, StrainId(0)));
        let broker = site.as_broker_mut().unwrap();
        broker.route(a, SiteId(7));
        broker.route(b, SiteId(7));
        assert_eq!(broker.pending_destinations(DEFAULT_KIND), vec![SiteId(7)]);
        assert_eq!(broker.next_for(DEFAULT_KIND, SiteId(7)), Some(a));
        assert_eq!(broker.next_for(DEFAULT_KIND, SiteId(7)), Some(b));
        assert_eq!(broker.next_for(DEFAULT_KIND, SiteId(7)), None);
    }

    #[test]
    fn broker_remove_dead_tombstones_route() {
        let mut site = holder(SiteKind::Broker, 4);
        let a = site.insert(susceptible_unit(1));
        let b = site.insert(susceptible_unit(2));
        {
            let broker = site.as_broker_mut().unwrap();
            broker.route(a, SiteId(1));
            broker.route(b, SiteId(1));
        }
        let dead = site.remove_dead(a);
        assert_eq!(dead.destination, None);

        let broker = site.as_broker().unwrap();
        assert_eq!(broker.routes().len_route(DEFAULT_KIND, SiteId(1)), 1);
        let broker = site.as_broker_mut().unwrap();
        assert_eq!(broker.next_for(DEFAULT_KIND, SiteId(1)), Some(b));
    }

    #[test]
    fn broker_remove_withdraws_route_entry() {
        let mut site = holder(SiteKind::Broker, 4);
        let a = site.insert(susceptible_unit(1));
        let b = site.insert(susceptible_unit(2));
        {
            let broker = site.as_broker_mut().unwrap();
            broker.route(a, SiteId(1));
            broker.route(b, SiteId(1));
        }
        let left = site.remove(a);
        assert_eq!(left.destination, None);
        let broker = site.as_broker().unwrap();
        assert_eq!(broker.routes().len_route(DEFAULT_KIND, SiteId(1)), 1);

        // The newcomer reuses a's slot and queues behind b.
        let c = site.insert(susceptible_unit(3));
        assert_eq!(c, a);
        let broker = site.as_broker_mut().unwrap();
        broker.route(c, SiteId(1));
        assert_eq!(broker.routes().len_route(DEFAULT_KIND, SiteId(1)), 2);
        assert_eq!(broker.next_for(DEFAULT_KIND, SiteId(1)), Some(b));
        assert_eq!(broker.next_for(DEFAULT_KIND, SiteId(1)), Some(c));
        assert_eq!(broker.next_for(DEFAULT_KIND, SiteId(1)), None);
    }

    #[test]
    fn next_for_clears_destination() {
        let mut site = holder(SiteKind::Broker, 4);
        let a = site.insert(susceptible_unit(1));
        let broker = site.as_broker_mut().unwrap();
        broker.route(a, SiteId(1));
        assert_eq!(broker.next_for(DEFAULT_KIND, SiteId(1)), Some(a));
        assert_eq!(site.unit(a).unwrap().destination, None);
        assert!(site.as_broker().unwrap().routes().is_empty());
    }

    #[test]
    fn rerouting_withdraws_old_entry() {
        let mut site = holder(SiteKind::Broker, 4);
        let a = site.insert(susceptible_unit(1));
        let broker = site.as_broker_mut().unwrap();
        broker.route(a, SiteId(1));
        broker.route(a, SiteId(2));
        assert_eq!(broker.routes().len_route(DEFAULT_KIND, SiteId(1)), 0);
        assert_eq!(broker.next_for(DEFAULT_KIND, SiteId(2)), Some(a));
    }

    #[test]
    fn swap_hooks_move_unit_across_boundary() {
        let mut site = holder(SiteKind::Reseller, 4);
        site.insert(susceptible_unit(1));
        let slot = site.insert(susceptible_unit(2));
        assert!(site.unit_mut(slot).unwrap().acquire(StrainId(1)));
        site.swap_to_infected(slot);
        assert_eq!(site.len_infectious(), 1);
        assert_eq!(site.population().dense_position(slot), 0);
        site.population().check_invariants().unwrap();
    }

    #[test]
    fn reset_drains_units_and_routes() {
        let mut pool = UnitPool::default();
        let mut site = holder(SiteKind::Broker, 4);
        let a = site.insert(infectious_unit(1, StrainId(0)));
        site.insert(susceptible_unit(2));
        site.as_broker_mut().unwrap().route(a, SiteId(0));

        site.reset(&mut pool);
        assert!(site.is_empty());
        assert_eq!(pool.available(), 2);
        assert!(site.as_broker().unwrap().routes().is_empty());
    }

    #[test]
    fn random_unit_is_deterministic_per_seed() {
        let mut site = holder(SiteKind::Marketplace, 16);
        for serial in 0..16 {
            site.insert(susceptible_unit(serial));
        }
        let pick = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            site.random_unit(&mut rng).map(|u| u.id)
        };
        assert_eq!(pick(9), pick(9));

        let empty = holder(SiteKind::Marketplace, 1);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(empty.random_unit(&mut rng).is_none());
    }

    #[test]
    fn trades_only_configured_kinds() {
        let site = holder(SiteKind::Origin, 1);
        assert!(site.trades(DEFAULT_KIND));
        assert!(!site.trades(UnitKind(99)));
    }
}
