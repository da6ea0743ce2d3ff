//! Free-standing fixtures.

use roost_arena::PartitionedPopulation;
use roost_core::{StrainId, Unit, UnitKind};

use crate::UnitBuilder;

/// Kind given to fixture units unless overridden.
pub const DEFAULT_KIND: UnitKind = UnitKind(1);

/// A non-infectious unit with serial `serial`.
pub fn susceptible_unit(serial: u32) -> Unit {
    UnitBuilder::new(serial).build()
}

/// A unit carrying `strain`.
pub fn infectious_unit(serial: u32, strain: StrainId) -> Unit {
    UnitBuilder::new(serial).infected_with(strain).build()
}

/// A population of `capacity` holding `infectious` units carrying strain 0
/// followed by `susceptible` clean ones.
///
/// Serials run from 0 in insertion order, infectious units first.
///
/// # Panics
///
/// Panics if `infectious + susceptible > capacity`.
pub fn mixed_population(capacity: usize, infectious: u32, susceptible: u32) -> PartitionedPopulation {
    let mut pop = PartitionedPopulation::new(capacity);
    for serial in 0..infectious {
        pop.insert(infectious_unit(serial, StrainId(0)));
    }
    for serial in infectious..infectious + susceptible {
        pop.insert(susceptible_unit(serial));
    }
    pop
}

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
