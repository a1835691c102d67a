/*!

A stochastic SEIR epidemic model on a toroidal population grid.

Individuals wander to a uniformly random cell every day. Susceptible individuals are exposed
with a probability that grows with the number of infected individuals in the surrounding 3x3
block, and exposed, infected and recovered individuals move on after per-individual dwell
times. A run is fully determined by its seed.

```no_run
use seir_grid::report::report_writer;
use seir_grid::{ModelParameters, SimulationManager};

let mut manager = SimulationManager::new(ModelParameters::default(), 0);
let mut writer = report_writer(std::io::stdout());
manager.run_simulation(&mut writer).unwrap();
```

*/

pub mod context;
pub mod error;
pub mod grid;
pub mod infection_manager;
pub mod logging;
pub mod parameters;
pub mod people;
pub mod random;
pub mod report;
pub mod runner;
pub mod simulation;

// All modules import `crate::TypeId` in case we want to change the underlying type of `TypeId`.
pub(crate) use std::any::TypeId;

#[inline(always)]
pub fn type_of<T: 'static>() -> TypeId {
    TypeId::of::<T>()
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct PersonId(pub(crate) usize);

pub use context::Context;
pub use error::SimulationError;
pub use parameters::{DriverConfig, ModelParameters};
pub use people::Compartment;
pub use report::CompartmentCounts;
pub use simulation::SimulationManager;
