/*!

Individuals, their compartments, and the population that owns them.

The deterministic half of the daily state machine lives in [`advance`]; the stochastic
Susceptible to Exposed decision belongs to the infection manager.

*/

mod compartment;
mod context_ext;
mod people_data;

pub use compartment::{advance, Compartment, DwellTimes};
pub use context_ext::ContextPeopleExt;
pub use people_data::{Individual, Location};
pub(crate) use people_data::PeopleData;
