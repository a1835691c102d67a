use crate::{
    context::Context,
    grid::ContextGridExt,
    parameters::ContextParametersExt,
    people::{Compartment, ContextPeopleExt, PeopleData},
    random::ContextRandomExt,
    PersonId,
};
use log::trace;

/// Probability that a susceptible is exposed in one day given `infected_neighbors` infected
/// individuals in its 3x3 neighborhood: `1 - exp(-force * k)`. Exactly zero when `k == 0`.
pub fn exposure_probability(infected_neighbors: usize, force_of_infection: f64) -> f64 {
    1.0 - (-force_of_infection * infected_neighbors as f64).exp()
}

pub trait ContextInfectionExt {
    /// Counts the infected individuals in the 9 wrapped cells of the 3x3 block centered on
    /// `(x, y)`, center included. On grids narrower or shorter than 3 a cell may be visited
    /// more than once and is counted each time.
    fn infected_neighbor_count(&self, x: i32, y: i32) -> usize;

    /// Draws one uniform variate and exposes the (susceptible) individual if it falls below the
    /// exposure probability at its current location. Returns whether exposure happened.
    fn try_to_infect(&mut self, person_id: PersonId) -> bool;
}

impl ContextInfectionExt for Context {
    fn infected_neighbor_count(&self, x: i32, y: i32) -> usize {
        let Some(people_data) = self.get_data_container::<PeopleData>() else {
            return 0;
        };
        let grid = self.grid();

        let mut total_infections = 0;
        for nx in x - 1..=x + 1 {
            for ny in y - 1..=y + 1 {
                total_infections += grid
                    .individuals_at(nx, ny)
                    .iter()
                    .filter(|&&id| people_data.get(id).compartment() == Compartment::Infected)
                    .count();
            }
        }
        total_infections
    }

    fn try_to_infect(&mut self, person_id: PersonId) -> bool {
        let individual = self.individual(person_id);
        debug_assert_eq!(individual.compartment(), Compartment::Susceptible);
        let location = individual.location();

        let infected_neighbors = self.infected_neighbor_count(location.x, location.y);
        let force_of_infection = self.model_parameters().force_of_infection;
        let probability = exposure_probability(infected_neighbors, force_of_infection);

        if self.sample_uniform() < probability {
            trace!("{person_id:?} exposed by {infected_neighbors} infected neighbors");
            self.set_compartment(person_id, Compartment::Exposed);
            true
        } else {
            false
        }
    }
}
