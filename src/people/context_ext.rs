use crate::{
    context::Context,
    grid::ContextGridExt,
    parameters::ContextParametersExt,
    people::{Compartment, DwellTimes, Individual, Location, PeopleData},
    random::ContextRandomExt,
    PersonId,
};
use log::trace;

pub trait ContextPeopleExt {
    fn get_current_population(&self) -> usize;

    /// Adds a new individual at `(x, y)`, sampling its dwell times from the run's random source
    /// (exposed, infected, then recovered), and places it on the grid.
    fn add_individual(&mut self, compartment: Compartment, x: i32, y: i32) -> PersonId;

    /// Adds a new individual with known dwell times. Draws nothing from the random source.
    fn add_individual_with_dwell(
        &mut self,
        compartment: Compartment,
        x: i32,
        y: i32,
        dwell: DwellTimes,
    ) -> PersonId;

    fn individual(&self, person_id: PersonId) -> &Individual;

    /// Moves the individual to its new compartment and resets its time in state.
    fn set_compartment(&mut self, person_id: PersonId, compartment: Compartment);

    /// Moves the individual on the grid and updates its stored location to match.
    fn relocate(&mut self, person_id: PersonId, x: i32, y: i32);

    /// Number of individuals currently in `compartment`.
    fn state_count(&self, compartment: Compartment) -> usize;

    fn person_ids(&self) -> Vec<PersonId>;
}

impl ContextPeopleExt for Context {
    fn get_current_population(&self) -> usize {
        match self.get_data_container::<PeopleData>() {
            None => 0,
            Some(people_data) => people_data.individuals.len(),
        }
    }

    fn add_individual(&mut self, compartment: Compartment, x: i32, y: i32) -> PersonId {
        let parameters = self.model_parameters();
        let means = [
            parameters.mean_exposed_days,
            parameters.mean_infected_days,
            parameters.mean_recovered_days,
        ];
        let [exposed, infected, recovered] = means.map(|mean| self.sample_neg_exp(mean));
        self.add_individual_with_dwell(
            compartment,
            x,
            y,
            DwellTimes {
                exposed,
                infected,
                recovered,
            },
        )
    }

    fn add_individual_with_dwell(
        &mut self,
        compartment: Compartment,
        x: i32,
        y: i32,
        dwell: DwellTimes,
    ) -> PersonId {
        let (x, y) = self.grid().wrap(x, y);
        let individual = Individual::new(compartment, Location { x, y }, dwell);
        let person_id = self
            .get_data_container_mut::<PeopleData>()
            .add_individual(individual);
        self.grid_mut().place(person_id, x, y);
        trace!("added {person_id:?} ({compartment}) at ({x}, {y}) with {dwell:?}");
        person_id
    }

    fn individual(&self, person_id: PersonId) -> &Individual {
        self.get_data_container::<PeopleData>()
            .expect("no individuals have been added")
            .get(person_id)
    }

    fn set_compartment(&mut self, person_id: PersonId, compartment: Compartment) {
        self.get_data_container_mut::<PeopleData>()
            .get_mut(person_id)
            .set_compartment(compartment);
    }

    fn relocate(&mut self, person_id: PersonId, x: i32, y: i32) {
        let (x, y) = self.grid().wrap(x, y);
        let old = self.individual(person_id).location;
        self.grid_mut().move_individual(person_id, old.x, old.y, x, y);
        self.get_data_container_mut::<PeopleData>()
            .get_mut(person_id)
            .location = Location { x, y };
    }

    fn state_count(&self, compartment: Compartment) -> usize {
        self.get_data_container::<PeopleData>()
            .map_or(0, |people_data| people_data.count(compartment))
    }

    fn person_ids(&self) -> Vec<PersonId> {
        (0..self.get_current_population()).map(PersonId).collect()
    }
}
