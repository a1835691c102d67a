/*!

The daily update loop. A `SimulationManager` owns one run's `Context` (random source, grid,
population and parameters) and advances it one simulated day at a time.

Each day the visitation order is shuffled, then every individual in turn is moved to a fresh
random cell and has its transition evaluated at that new cell. The grid is therefore only
partially updated while later individuals are evaluated; this interleaving is part of the
model and is fully determined by the seed.

*/

use crate::{
    context::Context,
    error::SimulationError,
    grid::ContextGridExt,
    infection_manager::ContextInfectionExt,
    parameters::{ContextParametersExt, ModelParameters},
    people::{advance, Compartment, ContextPeopleExt, PeopleData},
    random::ContextRandomExt,
    report::{CompartmentCounts, REPORT_HEADER},
    PersonId,
};
use csv::Writer;
use log::{info, trace};
use std::io::Write;

pub struct SimulationManager {
    context: Context,
    /// Visitation order, reshuffled in place every day.
    order: Vec<PersonId>,
    day: usize,
}

impl SimulationManager {
    /// Builds a fresh run: seeds the random source, lays out the grid, and scatters the
    /// initially susceptible and then the initially infected individuals uniformly over it.
    ///
    /// Panics if the grid dimensions fail `ModelParameters::validate`.
    pub fn new(parameters: ModelParameters, seed: u64) -> Self {
        let mut context = Context::new();
        context.init_random(seed);
        let width = i32::try_from(parameters.grid_width).expect("grid width fits in i32");
        let height = i32::try_from(parameters.grid_height).expect("grid height fits in i32");
        context.init_grid(width, height);

        let cohorts = [
            (Compartment::Susceptible, parameters.initial_susceptible),
            (Compartment::Infected, parameters.initial_infected),
        ];
        context.set_model_parameters(parameters);
        for (compartment, count) in cohorts {
            for _ in 0..count {
                let x = context.sample_int(width);
                let y = context.sample_int(height);
                context.add_individual(compartment, x, y);
            }
        }

        Self::from_context(context)
    }

    /// Wraps a context whose random source, grid and population are already set up.
    pub fn from_context(context: Context) -> Self {
        let order = context.person_ids();
        SimulationManager {
            context,
            order,
            day: 0,
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    /// Number of completed days.
    pub fn day(&self) -> usize {
        self.day
    }

    pub fn simulate_one_step(&mut self) {
        let mut order = std::mem::take(&mut self.order);
        self.context.shuffle(&mut order);

        let grid = self.context.grid();
        let (width, height) = (grid.width(), grid.height());

        for &person_id in &order {
            let x = self.context.sample_int(width);
            let y = self.context.sample_int(height);
            self.context.relocate(person_id, x, y);
            update_state(&mut self.context, person_id);
        }

        self.order = order;
        self.day += 1;
    }

    pub fn state_count(&self, compartment: Compartment) -> usize {
        self.context.state_count(compartment)
    }

    pub fn counts(&self, iteration: usize) -> CompartmentCounts {
        CompartmentCounts {
            iteration,
            susceptible: self.state_count(Compartment::Susceptible),
            exposed: self.state_count(Compartment::Exposed),
            infected: self.state_count(Compartment::Infected),
            recovered: self.state_count(Compartment::Recovered),
        }
    }

    /// Runs the configured number of days, writing the header and then the counts after each
    /// day to `writer`, and returns the rows. `writer` must not add a header of its own (see
    /// `report::report_writer`).
    ///
    /// # Errors
    ///
    /// Returns a `SimulationError` if a row can't be written or the writer can't be flushed.
    pub fn run_simulation<W: Write>(
        &mut self,
        writer: &mut Writer<W>,
    ) -> Result<Vec<CompartmentCounts>, SimulationError> {
        let iterations = self.context.model_parameters().iterations;
        let population = self.context.get_current_population();
        info!("running {iterations} days with a population of {population}");

        writer.write_record(REPORT_HEADER)?;
        let mut rows = Vec::with_capacity(iterations);
        for iteration in 0..iterations {
            self.simulate_one_step();
            let row = self.counts(iteration);
            debug_assert_eq!(row.total(), population);
            debug_assert_eq!(self.context.grid().occupancy(), population);
            trace!("{row:?}");
            writer.serialize(row)?;
            rows.push(row);
        }
        writer.flush()?;

        if let Some(last) = rows.last() {
            info!(
                "finished after {} days: S={} E={} I={} R={}",
                self.day, last.susceptible, last.exposed, last.infected, last.recovered
            );
        }
        Ok(rows)
    }
}

/// Ages the individual by one day and applies its transition rule. Susceptible individuals
/// (as of the start of the update) get one infection attempt.
fn update_state(context: &mut Context, person_id: PersonId) {
    let individual = context.get_data_container_mut::<PeopleData>().get_mut(person_id);
    let compartment = individual.compartment;
    let (next, time_in_state) = advance(compartment, individual.time_in_state, individual.dwell());
    individual.compartment = next;
    individual.time_in_state = time_in_state;

    if compartment == Compartment::Susceptible {
        context.try_to_infect(person_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::people::{DwellTimes, Location};
    use crate::report::report_writer;

    fn small_parameters(iterations: usize) -> ModelParameters {
        ModelParameters {
            grid_width: 20,
            grid_height: 20,
            initial_susceptible: 190,
            initial_infected: 10,
            iterations,
            ..ModelParameters::default()
        }
    }

    fn run_to_rows(parameters: ModelParameters, seed: u64) -> Vec<CompartmentCounts> {
        let mut manager = SimulationManager::new(parameters, seed);
        let mut writer = report_writer(vec![]);
        manager.run_simulation(&mut writer).unwrap()
    }

    #[test]
    fn reference_initialization() {
        let manager = SimulationManager::new(ModelParameters::default(), 0);
        assert_eq!(manager.state_count(Compartment::Susceptible), 19_980);
        assert_eq!(manager.state_count(Compartment::Infected), 20);
        assert_eq!(manager.context().get_current_population(), 20_000);
        assert_eq!(manager.context().grid().occupancy(), 20_000);
        assert_eq!(manager.day(), 0);
    }

    #[test]
    fn locations_match_grid_after_steps() {
        let mut manager = SimulationManager::new(small_parameters(0), 3);
        for _ in 0..5 {
            manager.simulate_one_step();
        }
        let context = manager.context();
        assert_eq!(context.grid().occupancy(), 200);
        for person_id in context.person_ids() {
            let Location { x, y } = context.individual(person_id).location();
            assert!((0..20).contains(&x) && (0..20).contains(&y));
            assert!(context.grid().individuals_at(x, y).contains(&person_id));
        }
        assert_eq!(manager.day(), 5);
    }

    #[test]
    fn conservation() {
        for row in run_to_rows(small_parameters(200), 11) {
            assert_eq!(row.total(), 200);
        }
    }

    #[test]
    fn reproducibility() {
        let first = run_to_rows(small_parameters(730), 17);
        let second = run_to_rows(small_parameters(730), 17);
        assert_eq!(first.len(), 730);
        assert_eq!(first, second);

        let other = run_to_rows(small_parameters(730), 18);
        assert_ne!(first, other);
    }

    #[test]
    fn epidemic_spreads_on_crowded_grid() {
        let parameters = ModelParameters {
            grid_width: 10,
            grid_height: 10,
            initial_susceptible: 490,
            initial_infected: 10,
            ..ModelParameters::default()
        };
        let mut manager = SimulationManager::new(parameters, 5);
        for _ in 0..20 {
            manager.simulate_one_step();
        }
        assert!(manager.state_count(Compartment::Susceptible) < 490);
    }

    #[test]
    fn horizon_writes_header_and_rows() {
        let parameters = small_parameters(730);
        let mut manager = SimulationManager::new(parameters.clone(), 1);
        let mut writer = report_writer(vec![]);
        let rows = manager.run_simulation(&mut writer).unwrap();
        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 731);
        assert_eq!(lines[0], "Iteration,S,E,I,R");
        assert_eq!(rows.len(), 730);
        assert_eq!(manager.day(), 730);
        for (iteration, row) in rows.iter().enumerate() {
            assert_eq!(row.iteration, iteration);
        }

        // Row 0 is the state after exactly one step.
        let mut fresh = SimulationManager::new(parameters, 1);
        fresh.simulate_one_step();
        assert_eq!(rows[0], fresh.counts(0));
    }

    #[test]
    fn zero_days_still_writes_header() {
        let mut manager = SimulationManager::new(small_parameters(0), 1);
        let mut writer = report_writer(vec![]);
        let rows = manager.run_simulation(&mut writer).unwrap();
        let output = String::from_utf8(writer.into_inner().unwrap()).unwrap();

        assert!(rows.is_empty());
        assert_eq!(output, "Iteration,S,E,I,R\n");
        assert_eq!(manager.day(), 0);
    }

    #[test]
    fn step_draw_order() {
        let mut context = Context::new();
        context.init_random(7);
        context.init_grid(10, 10);
        let dwell = DwellTimes {
            exposed: 1,
            infected: 1,
            recovered: 1,
        };
        let person = context.add_individual_with_dwell(Compartment::Susceptible, 0, 0, dwell);

        let mut manager = SimulationManager::from_context(context);
        manager.simulate_one_step();

        // Shuffling a single individual draws nothing; then x, y, and one infection draw.
        let mut replay = Context::new();
        replay.init_random(7);
        let x = replay.sample_int(10);
        let y = replay.sample_int(10);
        replay.sample_uniform();

        let individual = manager.context().individual(person);
        assert_eq!(individual.location(), Location { x, y });
        assert_eq!(individual.compartment(), Compartment::Susceptible);
        assert_eq!(individual.time_in_state(), 1);
        assert_eq!(
            manager.context_mut().sample_uniform(),
            replay.sample_uniform()
        );
    }

    #[test]
    fn exposed_becomes_infected_after_dwell() {
        let mut context = Context::new();
        context.init_random(9);
        context.init_grid(5, 5);
        let dwell = DwellTimes {
            exposed: 2,
            infected: 50,
            recovered: 50,
        };
        let person = context.add_individual_with_dwell(Compartment::Exposed, 0, 0, dwell);
        let mut manager = SimulationManager::from_context(context);

        for day in 1..=2 {
            manager.simulate_one_step();
            let individual = manager.context().individual(person);
            assert_eq!(individual.compartment(), Compartment::Exposed);
            assert_eq!(individual.time_in_state(), day);
        }
        manager.simulate_one_step();
        let individual = manager.context().individual(person);
        assert_eq!(individual.compartment(), Compartment::Infected);
        assert_eq!(individual.time_in_state(), 0);
    }

    #[test]
    fn newly_susceptible_is_not_exposed_same_day() {
        let mut context = Context::new();
        context.init_random(13);
        context.init_grid(1, 1);
        let recovering = DwellTimes {
            exposed: 50,
            infected: 50,
            recovered: 0,
        };
        let person = context.add_individual_with_dwell(Compartment::Recovered, 0, 0, recovering);
        // Many infected neighbours: any infection draw would almost surely succeed.
        for _ in 0..10 {
            context.add_individual_with_dwell(Compartment::Infected, 0, 0, recovering);
        }
        let mut manager = SimulationManager::from_context(context);
        manager.simulate_one_step();

        let individual = manager.context().individual(person);
        assert_eq!(individual.compartment(), Compartment::Susceptible);
        assert_eq!(individual.time_in_state(), 0);
    }
}
