use crate::context::DataPlugin;
use crate::people::{Compartment, DwellTimes};
use crate::PersonId;

/// Grid coordinates, always stored wrapped onto the lattice.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone)]
pub struct Individual {
    pub(crate) compartment: Compartment,
    /// Days since the last compartment change.
    pub(crate) time_in_state: u32,
    pub(crate) location: Location,
    dwell: DwellTimes,
}

impl Individual {
    pub(crate) fn new(compartment: Compartment, location: Location, dwell: DwellTimes) -> Self {
        Individual {
            compartment,
            time_in_state: 0,
            location,
            dwell,
        }
    }

    pub fn compartment(&self) -> Compartment {
        self.compartment
    }

    pub fn time_in_state(&self) -> u32 {
        self.time_in_state
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn dwell(&self) -> &DwellTimes {
        &self.dwell
    }

    /// Moves to `compartment` and resets the time in state.
    pub(crate) fn set_compartment(&mut self, compartment: Compartment) {
        self.compartment = compartment;
        self.time_in_state = 0;
    }
}

/// Owns every individual of a run. A `PersonId` is an index into `individuals`.
#[derive(Default)]
pub(crate) struct PeopleData {
    pub(crate) individuals: Vec<Individual>,
}

impl DataPlugin for PeopleData {
    fn init() -> Self {
        PeopleData::default()
    }
}

impl PeopleData {
    pub fn add_individual(&mut self, individual: Individual) -> PersonId {
        let person_id = PersonId(self.individuals.len());
        self.individuals.push(individual);
        person_id
    }

    #[inline(always)]
    pub fn get(&self, person_id: PersonId) -> &Individual {
        &self.individuals[person_id.0]
    }

    #[inline(always)]
    pub fn get_mut(&mut self, person_id: PersonId) -> &mut Individual {
        &mut self.individuals[person_id.0]
    }

    pub fn count(&self, compartment: Compartment) -> usize {
        self.individuals
            .iter()
            .filter(|individual| individual.compartment == compartment)
            .count()
    }
}
