use std::fmt::{Display, Formatter};

#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub enum Compartment {
    Susceptible,
    Exposed,
    Infected,
    Recovered,
}

impl Compartment {
    pub const ALL: [Compartment; 4] = [
        Compartment::Susceptible,
        Compartment::Exposed,
        Compartment::Infected,
        Compartment::Recovered,
    ];
}

impl Display for Compartment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Compartment::Susceptible => "S",
                Compartment::Exposed => "E",
                Compartment::Infected => "I",
                Compartment::Recovered => "R",
            }
        )
    }
}

/// Per-individual dwell thresholds, sampled once when the individual is created and reused on
/// every pass through E, I and R.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct DwellTimes {
    pub exposed: u32,
    pub infected: u32,
    pub recovered: u32,
}

impl DwellTimes {
    fn threshold(&self, compartment: Compartment) -> Option<u32> {
        match compartment {
            Compartment::Susceptible => None,
            Compartment::Exposed => Some(self.exposed),
            Compartment::Infected => Some(self.infected),
            Compartment::Recovered => Some(self.recovered),
        }
    }
}

impl Compartment {
    fn successor(self) -> Compartment {
        match self {
            Compartment::Susceptible => Compartment::Exposed,
            Compartment::Exposed => Compartment::Infected,
            Compartment::Infected => Compartment::Recovered,
            Compartment::Recovered => Compartment::Susceptible,
        }
    }
}

/// One day of the deterministic transitions. `time_in_state` is incremented first; E, I and R
/// move on once it strictly exceeds their dwell threshold, so an individual spends `dwell + 1`
/// days in each. Susceptible individuals only age here.
pub fn advance(compartment: Compartment, time_in_state: u32, dwell: &DwellTimes) -> (Compartment, u32) {
    let time_in_state = time_in_state + 1;
    match dwell.threshold(compartment) {
        Some(threshold) if time_in_state > threshold => (compartment.successor(), 0),
        _ => (compartment, time_in_state),
    }
}
