/*!

Model and driver configuration. Every field has a default matching the reference
configuration, so a JSON file only needs to mention the values it changes:

```json
{ "runs": 3, "pause_seconds": 0, "model": { "grid_width": 50, "grid_height": 50 } }
```

*/

use crate::context::{Context, DataPlugin};
use crate::error::SimulationError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Parameters of a single simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    pub grid_width: u32,
    pub grid_height: u32,
    pub initial_susceptible: usize,
    pub initial_infected: usize,
    pub mean_exposed_days: f64,
    pub mean_infected_days: f64,
    pub mean_recovered_days: f64,
    /// Exposure hazard contributed by each infected individual in the 3x3 neighborhood.
    pub force_of_infection: f64,
    /// Number of simulated days, and so of data rows in a run's report.
    pub iterations: usize,
}

impl Default for ModelParameters {
    fn default() -> Self {
        ModelParameters {
            grid_width: 300,
            grid_height: 300,
            initial_susceptible: 19_980,
            initial_infected: 20,
            mean_exposed_days: 3.0,
            mean_infected_days: 7.0,
            mean_recovered_days: 365.0,
            force_of_infection: 0.5,
            iterations: 730,
        }
    }
}

impl ModelParameters {
    pub fn population_size(&self) -> usize {
        self.initial_susceptible + self.initial_infected
    }

    /// Checks that the grid dimensions are usable: each must be at least 1 and fit in an `i32`.
    ///
    /// # Errors
    ///
    /// Returns a `SimulationError` naming the first offending dimension.
    pub fn validate(&self) -> Result<(), SimulationError> {
        for (name, value) in [
            ("grid_width", self.grid_width),
            ("grid_height", self.grid_height),
        ] {
            if value == 0 || i32::try_from(value).is_err() {
                return Err(format!("{name} must be between 1 and {}, got {value}", i32::MAX).into());
            }
        }
        Ok(())
    }
}

impl DataPlugin for ModelParameters {
    fn init() -> Self {
        ModelParameters::default()
    }
}

/// Configuration of a batch of independent runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub runs: u32,
    /// Run `i` (0-based) is seeded with `base_seed + i`.
    pub base_seed: u64,
    pub pause_seconds: u64,
    pub output_dir: PathBuf,
    pub model: ModelParameters,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            runs: 100,
            base_seed: 0,
            pause_seconds: 60,
            output_dir: PathBuf::from("./simulation_results"),
            model: ModelParameters::default(),
        }
    }
}

impl DriverConfig {
    /// Loads a configuration from a JSON file. Missing fields take their default values.
    ///
    /// # Errors
    ///
    /// Returns a `SimulationError` if the file can't be opened, isn't valid JSON, or describes
    /// an invalid grid (see `ModelParameters::validate`).
    pub fn from_json_file(path: &Path) -> Result<Self, SimulationError> {
        let reader = BufReader::new(File::open(path)?);
        let config: DriverConfig = serde_json::from_reader(reader)?;
        config.model.validate()?;
        Ok(config)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_secs(self.pause_seconds)
    }
}

pub trait ContextParametersExt {
    fn set_model_parameters(&mut self, parameters: ModelParameters);

    /// The parameters of this run, or the reference parameters if none were set.
    fn model_parameters(&mut self) -> &ModelParameters;
}

impl ContextParametersExt for Context {
    fn set_model_parameters(&mut self, parameters: ModelParameters) {
        *self.get_data_container_mut::<ModelParameters>() = parameters;
    }

    fn model_parameters(&mut self) -> &ModelParameters {
        self.get_data_container_mut::<ModelParameters>()
    }
}
