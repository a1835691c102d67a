use crate::error::SimulationError;
use crate::parameters::DriverConfig;
use crate::report::{create_output_location, open_run_report, run_report_path};
use crate::simulation::SimulationManager;
use log::{error, info};
use std::path::PathBuf;
use std::thread;

/// Outcome of a batch. Run numbers are 1-based, matching the report file names.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub completed: Vec<(u32, PathBuf)>,
    pub failed: Vec<(u32, SimulationError)>,
}

/// Runs the simulation with index `run_index` (0-based) and writes its report.
///
/// # Errors
///
/// Returns a `SimulationError` if the output location or report can't be created or written.
/// The partial report, if any, should be considered invalid.
pub fn run_single(config: &DriverConfig, run_index: u32) -> Result<PathBuf, SimulationError> {
    let run_number = run_index + 1;
    let seed = config.base_seed.wrapping_add(u64::from(run_index));
    info!("starting simulation {run_number} with seed {seed}");

    create_output_location(&config.output_dir)?;
    let mut writer = open_run_report(&config.output_dir, run_number)?;

    let mut manager = SimulationManager::new(config.model.clone(), seed);
    manager.run_simulation(&mut writer)?;

    Ok(run_report_path(&config.output_dir, run_number))
}

/// Runs `config.runs` independent simulations one after another, pausing after each completed
/// run except the last. A run that fails is reported and the batch moves straight on to the
/// next one.
pub fn run_batch(config: &DriverConfig) -> BatchSummary {
    let mut summary = BatchSummary::default();

    for run_index in 0..config.runs {
        let run_number = run_index + 1;
        match run_single(config, run_index) {
            Ok(path) => {
                info!("simulation {run_number} written to {}", path.display());
                summary.completed.push((run_number, path));
            }
            Err(e) => {
                error!("simulation {run_number} failed: {e}");
                summary.failed.push((run_number, e));
                continue;
            }
        }

        let pause = config.pause();
        if run_number < config.runs && !pause.is_zero() {
            info!("waiting {}s before the next simulation", pause.as_secs());
            thread::sleep(pause);
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ModelParameters;
    use crate::report::{report_writer, CompartmentCounts};
    use std::fs::File;
    use std::path::Path;
    use std::time::Instant;
    use tempfile::tempdir;

    fn test_config(output_dir: PathBuf) -> DriverConfig {
        DriverConfig {
            runs: 2,
            base_seed: 40,
            pause_seconds: 0,
            output_dir,
            model: ModelParameters {
                grid_width: 15,
                grid_height: 15,
                initial_susceptible: 95,
                initial_infected: 5,
                iterations: 30,
                ..ModelParameters::default()
            },
        }
    }

    fn read_rows(path: &Path) -> Vec<CompartmentCounts> {
        let mut reader = csv::Reader::from_path(path).unwrap();
        reader.deserialize().map(Result::unwrap).collect()
    }

    #[test]
    fn batch_writes_one_report_per_run() {
        let temp_dir = tempdir().unwrap();
        let config = test_config(temp_dir.path().join("simulation_results"));
        let summary = run_batch(&config);

        assert!(summary.failed.is_empty());
        let numbers: Vec<u32> = summary.completed.iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![1, 2]);
        for (run_number, path) in &summary.completed {
            assert_eq!(path, &config.output_dir.join(format!("simulation_result_{run_number}.csv")));
            let rows = read_rows(path);
            assert_eq!(rows.len(), 30);
            assert!(rows.iter().all(|row| row.total() == 100));
        }
    }

    #[test]
    fn run_is_seeded_by_index() {
        let temp_dir = tempdir().unwrap();
        let config = test_config(temp_dir.path().to_path_buf());
        let path = run_single(&config, 1).unwrap();

        let mut manager = SimulationManager::new(config.model.clone(), 41);
        let mut writer = report_writer(vec![]);
        let expected = manager.run_simulation(&mut writer).unwrap();
        assert_eq!(read_rows(&path), expected);
    }

    #[test]
    fn failed_runs_do_not_stop_the_batch() {
        let temp_dir = tempdir().unwrap();
        let blocker = temp_dir.path().join("blocker");
        File::create(&blocker).unwrap();

        let config = test_config(blocker.join("results"));
        let summary = run_batch(&config);
        assert!(summary.completed.is_empty());
        let numbers: Vec<u32> = summary.failed.iter().map(|(n, _)| *n).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert!(matches!(summary.failed[0].1, SimulationError::IoError(_)));
    }

    #[test]
    fn no_pause_after_failed_run() {
        let temp_dir = tempdir().unwrap();
        let blocker = temp_dir.path().join("blocker");
        File::create(&blocker).unwrap();

        let config = DriverConfig {
            pause_seconds: 30,
            ..test_config(blocker.join("results"))
        };
        let start = Instant::now();
        let summary = run_batch(&config);
        assert_eq!(summary.failed.len(), 2);
        assert!(start.elapsed().as_secs() < 30);
    }
}
