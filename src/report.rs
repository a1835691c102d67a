use crate::error::SimulationError;
use csv::{Writer, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Column names of a run report, in order.
pub const REPORT_HEADER: [&str; 5] = ["Iteration", "S", "E", "I", "R"];

/// One row of a run's output: compartment counts after the given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompartmentCounts {
    #[serde(rename = "Iteration")]
    pub iteration: usize,
    #[serde(rename = "S")]
    pub susceptible: usize,
    #[serde(rename = "E")]
    pub exposed: usize,
    #[serde(rename = "I")]
    pub infected: usize,
    #[serde(rename = "R")]
    pub recovered: usize,
}

impl CompartmentCounts {
    pub fn total(&self) -> usize {
        self.susceptible + self.exposed + self.infected + self.recovered
    }
}

/// Creates the output directory and all of its parents if they don't exist.
///
/// # Errors
///
/// Returns an `IoError` if the directory can't be created.
pub fn create_output_location(dir: &Path) -> Result<(), SimulationError> {
    create_dir_all(dir)?;
    Ok(())
}

pub fn run_report_path(dir: &Path, run_number: u32) -> PathBuf {
    dir.join(format!("simulation_result_{run_number}.csv"))
}

/// A CSV writer for report rows. It never writes a header on its own; the header is written
/// explicitly so that a report with no rows still has one.
pub fn report_writer<W: Write>(sink: W) -> Writer<W> {
    WriterBuilder::new().has_headers(false).from_writer(sink)
}

/// Creates (or truncates) the report file for `run_number` inside `dir` and returns a
/// `report_writer` for it.
///
/// # Errors
///
/// Returns an `IoError` if the file can't be created.
pub fn open_run_report(dir: &Path, run_number: u32) -> Result<Writer<File>, SimulationError> {
    let file = File::create(run_report_path(dir, run_number))?;
    Ok(report_writer(file))
}
