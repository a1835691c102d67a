use std::fmt::{self, Display};
use std::io;

/// Provides `SimulationError` and maps other errors to
/// convert to a `SimulationError`
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum SimulationError {
    IoError(io::Error),
    CsvError(csv::Error),
    JsonError(serde_json::Error),
    LoggerError(log::SetLoggerError),
    SimulationError(String),
}

impl From<io::Error> for SimulationError {
    fn from(error: io::Error) -> Self {
        SimulationError::IoError(error)
    }
}

impl From<csv::Error> for SimulationError {
    fn from(error: csv::Error) -> Self {
        SimulationError::CsvError(error)
    }
}

impl From<serde_json::Error> for SimulationError {
    fn from(error: serde_json::Error) -> Self {
        SimulationError::JsonError(error)
    }
}

impl From<log::SetLoggerError> for SimulationError {
    fn from(error: log::SetLoggerError) -> Self {
        SimulationError::LoggerError(error)
    }
}

impl From<String> for SimulationError {
    fn from(error: String) -> Self {
        SimulationError::SimulationError(error)
    }
}

impl From<&str> for SimulationError {
    fn from(error: &str) -> Self {
        SimulationError::SimulationError(error.to_string())
    }
}

impl std::error::Error for SimulationError {}

impl Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Error: {self:?}")?;
        Ok(())
    }
}
