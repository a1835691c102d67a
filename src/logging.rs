//! Console logging for simulation runs. Components log through the `log` macros; this module
//! installs a `log4rs` console appender and lets the global level be changed at any time.
//!
//! Logging is _disabled_ by default. Enable it with
//! `set_log_level(LevelFilter::Info)`.

use crate::error::SimulationError;
pub use log::LevelFilter;
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::{Config, Handle};
use std::sync::{LazyLock, Mutex, PoisonError};

// Use an ISO 8601 timestamp format and color coded level tag
const DEFAULT_LOG_PATTERN: &str = "{d(%Y-%m-%dT%H:%M:%SZ)} {h({l})} {t} - {m}{n}";
// Logging disabled
const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Off;

/// A global instance of the logging configuration.
static LOG_CONFIGURATION: LazyLock<Mutex<LogConfiguration>> = LazyLock::new(Mutex::default);

/// Because loggers are globally installed, only one instance of this struct should exist.
struct LogConfiguration {
    global_log_level: LevelFilter,
    /// Handle to the `log4rs` logger, once installed.
    root_handle: Option<Handle>,
}

impl Default for LogConfiguration {
    fn default() -> Self {
        LogConfiguration {
            global_log_level: DEFAULT_LOG_LEVEL,
            root_handle: None,
        }
    }
}

impl LogConfiguration {
    /// Sets the global logger to conform to this configuration.
    fn set_config(&mut self) -> Result<(), SimulationError> {
        let encoder = Box::new(PatternEncoder::new(DEFAULT_LOG_PATTERN));
        let stdout = ConsoleAppender::builder().encoder(encoder).build();
        let root = Root::builder()
            .appender("stdout")
            .build(self.global_log_level);
        let new_config = Config::builder()
            .appender(Appender::builder().build("stdout", Box::new(stdout)))
            .build(root)
            .map_err(|e| SimulationError::from(format!("failed to build log config: {e}")))?;

        match self.root_handle {
            Some(ref mut handle) => handle.set_config(new_config),
            None => self.root_handle = Some(log4rs::init_config(new_config)?),
        }
        Ok(())
    }
}

/// Sets the global log level, installing the console logger on first use.
///
/// # Errors
///
/// Returns a `LoggerError` if a different global logger was already installed.
pub fn set_log_level(level: LevelFilter) -> Result<(), SimulationError> {
    let mut log_configuration = LOG_CONFIGURATION
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    log_configuration.global_log_level = level;
    log_configuration.set_config()
}
