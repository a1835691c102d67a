use clap::Parser;
use log::{error, info};
use seir_grid::logging::{set_log_level, LevelFilter};
use seir_grid::runner::run_batch;
use seir_grid::DriverConfig;
use std::path::PathBuf;
use std::process::ExitCode;

/// Runs a batch of SEIR grid simulations and writes one CSV report per run.
#[derive(Parser, Debug)]
struct Args {
    /// Optional path to a JSON driver configuration. Without it the reference batch is run.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = set_log_level(LevelFilter::Info) {
        eprintln!("Logging unavailable: {e}");
    }

    let config = match &args.config {
        Some(path) => match DriverConfig::from_json_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("could not load {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => DriverConfig::default(),
    };
    let summary = run_batch(&config);

    info!(
        "{} of {} simulations completed",
        summary.completed.len(),
        config.runs
    );
    for (run_number, e) in &summary.failed {
        error!("simulation {run_number} failed: {e}");
    }
    if summary.failed.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
