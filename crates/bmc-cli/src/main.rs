//! biomontecarlo - photon transport in layered tissue
//!
//! Main entry point for the command-line application.

mod cli;
mod config;

use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Set up logging
    setup_logging(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Set up logging based on CLI arguments
fn setup_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

/// Main application logic
fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(jobs) = cli.jobs {
        configure_workers(jobs)?;
    }

    match cli.command {
        Commands::Run(args) => cli::execute_run(&args),
        Commands::Mesh(args) => cli::execute_mesh(&args),
        Commands::Init(args) => cli::execute_init(&args),
    }
}

/// Size the global worker pool used by the simulator.
fn configure_workers(jobs: usize) -> anyhow::Result<()> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build_global()
        .context("failed to configure worker threads")
}
