//! Command-line interface for biomontecarlo

mod commands;

pub use commands::*;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// BioMonteCarlo - photon transport in layered tissue
///
/// Simulate photon packets through a stack of tissue layers and report
/// absorption, reflection, transmission, and penetration depth.
#[derive(Parser, Debug)]
#[command(name = "biomontecarlo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Number of worker threads (default: number of CPUs)
    #[arg(short, long, global = true, env = "BIOMONTECARLO_JOBS")]
    pub jobs: Option<usize>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a simulation and write its results
    Run(RunArgs),

    /// Show the optical properties of an experiment's tissue
    Mesh(MeshArgs),

    /// Write a starter experiment file
    Init(InitArgs),
}

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Experiment file (TOML)
    pub experiment: PathBuf,

    /// Override the number of photons
    #[arg(short = 'n', long)]
    pub photons: Option<usize>,

    /// Override the random seed
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Override the launch direction, as x,y,z
    #[arg(short, long, value_parser = parse_direction)]
    pub direction: Option<[f64; 3]>,

    /// Override the output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Print the JSON report to stdout instead of writing files
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the mesh command
#[derive(Args, Debug, Clone)]
pub struct MeshArgs {
    /// Experiment file (TOML)
    pub experiment: PathBuf,

    /// Print CSV instead of a table
    #[arg(long)]
    pub csv: bool,
}

/// Arguments for the init command
#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Where to write the experiment file
    #[arg(default_value = "experiment.toml")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

/// Parse `x,y,z` into a direction vector.
pub fn parse_direction(s: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected three comma-separated components, got '{s}'"));
    }
    let mut out = [0.0; 3];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("'{part}' is not a number"))?;
    }
    Ok(out)
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
