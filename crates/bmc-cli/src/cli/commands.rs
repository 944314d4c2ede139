//! Command execution handlers

use std::io::Write;

use anyhow::{bail, Context, Result};
use bmc_analysis::{export, Analysis, Report};
use bmc_methods::MonteCarloSimulator;
use tracing::{info, warn};

use crate::config::ExperimentConfig;

/// Execute the run command
pub fn execute_run(args: &super::RunArgs) -> Result<()> {
    let mut experiment = ExperimentConfig::load(&args.experiment)?;
    if let Some(photons) = args.photons {
        experiment.simulation.num_photons = photons;
    }
    if let Some(seed) = args.seed {
        experiment.simulation.seed = seed;
    }
    if let Some(direction) = args.direction {
        experiment.simulation.initial_direction = direction;
    }
    if let Some(output) = &args.output {
        experiment.output.directory = output.clone();
    }

    let mesh = experiment
        .tissue
        .build_mesh()
        .context("invalid tissue description")?;
    let simulator = MonteCarloSimulator::new(mesh, experiment.simulation.clone())
        .context("invalid simulation parameters")?;

    let results = simulator.run();
    let analysis = Analysis::new(&results, simulator.mesh())?;
    let report = Report::from_analysis(&analysis, simulator.mesh().property_profile());

    if let Some(rt) = &report.reflection_transmission {
        if rt.lost > 0 {
            warn!(lost = rt.lost, "some photons hit the step limit");
        }
    }

    if args.json {
        println!("{}", report.to_json()?);
        return Ok(());
    }

    let written = export::write_all(&experiment.output.directory, &analysis, &report)?;
    if let Some(rt) = &report.reflection_transmission {
        println!("Reflection Rate: {:.2}", rt.reflection_rate);
        println!("Transmission Rate: {:.2}", rt.transmission_rate);
    }
    for path in written {
        info!(path = %path.display(), "written");
    }
    Ok(())
}

/// Execute the mesh command
pub fn execute_mesh(args: &super::MeshArgs) -> Result<()> {
    let experiment = ExperimentConfig::load(&args.experiment)?;
    let mesh = experiment
        .tissue
        .build_mesh()
        .context("invalid tissue description")?;
    let rows = mesh.property_profile();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.csv {
        export::write_mesh_csv(&mut out, &rows)?;
        return Ok(());
    }

    writeln!(
        out,
        "{:>5} {:>10} {:>10} {:>8} {:>10} {:>10} {:>6}",
        "layer", "top", "bottom", "n", "mu_s", "mu_a", "g"
    )?;
    for r in rows {
        writeln!(
            out,
            "{:>5} {:>10.4} {:>10.4} {:>8.3} {:>10.4} {:>10.4} {:>6.3}",
            r.layer + 1,
            r.top,
            r.bottom,
            r.n,
            r.mu_s,
            r.mu_a,
            r.g
        )?;
    }
    Ok(())
}

/// Execute the init command
pub fn execute_init(args: &super::InitArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        );
    }
    ExperimentConfig::sample().save(&args.path)?;
    info!(path = %args.path.display(), "wrote starter experiment");
    Ok(())
}
