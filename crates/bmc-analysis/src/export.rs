//! CSV and JSON export of analysis results.
//!
//! Each table writer takes any `io::Write`, so the same code serves files,
//! stdout, and in-memory buffers.

use std::io::Write;
use std::path::{Path, PathBuf};

use bmc_core::{errors::Error, errors::Result, Real};
use bmc_math::Histogram;
use bmc_tissue::LayerProfile;
use serde::Serialize;
use tracing::info;

use crate::analysis::{
    Analysis, LayerAbsorption, ReflectionTransmission, DEFAULT_DEPTH_BINS, DEFAULT_MAP_COLUMNS,
};

/// Everything worth keeping from a run, in one serialisable value.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Photons launched.
    pub num_photons: usize,
    /// Tissue description.
    pub mesh: Vec<LayerProfile>,
    /// Absorption per layer.
    pub absorption_profile: Vec<LayerAbsorption>,
    /// Absorbed weight per photon per unit thickness.
    pub absorption_density: Vec<Real>,
    /// Escape statistics, absent for an empty run.
    pub reflection_transmission: Option<ReflectionTransmission>,
    /// Mean maximum penetration depth.
    pub mean_penetration_depth: Option<Real>,
    /// Standard error of the mean penetration depth.
    pub penetration_depth_error: Option<Real>,
    /// Deepest point reached by any photon.
    pub max_penetration_depth: Option<Real>,
    /// Maximum penetration depth histogram, absent for an empty run.
    pub penetration_depths: Option<Histogram>,
    /// Rows of the layered absorption map.
    pub absorption_map: Vec<Vec<Real>>,
}

impl Report {
    /// Collect a report with the default histogram and map sizes.
    pub fn from_analysis(analysis: &Analysis<'_>, mesh: Vec<LayerProfile>) -> Self {
        let depths = analysis.penetration_statistics();
        Self {
            num_photons: analysis.results().num_photons,
            mesh,
            absorption_profile: analysis.absorption_profile(),
            absorption_density: analysis.absorption_density(),
            reflection_transmission: analysis.reflection_transmission(),
            mean_penetration_depth: depths.mean(),
            penetration_depth_error: depths.error_estimate(),
            max_penetration_depth: depths.maximum(),
            penetration_depths: analysis.penetration_depth_distribution(DEFAULT_DEPTH_BINS).ok(),
            absorption_map: analysis.layered_absorption_map(DEFAULT_MAP_COLUMNS),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Runtime(e.to_string()))
    }
}

fn io_err(e: std::io::Error) -> Error {
    Error::Io(e.to_string())
}

/// `layer,label,top,bottom,absorbed,fraction`
pub fn write_absorption_csv<W: Write>(mut out: W, rows: &[LayerAbsorption]) -> Result<()> {
    writeln!(out, "layer,label,top,bottom,absorbed,fraction").map_err(io_err)?;
    for r in rows {
        writeln!(
            out,
            "{},{},{},{},{},{}",
            r.layer, r.label, r.top, r.bottom, r.absorbed, r.fraction
        )
        .map_err(io_err)?;
    }
    Ok(())
}

/// `bin_start,bin_end,count,frequency`
pub fn write_histogram_csv<W: Write>(mut out: W, hist: &Histogram) -> Result<()> {
    writeln!(out, "bin_start,bin_end,count,frequency").map_err(io_err)?;
    let edges = hist.bin_edges();
    for (i, (count, freq)) in hist.counts().iter().zip(hist.frequencies()).enumerate() {
        writeln!(out, "{},{},{},{}", edges[i], edges[i + 1], count, freq).map_err(io_err)?;
    }
    Ok(())
}

/// `photon,step,z` — one row per recorded position.
pub fn write_paths_csv<W: Write>(mut out: W, depths: &[Vec<Real>]) -> Result<()> {
    writeln!(out, "photon,step,z").map_err(io_err)?;
    for (photon, path) in depths.iter().enumerate() {
        for (step, z) in path.iter().enumerate() {
            writeln!(out, "{photon},{step},{z}").map_err(io_err)?;
        }
    }
    Ok(())
}

/// `layer,top,bottom,n,mu_s,mu_a,g,albedo,mu_s_reduced`
pub fn write_mesh_csv<W: Write>(mut out: W, rows: &[LayerProfile]) -> Result<()> {
    writeln!(out, "layer,top,bottom,n,mu_s,mu_a,g,albedo,mu_s_reduced").map_err(io_err)?;
    for r in rows {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            r.layer, r.top, r.bottom, r.n, r.mu_s, r.mu_a, r.g, r.albedo, r.mu_s_reduced
        )
        .map_err(io_err)?;
    }
    Ok(())
}

/// `layer,column,absorbed`: one row per cell of the layered absorption map.
pub fn write_map_csv<W: Write>(mut out: W, map: &[Vec<Real>]) -> Result<()> {
    writeln!(out, "layer,column,absorbed").map_err(io_err)?;
    for (layer, row) in map.iter().enumerate() {
        for (column, value) in row.iter().enumerate() {
            writeln!(out, "{layer},{column},{value}").map_err(io_err)?;
        }
    }
    Ok(())
}

/// Write every table plus `report.json` into `dir`, creating it if needed.
///
/// Returns the paths written.
pub fn write_all(dir: &Path, analysis: &Analysis<'_>, report: &Report) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(io_err)?;
    let create = |name: &str| -> Result<(PathBuf, std::io::BufWriter<std::fs::File>)> {
        let path = dir.join(name);
        let file = std::fs::File::create(&path)
            .map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;
        Ok((path, std::io::BufWriter::new(file)))
    };

    let mut written = Vec::new();

    let (path, out) = create("mesh.csv")?;
    write_mesh_csv(out, &report.mesh)?;
    written.push(path);

    let (path, out) = create("absorption_profile.csv")?;
    write_absorption_csv(out, &report.absorption_profile)?;
    written.push(path);

    if let Some(hist) = &report.penetration_depths {
        let (path, out) = create("penetration_depths.csv")?;
        write_histogram_csv(out, hist)?;
        written.push(path);
    }

    let (path, out) = create("absorption_map.csv")?;
    write_map_csv(out, &report.absorption_map)?;
    written.push(path);

    let (path, out) = create("photon_paths.csv")?;
    write_paths_csv(out, &analysis.path_depths(usize::MAX))?;
    written.push(path);

    let (path, mut out) = create("report.json")?;
    out.write_all(report.to_json()?.as_bytes()).map_err(io_err)?;
    out.flush().map_err(io_err)?;
    written.push(path);

    info!(dir = %dir.display(), files = written.len(), "wrote results");
    Ok(written)
}
