//! Experiment files: a tissue, run parameters, and where to put results.
//!
//! ```toml
//! [simulation]
//! num_photons = 30000
//! seed = 7
//!
//! [output]
//! directory = "results"
//!
//! [tissue]
//! surface = 0.0
//!
//! [[tissue.layers]]
//! bottom = 1.5
//! n = 1.33
//! mu_s = 10.0
//! mu_a = 0.1
//! g = 0.9
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bmc_methods::SimulationConfig;
use bmc_tissue::{LayerConfig, TissueConfig};
use serde::{Deserialize, Serialize};

/// A complete experiment description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentConfig {
    /// Run parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
    /// The tissue.
    pub tissue: TissueConfig,
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory receiving CSV tables and `report.json`.
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("results"),
        }
    }
}

impl ExperimentConfig {
    /// Read an experiment file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read experiment file {}", path.display()))?;
        toml::from_str(&text)
            .with_context(|| format!("failed to parse experiment file {}", path.display()))
    }

    /// Write this experiment as TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = toml::to_string_pretty(self).context("failed to serialise experiment")?;
        std::fs::write(path, text)
            .with_context(|| format!("failed to write experiment file {}", path.display()))
    }

    /// A five-layer starter experiment.
    pub fn sample() -> Self {
        let layer = |bottom, n, mu_s, mu_a| LayerConfig {
            bottom,
            n,
            mu_s,
            mu_a,
            g: 0.9,
        };
        Self {
            simulation: SimulationConfig::with_photons(30_000),
            output: OutputConfig::default(),
            tissue: TissueConfig {
                surface: 0.0,
                ambient_index_above: 1.0,
                ambient_index_below: 1.0,
                layers: vec![
                    layer(1.5, 1.0, 10.0, 0.1),
                    layer(3.0, 1.33, 5.0, 0.1),
                    layer(5.0, 1.57, 5.0, 0.1),
                    layer(15.0, 1.4, 10.0, 0.0),
                    layer(25.0, 1.4, 10.0, 0.1),
                ],
            },
        }
    }
}
