//! TOML tissue descriptions.
//!
//! ```toml
//! surface = 0.0
//! ambient_index_above = 1.0
//! ambient_index_below = 1.0
//!
//! [[layers]]
//! bottom = 1.5
//! n = 1.33
//! mu_s = 10.0
//! mu_a = 0.1
//! g = 0.9
//! ```

use std::path::Path;

use bmc_core::{errors::Error, errors::Result, Length, Real};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::mesh::LayeredMesh;
use crate::optical_properties::OpticalProperties;

/// A tissue as written in a configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TissueConfig {
    /// Depth of the tissue surface.
    #[serde(default)]
    pub surface: Length,
    /// Refractive index above the surface.
    #[serde(default = "default_ambient_index")]
    pub ambient_index_above: Real,
    /// Refractive index below the deepest layer.
    #[serde(default = "default_ambient_index")]
    pub ambient_index_below: Real,
    /// Layers, top first.
    #[serde(default)]
    pub layers: Vec<LayerConfig>,
}

/// One `[[layers]]` entry: its lower boundary plus its optical properties.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerConfig {
    /// Lower boundary depth.
    pub bottom: Length,
    /// Refractive index.
    pub n: Real,
    /// Scattering coefficient.
    pub mu_s: Real,
    /// Absorption coefficient.
    pub mu_a: Real,
    /// Anisotropy.
    pub g: Real,
}

fn default_ambient_index() -> Real {
    LayeredMesh::DEFAULT_AMBIENT_INDEX
}

impl TissueConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Io(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&text)?;
        info!(
            path = %path.display(),
            layers = config.layers.len(),
            "loaded tissue description"
        );
        Ok(config)
    }

    /// Serialise back to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Parse(e.to_string()))
    }

    /// Describe an existing mesh.
    pub fn from_mesh(mesh: &LayeredMesh) -> Self {
        let layers = mesh
            .property_profile()
            .into_iter()
            .map(|row| LayerConfig {
                bottom: row.bottom,
                n: row.n,
                mu_s: row.mu_s,
                mu_a: row.mu_a,
                g: row.g,
            })
            .collect();
        Self {
            surface: mesh.top(),
            ambient_index_above: mesh.ambient_index_above(),
            ambient_index_below: mesh.ambient_index_below(),
            layers,
        }
    }

    /// Build and validate the mesh.
    pub fn build_mesh(&self) -> Result<LayeredMesh> {
        let mut mesh = LayeredMesh::with_surface(self.surface)?
            .with_ambient_indices(self.ambient_index_above, self.ambient_index_below)?;
        for layer in &self.layers {
            let props = OpticalProperties::new(layer.n, layer.mu_s, layer.mu_a, layer.g)?;
            mesh.add_layer(layer.bottom, props)?;
        }
        Ok(mesh)
    }
}
