//! Planar layered tissue geometry.

use bmc_core::{ensure, errors::Error, errors::Result, Length, Real};
use serde::Serialize;
use tracing::debug;

use crate::optical_properties::OpticalProperties;

/// A stack of homogeneous slabs, infinite in x and y.
///
/// Boundaries are strictly increasing depths.  Outside the stack, the
/// photon sees a non-scattering medium with `ambient_index_above` (for
/// `z < top`) or `ambient_index_below` (for `z > bottom`).
#[derive(Debug, Clone, PartialEq)]
pub struct LayeredMesh {
    boundaries: Vec<Length>,
    properties: Vec<OpticalProperties>,
    ambient_index_above: Real,
    ambient_index_below: Real,
}

/// One row of [`LayeredMesh::property_profile`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerProfile {
    /// Layer index.
    pub layer: usize,
    /// Upper boundary depth.
    pub top: Length,
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
    /// Single-scattering albedo.
    pub albedo: Real,
    /// Reduced scattering coefficient.
    pub mu_s_reduced: Real,
}

impl LayeredMesh {
    /// Default refractive index of the surrounding medium (air).
    pub const DEFAULT_AMBIENT_INDEX: Real = 1.0;

    /// Build a mesh from `N + 1` boundaries and `N` layer property sets.
    pub fn new(boundaries: Vec<Length>, properties: Vec<OpticalProperties>) -> Result<Self> {
        if boundaries.is_empty() {
            return Err(Error::InvalidArgument(
                "a mesh needs at least its surface boundary".into(),
            ));
        }
        if properties.len() + 1 != boundaries.len() {
            return Err(Error::InvalidArgument(format!(
                "{} boundaries require {} property sets, got {}",
                boundaries.len(),
                boundaries.len() - 1,
                properties.len()
            )));
        }
        if let Some(bad) = boundaries.iter().find(|b| !b.is_finite()) {
            return Err(Error::InvalidArgument(format!(
                "boundary {bad} is not finite"
            )));
        }
        if let Some(w) = boundaries.windows(2).find(|w| w[1] <= w[0]) {
            return Err(Error::InvalidArgument(format!(
                "boundaries must be strictly increasing, got {} after {}",
                w[1], w[0]
            )));
        }
        for p in &properties {
            p.validate()?;
        }
        Ok(Self {
            boundaries,
            properties,
            ambient_index_above: Self::DEFAULT_AMBIENT_INDEX,
            ambient_index_below: Self::DEFAULT_AMBIENT_INDEX,
        })
    }

    /// An empty mesh whose surface lies at depth `z0`.  Add layers with
    /// [`add_layer`](Self::add_layer).
    pub fn with_surface(z0: Length) -> Result<Self> {
        Self::new(vec![z0], Vec::new())
    }

    /// Replace the refractive indices of the media above and below the stack.
    pub fn with_ambient_indices(mut self, above: Real, below: Real) -> Result<Self> {
        ensure!(
            above.is_finite() && above > 0.0 && below.is_finite() && below > 0.0,
            "ambient refractive indices must be positive, got {above} and {below}"
        );
        self.ambient_index_above = above;
        self.ambient_index_below = below;
        Ok(self)
    }

    /// Append a layer spanning from the current bottom down to `boundary`.
    pub fn add_layer(&mut self, boundary: Length, properties: OpticalProperties) -> Result<()> {
        let last = self.bottom();
        if !(boundary.is_finite() && boundary > last) {
            return Err(Error::InvalidArgument(format!(
                "new layer boundary {boundary} must be greater than the last boundary {last}"
            )));
        }
        properties.validate()?;
        debug!(
            layer = self.properties.len(),
            top = last,
            bottom = boundary,
            "adding tissue layer"
        );
        self.boundaries.push(boundary);
        self.properties.push(properties);
        Ok(())
    }

    /// All boundary depths, surface first.
    pub fn layer_boundaries(&self) -> &[Length] {
        &self.boundaries
    }

    /// Per-layer optical properties, top layer first.
    pub fn layer_properties(&self) -> &[OpticalProperties] {
        &self.properties
    }

    /// Number of layers.
    pub fn num_layers(&self) -> usize {
        self.properties.len()
    }

    /// Whether the mesh has no layers yet.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Properties of layer `index`.
    pub fn layer(&self, index: usize) -> Result<&OpticalProperties> {
        self.properties.get(index).ok_or(Error::IndexOutOfRange {
            index,
            size: self.properties.len(),
        })
    }

    /// Depth range `(top, bottom)` of layer `index`.
    pub fn layer_bounds(&self, index: usize) -> Result<(Length, Length)> {
        self.layer(index)?;
        Ok((self.boundaries[index], self.boundaries[index + 1]))
    }

    /// Thickness of layer `index`.
    pub fn thickness(&self, index: usize) -> Result<Length> {
        let (top, bottom) = self.layer_bounds(index)?;
        Ok(bottom - top)
    }

    /// Surface depth.
    pub fn top(&self) -> Length {
        self.boundaries[0]
    }

    /// Depth of the deepest boundary.
    pub fn bottom(&self) -> Length {
        self.boundaries[self.boundaries.len() - 1]
    }

    /// Distance from the surface to the deepest boundary.
    pub fn total_thickness(&self) -> Length {
        self.bottom() - self.top()
    }

    /// Refractive index of the medium above the surface.
    pub fn ambient_index_above(&self) -> Real {
        self.ambient_index_above
    }

    /// Refractive index of the medium below the deepest boundary.
    pub fn ambient_index_below(&self) -> Real {
        self.ambient_index_below
    }

    /// Refractive index of whatever lies directly above layer `index`.
    pub fn index_above(&self, index: usize) -> Real {
        match index.checked_sub(1).and_then(|i| self.properties.get(i)) {
            Some(p) => p.n,
            None => self.ambient_index_above,
        }
    }

    /// Refractive index of whatever lies directly below layer `index`.
    pub fn index_below(&self, index: usize) -> Real {
        match self.properties.get(index + 1) {
            Some(p) => p.n,
            None => self.ambient_index_below,
        }
    }

    /// Index of the layer containing depth `z`, or `None` outside the mesh.
    ///
    /// A depth on an inner boundary belongs to the deeper layer; the bottom
    /// boundary belongs to the last layer.
    pub fn get_layer_index(&self, z: Length) -> Option<usize> {
        if self.is_empty() || !(z >= self.top() && z <= self.bottom()) {
            return None;
        }
        let idx = self.boundaries.partition_point(|&b| b <= z) - 1;
        Some(idx.min(self.num_layers() - 1))
    }

    /// Optical properties at depth `z`, or `None` outside the mesh.
    pub fn get_properties_at(&self, z: Length) -> Option<&OpticalProperties> {
        self.get_layer_index(z).map(|i| &self.properties[i])
    }

    /// Tabulated properties per layer, suitable for plotting against depth.
    pub fn property_profile(&self) -> Vec<LayerProfile> {
        self.properties
            .iter()
            .enumerate()
            .map(|(i, p)| LayerProfile {
                layer: i,
                top: self.boundaries[i],
                bottom: self.boundaries[i + 1],
                n: p.n,
                mu_s: p.mu_s,
                mu_a: p.mu_a,
                g: p.g,
                albedo: p.albedo(),
                mu_s_reduced: p.reduced_scattering(),
            })
            .collect()
    }
}
