//! Derived quantities of a finished simulation.

use bmc_core::{ensure, errors::Result, Length, Real, Weight};
use bmc_math::{Histogram, Statistics};
use bmc_methods::{PhotonFate, SimulationResults};
use bmc_tissue::LayeredMesh;
use serde::Serialize;
use tracing::info;

/// Default bin count of the penetration-depth histogram.
pub const DEFAULT_DEPTH_BINS: usize = 50;

/// Default column count of the layered absorption map.
pub const DEFAULT_MAP_COLUMNS: usize = 10;

/// Absorption in one layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerAbsorption {
    /// Layer index.
    pub layer: usize,
    /// Display label, counting from 1.
    pub label: String,
    /// Upper boundary.
    pub top: Length,
    /// Lower boundary.
    pub bottom: Length,
    /// Total absorbed weight.
    pub absorbed: Weight,
    /// Absorbed weight per launched photon.
    pub fraction: Real,
}

/// Escape statistics.
///
/// Rates count photons; reflectance, transmittance, and absorbance are
/// weight fractions of the launched photons.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReflectionTransmission {
    /// Photons leaving through the surface.
    pub reflected: usize,
    /// Photons leaving through the deepest boundary.
    pub transmitted: usize,
    /// Photons terminated inside the tissue.
    pub absorbed: usize,
    /// Photons stopped by the step limit.
    pub lost: usize,
    /// `reflected / photons`.
    pub reflection_rate: Real,
    /// `transmitted / photons`.
    pub transmission_rate: Real,
    /// Weight reflected at the surface on entry.
    pub specular_reflectance: Real,
    /// Weight escaping through the surface after entering.
    pub diffuse_reflectance: Real,
    /// Weight escaping through the deepest boundary.
    pub total_transmittance: Real,
    /// Weight absorbed in the tissue.
    pub absorbance: Real,
}

/// Analysis of one simulation over the mesh it ran on.
pub struct Analysis<'a> {
    results: &'a SimulationResults,
    mesh: &'a LayeredMesh,
}

impl<'a> Analysis<'a> {
    /// Pair results with their mesh; the layer counts must agree.
    pub fn new(results: &'a SimulationResults, mesh: &'a LayeredMesh) -> Result<Self> {
        ensure!(
            results.absorption_profile.len() == mesh.num_layers(),
            "results have {} layers but the mesh has {}",
            results.absorption_profile.len(),
            mesh.num_layers()
        );
        Ok(Self { results, mesh })
    }

    /// The analysed results.
    pub fn results(&self) -> &SimulationResults {
        self.results
    }

    fn per_photon(&self, x: Real) -> Real {
        if self.results.num_photons == 0 {
            0.0
        } else {
            x / self.results.num_photons as Real
        }
    }

    /// Total absorption in each layer.
    pub fn absorption_profile(&self) -> Vec<LayerAbsorption> {
        self.mesh
            .property_profile()
            .into_iter()
            .zip(&self.results.absorption_profile)
            .map(|(row, &absorbed)| LayerAbsorption {
                layer: row.layer,
                label: format!("Layer {}", row.layer + 1),
                top: row.top,
                bottom: row.bottom,
                absorbed,
                fraction: self.per_photon(absorbed),
            })
            .collect()
    }

    /// Absorbed weight per photon per unit thickness, layer by layer.
    pub fn absorption_density(&self) -> Vec<Real> {
        self.absorption_profile()
            .into_iter()
            .map(|row| row.fraction / (row.bottom - row.top))
            .collect()
    }

    /// Reflection and transmission rates; `None` when no photon ran.
    pub fn reflection_transmission(&self) -> Option<ReflectionTransmission> {
        let r = self.results;
        if r.num_photons == 0 {
            return None;
        }
        let photons = r.num_photons as Real;
        let reflected = r.count(PhotonFate::Reflected);
        let transmitted = r.count(PhotonFate::Transmitted);
        let summary = ReflectionTransmission {
            reflected,
            transmitted,
            absorbed: r.count(PhotonFate::Absorbed),
            lost: r.count(PhotonFate::Lost),
            reflection_rate: reflected as Real / photons,
            transmission_rate: transmitted as Real / photons,
            specular_reflectance: r.specular_reflectance / photons,
            diffuse_reflectance: r.exit_weight(PhotonFate::Reflected) / photons,
            total_transmittance: r.exit_weight(PhotonFate::Transmitted) / photons,
            absorbance: r.total_absorbed() / photons,
        };
        info!(
            reflection_rate = summary.reflection_rate,
            transmission_rate = summary.transmission_rate,
            "escape rates"
        );
        Some(summary)
    }

    /// Maximum depth reached by each photon, in launch order.
    pub fn penetration_depths(&self) -> Vec<Length> {
        self.results.records.iter().map(|r| r.max_depth).collect()
    }

    /// Mean, spread, and extremes of the penetration depths.
    pub fn penetration_statistics(&self) -> Statistics {
        let mut stats = Statistics::new();
        for depth in self.penetration_depths() {
            stats.add(depth);
        }
        stats
    }

    /// Histogram of the maximum penetration depths.
    pub fn penetration_depth_distribution(&self, bins: usize) -> Result<Histogram> {
        Histogram::from_samples(&self.penetration_depths(), bins)
    }

    /// A `layers × columns` map; row `i` is filled with layer `i`'s total
    /// absorption (absorption is uniform across the x-y plane).
    pub fn layered_absorption_map(&self, columns: usize) -> Vec<Vec<Weight>> {
        self.results
            .absorption_profile
            .iter()
            .map(|&a| vec![a; columns])
            .collect()
    }

    /// Depth coordinate at every step of the recorded trajectories, at most
    /// `limit` of them.
    pub fn path_depths(&self, limit: usize) -> Vec<Vec<Length>> {
        self.results
            .photon_paths
            .iter()
            .take(limit)
            .map(|path| path.iter().map(|p| p.z).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use bmc_methods::PhotonRecord;
    use bmc_tissue::OpticalProperties;

    fn mesh() -> LayeredMesh {
        let p = OpticalProperties::new(1.0, 1.0, 0.1, 0.0).unwrap();
        LayeredMesh::new(vec![0.0, 1.0, 3.0], vec![p, p]).unwrap()
    }

    fn record(fate: PhotonFate, exit_weight: Weight, max_depth: Length) -> PhotonRecord {
        PhotonRecord {
            fate,
            exit_weight,
            max_depth,
            steps: 4,
        }
    }

    fn results() -> SimulationResults {
        SimulationResults {
            num_photons: 4,
            absorption_profile: vec![1.0, 0.5],
            specular_reflectance: 0.0,
            records: vec![
                record(PhotonFate::Reflected, 0.5, 0.4),
                record(PhotonFate::Transmitted, 1.0, 3.0),
                record(PhotonFate::Absorbed, 0.0, 1.2),
                record(PhotonFate::Transmitted, 1.0, 3.0),
            ],
            photon_paths: Vec::new(),
        }
    }

    #[test]
    fn rates_and_weights() {
        let (r, m) = (results(), mesh());
        let a = Analysis::new(&r, &m).unwrap();
        let rt = a.reflection_transmission().unwrap();
        assert_eq!(rt.reflected, 1);
        assert_eq!(rt.transmitted, 2);
        assert_abs_diff_eq!(rt.reflection_rate, 0.25, epsilon = 1e-15);
        assert_abs_diff_eq!(rt.transmission_rate, 0.5, epsilon = 1e-15);
        assert_abs_diff_eq!(rt.diffuse_reflectance, 0.125, epsilon = 1e-15);
        assert_abs_diff_eq!(
            rt.diffuse_reflectance + rt.total_transmittance + rt.absorbance,
            1.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn profile_labels_and_density() {
        let (r, m) = (results(), mesh());
        let a = Analysis::new(&r, &m).unwrap();
        let profile = a.absorption_profile();
        assert_eq!(profile[1].label, "Layer 2");
        assert_abs_diff_eq!(profile[0].fraction, 0.25, epsilon = 1e-15);
        let density = a.absorption_density();
        assert_abs_diff_eq!(density[1], 0.125 / 2.0, epsilon = 1e-15);
    }

    #[test]
    fn depth_histogram_and_map() {
        let (r, m) = (results(), mesh());
        let a = Analysis::new(&r, &m).unwrap();
        let hist = a.penetration_depth_distribution(DEFAULT_DEPTH_BINS).unwrap();
        assert_eq!(hist.total(), 4);
        assert_eq!(hist.counts()[DEFAULT_DEPTH_BINS - 1], 2);
        assert_abs_diff_eq!(a.penetration_statistics().mean().unwrap(), 1.9, epsilon = 1e-12);

        let map = a.layered_absorption_map(DEFAULT_MAP_COLUMNS);
        assert_eq!(map.len(), 2);
        assert!(map[1].iter().all(|&v| v == 0.5));
        assert_eq!(map[0].len(), DEFAULT_MAP_COLUMNS);
    }

    #[test]
    fn empty_and_mismatched_results() {
        let m = mesh();
        let empty = SimulationResults::new(2);
        let a = Analysis::new(&empty, &m).unwrap();
        assert!(a.reflection_transmission().is_none());
        assert!(a.penetration_depth_distribution(10).is_err());

        let wrong = SimulationResults::new(3);
        assert!(Analysis::new(&wrong, &m).is_err());
    }
}
