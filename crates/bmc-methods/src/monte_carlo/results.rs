//! Aggregated simulation output.

use bmc_core::{Length, Vector3, Weight};
use serde::Serialize;

use super::photon::PhotonFate;

/// Summary of one photon packet's history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PhotonRecord {
    /// How the packet left the simulation.
    pub fate: PhotonFate,
    /// Weight carried out of the tissue (reflected, transmitted) or
    /// abandoned at the step limit; zero for absorbed packets.
    pub exit_weight: Weight,
    /// Deepest `z` reached.
    pub max_depth: Length,
    /// Number of transport steps (scattering events and boundary hits).
    pub steps: usize,
}

/// Everything a [`MonteCarloSimulator`](super::MonteCarloSimulator) run
/// produces.
///
/// Weight is conserved: specular reflectance, absorption, and the exit
/// weights of all records sum to the number of photons launched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SimulationResults {
    /// Photons launched.
    pub num_photons: usize,
    /// Absorbed weight per layer.
    pub absorption_profile: Vec<Weight>,
    /// Total weight reflected at the surface before entering the tissue.
    pub specular_reflectance: Weight,
    /// One record per photon, in launch order.
    pub records: Vec<PhotonRecord>,
    /// Trajectories of the first photons launched, in launch order.
    pub photon_paths: Vec<Vec<Vector3>>,
}

impl SimulationResults {
    /// Empty results for a mesh of `layers` layers.
    pub fn new(layers: usize) -> Self {
        Self {
            absorption_profile: vec![0.0; layers],
            ..Self::default()
        }
    }

    /// Append another batch; `other` must come from later photons.
    pub fn merge(&mut self, other: SimulationResults) {
        self.num_photons += other.num_photons;
        for (acc, w) in self
            .absorption_profile
            .iter_mut()
            .zip(other.absorption_profile)
        {
            *acc += w;
        }
        self.specular_reflectance += other.specular_reflectance;
        self.records.extend(other.records);
        self.photon_paths.extend(other.photon_paths);
    }

    /// Number of photons with the given fate.
    pub fn count(&self, fate: PhotonFate) -> usize {
        self.records.iter().filter(|r| r.fate == fate).count()
    }

    /// Summed exit weight of photons with the given fate.
    pub fn exit_weight(&self, fate: PhotonFate) -> Weight {
        self.records
            .iter()
            .filter(|r| r.fate == fate)
            .map(|r| r.exit_weight)
            .sum()
    }

    /// Total absorbed weight over all layers.
    pub fn total_absorbed(&self) -> Weight {
        self.absorption_profile.iter().sum()
    }

    /// Sum of every weight sink; equals `num_photons` up to rounding.
    pub fn weight_balance(&self) -> Weight {
        self.specular_reflectance
            + self.total_absorbed()
            + self.records.iter().map(|r| r.exit_weight).sum::<Weight>()
    }
}
