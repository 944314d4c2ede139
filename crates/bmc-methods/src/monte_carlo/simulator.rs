//! The photon transport simulator.

use bmc_core::{
    ensure, geometry, errors::Result, Length, Real, Size, Vector3, Weight,
};
use bmc_math::{MersenneTwisterUniformRng, SeedSequence};
use bmc_tissue::LayeredMesh;
use rand::Rng;
use rand_distr::{Distribution, Exp1};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use super::fresnel::fresnel_reflectance;
use super::photon::{Photon, PhotonFate, DEFAULT_WEIGHT_THRESHOLD};
use super::results::{PhotonRecord, SimulationResults};

/// Run parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Photon packets to launch.
    pub num_photons: Size,
    /// Launch direction; normalised before use and must point into the
    /// tissue (`z > 0`).
    pub initial_direction: [Real; 3],
    /// Master seed.  Equal seeds give identical results.
    pub seed: u64,
    /// Packets lighter than this are terminated as absorbed.
    pub weight_threshold: Weight,
    /// Keep the trajectories of this many photons (the first launched).
    pub recorded_paths: Size,
    /// Step limit per photon, after which it is reported as lost.
    pub max_steps_per_photon: Size,
    /// Photons per parallel batch.  Changing it changes the random streams.
    pub batch_size: Size,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_photons: 10_000,
            initial_direction: [0.0, 0.0, 1.0],
            seed: 42,
            weight_threshold: DEFAULT_WEIGHT_THRESHOLD,
            recorded_paths: 100,
            max_steps_per_photon: 100_000,
            batch_size: 1_000,
        }
    }
}

impl SimulationConfig {
    /// Configuration for `num_photons` photons, everything else default.
    pub fn with_photons(num_photons: Size) -> Self {
        Self {
            num_photons,
            ..Self::default()
        }
    }
}

/// Monte Carlo simulator of photon packets in a [`LayeredMesh`].
///
/// Each packet starts at the surface, loses the Fresnel specular fraction,
/// and then alternates exponentially distributed free flights (in units of
/// the local scattering coefficient) with Henyey–Greenstein scattering.
/// Absorption is continuous along every flight segment and deposited in the
/// layer the segment lies in.  Interfaces reflect or refract the packet
/// stochastically with the Fresnel probability.
#[derive(Debug, Clone)]
pub struct MonteCarloSimulator {
    mesh: LayeredMesh,
    config: SimulationConfig,
    launch: Photon,
}

/// Outcome of one photon history.
struct History {
    record: PhotonRecord,
    specular: Weight,
    path: Option<Vec<Vector3>>,
}

impl MonteCarloSimulator {
    /// Validate the run parameters against the mesh.
    pub fn new(mesh: LayeredMesh, config: SimulationConfig) -> Result<Self> {
        ensure!(!mesh.is_empty(), "the mesh has no layers");
        ensure!(config.num_photons > 0, "number of photons must be positive");
        ensure!(config.batch_size > 0, "batch size must be positive");
        ensure!(
            config.max_steps_per_photon > 0,
            "step limit per photon must be positive"
        );
        ensure!(
            config.weight_threshold > 0.0 && config.weight_threshold < 1.0,
            "weight threshold must lie in (0, 1), got {}",
            config.weight_threshold
        );
        let [x, y, z] = config.initial_direction;
        let direction = geometry::normalize(Vector3::new(x, y, z))?;
        ensure!(
            direction.z > 0.0,
            "initial direction must point into the tissue (positive z), got {:?}",
            config.initial_direction
        );
        let launch = Photon::new(Vector3::new(0.0, 0.0, mesh.top()), direction)?;
        Ok(Self {
            mesh,
            config,
            launch,
        })
    }

    /// The simulated tissue.
    pub fn mesh(&self) -> &LayeredMesh {
        &self.mesh
    }

    /// The run parameters.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Propagate all photons.
    ///
    /// Batches run in parallel; batch `k` draws from stream `k` of the seed
    /// sequence, so the results do not depend on the thread count.
    pub fn run(&self) -> SimulationResults {
        let n = self.config.num_photons;
        let batch = self.config.batch_size;
        let batches = n.div_ceil(batch);
        let span = info_span!("simulation", photons = n, layers = self.mesh.num_layers());
        let _guard = span.enter();
        info!(batches, seed = self.config.seed, "starting photon transport");

        let seeds = SeedSequence::new(self.config.seed);
        let partials: Vec<SimulationResults> = (0..batches)
            .into_par_iter()
            .map(|k| {
                let first = k * batch;
                let count = batch.min(n - first);
                self.run_batch(seeds.stream(k as u64), first, count)
            })
            .collect();

        let mut results = SimulationResults::new(self.mesh.num_layers());
        for partial in partials {
            results.merge(partial);
        }
        info!(
            reflected = results.count(PhotonFate::Reflected),
            transmitted = results.count(PhotonFate::Transmitted),
            absorbed = results.count(PhotonFate::Absorbed),
            lost = results.count(PhotonFate::Lost),
            "photon transport finished"
        );
        results
    }

    fn run_batch(
        &self,
        mut rng: MersenneTwisterUniformRng,
        first: usize,
        count: usize,
    ) -> SimulationResults {
        let mut results = SimulationResults::new(self.mesh.num_layers());
        results.num_photons = count;
        results.records.reserve(count);
        for i in first..first + count {
            let record_path = i < self.config.recorded_paths;
            let history = self.trace(&mut rng, &mut results.absorption_profile, record_path);
            results.specular_reflectance += history.specular;
            results.records.push(history.record);
            if let Some(path) = history.path {
                results.photon_paths.push(path);
            }
        }
        debug!(first, count, "batch finished");
        results
    }

    /// Follow one photon until it leaves the simulation, depositing its
    /// absorbed weight into `absorbed`.
    fn trace<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        absorbed: &mut [Weight],
        record_path: bool,
    ) -> History {
        let mesh = &self.mesh;
        let boundaries = mesh.layer_boundaries();
        let mut photon = self.launch.clone();
        if record_path {
            photon = photon.recording();
        }

        // specular reflection at the surface
        let n_out = mesh.ambient_index_above();
        let n_in = mesh.layer_properties()[0].n;
        let (r_sp, cos_t) = fresnel_reflectance(n_out, n_in, photon.direction().z);
        photon.set_weight(1.0 - r_sp);
        photon.refract_z(n_out, n_in, cos_t);

        let mut layer = 0usize;
        let mut steps = 0usize;
        let mut exit_weight = 0.0;

        let fate = 'transport: loop {
            // grazing launch: nothing worth following enters the tissue
            if steps == 0 && !photon.check_weight(self.config.weight_threshold) {
                exit_weight = photon.terminate();
                break 'transport PhotonFate::Reflected;
            }
            let mut tau: Real = Exp1.sample(rng);
            loop {
                steps += 1;
                if steps > self.config.max_steps_per_photon {
                    exit_weight = photon.terminate();
                    break 'transport PhotonFate::Lost;
                }

                let props = &mesh.layer_properties()[layer];
                let uz = photon.direction().z;
                let z = photon.position().z;
                let to_boundary: Length = if uz > 0.0 {
                    (boundaries[layer + 1] - z) / uz
                } else if uz < 0.0 {
                    (boundaries[layer] - z) / uz
                } else {
                    Real::INFINITY
                };
                let free_path = if props.mu_s > 0.0 {
                    tau / props.mu_s
                } else {
                    Real::INFINITY
                };

                if free_path <= to_boundary {
                    // interaction inside the layer
                    if free_path.is_infinite() {
                        // transparent layer, travelling parallel to it
                        exit_weight = photon.terminate();
                        break 'transport PhotonFate::Lost;
                    }
                    photon.move_by(free_path);
                    absorbed[layer] += photon.absorb(props.mu_a, free_path);
                    if !photon.check_weight(self.config.weight_threshold) {
                        absorbed[layer] += photon.terminate();
                        break 'transport PhotonFate::Absorbed;
                    }
                    photon.scatter(props.g, rng);
                    break;
                }

                // hit an interface
                let to_boundary = to_boundary.max(0.0);
                let mut hit = *photon.position() + photon.direction() * to_boundary;
                hit.z = if uz > 0.0 {
                    boundaries[layer + 1]
                } else {
                    boundaries[layer]
                };
                photon.place_at(hit);
                absorbed[layer] += photon.absorb(props.mu_a, to_boundary);
                tau = (tau - props.mu_s * to_boundary).max(0.0);
                if !photon.check_weight(self.config.weight_threshold) {
                    absorbed[layer] += photon.terminate();
                    break 'transport PhotonFate::Absorbed;
                }

                let downward = uz > 0.0;
                let n1 = props.n;
                let n2 = if downward {
                    mesh.index_below(layer)
                } else {
                    mesh.index_above(layer)
                };
                let (r, cos_t) = fresnel_reflectance(n1, n2, uz);
                if rng.gen::<Real>() < r {
                    photon.reflect_z();
                    continue;
                }
                photon.refract_z(n1, n2, cos_t);
                match (downward, layer) {
                    (false, 0) => {
                        exit_weight = photon.terminate();
                        break 'transport PhotonFate::Reflected;
                    }
                    (false, _) => layer -= 1,
                    (true, l) if l + 1 == mesh.num_layers() => {
                        exit_weight = photon.terminate();
                        break 'transport PhotonFate::Transmitted;
                    }
                    (true, _) => layer += 1,
                }
            }
        };

        let max_depth = photon.max_depth();
        History {
            record: PhotonRecord {
                fate,
                exit_weight,
                max_depth,
                steps,
            },
            specular: r_sp,
            path: photon.into_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use bmc_tissue::OpticalProperties;

    fn slab(n: Real, mu_s: Real, mu_a: Real, g: Real, thickness: Length) -> LayeredMesh {
        LayeredMesh::new(
            vec![0.0, thickness],
            vec![OpticalProperties::new(n, mu_s, mu_a, g).unwrap()],
        )
        .unwrap()
    }

    #[test]
    fn rejects_invalid_configuration() {
        let mesh = slab(1.0, 1.0, 0.1, 0.0, 1.0);
        let mut config = SimulationConfig::with_photons(0);
        assert!(MonteCarloSimulator::new(mesh.clone(), config.clone()).is_err());
        config.num_photons = 10;
        config.initial_direction = [0.0, 0.0, -1.0];
        assert!(MonteCarloSimulator::new(mesh.clone(), config.clone()).is_err());
        config.initial_direction = [0.0, 0.0, 0.0];
        assert!(MonteCarloSimulator::new(mesh.clone(), config.clone()).is_err());
        config.initial_direction = [0.0, 0.0, 1.0];
        config.weight_threshold = 1.5;
        assert!(MonteCarloSimulator::new(mesh, config).is_err());
        let empty = LayeredMesh::with_surface(0.0).unwrap();
        assert!(MonteCarloSimulator::new(empty, SimulationConfig::default()).is_err());
    }

    #[test]
    fn transparent_slab_transmits_ballistically() {
        let mesh = slab(1.0, 0.0, 0.0, 0.0, 2.0);
        let sim = MonteCarloSimulator::new(mesh, SimulationConfig::with_photons(100)).unwrap();
        let results = sim.run();
        assert_eq!(results.count(PhotonFate::Transmitted), 100);
        assert_abs_diff_eq!(results.exit_weight(PhotonFate::Transmitted), 100.0, epsilon = 1e-9);
        assert!(results.records.iter().all(|r| r.max_depth == 2.0));
    }

    #[test]
    fn pure_absorber_follows_beer_lambert() {
        let mesh = slab(1.0, 0.0, 1.0, 0.0, 1.0);
        let sim = MonteCarloSimulator::new(mesh, SimulationConfig::with_photons(10)).unwrap();
        let results = sim.run();
        let per_photon = results.exit_weight(PhotonFate::Transmitted) / 10.0;
        assert_abs_diff_eq!(per_photon, (-1.0f64).exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(results.absorption_profile[0], 10.0 * (1.0 - (-1.0f64).exp()), epsilon = 1e-9);
    }

    #[test]
    fn specular_reflection_at_index_mismatch() {
        let mesh = slab(1.5, 0.0, 0.0, 0.0, 1.0);
        let sim = MonteCarloSimulator::new(mesh, SimulationConfig::with_photons(50)).unwrap();
        let results = sim.run();
        assert_abs_diff_eq!(results.specular_reflectance, 50.0 * 0.04, epsilon = 1e-9);
    }

    #[test]
    fn weight_is_conserved() {
        let mesh = LayeredMesh::new(
            vec![0.0, 0.5, 1.5],
            vec![
                OpticalProperties::new(1.37, 20.0, 0.5, 0.8).unwrap(),
                OpticalProperties::new(1.45, 10.0, 1.0, 0.0).unwrap(),
            ],
        )
        .unwrap();
        let sim = MonteCarloSimulator::new(mesh, SimulationConfig::with_photons(2_000)).unwrap();
        let results = sim.run();
        assert_eq!(results.records.len(), 2_000);
        assert_abs_diff_eq!(results.weight_balance(), 2_000.0, epsilon = 1e-6);
    }

    #[test]
    fn same_seed_reproduces_results() {
        let mesh = slab(1.4, 10.0, 0.1, 0.9, 1.0);
        let mut config = SimulationConfig::with_photons(1_500);
        config.batch_size = 400;
        let a = MonteCarloSimulator::new(mesh.clone(), config.clone()).unwrap().run();
        let b = MonteCarloSimulator::new(mesh.clone(), config.clone()).unwrap().run();
        assert_eq!(a.records, b.records);
        assert_eq!(a.absorption_profile, b.absorption_profile);

        config.seed += 1;
        let c = MonteCarloSimulator::new(mesh, config).unwrap().run();
        assert_ne!(a.records, c.records);
    }

    #[test]
    fn grazing_launch_is_reflected_at_the_surface() {
        let mesh = slab(1.4, 10.0, 0.1, 0.9, 1.0);
        let mut config = SimulationConfig::with_photons(20);
        config.initial_direction = [1.0, 0.0, 1e-7];
        let results = MonteCarloSimulator::new(mesh, config).unwrap().run();
        assert_eq!(results.count(PhotonFate::Reflected), 20);
        assert_eq!(results.count(PhotonFate::Absorbed), 0);
        assert!(results.records.iter().all(|r| r.steps == 0));
        assert_eq!(results.total_absorbed(), 0.0);
        assert_abs_diff_eq!(results.weight_balance(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn step_limit_reports_lost_photons() {
        // thick, dense slab: the first step always ends in a collision
        let mesh = slab(1.0, 100.0, 0.1, 0.9, 10.0);
        let mut config = SimulationConfig::with_photons(50);
        config.max_steps_per_photon = 1;
        let results = MonteCarloSimulator::new(mesh, config).unwrap().run();
        assert_eq!(results.count(PhotonFate::Lost), 50);
        assert!(results.records.iter().all(|r| r.exit_weight > 0.0));
        assert!(results.exit_weight(PhotonFate::Lost) > 0.0);
        assert_abs_diff_eq!(results.weight_balance(), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn records_only_the_first_paths() {
        let mesh = slab(1.4, 10.0, 0.1, 0.9, 1.0);
        let mut config = SimulationConfig::with_photons(300);
        config.recorded_paths = 7;
        config.batch_size = 5;
        let results = MonteCarloSimulator::new(mesh, config).unwrap().run();
        assert_eq!(results.photon_paths.len(), 7);
        for path in &results.photon_paths {
            assert_eq!(path[0], Vector3::new(0.0, 0.0, 0.0));
        }
    }
}
