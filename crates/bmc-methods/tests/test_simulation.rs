//! End-to-end photon transport checks on small tissues.

use approx::assert_abs_diff_eq;
use bmc_methods::{MonteCarloSimulator, PhotonFate, SimulationConfig};
use bmc_tissue::{LayeredMesh, OpticalProperties};

fn props(n: f64, mu_s: f64, mu_a: f64, g: f64) -> OpticalProperties {
    OpticalProperties::new(n, mu_s, mu_a, g).unwrap()
}

/// Five layers, the deepest one much thicker than the others.
fn five_layer_mesh() -> LayeredMesh {
    let mut mesh = LayeredMesh::with_surface(0.0).unwrap();
    mesh.add_layer(1.5, props(1.0, 10.0, 0.1, 0.9)).unwrap();
    mesh.add_layer(3.0, props(1.33, 5.0, 0.1, 0.9)).unwrap();
    mesh.add_layer(5.0, props(1.57, 5.0, 0.1, 0.9)).unwrap();
    mesh.add_layer(15.0, props(1.4, 10.0, 0.0, 0.9)).unwrap();
    mesh.add_layer(25.0, props(1.4, 10.0, 0.1, 0.9)).unwrap();
    mesh
}

#[test]
fn every_photon_is_accounted_for() {
    let sim = MonteCarloSimulator::new(five_layer_mesh(), SimulationConfig::with_photons(3_000))
        .unwrap();
    let results = sim.run();

    assert_eq!(results.num_photons, 3_000);
    assert_eq!(results.records.len(), 3_000);
    let fates: usize = [
        PhotonFate::Reflected,
        PhotonFate::Transmitted,
        PhotonFate::Absorbed,
        PhotonFate::Lost,
    ]
    .into_iter()
    .map(|f| results.count(f))
    .sum();
    assert_eq!(fates, 3_000);
    assert_eq!(results.count(PhotonFate::Lost), 0);
    assert_abs_diff_eq!(results.weight_balance(), 3_000.0, epsilon = 1e-6);
}

#[test]
fn non_absorbing_layer_absorbs_nothing() {
    let sim = MonteCarloSimulator::new(five_layer_mesh(), SimulationConfig::with_photons(1_000))
        .unwrap();
    let results = sim.run();
    assert_eq!(results.absorption_profile.len(), 5);
    assert_eq!(results.absorption_profile[3], 0.0);
    assert!(results.absorption_profile[0] > 0.0);
}

#[test]
fn results_do_not_depend_on_thread_count() {
    let mut config = SimulationConfig::with_photons(2_000);
    config.batch_size = 250;
    let sim = MonteCarloSimulator::new(five_layer_mesh(), config).unwrap();

    let single = rayon::ThreadPoolBuilder::new()
        .num_threads(1)
        .build()
        .unwrap()
        .install(|| sim.run());
    let many = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .unwrap()
        .install(|| sim.run());

    assert_eq!(single.records, many.records);
    assert_eq!(single.absorption_profile, many.absorption_profile);
}

#[test]
fn forward_scattering_penetrates_deeper() {
    let slab = |g: f64| {
        LayeredMesh::new(vec![0.0, 2.0], vec![props(1.0, 10.0, 0.0, g)]).unwrap()
    };
    let run = |g: f64| {
        MonteCarloSimulator::new(slab(g), SimulationConfig::with_photons(4_000))
            .unwrap()
            .run()
    };
    let isotropic = run(0.0);
    let forward = run(0.9);
    let t_iso = isotropic.count(PhotonFate::Transmitted) as f64 / 4_000.0;
    let t_fwd = forward.count(PhotonFate::Transmitted) as f64 / 4_000.0;
    assert!(
        t_fwd > t_iso + 0.2,
        "forward transmission {t_fwd:.3} should clearly exceed isotropic {t_iso:.3}"
    );
}

#[test]
fn thin_weak_scatterer_matches_single_scattering_limit() {
    // optical thickness 0.05: unscattered transmission ≈ e^{-0.05}
    let mesh = LayeredMesh::new(vec![0.0, 0.05], vec![props(1.0, 1.0, 0.0, 0.0)]).unwrap();
    let results = MonteCarloSimulator::new(mesh, SimulationConfig::with_photons(20_000))
        .unwrap()
        .run();
    let ballistic = results
        .records
        .iter()
        .filter(|r| r.fate == PhotonFate::Transmitted && r.steps == 1)
        .count() as f64
        / 20_000.0;
    assert_abs_diff_eq!(ballistic, (-0.05f64).exp(), epsilon = 0.01);
}

#[test]
fn oblique_launch_is_accepted() {
    let mut config = SimulationConfig::with_photons(500);
    config.initial_direction = [1.0, 0.0, 1.0];
    let results = MonteCarloSimulator::new(five_layer_mesh(), config)
        .unwrap()
        .run();
    assert_abs_diff_eq!(results.weight_balance(), 500.0, epsilon = 1e-6);
}

proptest::proptest! {
    #![proptest_config(proptest::prelude::ProptestConfig::with_cases(16))]

    #[test]
    fn weight_balance_holds_for_any_slab(
        n in 1.0f64..1.6,
        mu_s in 0.0f64..30.0,
        mu_a in 0.0f64..5.0,
        g in -0.9f64..0.99,
        thickness in 0.05f64..3.0,
        seed in proptest::prelude::any::<u32>(),
    ) {
        let mesh = LayeredMesh::new(vec![0.0, thickness], vec![props(n, mu_s, mu_a, g)]).unwrap();
        let mut config = SimulationConfig::with_photons(200);
        config.seed = u64::from(seed);
        let results = MonteCarloSimulator::new(mesh, config).unwrap().run();
        proptest::prop_assert!((results.weight_balance() - 200.0).abs() < 1e-6);
        proptest::prop_assert!(results.absorption_profile[0] >= 0.0);
    }
}
