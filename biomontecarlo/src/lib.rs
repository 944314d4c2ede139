//! # biomontecarlo
//!
//! Monte Carlo simulation of photon transport in layered biological tissue.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `bmc-*` crates.
//!
//! ## Quick start
//!
//! ```rust
//! use biomontecarlo::analysis::Analysis;
//! use biomontecarlo::methods::{MonteCarloSimulator, SimulationConfig};
//! use biomontecarlo::tissue::{LayeredMesh, OpticalProperties};
//!
//! let mut mesh = LayeredMesh::with_surface(0.0)?;
//! mesh.add_layer(1.5, OpticalProperties::new(1.33, 10.0, 0.1, 0.9)?)?;
//! mesh.add_layer(3.0, OpticalProperties::new(1.57, 5.0, 0.1, 0.9)?)?;
//!
//! let simulator = MonteCarloSimulator::new(mesh, SimulationConfig::with_photons(500))?;
//! let results = simulator.run();
//!
//! let analysis = Analysis::new(&results, simulator.mesh())?;
//! let rates = analysis.reflection_transmission().unwrap();
//! assert!(rates.reflection_rate + rates.transmission_rate <= 1.0);
//! # Ok::<(), biomontecarlo::core::Error>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, geometry, and error definitions.
pub use bmc_core as core;

/// Random numbers, phase functions, and statistics.
pub use bmc_math as math;

/// Layered tissue meshes and optical properties.
pub use bmc_tissue as tissue;

/// Photon packets and the Monte Carlo simulator.
pub use bmc_methods as methods;

/// Result analysis and export.
pub use bmc_analysis as analysis;
