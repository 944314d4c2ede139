//! Monte Carlo photon transport.
//!
//! # Overview
//!
//! * [`Photon`] — a weighted packet with position, direction, and trajectory
//! * [`fresnel_reflectance`] — reflection probability at index mismatches
//! * [`MonteCarloSimulator`] — launches packets into a layered mesh
//! * [`SimulationResults`] — absorption per layer and per-photon records

mod fresnel;
mod photon;
mod results;
mod simulator;

pub use fresnel::{critical_sine, fresnel_reflectance};
pub use photon::{Photon, PhotonFate, DEFAULT_WEIGHT_THRESHOLD};
pub use results::{PhotonRecord, SimulationResults};
pub use simulator::{MonteCarloSimulator, SimulationConfig};
