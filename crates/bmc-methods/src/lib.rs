//! # bmc-methods
//!
//! Numerical methods for light transport in tissue.
//!
//! # Modules
//!
//! * [`monte_carlo`] — photon packets, Fresnel interfaces, and the
//!   parallel Monte Carlo simulator

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Monte Carlo photon transport: packets, interfaces, simulator, results.
pub mod monte_carlo;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use monte_carlo::{
    fresnel_reflectance, MonteCarloSimulator, Photon, PhotonFate, PhotonRecord,
    SimulationConfig, SimulationResults,
};
