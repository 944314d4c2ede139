//! # bmc-math
//!
//! Mathematical utilities for photon transport: a seedable Mersenne Twister
//! uniform generator (over `rand_mt`, usable with `rand_distr`), the
//! Henyey–Greenstein phase function, and statistics accumulators.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Floating-point comparison utilities.
pub mod comparison;

/// Scattering phase functions.
pub mod phase_functions;

/// Random number generators.
pub mod random_numbers;

/// Statistics accumulators and histograms.
pub mod statistics;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use comparison::close_enough;
pub use phase_functions::{henyey_greenstein_pdf, sample_henyey_greenstein};
pub use random_numbers::{MersenneTwisterUniformRng, SeedSequence};
pub use statistics::{Histogram, Statistics};
