//! # bmc-analysis
//!
//! Post-processing of photon transport runs: absorption per layer, escape
//! rates, penetration-depth distributions, the layered absorption map, and
//! their CSV / JSON export.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Derived quantities.
pub mod analysis;

/// CSV and JSON writers.
pub mod export;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use analysis::{Analysis, LayerAbsorption, ReflectionTransmission};
pub use export::{write_all, Report};
