//! # bmc-tissue
//!
//! Tissue geometry for photon transport: per-layer optical properties, the
//! planar [`LayeredMesh`], and TOML tissue descriptions.
//!
//! Depth `z` increases into the tissue.  A mesh with boundaries
//! `b_0 < b_1 < … < b_N` has `N` layers, layer `i` spanning `[b_i, b_{i+1})`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// TOML tissue descriptions.
pub mod config;

/// The layered slab geometry.
pub mod mesh;

/// Refractive index, scattering, absorption, and anisotropy of a layer.
pub mod optical_properties;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use config::{LayerConfig, TissueConfig};
pub use mesh::{LayerProfile, LayeredMesh};
pub use optical_properties::OpticalProperties;
