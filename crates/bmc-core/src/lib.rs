//! # bmc-core
//!
//! Core types, geometry helpers, and error definitions for BioMonteCarlo.
//!
//! This crate provides the foundational building blocks shared across all
//! other crates in the workspace – type aliases, the error hierarchy with its
//! `ensure!` / `fail!` macros, and the 3-D vector type used for photon
//! positions and directions.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` / `fail!` / `ensure_post!` macros.
pub mod errors;

/// Vectors, unit directions, and spherical deflections.
pub mod geometry;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// Alias used for array sizes / indices.
pub type Size = usize;

/// A length or depth, in the same unit as the tissue boundaries.
pub type Length = Real;

/// An interaction coefficient (absorption or scattering), in 1/length.
pub type Coefficient = Real;

/// The statistical weight carried by a photon packet, in [0, 1].
pub type Weight = Real;

/// An angle in radians.
pub type Angle = Real;

/// A 3-D vector of reals (positions and directions).
pub type Vector3 = nalgebra::Vector3<Real>;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
