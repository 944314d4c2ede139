//! Vector helpers for photon positions and directions.

use crate::{ensure, errors::Result, Angle, Real, Vector3};

/// Directions closer than this to the z axis are treated as parallel to it
/// when deflecting.
const AXIS_TOLERANCE: Real = 1.0e-12;

/// The unit vector pointing into the tissue (`+z`).
pub fn unit_z() -> Vector3 {
    Vector3::new(0.0, 0.0, 1.0)
}

/// Normalise `v` to unit length.
///
/// Fails for vectors with a non-finite component or zero length.
pub fn normalize(v: Vector3) -> Result<Vector3> {
    ensure!(
        v.iter().all(|c| c.is_finite()),
        "direction must be finite, got ({}, {}, {})",
        v.x,
        v.y,
        v.z
    );
    let norm = v.norm();
    ensure!(norm > 0.0, "direction must have non-zero length");
    Ok(v / norm)
}

/// Deflect the unit vector `direction` by the polar angle `theta` and the
/// azimuthal angle `phi`, both measured relative to `direction` itself.
///
/// The result is renormalised so rounding errors do not accumulate over
/// many scattering events.
pub fn deflect(direction: &Vector3, theta: Angle, phi: Angle) -> Vector3 {
    let (sin_t, cos_t) = theta.sin_cos();
    let (sin_p, cos_p) = phi.sin_cos();
    let (ux, uy, uz) = (direction.x, direction.y, direction.z);

    let deflected = if uz.abs() > 1.0 - AXIS_TOLERANCE {
        Vector3::new(sin_t * cos_p, sin_t * sin_p, uz.signum() * cos_t)
    } else {
        let temp = (1.0 - uz * uz).sqrt();
        Vector3::new(
            sin_t * (ux * uz * cos_p - uy * sin_p) / temp + ux * cos_t,
            sin_t * (uy * uz * cos_p + ux * sin_p) / temp + uy * cos_t,
            -sin_t * cos_p * temp + uz * cos_t,
        )
    };
    deflected / deflected.norm()
}
