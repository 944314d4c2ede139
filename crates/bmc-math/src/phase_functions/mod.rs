//! Scattering phase functions.
//!
//! The Henyey–Greenstein function is the standard single-parameter model of
//! anisotropic scattering in tissue.  Its anisotropy factor `g` is the mean
//! cosine of the scattering angle: `g = 0` is isotropic, `g → 1` strongly
//! forward, `g → -1` strongly backward.

use bmc_core::{Angle, Real};
use rand::Rng;

/// Below this `|g|` the isotropic limit is sampled directly, since the
/// general inverse formula divides by `2g`.
pub const ISOTROPIC_THRESHOLD: Real = 1e-10;

/// Henyey–Greenstein density in `cos θ`, normalised over `[-1, 1]`.
///
/// `p(μ) = (1 - g²) / (2 (1 + g² - 2gμ)^{3/2})`
pub fn henyey_greenstein_pdf(g: Real, cos_theta: Real) -> Real {
    let g2 = g * g;
    let denom = 1.0 + g2 - 2.0 * g * cos_theta;
    (1.0 - g2) / (2.0 * denom * denom.sqrt())
}

/// Sample `cos θ` from the Henyey–Greenstein distribution.
pub fn sample_henyey_greenstein_cos<R: Rng + ?Sized>(g: Real, rng: &mut R) -> Real {
    let xi: Real = rng.gen();
    let cos_theta = if g.abs() < ISOTROPIC_THRESHOLD {
        2.0 * xi - 1.0
    } else if 1.0 - g.abs() < ISOTROPIC_THRESHOLD {
        g.signum()
    } else {
        let g2 = g * g;
        let frac = (1.0 - g2) / (1.0 - g + 2.0 * g * xi);
        (1.0 + g2 - frac * frac) / (2.0 * g)
    };
    cos_theta.clamp(-1.0, 1.0)
}

/// Sample a scattering angle `θ ∈ [0, π]` by inverse transform sampling.
pub fn sample_henyey_greenstein<R: Rng + ?Sized>(g: Real, rng: &mut R) -> Angle {
    sample_henyey_greenstein_cos(g, rng).acos()
}
