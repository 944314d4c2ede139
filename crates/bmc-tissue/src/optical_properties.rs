//! Optical properties of a homogeneous tissue layer.

use bmc_core::{ensure, errors::Result, Coefficient, Real};
use serde::{Deserialize, Serialize};

/// Optical properties of one layer.
///
/// All four fields are required when deserialising; there are no defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpticalProperties {
    /// Refractive index.
    pub n: Real,
    /// Scattering coefficient μs (1/length).
    pub mu_s: Coefficient,
    /// Absorption coefficient μa (1/length).
    pub mu_a: Coefficient,
    /// Anisotropy factor g (mean cosine of the scattering angle).
    pub g: Real,
}

impl OpticalProperties {
    /// Create and validate a set of properties.
    pub fn new(n: Real, mu_s: Coefficient, mu_a: Coefficient, g: Real) -> Result<Self> {
        let props = Self { n, mu_s, mu_a, g };
        props.validate()?;
        Ok(props)
    }

    /// Check physical admissibility: `n > 0`, `μs ≥ 0`, `μa ≥ 0`,
    /// `-1 ≤ g ≤ 1`, every value finite.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.n.is_finite() && self.n > 0.0,
            "refractive index must be positive, got {}",
            self.n
        );
        ensure!(
            self.mu_s.is_finite() && self.mu_s >= 0.0,
            "scattering coefficient must be non-negative, got {}",
            self.mu_s
        );
        ensure!(
            self.mu_a.is_finite() && self.mu_a >= 0.0,
            "absorption coefficient must be non-negative, got {}",
            self.mu_a
        );
        ensure!(
            self.g.is_finite() && (-1.0..=1.0).contains(&self.g),
            "anisotropy must lie in [-1, 1], got {}",
            self.g
        );
        Ok(())
    }

    /// Total interaction coefficient `μt = μa + μs`.
    pub fn mu_t(&self) -> Coefficient {
        self.mu_a + self.mu_s
    }

    /// Single-scattering albedo `μs / μt`, zero for a transparent layer.
    pub fn albedo(&self) -> Real {
        let mu_t = self.mu_t();
        if mu_t > 0.0 {
            self.mu_s / mu_t
        } else {
            0.0
        }
    }

    /// Reduced scattering coefficient `μs' = μs (1 - g)`.
    pub fn reduced_scattering(&self) -> Coefficient {
        self.mu_s * (1.0 - self.g)
    }
}
