//! The photon packet.

use bmc_core::{
    geometry::{self, deflect},
    errors::Result,
    Coefficient, Length, Real, Vector3, Weight,
};
use bmc_math::sample_henyey_greenstein;
use rand::Rng;
use rand_distr::{Distribution, Uniform};
use serde::Serialize;
use std::f64::consts::PI;

/// Weight below which a packet is considered fully absorbed.
pub const DEFAULT_WEIGHT_THRESHOLD: Weight = 1e-3;

/// How a photon packet left the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhotonFate {
    /// Escaped through the surface, back into the medium above.
    Reflected,
    /// Escaped through the deepest boundary.
    Transmitted,
    /// Weight fell below the termination threshold inside the tissue.
    Absorbed,
    /// Hit the per-photon step limit.
    Lost,
}

/// A weighted photon packet travelling through tissue.
///
/// When recording, every position the packet visits is kept in order,
/// starting with the launch point.
#[derive(Debug, Clone)]
pub struct Photon {
    position: Vector3,
    direction: Vector3,
    weight: Weight,
    alive: bool,
    max_depth: Length,
    path: Option<Vec<Vector3>>,
}

impl Default for Photon {
    /// A packet at the origin heading along `+z` with unit weight.
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            direction: geometry::unit_z(),
            weight: 1.0,
            alive: true,
            max_depth: 0.0,
            path: None,
        }
    }
}

impl Photon {
    /// Launch a packet at `position` heading along `direction` (normalised
    /// here).
    pub fn new(position: Vector3, direction: Vector3) -> Result<Self> {
        Ok(Self {
            position,
            direction: geometry::normalize(direction)?,
            max_depth: position.z,
            ..Self::default()
        })
    }

    /// Keep every visited position from now on.
    pub fn recording(mut self) -> Self {
        self.path = Some(vec![self.position]);
        self
    }

    /// Current position.
    pub fn position(&self) -> &Vector3 {
        &self.position
    }

    /// Current unit direction.
    pub fn direction(&self) -> &Vector3 {
        &self.direction
    }

    /// Remaining weight.
    pub fn weight(&self) -> Weight {
        self.weight
    }

    /// Deepest `z` reached so far.
    pub fn max_depth(&self) -> Length {
        self.max_depth
    }

    /// Visited positions, if recording.
    pub fn path(&self) -> Option<&[Vector3]> {
        self.path.as_deref()
    }

    /// Take ownership of the recorded path.
    pub fn into_path(self) -> Option<Vec<Vector3>> {
        self.path
    }

    /// `position += direction · step`.
    pub fn move_by(&mut self, step: Length) {
        let next = self.position + self.direction * step;
        self.place_at(next);
    }

    /// Move to `position` directly.
    ///
    /// Used to snap onto a boundary so rounding cannot leave the packet a
    /// hair inside the layer it is leaving.
    pub fn place_at(&mut self, position: Vector3) {
        self.position = position;
        self.max_depth = self.max_depth.max(position.z);
        if let Some(path) = self.path.as_mut() {
            path.push(position);
        }
    }

    /// Attenuate the weight over a path of length `step` in a medium with
    /// absorption coefficient `mu_a`; returns the absorbed weight
    /// `w (1 - e^{-μa·step})`.
    pub fn absorb(&mut self, mu_a: Coefficient, step: Length) -> Weight {
        let absorbed = self.weight * (1.0 - (-mu_a * step).exp());
        self.weight -= absorbed;
        absorbed
    }

    /// Scatter: deflect the direction by a Henyey–Greenstein polar angle
    /// and a uniform azimuth, both relative to the current direction.
    pub fn scatter<R: Rng + ?Sized>(&mut self, g: Real, rng: &mut R) {
        let theta = sample_henyey_greenstein(g, rng);
        let phi = Uniform::new(0.0, 2.0 * PI).sample(rng);
        self.direction = deflect(&self.direction, theta, phi);
    }

    /// Mirror the direction in a plane of constant `z`.
    pub fn reflect_z(&mut self) {
        self.direction.z = -self.direction.z;
    }

    /// Refract through a plane of constant `z` from index `n1` into `n2`,
    /// given the transmitted angle's cosine.
    pub fn refract_z(&mut self, n1: Real, n2: Real, cos_t: Real) {
        let ratio = n1 / n2;
        let uz = self.direction.z.signum() * cos_t;
        let refracted = Vector3::new(self.direction.x * ratio, self.direction.y * ratio, uz);
        self.direction = refracted / refracted.norm();
    }

    /// Set the weight, e.g. after specular loss at launch.
    pub fn set_weight(&mut self, weight: Weight) {
        self.weight = weight;
    }

    /// Terminate the packet if its weight dropped below `threshold`.
    /// Returns whether it is still alive.
    pub fn check_weight(&mut self, threshold: Weight) -> bool {
        if self.weight < threshold {
            self.alive = false;
        }
        self.alive
    }

    /// Terminate the packet and hand back its remaining weight.
    pub fn terminate(&mut self) -> Weight {
        self.alive = false;
        std::mem::take(&mut self.weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use bmc_math::MersenneTwisterUniformRng;

    #[test]
    fn default_photon_heads_into_tissue() {
        let p = Photon::default();
        assert_eq!(p.direction(), &Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(p.weight(), 1.0);
        assert!(p.path().is_none());
    }

    #[test]
    fn move_records_path_and_depth() {
        let mut p = Photon::new(Vector3::zeros(), Vector3::new(0.0, 0.0, 2.0))
            .unwrap()
            .recording();
        p.move_by(1.5);
        p.reflect_z();
        p.move_by(0.5);
        let path = p.path().unwrap();
        assert_eq!(path.len(), 3);
        assert_abs_diff_eq!(path[1].z, 1.5, epsilon = 1e-15);
        assert_abs_diff_eq!(p.position().z, 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(p.max_depth(), 1.5, epsilon = 1e-15);
    }

    #[test]
    fn absorb_follows_beer_lambert() {
        let mut p = Photon::default();
        let absorbed = p.absorb(0.5, 2.0);
        assert_abs_diff_eq!(p.weight(), (-1.0f64).exp(), epsilon = 1e-15);
        assert_abs_diff_eq!(absorbed + p.weight(), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn check_weight_terminates_below_threshold() {
        let mut p = Photon::default();
        assert!(p.check_weight(DEFAULT_WEIGHT_THRESHOLD));
        p.set_weight(5e-4);
        assert!(!p.check_weight(DEFAULT_WEIGHT_THRESHOLD));
        assert_abs_diff_eq!(p.terminate(), 5e-4, epsilon = 1e-18);
        assert_eq!(p.weight(), 0.0);
    }

    #[test]
    fn scatter_keeps_unit_direction() {
        let mut rng = MersenneTwisterUniformRng::new(11);
        let mut p = Photon::default();
        for _ in 0..1_000 {
            p.scatter(0.9, &mut rng);
            assert_abs_diff_eq!(p.direction().norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn refraction_obeys_snell() {
        let mut p = Photon::new(Vector3::zeros(), Vector3::new(0.6, 0.0, 0.8)).unwrap();
        let (n1, n2): (f64, f64) = (1.0, 1.5);
        let sin_t = n1 / n2 * 0.6;
        let cos_t = (1.0 - sin_t * sin_t).sqrt();
        p.refract_z(n1, n2, cos_t);
        assert_abs_diff_eq!(p.direction().x, sin_t, epsilon = 1e-12);
        assert_abs_diff_eq!(p.direction().z, cos_t, epsilon = 1e-12);
    }
}
