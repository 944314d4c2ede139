//! Fresnel reflection at a planar interface between two refractive indices.

use bmc_core::Real;
use bmc_math::close_enough;

/// Incidence cosines within this distance of 1 are treated as normal.
const NORMAL_INCIDENCE: Real = 1.0 - 1.0e-12;

/// Below this cosine the incidence is grazing and everything reflects.
const GRAZING_INCIDENCE: Real = 1.0e-6;

/// Unpolarised Fresnel reflectance for light going from index `n1` into
/// `n2` with incidence cosine `cos_i`.
///
/// Returns `(R, cos_t)`, `cos_t` being the cosine of the transmitted angle.
/// Total internal reflection gives `R = 1` and `cos_t = 0`.
pub fn fresnel_reflectance(n1: Real, n2: Real, cos_i: Real) -> (Real, Real) {
    let cos_i = cos_i.abs().min(1.0);
    if close_enough(n1, n2, 4) {
        return (0.0, cos_i);
    }
    if cos_i > NORMAL_INCIDENCE {
        let r = (n1 - n2) / (n1 + n2);
        return (r * r, 1.0);
    }
    if cos_i < GRAZING_INCIDENCE {
        return (1.0, 0.0);
    }

    let sin_i = (1.0 - cos_i * cos_i).sqrt();
    if critical_sine(n1, n2).is_some_and(|sc| sin_i >= sc) {
        return (1.0, 0.0);
    }
    let sin_t = (n1 / n2 * sin_i).min(1.0);
    let cos_t = (1.0 - sin_t * sin_t).sqrt();

    let rs = (n1 * cos_i - n2 * cos_t) / (n1 * cos_i + n2 * cos_t);
    let rp = (n1 * cos_t - n2 * cos_i) / (n1 * cos_t + n2 * cos_i);
    (0.5 * (rs * rs + rp * rp), cos_t)
}

/// Sine of the critical angle going from `n1` into `n2`, if one exists.
pub fn critical_sine(n1: Real, n2: Real) -> Option<Real> {
    (n1 > n2).then(|| n2 / n1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn matched_indices_transmit_everything() {
        assert_eq!(fresnel_reflectance(1.4, 1.4, 0.3), (0.0, 0.3));
    }

    #[test]
    fn normal_incidence_air_to_glass() {
        let (r, cos_t) = fresnel_reflectance(1.0, 1.5, 1.0);
        assert_abs_diff_eq!(r, 0.04, epsilon = 1e-12);
        assert_eq!(cos_t, 1.0);
    }

    #[test]
    fn oblique_incidence_is_continuous_with_normal() {
        let (r_normal, _) = fresnel_reflectance(1.0, 1.33, 1.0);
        let (r_near, _) = fresnel_reflectance(1.0, 1.33, 0.999_999);
        assert_abs_diff_eq!(r_normal, r_near, epsilon = 1e-6);
    }

    #[test]
    fn total_internal_reflection_beyond_critical_angle() {
        let sc = critical_sine(1.5, 1.0).unwrap();
        let cos_beyond = (1.0 - (sc + 0.01).powi(2)).sqrt();
        assert_eq!(fresnel_reflectance(1.5, 1.0, cos_beyond), (1.0, 0.0));
        assert!(critical_sine(1.0, 1.5).is_none());
    }

    #[test]
    fn just_inside_critical_angle_still_transmits() {
        let sc = critical_sine(1.4, 1.0).unwrap();
        let cos_inside = (1.0 - (sc - 0.01).powi(2)).sqrt();
        let (r, cos_t) = fresnel_reflectance(1.4, 1.0, cos_inside);
        assert!(r < 1.0);
        assert!(cos_t > 0.0);
    }

    #[test]
    fn reflectance_is_a_probability() {
        for i in 0..=100 {
            let cos_i = i as Real / 100.0;
            let (r, cos_t) = fresnel_reflectance(1.33, 1.0, cos_i);
            assert!((0.0..=1.0).contains(&r));
            assert!((0.0..=1.0).contains(&cos_t));
        }
    }
}
