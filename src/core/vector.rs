//! Polar vectors in the screen-space convention used throughout the engine.
//!
//! Angles are measured clockwise from the +y axis, so the Cartesian projection
//! of `(angle, length)` is `x = sin(angle) * length`, `y = cos(angle) * length`.

use std::f64::consts::{FRAC_PI_2, TAU};

/// A velocity-like quantity expressed as heading and magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Polar {
    /// Heading in radians, measured from the +y axis.
    pub angle: f64,
    /// Magnitude; may be negative when used as an intermediate term.
    pub length: f64,
}

impl Polar {
    #[inline]
    pub const fn new(angle: f64, length: f64) -> Self {
        Self { angle, length }
    }

    /// Cartesian projection `(x, y)`.
    #[inline]
    pub fn to_cartesian(self) -> [f64; 2] {
        [self.angle.sin() * self.length, self.angle.cos() * self.length]
    }

    /// Inverse of [`Polar::to_cartesian`]. The zero vector maps to angle 0.
    pub fn from_cartesian(x: f64, y: f64) -> Self {
        let length = x.hypot(y);
        if length == 0.0 {
            return Self::new(0.0, 0.0);
        }
        Self::new(wrap_angle(FRAC_PI_2 - y.atan2(x)), length)
    }
}

/// Compose two polar vectors: the result projects onto the sum of both projections.
pub fn compose(a: Polar, b: Polar) -> Polar {
    let [ax, ay] = a.to_cartesian();
    let [bx, by] = b.to_cartesian();
    Polar::from_cartesian(ax + bx, ay + by)
}

/// Normalise an angle into `[0, 2π)`.
#[inline]
pub fn wrap_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU {
        0.0
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn angular_gap(a: f64, b: f64) -> f64 {
        let d = wrap_angle(a - b);
        d.min(TAU - d)
    }

    #[test]
    fn compose_is_commutative() {
        let cases = [
            (Polar::new(0.3, 2.0), Polar::new(4.1, 0.5)),
            (Polar::new(PI, 1.0), Polar::new(0.0, 1.0)),
            (Polar::new(5.5, -3.0), Polar::new(1.2, 7.0)),
        ];
        for (a, b) in cases {
            let ab = compose(a, b);
            let ba = compose(b, a);
            assert_abs_diff_eq!(ab.length, ba.length, epsilon = 1e-12);
            assert!(angular_gap(ab.angle, ba.angle) < 1e-12);
        }
    }

    #[test]
    fn compose_with_zero_vector_is_identity() {
        for &angle in &[0.7, 2.5, 4.0, 5.9] {
            let v = Polar::new(angle, 3.25);
            let r = compose(v, Polar::new(1.1, 0.0));
            assert_abs_diff_eq!(r.angle, angle, epsilon = 1e-12);
            assert_abs_diff_eq!(r.length, 3.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn compose_of_two_zero_vectors_is_zero() {
        let r = compose(Polar::new(1.0, 0.0), Polar::new(2.0, 0.0));
        assert_eq!(r, Polar::new(0.0, 0.0));
    }

    #[test]
    fn opposite_equal_vectors_cancel() {
        let r = compose(Polar::new(0.4, 2.0), Polar::new(0.4 + PI, 2.0));
        assert_abs_diff_eq!(r.length, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn projection_uses_clockwise_from_y_convention() {
        let [x, y] = Polar::new(FRAC_PI_2, 2.0).to_cartesian();
        assert_abs_diff_eq!(x, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 0.0, epsilon = 1e-12);
        let [x, y] = Polar::new(0.0, 2.0).to_cartesian();
        assert_abs_diff_eq!(x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn negative_length_flips_heading() {
        let r = compose(Polar::new(1.0, -2.0), Polar::new(0.0, 0.0));
        assert_abs_diff_eq!(r.length, 2.0, epsilon = 1e-12);
        assert!(angular_gap(r.angle, 1.0 + PI) < 1e-12);
    }

    #[test]
    fn wrap_angle_range() {
        assert_abs_diff_eq!(wrap_angle(-FRAC_PI_2), 3.0 * FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(wrap_angle(TAU + 0.5), 0.5, epsilon = 1e-12);
        assert!(wrap_angle(-1e-18) < TAU);
    }
}
