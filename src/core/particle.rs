use crate::core::vector::{wrap_angle, Polar};
use crate::error::{require_positive, Error, Result};
use rand::Rng;
use serde::Deserialize;
use std::f64::consts::{PI, TAU};

/// Bound on the magnitude of a particle's integer charge.
pub const MAX_CHARGE: i8 = 8;

/// Physical properties shared by every atom of one kind.
///
/// Defaults describe atomic hydrogen on the engine's 10x display scale.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Species {
    /// Disc radius, used for collisions and wall reflection (> 0).
    pub radius: f64,
    /// Atomic mass units (> 0).
    pub mass: f64,
    /// Lennard-Jones well depth (> 0).
    pub lj_epsilon: f64,
    /// Lennard-Jones zero-crossing distance (> 0).
    pub lj_sigma: f64,
}

impl Default for Species {
    fn default() -> Self {
        Self {
            radius: 12.0,
            mass: 1.00794,
            lj_epsilon: 8.6,
            lj_sigma: 1.0,
        }
    }
}

impl Species {
    /// Check every property is finite and strictly positive.
    pub fn validate(&self) -> Result<()> {
        require_positive("radius", self.radius)?;
        require_positive("mass", self.mass)?;
        require_positive("lj_epsilon", self.lj_epsilon)?;
        require_positive("lj_sigma", self.lj_sigma)?;
        Ok(())
    }
}

/// Cosmetic RGB colour; owned by the renderer, ignored by the physics.
pub type Color = [u8; 3];

/// A point-like atom moving in the plane.
///
/// Velocity is held in polar form: `angle` in `[0, 2π)` measured clockwise from +y,
/// and a non-negative `speed`. Motion per tick uses the space's thermal speed; `speed`
/// carries momentum through collisions.
#[derive(Debug, Clone)]
pub struct Particle {
    /// Stable particle identifier.
    pub id: u32,
    /// Centre position (x, y).
    pub r: [f64; 2],
    /// Heading in radians.
    pub angle: f64,
    /// Scalar speed (>= 0).
    pub speed: f64,
    /// Disc radius (> 0).
    pub radius: f64,
    /// Mass (> 0).
    pub mass: f64,
    /// Integer charge in [-8, 8].
    pub charge: i8,
    /// Lennard-Jones well depth.
    pub lj_epsilon: f64,
    /// Lennard-Jones zero-crossing distance.
    pub lj_sigma: f64,
    /// Renderer colour.
    pub color: Color,
    /// Set by [`Particle::override_velocity`]; consumed by the next step.
    pub(crate) overridden: bool,
}

impl Particle {
    /// Create an atom of `species` at rest at `r` with the given charge.
    ///
    /// Errors:
    /// - `Error::Config` if any species property is non-positive, `r` is not finite,
    ///   or `charge` is outside [-8, 8].
    pub fn new(id: u32, r: [f64; 2], species: &Species, charge: i8) -> Result<Self> {
        species.validate()?;
        if !r.iter().all(|x| x.is_finite()) {
            return Err(Error::Config("position must be finite".into()));
        }
        if !(-MAX_CHARGE..=MAX_CHARGE).contains(&charge) {
            return Err(Error::Config(format!(
                "charge must lie in [-{MAX_CHARGE}, {MAX_CHARGE}] (got {charge})"
            )));
        }
        Ok(Self {
            id,
            r,
            angle: 0.0,
            speed: 0.0,
            radius: species.radius,
            mass: species.mass,
            charge,
            lj_epsilon: species.lj_epsilon,
            lj_sigma: species.lj_sigma,
            color: [0, 0, 255],
            overridden: false,
        })
    }

    #[inline]
    pub fn position(&self) -> [f64; 2] {
        self.r
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Current velocity as a polar vector.
    #[inline]
    pub fn velocity(&self) -> Polar {
        Polar::new(self.angle, self.speed)
    }

    /// Set heading and speed (validated as finite, speed >= 0).
    pub fn set_velocity(&mut self, angle: f64, speed: f64) -> Result<()> {
        if !angle.is_finite() {
            return Err(Error::InvalidParam("angle must be finite".into()));
        }
        if !speed.is_finite() || speed < 0.0 {
            return Err(Error::InvalidParam("speed must be finite and >= 0".into()));
        }
        self.angle = wrap_angle(angle);
        self.speed = speed;
        Ok(())
    }

    /// Store a collision result from [`compose`](crate::core::compose), whose length is
    /// never negative.
    pub(crate) fn set_polar(&mut self, v: Polar) {
        debug_assert!(v.length >= 0.0, "composed speed must be non-negative");
        self.angle = wrap_angle(v.angle);
        self.speed = v.length;
    }

    /// Caller-driven velocity (pointer drag). The particle skips integration and
    /// wall reflection on the next step only.
    pub fn override_velocity(&mut self, angle: f64, speed: f64) -> Result<()> {
        self.set_velocity(angle, speed)?;
        self.overridden = true;
        Ok(())
    }

    /// Whether the next step will bypass motion for this particle.
    #[inline]
    pub fn is_overridden(&self) -> bool {
        self.overridden
    }

    /// Advance one tick along the current heading at `thermal_speed`.
    #[inline]
    pub fn integrate(&mut self, thermal_speed: f64) {
        self.r[0] += self.angle.sin() * thermal_speed;
        self.r[1] -= self.angle.cos() * thermal_speed;
    }

    /// Reflect off the walls of a `[0, width] x [0, height]` box.
    ///
    /// X walls redraw the heading as `U(0, 2π) - angle`; Y walls mirror it as
    /// `π - angle`. A centre sitting exactly on its bound is a fixed point of the
    /// positional fold but still has its heading updated.
    pub fn reflect<R: Rng + ?Sized>(&mut self, bounds: [f64; 2], rng: &mut R) {
        let [width, height] = bounds;
        let hi_x = width - self.radius;
        if self.r[0] >= hi_x {
            self.r[0] = 2.0 * hi_x - self.r[0];
            self.angle = wrap_angle(rng.random_range(0.0..TAU) - self.angle);
        } else if self.r[0] <= self.radius {
            self.r[0] = 2.0 * self.radius - self.r[0];
            self.angle = wrap_angle(rng.random_range(0.0..TAU) - self.angle);
        }

        let hi_y = height - self.radius;
        if self.r[1] >= hi_y {
            self.r[1] = 2.0 * hi_y - self.r[1];
            self.angle = wrap_angle(PI - self.angle);
        } else if self.r[1] <= self.radius {
            self.r[1] = 2.0 * self.radius - self.r[1];
            self.angle = wrap_angle(PI - self.angle);
        }
    }

    /// Returns `1/2 m speed^2`.
    #[inline]
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.speed * self.speed
    }

    /// Momentum `m * v` in Cartesian form.
    #[inline]
    pub fn momentum(&self) -> [f64; 2] {
        Polar::new(self.angle, self.mass * self.speed).to_cartesian()
    }

    /// Whether `(x, y)` lies inside or on this particle's disc.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        (self.r[0] - x).hypot(self.r[1] - y) <= self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::{rngs::StdRng, SeedableRng};
    use std::f64::consts::FRAC_PI_2;

    fn atom(r: [f64; 2]) -> Result<Particle> {
        Particle::new(1, r, &Species::default(), 0)
    }

    #[test]
    fn new_particle_ok() -> Result<()> {
        let p = Particle::new(3, [20.0, 30.0], &Species::default(), -4)?;
        assert_eq!(p.id, 3);
        assert_eq!(p.position(), [20.0, 30.0]);
        assert_eq!(p.radius(), 12.0);
        assert_eq!(p.mass, 1.00794);
        assert_eq!(p.charge, -4);
        assert_eq!(p.speed, 0.0);
        assert!(!p.is_overridden());
        Ok(())
    }

    #[test]
    fn invalid_species_rejected() {
        let bad = Species {
            radius: -1.0,
            ..Species::default()
        };
        let err = Particle::new(0, [0.0, 0.0], &bad, 0).unwrap_err();
        assert!(err.to_string().contains("radius"));

        let bad = Species {
            mass: 0.0,
            ..Species::default()
        };
        let err = Particle::new(0, [0.0, 0.0], &bad, 0).unwrap_err();
        assert!(err.to_string().contains("mass"));
    }

    #[test]
    fn charge_out_of_range_rejected() {
        let err = Particle::new(0, [0.0, 0.0], &Species::default(), 9).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(Particle::new(0, [0.0, 0.0], &Species::default(), -8).is_ok());
    }

    #[test]
    fn integrate_moves_up_screen_at_angle_zero() -> Result<()> {
        let mut p = atom([50.0, 50.0])?;
        p.integrate(2.0);
        assert_abs_diff_eq!(p.r[0], 50.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.r[1], 48.0, epsilon = 1e-12);

        p.set_velocity(FRAC_PI_2, 1.0)?;
        p.integrate(3.0);
        assert_abs_diff_eq!(p.r[0], 53.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.r[1], 48.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn reflect_folds_position_back_inside() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(9);
        let mut p = atom([95.0, 50.0])?;
        p.reflect([100.0, 100.0], &mut rng);
        // hi = 88, folded to 2*88 - 95
        assert_abs_diff_eq!(p.r[0], 81.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.r[1], 50.0, epsilon = 1e-12);

        let mut p = atom([50.0, 5.0])?;
        p.reflect([100.0, 100.0], &mut rng);
        assert_abs_diff_eq!(p.r[1], 19.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn y_wall_mirrors_heading_deterministically() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = atom([50.0, 95.0])?;
        p.set_velocity(0.5, 1.0)?;
        p.reflect([100.0, 100.0], &mut rng);
        assert_abs_diff_eq!(p.angle, PI - 0.5, epsilon = 1e-12);

        let mut p = atom([50.0, 12.0])?;
        p.set_velocity(2.0, 1.0)?;
        p.reflect([100.0, 100.0], &mut rng);
        assert_abs_diff_eq!(p.r[1], 12.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.angle, PI - 2.0, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn x_wall_redraws_heading() -> Result<()> {
        // Same start, different seeds: headings after the wall should differ.
        let mut headings = Vec::new();
        for seed in 0..4u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut p = atom([88.0, 50.0])?;
            p.set_velocity(1.0, 1.0)?;
            p.reflect([100.0, 100.0], &mut rng);
            assert_abs_diff_eq!(p.r[0], 88.0, epsilon = 1e-12);
            assert!((0.0..TAU).contains(&p.angle));
            headings.push(p.angle);
        }
        assert!(headings.windows(2).any(|w| (w[0] - w[1]).abs() > 1e-9));
        Ok(())
    }

    #[test]
    fn interior_particle_untouched_by_reflect() -> Result<()> {
        let mut rng = StdRng::seed_from_u64(5);
        let mut p = atom([50.0, 50.0])?;
        p.set_velocity(1.25, 2.0)?;
        p.reflect([100.0, 100.0], &mut rng);
        assert_eq!(p.r, [50.0, 50.0]);
        assert_eq!(p.angle, 1.25);
        Ok(())
    }

    #[test]
    fn lower_x_wall_is_fixed_point_with_redrawn_heading() -> Result<()> {
        let mut headings = Vec::new();
        for seed in 0..4u64 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut p = atom([12.0, 50.0])?;
            p.set_velocity(4.0, 1.0)?;
            p.reflect([100.0, 100.0], &mut rng);
            assert_eq!(p.r, [12.0, 50.0]);
            assert!((0.0..TAU).contains(&p.angle));
            headings.push(p.angle);
        }
        assert!(headings.windows(2).any(|w| (w[0] - w[1]).abs() > 1e-9));
        Ok(())
    }

    #[test]
    fn set_polar_wraps_heading() -> Result<()> {
        let mut p = atom([0.0, 0.0])?;
        p.set_polar(Polar::new(TAU + 0.25, 2.0));
        assert_abs_diff_eq!(p.speed, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.angle, 0.25, epsilon = 1e-12);
        Ok(())
    }

    #[test]
    fn override_velocity_validates_and_flags() -> Result<()> {
        let mut p = atom([0.0, 0.0])?;
        assert!(p.override_velocity(0.0, -1.0).is_err());
        assert!(!p.is_overridden());
        p.override_velocity(-FRAC_PI_2, 4.0)?;
        assert!(p.is_overridden());
        assert_abs_diff_eq!(p.angle, 3.0 * FRAC_PI_2, epsilon = 1e-12);
        assert_eq!(p.speed, 4.0);
        Ok(())
    }

    #[test]
    fn contains_includes_rim() -> Result<()> {
        let p = atom([10.0, 10.0])?;
        assert!(p.contains(22.0, 10.0));
        assert!(!p.contains(22.5, 10.0));
        Ok(())
    }
}
