use crate::core::particle::{Particle, Species, MAX_CHARGE};
use crate::core::vector::{compose, Polar};
use crate::error::{require_positive, Error, Result};
use log::{debug, trace};
use rand::{rng, rngs::StdRng, Rng, SeedableRng};
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Below this temperature (K) atoms do not move.
pub const FREEZING_POINT_K: f64 = 14.05;

/// Gas constant, J / (mol K).
pub const GAS_CONSTANT: f64 = 8.314;

/// Which particle of a pair yields to the other, by charge then mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Yield {
    First,
    Second,
}

/// Charge/mass tie-break shared by the alignment and inelastic rules.
///
/// Returns the particle that adopts the other's heading, or `None` on equal charge.
fn yielding(p1: &Particle, p2: &Particle) -> Option<Yield> {
    if p1.charge > p2.charge {
        if p1.mass >= p2.mass {
            Some(Yield::Second)
        } else {
            Some(Yield::First)
        }
    } else if p1.charge < p2.charge {
        if p1.mass <= p2.mass {
            Some(Yield::First)
        } else {
            Some(Yield::Second)
        }
    } else {
        None
    }
}

/// Bounded 2D box of atoms with a thermodynamic state.
///
/// The box spans `[0, width] x [0, height]`. Particles live in an indexed `Vec`
/// and are mutated in place during the pairwise pass, so later pairs in a step
/// observe the updates made by earlier pairs.
#[derive(Debug)]
pub struct SimulationSpace {
    width: f64,
    height: f64,
    temperature: f64,
    pressure: f64,
    speed_scale: f64,
    area: f64,
    steps: u64,
    pub particles: Vec<Particle>,
    rng: StdRng,
}

impl SimulationSpace {
    /// Create an empty space.
    ///
    /// Errors:
    /// - `Error::Config` if `width`, `height` or `speed_scale` is non-positive or
    ///   non-finite, or if `temperature`/`pressure` is non-finite.
    pub fn new(
        bounds: [f64; 2],
        temperature: f64,
        pressure: f64,
        speed_scale: f64,
        seed: Option<u64>,
    ) -> Result<Self> {
        let width = require_positive("width", bounds[0])?;
        let height = require_positive("height", bounds[1])?;
        let speed_scale = require_positive("speed_scale", speed_scale)?;
        if !temperature.is_finite() {
            return Err(Error::Config("temperature must be finite".into()));
        }
        if !pressure.is_finite() {
            return Err(Error::Config("pressure must be finite".into()));
        }

        let rng: StdRng = match seed {
            Some(s) => SeedableRng::seed_from_u64(s),
            None => SeedableRng::seed_from_u64(rng().random()),
        };

        debug!(
            "SimulationSpace::new(bounds={width}x{height}, T={temperature}, P={pressure}, speed_scale={speed_scale}, seed={seed:?})"
        );

        Ok(Self {
            width,
            height,
            temperature,
            pressure,
            speed_scale,
            area: area_of(width, height),
            steps: 0,
            particles: Vec::new(),
            rng,
        })
    }

    /// Append `count` randomly placed atoms of `species`.
    ///
    /// Each atom gets a uniform position in `[radius, extent - radius]`, an integer
    /// charge in [-8, 8], a uniform heading, the current thermal speed for its mass
    /// and a random colour. Overlaps are allowed; the collision pass separates them.
    pub fn populate(&mut self, count: usize, species: &Species) -> Result<()> {
        species.validate()?;
        if self.width < 2.0 * species.radius || self.height < 2.0 * species.radius {
            return Err(Error::Config(
                "bounds must be at least 2 * radius in every dimension".into(),
            ));
        }

        let speed = self.thermal_speed(species.mass);
        self.particles.reserve(count);
        for _ in 0..count {
            let id = u32::try_from(self.particles.len())
                .map_err(|_| Error::Config("too many particles".into()))?;
            let x = self
                .rng
                .random_range(species.radius..=self.width - species.radius);
            let y = self
                .rng
                .random_range(species.radius..=self.height - species.radius);
            let charge = self.rng.random_range(-MAX_CHARGE..=MAX_CHARGE);

            let mut p = Particle::new(id, [x, y], species, charge)?;
            p.color = [
                self.rng.random_range(0..=184),
                self.rng.random(),
                self.rng.random(),
            ];
            p.set_velocity(self.rng.random_range(0.0..TAU), speed)?;
            self.particles.push(p);
        }

        debug!(
            "populated {count} atoms (mass={}, thermal speed={speed}); total {}",
            species.mass,
            self.particles.len()
        );
        Ok(())
    }

    /// Append a hand-built particle; returns its index.
    pub fn add_particle(&mut self, particle: Particle) -> usize {
        self.particles.push(particle);
        self.particles.len() - 1
    }

    // ============ Accessors ============

    pub fn bounds(&self) -> [f64; 2] {
        [self.width, self.height]
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn speed_scale(&self) -> f64 {
        self.speed_scale
    }

    /// Scaled box area, `0.01 * width * height`. Reserved for pressure coupling;
    /// the step does not consume it.
    pub fn area(&self) -> f64 {
        self.area
    }

    /// Number of completed steps.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn num_particles(&self) -> usize {
        self.particles.len()
    }

    pub fn particle(&self, index: usize) -> Option<&Particle> {
        self.particles.get(index)
    }

    pub fn particle_mut(&mut self, index: usize) -> Option<&mut Particle> {
        self.particles.get_mut(index)
    }

    /// Positions as a Vec of fixed-size arrays.
    pub fn positions(&self) -> Vec<[f64; 2]> {
        self.particles.iter().map(|p| p.r).collect()
    }

    // ============ Mutators ============

    /// Change the box size. Particles are not moved; the next step's reflection
    /// folds any that fall outside back in.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(Error::InvalidParam(format!(
                "bounds must be finite and > 0 (got {width}x{height})"
            )));
        }
        debug!(
            "resize {}x{} -> {width}x{height}",
            self.width, self.height
        );
        self.width = width;
        self.height = height;
        self.area = area_of(width, height);
        Ok(())
    }

    pub fn set_temperature(&mut self, temperature: f64) -> Result<()> {
        if !temperature.is_finite() {
            return Err(Error::InvalidParam("temperature must be finite".into()));
        }
        self.temperature = temperature;
        Ok(())
    }

    pub fn set_pressure(&mut self, pressure: f64) -> Result<()> {
        if !pressure.is_finite() {
            return Err(Error::InvalidParam("pressure must be finite".into()));
        }
        self.pressure = pressure;
        Ok(())
    }

    /// Pointer-driven velocity for the particle at `index`; see [`Particle::override_velocity`].
    pub fn override_velocity(&mut self, index: usize, angle: f64, speed: f64) -> Result<()> {
        let n = self.particles.len();
        self.particles
            .get_mut(index)
            .ok_or_else(|| {
                Error::InvalidParam(format!("particle index {index} out of range (n={n})"))
            })?
            .override_velocity(angle, speed)
    }

    // ============ Physics ============

    /// Root-mean-square speed per tick for an atom of `mass` at the current temperature:
    /// `sqrt(3 R (T - 14.05) / (mass / 1000)) / speed_scale`, or 0 at or below 14.05 K.
    pub fn thermal_speed(&self, mass: f64) -> f64 {
        if self.temperature <= FREEZING_POINT_K {
            return 0.0;
        }
        (3.0 * GAS_CONSTANT * (self.temperature - FREEZING_POINT_K) / (mass / 1000.0)).sqrt()
            / self.speed_scale
    }

    /// Advance the whole space by one tick.
    ///
    /// Particles are visited in index order: particle `i` moves and reflects, then
    /// interacts with every `j > i`. Every unordered pair is visited exactly once.
    pub fn step(&mut self) {
        let bounds = self.bounds();
        let n = self.particles.len();
        for i in 0..n {
            let speed = self.thermal_speed(self.particles[i].mass);
            let p = &mut self.particles[i];
            if p.overridden {
                p.overridden = false;
            } else {
                p.integrate(speed);
                p.reflect(bounds, &mut self.rng);
            }
            for j in (i + 1)..n {
                self.potential_pair(i, j);
                self.collide_pair(i, j);
            }
        }
        self.steps += 1;
    }

    /// Lennard-Jones sign gate: in the repulsive regime the yielding particle of
    /// the pair adopts the other's heading. Uses the first particle's epsilon and sigma.
    ///
    /// Errors: `Error::InvalidParam` unless `i < j < num_particles()`.
    pub fn apply_potential(&mut self, i: usize, j: usize) -> Result<()> {
        self.check_pair(i, j)?;
        self.potential_pair(i, j);
        Ok(())
    }

    /// Resolve overlap between particles `i` and `j`, if their discs intersect.
    ///
    /// When both carry charge the yielding particle takes the mass-weighted mean
    /// speed along the other's heading. Otherwise the pair exchanges momentum along
    /// the contact normal as an elastic collision; the second particle's update
    /// reads the first particle's already-updated speed. Either way the discs are
    /// then pushed apart along the normal by half the overlap plus one half unit each.
    ///
    /// Errors: `Error::InvalidParam` unless `i < j < num_particles()`.
    pub fn resolve_collision(&mut self, i: usize, j: usize) -> Result<()> {
        self.check_pair(i, j)?;
        self.collide_pair(i, j);
        Ok(())
    }

    fn potential_pair(&mut self, i: usize, j: usize) {
        let (p1, p2) = self.pair_mut(i, j);
        let dist = (p1.r[0] - p2.r[0]).hypot(p1.r[1] - p2.r[1]);
        if dist == 0.0 {
            trace!("skipping potential for coincident pair ({i}, {j})");
            return;
        }

        let s = p1.lj_sigma / dist;
        let s6 = s.powi(6);
        let lj = 4.0 * p1.lj_epsilon * (s6 * s6 - s6);
        if lj <= 0.0 {
            return;
        }
        match yielding(p1, p2) {
            Some(Yield::First) => p1.angle = p2.angle,
            Some(Yield::Second) => p2.angle = p1.angle,
            None => {}
        }
    }

    fn collide_pair(&mut self, i: usize, j: usize) {
        let (p1, p2) = self.pair_mut(i, j);
        let dx = p1.r[0] - p2.r[0];
        let dy = p1.r[1] - p2.r[1];
        let dist = dx.hypot(dy);
        if dist >= p1.radius + p2.radius {
            return;
        }
        if dist == 0.0 {
            trace!("skipping collision for coincident pair ({i}, {j})");
            return;
        }

        let contact = dy.atan2(dx) + FRAC_PI_2;
        let total_mass = p1.mass + p2.mass;

        if p1.charge != 0 && p2.charge != 0 {
            let share1 = p1.speed * p1.mass / total_mass;
            let share2 = p2.speed * p2.mass / total_mass;
            match yielding(p1, p2) {
                Some(Yield::First) => {
                    let heading = p2.angle;
                    p1.set_polar(compose(
                        Polar::new(heading, share1),
                        Polar::new(heading, share2),
                    ));
                }
                Some(Yield::Second) => {
                    let heading = p1.angle;
                    p2.set_polar(compose(
                        Polar::new(heading, share1),
                        Polar::new(heading, share2),
                    ));
                }
                None => {}
            }
        } else {
            p1.set_polar(compose(
                Polar::new(p1.angle, p1.speed * (p1.mass - p2.mass) / total_mass),
                Polar::new(contact, 2.0 * p2.speed * p2.mass / total_mass),
            ));
            // p1.speed is already the post-collision value here
            p2.set_polar(compose(
                Polar::new(p2.angle, p2.speed * (p2.mass - p1.mass) / total_mass),
                Polar::new(contact + PI, 2.0 * p1.speed * p1.mass / total_mass),
            ));
        }

        let overlap = 0.5 * (p1.radius + p2.radius - dist + 1.0);
        let (sx, sy) = (contact.sin() * overlap, -contact.cos() * overlap);
        p1.r[0] += sx;
        p1.r[1] += sy;
        p2.r[0] -= sx;
        p2.r[1] -= sy;
    }

    /// First particle (in index order) whose disc contains `(x, y)`.
    pub fn find_particle_at(&self, x: f64, y: f64) -> Option<usize> {
        self.particles.iter().position(|p| p.contains(x, y))
    }

    // ============ Diagnostics ============

    /// Total momentum in Cartesian form.
    pub fn total_momentum(&self) -> [f64; 2] {
        self.particles.iter().fold([0.0, 0.0], |acc, p| {
            let [px, py] = p.momentum();
            [acc[0] + px, acc[1] + py]
        })
    }

    /// Total kinetic energy carried by the `speed` fields.
    pub fn kinetic_energy(&self) -> f64 {
        self.particles.iter().map(|p| p.kinetic_energy()).sum()
    }

    /// Mean of the `speed` fields; 0 for an empty space.
    pub fn mean_speed(&self) -> f64 {
        if self.particles.is_empty() {
            return 0.0;
        }
        self.particles.iter().map(|p| p.speed).sum::<f64>() / self.particles.len() as f64
    }

    // ============ Internal helpers ============

    fn check_pair(&self, i: usize, j: usize) -> Result<()> {
        let n = self.particles.len();
        if i >= j || j >= n {
            return Err(Error::InvalidParam(format!(
                "pair ({i}, {j}) must satisfy i < j < {n}"
            )));
        }
        Ok(())
    }

    /// Disjoint mutable borrows of two particles, `i < j < len`.
    fn pair_mut(&mut self, i: usize, j: usize) -> (&mut Particle, &mut Particle) {
        let (head, tail) = self.particles.split_at_mut(j);
        (&mut head[i], &mut tail[0])
    }
}

#[inline]
fn area_of(width: f64, height: f64) -> f64 {
    0.01 * width * height
}
