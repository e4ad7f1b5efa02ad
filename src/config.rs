//! Run configuration loaded from YAML.
//!
//! Every field has a default, so an empty document is a valid configuration.
//! The defaults reproduce a hydrogen gas at Pluto's surface temperature:
//!
//! ```yaml
//! space:
//!   width: 1120.0
//!   height: 900.0
//!   temperature: 33.15     # K
//!   pressure: 0.987        # atm
//!   speed_scale: 1000.0    # divisor on thermal speed
//!   seed: 42               # omit for a nondeterministic run
//!
//! atoms:
//!   count: 250
//!   species:
//!     radius: 12.0
//!     mass: 1.00794
//!     lj_epsilon: 8.6
//!     lj_sigma: 1.0
//!
//! run:
//!   steps: 1000
//!   report_every: 100
//! ```

use crate::core::{SimulationSpace, Species};
use crate::error::{require_positive, Error, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Box geometry and thermodynamic state.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SpaceConfig {
    pub width: f64,
    pub height: f64,
    pub temperature: f64,
    pub pressure: f64,
    pub speed_scale: f64,
    pub seed: Option<u64>,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            width: 1120.0,
            height: 900.0,
            temperature: 33.15,
            pressure: 0.987,
            speed_scale: 1000.0,
            seed: None,
        }
    }
}

/// Initial population.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AtomsConfig {
    pub count: usize,
    pub species: Species,
}

impl Default for AtomsConfig {
    fn default() -> Self {
        Self {
            count: 250,
            species: Species::default(),
        }
    }
}

/// Headless run length and reporting cadence.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub steps: u64,
    pub report_every: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            steps: 1000,
            report_every: 100,
        }
    }
}

/// Top-level wrapper.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
    pub space: SpaceConfig,
    pub atoms: AtomsConfig,
    pub run: RunConfig,
}

impl SimulationConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let cfg: Self = serde_yaml::from_reader(reader)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check everything a space and its population would reject, up front.
    pub fn validate(&self) -> Result<()> {
        require_positive("width", self.space.width)?;
        require_positive("height", self.space.height)?;
        require_positive("speed_scale", self.space.speed_scale)?;
        if !self.space.temperature.is_finite() || !self.space.pressure.is_finite() {
            return Err(Error::Config(
                "temperature and pressure must be finite".into(),
            ));
        }
        self.atoms.species.validate()?;
        if self.run.report_every == 0 {
            return Err(Error::Config("report_every must be > 0".into()));
        }
        Ok(())
    }

    /// Create the space and populate it with the configured atoms.
    pub fn build_space(&self) -> Result<SimulationSpace> {
        let mut space = SimulationSpace::new(
            [self.space.width, self.space.height],
            self.space.temperature,
            self.space.pressure,
            self.space.speed_scale,
            self.space.seed,
        )?;
        space.populate(self.atoms.count, &self.atoms.species)?;
        Ok(space)
    }
}
