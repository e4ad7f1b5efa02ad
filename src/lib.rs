//! Multiple Atoms System Simulator.
//!
//! A 2D discrete-time model of gas atoms in a resizable box: thermal motion from
//! temperature, Lennard-Jones gated heading alignment, charge-biased inelastic and
//! elastic collisions, and wall reflection. Rendering and input handling live in
//! callers; see the optional `python` feature for a binding that drives the engine
//! from a Python frame loop.

pub mod config;
pub mod core;
pub mod error;

#[cfg(feature = "python")]
mod python;

pub use crate::core::{compose, Particle, Polar, SimulationSpace, Species};
pub use crate::error::{Error, Result};
