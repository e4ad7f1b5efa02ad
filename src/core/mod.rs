#![allow(missing_docs)] // Doc comments live on the public items in each submodule

//! Physics core of the atom simulator.
//!
//! - [`vector`]: polar vector composition in the clockwise-from-+y convention.
//! - [`particle`]: a single atom, its motion and its wall reflection.
//! - [`space`]: the bounded box that owns all atoms and runs the pairwise step.

pub mod particle;
pub mod space;
pub mod vector;

pub use particle::{Color, Particle, Species};
pub use space::SimulationSpace;
pub use vector::{compose, Polar};
