use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray1, PyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::{SimulationSpace, Species};

fn py_err<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// Python-facing wrapper around [`SimulationSpace`] for a renderer loop.
///
/// A frame loop calls `step()`, then `get_positions()`/`get_colors()`/`get_radii()`
/// to draw. Pointer input goes through `find_atom` and `override_velocity`; window
/// resizes through `resize`.
#[pyclass]
pub struct MassSim {
    space: SimulationSpace,
}

#[pymethods]
impl MassSim {
    /// Create a box of `num_atoms` randomly placed atoms.
    ///
    /// Errors: raises ValueError on non-positive bounds, speed_scale, radius or mass.
    #[new]
    #[pyo3(signature = (
        width,
        height,
        temperature=33.15,
        pressure=0.987,
        speed_scale=1000.0,
        num_atoms=250,
        radius=12.0,
        mass=1.00794,
        seed=None
    ))]
    #[allow(clippy::too_many_arguments)]
    fn new(
        width: f64,
        height: f64,
        temperature: f64,
        pressure: f64,
        speed_scale: f64,
        num_atoms: usize,
        radius: f64,
        mass: f64,
        seed: Option<u64>,
    ) -> PyResult<Self> {
        let mut space =
            SimulationSpace::new([width, height], temperature, pressure, speed_scale, seed)
                .map_err(py_err)?;
        let species = Species {
            radius,
            mass,
            ..Species::default()
        };
        space.populate(num_atoms, &species).map_err(py_err)?;
        Ok(Self { space })
    }

    /// Advance `n` ticks (releases the GIL during computation).
    #[pyo3(signature = (n=1))]
    fn step(&mut self, py: Python<'_>, n: u64) {
        py.detach(|| {
            for _ in 0..n {
                self.space.step();
            }
        })
    }

    /// Return positions as a NumPy array of shape (N, 2), dtype=float64.
    fn get_positions<'py>(&self, py: Python<'py>) -> Py<PyArray2<f64>> {
        let mut arr = Array2::<f64>::zeros((self.space.num_particles(), 2));
        for (i, p) in self.space.particles.iter().enumerate() {
            arr[[i, 0]] = p.r[0];
            arr[[i, 1]] = p.r[1];
        }
        arr.into_pyarray(py).unbind()
    }

    /// Return RGB colours as a NumPy array of shape (N, 3), dtype=uint8.
    fn get_colors<'py>(&self, py: Python<'py>) -> Py<PyArray2<u8>> {
        let mut arr = Array2::<u8>::zeros((self.space.num_particles(), 3));
        for (i, p) in self.space.particles.iter().enumerate() {
            for (k, c) in p.color().iter().enumerate() {
                arr[[i, k]] = *c;
            }
        }
        arr.into_pyarray(py).unbind()
    }

    /// Return radii as a NumPy array of shape (N,).
    fn get_radii<'py>(&self, py: Python<'py>) -> Py<PyArray1<f64>> {
        let radii: Vec<f64> = self.space.particles.iter().map(|p| p.radius()).collect();
        radii.into_pyarray(py).unbind()
    }

    /// Window resize; atoms outside the new box are folded back on the next step.
    fn resize(&mut self, width: f64, height: f64) -> PyResult<()> {
        self.space.resize(width, height).map_err(py_err)
    }

    fn set_temperature(&mut self, temperature: f64) -> PyResult<()> {
        self.space.set_temperature(temperature).map_err(py_err)
    }

    fn set_pressure(&mut self, pressure: f64) -> PyResult<()> {
        self.space.set_pressure(pressure).map_err(py_err)
    }

    /// Index of the first atom whose disc contains (x, y), or None.
    fn find_atom(&self, x: f64, y: f64) -> Option<usize> {
        self.space.find_particle_at(x, y)
    }

    /// Set an atom's heading and speed from pointer input for the next step.
    fn override_velocity(&mut self, index: usize, angle: f64, speed: f64) -> PyResult<()> {
        self.space
            .override_velocity(index, angle, speed)
            .map_err(py_err)
    }

    /// Per-tick thermal speed for the given mass at the current temperature.
    fn thermal_speed(&self, mass: f64) -> f64 {
        self.space.thermal_speed(mass)
    }

    /// Diagnostics: (mean speed, kinetic energy, |momentum|).
    fn get_stats(&self) -> (f64, f64, f64) {
        let [px, py] = self.space.total_momentum();
        (
            self.space.mean_speed(),
            self.space.kinetic_energy(),
            px.hypot(py),
        )
    }

    #[getter]
    fn num_atoms(&self) -> usize {
        self.space.num_particles()
    }
}

/// The massim Python module entry point.
#[pymodule]
fn massim(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<MassSim>()?;
    Ok(())
}
