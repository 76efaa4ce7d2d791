/*
    Nyx, blazing fast astrodynamics
    Copyright (C) 2018-onwards Christopher Rabotin <christopher.rabotin@gmail.com>

    This program is free software: you can redistribute it and/or modify
    it under the terms of the GNU Affero General Public License as published
    by the Free Software Foundation, either version 3 of the License, or
    (at your option) any later version.

    This program is distributed in the hope that it will be useful,
    but WITHOUT ANY WARRANTY; without even the implied warranty of
    MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
    GNU Affero General Public License for more details.

    You should have received a copy of the GNU Affero General Public License
    along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

use super::pyo3utils::bind_call;
use crate::ephemerides::{
    ConstantEphemeris, ConstantEphemerisConfig, ConstantStateFunction, Ephemeris, EphemerisError,
    Tle,
};
use crate::linalg::Vector6;
use crate::time::Epoch;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::py_run;
use pyo3::types::{PyDict, PyTuple};
use std::str::FromStr;
use std::sync::Arc;

pub(crate) fn register_ephemerides(py: Python<'_>, parent_module: &PyModule) -> PyResult<()> {
    let sm = PyModule::new(py, "_nyx_environment.ephemerides")?;

    sm.add_class::<Tle>()?;
    sm.add_class::<PyEphemeris>()?;
    sm.add_class::<PyConstantEphemeris>()?;

    py_run!(py, sm, "import sys; sys.modules['nyx_environment.ephemerides'] = sm");
    parent_module.add_submodule(sm)?;
    Ok(())
}

fn to_state(state: Vec<f64>) -> PyResult<Vector6<f64>> {
    if state.len() == 6 {
        Ok(Vector6::from_column_slice(&state))
    } else {
        Err(PyValueError::new_err(format!(
            "a Cartesian state has six components, got {}",
            state.len()
        )))
    }
}

#[pymethods]
impl Tle {
    /// Builds a TLE either from `lines` (two data lines, optionally preceded by a name line) or from `line_1` and `line_2`.
    #[new]
    #[pyo3(signature = (*args, **kwargs))]
    fn py_new(py: Python, args: &PyTuple, kwargs: Option<&PyDict>) -> PyResult<Self> {
        let call = bind_call(py, "Tle", None, args, kwargs)?;
        if call.has("lines") {
            let lines: String = call.extract(py, "lines")?;
            Ok(Tle::from_str(&lines)?)
        } else {
            let line_1: String = call.extract(py, "line_1")?;
            let line_2: String = call.extract(py, "line_2")?;
            Ok(Tle::from_lines(&line_1, &line_2)?)
        }
    }

    fn get_epoch(&self) -> Epoch {
        self.epoch()
    }

    fn get_b_star(&self) -> f64 {
        self.b_star()
    }

    fn get_inclination(&self) -> f64 {
        self.inclination()
    }

    fn get_right_ascension(&self) -> f64 {
        self.right_ascension()
    }

    fn get_eccentricity(&self) -> f64 {
        self.eccentricity()
    }

    fn get_arg_of_perigee(&self) -> f64 {
        self.arg_of_perigee()
    }

    fn get_mean_anomaly(&self) -> f64 {
        self.mean_anomaly()
    }

    fn get_mean_motion(&self) -> f64 {
        self.mean_motion()
    }

    fn __repr__(&self) -> String {
        format!("{self:?}")
    }

    fn __str__(&self) -> String {
        format!("{self}")
    }
}

#[pyclass(name = "Ephemeris", subclass)]
#[pyo3(module = "nyx_environment.ephemerides")]
pub struct PyEphemeris {
    inner: Arc<dyn Ephemeris>,
}

#[pymethods]
impl PyEphemeris {
    #[pyo3(signature = (seconds_since_epoch = 0.0))]
    fn cartesian_state(&self, seconds_since_epoch: f64) -> Result<[f64; 6], EphemerisError> {
        Ok(self.inner.cartesian_state(seconds_since_epoch)?.into())
    }

    #[pyo3(signature = (seconds_since_epoch = 0.0))]
    fn cartesian_position(&self, seconds_since_epoch: f64) -> Result<[f64; 3], EphemerisError> {
        Ok(self.inner.cartesian_position(seconds_since_epoch)?.into())
    }

    #[pyo3(signature = (seconds_since_epoch = 0.0))]
    fn cartesian_velocity(&self, seconds_since_epoch: f64) -> Result<[f64; 3], EphemerisError> {
        Ok(self.inner.cartesian_velocity(seconds_since_epoch)?.into())
    }

    #[getter]
    fn reference_frame_origin(&self) -> String {
        self.inner.reference_frame_origin().to_string()
    }

    #[getter]
    fn reference_frame_orientation(&self) -> String {
        self.inner.reference_frame_orientation().to_string()
    }

    fn __repr__(&self) -> String {
        format!("{:?}", self.inner)
    }
}

#[pyclass(name = "ConstantEphemeris", extends = PyEphemeris)]
#[pyo3(module = "nyx_environment.ephemerides")]
pub struct PyConstantEphemeris {
    inner: Arc<ConstantEphemeris>,
}

#[pymethods]
impl PyConstantEphemeris {
    /// Builds a constant ephemeris from either `constant_state` or a `constant_state_function` callable.
    #[new]
    #[pyo3(signature = (*args, **kwargs))]
    fn py_new(
        py: Python,
        args: &PyTuple,
        kwargs: Option<&PyDict>,
    ) -> PyResult<(Self, PyEphemeris)> {
        let call = bind_call(py, "ConstantEphemeris", None, args, kwargs)?;
        let config = ConstantEphemerisConfig::builder()
            .reference_frame_origin(call.extract::<String>(py, "reference_frame_origin")?)
            .reference_frame_orientation(call.extract::<String>(py, "reference_frame_orientation")?)
            .build();

        // Positional calls bind to the first overload, so a state vector may arrive under the function's name
        let ephemeris = match call.arguments.get("constant_state_function") {
            Some(function) if function.as_ref(py).is_callable() => {
                let function = function.clone_ref(py);
                let state_function: ConstantStateFunction = Arc::new(move || {
                    Python::with_gil(|py| {
                        match function
                            .call0(py)
                            .and_then(|state| state.extract::<Vec<f64>>(py))
                            .and_then(to_state)
                        {
                            Ok(state) => state,
                            Err(e) => {
                                error!("constant state function failed: {e}");
                                Vector6::from_element(f64::NAN)
                            }
                        }
                    })
                });
                ConstantEphemeris::from_function(state_function, config)
            }
            Some(state) => ConstantEphemeris::new(to_state(state.extract(py)?)?, config),
            None => ConstantEphemeris::new(to_state(call.extract(py, "constant_state")?)?, config),
        };

        let inner = Arc::new(ephemeris);
        Ok((
            Self {
                inner: inner.clone(),
            },
            PyEphemeris { inner },
        ))
    }

    fn update_constant_state(&self, new_state: Vec<f64>) -> PyResult<()> {
        self.inner.update_constant_state(to_state(new_state)?);
        Ok(())
    }
}
