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

use crate::aerodynamics::AeroError;
use crate::bodies::BodyError;
use crate::ephemerides::EphemerisError;
use crate::exposure::ExposureError;
use crate::gravitation::GravityError;
use crate::ground_stations::GroundStationError;
use crate::io::{ConfigError, InputOutputError};
use crate::EnvironmentError;
use hifitime::prelude::*;
use pyo3::py_run;
use pyo3::{exceptions::PyException, prelude::*};

mod aerodynamics;
mod ephemerides;
mod exposure;
mod gravitation;
mod ground_stations;
pub(crate) mod pyo3utils;

macro_rules! into_py_exception {
    ($($err:ty),+) => {
        $(
            impl From<$err> for PyErr {
                fn from(err: $err) -> PyErr {
                    PyException::new_err(err.to_string())
                }
            }
        )+
    };
}

into_py_exception!(
    AeroError,
    BodyError,
    EphemerisError,
    ExposureError,
    GravityError,
    GroundStationError,
    ConfigError,
    InputOutputError,
    EnvironmentError
);

#[pymodule]
fn _nyx_environment(py: Python, m: &PyModule) -> PyResult<()> {
    pyo3_log::init();

    register_time_module(py, m)?;
    aerodynamics::register_aerodynamics(py, m)?;
    ephemerides::register_ephemerides(py, m)?;
    gravitation::register_gravitation(py, m)?;
    ground_stations::register_ground_stations(py, m)?;
    exposure::register_exposure(py, m)?;

    Ok(())
}

/// Reexport hifitime as nyx_environment.time
fn register_time_module(py: Python<'_>, parent_module: &PyModule) -> PyResult<()> {
    let sm = PyModule::new(py, "_nyx_environment.time")?;

    sm.add_class::<Epoch>()?;
    sm.add_class::<TimeScale>()?;
    sm.add_class::<Duration>()?;
    sm.add_class::<Unit>()?;

    py_run!(py, sm, "import sys; sys.modules['nyx_environment.time'] = sm");
    parent_module.add_submodule(sm)?;
    Ok(())
}
