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
use crate::exposure::{Access, ExposureError, ENVIRONMENT};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::py_run;
use pyo3::types::{PyDict, PyTuple};

pub(crate) fn register_exposure(py: Python<'_>, parent_module: &PyModule) -> PyResult<()> {
    let sm = PyModule::new(py, "_nyx_environment.exposure")?;

    sm.add_function(wrap_pyfunction!(capability_names, sm)?)?;
    sm.add_function(wrap_pyfunction!(capability, sm)?)?;
    sm.add_function(wrap_pyfunction!(is_substitutable, sm)?)?;
    sm.add_function(wrap_pyfunction!(resolve_property, sm)?)?;
    sm.add_function(wrap_pyfunction!(resolve_call, sm)?)?;

    py_run!(py, sm, "import sys; sys.modules['nyx_environment.exposure'] = sm");
    parent_module.add_submodule(sm)?;
    Ok(())
}

/// Exposed names of every registered capability
#[pyfunction]
fn capability_names() -> Vec<String> {
    ENVIRONMENT.names().into_iter().map(String::from).collect()
}

/// The YAML declaration of a capability
#[pyfunction]
fn capability(name: &str) -> PyResult<String> {
    let descriptor = ENVIRONMENT.get(name)?;
    serde_yaml::to_string(descriptor).map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pyfunction]
fn is_substitutable(derived: &str, base: &str) -> Result<bool, ExposureError> {
    ENVIRONMENT.is_substitutable(derived, base)
}

/// Rust target of a property, checking it may be read (and written if `write` is set)
#[pyfunction]
#[pyo3(signature = (class_name, property, write = false))]
fn resolve_property(class_name: &str, property: &str, write: bool) -> Result<String, ExposureError> {
    let requested = if write {
        Access::ReadWrite
    } else {
        Access::ReadOnly
    };
    Ok(ENVIRONMENT
        .resolve_property(class_name, property, requested)?
        .target
        .clone())
}

/// Resolves a constructor (when `method` is None) or method call, returning the Rust target and the bound arguments
#[pyfunction]
#[pyo3(signature = (capability, method = None, *args, **kwargs))]
fn resolve_call(
    py: Python,
    capability: &str,
    method: Option<&str>,
    args: &PyTuple,
    kwargs: Option<&PyDict>,
) -> PyResult<(String, PyObject)> {
    let call = bind_call(py, capability, method, args, kwargs)?;
    let arguments = PyDict::new(py);
    for (name, value) in &call.arguments {
        arguments.set_item(name, value)?;
    }
    Ok((call.target, arguments.into_py(py)))
}
