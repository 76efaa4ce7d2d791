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

use crate::gravitation::{
    GravityError, GravityFieldModel, InertiaTensorUpdate, PointMassGravityField,
    SphericalHarmonicsGravityField,
};
use crate::linalg::DMatrix;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::py_run;
use std::sync::Arc;

pub(crate) fn register_gravitation(py: Python<'_>, parent_module: &PyModule) -> PyResult<()> {
    let sm = PyModule::new(py, "_nyx_environment.gravitation")?;

    sm.add_class::<PyGravityFieldModel>()?;
    sm.add_class::<PySphericalHarmonicsGravityField>()?;

    py_run!(py, sm, "import sys; sys.modules['nyx_environment.gravitation'] = sm");
    parent_module.add_submodule(sm)?;
    Ok(())
}

/// Wraps an optional Python callable as the inertia tensor update
fn inertia_tensor_update(callback: Option<PyObject>) -> Option<InertiaTensorUpdate> {
    callback.map(|callback| -> InertiaTensorUpdate {
        Arc::new(move || {
            Python::with_gil(|py| {
                if let Err(e) = callback.call0(py) {
                    error!("inertia tensor update failed: {e}");
                }
            })
        })
    })
}

fn to_matrix(rows: Vec<Vec<f64>>) -> PyResult<DMatrix<f64>> {
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != ncols) {
        return Err(PyValueError::new_err("coefficient table is not rectangular"));
    }
    Ok(DMatrix::from_fn(rows.len(), ncols, |r, c| rows[r][c]))
}

fn from_matrix(matrix: &DMatrix<f64>) -> Vec<Vec<f64>> {
    matrix
        .row_iter()
        .map(|row| row.iter().copied().collect())
        .collect()
}

#[pyclass(name = "GravityFieldModel", subclass)]
#[pyo3(module = "nyx_environment.gravitation")]
pub struct PyGravityFieldModel {
    inner: Arc<dyn GravityFieldModel>,
}

#[pymethods]
impl PyGravityFieldModel {
    /// Point mass gravity field
    #[new]
    #[pyo3(signature = (gravitational_parameter, update_inertia_tensor = None))]
    fn py_new(
        gravitational_parameter: f64,
        update_inertia_tensor: Option<PyObject>,
    ) -> Result<Self, GravityError> {
        Ok(Self {
            inner: Arc::new(PointMassGravityField::new(
                gravitational_parameter,
                inertia_tensor_update(update_inertia_tensor),
            )?),
        })
    }

    fn get_gravitational_parameter(&self) -> f64 {
        self.inner.gravitational_parameter()
    }

    #[getter]
    fn gravitational_parameter(&self) -> f64 {
        self.inner.gravitational_parameter()
    }

    #[setter]
    fn set_gravitational_parameter(&self, gravitational_parameter: f64) -> Result<(), GravityError> {
        self.inner.reset_gravitational_parameter(gravitational_parameter)
    }

    fn __repr__(&self) -> String {
        format!("{:?}", self.inner)
    }
}

#[pyclass(name = "SphericalHarmonicsGravityField", extends = PyGravityFieldModel)]
#[pyo3(module = "nyx_environment.gravitation")]
pub struct PySphericalHarmonicsGravityField {
    inner: Arc<SphericalHarmonicsGravityField>,
}

impl PySphericalHarmonicsGravityField {
    fn initializer(field: SphericalHarmonicsGravityField) -> (Self, PyGravityFieldModel) {
        let inner = Arc::new(field);
        (
            Self {
                inner: inner.clone(),
            },
            PyGravityFieldModel { inner },
        )
    }
}

#[pymethods]
impl PySphericalHarmonicsGravityField {
    #[new]
    #[pyo3(signature = (
        gravitational_parameter,
        reference_radius,
        cosine_coefficients,
        sine_coefficients,
        fixed_reference_frame,
        update_inertia_tensor = None
    ))]
    fn py_new(
        gravitational_parameter: f64,
        reference_radius: f64,
        cosine_coefficients: Vec<Vec<f64>>,
        sine_coefficients: Vec<Vec<f64>>,
        fixed_reference_frame: &str,
        update_inertia_tensor: Option<PyObject>,
    ) -> PyResult<(Self, PyGravityFieldModel)> {
        let field = SphericalHarmonicsGravityField::new(
            gravitational_parameter,
            reference_radius,
            to_matrix(cosine_coefficients)?,
            to_matrix(sine_coefficients)?,
            fixed_reference_frame,
            inertia_tensor_update(update_inertia_tensor),
        )?;
        Ok(Self::initializer(field))
    }

    /// Loads a SHADR gravity potential file
    #[staticmethod]
    #[pyo3(signature = (path, degree, order, fixed_reference_frame, gunzipped = false))]
    fn from_file(
        py: Python,
        path: &str,
        degree: usize,
        order: usize,
        fixed_reference_frame: &str,
        gunzipped: bool,
    ) -> PyResult<Py<Self>> {
        let field = SphericalHarmonicsGravityField::from_file(
            path,
            degree,
            order,
            gunzipped,
            fixed_reference_frame,
        )?;
        Py::new(py, Self::initializer(field))
    }

    #[getter]
    fn reference_radius(&self) -> f64 {
        self.inner.reference_radius()
    }

    #[getter]
    fn maximum_degree(&self) -> usize {
        self.inner.maximum_degree()
    }

    #[getter]
    fn maximum_order(&self) -> usize {
        self.inner.maximum_order()
    }

    #[getter]
    fn cosine_coefficients(&self) -> Vec<Vec<f64>> {
        from_matrix(&self.inner.cosine_coefficients())
    }

    #[setter]
    fn set_cosine_coefficients(&self, coefficients: Vec<Vec<f64>>) -> PyResult<()> {
        self.inner.set_cosine_coefficients(to_matrix(coefficients)?);
        Ok(())
    }

    #[getter]
    fn sine_coefficients(&self) -> Vec<Vec<f64>> {
        from_matrix(&self.inner.sine_coefficients())
    }

    #[setter]
    fn set_sine_coefficients(&self, coefficients: Vec<Vec<f64>>) -> PyResult<()> {
        self.inner.set_sine_coefficients(to_matrix(coefficients)?);
        Ok(())
    }
}
