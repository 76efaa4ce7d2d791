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

use crate::aerodynamics::local_inclination::{
    default_local_inclination_angle_of_attack_points, default_local_inclination_mach_points,
    default_local_inclination_sideslip_angle_points, LocalInclinationConfig, MachRegime,
};
use crate::aerodynamics::{
    total_surface_area, vehicle_mesh, AerodynamicCoefficientInterface, AeroError,
    HypersonicLocalInclinationAnalysis, MeshGrid,
};
use crate::linalg::{Vector3, Vector6};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::py_run;

pub(crate) fn register_aerodynamics(py: Python<'_>, parent_module: &PyModule) -> PyResult<()> {
    let sm = PyModule::new(py, "_nyx_environment.aerodynamics")?;

    sm.add_class::<PyLocalInclinationAnalysis>()?;
    sm.add_function(wrap_pyfunction!(get_default_local_inclination_mach_points, sm)?)?;
    sm.add_function(wrap_pyfunction!(
        get_default_local_inclination_angle_of_attack_points,
        sm
    )?)?;
    sm.add_function(wrap_pyfunction!(
        get_default_local_inclination_sideslip_angle_points,
        sm
    )?)?;
    sm.add_function(wrap_pyfunction!(get_local_inclination_total_vehicle_area, sm)?)?;
    sm.add_function(wrap_pyfunction!(get_local_inclination_mesh, sm)?)?;

    py_run!(py, sm, "import sys; sys.modules['nyx_environment.aerodynamics'] = sm");
    parent_module.add_submodule(sm)?;
    Ok(())
}

#[pyfunction]
#[pyo3(signature = (mach_regime = "Full"))]
fn get_default_local_inclination_mach_points(mach_regime: &str) -> Result<Vec<f64>, AeroError> {
    Ok(default_local_inclination_mach_points(mach_regime.parse::<MachRegime>()?))
}

#[pyfunction]
fn get_default_local_inclination_angle_of_attack_points() -> Vec<f64> {
    default_local_inclination_angle_of_attack_points()
}

#[pyfunction]
fn get_default_local_inclination_sideslip_angle_points() -> Vec<f64> {
    default_local_inclination_sideslip_angle_points()
}

#[pyfunction]
fn get_local_inclination_total_vehicle_area(
    local_inclination_analysis_object: PyRef<PyLocalInclinationAnalysis>,
) -> f64 {
    total_surface_area(&local_inclination_analysis_object.inner)
}

#[pyfunction]
#[allow(clippy::type_complexity)]
fn get_local_inclination_mesh(
    local_inclination_analysis_object: PyRef<PyLocalInclinationAnalysis>,
) -> Result<(Vec<[f64; 3]>, Vec<[f64; 3]>), AeroError> {
    let (points, normals) = vehicle_mesh(&local_inclination_analysis_object.inner)?;
    Ok((
        points.iter().map(|p| [p.x, p.y, p.z]).collect(),
        normals.iter().map(|n| [n.x, n.y, n.z]).collect(),
    ))
}

/// Converts a rectangular list of rows of points into a mesh grid
fn to_mesh_grid(part: usize, rows: Vec<Vec<[f64; 3]>>) -> PyResult<MeshGrid> {
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != ncols) {
        return Err(PyValueError::new_err(format!(
            "mesh of vehicle part #{part} is not rectangular"
        )));
    }
    Ok(MeshGrid::from_fn(rows.len(), ncols, |r, c| {
        Vector3::from(rows[r][c])
    }))
}

#[pyclass(name = "HypersonicLocalInclinationAnalysis")]
#[pyo3(module = "nyx_environment.aerodynamics")]
pub struct PyLocalInclinationAnalysis {
    inner: HypersonicLocalInclinationAnalysis,
}

#[pymethods]
impl PyLocalInclinationAnalysis {
    #[new]
    #[pyo3(signature = (
        independent_variable_points,
        vehicle_meshes,
        invert_orders,
        selected_methods,
        reference_area,
        reference_length,
        moment_reference_point,
        coefficient_table,
        save_pressure_coefficients = false
    ))]
    #[allow(clippy::too_many_arguments)]
    fn py_new(
        independent_variable_points: Vec<Vec<f64>>,
        vehicle_meshes: Vec<Vec<Vec<[f64; 3]>>>,
        invert_orders: Vec<bool>,
        selected_methods: Vec<Vec<i32>>,
        reference_area: f64,
        reference_length: f64,
        moment_reference_point: [f64; 3],
        coefficient_table: Vec<[f64; 6]>,
        save_pressure_coefficients: bool,
    ) -> PyResult<Self> {
        let config = LocalInclinationConfig::builder()
            .independent_variable_points(independent_variable_points)
            .invert_orders(invert_orders)
            .selected_methods(selected_methods)
            .reference_area(reference_area)
            .reference_length(reference_length)
            .moment_reference_point(Vector3::from(moment_reference_point))
            .save_pressure_coefficients(save_pressure_coefficients)
            .build();

        let meshes = vehicle_meshes
            .into_iter()
            .enumerate()
            .map(|(part, rows)| to_mesh_grid(part, rows))
            .collect::<PyResult<Vec<_>>>()?;

        let table = coefficient_table.into_iter().map(Vector6::from).collect();

        Ok(Self {
            inner: HypersonicLocalInclinationAnalysis::from_mesh_points(config, meshes, table)?,
        })
    }

    #[getter]
    fn reference_area(&self) -> f64 {
        self.inner.reference_area()
    }

    #[getter]
    fn current_coefficients(&self) -> [f64; 6] {
        self.inner.current_coefficients().into()
    }

    #[getter]
    fn current_force_coefficients(&self) -> [f64; 3] {
        self.inner.current_force_coefficients().into()
    }

    #[getter]
    fn current_moment_coefficients(&self) -> [f64; 3] {
        self.inner.current_moment_coefficients().into()
    }

    fn update_coefficients(
        &self,
        independent_variables: Vec<f64>,
        time: f64,
    ) -> Result<(), AeroError> {
        self.inner.update_coefficients(&independent_variables, time)
    }

    fn __repr__(&self) -> String {
        format!("{:?}", self.inner)
    }
}
