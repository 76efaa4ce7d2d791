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

use std::collections::BTreeMap;

use crate::ground_stations::GroundStationConfig;
use crate::io::{ConfigError, ConfigRepr};
use pyo3::prelude::*;
use pyo3::py_run;
use pyo3::types::PyType;

pub(crate) fn register_ground_stations(py: Python<'_>, parent_module: &PyModule) -> PyResult<()> {
    let sm = PyModule::new(py, "_nyx_environment.ground_stations")?;

    sm.add_class::<GroundStationConfig>()?;

    py_run!(py, sm, "import sys; sys.modules['nyx_environment.ground_stations'] = sm");
    parent_module.add_submodule(sm)?;
    Ok(())
}

#[pymethods]
impl GroundStationConfig {
    #[new]
    #[pyo3(signature = (name, latitude_deg, longitude_deg, altitude_m, elevation_mask_deg = 0.0))]
    fn py_new(
        name: &str,
        latitude_deg: f64,
        longitude_deg: f64,
        altitude_m: f64,
        elevation_mask_deg: f64,
    ) -> Self {
        Self::from_point(name, latitude_deg, longitude_deg, altitude_m)
            .with_elevation_mask(elevation_mask_deg)
    }

    #[classmethod]
    fn load(_cls: &PyType, path: &str) -> Result<Self, ConfigError> {
        <Self as ConfigRepr>::load(path)
    }

    #[classmethod]
    fn load_many(_cls: &PyType, path: &str) -> Result<Vec<Self>, ConfigError> {
        <Self as ConfigRepr>::load_many(path)
    }

    #[classmethod]
    fn load_named(_cls: &PyType, path: &str) -> Result<BTreeMap<String, Self>, ConfigError> {
        <Self as ConfigRepr>::load_named(path)
    }

    // Manual getter/setters, the struct stays plain for serde

    #[getter]
    fn get_name(&self) -> String {
        self.name.clone()
    }

    #[setter]
    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    #[getter]
    fn get_latitude_deg(&self) -> f64 {
        self.latitude_deg
    }

    #[setter]
    fn set_latitude_deg(&mut self, latitude_deg: f64) {
        self.latitude_deg = latitude_deg;
    }

    #[getter]
    fn get_longitude_deg(&self) -> f64 {
        self.longitude_deg
    }

    #[setter]
    fn set_longitude_deg(&mut self, longitude_deg: f64) {
        self.longitude_deg = longitude_deg;
    }

    #[getter]
    fn get_altitude_m(&self) -> f64 {
        self.altitude_m
    }

    #[setter]
    fn set_altitude_m(&mut self, altitude_m: f64) {
        self.altitude_m = altitude_m;
    }

    #[getter]
    fn get_elevation_mask_deg(&self) -> f64 {
        self.elevation_mask_deg
    }

    #[setter]
    fn set_elevation_mask_deg(&mut self, elevation_mask_deg: f64) {
        self.elevation_mask_deg = elevation_mask_deg;
    }

    #[getter]
    fn get_central_body(&self) -> String {
        self.central_body.clone()
    }

    fn __repr__(&self) -> String {
        format!("{self:?}")
    }
}
