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

use crate::bodies::OblateSpheroidBodyShapeModel;
use crate::ephemerides::{EphemerisError, RotationalEphemeris};
use crate::io::ConfigRepr;
use crate::linalg::{Vector3, Vector6};
use serde_derive::{Deserialize, Serialize};
use snafu::prelude::*;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "python")]
use pyo3::prelude::*;

pub mod builtin;

mod pointing;
pub use self::pointing::PointingAnglesCalculator;

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum GroundStationError {
    #[snafu(display("rotation model of the central body failed: {source}"))]
    StationRotation { source: EphemerisError },
    #[snafu(display("pointing angles are undefined for a zero vector"))]
    ZeroVector,
}

/// Location of a ground station, as loaded from a configuration file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "python", pyclass)]
#[cfg_attr(feature = "python", pyo3(module = "nyx_environment.ground_stations"))]
pub struct GroundStationConfig {
    pub name: String,
    /// in degrees
    pub latitude_deg: f64,
    /// in degrees
    pub longitude_deg: f64,
    /// in meters
    pub altitude_m: f64,
    /// in degrees
    #[serde(default)]
    pub elevation_mask_deg: f64,
    /// Body on which the station is located
    #[serde(default = "default_central_body")]
    pub central_body: String,
}

fn default_central_body() -> String {
    String::from("Earth")
}

impl ConfigRepr for GroundStationConfig {}

/// A station fixed on the surface of a body, with its pointing angles calculator.
#[derive(Clone, Debug)]
pub struct GroundStation {
    config: GroundStationConfig,
    body_fixed_position: Vector3<f64>,
    pointing_angles_calculator: Arc<PointingAnglesCalculator>,
}

impl GroundStation {
    /// Places the station on the shape of the central body, which rotates according to the rotation model.
    pub fn new(
        config: GroundStationConfig,
        body_shape: &OblateSpheroidBodyShapeModel,
        rotation_model: Arc<dyn RotationalEphemeris>,
    ) -> Self {
        let latitude = config.latitude_deg.to_radians();
        let longitude = config.longitude_deg.to_radians();
        let body_fixed_position = body_shape.body_fixed_position(latitude, longitude, config.altitude_m);
        let pointing_angles_calculator = Arc::new(PointingAnglesCalculator::new(
            rotation_model,
            latitude,
            longitude,
        ));
        Self {
            config,
            body_fixed_position,
            pointing_angles_calculator,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &GroundStationConfig {
        &self.config
    }

    /// Geodetic latitude in radians
    pub fn latitude(&self) -> f64 {
        self.config.latitude_deg.to_radians()
    }

    /// Longitude in radians
    pub fn longitude(&self) -> f64 {
        self.config.longitude_deg.to_radians()
    }

    /// Altitude in meters
    pub fn altitude(&self) -> f64 {
        self.config.altitude_m
    }

    /// Position in the body-fixed frame of the central body, in meters
    pub fn body_fixed_position(&self) -> Vector3<f64> {
        self.body_fixed_position
    }

    pub fn pointing_angles_calculator(&self) -> Arc<PointingAnglesCalculator> {
        self.pointing_angles_calculator.clone()
    }

    /// Inertial state of the station w.r.t. the center of the central body.
    pub fn inertial_state(&self, time: f64) -> Result<Vector6<f64>, GroundStationError> {
        let mut state_bf = Vector6::zeros();
        state_bf
            .fixed_rows_mut::<3>(0)
            .copy_from(&self.body_fixed_position);
        crate::ephemerides::transform_to_inertial_orientation(
            &state_bf,
            time,
            self.pointing_angles_calculator.rotation_model().as_ref(),
        )
        .context(StationRotationSnafu)
    }

    /// Returns whether the target, at the provided inertial position w.r.t. the center of the central body, is above
    /// the elevation mask of this station.
    pub fn is_visible(&self, target_inertial_position: &Vector3<f64>, time: f64) -> Result<bool, GroundStationError> {
        let station = self.inertial_state(time)?.fixed_rows::<3>(0).into_owned();
        let elevation = self
            .pointing_angles_calculator
            .calculate_elevation_angle(&(target_inertial_position - station), time)?;
        Ok(elevation >= self.config.elevation_mask_deg.to_radians())
    }
}

impl fmt::Display for GroundStation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} (lat.: {:.4} deg    long.: {:.4} deg    alt.: {:.3} m) [{}]",
            self.config.name,
            self.config.latitude_deg,
            self.config.longitude_deg,
            self.config.altitude_m,
            self.config.central_body,
        )
    }
}
