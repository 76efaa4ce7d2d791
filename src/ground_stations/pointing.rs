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

use super::{GroundStationError, StationRotationSnafu, ZeroVectorSnafu};
use crate::ephemerides::RotationalEphemeris;
use crate::linalg::{Matrix3, Vector3};
use snafu::prelude::*;
use std::sync::Arc;

/// Computes the pointing angles of an inertial vector seen from a ground station.
///
/// The topocentric frame is East-North-Up. Azimuth is measured clockwise from North, and elevation from the local
/// horizontal plane, both in radians.
#[derive(Clone, Debug)]
pub struct PointingAnglesCalculator {
    rotation_model: Arc<dyn RotationalEphemeris>,
    body_fixed_to_topocentric: Matrix3<f64>,
}

impl PointingAnglesCalculator {
    /// Initializes from the rotation model of the central body and the geodetic latitude and longitude of the station.
    pub fn new(rotation_model: Arc<dyn RotationalEphemeris>, latitude: f64, longitude: f64) -> Self {
        let (sin_lat, cos_lat) = latitude.sin_cos();
        let (sin_long, cos_long) = longitude.sin_cos();
        let body_fixed_to_topocentric = Matrix3::new(
            -sin_long,
            cos_long,
            0.0,
            -sin_lat * cos_long,
            -sin_lat * sin_long,
            cos_lat,
            cos_lat * cos_long,
            cos_lat * sin_long,
            sin_lat,
        );
        Self {
            rotation_model,
            body_fixed_to_topocentric,
        }
    }

    pub fn rotation_model(&self) -> Arc<dyn RotationalEphemeris> {
        self.rotation_model.clone()
    }

    /// Rotation from the body-fixed frame to the East-North-Up frame of the station
    pub fn body_fixed_to_topocentric(&self) -> Matrix3<f64> {
        self.body_fixed_to_topocentric
    }

    pub fn convert_inertial_vector_to_topocentric(
        &self,
        inertial_vector: &Vector3<f64>,
        time: f64,
    ) -> Result<Vector3<f64>, GroundStationError> {
        let to_body_fixed = self
            .rotation_model
            .rotation_to_target_frame(time)
            .context(StationRotationSnafu)?;
        Ok(self.body_fixed_to_topocentric * to_body_fixed * inertial_vector)
    }

    pub fn calculate_elevation_angle(
        &self,
        inertial_vector_to_target: &Vector3<f64>,
        time: f64,
    ) -> Result<f64, GroundStationError> {
        let enu = self.nonzero_topocentric(inertial_vector_to_target, time)?;
        Ok((enu.z / enu.norm()).clamp(-1.0, 1.0).asin())
    }

    /// Azimuth in [-pi, pi]
    pub fn calculate_azimuth_angle(
        &self,
        inertial_vector_to_target: &Vector3<f64>,
        time: f64,
    ) -> Result<f64, GroundStationError> {
        let enu = self.nonzero_topocentric(inertial_vector_to_target, time)?;
        Ok(enu.x.atan2(enu.y))
    }

    /// Returns the azimuth and elevation
    pub fn calculate_pointing_angles(
        &self,
        inertial_vector_to_target: &Vector3<f64>,
        time: f64,
    ) -> Result<(f64, f64), GroundStationError> {
        let enu = self.nonzero_topocentric(inertial_vector_to_target, time)?;
        Ok((enu.x.atan2(enu.y), (enu.z / enu.norm()).clamp(-1.0, 1.0).asin()))
    }

    fn nonzero_topocentric(
        &self,
        inertial_vector: &Vector3<f64>,
        time: f64,
    ) -> Result<Vector3<f64>, GroundStationError> {
        ensure!(inertial_vector.norm() > 0.0, ZeroVectorSnafu);
        self.convert_inertial_vector_to_topocentric(inertial_vector, time)
    }
}
