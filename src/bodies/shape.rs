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

use crate::linalg::Vector3;
use serde_derive::{Deserialize, Serialize};
use std::fmt;

/// Shape of a body, used to compute altitudes and geodetic coordinates from body-fixed positions (in meters).
pub trait BodyShapeModel: Send + Sync + fmt::Debug {
    /// Average radius in meters
    fn average_radius(&self) -> f64;

    /// Altitude above the surface, in meters
    fn altitude(&self, body_fixed_position: &Vector3<f64>) -> f64;

    /// Geodetic latitude in radians
    fn geodetic_latitude(&self, body_fixed_position: &Vector3<f64>) -> f64;
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SphericalBodyShapeModel {
    pub radius: f64,
}

impl SphericalBodyShapeModel {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }
}

impl BodyShapeModel for SphericalBodyShapeModel {
    fn average_radius(&self) -> f64 {
        self.radius
    }

    fn altitude(&self, body_fixed_position: &Vector3<f64>) -> f64 {
        body_fixed_position.norm() - self.radius
    }

    /// Identical to the geocentric latitude
    fn geodetic_latitude(&self, body_fixed_position: &Vector3<f64>) -> f64 {
        let rmag = body_fixed_position.norm();
        if rmag > 0.0 {
            (body_fixed_position.z / rmag).asin()
        } else {
            0.0
        }
    }
}

/// Oblate spheroid, flattened along the body-fixed Z axis.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OblateSpheroidBodyShapeModel {
    pub equatorial_radius: f64,
    pub flattening: f64,
}

impl OblateSpheroidBodyShapeModel {
    pub fn new(equatorial_radius: f64, flattening: f64) -> Self {
        Self {
            equatorial_radius,
            flattening,
        }
    }

    pub fn polar_radius(&self) -> f64 {
        self.equatorial_radius * (1.0 - self.flattening)
    }

    fn eccentricity_squared(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }

    /// Body-fixed position from geodetic latitude and longitude (radians) and altitude (meters).
    ///
    /// Reference: G. Xu and Y. Xu, "GPS", DOI 10.1007/978-3-662-50367-6_2, 2016
    pub fn body_fixed_position(&self, latitude: f64, longitude: f64, altitude: f64) -> Vector3<f64> {
        let e2 = self.eccentricity_squared();
        let (sin_long, cos_long) = longitude.sin_cos();
        let (sin_lat, cos_lat) = latitude.sin_cos();
        let denom = (1.0 - e2 * sin_lat.powi(2)).sqrt();
        let c_body = self.equatorial_radius / denom;
        let s_body = self.equatorial_radius * (1.0 - self.flattening).powi(2) / denom;
        Vector3::new(
            (c_body + altitude) * cos_lat * cos_long,
            (c_body + altitude) * cos_lat * sin_long,
            (s_body + altitude) * sin_lat,
        )
    }

    /// Geodetic latitude and altitude.
    ///
    /// Reference: Vallado, 4th Ed., Algorithm 12 page 172.
    pub fn geodetic_latitude_altitude(&self, body_fixed_position: &Vector3<f64>) -> (f64, f64) {
        let eps = 1e-12;
        let max_attempts = 20;
        let e2 = self.eccentricity_squared();
        let r_delta = (body_fixed_position.x.powi(2) + body_fixed_position.y.powi(2)).sqrt();
        let rmag = body_fixed_position.norm();
        if rmag == 0.0 {
            return (0.0, -self.equatorial_radius);
        }

        let mut latitude = (body_fixed_position.z / rmag).asin();
        for attempt_no in 1..=max_attempts {
            let c_body = self.equatorial_radius / (1.0 - e2 * latitude.sin().powi(2)).sqrt();
            let new_latitude = (body_fixed_position.z + c_body * e2 * latitude.sin()).atan2(r_delta);
            let converged = (latitude - new_latitude).abs() < eps;
            latitude = new_latitude;
            if converged {
                break;
            } else if attempt_no == max_attempts {
                warn!("geodetic latitude failed to converge after {max_attempts} iterations");
            }
        }

        let (sin_lat, cos_lat) = latitude.sin_cos();
        let denom = (1.0 - e2 * sin_lat.powi(2)).sqrt();
        let altitude = if cos_lat.abs() < 0.1 {
            // Near the poles
            let s_body = self.equatorial_radius * (1.0 - self.flattening).powi(2) / denom;
            body_fixed_position.z / sin_lat - s_body
        } else {
            r_delta / cos_lat - self.equatorial_radius / denom
        };
        (latitude, altitude)
    }
}

impl BodyShapeModel for OblateSpheroidBodyShapeModel {
    /// Mean of the three semi-axes
    fn average_radius(&self) -> f64 {
        (2.0 * self.equatorial_radius + self.polar_radius()) / 3.0
    }

    fn altitude(&self, body_fixed_position: &Vector3<f64>) -> f64 {
        self.geodetic_latitude_altitude(body_fixed_position).1
    }

    fn geodetic_latitude(&self, body_fixed_position: &Vector3<f64>) -> f64 {
        self.geodetic_latitude_altitude(body_fixed_position).0
    }
}
