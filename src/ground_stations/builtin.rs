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

use super::GroundStationConfig;

impl GroundStationConfig {
    /// Initializes a station on the Earth without elevation mask.
    pub fn from_point(name: &str, latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            name: name.to_string(),
            latitude_deg,
            longitude_deg,
            altitude_m,
            elevation_mask_deg: 0.0,
            central_body: String::from("Earth"),
        }
    }

    pub fn with_elevation_mask(mut self, elevation_mask_deg: f64) -> Self {
        self.elevation_mask_deg = elevation_mask_deg;
        self
    }

    pub fn dss65_madrid(elevation_mask_deg: f64) -> Self {
        Self::from_point("Madrid", 40.427_222, 4.250_556, 834.939).with_elevation_mask(elevation_mask_deg)
    }

    pub fn dss34_canberra(elevation_mask_deg: f64) -> Self {
        Self::from_point("Canberra", -35.398_333, 148.981_944, 691.750)
            .with_elevation_mask(elevation_mask_deg)
    }

    pub fn dss13_goldstone(elevation_mask_deg: f64) -> Self {
        Self::from_point("Goldstone", 35.247_164, 243.205, 1_071.149_04)
            .with_elevation_mask(elevation_mask_deg)
    }
}
