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

use serde_derive::{Deserialize, Serialize};
use std::fmt;
use typed_builder::TypedBuilder;

/// Atmospheric properties as a function of altitude (m), longitude and latitude (rad), and time (s since J2000).
pub trait AtmosphereModel: Send + Sync + fmt::Debug {
    /// Density in kg/m^3
    fn density(&self, altitude: f64, longitude: f64, latitude: f64, time: f64) -> f64;

    /// Pressure in Pa
    fn pressure(&self, altitude: f64, longitude: f64, latitude: f64, time: f64) -> f64;

    /// Temperature in K
    fn temperature(&self, altitude: f64, longitude: f64, latitude: f64, time: f64) -> f64;

    /// Speed of sound in m/s
    fn speed_of_sound(&self, altitude: f64, longitude: f64, latitude: f64, time: f64) -> f64;
}

/// Isothermal atmosphere whose density decays exponentially with altitude.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct ExponentialAtmosphere {
    /// Scale height in meters
    pub scale_height: f64,
    /// Constant temperature in K
    pub constant_temperature: f64,
    /// Density at zero altitude in kg/m^3
    pub density_at_zero_altitude: f64,
    /// Specific gas constant in J/(kg K), defaults to that of air
    #[builder(default = 287.0)]
    #[serde(default = "air_gas_constant")]
    pub specific_gas_constant: f64,
    /// Ratio of specific heats, defaults to that of a diatomic gas
    #[builder(default = 1.4)]
    #[serde(default = "diatomic_ratio_of_specific_heats")]
    pub ratio_of_specific_heats: f64,
}

fn air_gas_constant() -> f64 {
    287.0
}

fn diatomic_ratio_of_specific_heats() -> f64 {
    1.4
}

impl ExponentialAtmosphere {
    /// Exponential fit of the atmosphere of the Earth
    pub fn earth() -> Self {
        Self::builder()
            .scale_height(7.2e3)
            .constant_temperature(246.0)
            .density_at_zero_altitude(1.225)
            .build()
    }
}

impl AtmosphereModel for ExponentialAtmosphere {
    fn density(&self, altitude: f64, _longitude: f64, _latitude: f64, _time: f64) -> f64 {
        self.density_at_zero_altitude * (-altitude / self.scale_height).exp()
    }

    fn pressure(&self, altitude: f64, longitude: f64, latitude: f64, time: f64) -> f64 {
        self.density(altitude, longitude, latitude, time)
            * self.specific_gas_constant
            * self.constant_temperature
    }

    fn temperature(&self, _altitude: f64, _longitude: f64, _latitude: f64, _time: f64) -> f64 {
        self.constant_temperature
    }

    fn speed_of_sound(&self, _altitude: f64, _longitude: f64, _latitude: f64, _time: f64) -> f64 {
        (self.ratio_of_specific_heats * self.specific_gas_constant * self.constant_temperature).sqrt()
    }
}

#[cfg(test)]
mod ut_atmosphere {
    use super::*;

    #[test]
    fn exponential() {
        let atm = ExponentialAtmosphere::earth();
        assert_eq!(atm.density(0.0, 0.0, 0.0, 0.0), 1.225);
        let rho = atm.density(7.2e3, 1.0, 0.5, 1e6);
        assert!((rho - 1.225 / std::f64::consts::E).abs() < 1e-12);
        assert!((atm.pressure(0.0, 0.0, 0.0, 0.0) - 1.225 * 287.0 * 246.0).abs() < 1e-9);
        assert!((atm.speed_of_sound(1e5, 0.0, 0.0, 0.0) - (1.4_f64 * 287.0 * 246.0).sqrt()).abs() < 1e-12);
        assert_eq!(atm.temperature(1e5, 0.0, 0.0, 0.0), 246.0);
    }

    #[test]
    fn from_yaml() {
        let atm: ExponentialAtmosphere =
            serde_yaml::from_str("scale_height: 11100.0\nconstant_temperature: 210.0\ndensity_at_zero_altitude: 0.02\n")
                .unwrap();
        assert_eq!(atm.specific_gas_constant, 287.0);
        assert_eq!(atm.ratio_of_specific_heats, 1.4);
        assert_eq!(atm.scale_height, 11_100.0);
    }
}
