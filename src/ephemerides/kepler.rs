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

use super::{Ephemeris, EphemerisError};
use crate::linalg::Vector6;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use typed_builder::TypedBuilder;

/// Engine which propagates Keplerian elements and converts them to a Cartesian state.
pub trait KeplerPropagator: Send + Sync + fmt::Debug {
    /// Returns the Cartesian state `elapsed_seconds` after the epoch of `keplerian_elements`.
    ///
    /// The elements are ordered as semi-major axis (m), eccentricity, inclination, argument of periapsis,
    /// right ascension of the ascending node and true anomaly (rad).
    fn propagate_kepler_orbit(
        &self,
        keplerian_elements: &Vector6<f64>,
        elapsed_seconds: f64,
        gravitational_parameter: f64,
        config: &KeplerEphemerisConfig,
    ) -> Result<Vector6<f64>, EphemerisError>;
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct KeplerEphemerisConfig {
    #[builder(default = String::from("SSB"), setter(into))]
    pub reference_frame_origin: String,
    #[builder(default = String::from("ECLIPJ2000"), setter(into))]
    pub reference_frame_orientation: String,
    /// Absolute tolerance of the Kepler equation root finder, passed to the propagator
    #[builder(default = 200.0 * f64::EPSILON)]
    pub root_finder_absolute_tolerance: f64,
    #[builder(default = 1000)]
    pub root_finder_maximum_iterations: usize,
}

impl Default for KeplerEphemerisConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Unperturbed Keplerian orbit about a central body.
#[derive(Clone, Debug)]
pub struct KeplerEphemeris {
    config: KeplerEphemerisConfig,
    initial_keplerian_elements: Vector6<f64>,
    epoch_of_initial_state: f64,
    gravitational_parameter: f64,
    propagator: Arc<dyn KeplerPropagator>,
}

impl KeplerEphemeris {
    pub fn new(
        initial_keplerian_elements: Vector6<f64>,
        epoch_of_initial_state: f64,
        gravitational_parameter: f64,
        propagator: Arc<dyn KeplerPropagator>,
        config: KeplerEphemerisConfig,
    ) -> Self {
        Self {
            config,
            initial_keplerian_elements,
            epoch_of_initial_state,
            gravitational_parameter,
            propagator,
        }
    }

    pub fn initial_keplerian_elements(&self) -> Vector6<f64> {
        self.initial_keplerian_elements
    }

    pub fn epoch_of_initial_state(&self) -> f64 {
        self.epoch_of_initial_state
    }

    pub fn gravitational_parameter(&self) -> f64 {
        self.gravitational_parameter
    }
}

impl Ephemeris for KeplerEphemeris {
    fn reference_frame_origin(&self) -> &str {
        &self.config.reference_frame_origin
    }

    fn reference_frame_orientation(&self) -> &str {
        &self.config.reference_frame_orientation
    }

    fn cartesian_state(&self, seconds_since_epoch: f64) -> Result<Vector6<f64>, EphemerisError> {
        self.propagator.propagate_kepler_orbit(
            &self.initial_keplerian_elements,
            seconds_since_epoch - self.epoch_of_initial_state,
            self.gravitational_parameter,
            &self.config,
        )
    }
}
