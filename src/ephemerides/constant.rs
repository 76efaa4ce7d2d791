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
use crate::io::ConfigRepr;
use crate::linalg::Vector6;
use parking_lot::RwLock;
use serde_derive::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use typed_builder::TypedBuilder;

pub type ConstantStateFunction = Arc<dyn Fn() -> Vector6<f64> + Send + Sync>;

/// Frame in which a constant ephemeris is expressed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct ConstantEphemerisConfig {
    /// Defaults to the solar system barycenter
    #[builder(default = String::from("SSB"), setter(into))]
    #[serde(default = "default_origin")]
    pub reference_frame_origin: String,
    #[builder(default = String::from("ECLIPJ2000"), setter(into))]
    #[serde(default = "default_orientation")]
    pub reference_frame_orientation: String,
}

fn default_origin() -> String {
    String::from("SSB")
}

fn default_orientation() -> String {
    String::from("ECLIPJ2000")
}

impl Default for ConstantEphemerisConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ConfigRepr for ConstantEphemerisConfig {}

#[derive(Clone)]
enum StateSource {
    Constant(Vector6<f64>),
    Function(ConstantStateFunction),
}

/// An ephemeris which returns the same state at all times, either stored or provided by a function.
///
/// The state may be replaced through a shared reference, which is seen by every holder of the ephemeris.
pub struct ConstantEphemeris {
    config: ConstantEphemerisConfig,
    source: RwLock<StateSource>,
}

impl ConstantEphemeris {
    pub fn new(constant_state: Vector6<f64>, config: ConstantEphemerisConfig) -> Self {
        Self {
            config,
            source: RwLock::new(StateSource::Constant(constant_state)),
        }
    }

    /// Initializes from a function called every time the state is requested.
    pub fn from_function(
        constant_state_function: ConstantStateFunction,
        config: ConstantEphemerisConfig,
    ) -> Self {
        Self {
            config,
            source: RwLock::new(StateSource::Function(constant_state_function)),
        }
    }

    /// Replaces the state, dropping the state function if one was set.
    pub fn update_constant_state(&self, new_state: Vector6<f64>) {
        *self.source.write() = StateSource::Constant(new_state);
    }

    pub fn config(&self) -> &ConstantEphemerisConfig {
        &self.config
    }
}

impl Ephemeris for ConstantEphemeris {
    fn reference_frame_origin(&self) -> &str {
        &self.config.reference_frame_origin
    }

    fn reference_frame_orientation(&self) -> &str {
        &self.config.reference_frame_orientation
    }

    fn cartesian_state(&self, _seconds_since_epoch: f64) -> Result<Vector6<f64>, EphemerisError> {
        Ok(match &*self.source.read() {
            StateSource::Constant(state) => *state,
            StateSource::Function(f) => f(),
        })
    }
}

impl fmt::Debug for ConstantEphemeris {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &*self.source.read() {
            StateSource::Constant(state) => format!("{state:?}"),
            StateSource::Function(_) => "<function>".to_string(),
        };
        f.debug_struct("ConstantEphemeris")
            .field("config", &self.config)
            .field("source", &source)
            .finish()
    }
}
