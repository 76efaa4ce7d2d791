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

use crate::linalg::{Vector3, Vector6};
use snafu::prelude::*;
use std::fmt;

mod constant;
pub use self::constant::*;

mod kepler;
pub use self::kepler::*;

mod tabulated;
pub use self::tabulated::*;

mod tle;
pub use self::tle::*;

/// Orientation of bodies, from simple constant rate rotations to tidally locked frames.
pub mod rotation;
pub use self::rotation::{
    transform_to_inertial_orientation, DirectLongitudeLibrationCalculator,
    LongitudeLibrationCalculator, RotationalEphemeris, SimpleRotationalEphemeris,
    SynchronousRotationalEphemeris,
};

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EphemerisError {
    #[snafu(display("{epoch} s is outside of the tabulated interval [{start}, {end}] s"))]
    OutOfInterpolationInterval { epoch: f64, start: f64, end: f64 },
    #[snafu(display("interpolation requires at least {need} states but got {got}"))]
    InsufficientStates { need: usize, got: usize },
    /// `index` is the position of the first state whose epoch does not follow the one before it.
    #[snafu(display("tabulated epochs must be strictly increasing, see state #{index}"))]
    UnsortedEpochs { index: usize },
    #[snafu(display("TLE line {line}: {msg}"))]
    TleParse { line: usize, msg: String },
    #[snafu(display("TLE ephemeris has no TLE to propagate"))]
    MissingTle,
    #[snafu(display("ephemeris engine failed: {details}"))]
    Engine { details: String },
}

/// Translational ephemeris of a body, expressed in the frame named by its origin and orientation.
///
/// Times are seconds since J2000, states are in meters and meters per second.
pub trait Ephemeris: Send + Sync + fmt::Debug {
    fn reference_frame_origin(&self) -> &str;

    fn reference_frame_orientation(&self) -> &str;

    fn cartesian_state(&self, seconds_since_epoch: f64) -> Result<Vector6<f64>, EphemerisError>;

    fn cartesian_position(&self, seconds_since_epoch: f64) -> Result<Vector3<f64>, EphemerisError> {
        Ok(self
            .cartesian_state(seconds_since_epoch)?
            .fixed_rows::<3>(0)
            .into_owned())
    }

    fn cartesian_velocity(&self, seconds_since_epoch: f64) -> Result<Vector3<f64>, EphemerisError> {
        Ok(self
            .cartesian_state(seconds_since_epoch)?
            .fixed_rows::<3>(3)
            .into_owned())
    }
}
