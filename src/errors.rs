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

use crate::aerodynamics::AeroError;
use crate::bodies::BodyError;
use crate::ephemerides::EphemerisError;
use crate::exposure::ExposureError;
use crate::gravitation::GravityError;
use crate::ground_stations::GroundStationError;
use crate::io::{ConfigError, InputOutputError};
use snafu::prelude::*;

/// Aggregates the errors of every environment module, so that `?` works across module boundaries.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum EnvironmentError {
    #[snafu(context(false), display("aerodynamics: {source}"))]
    Aerodynamics { source: AeroError },
    #[snafu(context(false), display("bodies: {source}"))]
    Bodies { source: BodyError },
    #[snafu(context(false), display("ephemerides: {source}"))]
    Ephemerides { source: EphemerisError },
    #[snafu(context(false), display("exposure: {source}"))]
    Exposure { source: ExposureError },
    #[snafu(context(false), display("gravitation: {source}"))]
    Gravitation { source: GravityError },
    #[snafu(context(false), display("ground station: {source}"))]
    GroundStation { source: GroundStationError },
    #[snafu(context(false), display("configuration: {source}"))]
    Config { source: ConfigError },
    #[snafu(context(false), display("input/output: {source}"))]
    InputOutput { source: InputOutputError },
}
