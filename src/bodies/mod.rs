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
use crate::ephemerides::EphemerisError;
use crate::gravitation::GravityError;
use snafu::prelude::*;

mod atmosphere;
pub use self::atmosphere::*;

mod body;
pub use self::body::*;

mod shape;
pub use self::shape::*;

mod system;
pub use self::system::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BodyError {
    #[snafu(display("body `{name}` already exists in the system of bodies"))]
    BodyExists { name: String },
    #[snafu(display("no body named `{name}` in the system of bodies"))]
    BodyNotFound { name: String },
    #[snafu(display("body `{body}` has no {model}"))]
    MissingModel { body: String, model: &'static str },
    #[snafu(display("body `{name}` cannot fly about itself"))]
    SelfCentered { name: String },
    #[snafu(display("ephemeris of `{body}`: {source}"))]
    BodyEphemeris { body: String, source: EphemerisError },
    #[snafu(display("flight conditions of `{body}`: {source}"))]
    BodyFlightConditions { body: String, source: AeroError },
    #[snafu(display("gravity field of `{body}`: {source}"))]
    BodyGravityField { body: String, source: GravityError },
}
