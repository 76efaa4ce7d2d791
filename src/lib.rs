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

/*! # nyx-environment

Environment models for astrodynamics simulations: ephemerides, rotation models, gravity fields,
aerodynamic coefficient interfaces, flight conditions, ground stations and the system of bodies
which ties them together.

Every model family is a trait, so that the numerical engines which evaluate them (orbit propagation,
spherical harmonics, panel methods, SGP4) can be plugged in. The [exposure] module declares how these
models are projected onto a dynamically typed calling surface, and the `python` feature builds that
surface with PyO3.
*/

#[macro_use]
extern crate log;
extern crate nalgebra as na;

/// Aerodynamic coefficient interfaces, local inclination meshes, aerodynamic angles and flight conditions.
pub mod aerodynamics;

/// Body shape and atmosphere models, bodies and the system of bodies.
pub mod bodies;

/// Translational and rotational ephemerides, including Two-Line Elements.
pub mod ephemerides;

/// The capability registry which declares how environment models are exposed to a dynamic language.
pub mod exposure;

/// Gravity field models.
pub mod gravitation;

/// Ground stations and their pointing angles.
pub mod ground_stations;

/// Configuration loading and gravity potential files.
pub mod io;

/// Rotation helpers shared by the environment models.
pub mod utils;

mod errors;
/// Functions which may fail return an error, and all of these convert into an `EnvironmentError`.
pub use self::errors::EnvironmentError;

#[cfg(feature = "python")]
mod python;

/// Re-export of hifitime
pub mod time {
    pub use hifitime::*;
}

/// Re-export nalgebra
pub mod linalg {
    pub use na::base::*;
}

/// Cartesian state: position (m) and velocity (m/s).
pub type CartesianState = na::Vector6<f64>;

pub mod prelude {
    pub use crate::aerodynamics::{
        total_surface_area, vehicle_mesh, AerodynamicCoefficientInterface,
        AtmosphericFlightConditions, FlightConditions, LocalInclinationAnalysis,
    };
    pub use crate::bodies::{Body, SharedBody, SystemOfBodies};
    pub use crate::ephemerides::{Ephemeris, RotationalEphemeris, Tle};
    pub use crate::exposure::{CapabilityRegistry, ENVIRONMENT};
    pub use crate::gravitation::GravityFieldModel;
    pub use crate::io::ConfigRepr;
    pub use crate::{CartesianState, EnvironmentError};
}
