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

use snafu::prelude::*;

mod angles;
pub use self::angles::*;

mod coefficients;
pub use self::coefficients::*;

mod flight_conditions;
pub use self::flight_conditions::*;

/// Vehicle meshes of a hypersonic local inclination analysis, and the utilities to aggregate them.
pub mod local_inclination;
pub use self::local_inclination::{
    total_surface_area, vehicle_mesh, HypersonicLocalInclinationAnalysis, LocalInclinationAnalysis,
    MeshGrid, VehiclePart,
};

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AeroError {
    #[snafu(display(
        "vehicle part #{part}: normals grid is {normal_rows}x{normal_cols} but the {point_rows}x{point_cols} mesh needs at least {}x{}",
        point_rows.saturating_sub(1), point_cols.saturating_sub(1)
    ))]
    MeshShapeMismatch {
        part: usize,
        point_rows: usize,
        point_cols: usize,
        normal_rows: usize,
        normal_cols: usize,
    },
    #[snafu(display("{points} mesh point grids provided for {normals} surface normal grids"))]
    PartCountMismatch { points: usize, normals: usize },
    #[snafu(display("Mach number regime `{regime}` not recognized, use Full, Low or High"))]
    UnknownMachRegime { regime: String },
    #[snafu(display("expected {expected} independent variables but got {got}"))]
    IndependentVariableCount { expected: usize, got: usize },
    #[snafu(display("coefficient table has {got} entries but the grid has {expected} nodes"))]
    CoefficientTableSize { expected: usize, got: usize },
    #[snafu(display("independent variable #{index} must have strictly increasing, non-empty data points"))]
    InvalidIndependentVariablePoints { index: usize },
    #[snafu(display("{what} lists {got} entries for {parts} vehicle parts"))]
    InconsistentPartSettings {
        what: &'static str,
        got: usize,
        parts: usize,
    },
    #[snafu(display("aerodynamic angles requested before the angle calculator was updated"))]
    AnglesNotUpdated,
    #[snafu(display("{angle:?} is undefined, set the body orientation angles first"))]
    UndefinedAngle { angle: AerodynamicsReferenceFrameAngles },
    #[snafu(display("{variable:?} cannot be computed by the flight conditions"))]
    UnsupportedIndependentVariable {
        variable: AerodynamicCoefficientsIndependentVariables,
    },
}
