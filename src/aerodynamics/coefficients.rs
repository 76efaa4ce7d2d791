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

use super::{
    AeroError, CoefficientTableSizeSnafu, IndependentVariableCountSnafu,
    InvalidIndependentVariablePointsSnafu,
};
use crate::linalg::{Vector3, Vector6};
use enum_iterator::Sequence;
use parking_lot::RwLock;
use serde_derive::{Deserialize, Serialize};
use snafu::ensure;
use std::fmt;

/// The independent variables on which aerodynamic coefficients may depend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Sequence)]
#[serde(rename_all = "snake_case")]
pub enum AerodynamicCoefficientsIndependentVariables {
    MachNumberDependent,
    AngleOfAttackDependent,
    SideslipAngleDependent,
    AltitudeDependent,
    TimeDependent,
    ControlSurfaceDeflectionDependent,
    UndefinedIndependentVariable,
}

impl AerodynamicCoefficientsIndependentVariables {
    /// Name under which this value is exposed to the embedding language
    pub fn exposed_name(&self) -> &'static str {
        match self {
            Self::MachNumberDependent => "mach_number_dependent",
            Self::AngleOfAttackDependent => "angle_of_attack_dependent",
            Self::SideslipAngleDependent => "sideslip_angle_dependent",
            Self::AltitudeDependent => "altitude_dependent",
            Self::TimeDependent => "time_dependent",
            Self::ControlSurfaceDeflectionDependent => "control_surface_deflection_dependent",
            Self::UndefinedIndependentVariable => "undefined_independent_variable",
        }
    }
}

/// Aerodynamic force and moment coefficients as a function of independent variables.
///
/// The six coefficients are ordered as `[C_D, C_S, C_L, C_l, C_m, C_n]` (force then moment).
/// Interfaces are shared between bodies and flight conditions, so updating the coefficients only
/// requires a shared reference and is visible to every holder.
pub trait AerodynamicCoefficientInterface: Send + Sync + fmt::Debug {
    /// Reference area in m^2
    fn reference_area(&self) -> f64;

    /// Reference length in m
    fn reference_length(&self) -> f64;

    /// Moment reference point in the body frame, in m
    fn moment_reference_point(&self) -> Vector3<f64>;

    /// Identifiers of the independent variables, in the order expected by `update_coefficients`
    fn independent_variable_names(&self) -> Vec<AerodynamicCoefficientsIndependentVariables>;

    /// All six coefficients as of the last update
    fn current_coefficients(&self) -> Vector6<f64>;

    fn current_force_coefficients(&self) -> Vector3<f64> {
        self.current_coefficients().fixed_rows::<3>(0).into_owned()
    }

    fn current_moment_coefficients(&self) -> Vector3<f64> {
        self.current_coefficients().fixed_rows::<3>(3).into_owned()
    }

    /// Recomputes the current coefficients at the provided independent variables and time.
    fn update_coefficients(&self, independent_variables: &[f64], time: f64)
        -> Result<(), AeroError>;
}

/// Coefficients which do not depend on any independent variable.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantAerodynamicCoefficientInterface {
    pub reference_area: f64,
    pub reference_length: f64,
    pub moment_reference_point: Vector3<f64>,
    pub coefficients: Vector6<f64>,
}

impl ConstantAerodynamicCoefficientInterface {
    /// Initializes from force coefficients only, with zero moment coefficients.
    pub fn from_force_coefficients(reference_area: f64, force_coefficients: Vector3<f64>) -> Self {
        let mut coefficients = Vector6::zeros();
        coefficients
            .fixed_rows_mut::<3>(0)
            .copy_from(&force_coefficients);
        Self {
            reference_area,
            reference_length: 1.0,
            moment_reference_point: Vector3::zeros(),
            coefficients,
        }
    }
}

impl AerodynamicCoefficientInterface for ConstantAerodynamicCoefficientInterface {
    fn reference_area(&self) -> f64 {
        self.reference_area
    }

    fn reference_length(&self) -> f64 {
        self.reference_length
    }

    fn moment_reference_point(&self) -> Vector3<f64> {
        self.moment_reference_point
    }

    fn independent_variable_names(&self) -> Vec<AerodynamicCoefficientsIndependentVariables> {
        Vec::new()
    }

    fn current_coefficients(&self) -> Vector6<f64> {
        self.coefficients
    }

    fn update_coefficients(
        &self,
        independent_variables: &[f64],
        _time: f64,
    ) -> Result<(), AeroError> {
        ensure!(
            independent_variables.is_empty(),
            IndependentVariableCountSnafu {
                expected: 0_usize,
                got: independent_variables.len()
            }
        );
        Ok(())
    }
}

/// Coefficients tabulated on a rectilinear grid of independent variables and interpolated multi-linearly.
///
/// The table is stored with the last independent variable varying fastest. Values outside of the grid
/// are clamped to its boundary.
#[derive(Debug)]
pub struct AerodynamicCoefficientGenerator {
    independent_variable_names: Vec<AerodynamicCoefficientsIndependentVariables>,
    independent_variable_points: Vec<Vec<f64>>,
    coefficients: Vec<Vector6<f64>>,
    reference_area: f64,
    reference_length: f64,
    moment_reference_point: Vector3<f64>,
    current: RwLock<Vector6<f64>>,
}

impl AerodynamicCoefficientGenerator {
    pub fn new(
        independent_variable_names: Vec<AerodynamicCoefficientsIndependentVariables>,
        independent_variable_points: Vec<Vec<f64>>,
        coefficients: Vec<Vector6<f64>>,
        reference_area: f64,
        reference_length: f64,
        moment_reference_point: Vector3<f64>,
    ) -> Result<Self, AeroError> {
        ensure!(
            independent_variable_names.len() == independent_variable_points.len(),
            IndependentVariableCountSnafu {
                expected: independent_variable_names.len(),
                got: independent_variable_points.len()
            }
        );

        for (index, points) in independent_variable_points.iter().enumerate() {
            ensure!(
                !points.is_empty() && points.windows(2).all(|w| w[0] < w[1]),
                InvalidIndependentVariablePointsSnafu { index }
            );
        }

        let nodes: usize = independent_variable_points.iter().map(Vec::len).product();
        ensure!(
            nodes == coefficients.len(),
            CoefficientTableSizeSnafu {
                expected: nodes,
                got: coefficients.len()
            }
        );

        Ok(Self {
            independent_variable_names,
            independent_variable_points,
            coefficients,
            reference_area,
            reference_length,
            moment_reference_point,
            current: RwLock::new(Vector6::zeros()),
        })
    }

    pub fn independent_variable_points(&self) -> &[Vec<f64>] {
        &self.independent_variable_points
    }

    /// Returns the tabulated coefficients at the provided grid node.
    pub fn coefficients_at_node(&self, indices: &[usize]) -> Option<Vector6<f64>> {
        if indices.len() != self.independent_variable_points.len()
            || indices
                .iter()
                .zip(&self.independent_variable_points)
                .any(|(idx, points)| *idx >= points.len())
        {
            return None;
        }
        Some(self.coefficients[self.flat_index(indices)])
    }

    /// Interpolates the coefficients at the provided independent variables, without updating the current coefficients.
    pub fn interpolate(&self, independent_variables: &[f64]) -> Result<Vector6<f64>, AeroError> {
        let dims = self.independent_variable_points.len();
        ensure!(
            independent_variables.len() == dims,
            IndependentVariableCountSnafu {
                expected: dims,
                got: independent_variables.len()
            }
        );

        let brackets: Vec<(usize, f64)> = independent_variables
            .iter()
            .zip(&self.independent_variable_points)
            .zip(&self.independent_variable_names)
            .map(|((value, points), name)| {
                if *value < points[0] || *value > points[points.len() - 1] {
                    debug!(
                        "{name:?} = {value} outside of [{}, {}], clamping to the boundary",
                        points[0],
                        points[points.len() - 1]
                    );
                }
                bracket(points, *value)
            })
            .collect();

        let mut result = Vector6::zeros();
        let mut corner = vec![0; dims];
        for mask in 0..(1_usize << dims) {
            let mut weight = 1.0;
            for (dim, (lower, fraction)) in brackets.iter().enumerate() {
                let upper_side = mask & (1 << dim) != 0;
                if self.independent_variable_points[dim].len() == 1 {
                    if upper_side {
                        weight = 0.0;
                    }
                    corner[dim] = 0;
                } else if upper_side {
                    weight *= fraction;
                    corner[dim] = lower + 1;
                } else {
                    weight *= 1.0 - fraction;
                    corner[dim] = *lower;
                }
            }
            if weight != 0.0 {
                result += self.coefficients[self.flat_index(&corner)] * weight;
            }
        }

        Ok(result)
    }

    fn flat_index(&self, indices: &[usize]) -> usize {
        let mut index = 0;
        for (idx, points) in indices.iter().zip(&self.independent_variable_points) {
            index = index * points.len() + idx;
        }
        index
    }
}

/// Returns the lower bracketing index and the fraction towards the next point, clamped to [0, 1].
fn bracket(points: &[f64], value: f64) -> (usize, f64) {
    if points.len() == 1 {
        return (0, 0.0);
    }
    let upper = points
        .partition_point(|p| *p <= value)
        .clamp(1, points.len() - 1);
    let lower = upper - 1;
    let fraction = ((value - points[lower]) / (points[upper] - points[lower])).clamp(0.0, 1.0);
    (lower, fraction)
}

impl AerodynamicCoefficientInterface for AerodynamicCoefficientGenerator {
    fn reference_area(&self) -> f64 {
        self.reference_area
    }

    fn reference_length(&self) -> f64 {
        self.reference_length
    }

    fn moment_reference_point(&self) -> Vector3<f64> {
        self.moment_reference_point
    }

    fn independent_variable_names(&self) -> Vec<AerodynamicCoefficientsIndependentVariables> {
        self.independent_variable_names.clone()
    }

    fn current_coefficients(&self) -> Vector6<f64> {
        *self.current.read()
    }

    fn update_coefficients(
        &self,
        independent_variables: &[f64],
        _time: f64,
    ) -> Result<(), AeroError> {
        let coefficients = self.interpolate(independent_variables)?;
        *self.current.write() = coefficients;
        Ok(())
    }
}
