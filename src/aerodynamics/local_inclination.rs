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
    AeroError, AerodynamicCoefficientGenerator, AerodynamicCoefficientInterface,
    AerodynamicCoefficientsIndependentVariables, InconsistentPartSettingsSnafu,
    MeshShapeMismatchSnafu, PartCountMismatchSnafu,
};
use crate::linalg::{DMatrix, Vector3, Vector6};
use serde_derive::{Deserialize, Serialize};
use snafu::ensure;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use typed_builder::TypedBuilder;

/// A rows x columns grid of 3-D vectors (mesh points or panel surface normals).
pub type MeshGrid = DMatrix<Vector3<f64>>;

/// A discretized part of the vehicle surface.
///
/// The mesh points form a grid whose last row and column close the panels; the panel surface normals are
/// co-indexed with the first point of each panel.
#[derive(Clone, Debug, PartialEq)]
pub struct VehiclePart {
    mesh_points: MeshGrid,
    panel_surface_normals: MeshGrid,
    total_area: f64,
}

impl VehiclePart {
    /// Initializes a vehicle part from the data reported by the mesh engine. The total area is kept as reported,
    /// including its sign.
    pub fn new(mesh_points: MeshGrid, panel_surface_normals: MeshGrid, total_area: f64) -> Self {
        Self {
            mesh_points,
            panel_surface_normals,
            total_area,
        }
    }

    /// Builds the quadrilateral panels of the provided mesh, computing their unit normals and areas.
    /// Set `invert_order` to flip the normals when the mesh is ordered inwards.
    pub fn from_mesh_points(mesh_points: MeshGrid, invert_order: bool) -> Self {
        let rows = mesh_points.nrows().saturating_sub(1);
        let cols = mesh_points.ncols().saturating_sub(1);
        let sign = if invert_order { -1.0 } else { 1.0 };

        let mut total_area = 0.0;
        let panel_surface_normals = MeshGrid::from_fn(rows, cols, |i, j| {
            let diag_1 = mesh_points[(i + 1, j + 1)] - mesh_points[(i, j)];
            let diag_2 = mesh_points[(i + 1, j)] - mesh_points[(i, j + 1)];
            let cross = diag_1.cross(&diag_2);
            let norm = cross.norm();
            total_area += 0.5 * norm;
            if norm > 0.0 {
                sign * cross / norm
            } else {
                Vector3::zeros()
            }
        });

        Self {
            mesh_points,
            panel_surface_normals,
            total_area,
        }
    }

    pub fn mesh_points(&self) -> &MeshGrid {
        &self.mesh_points
    }

    pub fn panel_surface_normals(&self) -> &MeshGrid {
        &self.panel_surface_normals
    }

    /// Total area of this part in m^2, as reported (may be negative for inverted parts).
    pub fn total_area(&self) -> f64 {
        self.total_area
    }
}

/// A panel-method aerodynamic analysis on a discretized vehicle surface.
pub trait LocalInclinationAnalysis {
    fn number_of_vehicle_parts(&self) -> usize;

    /// Returns the vehicle part at the provided index.
    ///
    /// # Panics
    /// The index must be lower than `number_of_vehicle_parts()`.
    fn vehicle_part(&self, index: usize) -> &VehiclePart;

    /// The mesh point grids of all parts, in part order.
    fn mesh_points(&self) -> Vec<&MeshGrid> {
        (0..self.number_of_vehicle_parts())
            .map(|i| self.vehicle_part(i).mesh_points())
            .collect()
    }

    /// The panel surface normal grids of all parts, in part order.
    fn panel_surface_normals(&self) -> Vec<&MeshGrid> {
        (0..self.number_of_vehicle_parts())
            .map(|i| self.vehicle_part(i).panel_surface_normals())
            .collect()
    }
}

/// Returns the total surface area of the vehicle, i.e. the sum of the absolute area of each part.
pub fn total_surface_area<A: LocalInclinationAnalysis + ?Sized>(analysis: &A) -> f64 {
    (0..analysis.number_of_vehicle_parts())
        .map(|i| analysis.vehicle_part(i).total_area().abs())
        .sum()
}

/// Flattens the vehicle mesh into two co-indexed lists of panel points and panel surface normals.
///
/// Parts are visited in order, then rows, then columns. The last row and last column of each point grid close
/// the panels and are not included, so a grid with fewer than two rows or columns contributes nothing.
/// The normals grid of a part must cover every included point, else an `AeroError::MeshShapeMismatch` is returned.
#[allow(clippy::type_complexity)]
pub fn vehicle_mesh<A: LocalInclinationAnalysis + ?Sized>(
    analysis: &A,
) -> Result<(Vec<Vector3<f64>>, Vec<Vector3<f64>>), AeroError> {
    let mesh_points = analysis.mesh_points();
    let surface_normals = analysis.panel_surface_normals();

    ensure!(
        mesh_points.len() == surface_normals.len(),
        PartCountMismatchSnafu {
            points: mesh_points.len(),
            normals: surface_normals.len()
        }
    );

    let capacity = mesh_points
        .iter()
        .map(|grid| grid.nrows().saturating_sub(1) * grid.ncols().saturating_sub(1))
        .sum();
    let mut points_list = Vec::with_capacity(capacity);
    let mut normals_list = Vec::with_capacity(capacity);

    for (part, (points, normals)) in mesh_points.iter().zip(surface_normals.iter()).enumerate() {
        let rows = points.nrows().saturating_sub(1);
        let cols = points.ncols().saturating_sub(1);

        ensure!(
            rows == 0 || cols == 0 || (normals.nrows() >= rows && normals.ncols() >= cols),
            MeshShapeMismatchSnafu {
                part,
                point_rows: points.nrows(),
                point_cols: points.ncols(),
                normal_rows: normals.nrows(),
                normal_cols: normals.ncols(),
            }
        );

        for row in 0..rows {
            for col in 0..cols {
                points_list.push(points[(row, col)]);
                normals_list.push(normals[(row, col)]);
            }
        }
    }

    Ok((points_list, normals_list))
}

/// Mach number regime for the default local inclination analysis points.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachRegime {
    #[default]
    Full,
    Low,
    High,
}

impl FromStr for MachRegime {
    type Err = AeroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Full" => Ok(Self::Full),
            "Low" => Ok(Self::Low),
            "High" => Ok(Self::High),
            _ => Err(AeroError::UnknownMachRegime {
                regime: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for MachRegime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Default Mach numbers at which a hypersonic local inclination analysis is performed.
pub fn default_local_inclination_mach_points(regime: MachRegime) -> Vec<f64> {
    match regime {
        MachRegime::Full => vec![3.0, 4.0, 5.0, 8.0, 10.0, 20.0],
        MachRegime::Low => vec![3.0, 4.0, 5.0, 8.0, 10.0],
        MachRegime::High => vec![5.0, 8.0, 10.0, 20.0],
    }
}

/// Default angles of attack, from -10 to 60 degrees in steps of 5 degrees, in radians.
pub fn default_local_inclination_angle_of_attack_points() -> Vec<f64> {
    (0..15)
        .map(|i| f64::from(i * 5 - 10) * PI / 180.0)
        .collect()
}

/// Default sideslip angles, 0 and 1 degree, in radians.
pub fn default_local_inclination_sideslip_angle_points() -> Vec<f64> {
    vec![0.0, PI / 180.0]
}

/// Settings of a hypersonic local inclination analysis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct LocalInclinationConfig {
    /// Mach number, angle of attack and sideslip angle points
    pub independent_variable_points: Vec<Vec<f64>>,
    /// Whether to invert the panel ordering of each part
    pub invert_orders: Vec<bool>,
    /// Compression and expansion method identifiers of each part
    pub selected_methods: Vec<Vec<i32>>,
    /// in m^2
    pub reference_area: f64,
    /// in m
    pub reference_length: f64,
    /// in m, body frame
    pub moment_reference_point: Vector3<f64>,
    #[builder(default)]
    #[serde(default)]
    pub save_pressure_coefficients: bool,
}

/// Aerodynamic coefficients of a vehicle from a hypersonic local inclination analysis.
///
/// The coefficient table is produced by the panel method engine; this structure holds the vehicle mesh,
/// the analysis settings, and interpolates the table over Mach number, angle of attack and sideslip angle.
#[derive(Debug)]
pub struct HypersonicLocalInclinationAnalysis {
    config: LocalInclinationConfig,
    parts: Vec<VehiclePart>,
    coefficients: AerodynamicCoefficientGenerator,
}

impl HypersonicLocalInclinationAnalysis {
    pub fn new(
        config: LocalInclinationConfig,
        parts: Vec<VehiclePart>,
        coefficient_table: Vec<Vector6<f64>>,
    ) -> Result<Self, AeroError> {
        ensure!(
            config.invert_orders.len() == parts.len(),
            InconsistentPartSettingsSnafu {
                what: "invert_orders",
                got: config.invert_orders.len(),
                parts: parts.len()
            }
        );
        ensure!(
            config.selected_methods.len() == parts.len(),
            InconsistentPartSettingsSnafu {
                what: "selected_methods",
                got: config.selected_methods.len(),
                parts: parts.len()
            }
        );

        use AerodynamicCoefficientsIndependentVariables::*;
        let coefficients = AerodynamicCoefficientGenerator::new(
            vec![
                MachNumberDependent,
                AngleOfAttackDependent,
                SideslipAngleDependent,
            ],
            config.independent_variable_points.clone(),
            coefficient_table,
            config.reference_area,
            config.reference_length,
            config.moment_reference_point,
        )?;

        Ok(Self {
            config,
            parts,
            coefficients,
        })
    }

    /// Builds the vehicle parts from their mesh point grids, using the invert orders of the configuration.
    pub fn from_mesh_points(
        config: LocalInclinationConfig,
        meshes: Vec<MeshGrid>,
        coefficient_table: Vec<Vector6<f64>>,
    ) -> Result<Self, AeroError> {
        ensure!(
            config.invert_orders.len() == meshes.len(),
            InconsistentPartSettingsSnafu {
                what: "invert_orders",
                got: config.invert_orders.len(),
                parts: meshes.len()
            }
        );
        let parts = meshes
            .into_iter()
            .zip(config.invert_orders.iter())
            .map(|(mesh, invert)| VehiclePart::from_mesh_points(mesh, *invert))
            .collect();
        Self::new(config, parts, coefficient_table)
    }

    pub fn config(&self) -> &LocalInclinationConfig {
        &self.config
    }

    pub fn coefficient_generator(&self) -> &AerodynamicCoefficientGenerator {
        &self.coefficients
    }
}

impl LocalInclinationAnalysis for HypersonicLocalInclinationAnalysis {
    fn number_of_vehicle_parts(&self) -> usize {
        self.parts.len()
    }

    fn vehicle_part(&self, index: usize) -> &VehiclePart {
        &self.parts[index]
    }
}

impl AerodynamicCoefficientInterface for HypersonicLocalInclinationAnalysis {
    fn reference_area(&self) -> f64 {
        self.coefficients.reference_area()
    }

    fn reference_length(&self) -> f64 {
        self.coefficients.reference_length()
    }

    fn moment_reference_point(&self) -> Vector3<f64> {
        self.coefficients.moment_reference_point()
    }

    fn independent_variable_names(&self) -> Vec<AerodynamicCoefficientsIndependentVariables> {
        self.coefficients.independent_variable_names()
    }

    fn current_coefficients(&self) -> Vector6<f64> {
        self.coefficients.current_coefficients()
    }

    fn update_coefficients(
        &self,
        independent_variables: &[f64],
        time: f64,
    ) -> Result<(), AeroError> {
        self.coefficients
            .update_coefficients(independent_variables, time)
    }
}

/// A bare list of vehicle parts, as handed over by a mesh engine.
impl LocalInclinationAnalysis for [VehiclePart] {
    fn number_of_vehicle_parts(&self) -> usize {
        self.len()
    }

    fn vehicle_part(&self, index: usize) -> &VehiclePart {
        &self[index]
    }
}

impl LocalInclinationAnalysis for Vec<VehiclePart> {
    fn number_of_vehicle_parts(&self) -> usize {
        self.len()
    }

    fn vehicle_part(&self, index: usize) -> &VehiclePart {
        &self[index]
    }
}
