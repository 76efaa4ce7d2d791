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

use crate::io::gravity::{load_coefficients, HarmonicsCoefficients, PotentialFileFormat};
use crate::io::InputOutputError;
use crate::linalg::DMatrix;
use parking_lot::RwLock;
use snafu::prelude::*;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum GravityError {
    #[snafu(display("gravitational parameter must be finite and positive, got {value}"))]
    InvalidGravitationalParameter { value: f64 },
    #[snafu(display(
        "cosine coefficients are {cosine_rows}x{cosine_cols} but sine coefficients are {sine_rows}x{sine_cols}"
    ))]
    CoefficientShape {
        cosine_rows: usize,
        cosine_cols: usize,
        sine_rows: usize,
        sine_cols: usize,
    },
    #[snafu(display("{path} does not provide the {what}"))]
    MissingFileConstant { path: String, what: &'static str },
    #[snafu(display("could not load gravity field: {source}"))]
    LoadGravityField { source: InputOutputError },
}

/// Called after the gravitational parameter changes, e.g. to recompute the inertia tensor of the body.
pub type InertiaTensorUpdate = Arc<dyn Fn() + Send + Sync>;

/// Gravity field of a body. The field is shared between holders, so resetting it only needs a shared reference.
pub trait GravityFieldModel: Send + Sync + fmt::Debug {
    /// Gravitational parameter in m^3/s^2
    fn gravitational_parameter(&self) -> f64;

    /// Replaces the gravitational parameter and calls the inertia tensor update, if any.
    fn reset_gravitational_parameter(&self, gravitational_parameter: f64) -> Result<(), GravityError>;

    fn as_spherical_harmonics(&self) -> Option<&SphericalHarmonicsGravityField> {
        None
    }
}

fn checked_gm(value: f64) -> Result<f64, GravityError> {
    ensure!(
        value.is_finite() && value > 0.0,
        InvalidGravitationalParameterSnafu { value }
    );
    Ok(value)
}

/// Point mass gravity field
pub struct PointMassGravityField {
    gravitational_parameter: RwLock<f64>,
    update_inertia_tensor: Option<InertiaTensorUpdate>,
}

impl PointMassGravityField {
    pub fn new(
        gravitational_parameter: f64,
        update_inertia_tensor: Option<InertiaTensorUpdate>,
    ) -> Result<Self, GravityError> {
        Ok(Self {
            gravitational_parameter: RwLock::new(checked_gm(gravitational_parameter)?),
            update_inertia_tensor,
        })
    }
}

impl GravityFieldModel for PointMassGravityField {
    fn gravitational_parameter(&self) -> f64 {
        *self.gravitational_parameter.read()
    }

    fn reset_gravitational_parameter(&self, gravitational_parameter: f64) -> Result<(), GravityError> {
        *self.gravitational_parameter.write() = checked_gm(gravitational_parameter)?;
        if let Some(update) = &self.update_inertia_tensor {
            update();
        }
        Ok(())
    }
}

impl fmt::Debug for PointMassGravityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "point mass (GM = {} m^3/s^2)", self.gravitational_parameter())
    }
}

/// Gravity field expanded in fully normalized spherical harmonics.
///
/// Coefficient tables are indexed as `(degree, order)`; the maximum degree and order follow from their dimensions.
pub struct SphericalHarmonicsGravityField {
    gravitational_parameter: RwLock<f64>,
    reference_radius: f64,
    cosine_coefficients: RwLock<DMatrix<f64>>,
    sine_coefficients: RwLock<DMatrix<f64>>,
    fixed_reference_frame: String,
    update_inertia_tensor: Option<InertiaTensorUpdate>,
}

impl SphericalHarmonicsGravityField {
    pub fn new(
        gravitational_parameter: f64,
        reference_radius: f64,
        cosine_coefficients: DMatrix<f64>,
        sine_coefficients: DMatrix<f64>,
        fixed_reference_frame: &str,
        update_inertia_tensor: Option<InertiaTensorUpdate>,
    ) -> Result<Self, GravityError> {
        ensure!(
            cosine_coefficients.shape() == sine_coefficients.shape(),
            CoefficientShapeSnafu {
                cosine_rows: cosine_coefficients.nrows(),
                cosine_cols: cosine_coefficients.ncols(),
                sine_rows: sine_coefficients.nrows(),
                sine_cols: sine_coefficients.ncols(),
            }
        );
        Ok(Self {
            gravitational_parameter: RwLock::new(checked_gm(gravitational_parameter)?),
            reference_radius,
            cosine_coefficients: RwLock::new(cosine_coefficients),
            sine_coefficients: RwLock::new(sine_coefficients),
            fixed_reference_frame: fixed_reference_frame.to_string(),
            update_inertia_tensor,
        })
    }

    /// Initializes from coefficients loaded from a potential file, which must provide the reference radius and the
    /// gravitational parameter.
    pub fn from_coefficients(
        coefficients: HarmonicsCoefficients,
        fixed_reference_frame: &str,
        source_name: &str,
    ) -> Result<Self, GravityError> {
        let gm = coefficients
            .gravitational_parameter_m3_s2
            .context(MissingFileConstantSnafu {
                path: source_name,
                what: "gravitational parameter",
            })?;
        let radius = coefficients
            .reference_radius_m
            .context(MissingFileConstantSnafu {
                path: source_name,
                what: "reference radius",
            })?;
        Self::new(
            gm,
            radius,
            coefficients.cosine,
            coefficients.sine,
            fixed_reference_frame,
            None,
        )
    }

    /// Loads the field up to the requested degree and order from a SHADR file.
    pub fn from_file<P: AsRef<Path>>(
        path: P,
        degree: usize,
        order: usize,
        gunzipped: bool,
        fixed_reference_frame: &str,
    ) -> Result<Self, GravityError> {
        let source_name = path.as_ref().display().to_string();
        let coefficients = load_coefficients(
            &path,
            PotentialFileFormat::Shadr,
            degree,
            order,
            gunzipped,
        )
        .context(LoadGravityFieldSnafu)?;
        info!(
            "loaded {}x{} gravity field from {source_name}",
            coefficients.max_degree(),
            coefficients.max_order()
        );
        Self::from_coefficients(coefficients, fixed_reference_frame, &source_name)
    }

    /// Reference radius in meters
    pub fn reference_radius(&self) -> f64 {
        self.reference_radius
    }

    pub fn maximum_degree(&self) -> usize {
        self.cosine_coefficients.read().nrows().saturating_sub(1)
    }

    pub fn maximum_order(&self) -> usize {
        self.cosine_coefficients.read().ncols().saturating_sub(1)
    }

    pub fn cosine_coefficients(&self) -> DMatrix<f64> {
        self.cosine_coefficients.read().clone()
    }

    pub fn set_cosine_coefficients(&self, coefficients: DMatrix<f64>) {
        *self.cosine_coefficients.write() = coefficients;
    }

    pub fn sine_coefficients(&self) -> DMatrix<f64> {
        self.sine_coefficients.read().clone()
    }

    pub fn set_sine_coefficients(&self, coefficients: DMatrix<f64>) {
        *self.sine_coefficients.write() = coefficients;
    }

    /// Name of the body-fixed frame in which the coefficients are defined
    pub fn fixed_reference_frame(&self) -> &str {
        &self.fixed_reference_frame
    }
}

impl GravityFieldModel for SphericalHarmonicsGravityField {
    fn gravitational_parameter(&self) -> f64 {
        *self.gravitational_parameter.read()
    }

    fn reset_gravitational_parameter(&self, gravitational_parameter: f64) -> Result<(), GravityError> {
        *self.gravitational_parameter.write() = checked_gm(gravitational_parameter)?;
        if let Some(update) = &self.update_inertia_tensor {
            update();
        }
        Ok(())
    }

    fn as_spherical_harmonics(&self) -> Option<&SphericalHarmonicsGravityField> {
        Some(self)
    }
}

impl fmt::Debug for SphericalHarmonicsGravityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} spherical harmonics in {} (GM = {} m^3/s^2, R = {} m)",
            self.maximum_degree(),
            self.maximum_order(),
            self.fixed_reference_frame,
            self.gravitational_parameter(),
            self.reference_radius
        )
    }
}

#[cfg(test)]
mod ut_gravitation {
    use super::*;
    use crate::io::gravity::parse_coefficients;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const EARTH_GM: f64 = 3.986004418e14;

    #[test]
    fn point_mass() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let field = PointMassGravityField::new(
            EARTH_GM,
            Some(Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
        )
        .unwrap();
        assert_eq!(field.gravitational_parameter(), EARTH_GM);
        assert!(field.as_spherical_harmonics().is_none());

        field.reset_gravitational_parameter(4.0e14).unwrap();
        assert_eq!(field.gravitational_parameter(), 4.0e14);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(matches!(
            field.reset_gravitational_parameter(-1.0),
            Err(GravityError::InvalidGravitationalParameter { .. })
        ));
        assert_eq!(field.gravitational_parameter(), 4.0e14);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        assert!(PointMassGravityField::new(f64::NAN, None).is_err());
    }

    #[test]
    fn spherical_harmonics() {
        let mut cosine = DMatrix::zeros(3, 3);
        cosine[(0, 0)] = 1.0;
        cosine[(2, 0)] = -4.84165371736e-4;
        let sine = DMatrix::zeros(3, 3);

        let field = SphericalHarmonicsGravityField::new(
            EARTH_GM,
            6_378_136.3,
            cosine.clone(),
            sine.clone(),
            "IAU_Earth",
            None,
        )
        .unwrap();
        assert_eq!(field.maximum_degree(), 2);
        assert_eq!(field.maximum_order(), 2);
        assert_eq!(field.reference_radius(), 6_378_136.3);
        assert_eq!(field.fixed_reference_frame(), "IAU_Earth");
        assert_eq!(field.cosine_coefficients(), cosine);

        let shared: Arc<dyn GravityFieldModel> = Arc::new(field);
        let sph = shared.as_spherical_harmonics().unwrap();
        sph.set_cosine_coefficients(DMatrix::zeros(5, 4));
        assert_eq!(sph.maximum_degree(), 4);
        assert_eq!(sph.maximum_order(), 3);

        assert!(matches!(
            SphericalHarmonicsGravityField::new(EARTH_GM, 1.0, cosine, DMatrix::zeros(2, 2), "x", None),
            Err(GravityError::CoefficientShape { .. })
        ));
    }

    #[test]
    fn from_parsed_file() {
        let data = "6378.1363, 398600.4415, 0.0, 2, 2, 1, 0.0, 0.0\n\
                    2, 0, -4.84165371736E-04, 0.0\n\
                    2, 1, -1.86987635955E-10, 1.19528012031E-09\n\
                    2, 2, 2.43914352398E-06, -1.40016683654E-06\n";
        let coefficients =
            parse_coefficients(data, PotentialFileFormat::Shadr, 2, 2, "inline").unwrap();
        let field = SphericalHarmonicsGravityField::from_coefficients(coefficients, "IAU_Earth", "inline")
            .unwrap();
        assert!((field.reference_radius() - 6_378_136.3).abs() < 1e-6);
        assert!((field.gravitational_parameter() - 398_600.4415e9).abs() < 1.0);
        assert_eq!(field.maximum_degree(), 2);
        assert!((field.sine_coefficients()[(2, 2)] + 1.40016683654e-6).abs() < 1e-18);

        let egm = parse_coefficients("2 0 -0.484165371736D-03 0.0\n", PotentialFileFormat::Egm, 2, 2, "egm")
            .unwrap();
        assert!(matches!(
            SphericalHarmonicsGravityField::from_coefficients(egm, "IAU_Earth", "egm"),
            Err(GravityError::MissingFileConstant { .. })
        ));
    }
}
