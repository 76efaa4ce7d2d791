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

use super::EphemerisError;
use crate::linalg::{Matrix3, Vector3, Vector6};
use crate::utils::{r1, r3, tilde_matrix};
use parking_lot::RwLock;
use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::sync::Arc;

/// Orientation of a body-fixed (target) frame with respect to a base frame as a function of time.
///
/// The rotation "to base frame" converts a vector expressed in the target frame into the base frame.
pub trait RotationalEphemeris: Send + Sync + fmt::Debug {
    fn base_frame_orientation(&self) -> &str;

    fn target_frame_orientation(&self) -> &str;

    fn rotation_to_base_frame(&self, seconds_since_epoch: f64) -> Result<Matrix3<f64>, EphemerisError>;

    fn derivative_of_rotation_to_base_frame(
        &self,
        seconds_since_epoch: f64,
    ) -> Result<Matrix3<f64>, EphemerisError>;

    fn rotation_to_target_frame(&self, seconds_since_epoch: f64) -> Result<Matrix3<f64>, EphemerisError> {
        Ok(self.rotation_to_base_frame(seconds_since_epoch)?.transpose())
    }

    fn derivative_of_rotation_to_target_frame(
        &self,
        seconds_since_epoch: f64,
    ) -> Result<Matrix3<f64>, EphemerisError> {
        Ok(self
            .derivative_of_rotation_to_base_frame(seconds_since_epoch)?
            .transpose())
    }

    /// Angular velocity of the target frame w.r.t. the base frame, expressed in the base frame, in rad/s
    fn rotational_velocity_vector_in_base_frame(
        &self,
        seconds_since_epoch: f64,
    ) -> Result<Vector3<f64>, EphemerisError> {
        let rotation = self.rotation_to_base_frame(seconds_since_epoch)?;
        let derivative = self.derivative_of_rotation_to_base_frame(seconds_since_epoch)?;
        let w = derivative * rotation.transpose();
        Ok(Vector3::new(w[(2, 1)], w[(0, 2)], w[(1, 0)]))
    }

    /// Angular velocity of the target frame w.r.t. the base frame, expressed in the target frame, in rad/s
    fn rotational_velocity_vector_in_target_frame(
        &self,
        seconds_since_epoch: f64,
    ) -> Result<Vector3<f64>, EphemerisError> {
        Ok(self.rotation_to_target_frame(seconds_since_epoch)?
            * self.rotational_velocity_vector_in_base_frame(seconds_since_epoch)?)
    }
}

/// Rotation about the body-fixed Z axis at a constant rate.
#[derive(Clone, Debug, PartialEq)]
pub struct SimpleRotationalEphemeris {
    initial_rotation_to_base_frame: Matrix3<f64>,
    initial_angle: f64,
    rotation_rate: f64,
    initial_time: f64,
    base_frame_orientation: String,
    target_frame_orientation: String,
}

impl SimpleRotationalEphemeris {
    /// Initializes from the orientation of the pole frame w.r.t. the base frame, the rotation angle about the pole at
    /// the initial time, and the rotation rate in rad/s.
    pub fn new(
        initial_rotation_to_base_frame: Matrix3<f64>,
        initial_angle: f64,
        rotation_rate: f64,
        initial_time: f64,
        base_frame_orientation: &str,
        target_frame_orientation: &str,
    ) -> Self {
        Self {
            initial_rotation_to_base_frame,
            initial_angle,
            rotation_rate,
            initial_time,
            base_frame_orientation: base_frame_orientation.to_string(),
            target_frame_orientation: target_frame_orientation.to_string(),
        }
    }

    /// Initializes from the right ascension and declination of the pole and the prime meridian angle at the initial time,
    /// all in radians.
    pub fn from_pole(
        right_ascension: f64,
        declination: f64,
        prime_meridian: f64,
        rotation_rate: f64,
        initial_time: f64,
        base_frame_orientation: &str,
        target_frame_orientation: &str,
    ) -> Self {
        let pole = r3(right_ascension + FRAC_PI_2).transpose() * r1(FRAC_PI_2 - declination).transpose();
        Self::new(
            pole,
            prime_meridian,
            rotation_rate,
            initial_time,
            base_frame_orientation,
            target_frame_orientation,
        )
    }

    pub fn rotation_rate(&self) -> f64 {
        self.rotation_rate
    }

    pub fn initial_time(&self) -> f64 {
        self.initial_time
    }

    fn angle(&self, seconds_since_epoch: f64) -> f64 {
        self.initial_angle + self.rotation_rate * (seconds_since_epoch - self.initial_time)
    }
}

impl RotationalEphemeris for SimpleRotationalEphemeris {
    fn base_frame_orientation(&self) -> &str {
        &self.base_frame_orientation
    }

    fn target_frame_orientation(&self) -> &str {
        &self.target_frame_orientation
    }

    fn rotation_to_base_frame(&self, seconds_since_epoch: f64) -> Result<Matrix3<f64>, EphemerisError> {
        Ok(self.initial_rotation_to_base_frame * r3(self.angle(seconds_since_epoch)).transpose())
    }

    fn derivative_of_rotation_to_base_frame(
        &self,
        seconds_since_epoch: f64,
    ) -> Result<Matrix3<f64>, EphemerisError> {
        let (s, c) = self.angle(seconds_since_epoch).sin_cos();
        let d_r3t = Matrix3::new(-s, -c, 0.0, c, -s, 0.0, 0.0, 0.0, 0.0);
        Ok(self.initial_rotation_to_base_frame * d_r3t * self.rotation_rate)
    }
}

/// Computes the libration angle of a tidally locked body about its rotation axis.
pub trait LongitudeLibrationCalculator: Send + Sync + fmt::Debug {
    /// Libration angle in radians from the state of the body w.r.t. its central body.
    fn libration_angle(
        &self,
        relative_state: &Vector6<f64>,
        central_body_gravitational_parameter: f64,
        seconds_since_epoch: f64,
    ) -> f64;
}

/// Libration directly forced by the eccentricity of the orbit: the angle is the scaled amplitude times the sine of
/// the true anomaly.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DirectLongitudeLibrationCalculator {
    pub scaled_libration_amplitude: f64,
}

impl DirectLongitudeLibrationCalculator {
    pub fn new(scaled_libration_amplitude: f64) -> Self {
        Self {
            scaled_libration_amplitude,
        }
    }
}

impl LongitudeLibrationCalculator for DirectLongitudeLibrationCalculator {
    fn libration_angle(
        &self,
        relative_state: &Vector6<f64>,
        central_body_gravitational_parameter: f64,
        _seconds_since_epoch: f64,
    ) -> f64 {
        self.scaled_libration_amplitude
            * true_anomaly(relative_state, central_body_gravitational_parameter).sin()
    }
}

/// True anomaly in radians, zero for circular orbits.
fn true_anomaly(state: &Vector6<f64>, gm: f64) -> f64 {
    let r = state.fixed_rows::<3>(0).into_owned();
    let v = state.fixed_rows::<3>(3).into_owned();
    let rmag = r.norm();
    let e_vec = ((v.norm_squared() - gm / rmag) * r - r.dot(&v) * v) / gm;
    let ecc = e_vec.norm();
    if ecc < 1e-12 {
        return 0.0;
    }
    let cos_nu = (e_vec.dot(&r) / (ecc * rmag)).clamp(-1.0, 1.0);
    if r.dot(&v) < 0.0 {
        -cos_nu.acos()
    } else {
        cos_nu.acos()
    }
}

pub type RelativeStateFunction =
    Arc<dyn Fn(f64) -> Result<Vector6<f64>, EphemerisError> + Send + Sync>;

/// Tidally locked rotation: the body-fixed X axis points to the central body and the Z axis along the orbital angular
/// momentum, optionally rotated about Z by a libration angle.
///
/// The rotation derivative follows the orbital motion only; the libration rate is not included.
pub struct SynchronousRotationalEphemeris {
    relative_state_function: RelativeStateFunction,
    central_body_gravitational_parameter: f64,
    central_body_name: String,
    base_frame_orientation: String,
    target_frame_orientation: String,
    libration_calculator: RwLock<Option<Arc<dyn LongitudeLibrationCalculator>>>,
}

impl SynchronousRotationalEphemeris {
    pub fn new(
        relative_state_function: RelativeStateFunction,
        central_body_gravitational_parameter: f64,
        central_body_name: &str,
        base_frame_orientation: &str,
        target_frame_orientation: &str,
    ) -> Self {
        Self {
            relative_state_function,
            central_body_gravitational_parameter,
            central_body_name: central_body_name.to_string(),
            base_frame_orientation: base_frame_orientation.to_string(),
            target_frame_orientation: target_frame_orientation.to_string(),
            libration_calculator: RwLock::new(None),
        }
    }

    pub fn central_body_name(&self) -> &str {
        &self.central_body_name
    }

    pub fn libration_calculator(&self) -> Option<Arc<dyn LongitudeLibrationCalculator>> {
        self.libration_calculator.read().clone()
    }

    pub fn set_libration_calculator(&self, calculator: Option<Arc<dyn LongitudeLibrationCalculator>>) {
        *self.libration_calculator.write() = calculator;
    }

    /// Rotation to base frame and the angular velocity of the frame, in the base frame
    fn frame(&self, seconds_since_epoch: f64) -> Result<(Matrix3<f64>, Vector3<f64>), EphemerisError> {
        let state = (self.relative_state_function)(seconds_since_epoch)?;
        let r = state.fixed_rows::<3>(0).into_owned();
        let v = state.fixed_rows::<3>(3).into_owned();

        let h = r.cross(&v);
        let x = -r.normalize();
        let z = h.normalize();
        let y = z.cross(&x);
        let mut rotation = Matrix3::from_columns(&[x, y, z]);

        if let Some(calculator) = &*self.libration_calculator.read() {
            let angle = calculator.libration_angle(
                &state,
                self.central_body_gravitational_parameter,
                seconds_since_epoch,
            );
            rotation *= r3(angle).transpose();
        }

        Ok((rotation, h / r.norm_squared()))
    }
}

impl RotationalEphemeris for SynchronousRotationalEphemeris {
    fn base_frame_orientation(&self) -> &str {
        &self.base_frame_orientation
    }

    fn target_frame_orientation(&self) -> &str {
        &self.target_frame_orientation
    }

    fn rotation_to_base_frame(&self, seconds_since_epoch: f64) -> Result<Matrix3<f64>, EphemerisError> {
        Ok(self.frame(seconds_since_epoch)?.0)
    }

    fn derivative_of_rotation_to_base_frame(
        &self,
        seconds_since_epoch: f64,
    ) -> Result<Matrix3<f64>, EphemerisError> {
        let (rotation, omega) = self.frame(seconds_since_epoch)?;
        Ok(tilde_matrix(&omega) * rotation)
    }
}

impl fmt::Debug for SynchronousRotationalEphemeris {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SynchronousRotationalEphemeris")
            .field("central_body_name", &self.central_body_name)
            .field(
                "central_body_gravitational_parameter",
                &self.central_body_gravitational_parameter,
            )
            .field("base_frame_orientation", &self.base_frame_orientation)
            .field("target_frame_orientation", &self.target_frame_orientation)
            .field("libration_calculator", &*self.libration_calculator.read())
            .finish()
    }
}

/// Converts a state from the body-fixed frame of a rotational ephemeris into its base frame orientation, accounting
/// for the rotation of the frame.
pub fn transform_to_inertial_orientation(
    state_in_body_fixed_frame: &Vector6<f64>,
    current_time: f64,
    rotational_ephemeris: &dyn RotationalEphemeris,
) -> Result<Vector6<f64>, EphemerisError> {
    let rotation = rotational_ephemeris.rotation_to_base_frame(current_time)?;
    let derivative = rotational_ephemeris.derivative_of_rotation_to_base_frame(current_time)?;
    let r = state_in_body_fixed_frame.fixed_rows::<3>(0);
    let v = state_in_body_fixed_frame.fixed_rows::<3>(3);

    let mut state = Vector6::zeros();
    state.fixed_rows_mut::<3>(0).copy_from(&(rotation * r));
    state
        .fixed_rows_mut::<3>(3)
        .copy_from(&(rotation * v + derivative * r));
    Ok(state)
}
