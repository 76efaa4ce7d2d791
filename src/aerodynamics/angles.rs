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

use super::{AeroError, AnglesNotUpdatedSnafu, UndefinedAngleSnafu};
use crate::linalg::{Matrix3, Vector6};
use crate::utils::{r1, r2, r3};
use enum_iterator::Sequence;
use serde_derive::{Deserialize, Serialize};
use snafu::prelude::*;
use std::f64::consts::FRAC_PI_2;
use std::fmt;
use std::sync::Arc;
use typed_builder::TypedBuilder;

/// Frames used in aerodynamic computations, ordered along the chain of elementary rotations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Sequence)]
#[serde(rename_all = "snake_case")]
pub enum AerodynamicsReferenceFrames {
    InertialFrame = 0,
    CorotatingFrame = 1,
    VerticalFrame = 2,
    TrajectoryFrame = 3,
    AerodynamicFrame = 4,
    BodyFrame = 5,
}

impl AerodynamicsReferenceFrames {
    pub fn exposed_name(&self) -> &'static str {
        match self {
            Self::InertialFrame => "inertial_frame",
            Self::CorotatingFrame => "corotating_frame",
            Self::VerticalFrame => "vertical_frame",
            Self::TrajectoryFrame => "trajectory_frame",
            Self::AerodynamicFrame => "aerodynamic_frame",
            Self::BodyFrame => "body_frame",
        }
    }
}

/// Angles which define the rotations between the aerodynamic frames.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Sequence)]
#[serde(rename_all = "snake_case")]
pub enum AerodynamicsReferenceFrameAngles {
    LatitudeAngle,
    LongitudeAngle,
    HeadingAngle,
    FlightPathAngle,
    AngleOfAttack,
    AngleOfSideslip,
    BankAngle,
}

impl AerodynamicsReferenceFrameAngles {
    pub fn exposed_name(&self) -> &'static str {
        match self {
            Self::LatitudeAngle => "latitude_angle",
            Self::LongitudeAngle => "longitude_angle",
            Self::HeadingAngle => "heading_angle",
            Self::FlightPathAngle => "flight_path_angle",
            Self::AngleOfAttack => "angle_of_attack",
            Self::AngleOfSideslip => "angle_of_sideslip",
            Self::BankAngle => "bank_angle",
        }
    }
}

pub type AngleFunction = Arc<dyn Fn() -> f64 + Send + Sync>;
pub type AngleUpdateFunction = Arc<dyn Fn(f64) + Send + Sync>;

/// Constant body orientation angles, in radians. A NaN angle is left unchanged when applied.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, TypedBuilder)]
pub struct BodyOrientationAngles {
    #[builder(default = f64::NAN)]
    pub angle_of_attack: f64,
    #[builder(default = f64::NAN)]
    pub angle_of_sideslip: f64,
    #[builder(default = f64::NAN)]
    pub bank_angle: f64,
}

impl Default for BodyOrientationAngles {
    fn default() -> Self {
        Self {
            angle_of_attack: f64::NAN,
            angle_of_sideslip: f64::NAN,
            bank_angle: f64::NAN,
        }
    }
}

/// Computes the aerodynamic angles of a body with respect to its central body, and the rotations between the
/// aerodynamic frames.
///
/// Latitude and longitude are geocentric, the vertical frame is north-east-down, and the trajectory frame has its
/// X axis along the body-fixed (airspeed) velocity.
#[derive(Clone, Default)]
pub struct AerodynamicAngleCalculator {
    angle_of_attack_function: Option<AngleFunction>,
    angle_of_sideslip_function: Option<AngleFunction>,
    bank_angle_function: Option<AngleFunction>,
    angle_update_function: Option<AngleUpdateFunction>,
    current_time: Option<f64>,
    body_fixed_to_inertial: Matrix3<f64>,
    latitude: f64,
    longitude: f64,
    heading: f64,
    flight_path: f64,
    angle_of_attack: f64,
    angle_of_sideslip: f64,
    bank_angle: f64,
}

impl AerodynamicAngleCalculator {
    pub fn new() -> Self {
        Self {
            body_fixed_to_inertial: Matrix3::identity(),
            angle_of_attack: f64::NAN,
            angle_of_sideslip: f64::NAN,
            bank_angle: f64::NAN,
            ..Default::default()
        }
    }

    /// Sets the functions returning the body orientation angles. Only the provided functions replace the existing ones.
    /// The update function is called with the current time before the angle functions are evaluated.
    pub fn set_body_orientation_angle_functions(
        &mut self,
        angle_of_attack_function: Option<AngleFunction>,
        angle_of_sideslip_function: Option<AngleFunction>,
        bank_angle_function: Option<AngleFunction>,
        angle_update_function: Option<AngleUpdateFunction>,
    ) {
        if angle_of_attack_function.is_some() {
            self.angle_of_attack_function = angle_of_attack_function;
        }
        if angle_of_sideslip_function.is_some() {
            self.angle_of_sideslip_function = angle_of_sideslip_function;
        }
        if bank_angle_function.is_some() {
            self.bank_angle_function = bank_angle_function;
        }
        if angle_update_function.is_some() {
            self.angle_update_function = angle_update_function;
        }
    }

    /// Sets constant body orientation angles, ignoring the NaN ones.
    pub fn set_body_orientation_angles(&mut self, angles: BodyOrientationAngles) {
        let constant = |angle: f64| -> Option<AngleFunction> {
            if angle.is_nan() {
                None
            } else {
                Some(Arc::new(move || angle))
            }
        };
        self.set_body_orientation_angle_functions(
            constant(angles.angle_of_attack),
            constant(angles.angle_of_sideslip),
            constant(angles.bank_angle),
            None,
        );
    }

    /// Updates all the angles from the body-centered body-fixed state and the current rotation from the body-fixed
    /// frame of the central body to the inertial frame.
    pub fn update(
        &mut self,
        time: f64,
        body_fixed_state: &Vector6<f64>,
        body_fixed_to_inertial: Matrix3<f64>,
    ) {
        let position = body_fixed_state.fixed_rows::<3>(0);
        let velocity = body_fixed_state.fixed_rows::<3>(3);
        let radius = position.norm();

        self.latitude = if radius > 0.0 {
            (position[2] / radius).asin()
        } else {
            0.0
        };
        self.longitude = position[1].atan2(position[0]);

        let vertical_velocity = self.corotating_to_vertical() * velocity;
        let speed = vertical_velocity.norm();
        self.heading = vertical_velocity[1].atan2(vertical_velocity[0]);
        self.flight_path = if speed > 0.0 {
            -(vertical_velocity[2] / speed).asin()
        } else {
            0.0
        };

        self.body_fixed_to_inertial = body_fixed_to_inertial;
        self.current_time = Some(time);

        if let Some(update) = &self.angle_update_function {
            update(time);
        }
        if let Some(aoa) = &self.angle_of_attack_function {
            self.angle_of_attack = aoa();
        }
        if let Some(sideslip) = &self.angle_of_sideslip_function {
            self.angle_of_sideslip = sideslip();
        }
        if let Some(bank) = &self.bank_angle_function {
            self.bank_angle = bank();
        }
    }

    /// Time of the last update, if any
    pub fn current_time(&self) -> Option<f64> {
        self.current_time
    }

    /// Returns the requested angle in radians as of the last update. Orientation angles which were never set are NaN.
    pub fn get_angle(&self, angle_type: AerodynamicsReferenceFrameAngles) -> Result<f64, AeroError> {
        ensure!(self.current_time.is_some(), AnglesNotUpdatedSnafu);
        Ok(self.angle(angle_type))
    }

    /// Returns the rotation matrix which converts a vector from the original frame to the target frame.
    pub fn get_rotation_matrix_between_frames(
        &self,
        original_frame: AerodynamicsReferenceFrames,
        target_frame: AerodynamicsReferenceFrames,
    ) -> Result<Matrix3<f64>, AeroError> {
        ensure!(self.current_time.is_some(), AnglesNotUpdatedSnafu);

        if original_frame == target_frame {
            Ok(Matrix3::identity())
        } else if original_frame < target_frame {
            self.forward_rotation(original_frame, target_frame)
        } else {
            Ok(self
                .forward_rotation(target_frame, original_frame)?
                .transpose())
        }
    }

    fn angle(&self, angle_type: AerodynamicsReferenceFrameAngles) -> f64 {
        match angle_type {
            AerodynamicsReferenceFrameAngles::LatitudeAngle => self.latitude,
            AerodynamicsReferenceFrameAngles::LongitudeAngle => self.longitude,
            AerodynamicsReferenceFrameAngles::HeadingAngle => self.heading,
            AerodynamicsReferenceFrameAngles::FlightPathAngle => self.flight_path,
            AerodynamicsReferenceFrameAngles::AngleOfAttack => self.angle_of_attack,
            AerodynamicsReferenceFrameAngles::AngleOfSideslip => self.angle_of_sideslip,
            AerodynamicsReferenceFrameAngles::BankAngle => self.bank_angle,
        }
    }

    fn defined_angle(&self, angle: AerodynamicsReferenceFrameAngles) -> Result<f64, AeroError> {
        let value = self.angle(angle);
        ensure!(!value.is_nan(), UndefinedAngleSnafu { angle });
        Ok(value)
    }

    fn corotating_to_vertical(&self) -> Matrix3<f64> {
        r2(-self.latitude - FRAC_PI_2) * r3(self.longitude)
    }

    /// Rotation from the provided frame to the next one along the chain.
    fn rotation_to_next_frame(
        &self,
        frame: AerodynamicsReferenceFrames,
    ) -> Result<Matrix3<f64>, AeroError> {
        use AerodynamicsReferenceFrameAngles::*;
        match frame {
            AerodynamicsReferenceFrames::InertialFrame => Ok(self.body_fixed_to_inertial.transpose()),
            AerodynamicsReferenceFrames::CorotatingFrame => Ok(self.corotating_to_vertical()),
            AerodynamicsReferenceFrames::VerticalFrame => {
                Ok(r2(self.flight_path) * r3(self.heading))
            }
            AerodynamicsReferenceFrames::TrajectoryFrame => Ok(r1(self.defined_angle(BankAngle)?)),
            AerodynamicsReferenceFrames::AerodynamicFrame => Ok(r2(
                self.defined_angle(AngleOfAttack)?,
            ) * r3(-self.defined_angle(AngleOfSideslip)?)),
            AerodynamicsReferenceFrames::BodyFrame => Ok(Matrix3::identity()),
        }
    }

    fn forward_rotation(
        &self,
        from: AerodynamicsReferenceFrames,
        to: AerodynamicsReferenceFrames,
    ) -> Result<Matrix3<f64>, AeroError> {
        let mut rotation = Matrix3::identity();
        for frame in enum_iterator::all::<AerodynamicsReferenceFrames>()
            .filter(|frame| *frame >= from && *frame < to)
        {
            rotation = self.rotation_to_next_frame(frame)? * rotation;
        }
        Ok(rotation)
    }
}

impl fmt::Debug for AerodynamicAngleCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AerodynamicAngleCalculator")
            .field("current_time", &self.current_time)
            .field("latitude", &self.latitude)
            .field("longitude", &self.longitude)
            .field("heading", &self.heading)
            .field("flight_path", &self.flight_path)
            .field("angle_of_attack", &self.angle_of_attack)
            .field("angle_of_sideslip", &self.angle_of_sideslip)
            .field("bank_angle", &self.bank_angle)
            .finish()
    }
}
