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
    AtmosphereModel, BodyEphemerisSnafu, BodyError, BodyFlightConditionsSnafu,
    BodyGravityFieldSnafu, BodyShapeModel, MissingModelSnafu,
};
use crate::aerodynamics::{
    AerodynamicCoefficientInterface, AtmosphericBodyFlightConditions, BodyFlightConditions,
    FlightConditionsModel,
};
use crate::ephemerides::{Ephemeris, RotationalEphemeris};
use crate::gravitation::GravityFieldModel;
use crate::linalg::{Matrix3, Vector3, Vector6};
use snafu::prelude::*;
use std::sync::Arc;

/// A body of the environment: its current translational and rotational state, and the models which describe it.
///
/// States are expressed in the global frame of the system of bodies. Models are shared, so the same ephemeris or
/// gravity field may be held by several bodies.
#[derive(Clone, Debug)]
pub struct Body {
    name: String,
    process_body: i32,
    current_time: f64,
    current_state: Vector6<f64>,
    rotation_to_global: Matrix3<f64>,
    rotation_to_global_derivative: Matrix3<f64>,
    angular_velocity_in_global: Vector3<f64>,
    mass: f64,
    inertia_tensor: Matrix3<f64>,
    ephemeris_frame_to_base_frame: Option<Arc<dyn Ephemeris>>,
    ephemeris: Option<Arc<dyn Ephemeris>>,
    atmosphere_model: Option<Arc<dyn AtmosphereModel>>,
    shape_model: Option<Arc<dyn BodyShapeModel>>,
    gravity_field_model: Option<Arc<dyn GravityFieldModel>>,
    aerodynamic_coefficient_interface: Option<Arc<dyn AerodynamicCoefficientInterface>>,
    flight_conditions: Option<FlightConditionsModel>,
    rotation_model: Option<Arc<dyn RotationalEphemeris>>,
}

impl Body {
    /// Creates a body without any model, at rest at the origin and aligned with the global frame.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            process_body: 1,
            current_time: f64::NAN,
            current_state: Vector6::zeros(),
            rotation_to_global: Matrix3::identity(),
            rotation_to_global_derivative: Matrix3::zeros(),
            angular_velocity_in_global: Vector3::zeros(),
            mass: f64::NAN,
            inertia_tensor: Matrix3::zeros(),
            ephemeris_frame_to_base_frame: None,
            ephemeris: None,
            atmosphere_model: None,
            shape_model: None,
            gravity_field_model: None,
            aerodynamic_coefficient_interface: None,
            flight_conditions: None,
            rotation_model: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Flag passed through when the body was created or added, not interpreted by the environment
    pub fn process_body(&self) -> i32 {
        self.process_body
    }

    pub(crate) fn set_process_body(&mut self, process_body: i32) {
        self.process_body = process_body;
    }

    /// Time of the last state update, NaN if the state was never set
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn state(&self) -> Vector6<f64> {
        self.current_state
    }

    pub fn position(&self) -> Vector3<f64> {
        self.current_state.fixed_rows::<3>(0).into_owned()
    }

    pub fn velocity(&self) -> Vector3<f64> {
        self.current_state.fixed_rows::<3>(3).into_owned()
    }

    pub fn set_state(&mut self, state: Vector6<f64>, time: f64) {
        self.current_state = state;
        self.current_time = time;
    }

    pub fn inertial_to_body_fixed_frame(&self) -> Matrix3<f64> {
        self.rotation_to_global.transpose()
    }

    pub fn body_fixed_to_inertial_frame(&self) -> Matrix3<f64> {
        self.rotation_to_global
    }

    pub fn inertial_to_body_fixed_frame_derivative(&self) -> Matrix3<f64> {
        self.rotation_to_global_derivative.transpose()
    }

    pub fn body_fixed_to_inertial_frame_derivative(&self) -> Matrix3<f64> {
        self.rotation_to_global_derivative
    }

    pub fn inertial_angular_velocity(&self) -> Vector3<f64> {
        self.angular_velocity_in_global
    }

    pub fn body_fixed_angular_velocity(&self) -> Vector3<f64> {
        self.rotation_to_global.transpose() * self.angular_velocity_in_global
    }

    /// Mass in kg, NaN until set
    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
    }

    /// Inertia tensor in kg m^2
    pub fn inertia_tensor(&self) -> Matrix3<f64> {
        self.inertia_tensor
    }

    pub fn set_inertia_tensor(&mut self, inertia_tensor: Matrix3<f64>) {
        self.inertia_tensor = inertia_tensor;
    }

    /// State of the ephemeris origin in the global frame, if the ephemeris is not expressed w.r.t. the global origin
    pub fn ephemeris_frame_to_base_frame(&self) -> Option<Arc<dyn Ephemeris>> {
        self.ephemeris_frame_to_base_frame.clone()
    }

    pub fn set_ephemeris_frame_to_base_frame(&mut self, frame: Option<Arc<dyn Ephemeris>>) {
        self.ephemeris_frame_to_base_frame = frame;
    }

    pub fn ephemeris(&self) -> Option<Arc<dyn Ephemeris>> {
        self.ephemeris.clone()
    }

    pub fn set_ephemeris(&mut self, ephemeris: Option<Arc<dyn Ephemeris>>) {
        self.ephemeris = ephemeris;
    }

    pub fn atmosphere_model(&self) -> Option<Arc<dyn AtmosphereModel>> {
        self.atmosphere_model.clone()
    }

    pub fn set_atmosphere_model(&mut self, atmosphere_model: Option<Arc<dyn AtmosphereModel>>) {
        self.atmosphere_model = atmosphere_model;
    }

    pub fn shape_model(&self) -> Option<Arc<dyn BodyShapeModel>> {
        self.shape_model.clone()
    }

    pub fn set_shape_model(&mut self, shape_model: Option<Arc<dyn BodyShapeModel>>) {
        self.shape_model = shape_model;
    }

    pub fn gravity_field_model(&self) -> Option<Arc<dyn GravityFieldModel>> {
        self.gravity_field_model.clone()
    }

    pub fn set_gravity_field_model(&mut self, gravity_field_model: Option<Arc<dyn GravityFieldModel>>) {
        self.gravity_field_model = gravity_field_model;
    }

    pub fn aerodynamic_coefficient_interface(&self) -> Option<Arc<dyn AerodynamicCoefficientInterface>> {
        self.aerodynamic_coefficient_interface.clone()
    }

    pub fn set_aerodynamic_coefficient_interface(
        &mut self,
        interface: Option<Arc<dyn AerodynamicCoefficientInterface>>,
    ) {
        self.aerodynamic_coefficient_interface = interface;
    }

    pub fn flight_conditions(&self) -> Option<&FlightConditionsModel> {
        self.flight_conditions.as_ref()
    }

    pub fn flight_conditions_mut(&mut self) -> Option<&mut FlightConditionsModel> {
        self.flight_conditions.as_mut()
    }

    pub fn set_flight_conditions(&mut self, flight_conditions: Option<FlightConditionsModel>) {
        self.flight_conditions = flight_conditions;
    }

    pub fn rotation_model(&self) -> Option<Arc<dyn RotationalEphemeris>> {
        self.rotation_model.clone()
    }

    pub fn set_rotation_model(&mut self, rotation_model: Option<Arc<dyn RotationalEphemeris>>) {
        self.rotation_model = rotation_model;
    }

    /// Gravitational parameter of the gravity field model, in m^3/s^2
    pub fn gravitational_parameter(&self) -> Result<f64, BodyError> {
        Ok(self
            .gravity_field_model
            .as_ref()
            .context(MissingModelSnafu {
                body: &self.name,
                model: "gravity field model",
            })?
            .gravitational_parameter())
    }

    /// Resets the gravitational parameter of the gravity field model.
    pub fn reset_gravitational_parameter(&self, gravitational_parameter: f64) -> Result<(), BodyError> {
        self.gravity_field_model
            .as_ref()
            .context(MissingModelSnafu {
                body: &self.name,
                model: "gravity field model",
            })?
            .reset_gravitational_parameter(gravitational_parameter)
            .context(BodyGravityFieldSnafu { body: &self.name })
    }

    /// State from the ephemeris, shifted to the global frame origin if the ephemeris frame is not centered on it.
    pub fn state_in_base_frame_from_ephemeris(&self, time: f64) -> Result<Vector6<f64>, BodyError> {
        let ephemeris = self.ephemeris.as_ref().context(MissingModelSnafu {
            body: &self.name,
            model: "ephemeris",
        })?;
        let mut state = ephemeris
            .cartesian_state(time)
            .context(BodyEphemerisSnafu { body: &self.name })?;
        if let Some(frame) = &self.ephemeris_frame_to_base_frame {
            state += frame
                .cartesian_state(time)
                .context(BodyEphemerisSnafu { body: &self.name })?;
        }
        Ok(state)
    }

    pub fn set_state_from_ephemeris(&mut self, time: f64) -> Result<(), BodyError> {
        let state = self.state_in_base_frame_from_ephemeris(time)?;
        self.set_state(state, time);
        Ok(())
    }

    /// Sets the current rotation, its derivative and the angular velocity from the rotation model.
    pub fn set_current_rotational_state_from_model(&mut self, time: f64) -> Result<(), BodyError> {
        let model = self.rotation_model.as_ref().context(MissingModelSnafu {
            body: &self.name,
            model: "rotation model",
        })?;
        let rotation = model
            .rotation_to_base_frame(time)
            .context(BodyEphemerisSnafu { body: &self.name })?;
        let derivative = model
            .derivative_of_rotation_to_base_frame(time)
            .context(BodyEphemerisSnafu { body: &self.name })?;
        let omega = model
            .rotational_velocity_vector_in_base_frame(time)
            .context(BodyEphemerisSnafu { body: &self.name })?;
        self.rotation_to_global = rotation;
        self.rotation_to_global_derivative = derivative;
        self.angular_velocity_in_global = omega;
        Ok(())
    }

    /// Sets the flight conditions w.r.t. the central body: atmospheric if the central body has an atmosphere and this
    /// body has aerodynamic coefficients, shape-only otherwise.
    pub fn create_flight_conditions(&mut self, central_body: &Body) -> Result<(), BodyError> {
        let shape_model = central_body.shape_model().context(MissingModelSnafu {
            body: central_body.name(),
            model: "shape model",
        })?;
        let central_name = central_body.name().to_string();
        let conditions: FlightConditionsModel = match (
            central_body.atmosphere_model(),
            self.aerodynamic_coefficient_interface(),
        ) {
            (Some(atmosphere), Some(coefficients)) => AtmosphericBodyFlightConditions::new(
                central_name,
                shape_model,
                atmosphere,
                coefficients,
            )
            .into(),
            _ => BodyFlightConditions::new(central_name, shape_model).into(),
        };
        debug!("{} flight conditions created: {conditions:?}", self.name);
        self.flight_conditions = Some(conditions);
        Ok(())
    }

    /// Updates the flight conditions from the current states of this body and of the central body.
    pub fn update_flight_conditions(&mut self, time: f64, central_body: &Body) -> Result<(), BodyError> {
        let conditions = self.flight_conditions.as_mut().context(MissingModelSnafu {
            body: &self.name,
            model: "flight conditions",
        })?;

        let relative = self.current_state - central_body.current_state;
        let r = relative.fixed_rows::<3>(0);
        let v = relative.fixed_rows::<3>(3);
        let rotation = central_body.rotation_to_global;
        let derivative = central_body.rotation_to_global_derivative;

        let mut body_fixed_state = Vector6::zeros();
        body_fixed_state
            .fixed_rows_mut::<3>(0)
            .copy_from(&(rotation.transpose() * r));
        body_fixed_state
            .fixed_rows_mut::<3>(3)
            .copy_from(&(rotation.transpose() * v + derivative.transpose() * r));

        conditions
            .update_conditions(time, body_fixed_state, rotation)
            .context(BodyFlightConditionsSnafu { body: &self.name })
    }
}

#[cfg(test)]
mod ut_body {
    use super::*;
    use crate::aerodynamics::{
        AtmosphericFlightConditions, ConstantAerodynamicCoefficientInterface, FlightConditions,
    };
    use crate::bodies::{ExponentialAtmosphere, SphericalBodyShapeModel};
    use crate::ephemerides::{ConstantEphemeris, ConstantEphemerisConfig, SimpleRotationalEphemeris};
    use crate::gravitation::PointMassGravityField;

    const EARTH_GM: f64 = 3.986004418e14;
    const EARTH_RATE: f64 = 7.292115e-5;
    const RADIUS_M: f64 = 6_378_137.0;

    fn earth() -> Body {
        let mut earth = Body::new("Earth");
        earth.set_gravity_field_model(Some(Arc::new(PointMassGravityField::new(EARTH_GM, None).unwrap())));
        earth.set_shape_model(Some(Arc::new(SphericalBodyShapeModel::new(RADIUS_M))));
        earth.set_atmosphere_model(Some(Arc::new(ExponentialAtmosphere::earth())));
        earth.set_rotation_model(Some(Arc::new(SimpleRotationalEphemeris::new(
            Matrix3::identity(),
            0.0,
            EARTH_RATE,
            0.0,
            "J2000",
            "IAU_Earth",
        ))));
        earth
    }

    #[test]
    fn missing_models() {
        let mut body = Body::new("Vehicle");
        assert!(body.mass().is_nan());
        assert!(body.current_time().is_nan());
        assert!(matches!(
            body.gravitational_parameter(),
            Err(BodyError::MissingModel { model: "gravity field model", .. })
        ));
        assert!(matches!(
            body.set_state_from_ephemeris(0.0),
            Err(BodyError::MissingModel { model: "ephemeris", .. })
        ));
        assert!(matches!(
            body.set_current_rotational_state_from_model(0.0),
            Err(BodyError::MissingModel { model: "rotation model", .. })
        ));
        assert!(matches!(
            body.update_flight_conditions(0.0, &earth()),
            Err(BodyError::MissingModel { model: "flight conditions", .. })
        ));
        assert!(body.create_flight_conditions(&Body::new("Rock")).is_err());
    }

    #[test]
    fn gravitational_parameter() {
        let earth = earth();
        assert_eq!(earth.gravitational_parameter().unwrap(), EARTH_GM);
        earth.reset_gravitational_parameter(3.9e14).unwrap();
        assert_eq!(earth.gravitational_parameter().unwrap(), 3.9e14);
        assert!(matches!(
            earth.reset_gravitational_parameter(0.0),
            Err(BodyError::BodyGravityField { .. })
        ));
    }

    #[test]
    fn ephemeris_frame_offset() {
        let mut moon = Body::new("Moon");
        moon.set_ephemeris(Some(Arc::new(ConstantEphemeris::new(
            Vector6::new(3.844e8, 0.0, 0.0, 0.0, 1.0e3, 0.0),
            ConstantEphemerisConfig::builder().reference_frame_origin("Earth").build(),
        ))));
        let earth_from_ssb: Arc<dyn Ephemeris> = Arc::new(ConstantEphemeris::new(
            Vector6::new(1.5e11, 0.0, 0.0, 0.0, 3.0e4, 0.0),
            ConstantEphemerisConfig::default(),
        ));

        assert_eq!(moon.state_in_base_frame_from_ephemeris(0.0).unwrap()[0], 3.844e8);
        moon.set_ephemeris_frame_to_base_frame(Some(earth_from_ssb));
        moon.set_state_from_ephemeris(10.0).unwrap();
        assert_eq!(moon.current_time(), 10.0);
        assert_eq!(moon.position(), Vector3::new(1.5e11 + 3.844e8, 0.0, 0.0));
        assert_eq!(moon.velocity(), Vector3::new(0.0, 3.1e4, 0.0));
    }

    #[test]
    fn rotational_state() {
        let mut earth = earth();
        let quarter = std::f64::consts::FRAC_PI_2 / EARTH_RATE;
        earth.set_current_rotational_state_from_model(quarter).unwrap();
        assert!((earth.body_fixed_to_inertial_frame() * Vector3::x() - Vector3::y()).norm() < 1e-9);
        assert!(
            (earth.inertial_to_body_fixed_frame() * earth.body_fixed_to_inertial_frame() - Matrix3::identity())
                .amax()
                < 1e-12
        );
        assert!((earth.inertial_angular_velocity() - Vector3::new(0.0, 0.0, EARTH_RATE)).norm() < 1e-15);
        assert!((earth.body_fixed_angular_velocity() - Vector3::new(0.0, 0.0, EARTH_RATE)).norm() < 1e-15);
        assert_eq!(
            earth.inertial_to_body_fixed_frame_derivative(),
            earth.body_fixed_to_inertial_frame_derivative().transpose()
        );
    }

    #[test]
    fn flight_conditions_from_states() {
        let mut earth = earth();
        earth.set_current_rotational_state_from_model(0.0).unwrap();

        let mut vehicle = Body::new("Vehicle");
        vehicle.create_flight_conditions(&earth).unwrap();
        assert!(vehicle.flight_conditions().unwrap().as_atmospheric().is_none());

        vehicle.set_aerodynamic_coefficient_interface(Some(Arc::new(
            ConstantAerodynamicCoefficientInterface::from_force_coefficients(1.0, Vector3::new(2.2, 0.0, 0.0)),
        )));
        vehicle.create_flight_conditions(&earth).unwrap();

        // Inertial velocity equal to the rotation of the atmosphere: no airspeed
        let r = RADIUS_M + 120e3;
        vehicle.set_state(Vector6::new(r, 0.0, 0.0, 0.0, r * EARTH_RATE, 0.0), 0.0);
        vehicle.update_flight_conditions(0.0, &earth).unwrap();

        let conditions = vehicle.flight_conditions().unwrap();
        assert_eq!(conditions.as_flight_conditions().central_body_name(), "Earth");
        let atmospheric = conditions.as_atmospheric().unwrap();
        assert!((atmospheric.altitude() - 120e3).abs() < 1e-6);
        assert!(atmospheric.airspeed() < 1e-9);
        assert!(atmospheric.dynamic_pressure() < 1e-12);
        assert!(atmospheric.density() > 0.0);
    }
}
