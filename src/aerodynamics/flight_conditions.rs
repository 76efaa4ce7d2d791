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
    AerodynamicAngleCalculator, AerodynamicCoefficientInterface,
    AerodynamicCoefficientsIndependentVariables, AerodynamicsReferenceFrameAngles, AeroError,
    UndefinedAngleSnafu, UnsupportedIndependentVariableSnafu,
};
use crate::bodies::{AtmosphereModel, BodyShapeModel};
use crate::linalg::{Matrix3, Vector3, Vector6};
use indexmap::IndexMap;
use snafu::ensure;
use std::fmt;
use std::sync::Arc;

/// Conditions of a body flying with respect to a central body, all as of the last update.
///
/// Before the first update, all values are NaN.
pub trait FlightConditions: Send + Sync + fmt::Debug {
    /// Name of the body w.r.t. which the conditions are computed
    fn central_body_name(&self) -> &str;

    fn aerodynamic_angle_calculator(&self) -> &AerodynamicAngleCalculator;

    fn aerodynamic_angle_calculator_mut(&mut self) -> &mut AerodynamicAngleCalculator;

    /// Time of the last update, in seconds since J2000
    fn time(&self) -> f64;

    /// State of the body in the body-fixed frame of the central body, centered on the central body
    fn body_centered_body_fixed_state(&self) -> Vector6<f64>;

    /// Altitude above the shape model of the central body, in meters
    fn altitude(&self) -> f64;

    /// Longitude in radians
    fn longitude(&self) -> f64;

    /// Geodetic latitude in radians, as defined by the shape model of the central body
    fn geodetic_latitude(&self) -> f64;

    /// Recomputes the conditions from the body-fixed state and the rotation from the central body's body-fixed frame
    /// to the inertial frame.
    fn update_conditions(
        &mut self,
        time: f64,
        body_centered_body_fixed_state: Vector6<f64>,
        body_fixed_to_inertial: Matrix3<f64>,
    ) -> Result<(), AeroError>;
}

/// Flight conditions of a body inside the atmosphere of its central body.
pub trait AtmosphericFlightConditions: FlightConditions {
    /// Local freestream density in kg/m^3
    fn density(&self) -> f64;

    /// Local freestream temperature in K
    fn temperature(&self) -> f64;

    /// Local freestream pressure in Pa
    fn pressure(&self) -> f64;

    /// Dynamic pressure (0.5 rho V^2) in Pa
    fn dynamic_pressure(&self) -> f64;

    /// Norm of the airspeed velocity in m/s
    fn airspeed(&self) -> f64;

    /// Airspeed velocity in the body-fixed frame of the central body, in m/s
    fn airspeed_velocity(&self) -> Vector3<f64>;

    fn speed_of_sound(&self) -> f64;

    fn mach_number(&self) -> f64;

    /// Independent variables of the aerodynamic coefficients, in the order of the coefficient interface
    fn aero_coefficient_independent_variables(&self) -> &[f64];

    /// Independent variables for each control surface, where the deflection replaces the control surface entry
    fn control_surface_aero_coefficient_independent_variables(&self) -> &IndexMap<String, Vec<f64>>;

    fn aerodynamic_coefficient_interface(&self) -> Arc<dyn AerodynamicCoefficientInterface>;
}

/// Flight conditions which only require the shape of the central body.
#[derive(Clone, Debug)]
pub struct BodyFlightConditions {
    central_body_name: String,
    shape_model: Arc<dyn BodyShapeModel>,
    angle_calculator: AerodynamicAngleCalculator,
    time: f64,
    state: Vector6<f64>,
    altitude: f64,
    longitude: f64,
    geodetic_latitude: f64,
}

impl BodyFlightConditions {
    pub fn new(central_body_name: String, shape_model: Arc<dyn BodyShapeModel>) -> Self {
        Self {
            central_body_name,
            shape_model,
            angle_calculator: AerodynamicAngleCalculator::new(),
            time: f64::NAN,
            state: Vector6::from_element(f64::NAN),
            altitude: f64::NAN,
            longitude: f64::NAN,
            geodetic_latitude: f64::NAN,
        }
    }

    pub fn shape_model(&self) -> Arc<dyn BodyShapeModel> {
        self.shape_model.clone()
    }
}

impl FlightConditions for BodyFlightConditions {
    fn central_body_name(&self) -> &str {
        &self.central_body_name
    }

    fn aerodynamic_angle_calculator(&self) -> &AerodynamicAngleCalculator {
        &self.angle_calculator
    }

    fn aerodynamic_angle_calculator_mut(&mut self) -> &mut AerodynamicAngleCalculator {
        &mut self.angle_calculator
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn body_centered_body_fixed_state(&self) -> Vector6<f64> {
        self.state
    }

    fn altitude(&self) -> f64 {
        self.altitude
    }

    fn longitude(&self) -> f64 {
        self.longitude
    }

    fn geodetic_latitude(&self) -> f64 {
        self.geodetic_latitude
    }

    fn update_conditions(
        &mut self,
        time: f64,
        body_centered_body_fixed_state: Vector6<f64>,
        body_fixed_to_inertial: Matrix3<f64>,
    ) -> Result<(), AeroError> {
        let position = body_centered_body_fixed_state.fixed_rows::<3>(0).into_owned();

        self.time = time;
        self.state = body_centered_body_fixed_state;
        self.altitude = self.shape_model.altitude(&position);
        self.longitude = position[1].atan2(position[0]);
        self.geodetic_latitude = self.shape_model.geodetic_latitude(&position);

        self.angle_calculator
            .update(time, &body_centered_body_fixed_state, body_fixed_to_inertial);
        Ok(())
    }
}

/// Flight conditions in an atmosphere, which also update the aerodynamic coefficients of the body.
///
/// The atmosphere is assumed to corotate with the central body, so the airspeed velocity is the
/// body-fixed velocity.
#[derive(Clone, Debug)]
pub struct AtmosphericBodyFlightConditions {
    base: BodyFlightConditions,
    atmosphere_model: Arc<dyn AtmosphereModel>,
    coefficient_interface: Arc<dyn AerodynamicCoefficientInterface>,
    density: f64,
    pressure: f64,
    temperature: f64,
    speed_of_sound: f64,
    airspeed_velocity: Vector3<f64>,
    independent_variables: Vec<f64>,
    control_surface_deflections: IndexMap<String, f64>,
    control_surface_independent_variables: IndexMap<String, Vec<f64>>,
}

impl AtmosphericBodyFlightConditions {
    pub fn new(
        central_body_name: String,
        shape_model: Arc<dyn BodyShapeModel>,
        atmosphere_model: Arc<dyn AtmosphereModel>,
        coefficient_interface: Arc<dyn AerodynamicCoefficientInterface>,
    ) -> Self {
        Self {
            base: BodyFlightConditions::new(central_body_name, shape_model),
            atmosphere_model,
            coefficient_interface,
            density: f64::NAN,
            pressure: f64::NAN,
            temperature: f64::NAN,
            speed_of_sound: f64::NAN,
            airspeed_velocity: Vector3::from_element(f64::NAN),
            independent_variables: Vec::new(),
            control_surface_deflections: IndexMap::new(),
            control_surface_independent_variables: IndexMap::new(),
        }
    }

    pub fn atmosphere_model(&self) -> Arc<dyn AtmosphereModel> {
        self.atmosphere_model.clone()
    }

    /// Sets the deflection (in radians) of a control surface, used from the next update onward.
    pub fn set_control_surface_deflection(&mut self, surface: &str, deflection: f64) {
        self.control_surface_deflections
            .insert(surface.to_string(), deflection);
    }

    fn independent_variable(
        &self,
        variable: AerodynamicCoefficientsIndependentVariables,
        deflection: Option<f64>,
    ) -> Result<f64, AeroError> {
        use AerodynamicCoefficientsIndependentVariables::*;
        let orientation_angle = |angle: AerodynamicsReferenceFrameAngles| -> Result<f64, AeroError> {
            let value = self.base.angle_calculator.get_angle(angle)?;
            ensure!(!value.is_nan(), UndefinedAngleSnafu { angle });
            Ok(value)
        };
        match (variable, deflection) {
            (MachNumberDependent, _) => Ok(self.mach_number()),
            (AngleOfAttackDependent, _) => {
                orientation_angle(AerodynamicsReferenceFrameAngles::AngleOfAttack)
            }
            (SideslipAngleDependent, _) => {
                orientation_angle(AerodynamicsReferenceFrameAngles::AngleOfSideslip)
            }
            (AltitudeDependent, _) => Ok(self.base.altitude),
            (TimeDependent, _) => Ok(self.base.time),
            (ControlSurfaceDeflectionDependent, Some(deflection)) => Ok(deflection),
            (variable, _) => UnsupportedIndependentVariableSnafu { variable }.fail(),
        }
    }
}

impl FlightConditions for AtmosphericBodyFlightConditions {
    fn central_body_name(&self) -> &str {
        self.base.central_body_name()
    }

    fn aerodynamic_angle_calculator(&self) -> &AerodynamicAngleCalculator {
        self.base.aerodynamic_angle_calculator()
    }

    fn aerodynamic_angle_calculator_mut(&mut self) -> &mut AerodynamicAngleCalculator {
        self.base.aerodynamic_angle_calculator_mut()
    }

    fn time(&self) -> f64 {
        self.base.time()
    }

    fn body_centered_body_fixed_state(&self) -> Vector6<f64> {
        self.base.body_centered_body_fixed_state()
    }

    fn altitude(&self) -> f64 {
        self.base.altitude()
    }

    fn longitude(&self) -> f64 {
        self.base.longitude()
    }

    fn geodetic_latitude(&self) -> f64 {
        self.base.geodetic_latitude()
    }

    fn update_conditions(
        &mut self,
        time: f64,
        body_centered_body_fixed_state: Vector6<f64>,
        body_fixed_to_inertial: Matrix3<f64>,
    ) -> Result<(), AeroError> {
        self.base
            .update_conditions(time, body_centered_body_fixed_state, body_fixed_to_inertial)?;

        let (altitude, longitude, latitude) = (
            self.base.altitude,
            self.base.longitude,
            self.base.geodetic_latitude,
        );
        let atmosphere = &self.atmosphere_model;
        self.density = atmosphere.density(altitude, longitude, latitude, time);
        self.pressure = atmosphere.pressure(altitude, longitude, latitude, time);
        self.temperature = atmosphere.temperature(altitude, longitude, latitude, time);
        self.speed_of_sound = atmosphere.speed_of_sound(altitude, longitude, latitude, time);
        self.airspeed_velocity = body_centered_body_fixed_state
            .fixed_rows::<3>(3)
            .into_owned();

        let names = self.coefficient_interface.independent_variable_names();
        self.independent_variables = names
            .iter()
            .map(|name| self.independent_variable(*name, None))
            .collect::<Result<Vec<f64>, AeroError>>()?;

        let mut per_surface = IndexMap::with_capacity(self.control_surface_deflections.len());
        for (surface, deflection) in &self.control_surface_deflections {
            let mut variables = names
                .iter()
                .filter(|name| {
                    **name != AerodynamicCoefficientsIndependentVariables::ControlSurfaceDeflectionDependent
                })
                .map(|name| self.independent_variable(*name, None))
                .collect::<Result<Vec<f64>, AeroError>>()?;
            variables.push(self.independent_variable(
                AerodynamicCoefficientsIndependentVariables::ControlSurfaceDeflectionDependent,
                Some(*deflection),
            )?);
            per_surface.insert(surface.clone(), variables);
        }
        self.control_surface_independent_variables = per_surface;

        self.coefficient_interface
            .update_coefficients(&self.independent_variables, time)
    }
}

impl AtmosphericFlightConditions for AtmosphericBodyFlightConditions {
    fn density(&self) -> f64 {
        self.density
    }

    fn temperature(&self) -> f64 {
        self.temperature
    }

    fn pressure(&self) -> f64 {
        self.pressure
    }

    fn dynamic_pressure(&self) -> f64 {
        0.5 * self.density * self.airspeed().powi(2)
    }

    fn airspeed(&self) -> f64 {
        self.airspeed_velocity.norm()
    }

    fn airspeed_velocity(&self) -> Vector3<f64> {
        self.airspeed_velocity
    }

    fn speed_of_sound(&self) -> f64 {
        self.speed_of_sound
    }

    fn mach_number(&self) -> f64 {
        self.airspeed() / self.speed_of_sound
    }

    fn aero_coefficient_independent_variables(&self) -> &[f64] {
        &self.independent_variables
    }

    fn control_surface_aero_coefficient_independent_variables(&self) -> &IndexMap<String, Vec<f64>> {
        &self.control_surface_independent_variables
    }

    fn aerodynamic_coefficient_interface(&self) -> Arc<dyn AerodynamicCoefficientInterface> {
        self.coefficient_interface.clone()
    }
}

/// Flight conditions held by a body, which may or may not account for an atmosphere.
#[derive(Clone, Debug)]
pub enum FlightConditionsModel {
    Body(BodyFlightConditions),
    Atmospheric(AtmosphericBodyFlightConditions),
}

impl FlightConditionsModel {
    pub fn as_flight_conditions(&self) -> &dyn FlightConditions {
        match self {
            Self::Body(conditions) => conditions,
            Self::Atmospheric(conditions) => conditions,
        }
    }

    pub fn as_flight_conditions_mut(&mut self) -> &mut dyn FlightConditions {
        match self {
            Self::Body(conditions) => conditions,
            Self::Atmospheric(conditions) => conditions,
        }
    }

    /// Returns the atmospheric flight conditions, if these conditions account for an atmosphere.
    pub fn as_atmospheric(&self) -> Option<&AtmosphericBodyFlightConditions> {
        match self {
            Self::Body(_) => None,
            Self::Atmospheric(conditions) => Some(conditions),
        }
    }

    pub fn as_atmospheric_mut(&mut self) -> Option<&mut AtmosphericBodyFlightConditions> {
        match self {
            Self::Body(_) => None,
            Self::Atmospheric(conditions) => Some(conditions),
        }
    }

    pub fn update_conditions(
        &mut self,
        time: f64,
        body_centered_body_fixed_state: Vector6<f64>,
        body_fixed_to_inertial: Matrix3<f64>,
    ) -> Result<(), AeroError> {
        self.as_flight_conditions_mut().update_conditions(
            time,
            body_centered_body_fixed_state,
            body_fixed_to_inertial,
        )
    }
}

impl From<BodyFlightConditions> for FlightConditionsModel {
    fn from(conditions: BodyFlightConditions) -> Self {
        Self::Body(conditions)
    }
}

impl From<AtmosphericBodyFlightConditions> for FlightConditionsModel {
    fn from(conditions: AtmosphericBodyFlightConditions) -> Self {
        Self::Atmospheric(conditions)
    }
}
