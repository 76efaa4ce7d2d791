use approx::assert_relative_eq;
use nyx::aerodynamics::{
    AerodynamicCoefficientGenerator, AerodynamicCoefficientInterface,
    AerodynamicCoefficientsIndependentVariables,
    AerodynamicsReferenceFrameAngles, AtmosphericFlightConditions, BodyOrientationAngles,
    FlightConditions,
};
use nyx::bodies::{
    BodyCreationOptions, ExponentialAtmosphere, SphericalBodyShapeModel, SystemOfBodies,
};
use nyx::ephemerides::{ConstantEphemeris, ConstantEphemerisConfig, SimpleRotationalEphemeris};
use nyx::linalg::{Matrix3, Vector3, Vector6};
use rstest::*;
use std::sync::Arc;

const EARTH_RADIUS_M: f64 = 6_378_137.0;
const EARTH_RATE: f64 = 7.292115e-5;
const ALTITUDE_M: f64 = 80e3;
const INERTIAL_SPEED: f64 = 7_500.0;

/// Drag grows linearly with Mach number and lift with the angle of attack
fn coefficient_table() -> AerodynamicCoefficientGenerator {
    use AerodynamicCoefficientsIndependentVariables::*;
    let node = |mach: f64, alpha: f64| Vector6::new(mach / 10.0, 0.0, alpha, 0.0, 0.0, 0.0);
    AerodynamicCoefficientGenerator::new(
        vec![MachNumberDependent, AngleOfAttackDependent],
        vec![vec![1.0, 50.0], vec![-1.0, 1.0]],
        vec![node(1.0, -1.0), node(1.0, 1.0), node(50.0, -1.0), node(50.0, 1.0)],
        10.0,
        2.0,
        Vector3::zeros(),
    )
    .unwrap()
}

#[fixture]
fn bodies() -> SystemOfBodies {
    let _ = pretty_env_logger::try_init();

    let mut bodies = SystemOfBodies::default();
    let earth = bodies
        .create_empty_body("Earth", BodyCreationOptions::default())
        .unwrap();
    {
        let mut earth = earth.write();
        earth.set_shape_model(Some(Arc::new(SphericalBodyShapeModel::new(EARTH_RADIUS_M))));
        earth.set_atmosphere_model(Some(Arc::new(ExponentialAtmosphere::earth())));
        earth.set_rotation_model(Some(Arc::new(SimpleRotationalEphemeris::new(
            Matrix3::identity(),
            0.0,
            EARTH_RATE,
            0.0,
            "J2000",
            "IAU_Earth",
        ))));
    }

    let capsule = bodies
        .create_empty_body("Capsule", BodyCreationOptions::default())
        .unwrap();
    {
        let mut capsule = capsule.write();
        capsule.set_ephemeris(Some(Arc::new(ConstantEphemeris::new(
            Vector6::new(EARTH_RADIUS_M + ALTITUDE_M, 0.0, 0.0, 0.0, INERTIAL_SPEED, 0.0),
            ConstantEphemerisConfig::builder()
                .reference_frame_origin("Earth")
                .build(),
        ))));
        capsule.set_aerodynamic_coefficient_interface(Some(Arc::new(coefficient_table())));
        capsule.create_flight_conditions(&earth.read()).unwrap();
        capsule
            .flight_conditions_mut()
            .unwrap()
            .as_flight_conditions_mut()
            .aerodynamic_angle_calculator_mut()
            .set_body_orientation_angles(
                BodyOrientationAngles::builder()
                    .angle_of_attack(0.3)
                    .angle_of_sideslip(0.0)
                    .bank_angle(0.0)
                    .build(),
            );
    }
    bodies
}

#[rstest]
fn reentry_conditions(bodies: SystemOfBodies) {
    bodies.update_states(0.0).unwrap();
    bodies.update_flight_conditions("Capsule", 0.0).unwrap();

    let capsule = bodies.get("Capsule").unwrap();
    let capsule = capsule.read();
    let conditions = capsule
        .flight_conditions()
        .unwrap()
        .as_atmospheric()
        .expect("the central body has an atmosphere");

    assert_eq!(conditions.central_body_name(), "Earth");
    assert_relative_eq!(conditions.altitude(), ALTITUDE_M, epsilon = 1e-6);
    assert_relative_eq!(conditions.longitude(), 0.0, epsilon = 1e-12);
    assert_relative_eq!(conditions.geodetic_latitude(), 0.0, epsilon = 1e-12);

    // The atmosphere corotates with the Earth
    let airspeed = INERTIAL_SPEED - EARTH_RATE * (EARTH_RADIUS_M + ALTITUDE_M);
    assert_relative_eq!(conditions.airspeed(), airspeed, max_relative = 1e-9);
    assert_relative_eq!(
        conditions.airspeed_velocity(),
        Vector3::new(0.0, airspeed, 0.0),
        epsilon = 1e-6
    );

    let density = 1.225 * (-ALTITUDE_M / 7.2e3).exp();
    assert_relative_eq!(conditions.density(), density, max_relative = 1e-12);
    assert_relative_eq!(
        conditions.dynamic_pressure(),
        0.5 * density * airspeed.powi(2),
        max_relative = 1e-9
    );
    assert_relative_eq!(conditions.temperature(), 246.0);
    assert_relative_eq!(
        conditions.speed_of_sound(),
        (1.4_f64 * 287.0 * 246.0).sqrt(),
        max_relative = 1e-12
    );

    let mach = conditions.mach_number();
    assert_relative_eq!(mach, airspeed / conditions.speed_of_sound());
    assert_eq!(conditions.aero_coefficient_independent_variables(), &[mach, 0.3]);
    assert_relative_eq!(
        conditions
            .aerodynamic_angle_calculator()
            .get_angle(AerodynamicsReferenceFrameAngles::AngleOfAttack)
            .unwrap(),
        0.3
    );

    // Updating the conditions updated the coefficients of the capsule
    let coefficients = capsule
        .aerodynamic_coefficient_interface()
        .unwrap()
        .current_coefficients();
    assert_relative_eq!(coefficients[0], mach / 10.0, max_relative = 1e-9);
    assert_relative_eq!(coefficients[2], 0.3, max_relative = 1e-9);
}

#[rstest]
fn control_surfaces(bodies: SystemOfBodies) {
    {
        let capsule = bodies.get("Capsule").unwrap();
        let mut capsule = capsule.write();
        capsule
            .flight_conditions_mut()
            .unwrap()
            .as_atmospheric_mut()
            .unwrap()
            .set_control_surface_deflection("elevon", 0.1);
    }
    bodies.update_states(5.0).unwrap();
    bodies.update_flight_conditions("Capsule", 5.0).unwrap();

    let capsule = bodies.get("Capsule").unwrap();
    let capsule = capsule.read();
    let conditions = capsule.flight_conditions().unwrap().as_atmospheric().unwrap();
    let per_surface = conditions.control_surface_aero_coefficient_independent_variables();
    assert_eq!(per_surface.len(), 1);
    assert_eq!(
        per_surface["elevon"],
        vec![conditions.mach_number(), 0.3, 0.1]
    );
}
