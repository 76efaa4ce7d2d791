use approx::assert_relative_eq;
use nyx::bodies::{Body, BodyCreationOptions, BodyError, SystemOfBodies, SystemOfBodiesConfig};
use nyx::ephemerides::{
    transform_to_inertial_orientation, ConstantEphemeris, ConstantEphemerisConfig,
    DirectLongitudeLibrationCalculator, Ephemeris, RotationalEphemeris,
    SynchronousRotationalEphemeris,
};
use nyx::gravitation::{GravityFieldModel, PointMassGravityField};
use nyx::io::ConfigRepr;
use nyx::linalg::{Vector3, Vector6};
use parking_lot::RwLock;
use rstest::*;
use std::sync::Arc;

const EARTH_GM: f64 = 3.986004418e14;
const MOON_DISTANCE_M: f64 = 3.844e8;

#[fixture]
fn moon_ephemeris() -> Arc<ConstantEphemeris> {
    let speed = (EARTH_GM / MOON_DISTANCE_M).sqrt();
    Arc::new(ConstantEphemeris::new(
        Vector6::new(MOON_DISTANCE_M, 0.0, 0.0, 0.0, speed, 0.0),
        ConstantEphemerisConfig::builder()
            .reference_frame_origin("Earth")
            .reference_frame_orientation("J2000")
            .build(),
    ))
}

#[fixture]
fn system(moon_ephemeris: Arc<ConstantEphemeris>) -> SystemOfBodies {
    let _ = pretty_env_logger::try_init();

    let cfg = SystemOfBodiesConfig::loads("frame_origin: Earth\nframe_orientation: J2000").unwrap();
    let mut bodies = SystemOfBodies::new(cfg);

    let earth = bodies
        .create_empty_body("Earth", BodyCreationOptions::default())
        .unwrap();
    earth
        .write()
        .set_gravity_field_model(Some(Arc::new(PointMassGravityField::new(EARTH_GM, None).unwrap())));

    let state_function_ephemeris = moon_ephemeris.clone();
    let rotation = SynchronousRotationalEphemeris::new(
        Arc::new(move |t| state_function_ephemeris.cartesian_state(t)),
        EARTH_GM,
        "Earth",
        "J2000",
        "IAU_Moon",
    );

    let moon = Arc::new(RwLock::new(Body::new("Luna")));
    {
        let mut moon = moon.write();
        moon.set_ephemeris(Some(moon_ephemeris));
        moon.set_rotation_model(Some(Arc::new(rotation)));
    }
    bodies
        .add_body(moon, "Moon", BodyCreationOptions::default())
        .unwrap();
    bodies
}

#[rstest]
fn tidally_locked_moon(system: SystemOfBodies) {
    assert_eq!(system.frame_origin(), "Earth");
    system.update_states(3600.0).unwrap();

    let moon = system.get("Moon").unwrap();
    let moon = moon.read();
    assert_eq!(moon.name(), "Moon");
    assert_eq!(moon.current_time(), 3600.0);

    // The body-fixed X axis points to the Earth, Z along the orbital angular momentum
    let x_axis = moon.body_fixed_to_inertial_frame() * Vector3::x();
    assert_relative_eq!(x_axis, -Vector3::x(), epsilon = 1e-12);
    let z_axis = moon.body_fixed_to_inertial_frame() * Vector3::z();
    assert_relative_eq!(z_axis, Vector3::z(), epsilon = 1e-12);

    let mean_motion = (EARTH_GM / MOON_DISTANCE_M.powi(3)).sqrt();
    assert_relative_eq!(
        moon.inertial_angular_velocity(),
        Vector3::new(0.0, 0.0, mean_motion),
        max_relative = 1e-12
    );

    // A point fixed on the sub-Earth point moves with the rotation of the Moon
    let radius = 1_737_400.0;
    let rotation = moon.rotation_model().unwrap();
    let inertial = transform_to_inertial_orientation(
        &Vector6::new(radius, 0.0, 0.0, 0.0, 0.0, 0.0),
        3600.0,
        rotation.as_ref(),
    )
    .unwrap();
    assert_relative_eq!(inertial[0], -radius, max_relative = 1e-12);
    assert_relative_eq!(inertial[4], -radius * mean_motion, max_relative = 1e-9);
    assert_eq!(rotation.target_frame_orientation(), "IAU_Moon");
}

#[rstest]
fn circular_orbit_has_no_libration(system: SystemOfBodies, moon_ephemeris: Arc<ConstantEphemeris>) {
    let moon = system.get("Moon").unwrap();
    let rotation = moon.read().rotation_model().unwrap();
    let before = rotation.rotation_to_base_frame(0.0).unwrap();

    let synchronous = SynchronousRotationalEphemeris::new(
        Arc::new(move |t| moon_ephemeris.cartesian_state(t)),
        EARTH_GM,
        "Earth",
        "J2000",
        "IAU_Moon",
    );
    synchronous.set_libration_calculator(Some(Arc::new(DirectLongitudeLibrationCalculator::new(0.1))));
    assert!(synchronous.libration_calculator().is_some());
    assert_relative_eq!(
        synchronous.rotation_to_base_frame(0.0).unwrap(),
        before,
        epsilon = 1e-12
    );
}

#[rstest]
fn shared_gravity_field(system: SystemOfBodies) {
    let earth = system.get("Earth").unwrap();
    let field = earth.read().gravity_field_model().unwrap();
    field.reset_gravitational_parameter(3.9e14).unwrap();
    assert_eq!(earth.read().gravitational_parameter().unwrap(), 3.9e14);

    let moon = system.get("Moon").unwrap();
    assert!(matches!(
        moon.read().gravitational_parameter(),
        Err(BodyError::MissingModel { .. })
    ));
}

#[rstest]
fn self_centered_flight_conditions(mut system: SystemOfBodies) {
    let vehicle = system
        .create_empty_body("Vehicle", BodyCreationOptions::default())
        .unwrap();
    {
        let mut vehicle = vehicle.write();
        let mut shaped = Body::new("Vehicle");
        shaped.set_shape_model(Some(Arc::new(nyx::bodies::SphericalBodyShapeModel::new(1.0))));
        vehicle.create_flight_conditions(&shaped).unwrap();
    }
    assert!(matches!(
        system.update_flight_conditions("Vehicle", 0.0),
        Err(BodyError::SelfCentered { .. })
    ));
    assert!(matches!(
        system.update_flight_conditions("Mars", 0.0),
        Err(BodyError::BodyNotFound { .. })
    ));
}
