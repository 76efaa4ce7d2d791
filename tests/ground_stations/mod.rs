use crate::test_config_path;
use approx::assert_relative_eq;
use nyx::bodies::OblateSpheroidBodyShapeModel;
use nyx::ephemerides::{RotationalEphemeris, SimpleRotationalEphemeris};
use nyx::ground_stations::{GroundStation, GroundStationConfig, GroundStationError};
use nyx::io::ConfigRepr;
use nyx::linalg::{Matrix3, Vector3};
use std::f64::consts::FRAC_PI_2;
use std::sync::Arc;

const EARTH_ROTATION_RATE: f64 = 7.292115e-5;

fn wgs84() -> OblateSpheroidBodyShapeModel {
    OblateSpheroidBodyShapeModel::new(6_378_137.0, 1.0 / 298.257223563)
}

fn earth_rotation() -> Arc<dyn RotationalEphemeris> {
    Arc::new(SimpleRotationalEphemeris::new(
        Matrix3::identity(),
        0.0,
        EARTH_ROTATION_RATE,
        0.0,
        "J2000",
        "IAU_Earth",
    ))
}

#[test]
fn load_named_stations() {
    let _ = pretty_env_logger::try_init();
    let stations = GroundStationConfig::load_named(test_config_path("ground_stations.yaml")).unwrap();
    assert_eq!(stations.len(), 2);

    let demo = &stations["Demo ground station"];
    assert_eq!(demo.central_body, "Earth");
    assert_eq!(demo.elevation_mask_deg, 5.0);

    let canberra = &stations["Canberra"];
    let builtin = GroundStationConfig::dss34_canberra(10.0);
    assert_eq!(canberra, &builtin);
}

#[test]
fn load_many_stations() {
    let stations = GroundStationConfig::load_many(test_config_path("many_ground_stations.yaml")).unwrap();
    assert_eq!(stations.len(), 3);
    assert_eq!(stations[0], GroundStationConfig::dss65_madrid(5.0));
    assert_eq!(stations[1], GroundStationConfig::dss13_goldstone(5.0));
    assert_eq!(stations[2].central_body, "Moon");
    assert_eq!(stations[2].elevation_mask_deg, 0.0);

    assert!(GroundStationConfig::load(test_config_path("missing.yaml")).is_err());
}

#[test]
fn tracking_over_a_quarter_day() {
    let rotation = earth_rotation();
    let madrid = GroundStation::new(GroundStationConfig::dss65_madrid(5.0), &wgs84(), rotation.clone());
    let pointing = madrid.pointing_angles_calculator();

    let quarter_day = FRAC_PI_2 / EARTH_ROTATION_RATE;
    let station = madrid.inertial_state(quarter_day).unwrap();
    let station_position = station.fixed_rows::<3>(0).into_owned();
    assert_relative_eq!(
        station_position.norm(),
        madrid.body_fixed_position().norm(),
        max_relative = 1e-12
    );

    // Straight up along the local vertical, i.e. the ENU Z axis
    let to_inertial = rotation.rotation_to_base_frame(quarter_day).unwrap();
    let up = to_inertial * pointing.body_fixed_to_topocentric().transpose() * Vector3::z();
    let elevation = pointing.calculate_elevation_angle(&(up * 1e5), quarter_day).unwrap();
    assert_relative_eq!(elevation, FRAC_PI_2, epsilon = 1e-9);
    assert!(madrid
        .is_visible(&(station_position + up * 1e6), quarter_day)
        .unwrap());

    // Due North on the horizon
    let north = to_inertial * pointing.body_fixed_to_topocentric().transpose() * Vector3::y();
    let (azimuth, elevation) = pointing.calculate_pointing_angles(&north, quarter_day).unwrap();
    assert_relative_eq!(azimuth, 0.0, epsilon = 1e-12);
    assert_relative_eq!(elevation, 0.0, epsilon = 1e-12);
    assert!(!madrid
        .is_visible(&(station_position + north * 1e6), quarter_day)
        .unwrap());

    // Due East
    let east = to_inertial * pointing.body_fixed_to_topocentric().transpose() * Vector3::x();
    assert_relative_eq!(
        pointing.calculate_azimuth_angle(&east, quarter_day).unwrap(),
        FRAC_PI_2,
        epsilon = 1e-12
    );
    assert_relative_eq!(
        pointing.convert_inertial_vector_to_topocentric(&east, quarter_day).unwrap(),
        Vector3::x(),
        epsilon = 1e-12
    );

    assert_eq!(
        pointing.calculate_elevation_angle(&Vector3::zeros(), 0.0),
        Err(GroundStationError::ZeroVector)
    );
}
