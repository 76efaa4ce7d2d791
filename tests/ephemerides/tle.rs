use approx::assert_relative_eq;
use nyx::bodies::{BodyCreationOptions, SystemOfBodies, SystemOfBodiesConfig};
use nyx::ephemerides::{EphemerisError, Ephemeris, Tle, TleEphemeris, TleEphemerisConfig, TlePropagator};
use nyx::linalg::Vector6;
use nyx::time::{Epoch, Unit};
use std::sync::Arc;

const EARTH_GM: f64 = 3.986004418e14;

const HUBBLE: &str = "HST
1 20580U 90037B   24001.50000000  .00001234  00000-0  56789-4 0  9991
2 20580  28.4699 120.5000 0002500  90.0000 270.0000 15.09000000 12345";

/// Equatorial circular orbit at the mean motion of the TLE, ignoring every other element
#[derive(Debug)]
struct MeanMotionPropagator;

impl TlePropagator for MeanMotionPropagator {
    fn propagate_tle(
        &self,
        tle: &Tle,
        seconds_since_tle_epoch: f64,
        use_sdp: bool,
    ) -> Result<Vector6<f64>, EphemerisError> {
        if use_sdp {
            return Err(EphemerisError::Engine {
                details: "deep space theory unavailable".to_string(),
            });
        }
        let n = tle.mean_motion();
        let sma = (EARTH_GM / (n * n)).cbrt();
        let angle = tle.mean_anomaly() + n * seconds_since_tle_epoch;
        Ok(Vector6::new(
            sma * angle.cos(),
            sma * angle.sin(),
            0.0,
            -n * sma * angle.sin(),
            n * sma * angle.cos(),
            0.0,
        ))
    }
}

#[test]
fn hubble_elements() {
    let tle: Tle = HUBBLE.parse().unwrap();
    assert_eq!(tle.name(), Some("HST"));
    assert_eq!(tle.satellite_number(), 20580);

    let expected_epoch = Epoch::from_gregorian_utc_hms(2024, 1, 1, 12, 0, 0);
    assert!((tle.epoch() - expected_epoch).abs() < 1 * Unit::Millisecond);
    assert_relative_eq!(tle.b_star(), 0.56789e-4, max_relative = 1e-12);
    assert_relative_eq!(tle.eccentricity(), 0.00025, max_relative = 1e-12);
    assert_relative_eq!(tle.inclination(), 28.4699_f64.to_radians(), max_relative = 1e-12);
    assert_relative_eq!(tle.period(), 86_400.0 / 15.09, max_relative = 1e-9);

    let from_lines = {
        let lines: Vec<&str> = HUBBLE.lines().collect();
        Tle::from_lines(lines[1], lines[2]).unwrap()
    };
    assert_eq!(from_lines.epoch(), tle.epoch());
    assert_eq!(from_lines.mean_motion(), tle.mean_motion());
}

#[test]
fn satellite_in_system() {
    let _ = pretty_env_logger::try_init();
    let tle: Tle = HUBBLE.parse().unwrap();
    let epoch = tle.epoch_seconds();
    let period = tle.period();

    let ephemeris = Arc::new(TleEphemeris::new(
        TleEphemerisConfig::builder().tle(tle).build(),
        Arc::new(MeanMotionPropagator),
    ));
    assert_eq!(ephemeris.reference_frame_origin(), "Earth");
    assert_eq!(ephemeris.reference_frame_orientation(), "J2000");

    let mut bodies = SystemOfBodies::new(
        SystemOfBodiesConfig::builder()
            .frame_origin("Earth")
            .frame_orientation("J2000")
            .build(),
    );
    let hst = bodies
        .create_empty_body("HST", BodyCreationOptions::builder().process_body(0).build())
        .unwrap();
    hst.write().set_ephemeris(Some(ephemeris.clone()));
    assert_eq!(hst.read().process_body(), 0);

    bodies.update_states(epoch + period).unwrap();
    assert_relative_eq!(
        hst.read().state(),
        ephemeris.cartesian_state(epoch).unwrap(),
        epsilon = 1e-2
    );
    let altitude_km = (hst.read().position().norm() - 6_378_136.3) / 1e3;
    assert!((500.0..600.0).contains(&altitude_km), "altitude {altitude_km} km");
}

#[test]
fn deep_space_errors_propagate() {
    let tle: Tle = HUBBLE.parse().unwrap();
    let ephemeris = TleEphemeris::new(
        TleEphemerisConfig::builder()
            .frame_origin("Earth")
            .tle(tle)
            .use_sdp(true)
            .build(),
        Arc::new(MeanMotionPropagator),
    );
    assert!(ephemeris.use_sdp());
    assert!(matches!(
        ephemeris.cartesian_state(0.0),
        Err(EphemerisError::Engine { .. })
    ));
}
