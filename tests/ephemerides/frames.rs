use approx::assert_relative_eq;
use nyx::bodies::Body;
use nyx::ephemerides::{
    BoundaryHandling, EphemerisError, Ephemeris, HermiteStateInterpolator, KeplerEphemeris,
    KeplerEphemerisConfig, KeplerPropagator, LinearStateInterpolator, TabulatedEphemeris,
};
use nyx::linalg::Vector6;
use std::f64::consts::TAU;
use std::sync::Arc;

/// Circular orbits in the XY plane, starting on the X axis
#[derive(Debug)]
struct CircularPropagator;

impl KeplerPropagator for CircularPropagator {
    fn propagate_kepler_orbit(
        &self,
        keplerian_elements: &Vector6<f64>,
        elapsed_seconds: f64,
        gravitational_parameter: f64,
        _config: &KeplerEphemerisConfig,
    ) -> Result<Vector6<f64>, EphemerisError> {
        let sma = keplerian_elements[0];
        let n = (gravitational_parameter / sma.powi(3)).sqrt();
        let angle = keplerian_elements[5] + n * elapsed_seconds;
        let speed = n * sma;
        Ok(Vector6::new(
            sma * angle.cos(),
            sma * angle.sin(),
            0.0,
            -speed * angle.sin(),
            speed * angle.cos(),
            0.0,
        ))
    }
}

const SUN_GM: f64 = 1.32712440018e20;
const EARTH_GM: f64 = 3.986004418e14;
const AU: f64 = 1.495978707e11;

fn earth_heliocentric() -> KeplerEphemeris {
    KeplerEphemeris::new(
        Vector6::new(AU, 0.0, 0.0, 0.0, 0.0, 0.0),
        0.0,
        SUN_GM,
        Arc::new(CircularPropagator),
        KeplerEphemerisConfig::default(),
    )
}

/// Tabulated from the Earth's Kepler orbit every hour over a day
fn earth_tabulated(boundary_handling: BoundaryHandling) -> TabulatedEphemeris {
    let kepler = earth_heliocentric();
    let states = (0..=24)
        .map(|hour| {
            let t = f64::from(hour) * 3600.0;
            (t, kepler.cartesian_state(t).unwrap())
        })
        .collect();
    TabulatedEphemeris::new(
        Arc::new(HermiteStateInterpolator::new(states, boundary_handling).unwrap()),
        "SSB",
        "ECLIPJ2000",
    )
}

#[test]
fn tabulated_follows_kepler() {
    let _ = pretty_env_logger::try_init();
    let kepler = earth_heliocentric();
    let tabulated = earth_tabulated(BoundaryHandling::Throw);
    assert_eq!(kepler.reference_frame_origin(), tabulated.reference_frame_origin());

    for t in [0.0, 1800.0, 45_000.5, 86_400.0] {
        let expected = kepler.cartesian_state(t).unwrap();
        let interpolated = tabulated.cartesian_state(t).unwrap();
        // Position to the meter, velocity to the mm/s over a 30 km/s orbit
        assert_relative_eq!(
            interpolated.fixed_rows::<3>(0).into_owned(),
            expected.fixed_rows::<3>(0).into_owned(),
            epsilon = 1.0
        );
        assert_relative_eq!(
            interpolated.fixed_rows::<3>(3).into_owned(),
            expected.fixed_rows::<3>(3).into_owned(),
            epsilon = 1e-3
        );
    }

    assert!(matches!(
        tabulated.cartesian_state(90_000.0),
        Err(EphemerisError::OutOfInterpolationInterval { .. })
    ));
}

#[test]
fn year_long_kepler() {
    let kepler = earth_heliocentric();
    let period = TAU * (AU.powi(3) / SUN_GM).sqrt();
    assert_relative_eq!(
        kepler.cartesian_state(period).unwrap(),
        kepler.cartesian_state(0.0).unwrap(),
        epsilon = 1e-3
    );
    assert_relative_eq!(
        kepler.cartesian_position(period / 4.0).unwrap()[1],
        AU,
        max_relative = 1e-12
    );
}

#[test]
fn replaced_interpolator_is_seen_by_body() {
    let tabulated = Arc::new(earth_tabulated(BoundaryHandling::UseBoundaryValue));

    let mut earth = Body::new("Earth");
    earth.set_ephemeris(Some(tabulated.clone()));
    let at_end = earth.state_in_base_frame_from_ephemeris(86_400.0).unwrap();
    assert_eq!(earth.state_in_base_frame_from_ephemeris(1e6).unwrap(), at_end);

    let parked = Vector6::new(AU, 0.0, 0.0, 0.0, 0.0, 0.0);
    tabulated.reset_interpolator(Arc::new(
        LinearStateInterpolator::new(vec![(0.0, parked), (1e7, parked)], BoundaryHandling::Throw)
            .unwrap(),
    ));
    assert_eq!(earth.state_in_base_frame_from_ephemeris(1e6).unwrap(), parked);
    assert_eq!(tabulated.interpolator().epochs(), &[0.0, 1e7]);
}

#[test]
fn geocentric_moon_in_heliocentric_frame() {
    let moon_sma = 3.844e8;
    let moon_geocentric = Arc::new(KeplerEphemeris::new(
        Vector6::new(moon_sma, 0.0, 0.0, 0.0, 0.0, 0.0),
        0.0,
        EARTH_GM,
        Arc::new(CircularPropagator),
        KeplerEphemerisConfig::builder()
            .reference_frame_origin("Earth")
            .build(),
    ));
    let earth_heliocentric = Arc::new(earth_heliocentric());

    let mut moon = Body::new("Moon");
    moon.set_ephemeris(Some(moon_geocentric.clone()));
    moon.set_ephemeris_frame_to_base_frame(Some(earth_heliocentric.clone()));

    let t = 7.0 * 86_400.0;
    let expected = moon_geocentric.cartesian_state(t).unwrap()
        + earth_heliocentric.cartesian_state(t).unwrap();
    assert_eq!(moon.state_in_base_frame_from_ephemeris(t).unwrap(), expected);

    moon.set_state_from_ephemeris(t).unwrap();
    assert_eq!(moon.state(), expected);
    assert_eq!(moon.current_time(), t);
    assert_relative_eq!(
        (moon.position() - earth_heliocentric.cartesian_position(t).unwrap()).norm(),
        moon_sma,
        max_relative = 1e-12
    );
}
