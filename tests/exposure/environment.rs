use nyx::bodies::BodyCreationOptions;
use nyx::ephemerides::{ConstantEphemerisConfig, TleEphemerisConfig};
use nyx::exposure::{Access, CapabilityKind, ExposureError, ENVIRONMENT};
use nyx::io::ConfigRepr;
use serde_yaml::Value;

#[test]
fn constant_ephemeris_defaults_match_config() {
    let _ = pretty_env_logger::try_init();
    let call = ENVIRONMENT
        .resolve_constructor("ConstantEphemeris", &[Value::Null], &[])
        .unwrap();
    // The first overload takes a state function
    assert!(call.target.ends_with("ConstantEphemeris::from_function"));

    let call = ENVIRONMENT
        .resolve_constructor(
            "ConstantEphemeris",
            &[],
            &[("constant_state", Value::Null), ("reference_frame_origin", Value::from("Earth"))],
        )
        .unwrap();
    assert!(call.target.ends_with("ConstantEphemeris::new"));

    // Build the config from the resolved arguments, as an embedding layer would
    let mut arguments = call.arguments.clone();
    arguments.swap_remove("constant_state");
    let yaml = serde_yaml::to_string(&arguments).unwrap();
    let cfg = ConstantEphemerisConfig::loads(&yaml).unwrap();
    assert_eq!(cfg.reference_frame_origin, "Earth");
    assert_eq!(
        cfg.reference_frame_orientation,
        ConstantEphemerisConfig::default().reference_frame_orientation
    );
}

#[test]
fn tle_ephemeris_defaults_match_config() {
    let cfg = TleEphemerisConfig::default();
    let call = ENVIRONMENT.resolve_constructor("TleEphemeris", &[], &[]).unwrap();
    assert_eq!(call.argument("frame_origin"), Some(&Value::from(cfg.frame_origin.as_str())));
    assert_eq!(
        call.argument("frame_orientation"),
        Some(&Value::from(cfg.frame_orientation.as_str()))
    );
    assert_eq!(call.argument("use_sdp"), Some(&Value::from(cfg.use_sdp)));
    assert!(cfg.tle.is_none());
}

#[test]
fn process_body_default_matches_options() {
    let call = ENVIRONMENT
        .resolve_arguments(
            "SystemOfBodies",
            "add_body",
            &[Value::Null],
            &[("body_name", Value::from("Vehicle"))],
        )
        .unwrap();
    assert_eq!(
        call.argument("process_body").and_then(Value::as_i64),
        Some(i64::from(BodyCreationOptions::default().process_body))
    );
}

#[test]
fn hypersonic_analysis_chain() {
    let chain: Vec<&str> = ENVIRONMENT
        .base_chain("HypersonicLocalInclinationAnalysis")
        .unwrap()
        .into_iter()
        .map(|desc| desc.name.as_str())
        .collect();
    assert_eq!(
        chain,
        vec![
            "HypersonicLocalInclinationAnalysis",
            "AerodynamicCoefficientGenerator36",
            "AerodynamicCoefficientInterface"
        ]
    );

    // Inherited from the coefficient interface
    let update = ENVIRONMENT
        .resolve_arguments(
            "HypersonicLocalInclinationAnalysis",
            "update_coefficients",
            &[Value::Null, Value::from(0.0)],
            &[],
        )
        .unwrap();
    assert!(update.target.ends_with("update_coefficients"));

    let ctor = ENVIRONMENT
        .resolve_constructor("HypersonicLocalInclinationAnalysis", &vec![Value::Null; 8], &[])
        .unwrap();
    assert_eq!(ctor.argument("save_pressure_coefficients"), Some(&Value::from(false)));

    let mesh = ENVIRONMENT
        .resolve_function("get_local_inclination_mesh", &[Value::Null], &[])
        .unwrap();
    assert!(mesh.target.ends_with("vehicle_mesh"));
}

#[test]
fn gravity_field_access() {
    assert!(ENVIRONMENT
        .resolve_property("SphericalHarmonicsGravityField", "gravitational_parameter", Access::ReadWrite)
        .is_ok());
    assert!(ENVIRONMENT
        .resolve_property("SphericalHarmonicsGravityField", "cosine_coefficients", Access::WriteOnly)
        .is_ok());
    assert!(matches!(
        ENVIRONMENT.resolve_property("SphericalHarmonicsGravityField", "maximum_degree", Access::WriteOnly),
        Err(ExposureError::PropertyAccess {
            access: Access::ReadOnly,
            ..
        })
    ));
}

#[test]
fn abstract_classes_cannot_be_constructed() {
    for name in ["Ephemeris", "RotationalEphemeris", "FlightConditions", "Body"] {
        assert_eq!(ENVIRONMENT.get(name).unwrap().kind, CapabilityKind::Class);
        assert!(matches!(
            ENVIRONMENT.resolve_constructor(name, &[], &[]),
            Err(ExposureError::NoConstructor { .. })
        ));
    }
    assert!(matches!(
        ENVIRONMENT.resolve_constructor("AerodynamicsReferenceFrames", &[], &[]),
        Err(ExposureError::NoConstructor {
            kind: CapabilityKind::Enumeration,
            ..
        })
    ));
}
