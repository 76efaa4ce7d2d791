use crate::test_config_path;
use nyx::exposure::{Access, CapabilityKind, CapabilityRegistry, ExposureError};
use nyx::EnvironmentError;
use rstest::*;
use serde_yaml::Value;

#[fixture]
fn registry() -> CapabilityRegistry {
    let _ = pretty_env_logger::try_init();
    CapabilityRegistry::load(test_config_path("capabilities.yaml")).unwrap()
}

#[rstest]
fn loaded_table(registry: CapabilityRegistry) {
    assert_eq!(registry.len(), 4);
    assert_eq!(
        registry.names(),
        vec!["Capsule", "Propulsion", "Vehicle", "delta_v"]
    );
    assert_eq!(registry.get("delta_v").unwrap().kind, CapabilityKind::Function);
    assert!(registry.is_substitutable("Capsule", "Vehicle").unwrap());
    assert!(!registry.is_substitutable("Vehicle", "Capsule").unwrap());
    assert_eq!(registry.substitutes_for("Vehicle").unwrap(), vec!["Capsule"]);
}

#[rstest]
fn constructor_overloads(registry: CapabilityRegistry) {
    let by_name = registry
        .resolve_constructor("Vehicle", &[Value::from("Apollo")], &[])
        .unwrap();
    assert_eq!(by_name.target, "demo::Vehicle::new");
    assert_eq!(by_name.argument("mass"), Some(&Value::from(1000.0)));

    let from_file = registry
        .resolve_constructor("Vehicle", &[], &[("path", Value::from("vehicle.yaml"))])
        .unwrap();
    assert_eq!(from_file.target, "demo::Vehicle::from_file");

    assert_eq!(
        registry.resolve_constructor("Vehicle", &[], &[("radius", Value::from(1.0))]),
        Err(ExposureError::NoMatchingOverload {
            capability: "Vehicle".to_string(),
            method: "__init__".to_string(),
            overloads: 2
        })
    );

    // Constructors are declared per class
    assert!(matches!(
        registry.resolve_constructor("Capsule", &[Value::from("Orion")], &[]),
        Err(ExposureError::NoConstructor { .. })
    ));
}

#[rstest]
fn derived_method_hides_base(registry: CapabilityRegistry) {
    let vehicle = registry.resolve_arguments("Vehicle", "state", &[], &[]).unwrap();
    assert_eq!(vehicle.target, "demo::Vehicle::state");
    assert_eq!(vehicle.argument("time"), Some(&Value::from(0.0)));

    assert_eq!(
        registry.resolve_arguments("Capsule", "state", &[], &[]),
        Err(ExposureError::MissingArgument {
            capability: "Capsule".to_string(),
            method: "state".to_string(),
            argument: "time".to_string()
        })
    );
    let capsule = registry
        .resolve_arguments("Capsule", "state", &[], &[("time", Value::from(60.0))])
        .unwrap();
    assert_eq!(capsule.target, "demo::Capsule::state");
}

#[rstest]
fn inherited_properties(registry: CapabilityRegistry) {
    let mass = registry
        .resolve_property("Capsule", "mass", Access::WriteOnly)
        .unwrap();
    assert_eq!(mass.target, "demo::Vehicle::mass");

    assert!(matches!(
        registry.resolve_property("Capsule", "name", Access::WriteOnly),
        Err(ExposureError::PropertyAccess {
            access: Access::ReadOnly,
            ..
        })
    ));
    assert!(matches!(
        registry.resolve_property("Capsule", "heat_shield", Access::ReadOnly),
        Err(ExposureError::PropertyAccess {
            access: Access::WriteOnly,
            ..
        })
    ));
    assert!(matches!(
        registry.resolve_property("Vehicle", "heat_shield", Access::WriteOnly),
        Err(ExposureError::UnknownMember { .. })
    ));
}

#[rstest]
fn function_and_enumeration(registry: CapabilityRegistry) {
    let call = registry
        .resolve_function(
            "delta_v",
            &[Value::from(320.0)],
            &[("mass_ratio", Value::from(2.5))],
        )
        .unwrap();
    let arguments: Vec<&str> = call.arguments.keys().map(String::as_str).collect();
    assert_eq!(arguments, vec!["isp", "mass_ratio", "g0"]);
    assert_eq!(call.argument("g0"), Some(&Value::from(9.80665)));

    assert!(matches!(
        registry.resolve_function("delta_v", &vec![Value::from(1.0); 4], &[]),
        Err(ExposureError::TooManyArguments { max: 3, got: 4, .. })
    ));
    assert!(matches!(
        registry.resolve_function(
            "delta_v",
            &[Value::from(320.0)],
            &[("isp", Value::from(300.0))]
        ),
        Err(ExposureError::DuplicateArgument { .. })
    ));

    assert_eq!(
        registry.resolve_value("Propulsion", "electric").unwrap().target,
        "demo::Propulsion::Electric"
    );
    assert!(registry.resolve_value("Propulsion", "nuclear").is_err());
}

#[test]
fn missing_table() {
    assert!(matches!(
        CapabilityRegistry::load(test_config_path("missing.yaml")),
        Err(EnvironmentError::Config { .. })
    ));
}

#[test]
fn invalid_table() {
    // Stations are not capability descriptors
    assert!(CapabilityRegistry::load(test_config_path("ground_stations.yaml")).is_err());
}
