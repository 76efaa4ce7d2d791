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

use super::{ArgumentSpec, CapabilityDescriptor, CapabilityRegistry};
use crate::aerodynamics::{
    AerodynamicCoefficientsIndependentVariables, AerodynamicsReferenceFrameAngles,
    AerodynamicsReferenceFrames,
};
use enum_iterator::{all, Sequence};
use lazy_static::lazy_static;
use serde_yaml::Value;
use std::fmt;

use super::Access::{ReadOnly, ReadWrite};

lazy_static! {
    /// The environment capabilities, registered and validated on first use.
    pub static ref ENVIRONMENT: CapabilityRegistry = {
        let mut registry = CapabilityRegistry::new();
        for descriptor in environment_manifest() {
            if let Err(e) = registry.register(descriptor) {
                error!("environment manifest: {e}");
            }
        }
        match registry.validate() {
            Ok(()) => info!("environment manifest: {} capabilities exposed", registry.len()),
            Err(e) => error!("environment manifest: {e}"),
        }
        registry
    };
}

/// Rust path of an item of this crate
fn path(item: &str) -> String {
    format!("{}::{item}", env!("CARGO_CRATE_NAME"))
}

fn arg(name: &str) -> ArgumentSpec {
    ArgumentSpec::required(name)
}

fn arg_or<V: Into<Value>>(name: &str, default: V) -> ArgumentSpec {
    ArgumentSpec::with_default(name, default)
}

/// An optional callable or model, omitted by default
fn arg_none(name: &str) -> ArgumentSpec {
    ArgumentSpec::with_default(name, Value::Null)
}

fn class(name: &str, item: &str) -> CapabilityDescriptor {
    CapabilityDescriptor::class(name, &path(item))
}

fn function(name: &str, item: &str, arguments: Vec<ArgumentSpec>) -> CapabilityDescriptor {
    CapabilityDescriptor::function(name, &path(item), arguments)
}

/// Class whose members are all read-only properties forwarding to the method of the same name
fn read_only_class(name: &str, item: &str, properties: &[&str]) -> CapabilityDescriptor {
    properties.iter().fold(class(name, item), |desc, prop| {
        desc.with_property(prop, &path(&format!("{item}::{prop}")), ReadOnly)
    })
}

/// Enumeration exposing every variant under its exposed name
fn enumeration<T, F>(name: &str, item: &str, exposed_name: F) -> CapabilityDescriptor
where
    T: Sequence + fmt::Debug,
    F: Fn(&T) -> &'static str,
{
    all::<T>().fold(
        CapabilityDescriptor::enumeration(name, &path(item)),
        |desc, variant| desc.with_value(exposed_name(&variant), &path(&format!("{item}::{variant:?}"))),
    )
}

/// Every class, free function and enumeration of the environment exposed to the embedding side.
pub fn environment_manifest() -> Vec<CapabilityDescriptor> {
    let mut manifest = aerodynamics();
    manifest.extend(flight_conditions());
    manifest.extend(ephemerides());
    manifest.extend(rotation_models());
    manifest.extend(gravity_fields());
    manifest.extend(shapes_and_ground_stations());
    manifest.extend(bodies());
    manifest
}

fn aerodynamics() -> Vec<CapabilityDescriptor> {
    let li = "aerodynamics::local_inclination";
    vec![
        enumeration(
            "AerodynamicCoefficientsIndependentVariables",
            "aerodynamics::AerodynamicCoefficientsIndependentVariables",
            AerodynamicCoefficientsIndependentVariables::exposed_name,
        ),
        read_only_class(
            "AerodynamicCoefficientInterface",
            "aerodynamics::AerodynamicCoefficientInterface",
            &[
                "reference_area",
                "current_force_coefficients",
                "current_moment_coefficients",
                "current_coefficients",
            ],
        )
        .with_method(
            "update_coefficients",
            &path("aerodynamics::AerodynamicCoefficientInterface::update_coefficients"),
            vec![arg("independent_variables"), arg("time")],
        ),
        class(
            "AerodynamicCoefficientGenerator36",
            "aerodynamics::AerodynamicCoefficientGenerator",
        )
        .with_base("AerodynamicCoefficientInterface"),
        function(
            "get_default_local_inclination_mach_points",
            &format!("{li}::default_local_inclination_mach_points"),
            vec![arg_or("mach_regime", "Full")],
        ),
        function(
            "get_default_local_inclination_angle_of_attack_points",
            &format!("{li}::default_local_inclination_angle_of_attack_points"),
            vec![],
        ),
        function(
            "get_default_local_inclination_sideslip_angle_points",
            &format!("{li}::default_local_inclination_sideslip_angle_points"),
            vec![],
        ),
        class(
            "HypersonicLocalInclinationAnalysis",
            "aerodynamics::HypersonicLocalInclinationAnalysis",
        )
        .with_base("AerodynamicCoefficientGenerator36")
        .with_constructor(
            &path("aerodynamics::HypersonicLocalInclinationAnalysis::from_mesh_points"),
            vec![
                arg("independent_variable_points"),
                arg("vehicle_meshes"),
                arg("invert_orders"),
                arg("selected_methods"),
                arg("reference_area"),
                arg("reference_length"),
                arg("moment_reference_point"),
                arg("coefficient_table"),
                arg_or("save_pressure_coefficients", false),
            ],
        ),
        function(
            "get_local_inclination_total_vehicle_area",
            &format!("{li}::total_surface_area"),
            vec![arg("local_inclination_analysis_object")],
        ),
        function(
            "get_local_inclination_mesh",
            &format!("{li}::vehicle_mesh"),
            vec![arg("local_inclination_analysis_object")],
        ),
    ]
}

fn flight_conditions() -> Vec<CapabilityDescriptor> {
    let calculator = "aerodynamics::AerodynamicAngleCalculator";
    vec![
        enumeration(
            "AerodynamicsReferenceFrameAngles",
            "aerodynamics::AerodynamicsReferenceFrameAngles",
            AerodynamicsReferenceFrameAngles::exposed_name,
        ),
        enumeration(
            "AerodynamicsReferenceFrames",
            "aerodynamics::AerodynamicsReferenceFrames",
            AerodynamicsReferenceFrames::exposed_name,
        ),
        class("AerodynamicAngleCalculator", calculator)
            .with_method(
                "set_body_orientation_angle_functions",
                &path(&format!("{calculator}::set_body_orientation_angle_functions")),
                vec![
                    arg_none("angle_of_attack_function"),
                    arg_none("angle_of_sideslip_function"),
                    arg_none("bank_angle_function"),
                    arg_none("angle_update_function"),
                ],
            )
            .with_method(
                "set_body_orientation_angles",
                &path(&format!("{calculator}::set_body_orientation_angles")),
                vec![
                    arg_or("angle_of_attack", f64::NAN),
                    arg_or("angle_of_sideslip", f64::NAN),
                    arg_or("bank_angle", f64::NAN),
                ],
            )
            .with_method(
                "get_rotation_matrix_between_frames",
                &path(&format!("{calculator}::get_rotation_matrix_between_frames")),
                vec![arg("original_frame"), arg("target_frame")],
            )
            .with_method(
                "get_angle",
                &path(&format!("{calculator}::get_angle")),
                vec![arg("angle_type")],
            ),
        read_only_class(
            "FlightConditions",
            "aerodynamics::FlightConditions",
            &[
                "aerodynamic_angle_calculator",
                "longitude",
                "geodetic_latitude",
                "time",
                "body_centered_body_fixed_state",
                "altitude",
            ],
        ),
        read_only_class(
            "AtmosphericFlightConditions",
            "aerodynamics::AtmosphericFlightConditions",
            &[
                "density",
                "temperature",
                "dynamic_pressure",
                "pressure",
                "airspeed",
                "mach_number",
                "airspeed_velocity",
                "speed_of_sound",
                "aero_coefficient_independent_variables",
                "control_surface_aero_coefficient_independent_variables",
                "aerodynamic_coefficient_interface",
            ],
        )
        .with_base("FlightConditions"),
    ]
}

fn ephemerides() -> Vec<CapabilityDescriptor> {
    let ephemeris_method = |desc: CapabilityDescriptor, name: &str| {
        desc.with_method(
            name,
            &path(&format!("ephemerides::Ephemeris::{name}")),
            vec![arg_or("seconds_since_epoch", 0.0)],
        )
    };
    let ephemeris = ["cartesian_state", "cartesian_position", "cartesian_velocity"]
        .into_iter()
        .fold(class("Ephemeris", "ephemerides::Ephemeris"), ephemeris_method);

    let tle = [
        "epoch",
        "b_star",
        "inclination",
        "right_ascension",
        "eccentricity",
        "arg_of_perigee",
        "mean_anomaly",
        "mean_motion",
    ]
    .into_iter()
    .fold(
        class("Tle", "ephemerides::Tle")
            .with_constructor(&path("ephemerides::Tle::from_str"), vec![arg("lines")])
            .with_constructor(
                &path("ephemerides::Tle::from_lines"),
                vec![arg("line_1"), arg("line_2")],
            ),
        |desc, getter| {
            desc.with_method(
                &format!("get_{getter}"),
                &path(&format!("ephemerides::Tle::{getter}")),
                vec![],
            )
        },
    );

    vec![
        ephemeris,
        class("ConstantEphemeris", "ephemerides::ConstantEphemeris")
            .with_base("Ephemeris")
            .with_constructor(
                &path("ephemerides::ConstantEphemeris::from_function"),
                vec![
                    arg("constant_state_function"),
                    arg_or("reference_frame_origin", "SSB"),
                    arg_or("reference_frame_orientation", "ECLIPJ2000"),
                ],
            )
            .with_constructor(
                &path("ephemerides::ConstantEphemeris::new"),
                vec![
                    arg("constant_state"),
                    arg_or("reference_frame_origin", "SSB"),
                    arg_or("reference_frame_orientation", "ECLIPJ2000"),
                ],
            )
            .with_method(
                "update_constant_state",
                &path("ephemerides::ConstantEphemeris::update_constant_state"),
                vec![arg("new_state")],
            ),
        class("KeplerEphemeris", "ephemerides::KeplerEphemeris").with_base("Ephemeris"),
        class("TabulatedEphemeris", "ephemerides::TabulatedEphemeris")
            .with_base("Ephemeris")
            .with_method(
                "reset_interpolator",
                &path("ephemerides::TabulatedEphemeris::reset_interpolator"),
                vec![arg("interpolator")],
            ),
        tle,
        class("TleEphemeris", "ephemerides::TleEphemeris")
            .with_base("Ephemeris")
            .with_constructor(
                &path("ephemerides::TleEphemeris::new"),
                vec![
                    arg_or("frame_origin", "Earth"),
                    arg_or("frame_orientation", "J2000"),
                    arg_none("tle"),
                    arg_or("use_sdp", false),
                ],
            ),
    ]
}

fn rotation_models() -> Vec<CapabilityDescriptor> {
    let synchronous = "ephemerides::SynchronousRotationalEphemeris";
    vec![
        class("RotationalEphemeris", "ephemerides::RotationalEphemeris"),
        function(
            "transform_to_inertial_orientation",
            "ephemerides::transform_to_inertial_orientation",
            vec![
                arg("state_in_body_fixed_frame"),
                arg("current_time"),
                arg("rotational_ephemeris"),
            ],
        ),
        class(
            "LongitudeLibrationCalculator",
            "ephemerides::LongitudeLibrationCalculator",
        ),
        class(
            "DirectLongitudeLibrationCalculator",
            "ephemerides::DirectLongitudeLibrationCalculator",
        )
        .with_base("LongitudeLibrationCalculator")
        .with_constructor(
            &path("ephemerides::DirectLongitudeLibrationCalculator::new"),
            vec![arg("scaled_libration_amplitude")],
        ),
        class("SynchronousRotationalEphemeris", synchronous)
            .with_base("RotationalEphemeris")
            .with_property(
                "libration_calculator",
                &path(&format!("{synchronous}::libration_calculator")),
                ReadWrite,
            ),
    ]
}

fn gravity_fields() -> Vec<CapabilityDescriptor> {
    let sh = "gravitation::SphericalHarmonicsGravityField";
    vec![
        class("GravityFieldModel", "gravitation::GravityFieldModel")
            .with_constructor(
                &path("gravitation::PointMassGravityField::new"),
                vec![arg("gravitational_parameter"), arg_none("update_inertia_tensor")],
            )
            .with_method(
                "get_gravitational_parameter",
                &path("gravitation::GravityFieldModel::gravitational_parameter"),
                vec![],
            )
            .with_property(
                "gravitational_parameter",
                &path("gravitation::GravityFieldModel::gravitational_parameter"),
                ReadWrite,
            ),
        read_only_class(
            "SphericalHarmonicsGravityField",
            sh,
            &["reference_radius", "maximum_degree", "maximum_order"],
        )
        .with_base("GravityFieldModel")
        .with_property(
            "cosine_coefficients",
            &path(&format!("{sh}::cosine_coefficients")),
            ReadWrite,
        )
        .with_property(
            "sine_coefficients",
            &path(&format!("{sh}::sine_coefficients")),
            ReadWrite,
        ),
    ]
}

fn shapes_and_ground_stations() -> Vec<CapabilityDescriptor> {
    let pointing = "ground_stations::PointingAnglesCalculator";
    vec![
        read_only_class("ShapeModel", "bodies::BodyShapeModel", &["average_radius"]).with_method(
            "get_average_radius",
            &path("bodies::BodyShapeModel::average_radius"),
            vec![],
        ),
        read_only_class(
            "GroundStation",
            "ground_stations::GroundStation",
            &["pointing_angles_calculator"],
        ),
        class("PointingAnglesCalculator", pointing)
            .with_method(
                "calculate_elevation_angle",
                &path(&format!("{pointing}::calculate_elevation_angle")),
                vec![arg("inertial_vector_to_target"), arg("time")],
            )
            .with_method(
                "calculate_azimuth_angle",
                &path(&format!("{pointing}::calculate_azimuth_angle")),
                vec![arg("inertial_vector_to_target"), arg("time")],
            )
            .with_method(
                "convert_inertial_vector_to_topocentric",
                &path(&format!("{pointing}::convert_inertial_vector_to_topocentric")),
                vec![arg("inertial_vector"), arg("time")],
            ),
    ]
}

fn bodies() -> Vec<CapabilityDescriptor> {
    let read_write = [
        "ephemeris_frame_to_base_frame",
        "mass",
        "inertia_tensor",
        "ephemeris",
        "atmosphere_model",
        "shape_model",
        "gravity_field_model",
        "aerodynamic_coefficient_interface",
        "flight_conditions",
        "rotation_model",
    ];
    let body = read_write
        .into_iter()
        .fold(
            read_only_class(
                "Body",
                "bodies::Body",
                &[
                    "state",
                    "position",
                    "velocity",
                    "inertial_to_body_fixed_frame",
                    "body_fixed_to_inertial_frame",
                    "inertial_to_body_fixed_frame_derivative",
                    "body_fixed_to_inertial_frame_derivative",
                    "inertial_angular_velocity",
                    "body_fixed_angular_velocity",
                    "gravitational_parameter",
                ],
            ),
            |desc, prop| desc.with_property(prop, &path(&format!("bodies::Body::{prop}")), ReadWrite),
        )
        .with_method(
            "state_in_base_frame_from_ephemeris",
            &path("bodies::Body::state_in_base_frame_from_ephemeris"),
            vec![arg("time")],
        );

    let system = "bodies::SystemOfBodies";
    vec![
        body,
        read_only_class("SystemOfBodies", system, &["number_of_bodies"])
            .with_method(
                "get",
                &path(&format!("{system}::get")),
                vec![arg("body_name")],
            )
            .with_method(
                "create_empty_body",
                &path(&format!("{system}::create_empty_body")),
                vec![arg("body_name"), arg_or("process_body", 1)],
            )
            .with_method(
                "add_body",
                &path(&format!("{system}::add_body")),
                vec![arg("body_to_add"), arg("body_name"), arg_or("process_body", 1)],
            )
            .with_method(
                "remove_body",
                &path(&format!("{system}::remove_body")),
                vec![arg("body_name")],
            ),
    ]
}
