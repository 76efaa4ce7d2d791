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

use crate::io::ConfigRepr;
use indexmap::IndexMap;
use serde_derive::{Deserialize, Serialize};
use serde_yaml::Value;
use snafu::prelude::*;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

mod manifest;
pub use self::manifest::{environment_manifest, ENVIRONMENT};

/// Exposed name of constructors
pub const CONSTRUCTOR: &str = "__init__";

#[derive(Debug, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ExposureError {
    #[snafu(display("capability `{name}` is already registered"))]
    DuplicateCapability { name: String },
    #[snafu(display("no capability named `{name}` is registered"))]
    UnknownCapability { name: String },
    #[snafu(display("`{name}` declares base `{base}` which is not registered"))]
    UnknownBase { name: String, base: String },
    #[snafu(display("`{name}` is a {kind} and cannot declare base `{base}`"))]
    BaseOnNonClass {
        name: String,
        kind: CapabilityKind,
        base: String,
    },
    #[snafu(display("`{name}` declares base `{base}` which is a {kind}, not a class"))]
    BaseNotClass {
        name: String,
        base: String,
        kind: CapabilityKind,
    },
    #[snafu(display("the base chain of `{name}` loops back onto itself"))]
    InheritanceCycle { name: String },
    #[snafu(display("`{capability}` declares `{member}` more than once"))]
    DuplicateMember { capability: String, member: String },
    #[snafu(display("`{capability}` has no member `{member}`"))]
    UnknownMember { capability: String, member: String },
    #[snafu(display("`{capability}.{property}` is {access}"))]
    PropertyAccess {
        capability: String,
        property: String,
        access: Access,
    },
    #[snafu(display("`{capability}` is a {kind} and cannot be constructed"))]
    NoConstructor {
        capability: String,
        kind: CapabilityKind,
    },
    #[snafu(display("`{capability}.{method}` declares argument `{argument}` more than once"))]
    DuplicateArgumentName {
        capability: String,
        method: String,
        argument: String,
    },
    #[snafu(display(
        "`{capability}.{method}`: argument `{argument}` has no default but follows an argument which does"
    ))]
    RequiredAfterDefault {
        capability: String,
        method: String,
        argument: String,
    },
    #[snafu(display("`{capability}.{method}` takes at most {max} positional arguments but {got} were given"))]
    TooManyArguments {
        capability: String,
        method: String,
        max: usize,
        got: usize,
    },
    #[snafu(display("`{capability}.{method}` got multiple values for argument `{argument}`"))]
    DuplicateArgument {
        capability: String,
        method: String,
        argument: String,
    },
    #[snafu(display("`{capability}.{method}` got an unexpected keyword argument `{argument}`"))]
    UnknownArgument {
        capability: String,
        method: String,
        argument: String,
    },
    #[snafu(display("`{capability}.{method}` is missing required argument `{argument}`"))]
    MissingArgument {
        capability: String,
        method: String,
        argument: String,
    },
    #[snafu(display("none of the {overloads} overloads of `{capability}.{method}` accept these arguments"))]
    NoMatchingOverload {
        capability: String,
        method: String,
        overloads: usize,
    },
}

/// What kind of native item a capability exposes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    Class,
    Function,
    Enumeration,
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Function => write!(f, "function"),
            Self::Enumeration => write!(f, "enumeration"),
        }
    }
}

/// Access granted to the embedding side on a property.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Access {
    ReadOnly,
    WriteOnly,
    ReadWrite,
}

impl Access {
    pub fn is_readable(&self) -> bool {
        matches!(self, Self::ReadOnly | Self::ReadWrite)
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, Self::WriteOnly | Self::ReadWrite)
    }

    /// Returns whether a property declared with this access may be used as `requested`.
    pub fn permits(&self, requested: Access) -> bool {
        (!requested.is_readable() || self.is_readable())
            && (!requested.is_writable() || self.is_writable())
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ReadOnly => write!(f, "read-only"),
            Self::WriteOnly => write!(f, "write-only"),
            Self::ReadWrite => write!(f, "read-write"),
        }
    }
}

/// A named argument, with the value used when the caller omits it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ArgumentSpec {
    pub fn required(name: &str) -> Self {
        Self {
            name: name.to_string(),
            default: None,
        }
    }

    pub fn with_default<V: Into<Value>>(name: &str, default: V) -> Self {
        Self {
            name: name.to_string(),
            default: Some(default.into()),
        }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// A callable member (or the call signature of a free function).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodSpec {
    pub name: String,
    /// Rust path of the callable this forwards to
    pub target: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<ArgumentSpec>,
}

impl MethodSpec {
    /// Binds the positional and keyword values onto the arguments, filling omitted ones with their defaults.
    fn bind(
        &self,
        capability: &str,
        positional: &[Value],
        keyword: &[(&str, Value)],
    ) -> Result<IndexMap<String, Value>, ExposureError> {
        ensure!(
            positional.len() <= self.arguments.len(),
            TooManyArgumentsSnafu {
                capability,
                method: &self.name,
                max: self.arguments.len(),
                got: positional.len()
            }
        );

        let mut given: IndexMap<&str, Value> = self
            .arguments
            .iter()
            .zip(positional.iter())
            .map(|(arg, value)| (arg.name.as_str(), value.clone()))
            .collect();

        for &(name, ref value) in keyword {
            ensure!(
                self.arguments.iter().any(|arg| arg.name == *name),
                UnknownArgumentSnafu {
                    capability,
                    method: &self.name,
                    argument: name
                }
            );
            ensure!(
                !given.contains_key(name),
                DuplicateArgumentSnafu {
                    capability,
                    method: &self.name,
                    argument: name
                }
            );
            given.insert(name, value.clone());
        }

        let mut bound = IndexMap::with_capacity(self.arguments.len());
        for arg in &self.arguments {
            let value = match given.swap_remove(arg.name.as_str()) {
                Some(value) => value,
                None => arg.default.clone().context(MissingArgumentSnafu {
                    capability,
                    method: &self.name,
                    argument: &arg.name,
                })?,
            };
            bound.insert(arg.name.clone(), value);
        }
        Ok(bound)
    }
}

/// A property, readable and/or writable from the embedding side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertySpec {
    pub name: String,
    pub target: String,
    pub access: Access,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerationValue {
    pub name: String,
    pub target: String,
}

/// Declares how one native class, free function or enumeration is exposed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    /// Name visible to the embedding caller
    pub name: String,
    /// Rust path of the exposed item
    pub target: String,
    pub kind: CapabilityKind,
    /// Exposed class for which this class may be substituted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constructors: Vec<MethodSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertySpec>,
    /// Methods of a class; a free function has a single entry carrying its own name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub methods: Vec<MethodSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<EnumerationValue>,
}

impl ConfigRepr for CapabilityDescriptor {}

impl CapabilityDescriptor {
    fn empty(name: &str, target: &str, kind: CapabilityKind) -> Self {
        Self {
            name: name.to_string(),
            target: target.to_string(),
            kind,
            base: None,
            constructors: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn class(name: &str, target: &str) -> Self {
        Self::empty(name, target, CapabilityKind::Class)
    }

    pub fn function(name: &str, target: &str, arguments: Vec<ArgumentSpec>) -> Self {
        let mut me = Self::empty(name, target, CapabilityKind::Function);
        me.methods.push(MethodSpec {
            name: name.to_string(),
            target: target.to_string(),
            arguments,
        });
        me
    }

    pub fn enumeration(name: &str, target: &str) -> Self {
        Self::empty(name, target, CapabilityKind::Enumeration)
    }

    pub fn with_base(mut self, base: &str) -> Self {
        self.base = Some(base.to_string());
        self
    }

    /// Adds a constructor overload.
    pub fn with_constructor(mut self, target: &str, arguments: Vec<ArgumentSpec>) -> Self {
        self.constructors.push(MethodSpec {
            name: CONSTRUCTOR.to_string(),
            target: target.to_string(),
            arguments,
        });
        self
    }

    pub fn with_property(mut self, name: &str, target: &str, access: Access) -> Self {
        self.properties.push(PropertySpec {
            name: name.to_string(),
            target: target.to_string(),
            access,
        });
        self
    }

    /// Adds a method; adding a second method with the same name declares an overload.
    pub fn with_method(mut self, name: &str, target: &str, arguments: Vec<ArgumentSpec>) -> Self {
        self.methods.push(MethodSpec {
            name: name.to_string(),
            target: target.to_string(),
            arguments,
        });
        self
    }

    pub fn with_value(mut self, name: &str, target: &str) -> Self {
        self.values.push(EnumerationValue {
            name: name.to_string(),
            target: target.to_string(),
        });
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertySpec> {
        self.properties.iter().find(|prop| prop.name == name)
    }

    /// All overloads of the named method declared directly on this capability
    pub fn overloads(&self, name: &str) -> Vec<&MethodSpec> {
        self.methods.iter().filter(|m| m.name == name).collect()
    }

    /// Checks the declarations which do not depend on other capabilities.
    fn check_members(&self) -> Result<(), ExposureError> {
        if let Some(base) = &self.base {
            ensure!(
                self.kind == CapabilityKind::Class,
                BaseOnNonClassSnafu {
                    name: &self.name,
                    kind: self.kind,
                    base
                }
            );
        }

        let mut members = HashSet::new();
        for name in self.properties.iter().map(|p| p.name.as_str()).chain(
            self.values.iter().map(|v| v.name.as_str()),
        ) {
            ensure!(
                members.insert(name),
                DuplicateMemberSnafu {
                    capability: &self.name,
                    member: name
                }
            );
        }
        // Methods may be overloaded, but may not share a name with a property.
        for method in &self.methods {
            ensure!(
                self.property(&method.name).is_none(),
                DuplicateMemberSnafu {
                    capability: &self.name,
                    member: &method.name
                }
            );
        }

        for method in self.methods.iter().chain(self.constructors.iter()) {
            let mut names = HashSet::new();
            let mut seen_default = false;
            for arg in &method.arguments {
                ensure!(
                    names.insert(arg.name.as_str()),
                    DuplicateArgumentNameSnafu {
                        capability: &self.name,
                        method: &method.name,
                        argument: &arg.name
                    }
                );
                ensure!(
                    !(seen_default && arg.is_required()),
                    RequiredAfterDefaultSnafu {
                        capability: &self.name,
                        method: &method.name,
                        argument: &arg.name
                    }
                );
                seen_default |= !arg.is_required();
            }
        }
        Ok(())
    }
}

/// A call resolved against the registry: the Rust target and every argument, in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedCall {
    pub target: String,
    pub arguments: IndexMap<String, Value>,
}

impl ResolvedCall {
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.get(name)
    }
}

/// Registration table of every capability reachable from the embedding side.
///
/// Capabilities are keyed by their exposed name and bases are looked up by name at resolution time, so
/// the order in which capabilities are registered never affects resolution.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CapabilityRegistry {
    capabilities: BTreeMap<String, CapabilityDescriptor>,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers all of the descriptors and validates the result.
    pub fn from_descriptors<I>(descriptors: I) -> Result<Self, ExposureError>
    where
        I: IntoIterator<Item = CapabilityDescriptor>,
    {
        let mut me = Self::new();
        for descriptor in descriptors {
            me.register(descriptor)?;
        }
        me.validate()?;
        Ok(me)
    }

    /// Loads the descriptors listed in a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, crate::EnvironmentError> {
        let descriptors = CapabilityDescriptor::load_many(path)?;
        Ok(Self::from_descriptors(descriptors)?)
    }

    /// Registers a capability. Bases need not be registered yet, call `validate` once the table is complete.
    pub fn register(&mut self, descriptor: CapabilityDescriptor) -> Result<(), ExposureError> {
        ensure!(
            !self.capabilities.contains_key(&descriptor.name),
            DuplicateCapabilitySnafu {
                name: &descriptor.name
            }
        );
        descriptor.check_members()?;
        debug!(
            "registered {} `{}` -> {}",
            descriptor.kind, descriptor.name, descriptor.target
        );
        self.capabilities
            .insert(descriptor.name.clone(), descriptor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&CapabilityDescriptor, ExposureError> {
        self.capabilities
            .get(name)
            .context(UnknownCapabilitySnafu { name })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.capabilities.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }

    /// Exposed names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.capabilities.keys().map(|k| k.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CapabilityDescriptor> {
        self.capabilities.values()
    }

    /// Checks that every base is a registered class and that no base chain loops.
    pub fn validate(&self) -> Result<(), ExposureError> {
        for descriptor in self.capabilities.values() {
            descriptor.check_members()?;
            if let Some(base) = &descriptor.base {
                let base_desc = self.capabilities.get(base).context(UnknownBaseSnafu {
                    name: &descriptor.name,
                    base,
                })?;
                ensure!(
                    base_desc.kind == CapabilityKind::Class,
                    BaseNotClassSnafu {
                        name: &descriptor.name,
                        base,
                        kind: base_desc.kind
                    }
                );
            }
            self.base_chain(&descriptor.name)?;
        }
        Ok(())
    }

    /// The capability followed by its bases, most derived first.
    pub fn base_chain(&self, name: &str) -> Result<Vec<&CapabilityDescriptor>, ExposureError> {
        let mut current = self.get(name)?;
        let mut chain = vec![current];
        let mut visited = HashSet::from([current.name.as_str()]);
        while let Some(base) = current.base.as_deref() {
            ensure!(visited.insert(base), InheritanceCycleSnafu { name });
            current = self.capabilities.get(base).context(UnknownBaseSnafu {
                name: &current.name,
                base,
            })?;
            chain.push(current);
        }
        Ok(chain)
    }

    /// Returns whether `derived` may be used wherever `base` is expected.
    pub fn is_substitutable(&self, derived: &str, base: &str) -> Result<bool, ExposureError> {
        self.get(base)?;
        Ok(self
            .base_chain(derived)?
            .iter()
            .any(|desc| desc.name == base))
    }

    /// Registered classes which may be substituted for `base`, excluding `base` itself
    pub fn substitutes_for(&self, base: &str) -> Result<Vec<&str>, ExposureError> {
        self.get(base)?;
        let mut substitutes = Vec::new();
        for name in self.capabilities.keys().filter(|n| n.as_str() != base) {
            if self.is_substitutable(name, base)? {
                substitutes.push(name.as_str());
            }
        }
        Ok(substitutes)
    }

    /// Finds the property on the class or its nearest base, and checks it grants the requested access.
    pub fn resolve_property(
        &self,
        class: &str,
        property: &str,
        requested: Access,
    ) -> Result<&PropertySpec, ExposureError> {
        let spec = self
            .base_chain(class)?
            .into_iter()
            .find_map(|desc| desc.property(property))
            .context(UnknownMemberSnafu {
                capability: class,
                member: property,
            })?;
        ensure!(
            spec.access.permits(requested),
            PropertyAccessSnafu {
                capability: class,
                property,
                access: spec.access
            }
        );
        Ok(spec)
    }

    /// Resolves a method call (or, when `method` is the function's own name, a free function call).
    ///
    /// A method declared on a class hides the methods of the same name on its bases. When several overloads
    /// exist, the first which accepts the arguments wins.
    pub fn resolve_arguments(
        &self,
        capability: &str,
        method: &str,
        positional: &[Value],
        keyword: &[(&str, Value)],
    ) -> Result<ResolvedCall, ExposureError> {
        let overloads = self
            .base_chain(capability)?
            .into_iter()
            .map(|desc| desc.overloads(method))
            .find(|overloads| !overloads.is_empty())
            .context(UnknownMemberSnafu {
                capability,
                member: method,
            })?;
        Self::resolve_overloads(capability, method, &overloads, positional, keyword)
    }

    /// Resolves a free function call.
    pub fn resolve_function(
        &self,
        function: &str,
        positional: &[Value],
        keyword: &[(&str, Value)],
    ) -> Result<ResolvedCall, ExposureError> {
        self.resolve_arguments(function, function, positional, keyword)
    }

    /// Resolves a constructor call. Constructors are not inherited.
    pub fn resolve_constructor(
        &self,
        class: &str,
        positional: &[Value],
        keyword: &[(&str, Value)],
    ) -> Result<ResolvedCall, ExposureError> {
        let descriptor = self.get(class)?;
        ensure!(
            !descriptor.constructors.is_empty(),
            NoConstructorSnafu {
                capability: class,
                kind: descriptor.kind
            }
        );
        let overloads: Vec<&MethodSpec> = descriptor.constructors.iter().collect();
        Self::resolve_overloads(class, CONSTRUCTOR, &overloads, positional, keyword)
    }

    /// Looks up one value of an exposed enumeration.
    pub fn resolve_value(
        &self,
        enumeration: &str,
        value: &str,
    ) -> Result<&EnumerationValue, ExposureError> {
        self.get(enumeration)?
            .values
            .iter()
            .find(|v| v.name == value)
            .context(UnknownMemberSnafu {
                capability: enumeration,
                member: value,
            })
    }

    fn resolve_overloads(
        capability: &str,
        method: &str,
        overloads: &[&MethodSpec],
        positional: &[Value],
        keyword: &[(&str, Value)],
    ) -> Result<ResolvedCall, ExposureError> {
        if let [only] = overloads {
            return Ok(ResolvedCall {
                target: only.target.clone(),
                arguments: only.bind(capability, positional, keyword)?,
            });
        }
        for spec in overloads {
            match spec.bind(capability, positional, keyword) {
                Ok(arguments) => {
                    return Ok(ResolvedCall {
                        target: spec.target.clone(),
                        arguments,
                    })
                }
                Err(e) => trace!("overload {} rejected: {e}", spec.target),
            }
        }
        Err(ExposureError::NoMatchingOverload {
            capability: capability.to_string(),
            method: method.to_string(),
            overloads: overloads.len(),
        })
    }
}

#[cfg(test)]
mod ut_exposure {
    use super::*;

    fn ephemeris_family() -> Vec<CapabilityDescriptor> {
        vec![
            CapabilityDescriptor::class("ConstantEphemeris", "ephemerides::ConstantEphemeris")
                .with_base("Ephemeris")
                .with_constructor(
                    "ephemerides::ConstantEphemeris::from_function",
                    vec![
                        ArgumentSpec::required("constant_state_function"),
                        ArgumentSpec::with_default("reference_frame_origin", "SSB"),
                    ],
                )
                .with_constructor(
                    "ephemerides::ConstantEphemeris::new",
                    vec![
                        ArgumentSpec::required("constant_state"),
                        ArgumentSpec::with_default("reference_frame_origin", "SSB"),
                    ],
                ),
            CapabilityDescriptor::class("Ephemeris", "ephemerides::Ephemeris")
                .with_method(
                    "cartesian_state",
                    "ephemerides::Ephemeris::cartesian_state",
                    vec![ArgumentSpec::with_default("seconds_since_epoch", 0.0)],
                )
                .with_property("frame", "ephemerides::Ephemeris::frame", Access::ReadOnly),
        ]
    }

    #[test]
    fn registration_order_is_irrelevant() {
        let forward = CapabilityRegistry::from_descriptors(ephemeris_family()).unwrap();
        let backward =
            CapabilityRegistry::from_descriptors(ephemeris_family().into_iter().rev()).unwrap();
        assert_eq!(forward, backward);
        assert_eq!(forward.names(), vec!["ConstantEphemeris", "Ephemeris"]);
    }

    #[test]
    fn duplicate_registration() {
        let mut registry = CapabilityRegistry::new();
        registry
            .register(CapabilityDescriptor::class("Ephemeris", "a"))
            .unwrap();
        assert_eq!(
            registry.register(CapabilityDescriptor::class("Ephemeris", "b")),
            Err(ExposureError::DuplicateCapability {
                name: "Ephemeris".to_string()
            })
        );
        assert_eq!(registry.get("Ephemeris").unwrap().target, "a");
    }

    #[test]
    fn inherited_method_with_default() {
        let registry = CapabilityRegistry::from_descriptors(ephemeris_family()).unwrap();
        let call = registry
            .resolve_arguments("ConstantEphemeris", "cartesian_state", &[], &[])
            .unwrap();
        assert_eq!(call.target, "ephemerides::Ephemeris::cartesian_state");
        assert_eq!(
            call.argument("seconds_since_epoch").and_then(|v| v.as_f64()),
            Some(0.0)
        );
        assert!(registry
            .is_substitutable("ConstantEphemeris", "Ephemeris")
            .unwrap());
        assert!(!registry
            .is_substitutable("Ephemeris", "ConstantEphemeris")
            .unwrap());
    }

    #[test]
    fn overloaded_constructors() {
        let registry = CapabilityRegistry::from_descriptors(ephemeris_family()).unwrap();
        let call = registry
            .resolve_constructor(
                "ConstantEphemeris",
                &[],
                &[("constant_state", Value::from(vec![0.0; 6]))],
            )
            .unwrap();
        assert_eq!(call.target, "ephemerides::ConstantEphemeris::new");
        assert_eq!(
            call.arguments.keys().collect::<Vec<_>>(),
            vec!["constant_state", "reference_frame_origin"]
        );
        assert_eq!(
            call.argument("reference_frame_origin"),
            Some(&Value::from("SSB"))
        );

        // Positional arguments match the first overload which accepts them.
        let call = registry
            .resolve_constructor("ConstantEphemeris", &[Value::Null], &[])
            .unwrap();
        assert_eq!(call.target, "ephemerides::ConstantEphemeris::from_function");

        assert_eq!(
            registry.resolve_constructor("ConstantEphemeris", &[], &[]),
            Err(ExposureError::NoMatchingOverload {
                capability: "ConstantEphemeris".to_string(),
                method: CONSTRUCTOR.to_string(),
                overloads: 2
            })
        );
        assert!(matches!(
            registry.resolve_constructor("Ephemeris", &[], &[]),
            Err(ExposureError::NoConstructor { .. })
        ));
    }

    #[test]
    fn argument_errors() {
        let registry = CapabilityRegistry::from_descriptors(ephemeris_family()).unwrap();
        let too_many = registry.resolve_arguments(
            "Ephemeris",
            "cartesian_state",
            &[Value::from(1.0), Value::from(2.0)],
            &[],
        );
        assert!(matches!(
            too_many,
            Err(ExposureError::TooManyArguments { max: 1, got: 2, .. })
        ));

        let duplicate = registry.resolve_arguments(
            "Ephemeris",
            "cartesian_state",
            &[Value::from(1.0)],
            &[("seconds_since_epoch", Value::from(2.0))],
        );
        assert!(matches!(
            duplicate,
            Err(ExposureError::DuplicateArgument { .. })
        ));

        let unknown = registry.resolve_arguments(
            "Ephemeris",
            "cartesian_state",
            &[],
            &[("epoch", Value::from(2.0))],
        );
        assert!(matches!(unknown, Err(ExposureError::UnknownArgument { .. })));

        assert!(matches!(
            registry.resolve_arguments("Ephemeris", "cartesian_position", &[], &[]),
            Err(ExposureError::UnknownMember { .. })
        ));
    }

    #[test]
    fn property_access() {
        let registry = CapabilityRegistry::from_descriptors(ephemeris_family()).unwrap();
        assert!(registry
            .resolve_property("ConstantEphemeris", "frame", Access::ReadOnly)
            .is_ok());
        assert_eq!(
            registry.resolve_property("ConstantEphemeris", "frame", Access::WriteOnly),
            Err(ExposureError::PropertyAccess {
                capability: "ConstantEphemeris".to_string(),
                property: "frame".to_string(),
                access: Access::ReadOnly
            })
        );
        assert!(Access::ReadWrite.permits(Access::ReadWrite));
        assert!(!Access::WriteOnly.permits(Access::ReadOnly));
    }

    #[test]
    fn invalid_tables() {
        let orphan = vec![CapabilityDescriptor::class("A", "a").with_base("B")];
        assert!(matches!(
            CapabilityRegistry::from_descriptors(orphan),
            Err(ExposureError::UnknownBase { .. })
        ));

        let cycle = vec![
            CapabilityDescriptor::class("A", "a").with_base("B"),
            CapabilityDescriptor::class("B", "b").with_base("A"),
        ];
        assert!(matches!(
            CapabilityRegistry::from_descriptors(cycle),
            Err(ExposureError::InheritanceCycle { .. })
        ));

        let not_a_class = vec![
            CapabilityDescriptor::enumeration("E", "e"),
            CapabilityDescriptor::class("A", "a").with_base("E"),
        ];
        assert!(matches!(
            CapabilityRegistry::from_descriptors(not_a_class),
            Err(ExposureError::BaseNotClass { .. })
        ));

        let mut registry = CapabilityRegistry::new();
        let misordered = CapabilityDescriptor::function(
            "f",
            "f",
            vec![
                ArgumentSpec::with_default("a", 1),
                ArgumentSpec::required("b"),
            ],
        );
        assert!(matches!(
            registry.register(misordered),
            Err(ExposureError::RequiredAfterDefault { .. })
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn descriptor_from_yaml() {
        let yaml = r#"
name: DirectLongitudeLibrationCalculator
target: ephemerides::DirectLongitudeLibrationCalculator
kind: class
base: LongitudeLibrationCalculator
constructors:
  - name: __init__
    target: ephemerides::DirectLongitudeLibrationCalculator::new
    arguments:
      - name: scaled_libration_amplitude
properties:
  - name: scaled_libration_amplitude
    target: ephemerides::DirectLongitudeLibrationCalculator::scaled_libration_amplitude
    access: write_only
"#;
        let desc = CapabilityDescriptor::loads(yaml).unwrap();
        assert_eq!(desc.kind, CapabilityKind::Class);
        assert_eq!(desc.base.as_deref(), Some("LongitudeLibrationCalculator"));
        assert!(desc.constructors[0].arguments[0].is_required());
        assert_eq!(desc.properties[0].access, Access::WriteOnly);
        assert!(desc.values.is_empty());
    }
}
