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

use super::{Body, BodyError, BodyExistsSnafu, BodyNotFoundSnafu, MissingModelSnafu, SelfCenteredSnafu};
use crate::io::ConfigRepr;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_derive::{Deserialize, Serialize};
use snafu::prelude::*;
use std::sync::Arc;
use typed_builder::TypedBuilder;

/// Bodies are shared between the system and any other holder, e.g. an embedding language.
pub type SharedBody = Arc<RwLock<Body>>;

/// Options used when a body is created in or added to a system of bodies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct BodyCreationOptions {
    /// Passed through to the body, not interpreted by the environment
    #[builder(default = 1)]
    #[serde(default = "default_process_body")]
    pub process_body: i32,
}

fn default_process_body() -> i32 {
    1
}

impl Default for BodyCreationOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Origin and orientation of the global frame in which the states of all bodies are expressed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[builder(doc)]
pub struct SystemOfBodiesConfig {
    #[builder(default = String::from("SSB"), setter(into))]
    #[serde(default = "default_frame_origin")]
    pub frame_origin: String,
    #[builder(default = String::from("ECLIPJ2000"), setter(into))]
    #[serde(default = "default_frame_orientation")]
    pub frame_orientation: String,
}

fn default_frame_origin() -> String {
    String::from("SSB")
}

fn default_frame_orientation() -> String {
    String::from("ECLIPJ2000")
}

impl Default for SystemOfBodiesConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ConfigRepr for SystemOfBodiesConfig {}

/// Named bodies of the environment, in insertion order.
#[derive(Debug, Default)]
pub struct SystemOfBodies {
    config: SystemOfBodiesConfig,
    bodies: IndexMap<String, SharedBody>,
}

impl SystemOfBodies {
    pub fn new(config: SystemOfBodiesConfig) -> Self {
        Self {
            config,
            bodies: IndexMap::new(),
        }
    }

    pub fn frame_origin(&self) -> &str {
        &self.config.frame_origin
    }

    pub fn frame_orientation(&self) -> &str {
        &self.config.frame_orientation
    }

    pub fn get(&self, body_name: &str) -> Result<SharedBody, BodyError> {
        self.bodies
            .get(body_name)
            .cloned()
            .context(BodyNotFoundSnafu { name: body_name })
    }

    pub fn contains(&self, body_name: &str) -> bool {
        self.bodies.contains_key(body_name)
    }

    /// Creates a body without any model and returns it.
    pub fn create_empty_body(
        &mut self,
        body_name: &str,
        options: BodyCreationOptions,
    ) -> Result<SharedBody, BodyError> {
        let mut body = Body::new(body_name);
        body.set_process_body(options.process_body);
        let body = Arc::new(RwLock::new(body));
        self.add_body(body.clone(), body_name, options)?;
        Ok(body)
    }

    /// Adds a body under the provided name, which replaces the name the body had.
    pub fn add_body(
        &mut self,
        body_to_add: SharedBody,
        body_name: &str,
        options: BodyCreationOptions,
    ) -> Result<(), BodyError> {
        ensure!(
            !self.bodies.contains_key(body_name),
            BodyExistsSnafu { name: body_name }
        );
        {
            let mut body = body_to_add.write();
            body.set_name(body_name);
            body.set_process_body(options.process_body);
        }
        debug!("adding {body_name} to the system of bodies");
        self.bodies.insert(body_name.to_string(), body_to_add);
        Ok(())
    }

    /// Removes the body and returns it. The order of the other bodies is preserved.
    pub fn remove_body(&mut self, body_name: &str) -> Result<SharedBody, BodyError> {
        self.bodies
            .shift_remove(body_name)
            .context(BodyNotFoundSnafu { name: body_name })
    }

    pub fn number_of_bodies(&self) -> usize {
        self.bodies.len()
    }

    pub fn body_names(&self) -> Vec<String> {
        self.bodies.keys().cloned().collect()
    }

    /// Sets the translational and rotational states of every body which has the corresponding models.
    pub fn update_states(&self, time: f64) -> Result<(), BodyError> {
        for body in self.bodies.values() {
            let mut body = body.write();
            if body.ephemeris().is_some() {
                body.set_state_from_ephemeris(time)?;
            }
            if body.rotation_model().is_some() {
                body.set_current_rotational_state_from_model(time)?;
            }
        }
        Ok(())
    }

    /// Updates the flight conditions of the body w.r.t. the central body named in its flight conditions.
    pub fn update_flight_conditions(&self, body_name: &str, time: f64) -> Result<(), BodyError> {
        let body = self.get(body_name)?;
        let central_name = body
            .read()
            .flight_conditions()
            .map(|conditions| conditions.as_flight_conditions().central_body_name().to_string())
            .context(MissingModelSnafu {
                body: body_name,
                model: "flight conditions",
            })?;
        ensure!(central_name != body_name, SelfCenteredSnafu { name: body_name });
        let central = self.get(&central_name)?;
        let central = central.read();
        let result = body.write().update_flight_conditions(time, &central);
        result
    }
}
