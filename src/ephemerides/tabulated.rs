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

use super::{
    Ephemeris, EphemerisError, InsufficientStatesSnafu, OutOfInterpolationIntervalSnafu,
    UnsortedEpochsSnafu,
};
use crate::linalg::Vector6;
use parking_lot::RwLock;
use serde_derive::{Deserialize, Serialize};
use snafu::ensure;
use std::fmt;
use std::sync::Arc;

/// Behavior of an interpolator when requested outside of its tabulated interval.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryHandling {
    #[default]
    Throw,
    UseBoundaryValue,
    Extrapolate,
}

/// Interpolates a Cartesian state from tabulated states.
pub trait StateInterpolator: Send + Sync + fmt::Debug {
    /// Epochs of the tabulated states, in seconds since J2000
    fn epochs(&self) -> &[f64];

    fn interpolate(&self, epoch: f64) -> Result<Vector6<f64>, EphemerisError>;
}

/// Sorted states shared by the interpolators.
#[derive(Clone, Debug, PartialEq)]
struct StateTable {
    epochs: Vec<f64>,
    states: Vec<Vector6<f64>>,
    boundary_handling: BoundaryHandling,
}

impl StateTable {
    fn new(
        states: Vec<(f64, Vector6<f64>)>,
        boundary_handling: BoundaryHandling,
    ) -> Result<Self, EphemerisError> {
        ensure!(
            states.len() >= 2,
            InsufficientStatesSnafu {
                need: 2_usize,
                got: states.len()
            }
        );
        for (index, pair) in states.windows(2).enumerate() {
            ensure!(pair[0].0 < pair[1].0, UnsortedEpochsSnafu { index: index + 1 });
        }
        let (epochs, states) = states.into_iter().unzip();
        Ok(Self {
            epochs,
            states,
            boundary_handling,
        })
    }

    /// Returns the index of the lower state of the interpolation segment, and the epoch to interpolate at.
    fn segment(&self, epoch: f64) -> Result<(usize, f64), EphemerisError> {
        let start = self.epochs[0];
        let end = self.epochs[self.epochs.len() - 1];
        let epoch = if epoch < start || epoch > end {
            match self.boundary_handling {
                BoundaryHandling::Throw => {
                    return OutOfInterpolationIntervalSnafu { epoch, start, end }.fail()
                }
                BoundaryHandling::UseBoundaryValue => epoch.clamp(start, end),
                BoundaryHandling::Extrapolate => {
                    debug!("extrapolating tabulated states to {epoch} s");
                    epoch
                }
            }
        } else {
            epoch
        };
        let upper = self
            .epochs
            .partition_point(|e| *e <= epoch)
            .clamp(1, self.epochs.len() - 1);
        Ok((upper - 1, epoch))
    }
}

/// Component-wise linear interpolation of the tabulated states.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearStateInterpolator {
    table: StateTable,
}

impl LinearStateInterpolator {
    pub fn new(
        states: Vec<(f64, Vector6<f64>)>,
        boundary_handling: BoundaryHandling,
    ) -> Result<Self, EphemerisError> {
        Ok(Self {
            table: StateTable::new(states, boundary_handling)?,
        })
    }
}

impl StateInterpolator for LinearStateInterpolator {
    fn epochs(&self) -> &[f64] {
        &self.table.epochs
    }

    fn interpolate(&self, epoch: f64) -> Result<Vector6<f64>, EphemerisError> {
        let (idx, epoch) = self.table.segment(epoch)?;
        let (t0, t1) = (self.table.epochs[idx], self.table.epochs[idx + 1]);
        let (s0, s1) = (&self.table.states[idx], &self.table.states[idx + 1]);
        let fraction = (epoch - t0) / (t1 - t0);
        Ok(s0 + (s1 - s0) * fraction)
    }
}

/// Cubic Hermite interpolation of the position using the tabulated velocity as derivative.
/// The velocity is the time derivative of the interpolated position.
#[derive(Clone, Debug, PartialEq)]
pub struct HermiteStateInterpolator {
    table: StateTable,
}

impl HermiteStateInterpolator {
    pub fn new(
        states: Vec<(f64, Vector6<f64>)>,
        boundary_handling: BoundaryHandling,
    ) -> Result<Self, EphemerisError> {
        Ok(Self {
            table: StateTable::new(states, boundary_handling)?,
        })
    }
}

impl StateInterpolator for HermiteStateInterpolator {
    fn epochs(&self) -> &[f64] {
        &self.table.epochs
    }

    fn interpolate(&self, epoch: f64) -> Result<Vector6<f64>, EphemerisError> {
        let (idx, epoch) = self.table.segment(epoch)?;
        let (t0, t1) = (self.table.epochs[idx], self.table.epochs[idx + 1]);
        let (s0, s1) = (&self.table.states[idx], &self.table.states[idx + 1]);
        let h = t1 - t0;
        let u = (epoch - t0) / h;
        let (u2, u3) = (u * u, u * u * u);

        let h00 = 2.0 * u3 - 3.0 * u2 + 1.0;
        let h10 = u3 - 2.0 * u2 + u;
        let h01 = -2.0 * u3 + 3.0 * u2;
        let h11 = u3 - u2;

        let dh00 = 6.0 * u2 - 6.0 * u;
        let dh10 = 3.0 * u2 - 4.0 * u + 1.0;
        let dh01 = -6.0 * u2 + 6.0 * u;
        let dh11 = 3.0 * u2 - 2.0 * u;

        let mut state = Vector6::zeros();
        for i in 0..3 {
            let (p0, v0, p1, v1) = (s0[i], s0[i + 3], s1[i], s1[i + 3]);
            state[i] = h00 * p0 + h10 * h * v0 + h01 * p1 + h11 * h * v1;
            state[i + 3] = (dh00 * p0 + dh01 * p1) / h + dh10 * v0 + dh11 * v1;
        }
        Ok(state)
    }
}

/// Ephemeris interpolated from tabulated Cartesian states. The interpolator may be replaced at any time.
pub struct TabulatedEphemeris {
    reference_frame_origin: String,
    reference_frame_orientation: String,
    interpolator: RwLock<Arc<dyn StateInterpolator>>,
}

impl TabulatedEphemeris {
    pub fn new(
        interpolator: Arc<dyn StateInterpolator>,
        reference_frame_origin: &str,
        reference_frame_orientation: &str,
    ) -> Self {
        Self {
            reference_frame_origin: reference_frame_origin.to_string(),
            reference_frame_orientation: reference_frame_orientation.to_string(),
            interpolator: RwLock::new(interpolator),
        }
    }

    pub fn interpolator(&self) -> Arc<dyn StateInterpolator> {
        self.interpolator.read().clone()
    }

    pub fn reset_interpolator(&self, interpolator: Arc<dyn StateInterpolator>) {
        debug!(
            "resetting tabulated ephemeris interpolator ({} states)",
            interpolator.epochs().len()
        );
        *self.interpolator.write() = interpolator;
    }
}

impl Ephemeris for TabulatedEphemeris {
    fn reference_frame_origin(&self) -> &str {
        &self.reference_frame_origin
    }

    fn reference_frame_orientation(&self) -> &str {
        &self.reference_frame_orientation
    }

    fn cartesian_state(&self, seconds_since_epoch: f64) -> Result<Vector6<f64>, EphemerisError> {
        self.interpolator.read().interpolate(seconds_since_epoch)
    }
}

impl fmt::Debug for TabulatedEphemeris {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabulatedEphemeris")
            .field("reference_frame_origin", &self.reference_frame_origin)
            .field("reference_frame_orientation", &self.reference_frame_orientation)
            .field("interpolator", &*self.interpolator.read())
            .finish()
    }
}
