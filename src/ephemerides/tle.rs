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

use super::{Ephemeris, EphemerisError, MissingTleSnafu, TleParseSnafu};
use crate::linalg::Vector6;
use crate::time::{Epoch, Unit};
use snafu::prelude::*;
use std::f64::consts::{PI, TAU};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use typed_builder::TypedBuilder;

#[cfg(feature = "python")]
use pyo3::prelude::*;

const TLE_LINE_LENGTH: usize = 69;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Two-line element set. Angles are stored in radians and the mean motion in radians per second.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "python", pyclass)]
#[cfg_attr(feature = "python", pyo3(module = "nyx_environment.ephemerides"))]
pub struct Tle {
    name: Option<String>,
    satellite_number: u32,
    epoch: Epoch,
    b_star: f64,
    inclination: f64,
    right_ascension: f64,
    eccentricity: f64,
    arg_of_perigee: f64,
    mean_anomaly: f64,
    mean_motion: f64,
}

impl Tle {
    /// Parses the two data lines of a TLE.
    pub fn from_lines(line_1: &str, line_2: &str) -> Result<Self, EphemerisError> {
        let line_1 = check_line(line_1, 1)?;
        let line_2 = check_line(line_2, 2)?;

        let satellite_number = field(line_1, 1, 2..7)?
            .parse::<u32>()
            .map_err(|e| TleParseSnafu { line: 1_usize, msg: format!("satellite number: {e}") }.build())?;
        let satellite_number_2 = field(line_2, 2, 2..7)?.parse::<u32>().ok();
        ensure!(
            satellite_number_2 == Some(satellite_number),
            TleParseSnafu {
                line: 2_usize,
                msg: "satellite number differs from line 1"
            }
        );

        let two_digit_year = float(line_1, 1, 18..20, "epoch year")? as i32;
        let year = if two_digit_year < 57 {
            2000 + two_digit_year
        } else {
            1900 + two_digit_year
        };
        let day_of_year = float(line_1, 1, 20..32, "epoch day")?;
        let epoch = Epoch::from_gregorian_utc_at_midnight(year, 1, 1) + (day_of_year - 1.0) * Unit::Day;

        let b_star = assumed_decimal(field(line_1, 1, 53..61)?).context(TleParseSnafu {
            line: 1_usize,
            msg: "B* drag term",
        })?;

        let eccentricity = format!("0.{}", field(line_2, 2, 26..33)?.trim())
            .parse::<f64>()
            .map_err(|e| TleParseSnafu { line: 2_usize, msg: format!("eccentricity: {e}") }.build())?;

        Ok(Self {
            name: None,
            satellite_number,
            epoch,
            b_star,
            inclination: float(line_2, 2, 8..16, "inclination")?.to_radians(),
            right_ascension: float(line_2, 2, 17..25, "right ascension")?.to_radians(),
            eccentricity,
            arg_of_perigee: float(line_2, 2, 34..42, "argument of perigee")?.to_radians(),
            mean_anomaly: float(line_2, 2, 43..51, "mean anomaly")?.to_radians(),
            mean_motion: float(line_2, 2, 52..63, "mean motion")? * TAU / SECONDS_PER_DAY,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn satellite_number(&self) -> u32 {
        self.satellite_number
    }

    /// Epoch of the element set (UTC)
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Epoch of the element set, in seconds since J2000 (TDB)
    pub fn epoch_seconds(&self) -> f64 {
        self.epoch.to_tdb_seconds()
    }

    /// B* drag term in inverse Earth radii
    pub fn b_star(&self) -> f64 {
        self.b_star
    }

    pub fn inclination(&self) -> f64 {
        self.inclination
    }

    pub fn right_ascension(&self) -> f64 {
        self.right_ascension
    }

    pub fn eccentricity(&self) -> f64 {
        self.eccentricity
    }

    pub fn arg_of_perigee(&self) -> f64 {
        self.arg_of_perigee
    }

    pub fn mean_anomaly(&self) -> f64 {
        self.mean_anomaly
    }

    /// Mean motion in rad/s
    pub fn mean_motion(&self) -> f64 {
        self.mean_motion
    }

    /// Orbital period in seconds
    pub fn period(&self) -> f64 {
        2.0 * PI / self.mean_motion
    }
}

impl FromStr for Tle {
    type Err = EphemerisError;

    /// Parses a TLE from its two data lines, optionally preceded by a name line.
    fn from_str(lines: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = lines
            .lines()
            .map(str::trim_end)
            .filter(|l| !l.trim().is_empty())
            .collect();
        match lines.as_slice() {
            [line_1, line_2] => Self::from_lines(line_1, line_2),
            [name, line_1, line_2] => {
                let mut tle = Self::from_lines(line_1, line_2)?;
                let name = name.trim().trim_start_matches("0 ").trim();
                tle.name = Some(name.to_string());
                Ok(tle)
            }
            _ => TleParseSnafu {
                line: 0_usize,
                msg: format!("expected two or three lines, got {}", lines.len()),
            }
            .fail(),
        }
    }
}

impl fmt::Display for Tle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TLE #{} @ {}: i = {:.4} deg, e = {:.7}, n = {:.8} rev/day",
            self.satellite_number,
            self.epoch,
            self.inclination.to_degrees(),
            self.eccentricity,
            self.mean_motion * SECONDS_PER_DAY / TAU
        )
    }
}

fn check_line(line: &str, number: usize) -> Result<&str, EphemerisError> {
    let line = line.trim_end();
    ensure!(
        line.is_ascii() && line.len() >= TLE_LINE_LENGTH,
        TleParseSnafu {
            line: number,
            msg: format!("expected at least {TLE_LINE_LENGTH} ASCII characters, got {}", line.len())
        }
    );
    ensure!(
        line.starts_with(&format!("{number} ")),
        TleParseSnafu {
            line: number,
            msg: format!("line must start with `{number} `")
        }
    );
    Ok(line)
}

fn field(line: &str, number: usize, columns: std::ops::Range<usize>) -> Result<&str, EphemerisError> {
    line.get(columns.clone())
        .map(str::trim)
        .context(TleParseSnafu {
            line: number,
            msg: format!("missing columns {}-{}", columns.start + 1, columns.end),
        })
}

fn float(
    line: &str,
    number: usize,
    columns: std::ops::Range<usize>,
    what: &'static str,
) -> Result<f64, EphemerisError> {
    field(line, number, columns)?
        .parse::<f64>()
        .map_err(|e| TleParseSnafu { line: number, msg: format!("{what}: {e}") }.build())
}

/// Parses fields such as ` 34123-4` or `-11606-4`, i.e. +/-.34123e-4 and -.11606e-4.
fn assumed_decimal(field: &str) -> Option<f64> {
    let (sign, digits) = match field.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, field.strip_prefix('+').unwrap_or(field)),
    };
    let split = digits.rfind(['-', '+'])?;
    let mantissa = format!("0.{}", &digits[..split]).parse::<f64>().ok()?;
    let exponent = digits[split..].parse::<i32>().ok()?;
    Some(sign * mantissa * 10_f64.powi(exponent))
}

/// Engine which propagates a TLE with the SGP4 (near Earth) or SDP4 (deep space) theory.
pub trait TlePropagator: Send + Sync + fmt::Debug {
    fn propagate_tle(
        &self,
        tle: &Tle,
        seconds_since_tle_epoch: f64,
        use_sdp: bool,
    ) -> Result<Vector6<f64>, EphemerisError>;
}

#[derive(Clone, Debug, PartialEq, TypedBuilder)]
#[builder(doc)]
pub struct TleEphemerisConfig {
    #[builder(default = String::from("Earth"), setter(into))]
    pub frame_origin: String,
    #[builder(default = String::from("J2000"), setter(into))]
    pub frame_orientation: String,
    #[builder(default, setter(strip_option))]
    pub tle: Option<Tle>,
    /// Use the deep space (SDP4) theory
    #[builder(default = false)]
    pub use_sdp: bool,
}

impl Default for TleEphemerisConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Ephemeris of an Earth satellite from its TLE.
#[derive(Clone, Debug)]
pub struct TleEphemeris {
    config: TleEphemerisConfig,
    propagator: Arc<dyn TlePropagator>,
}

impl TleEphemeris {
    pub fn new(config: TleEphemerisConfig, propagator: Arc<dyn TlePropagator>) -> Self {
        Self { config, propagator }
    }

    pub fn tle(&self) -> Option<&Tle> {
        self.config.tle.as_ref()
    }

    pub fn use_sdp(&self) -> bool {
        self.config.use_sdp
    }
}

impl Ephemeris for TleEphemeris {
    fn reference_frame_origin(&self) -> &str {
        &self.config.frame_origin
    }

    fn reference_frame_orientation(&self) -> &str {
        &self.config.frame_orientation
    }

    fn cartesian_state(&self, seconds_since_epoch: f64) -> Result<Vector6<f64>, EphemerisError> {
        let tle = self.config.tle.as_ref().context(MissingTleSnafu)?;
        self.propagator.propagate_tle(
            tle,
            seconds_since_epoch - tle.epoch_seconds(),
            self.config.use_sdp,
        )
    }
}
