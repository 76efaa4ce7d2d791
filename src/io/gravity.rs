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

use super::{EmptyDataSnafu, InputOutputError, StdIOSnafu};
use crate::linalg::DMatrix;
use flate2::read::GzDecoder;
use snafu::prelude::*;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Layout of the gravity potential file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PotentialFileFormat {
    /// PDS SHADR file: a header line (reference radius and GM in km, km^3/s^2), then `n, m, C, S, ...` lines.
    Shadr,
    /// EGM style file: `n m C S ...` lines without header, exponents may use `D`.
    Egm,
}

/// Normalized coefficients loaded from a potential file, indexed as `(degree, order)`.
#[derive(Clone, Debug, PartialEq)]
pub struct HarmonicsCoefficients {
    pub cosine: DMatrix<f64>,
    pub sine: DMatrix<f64>,
    /// Reference radius in meters, if the file provides one
    pub reference_radius_m: Option<f64>,
    /// Gravitational parameter in m^3/s^2, if the file provides one
    pub gravitational_parameter_m3_s2: Option<f64>,
}

impl HarmonicsCoefficients {
    pub fn max_degree(&self) -> usize {
        self.cosine.nrows().saturating_sub(1)
    }

    pub fn max_order(&self) -> usize {
        self.cosine.ncols().saturating_sub(1)
    }
}

/// Loads the coefficients up to the requested degree and order from the file, which may be gunzipped.
pub fn load_coefficients<P: AsRef<Path>>(
    path: P,
    format: PotentialFileFormat,
    degree: usize,
    order: usize,
    gunzipped: bool,
) -> Result<HarmonicsCoefficients, InputOutputError> {
    let path_str = path.as_ref().display().to_string();
    let mut f = File::open(&path).context(StdIOSnafu {
        action: "opening gravity potential file",
    })?;
    let mut buffer = Vec::new();
    if gunzipped {
        let mut d = GzDecoder::new(f);
        d.read_to_end(&mut buffer).context(StdIOSnafu {
            action: "decompressing gravity potential file",
        })?;
    } else {
        f.read_to_end(&mut buffer).context(StdIOSnafu {
            action: "reading gravity potential file",
        })?;
    }
    let data = String::from_utf8(buffer).map_err(|_| InputOutputError::NotUtf8 {
        path: path_str.clone(),
    })?;

    parse_coefficients(&data, format, degree, order, &path_str)
}

/// Parses the coefficients from the contents of a potential file. Unparsable lines are ignored.
pub fn parse_coefficients(
    data: &str,
    format: PotentialFileFormat,
    degree: usize,
    order: usize,
    source_name: &str,
) -> Result<HarmonicsCoefficients, InputOutputError> {
    let mut entries = Vec::new();
    let mut max_degree = 0;
    let mut max_order = 0;
    let mut reference_radius_m = None;
    let mut gravitational_parameter_m3_s2 = None;

    for (lno, line) in data.lines().enumerate() {
        if lno == 0 && format == PotentialFileFormat::Shadr {
            let header: Vec<f64> = line
                .split(',')
                .take(2)
                .filter_map(|item| parse_float(item.trim()))
                .collect();
            if header.len() == 2 {
                reference_radius_m = Some(header[0] * 1e3);
                gravitational_parameter_m3_s2 = Some(header[1] * 1e9);
            }
            continue;
        }

        let items: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|item| !item.is_empty())
            .collect();
        if items.len() < 4 {
            continue;
        }

        let (cur_degree, cur_order) = match (usize::from_str(items[0]), usize::from_str(items[1])) {
            (Ok(n), Ok(m)) => (n, m),
            _ => {
                debug!("could not parse degree and order on line {lno} -- ignoring line");
                continue;
            }
        };

        let (c_nm, s_nm) = match (parse_float(items[2]), parse_float(items[3])) {
            (Some(c_nm), Some(s_nm)) => (c_nm, s_nm),
            _ => {
                warn!("could not parse C_nm and S_nm on line {lno} -- ignoring line");
                continue;
            }
        };

        if cur_degree > degree {
            // The file is sorted by degree, so nothing else is needed past this point.
            break;
        }

        if cur_order <= order {
            max_degree = max_degree.max(cur_degree);
            max_order = max_order.max(cur_order);
            entries.push((cur_degree, cur_order, c_nm, s_nm));
        }
    }

    ensure!(
        !entries.is_empty(),
        EmptyDataSnafu {
            path: source_name.to_string()
        }
    );

    if max_degree < degree || max_order < order {
        warn!(
            "{source_name} only contained (degree, order) of ({max_degree}, {max_order}) instead of requested ({degree}, {order})"
        );
    } else {
        info!("{source_name} loaded with (degree, order) = ({degree}, {order})");
    }

    let mut cosine = DMatrix::zeros(max_degree + 1, max_order + 1);
    let mut sine = DMatrix::zeros(max_degree + 1, max_order + 1);
    for (n, m, c_nm, s_nm) in entries {
        cosine[(n, m)] = c_nm;
        sine[(n, m)] = s_nm;
    }

    Ok(HarmonicsCoefficients {
        cosine,
        sine,
        reference_radius_m,
        gravitational_parameter_m3_s2,
    })
}

fn parse_float(item: &str) -> Option<f64> {
    f64::from_str(&item.replace(['D', 'd'], "E")).ok()
}
