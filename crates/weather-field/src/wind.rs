// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Gridded wind data in the GRIB-to-JSON layout used by velocity overlays.
//!
//! A dataset is an array of records, each a `header` describing a regular
//! lat/lon grid plus a flat `data` array. Record `parameterNumber` 2 holds
//! the eastward (u) component and 3 the northward (v) component, both in
//! m/s. Rows run north to south starting at `la1`, columns west to east
//! starting at `lo1`.
//!
//! [`WindDataset`] keeps the payload as parsed JSON so it reaches the
//! overlay untouched. Typed access goes through [`WindRecord`] views and
//! [`VelocityGrid`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// GRIB parameter category for momentum.
pub const MOMENTUM_CATEGORY: u32 = 2;
/// GRIB parameter number for the u component of wind.
pub const U_COMPONENT: u32 = 2;
/// GRIB parameter number for the v component of wind.
pub const V_COMPONENT: u32 = 3;

/// Errors building a [`VelocityGrid`] from a dataset.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("wind records do not match the expected layout: {0}")]
    Layout(#[from] serde_json::Error),

    #[error("missing {0} component record")]
    MissingComponent(&'static str),

    #[error("invalid grid geometry: {0}")]
    Geometry(String),
}

/// A wind dataset exactly as it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindDataset(serde_json::Value);

impl WindDataset {
    #[must_use]
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// The raw JSON payload.
    #[must_use]
    pub fn as_json(&self) -> &serde_json::Value {
        &self.0
    }

    /// `refTime` of the first record's header, if present.
    #[must_use]
    pub fn ref_time(&self) -> Option<&str> {
        self.0.get(0)?.get("header")?.get("refTime")?.as_str()
    }

    /// Deserialize typed views of every record.
    pub fn records(&self) -> Result<Vec<WindRecord>, serde_json::Error> {
        Vec::<WindRecord>::deserialize(&self.0)
    }
}

impl From<Vec<WindRecord>> for WindDataset {
    fn from(records: Vec<WindRecord>) -> Self {
        // Serializing plain structs of numbers and strings cannot fail.
        Self(serde_json::to_value(records).unwrap_or_default())
    }
}

/// Grid description carried by every wind record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindHeader {
    pub parameter_category: u32,
    pub parameter_number: u32,
    /// Longitude of the first grid column.
    pub lo1: f64,
    /// Latitude of the first grid row.
    pub la1: f64,
    pub dx: f64,
    pub dy: f64,
    pub nx: usize,
    pub ny: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_time: Option<String>,
}

/// One component grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindRecord {
    pub header: WindHeader,
    pub data: Vec<f64>,
}

impl WindRecord {
    fn is_component(&self, number: u32) -> bool {
        self.header.parameter_category == MOMENTUM_CATEGORY
            && self.header.parameter_number == number
    }
}

/// A wind sample: eastward `u` and northward `v` in m/s.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindVector {
    pub u: f64,
    pub v: f64,
}

const CARDINALS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

impl WindVector {
    #[must_use]
    pub const fn new(u: f64, v: f64) -> Self {
        Self { u, v }
    }

    /// Build from meteorological direction (degrees the wind blows from)
    /// and speed.
    #[must_use]
    pub fn from_direction(direction_deg: f64, speed: f64) -> Self {
        let mut theta = 270.0 - direction_deg;
        if theta < 0.0 {
            theta += 360.0;
        }
        let theta = theta.to_radians();
        Self {
            u: speed * theta.cos(),
            v: speed * theta.sin(),
        }
    }

    #[must_use]
    pub fn speed(&self) -> f64 {
        self.u.hypot(self.v)
    }

    /// Direction the wind blows from, degrees clockwise from north in `[0, 360)`.
    #[must_use]
    pub fn direction(&self) -> f64 {
        (270.0 - self.v.atan2(self.u).to_degrees()).rem_euclid(360.0)
    }

    /// 16-point compass name for [`Self::direction`].
    #[must_use]
    pub fn cardinal(&self) -> &'static str {
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "direction is in [0, 360) so the sector index is 0..=16"
        )]
        let sector = ((self.direction() / 22.5).round() as usize) % CARDINALS.len();
        CARDINALS[sector]
    }
}

/// Interpolating lookup over the u/v component grids.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityGrid {
    lo1: f64,
    la1: f64,
    dx: f64,
    dy: f64,
    nx: usize,
    ny: usize,
    u: Vec<f64>,
    v: Vec<f64>,
}

impl VelocityGrid {
    /// Pair the u and v records of a dataset into one grid.
    pub fn from_dataset(dataset: &WindDataset) -> Result<Self, GridError> {
        let records = dataset.records()?;
        Self::from_records(&records)
    }

    pub fn from_records(records: &[WindRecord]) -> Result<Self, GridError> {
        let u = records
            .iter()
            .find(|r| r.is_component(U_COMPONENT))
            .ok_or(GridError::MissingComponent("u"))?;
        let v = records
            .iter()
            .find(|r| r.is_component(V_COMPONENT))
            .ok_or(GridError::MissingComponent("v"))?;

        let h = &u.header;
        if h.nx == 0 || h.ny == 0 {
            return Err(GridError::Geometry(format!("{}x{} grid", h.nx, h.ny)));
        }
        if !(h.dx.is_finite() && h.dy.is_finite()) || h.dx <= 0.0 || h.dy <= 0.0 {
            return Err(GridError::Geometry(format!("spacing dx={} dy={}", h.dx, h.dy)));
        }
        let cells = h
            .nx
            .checked_mul(h.ny)
            .ok_or_else(|| GridError::Geometry(format!("{}x{} grid", h.nx, h.ny)))?;
        if u.data.len() < cells || v.data.len() < cells {
            return Err(GridError::Geometry(format!(
                "expected {cells} values, got u={} v={}",
                u.data.len(),
                v.data.len()
            )));
        }

        Ok(Self {
            lo1: h.lo1,
            la1: h.la1,
            dx: h.dx,
            dy: h.dy,
            nx: h.nx,
            ny: h.ny,
            u: u.data[..cells].to_vec(),
            v: v.data[..cells].to_vec(),
        })
    }

    /// Geographic extent as `(west, south, east, north)`.
    #[must_use]
    #[allow(clippy::cast_precision_loss, reason = "grid dimensions are small")]
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let east = self.lo1 + (self.nx - 1) as f64 * self.dx;
        let south = self.la1 - (self.ny - 1) as f64 * self.dy;
        (self.lo1, south, east, self.la1)
    }

    /// Bilinearly interpolated wind at a position, `None` outside the grid.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "indices are range-checked against the grid before conversion"
    )]
    pub fn sample(&self, lon: f64, lat: f64) -> Option<WindVector> {
        let i = (lon - self.lo1) / self.dx;
        let j = (self.la1 - lat) / self.dy;
        let max_i = (self.nx - 1) as f64;
        let max_j = (self.ny - 1) as f64;
        if !(0.0..=max_i).contains(&i) || !(0.0..=max_j).contains(&j) {
            return None;
        }

        let i0 = i.floor() as usize;
        let j0 = j.floor() as usize;
        let i1 = (i0 + 1).min(self.nx - 1);
        let j1 = (j0 + 1).min(self.ny - 1);
        let fi = i - i0 as f64;
        let fj = j - j0 as f64;

        let bilinear = |grid: &[f64]| {
            let g00 = grid[j0 * self.nx + i0];
            let g10 = grid[j0 * self.nx + i1];
            let g01 = grid[j1 * self.nx + i0];
            let g11 = grid[j1 * self.nx + i1];
            let top = g00 * (1.0 - fi) + g10 * fi;
            let bottom = g01 * (1.0 - fi) + g11 * fi;
            top * (1.0 - fj) + bottom * fj
        };

        let u = bilinear(&self.u);
        let v = bilinear(&self.v);
        if u.is_nan() || v.is_nan() {
            return None;
        }
        Some(WindVector { u, v })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn header(number: u32) -> WindHeader {
        WindHeader {
            parameter_category: 2,
            parameter_number: number,
            lo1: 10.0,
            la1: 60.0,
            dx: 1.0,
            dy: 1.0,
            nx: 2,
            ny: 2,
            ref_time: Some("2024-11-04T18:00:00".to_string()),
        }
    }

    fn dataset() -> WindDataset {
        WindDataset::from(vec![
            WindRecord {
                header: header(2),
                data: vec![0.0, 2.0, 4.0, 6.0],
            },
            WindRecord {
                header: header(3),
                data: vec![1.0, 1.0, 1.0, 1.0],
            },
        ])
    }

    #[test]
    fn test_ref_time_from_first_header() {
        assert_eq!(dataset().ref_time(), Some("2024-11-04T18:00:00"));
        assert_eq!(WindDataset::new(json!([])).ref_time(), None);
        assert_eq!(WindDataset::new(json!({"header": {}})).ref_time(), None);
    }

    #[test]
    fn test_dataset_keeps_unknown_fields() {
        let raw = json!([{
            "header": {"refTime": "2023-04-05T12:30:00Z", "centerName": "SMHI", "nx": 1},
            "data": [1],
            "meta": {"date": "2023-04-05"}
        }]);
        let dataset: WindDataset = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(dataset.as_json(), &raw);
        assert_eq!(serde_json::to_value(&dataset).unwrap(), raw);
    }

    #[test]
    fn test_grid_corners_and_center() {
        let grid = VelocityGrid::from_dataset(&dataset()).unwrap();

        assert_eq!(grid.sample(10.0, 60.0), Some(WindVector::new(0.0, 1.0)));
        assert_eq!(grid.sample(11.0, 60.0), Some(WindVector::new(2.0, 1.0)));
        assert_eq!(grid.sample(10.0, 59.0), Some(WindVector::new(4.0, 1.0)));

        let center = grid.sample(10.5, 59.5).unwrap();
        assert!((center.u - 3.0).abs() < 1e-12);
        assert!((center.v - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_grid_outside_is_none() {
        let grid = VelocityGrid::from_dataset(&dataset()).unwrap();
        assert_eq!(grid.sample(9.9, 60.0), None);
        assert_eq!(grid.sample(10.0, 60.5), None);
        assert_eq!(grid.sample(12.0, 59.0), None);
        assert_eq!(grid.bounds(), (10.0, 59.0, 11.0, 60.0));
    }

    #[test]
    fn test_grid_requires_both_components() {
        let only_u = WindDataset::from(vec![WindRecord {
            header: header(2),
            data: vec![0.0; 4],
        }]);
        assert!(matches!(
            VelocityGrid::from_dataset(&only_u),
            Err(GridError::MissingComponent("v"))
        ));
    }

    #[test]
    fn test_grid_rejects_short_data() {
        let records = vec![
            WindRecord {
                header: header(2),
                data: vec![0.0; 3],
            },
            WindRecord {
                header: header(3),
                data: vec![0.0; 4],
            },
        ];
        assert!(matches!(
            VelocityGrid::from_records(&records),
            Err(GridError::Geometry(_))
        ));
    }

    #[test]
    fn test_grid_rejects_overflowing_dimensions() {
        let record = |number: u32| {
            json!({
                "header": {
                    "parameterCategory": 2, "parameterNumber": number,
                    "lo1": 10.0, "la1": 60.0, "dx": 1.0, "dy": 1.0,
                    "nx": usize::MAX, "ny": 2
                },
                "data": [1.0]
            })
        };
        let dataset = WindDataset::new(json!([record(2), record(3)]));
        assert!(matches!(
            VelocityGrid::from_dataset(&dataset),
            Err(GridError::Geometry(_))
        ));
    }

    #[test]
    fn test_wind_vector_from_direction() {
        // Wind from the west blows towards the east.
        let west = WindVector::from_direction(270.0, 5.0);
        assert!((west.u - 5.0).abs() < 1e-9);
        assert!(west.v.abs() < 1e-9);

        // Wind from the north blows towards the south.
        let north = WindVector::from_direction(0.0, 3.0);
        assert!(north.u.abs() < 1e-9);
        assert!((north.v + 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_direction_and_cardinal() {
        for deg in [0.0, 45.0, 135.0, 200.0, 315.0] {
            let vector = WindVector::from_direction(deg, 7.0);
            assert!((vector.speed() - 7.0).abs() < 1e-9);
            assert!((vector.direction() - deg).abs() < 1e-6 || (vector.direction() - 360.0 - deg).abs() < 1e-6);
        }
        assert_eq!(WindVector::from_direction(0.0, 1.0).cardinal(), "N");
        assert_eq!(WindVector::from_direction(135.0, 1.0).cardinal(), "SE");
        assert_eq!(WindVector::from_direction(350.0, 1.0).cardinal(), "N");
        assert_eq!(WindVector::from_direction(292.5, 1.0).cardinal(), "WNW");
    }
}
