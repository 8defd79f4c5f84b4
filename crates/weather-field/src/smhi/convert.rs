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

//! Conversion of SMHI multipoint series into overlay datasets.

use chrono::{DateTime, TimeZone, Utc};

use super::SmhiError;
use crate::scalar::ScalarSample;
use crate::wind::{WindHeader, WindRecord, WindVector, MOMENTUM_CATEGORY, U_COMPONENT, V_COMPONENT};

/// One wind observation on the SMHI grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindPoint {
    pub lon: f64,
    pub lat: f64,
    /// Degrees the wind blows from.
    pub direction: f64,
    /// m/s.
    pub speed: f64,
}

/// Zip `[lon, lat]` coordinates with values into `[lat, lon, value]` samples.
pub fn pressure_samples(coordinates: &[[f64; 2]], values: &[f64]) -> Result<Vec<ScalarSample>, SmhiError> {
    if coordinates.len() != values.len() {
        return Err(SmhiError::LengthMismatch {
            what: "pressure",
            coordinates: coordinates.len(),
            values: values.len(),
        });
    }
    Ok(coordinates
        .iter()
        .zip(values)
        .map(|(&[lon, lat], &value)| ScalarSample::new(lat, lon, value))
        .collect())
}

/// Combine coordinates with direction and speed series.
pub fn wind_points(
    coordinates: &[[f64; 2]],
    directions: &[f64],
    speeds: &[f64],
) -> Result<Vec<WindPoint>, SmhiError> {
    if coordinates.len() != directions.len() || coordinates.len() != speeds.len() {
        return Err(SmhiError::LengthMismatch {
            what: "wind",
            coordinates: coordinates.len(),
            values: directions.len().min(speeds.len()),
        });
    }
    Ok(coordinates
        .iter()
        .zip(directions.iter().zip(speeds))
        .map(|(&[lon, lat], (&direction, &speed))| WindPoint {
            lon,
            lat,
            direction,
            speed,
        })
        .collect())
}

/// Number of columns: points arrive row by row with longitude increasing,
/// so the first drop in longitude marks the start of the second row.
#[must_use]
pub fn grid_columns(points: &[WindPoint]) -> usize {
    points
        .windows(2)
        .position(|pair| pair[1].lon < pair[0].lon)
        .map_or(points.len(), |index| index + 1)
}

/// Order points north to south, then west to east.
pub fn sort_rows(points: &mut [WindPoint]) {
    points.sort_by(|a, b| b.lat.total_cmp(&a.lat).then(a.lon.total_cmp(&b.lon)));
}

/// Build the u and v records of the wind dataset.
pub fn wind_records(mut points: Vec<WindPoint>, ref_time: &str) -> Result<Vec<WindRecord>, SmhiError> {
    let nx = grid_columns(&points);
    let ny = if nx == 0 { 0 } else { points.len() / nx };
    if nx < 2 || ny < 2 {
        return Err(SmhiError::DegenerateGrid { nx, ny });
    }

    sort_rows(&mut points);

    let (mut min_lon, mut max_lon) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_lat, mut max_lat) = (f64::INFINITY, f64::NEG_INFINITY);
    let mut u = Vec::with_capacity(points.len());
    let mut v = Vec::with_capacity(points.len());
    for point in &points {
        min_lon = min_lon.min(point.lon);
        max_lon = max_lon.max(point.lon);
        min_lat = min_lat.min(point.lat);
        max_lat = max_lat.max(point.lat);

        let vector = WindVector::from_direction(point.direction, point.speed);
        u.push(vector.u);
        v.push(vector.v);
    }

    #[allow(clippy::cast_precision_loss, reason = "grid dimensions are small")]
    let header_u = WindHeader {
        parameter_category: MOMENTUM_CATEGORY,
        parameter_number: U_COMPONENT,
        lo1: min_lon,
        la1: max_lat,
        dx: ((min_lon - max_lon) / (nx - 1) as f64).abs(),
        dy: ((min_lat - max_lat) / (ny - 1) as f64).abs(),
        nx,
        ny,
        ref_time: Some(ref_time.to_string()),
    };
    let header_v = WindHeader {
        parameter_number: V_COMPONENT,
        ..header_u.clone()
    };

    Ok(vec![
        WindRecord { header: header_u, data: u },
        WindRecord { header: header_v, data: v },
    ])
}

/// SMHI valid-time path segment: `2024-11-04T17:00:00Z` -> `20241104T170000Z`.
#[must_use]
pub fn compact_valid_time(valid_time: &str) -> String {
    valid_time.replace(['-', ':'], "")
}

/// Convert a UTC valid time to `tz`, formatted without an offset.
pub fn local_ref_time<Tz: TimeZone>(valid_time: &str, tz: &Tz) -> Result<String, SmhiError>
where
    Tz::Offset: std::fmt::Display,
{
    let utc = DateTime::parse_from_rfc3339(valid_time)
        .map_err(|e| SmhiError::InvalidTime {
            value: valid_time.to_string(),
            reason: e.to_string(),
        })?
        .with_timezone(&Utc);
    Ok(utc.with_timezone(tz).format("%Y-%m-%dT%H:%M:%S").to_string())
}
