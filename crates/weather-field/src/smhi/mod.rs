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

//! Dataset acquisition from the SMHI open-data API.
//!
//! Produces `wind.json` and `msl.json` for the first valid time of either
//! the PMP forecast or the MESAN analysis:
//!
//! 1. read the valid-time list and the parameter catalogue,
//! 2. download wind direction (`wd`), wind speed (`ws`) and mean sea-level
//!    pressure (`msl`) as multipoint series,
//! 3. convert direction/speed into u/v grids and reorder pressure
//!    coordinates into `[lat, lon, value]` triples.

pub mod convert;

use std::path::Path;

use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use crate::scalar::ScalarSample;
use crate::source::{PRESSURE_FILE, WIND_FILE};
use crate::wind::WindDataset;

/// Base URL of the PMP forecast category.
pub const FORECAST_URL: &str = "https://opendata-download-metfcst.smhi.se/api/category/pmp3g/version/2/";

/// Base URL of the MESAN analysis category.
pub const ANALYSIS_URL: &str =
    "https://opendata-download-metanalys.smhi.se/api/category/mesan1g/version/2/";

/// Errors that can occur while acquiring datasets.
#[derive(Debug, Error)]
pub enum SmhiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no valid times published")]
    NoValidTime,

    #[error("parameter '{0}' not in catalogue")]
    MissingParameter(&'static str),

    #[error("'{0}' series has no values")]
    EmptySeries(&'static str),

    #[error("'{0}' series has no coordinates")]
    MissingGeometry(&'static str),

    #[error("{what}: {coordinates} coordinates but {values} values")]
    LengthMismatch {
        what: &'static str,
        coordinates: usize,
        values: usize,
    },

    #[error("wind grid is {nx}x{ny}, need at least 2x2")]
    DegenerateGrid { nx: usize, ny: usize },

    #[error("invalid valid time '{value}': {reason}")]
    InvalidTime { value: String, reason: String },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode dataset: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Acquisition options.
#[derive(Debug, Clone)]
pub struct SmhiOptions {
    /// Use the MESAN analysis instead of the forecast.
    pub mesan: bool,
    /// Downsampling factor for the wind series.
    pub wind_downsample: u32,
    /// Downsampling factor for the pressure series.
    pub msl_downsample: u32,
}

impl Default for SmhiOptions {
    fn default() -> Self {
        Self {
            mesan: false,
            wind_downsample: 60,
            msl_downsample: 5,
        }
    }
}

impl SmhiOptions {
    #[must_use]
    pub fn base_url(&self) -> &'static str {
        if self.mesan {
            ANALYSIS_URL
        } else {
            FORECAST_URL
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValidTimes {
    valid_time: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Catalogue {
    parameter: Vec<Parameter>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Parameter {
    name: String,
    level_type: String,
    level: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MultiPointData {
    #[serde(default)]
    geometry: Option<Geometry>,
    time_series: Vec<TimeStep>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct TimeStep {
    parameters: Vec<SeriesValues>,
}

#[derive(Debug, Deserialize)]
struct SeriesValues {
    values: Vec<f64>,
}

impl MultiPointData {
    fn first_values(&self, name: &'static str) -> Result<&[f64], SmhiError> {
        self.time_series
            .first()
            .and_then(|step| step.parameters.first())
            .map(|series| series.values.as_slice())
            .ok_or(SmhiError::EmptySeries(name))
    }

    fn coordinates(&self, name: &'static str) -> Result<&[[f64; 2]], SmhiError> {
        self.geometry
            .as_ref()
            .map(|g| g.coordinates.as_slice())
            .ok_or(SmhiError::MissingGeometry(name))
    }
}

/// Both datasets, ready to be written out.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub wind: WindDataset,
    pub pressure: Vec<ScalarSample>,
    /// Local reference time stamped into the wind headers.
    pub ref_time: String,
}

impl Datasets {
    /// Write `wind.json` and `msl.json` into `dir`, creating it if needed.
    pub async fn write_to(&self, dir: &Path) -> Result<(), SmhiError> {
        tokio::fs::create_dir_all(dir).await.map_err(|source| SmhiError::Write {
            path: dir.to_path_buf(),
            source,
        })?;

        for (name, bytes) in [
            (WIND_FILE, serde_json::to_vec(&self.wind)?),
            (PRESSURE_FILE, serde_json::to_vec(&self.pressure)?),
        ] {
            let path = dir.join(name);
            tokio::fs::write(&path, bytes)
                .await
                .map_err(|source| SmhiError::Write { path: path.clone(), source })?;
            info!("Wrote {}", path.display());
        }
        Ok(())
    }
}

/// Client for one SMHI category.
#[derive(Debug, Clone)]
pub struct SmhiClient {
    http: reqwest::Client,
    base_url: String,
}

impl SmhiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SmhiError> {
        let url = format!("{}{path}", self.base_url);
        debug!("GET {url} {query:?}");
        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    async fn series(
        &self,
        compact_time: &str,
        parameter: &Parameter,
        with_geo: bool,
        downsample: u32,
    ) -> Result<MultiPointData, SmhiError> {
        let path = format!(
            "geotype/multipoint/validtime/{compact_time}/parameter/{}/leveltype/{}/level/{}/data.json",
            parameter.name, parameter.level_type, parameter.level
        );
        self.get_json(
            &path,
            &[
                ("with-geo", with_geo.to_string()),
                ("downsample", downsample.to_string()),
            ],
        )
        .await
    }

    /// Download and convert the first valid time.
    pub async fn fetch(&self, options: &SmhiOptions) -> Result<Datasets, SmhiError> {
        let times: ValidTimes = self.get_json("geotype/multipoint/validtime.json", &[]).await?;
        let valid_time = times.valid_time.first().ok_or(SmhiError::NoValidTime)?;
        let compact = convert::compact_valid_time(valid_time);
        info!("Fetching SMHI data for {valid_time}");

        let catalogue: Catalogue = self.get_json("parameter.json", &[]).await?;
        let find = |name: &'static str| {
            catalogue
                .parameter
                .iter()
                .find(|p| p.name == name)
                .ok_or(SmhiError::MissingParameter(name))
        };
        let (wd, ws, msl) = (find("wd")?, find("ws")?, find("msl")?);

        let directions = self.series(&compact, wd, true, options.wind_downsample).await?;
        let speeds = self.series(&compact, ws, false, options.wind_downsample).await?;
        let pressure = self.series(&compact, msl, true, options.msl_downsample).await?;

        let pressure = convert::pressure_samples(pressure.coordinates("msl")?, pressure.first_values("msl")?)?;
        let points = convert::wind_points(
            directions.coordinates("wd")?,
            directions.first_values("wd")?,
            speeds.first_values("ws")?,
        )?;

        let ref_time = convert::local_ref_time(valid_time, &chrono::Local)?;
        let records = convert::wind_records(points, &ref_time)?;
        info!(
            "Converted {} pressure points and a {}x{} wind grid",
            pressure.len(),
            records[0].header.nx,
            records[0].header.ny
        );

        Ok(Datasets {
            wind: WindDataset::from(records),
            pressure,
            ref_time,
        })
    }
}
