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

//! Startup loads of the wind and pressure datasets.
//!
//! Each dataset is fetched by its own task. The tasks share nothing and may
//! finish in either order; each one runs its transform to completion and
//! hands the result to an [`OverlaySink`] exactly once. Failures are logged
//! and otherwise dropped, leaving the matching overlay empty. There is no
//! retry and no cancellation.

use std::path::PathBuf;

use log::{info, warn};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::scalar::{ScalarField, ScalarSample};
use crate::source::{DataSource, PRESSURE_FILE, WIND_FILE};
use crate::wind::WindDataset;

/// Errors that can occur while loading a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("malformed {name}: {source}")]
    Malformed {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A finished load, ready to be bound to its overlay.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadEvent {
    /// The wind dataset, untouched.
    Wind(WindDataset),
    /// The normalized pressure field.
    Pressure(ScalarField),
}

impl LoadEvent {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Wind(_) => WIND_FILE,
            Self::Pressure(_) => PRESSURE_FILE,
        }
    }
}

/// Receiver of finished loads.
///
/// Implementations hand the event to whatever owns the overlays, typically
/// by sending it across a channel to the UI thread.
pub trait OverlaySink: Send + Sync + 'static {
    fn deliver(&self, event: LoadEvent);
}

impl OverlaySink for mpsc::UnboundedSender<LoadEvent> {
    fn deliver(&self, event: LoadEvent) {
        let name = event.name();
        if self.send(event).is_err() {
            warn!("Dropped {name}: overlay receiver is gone");
        }
    }
}

/// Fetch the wind dataset. The payload is parsed but not transformed.
pub async fn load_wind(source: &DataSource) -> Result<WindDataset, LoadError> {
    let bytes = source.fetch(WIND_FILE).await?;
    serde_json::from_slice(&bytes).map_err(|source| LoadError::Malformed {
        name: WIND_FILE,
        source,
    })
}

/// Fetch the pressure samples and normalize them into a [`ScalarField`].
pub async fn load_pressure(source: &DataSource) -> Result<ScalarField, LoadError> {
    let bytes = source.fetch(PRESSURE_FILE).await?;
    let samples: Vec<ScalarSample> =
        serde_json::from_slice(&bytes).map_err(|source| LoadError::Malformed {
            name: PRESSURE_FILE,
            source,
        })?;
    Ok(ScalarField::from_samples(&samples))
}

/// Handles of the two load tasks.
#[derive(Debug)]
pub struct LoadHandles {
    pub wind: JoinHandle<()>,
    pub pressure: JoinHandle<()>,
}

/// Start both loads on the current tokio runtime.
///
/// Fire-and-forget: the handles are returned for callers that want to wait,
/// but nothing needs to await them.
pub fn spawn_loads<S: OverlaySink>(source: DataSource, sink: S) -> LoadHandles {
    let sink = std::sync::Arc::new(sink);

    let wind_source = source.clone();
    let wind_sink = std::sync::Arc::clone(&sink);
    let wind = tokio::spawn(async move {
        match load_wind(&wind_source).await {
            Ok(dataset) => {
                info!("Loaded wind data from {}", wind_source.locate(WIND_FILE));
                wind_sink.deliver(LoadEvent::Wind(dataset));
            }
            Err(e) => warn!("Wind data unavailable: {e}"),
        }
    });

    let pressure = tokio::spawn(async move {
        match load_pressure(&source).await {
            Ok(field) => {
                info!(
                    "Loaded {} pressure points from {} (min {}, max {})",
                    field.len(),
                    source.locate(PRESSURE_FILE),
                    field.min,
                    field.max
                );
                sink.deliver(LoadEvent::Pressure(field));
            }
            Err(e) => warn!("Pressure data unavailable: {e}"),
        }
    });

    LoadHandles { wind, pressure }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::Path;

    fn write_datasets(dir: &Path, wind: &serde_json::Value, msl: &str) {
        std::fs::write(dir.join(WIND_FILE), serde_json::to_vec(wind).unwrap()).unwrap();
        std::fs::write(dir.join(PRESSURE_FILE), msl).unwrap();
    }

    fn sample_wind() -> serde_json::Value {
        json!([
            {"header": {"parameterCategory": 2, "parameterNumber": 2, "refTime": "2023-04-05T12:30:00Z"}, "data": [1.5, -2]},
            {"header": {"parameterCategory": 2, "parameterNumber": 3, "refTime": "2023-04-05T12:30:00Z"}, "data": [0, 3.25]}
        ])
    }

    #[tokio::test]
    async fn test_wind_passes_through_unmodified() {
        let dir = tempfile::tempdir().unwrap();
        let raw = sample_wind();
        write_datasets(dir.path(), &raw, "[]");

        let dataset = load_wind(&DataSource::Directory(dir.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(dataset.as_json(), &raw);
        assert_eq!(dataset.ref_time(), Some("2023-04-05T12:30:00Z"));
    }

    #[tokio::test]
    async fn test_pressure_is_normalized() {
        let dir = tempfile::tempdir().unwrap();
        write_datasets(dir.path(), &json!([]), "[[10,20,5],[11,21,15000],[12,22,-3]]");

        let field = load_pressure(&DataSource::Directory(dir.path().to_path_buf()))
            .await
            .unwrap();
        assert_eq!(field.min, -3.0);
        assert_eq!(field.max, 15_000.0);
        assert_eq!(field.len(), 3);
    }

    #[tokio::test]
    async fn test_malformed_pressure() {
        let dir = tempfile::tempdir().unwrap();
        write_datasets(dir.path(), &json!([]), r#"[[10,20],{"lat":1}]"#);

        let result = load_pressure(&DataSource::Directory(dir.path().to_path_buf())).await;
        assert!(matches!(
            result,
            Err(LoadError::Malformed { name: PRESSURE_FILE, .. })
        ));
    }

    #[tokio::test]
    async fn test_spawn_loads_delivers_both_events() {
        let dir = tempfile::tempdir().unwrap();
        let raw = sample_wind();
        write_datasets(dir.path(), &raw, "[[60,15,1000],[61,16,1020]]");

        let (tx, mut rx) = mpsc::unbounded_channel();
        let handles = spawn_loads(DataSource::Directory(dir.path().to_path_buf()), tx);
        handles.wind.await.unwrap();
        handles.pressure.await.unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(events.len(), 2);
        assert!(events.contains(&LoadEvent::Wind(WindDataset::new(raw))));
        assert!(events.iter().any(|e| matches!(
            e,
            LoadEvent::Pressure(field) if field.min == 1000.0 && field.max == 1020.0
        )));
    }

    #[tokio::test]
    async fn test_failed_load_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(PRESSURE_FILE), "[]").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        let handles = spawn_loads(DataSource::Directory(dir.path().to_path_buf()), tx);
        handles.wind.await.unwrap();
        handles.pressure.await.unwrap();

        assert_eq!(rx.try_recv().unwrap(), LoadEvent::Pressure(ScalarField::default()));
        assert!(rx.try_recv().is_err());
    }
}
