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

//! Wind and pressure fields for weather map overlays.
//!
//! This library covers everything between the data files and the map:
//!
//! - **Data model**: [`WindDataset`] (opaque velocity payload with typed
//!   views) and [`ScalarField`] (heatmap points with their value range)
//! - **Loading**: one async task per dataset, each delivering a
//!   [`LoadEvent`] to an [`OverlaySink`] when it completes
//! - **Acquisition**: the [`smhi`] module builds `wind.json` and `msl.json`
//!   from the SMHI open-data API
//!
//! # Quick Start
//!
//! ```no_run
//! use weather_field::{spawn_loads, DataSource, LoadEvent};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (tx, mut rx) = mpsc::unbounded_channel();
//!     let source = DataSource::parse("./data").unwrap();
//!     spawn_loads(source, tx);
//!
//!     while let Some(event) = rx.recv().await {
//!         match event {
//!             LoadEvent::Wind(wind) => println!("wind as of {:?}", wind.ref_time()),
//!             LoadEvent::Pressure(field) => println!("{} pressure points", field.len()),
//!         }
//!     }
//! }
//! ```
//!
//! # Normalizing pressure samples
//!
//! ```
//! use weather_field::{ScalarField, ScalarSample};
//!
//! let field = ScalarField::from_samples(&[
//!     ScalarSample::new(62.4, 16.3, 1012.0),
//!     ScalarSample::new(58.0, 11.0, 1003.5),
//! ]);
//! assert_eq!(field.min, 1003.5);
//! assert_eq!(field.max, 1012.0);
//! ```

pub mod loader;
pub mod scalar;
pub mod smhi;
pub mod source;
pub mod timestamp;
pub mod wind;

pub use loader::{load_pressure, load_wind, spawn_loads, LoadError, LoadEvent, LoadHandles, OverlaySink};
pub use scalar::{ScalarField, ScalarPoint, ScalarSample};
pub use source::{DataSource, PRESSURE_FILE, WIND_FILE};
pub use timestamp::reference_label;
pub use wind::{GridError, VelocityGrid, WindDataset, WindHeader, WindRecord, WindVector};
