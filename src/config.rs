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

//! Application configuration management.
//!
//! This module handles persistent configuration storage using TOML format.
//! Every field has a serde default, so a partial or missing file yields the
//! stock map: Sweden at zoom 5 with the pressure heatmap and white wind
//! particles.

use serde::{Deserialize, Serialize};
use weather_field::smhi::SmhiOptions;

use crate::map::controls::ControlPosition;

pub const APP_NAME: &str = "windmap-desktop";
const CONFIG_NAME: &str = "config";

/// Default dataset location (a directory next to the working directory)
pub const DEFAULT_DATA_SOURCE: &str = "./data";

/// One color stop of the heatmap gradient
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GradientStop {
    /// Position in the normalized value range (0.0 - 1.0)
    pub offset: f32,
    /// CSS-style color: a name, `#rrggbb` or `rgb(r, g, b)`
    pub color: String,
}

impl GradientStop {
    fn new(offset: f32, color: &str) -> Self {
        Self {
            offset,
            color: color.to_string(),
        }
    }
}

/// Pressure heatmap styling
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HeatmapSettings {
    /// Point radius in pixels
    #[serde(default = "default_radius")]
    pub radius: f32,

    /// Opacity of a single point (0.0 - 1.0)
    #[serde(default = "default_max_opacity")]
    pub max_opacity: f32,

    /// Gradient stops, ascending by offset
    #[serde(default = "default_gradient")]
    pub gradient: Vec<GradientStop>,
}

impl Default for HeatmapSettings {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            max_opacity: default_max_opacity(),
            gradient: default_gradient(),
        }
    }
}

/// Wind particle styling and the value readout
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VelocitySettings {
    /// Show speed/direction under the pointer
    #[serde(default = "default_true")]
    pub display_values: bool,

    /// Label used in the readout
    #[serde(default = "default_velocity_type")]
    pub velocity_type: String,

    /// Corner of the readout
    #[serde(default = "default_readout_position")]
    pub position: ControlPosition,

    /// Readout text when there is no wind under the pointer
    #[serde(default = "default_empty_string")]
    pub empty_string: String,

    /// Append the compass point to the direction
    #[serde(default = "default_true")]
    pub show_cardinal: bool,

    /// Speed (m/s) mapped to the first color of the scale
    #[serde(default)]
    pub min_velocity: f32,

    /// Speed (m/s) mapped to the last color of the scale
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f32,

    /// Particle displacement per frame per m/s, in hundreds of screen pixels
    #[serde(default = "default_velocity_scale")]
    pub velocity_scale: f32,

    /// Particle colors from slow to fast
    #[serde(default = "default_color_scale")]
    pub color_scale: Vec<String>,
}

impl Default for VelocitySettings {
    fn default() -> Self {
        Self {
            display_values: true,
            velocity_type: default_velocity_type(),
            position: default_readout_position(),
            empty_string: default_empty_string(),
            show_cardinal: true,
            min_velocity: 0.0,
            max_velocity: default_max_velocity(),
            velocity_scale: default_velocity_scale(),
            color_scale: default_color_scale(),
        }
    }
}

/// SMHI acquisition settings for the `fetch` command
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SmhiSettings {
    /// Use the MESAN analysis instead of the PMP forecast
    #[serde(default)]
    pub mesan: bool,

    #[serde(default = "default_wind_downsample")]
    pub wind_downsample: u32,

    #[serde(default = "default_msl_downsample")]
    pub msl_downsample: u32,
}

impl Default for SmhiSettings {
    fn default() -> Self {
        Self {
            mesan: false,
            wind_downsample: default_wind_downsample(),
            msl_downsample: default_msl_downsample(),
        }
    }
}

impl From<&SmhiSettings> for SmhiOptions {
    fn from(settings: &SmhiSettings) -> Self {
        Self {
            mesan: settings.mesan,
            wind_downsample: settings.wind_downsample,
            msl_downsample: settings.msl_downsample,
        }
    }
}

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Configuration schema version
    #[serde(default = "default_config_version")]
    pub config_version: u32,

    /// Directory or http(s) base URL holding wind.json and msl.json
    #[serde(default = "default_data_source")]
    pub data_source: String,

    /// Initial map center latitude
    #[serde(default = "default_center_latitude")]
    pub center_latitude: f64,

    /// Initial map center longitude
    #[serde(default = "default_center_longitude")]
    pub center_longitude: f64,

    /// Initial map zoom level
    #[serde(default = "default_zoom")]
    pub default_zoom: f64,

    /// Basemap tile URL template with `{s}`, `{z}`, `{x}` and `{y}` placeholders
    #[serde(default = "default_basemap_url")]
    pub basemap_url: String,

    #[serde(default)]
    pub heatmap: HeatmapSettings,

    #[serde(default)]
    pub velocity: VelocitySettings,

    #[serde(default)]
    pub smhi: SmhiSettings,
}

// Default value functions for serde
fn default_config_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_data_source() -> String {
    DEFAULT_DATA_SOURCE.to_string()
}

fn default_center_latitude() -> f64 {
    62.386_843_596_239_835 // Sweden midpoint
}

fn default_center_longitude() -> f64 {
    16.321_264_465_847_57
}

fn default_zoom() -> f64 {
    5.0
}

fn default_basemap_url() -> String {
    "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}.png".to_string()
}

fn default_radius() -> f32 {
    7.0
}

fn default_max_opacity() -> f32 {
    0.2
}

fn default_gradient() -> Vec<GradientStop> {
    vec![
        GradientStop::new(0.25, "blue"),
        GradientStop::new(0.5, "green"),
        GradientStop::new(0.95, "red"),
    ]
}

fn default_velocity_type() -> String {
    "Wind".to_string()
}

fn default_readout_position() -> ControlPosition {
    ControlPosition::BottomLeft
}

fn default_empty_string() -> String {
    "No wind data".to_string()
}

fn default_max_velocity() -> f32 {
    10.0
}

fn default_velocity_scale() -> f32 {
    0.008
}

fn default_color_scale() -> Vec<String> {
    vec!["rgb(255,255, 255)".to_string()]
}

fn default_wind_downsample() -> u32 {
    60
}

fn default_msl_downsample() -> u32 {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_version: default_config_version(),
            data_source: default_data_source(),
            center_latitude: default_center_latitude(),
            center_longitude: default_center_longitude(),
            default_zoom: default_zoom(),
            basemap_url: default_basemap_url(),
            heatmap: HeatmapSettings::default(),
            velocity: VelocitySettings::default(),
            smhi: SmhiSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from disk, writing the defaults on first run
    pub fn load() -> Result<Self, confy::ConfyError> {
        confy::load(APP_NAME, CONFIG_NAME)
    }

    /// Get the config file path for display to user
    pub fn get_config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_map() {
        let config = AppConfig::default();
        assert_eq!(config.default_zoom, 5.0);
        assert!((config.center_latitude - 62.386_843_596_239_835).abs() < 1e-12);
        assert_eq!(config.heatmap.radius, 7.0);
        assert_eq!(config.heatmap.max_opacity, 0.2);
        assert_eq!(config.heatmap.gradient.len(), 3);
        assert_eq!(config.velocity.max_velocity, 10.0);
        assert_eq!(config.velocity.velocity_scale, 0.008);
        assert_eq!(config.velocity.empty_string, "No wind data");
        assert_eq!(config.velocity.position, ControlPosition::BottomLeft);
        assert_eq!(config.smhi, SmhiSettings::default());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{"data_source": "https://example.com/wx", "heatmap": {"radius": 12.0}}"#,
        )
        .unwrap();
        assert_eq!(config.data_source, "https://example.com/wx");
        assert_eq!(config.heatmap.radius, 12.0);
        assert_eq!(config.heatmap.max_opacity, 0.2);
        assert_eq!(config.velocity, VelocitySettings::default());
        assert_eq!(config.default_zoom, 5.0);
    }

    #[test]
    fn test_smhi_options_from_settings() {
        let settings = SmhiSettings {
            mesan: true,
            wind_downsample: 10,
            msl_downsample: 2,
        };
        let options = SmhiOptions::from(&settings);
        assert!(options.mesan);
        assert_eq!(options.wind_downsample, 10);
        assert_eq!(options.msl_downsample, 2);
    }
}
