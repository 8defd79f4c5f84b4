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

//! The map view: basemap tiles, data overlays and controls, composed once
//! at startup and drawn every frame.

use eframe::egui;
use log::{info, warn};
use walkers::{lon_lat, HttpOptions, HttpTiles, Map, MapMemory, Position};

use super::basemap::BasemapSource;
use super::controls::ControlLayer;
use crate::config::{AppConfig, APP_NAME};
use crate::overlay::{HeatmapOverlay, VelocityOverlay};

/// Everything drawn over the basemap
///
/// Both overlays start empty; data is bound later by the
/// [`OverlayBinder`](super::binder::OverlayBinder).
#[derive(Debug)]
pub struct Overlays {
    pub heatmap: HeatmapOverlay,
    pub velocity: VelocityOverlay,
    pub controls: ControlLayer,
}

impl Overlays {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            heatmap: HeatmapOverlay::new(&config.heatmap),
            velocity: VelocityOverlay::new(&config.velocity),
            controls: ControlLayer::new(),
        }
    }
}

/// Persistent map state, surviving between frames
pub struct MapComposition {
    tiles: HttpTiles,
    memory: MapMemory,
    center: Position,
    pub overlays: Overlays,
}

impl std::fmt::Debug for MapComposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapComposition")
            .field("center", &self.center)
            .field("overlays", &self.overlays)
            .finish_non_exhaustive()
    }
}

impl MapComposition {
    /// Build the basemap at the configured center and zoom with empty overlays
    pub fn new(ctx: &egui::Context, config: &AppConfig) -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(|| std::path::PathBuf::from(".cache"))
            .join(APP_NAME)
            .join("tiles");

        let http_options = HttpOptions {
            cache: Some(cache_dir),
            ..Default::default()
        };
        let tiles = HttpTiles::with_options(
            BasemapSource::new(config.basemap_url.clone()),
            http_options,
            ctx.clone(),
        );

        let mut memory = MapMemory::default();
        if memory.set_zoom(config.default_zoom).is_err() {
            warn!("Zoom level {} is out of range, using the default", config.default_zoom);
        }

        info!(
            "Map centered at {:.4}, {:.4} zoom {}",
            config.center_latitude, config.center_longitude, config.default_zoom
        );

        Self {
            tiles,
            memory,
            center: lon_lat(config.center_longitude, config.center_latitude),
            overlays: Overlays::new(config),
        }
    }

    /// Draw the map, its overlays and its controls
    pub fn show(&mut self, ui: &mut egui::Ui) {
        let overlays = &mut self.overlays;
        let map = Map::new(Some(&mut self.tiles), &mut self.memory, self.center)
            .with_plugin(overlays.heatmap.plugin())
            .with_plugin(overlays.velocity.plugin());
        ui.add(map);

        overlays.controls.show(ui.ctx());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlays_start_empty() {
        let overlays = Overlays::new(&AppConfig::default());
        assert!(!overlays.heatmap.is_bound());
        assert!(!overlays.velocity.is_bound());
        assert!(overlays.controls.is_empty());
    }
}
