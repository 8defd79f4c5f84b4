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

//! Wind particle animation overlay.
//!
//! Draws short particle trails advected through the wind grid and, when
//! enabled, a readout of the wind under the pointer.

use egui::{Color32, FontId, Stroke, Ui};
use log::warn;
use walkers::{lon_lat, MapMemory, Plugin, Projector};
use weather_field::{VelocityGrid, WindDataset, WindVector};

use super::particles::{intersect, ParticleField, ScreenMapping, SCALE_TO_PIXELS};
use super::OverlayState;
use crate::config::VelocitySettings;
use crate::map::color::color_or_white;
use crate::map::controls::ControlPosition;

const TRAIL_WIDTH: f32 = 1.2;

/// Velocity field overlay
#[derive(Debug)]
pub struct VelocityOverlay {
    settings: VelocitySettings,
    colors: Vec<Color32>,
    state: OverlayState<WindDataset>,
    grid: Option<VelocityGrid>,
    particles: ParticleField,
}

impl VelocityOverlay {
    pub fn new(settings: &VelocitySettings) -> Self {
        let mut colors: Vec<Color32> = settings.color_scale.iter().map(|c| color_or_white(c)).collect();
        if colors.is_empty() {
            colors.push(Color32::WHITE);
        }
        Self {
            settings: settings.clone(),
            colors,
            state: OverlayState::Empty,
            grid: None,
            particles: ParticleField::new(),
        }
    }

    /// Hand the dataset to the overlay. Refused (and returned) if one is already bound.
    ///
    /// A dataset whose grid cannot be built is still bound; the overlay then
    /// animates nothing.
    pub fn set_data(&mut self, dataset: WindDataset) -> Result<(), WindDataset> {
        let grid = match VelocityGrid::from_dataset(&dataset) {
            Ok(grid) => Some(grid),
            Err(e) => {
                warn!("Wind data cannot be animated: {e}");
                None
            }
        };
        self.state.bind(dataset)?;
        self.grid = grid;
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.state.is_bound()
    }

    pub fn dataset(&self) -> Option<&WindDataset> {
        self.state.get()
    }

    pub fn grid(&self) -> Option<&VelocityGrid> {
        self.grid.as_ref()
    }

    /// Trail color for a speed, stepping through the color scale between
    /// `min_velocity` and `max_velocity`
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss,
        reason = "index is clamped to the color scale"
    )]
    pub fn color_for_speed(&self, speed: f64) -> Color32 {
        let last = self.colors.len() - 1;
        let min = f64::from(self.settings.min_velocity);
        let max = f64::from(self.settings.max_velocity);
        let t = if max > min { (speed - min) / (max - min) } else { 0.0 };
        let index = (t * last as f64).round().clamp(0.0, last as f64) as usize;
        self.colors[index]
    }

    /// Readout text for the wind at the pointer
    pub fn readout(&self, wind: Option<WindVector>) -> String {
        let Some(wind) = wind else {
            return self.settings.empty_string.clone();
        };
        let kind = &self.settings.velocity_type;
        let direction = if self.settings.show_cardinal {
            format!("{:.0}° ({})", wind.direction(), wind.cardinal())
        } else {
            format!("{:.0}°", wind.direction())
        };
        format!(
            "{kind} Direction: {direction}, {kind} Speed: {:.2} m/s",
            wind.speed()
        )
    }

    /// Plugin drawing this overlay for one frame
    pub fn plugin(&mut self) -> VelocityPlugin<'_> {
        VelocityPlugin { overlay: self }
    }
}

#[derive(Debug)]
pub struct VelocityPlugin<'a> {
    overlay: &'a mut VelocityOverlay,
}

impl VelocityPlugin<'_> {
    fn draw_readout(&self, ui: &Ui, response: &egui::Response, mapping: Option<&ScreenMapping>) {
        let overlay = &*self.overlay;
        let wind = match (response.hover_pos(), mapping, overlay.grid()) {
            (Some(pos), Some(mapping), Some(grid)) => {
                let (lon, lat) = mapping.to_geo(pos);
                grid.sample(lon, lat)
            }
            _ => None,
        };
        let text = overlay.readout(wind);

        let rect = response.rect;
        let (align, offset) = overlay.settings.position.anchor();
        let anchor = match overlay.settings.position {
            ControlPosition::TopLeft => rect.left_top(),
            ControlPosition::TopRight => rect.right_top(),
            ControlPosition::BottomLeft => rect.left_bottom(),
            ControlPosition::BottomRight => rect.right_bottom(),
        } + offset;

        let painter = ui.painter_at(rect);
        let galley = painter.layout_no_wrap(text, FontId::proportional(12.0), Color32::from_rgb(230, 230, 230));
        let text_rect = align.anchor_size(anchor, galley.size());
        painter.rect_filled(
            text_rect.expand(4.0),
            4.0,
            Color32::from_rgba_unmultiplied(25, 30, 35, 200),
        );
        painter.galley(text_rect.min, galley, Color32::WHITE);
    }
}

impl Plugin for VelocityPlugin<'_> {
    fn run(
        self: Box<Self>,
        ui: &mut Ui,
        response: &egui::Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        let rect = response.rect;

        let mapping = self.overlay.grid().map(|grid| {
            let (west, _, _, north) = grid.bounds();
            let origin = projector.project(lon_lat(west, north)).to_pos2();
            let east = projector.project(lon_lat(west + 1.0, north)).to_pos2();
            ScreenMapping::new(origin, west, north, f64::from(east.x - origin.x))
        });

        if let (Some(mapping), Some(grid)) = (mapping.as_ref(), self.overlay.grid.as_ref()) {
            let area = intersect(grid.bounds(), mapping.bounds(rect));
            let count = ParticleField::target_count(rect);
            let pixels_per_ms = self.overlay.settings.velocity_scale * SCALE_TO_PIXELS;
            self.overlay.particles.step(grid, mapping, area, count, pixels_per_ms);

            let painter = ui.painter_at(rect);
            for particle in self.overlay.particles.particles() {
                if particle.trail.len() < 2 {
                    continue;
                }
                let stroke = Stroke::new(TRAIL_WIDTH, self.overlay.color_for_speed(particle.speed));
                let points: Vec<egui::Pos2> = particle
                    .trail
                    .iter()
                    .map(|&(lon, lat)| mapping.to_screen(lon, lat))
                    .collect();
                painter.add(egui::Shape::line(points, stroke));
            }

            ui.ctx().request_repaint();
        }

        if self.overlay.settings.display_values {
            self.draw_readout(ui, response, mapping.as_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dataset() -> WindDataset {
        let header = |number: u32| {
            json!({
                "parameterCategory": 2, "parameterNumber": number,
                "lo1": 10.0, "la1": 60.0, "dx": 1.0, "dy": 1.0, "nx": 2, "ny": 2,
                "refTime": "2024-11-04T18:00:00"
            })
        };
        WindDataset::new(json!([
            {"header": header(2), "data": [3.0, 3.0, 3.0, 3.0]},
            {"header": header(3), "data": [4.0, 4.0, 4.0, 4.0]}
        ]))
    }

    #[test]
    fn test_set_data_builds_grid() {
        let mut overlay = VelocityOverlay::new(&VelocitySettings::default());
        assert!(!overlay.is_bound());
        assert!(overlay.set_data(dataset()).is_ok());
        assert!(overlay.is_bound());
        assert_eq!(overlay.dataset(), Some(&dataset()));
        assert!(overlay.grid().is_some());
        assert!(overlay.set_data(dataset()).is_err());
    }

    #[test]
    fn test_unusable_grid_still_binds() {
        let mut overlay = VelocityOverlay::new(&VelocitySettings::default());
        let opaque = WindDataset::new(json!([{"header": {"refTime": "2023-04-05T12:30:00Z"}}]));
        assert!(overlay.set_data(opaque.clone()).is_ok());
        assert_eq!(overlay.dataset(), Some(&opaque));
        assert!(overlay.grid().is_none());
    }

    #[test]
    fn test_readout() {
        let overlay = VelocityOverlay::new(&VelocitySettings::default());
        assert_eq!(overlay.readout(None), "No wind data");
        assert_eq!(
            overlay.readout(Some(WindVector::from_direction(270.0, 5.0))),
            "Wind Direction: 270° (W), Wind Speed: 5.00 m/s"
        );

        let plain = VelocityOverlay::new(&VelocitySettings {
            show_cardinal: false,
            ..Default::default()
        });
        assert_eq!(
            plain.readout(Some(WindVector::from_direction(90.0, 2.5))),
            "Wind Direction: 90°, Wind Speed: 2.50 m/s"
        );
    }

    #[test]
    fn test_color_scale_steps() {
        let overlay = VelocityOverlay::new(&VelocitySettings {
            color_scale: vec!["blue".into(), "green".into(), "red".into()],
            ..Default::default()
        });
        assert_eq!(overlay.color_for_speed(0.0), Color32::from_rgb(0, 0, 255));
        assert_eq!(overlay.color_for_speed(5.0), Color32::from_rgb(0, 128, 0));
        assert_eq!(overlay.color_for_speed(25.0), Color32::from_rgb(255, 0, 0));
        assert_eq!(overlay.color_for_speed(-1.0), Color32::from_rgb(0, 0, 255));
    }

    #[test]
    fn test_default_color_scale_is_white() {
        let overlay = VelocityOverlay::new(&VelocitySettings::default());
        assert_eq!(overlay.color_for_speed(7.0), Color32::WHITE);
    }
}
