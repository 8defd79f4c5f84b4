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

//! Pressure heatmap overlay.

use egui::{Color32, Ui};
use walkers::{lon_lat, MapMemory, Plugin, Projector};
use weather_field::ScalarField;

use super::OverlayState;
use crate::config::HeatmapSettings;
use crate::map::color::Gradient;

/// Heatmap of a [`ScalarField`]: one translucent disc per point, colored by
/// where its value sits between the field's min and max.
#[derive(Debug)]
pub struct HeatmapOverlay {
    radius: f32,
    max_opacity: f32,
    gradient: Gradient,
    state: OverlayState<ScalarField>,
}

impl HeatmapOverlay {
    pub fn new(settings: &HeatmapSettings) -> Self {
        Self {
            radius: settings.radius.max(0.5),
            max_opacity: settings.max_opacity.clamp(0.0, 1.0),
            gradient: Gradient::from_stops(&settings.gradient),
            state: OverlayState::Empty,
        }
    }

    /// Hand the field to the overlay. Refused (and returned) if one is already bound.
    pub fn set_data(&mut self, field: ScalarField) -> Result<(), ScalarField> {
        self.state.bind(field)
    }

    pub fn is_bound(&self) -> bool {
        self.state.is_bound()
    }

    pub fn field(&self) -> Option<&ScalarField> {
        self.state.get()
    }

    /// Fill color of a point with `value`, `None` if it would be invisible.
    #[allow(clippy::cast_possible_truncation, reason = "normalized value is in 0..=1")]
    pub fn point_color(&self, field: &ScalarField, value: f64) -> Option<Color32> {
        let intensity = field.normalized(value) as f32;
        let alpha = intensity.min(self.max_opacity);
        if alpha <= 0.0 {
            return None;
        }
        let color = self.gradient.sample(intensity);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "alpha is in 0..=1"
        )]
        let alpha = (alpha * 255.0).round() as u8;
        Some(Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha))
    }

    /// Plugin drawing this overlay for one frame
    pub fn plugin(&self) -> HeatmapPlugin<'_> {
        HeatmapPlugin { overlay: self }
    }
}

#[derive(Debug)]
pub struct HeatmapPlugin<'a> {
    overlay: &'a HeatmapOverlay,
}

impl Plugin for HeatmapPlugin<'_> {
    fn run(
        self: Box<Self>,
        ui: &mut Ui,
        response: &egui::Response,
        projector: &Projector,
        _memory: &MapMemory,
    ) {
        let Some(field) = self.overlay.field() else {
            return;
        };

        let radius = self.overlay.radius;
        let visible = response.rect.expand(radius);
        let painter = ui.painter_at(response.rect);

        for point in &field.data {
            let screen = projector.project(lon_lat(point.lng, point.lat)).to_pos2();
            if !visible.contains(screen) {
                continue;
            }
            if let Some(color) = self.overlay.point_color(field, point.value) {
                painter.circle_filled(screen, radius, color);
            }
        }
    }
}
