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

//! Map controls: small UI panels pinned to a corner of the map.

use egui::{Align2, Color32, RichText, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};
use weather_field::reference_label;

const CORNER_MARGIN: f32 = 10.0;

/// Viewport corner a control is pinned to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ControlPosition {
    pub const ALL: [Self; 4] = [Self::TopLeft, Self::TopRight, Self::BottomLeft, Self::BottomRight];

    /// Anchor alignment and offset from the corner
    pub fn anchor(self) -> (Align2, Vec2) {
        match self {
            Self::TopLeft => (Align2::LEFT_TOP, egui::vec2(CORNER_MARGIN, CORNER_MARGIN)),
            Self::TopRight => (Align2::RIGHT_TOP, egui::vec2(-CORNER_MARGIN, CORNER_MARGIN)),
            Self::BottomLeft => (Align2::LEFT_BOTTOM, egui::vec2(CORNER_MARGIN, -CORNER_MARGIN)),
            Self::BottomRight => (Align2::RIGHT_BOTTOM, egui::vec2(-CORNER_MARGIN, -CORNER_MARGIN)),
        }
    }
}

/// A control attached to the map
///
/// `on_add` runs once when the control is attached and `on_remove` once when
/// it is detached; `ui` renders the content every frame in between.
pub trait MapControl {
    fn position(&self) -> ControlPosition;

    fn ui(&mut self, ui: &mut egui::Ui);

    fn on_add(&mut self) {}

    fn on_remove(&mut self) {}
}

/// Heading showing the reference time of the wind data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampControl {
    label: String,
    position: ControlPosition,
}

impl TimestampControl {
    pub fn new(label: String) -> Self {
        Self {
            label,
            position: ControlPosition::TopLeft,
        }
    }

    /// Build from a wind header `refTime`
    pub fn from_ref_time(ref_time: &str) -> Self {
        Self::new(reference_label(ref_time))
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl MapControl for TimestampControl {
    fn position(&self) -> ControlPosition {
        self.position
    }

    fn ui(&mut self, ui: &mut egui::Ui) {
        ui.label(
            RichText::new(&self.label)
                .heading()
                .strong()
                .color(Color32::from_rgb(230, 230, 230)),
        );
    }

    fn on_add(&mut self) {
        debug!("Timestamp control attached: {}", self.label);
    }
}

/// The set of controls currently attached to a map
#[derive(Default)]
pub struct ControlLayer {
    controls: Vec<Box<dyn MapControl>>,
}

impl std::fmt::Debug for ControlLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlLayer")
            .field("controls", &self.controls.len())
            .finish()
    }
}

impl ControlLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a control
    pub fn add(&mut self, mut control: Box<dyn MapControl>) {
        control.on_add();
        self.controls.push(control);
    }

    /// Detach every control
    pub fn clear(&mut self) {
        for mut control in self.controls.drain(..) {
            control.on_remove();
        }
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Render controls, stacked per corner
    pub fn show(&mut self, ctx: &egui::Context) {
        for corner in ControlPosition::ALL {
            if !self.controls.iter().any(|c| c.position() == corner) {
                continue;
            }
            let (align, offset) = corner.anchor();
            egui::Window::new("map_controls")
                .id(egui::Id::new(("map_controls", corner)))
                .title_bar(false)
                .anchor(align, offset)
                .resizable(false)
                .collapsible(false)
                .frame(
                    egui::Frame::window(&ctx.style())
                        .fill(Color32::from_rgba_unmultiplied(25, 30, 35, 200))
                        .stroke(egui::Stroke::new(1.0, Color32::from_rgb(60, 80, 100)))
                        .corner_radius(6.0),
                )
                .show(ctx, |ui| {
                    for control in self.controls.iter_mut().filter(|c| c.position() == corner) {
                        control.ui(ui);
                    }
                });
        }
    }
}

impl Drop for ControlLayer {
    fn drop(&mut self) {
        self.clear();
    }
}
