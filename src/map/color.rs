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

//! CSS-style color strings and gradients used by the overlay styling.

use egui::Color32;
use log::warn;

use crate::config::GradientStop;

/// Parse a color name, `#rrggbb` or `rgb(r, g, b)`.
pub fn parse_color(text: &str) -> Option<Color32> {
    let text = text.trim().to_lowercase();

    if let Some(hex) = text.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let value = u32::from_str_radix(hex, 16).ok()?;
        let [_, r, g, b] = value.to_be_bytes();
        return Some(Color32::from_rgb(r, g, b));
    }

    if let Some(args) = text.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
        let channels: Vec<u8> = args
            .split(',')
            .map(|c| c.trim().parse::<u8>())
            .collect::<Result<_, _>>()
            .ok()?;
        return match channels[..] {
            [r, g, b] => Some(Color32::from_rgb(r, g, b)),
            _ => None,
        };
    }

    let rgb = match text.as_str() {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "cyan" | "aqua" => (0, 255, 255),
        "magenta" | "fuchsia" => (255, 0, 255),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "gray" | "grey" => (128, 128, 128),
        _ => return None,
    };
    Some(Color32::from_rgb(rgb.0, rgb.1, rgb.2))
}

/// Parse a configured color, falling back to white with a warning.
pub fn color_or_white(text: &str) -> Color32 {
    parse_color(text).unwrap_or_else(|| {
        warn!("Unrecognized color '{text}', using white");
        Color32::WHITE
    })
}

/// Piecewise-linear color ramp over `0.0..=1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stops: Vec<(f32, Color32)>,
}

impl Gradient {
    pub fn from_stops(stops: &[GradientStop]) -> Self {
        let mut stops: Vec<(f32, Color32)> = stops
            .iter()
            .map(|stop| (stop.offset.clamp(0.0, 1.0), color_or_white(&stop.color)))
            .collect();
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { stops }
    }

    /// Color at `t`, holding the end colors outside the first and last stop.
    pub fn sample(&self, t: f32) -> Color32 {
        let Some(&(first_offset, first)) = self.stops.first() else {
            return Color32::WHITE;
        };
        if t <= first_offset {
            return first;
        }

        for pair in self.stops.windows(2) {
            let (o0, c0) = pair[0];
            let (o1, c1) = pair[1];
            if t <= o1 {
                let span = o1 - o0;
                let f = if span > 0.0 { (t - o0) / span } else { 1.0 };
                return lerp(c0, c1, f);
            }
        }

        self.stops.last().map_or(first, |&(_, color)| color)
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "channel values stay within 0..=255"
)]
fn lerp(a: Color32, b: Color32, t: f32) -> Color32 {
    let mix = |x: u8, y: u8| (f32::from(x) + (f32::from(y) - f32::from(x)) * t).round() as u8;
    Color32::from_rgb(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_formats() {
        assert_eq!(parse_color("blue"), Some(Color32::from_rgb(0, 0, 255)));
        assert_eq!(parse_color(" Red "), Some(Color32::from_rgb(255, 0, 0)));
        assert_eq!(parse_color("#1e90ff"), Some(Color32::from_rgb(30, 144, 255)));
        assert_eq!(parse_color("rgb(255,255, 255)"), Some(Color32::WHITE));
        assert_eq!(parse_color("rgb(1, 2)"), None);
        assert_eq!(parse_color("rgb(300, 0, 0)"), None);
        assert_eq!(parse_color("#fff"), None);
        assert_eq!(parse_color("chartreuse-ish"), None);
    }

    #[test]
    fn test_gradient_sampling() {
        let gradient = Gradient::from_stops(&[
            GradientStop { offset: 0.95, color: "red".into() },
            GradientStop { offset: 0.25, color: "blue".into() },
            GradientStop { offset: 0.5, color: "green".into() },
        ]);

        assert_eq!(gradient.sample(0.0), Color32::from_rgb(0, 0, 255));
        assert_eq!(gradient.sample(0.25), Color32::from_rgb(0, 0, 255));
        assert_eq!(gradient.sample(0.5), Color32::from_rgb(0, 128, 0));
        assert_eq!(gradient.sample(1.0), Color32::from_rgb(255, 0, 0));

        let mid = gradient.sample(0.375);
        assert_eq!(mid, Color32::from_rgb(0, 64, 128));
    }

    #[test]
    fn test_empty_gradient() {
        assert_eq!(Gradient::from_stops(&[]).sample(0.5), Color32::WHITE);
    }
}
