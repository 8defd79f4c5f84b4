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

//! Particle advection for the wind animation.
//!
//! Particles live in geographic coordinates so panning and zooming keep
//! them attached to the map. Each frame they are moved in screen space by
//! the interpolated wind, then mapped back through Web Mercator.

use std::collections::VecDeque;
use std::f64::consts::PI;

use egui::{Pos2, Rect, Vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use weather_field::{VelocityGrid, WindVector};

/// Frames a particle lives before it is respawned
pub const MAX_PARTICLE_AGE: u32 = 90;

/// Screen pixels per particle
const PIXELS_PER_PARTICLE: f32 = 300.0;

const MAX_PARTICLES: usize = 5000;

/// Trail points kept per particle
const TRAIL_LENGTH: usize = 8;

/// Screen displacement per frame is `speed * velocity_scale * SCALE_TO_PIXELS`
pub const SCALE_TO_PIXELS: f32 = 100.0;

fn mercator_y(lat_deg: f64) -> f64 {
    (PI / 4.0 + lat_deg.to_radians() / 2.0).tan().ln()
}

fn inverse_mercator_y(y: f64) -> f64 {
    y.sinh().atan().to_degrees()
}

/// Affine screen placement of the Web Mercator plane for one frame
///
/// Built from the screen position of one reference coordinate and the
/// pixel width of one degree of longitude at the current zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenMapping {
    origin: Pos2,
    ref_lon: f64,
    ref_merc_y: f64,
    px_per_radian: f64,
}

impl ScreenMapping {
    pub fn new(origin: Pos2, ref_lon: f64, ref_lat: f64, px_per_degree_lon: f64) -> Self {
        Self {
            origin,
            ref_lon,
            ref_merc_y: mercator_y(ref_lat),
            px_per_radian: px_per_degree_lon * 180.0 / PI,
        }
    }

    #[allow(clippy::cast_possible_truncation, reason = "screen coordinates fit in f32")]
    pub fn to_screen(&self, lon: f64, lat: f64) -> Pos2 {
        let dx = (lon - self.ref_lon).to_radians() * self.px_per_radian;
        let dy = (self.ref_merc_y - mercator_y(lat)) * self.px_per_radian;
        Pos2::new(self.origin.x + dx as f32, self.origin.y + dy as f32)
    }

    /// Inverse of [`Self::to_screen`] as `(lon, lat)`
    pub fn to_geo(&self, pos: Pos2) -> (f64, f64) {
        let dx = f64::from(pos.x - self.origin.x);
        let dy = f64::from(pos.y - self.origin.y);
        let lon = self.ref_lon + (dx / self.px_per_radian).to_degrees();
        let lat = inverse_mercator_y(self.ref_merc_y - dy / self.px_per_radian);
        (lon, lat)
    }

    /// Geographic extent of a screen rect as `(west, south, east, north)`
    pub fn bounds(&self, rect: Rect) -> (f64, f64, f64, f64) {
        let (west, north) = self.to_geo(rect.left_top());
        let (east, south) = self.to_geo(rect.right_bottom());
        (west, south, east, north)
    }
}

/// Overlap of two `(west, south, east, north)` boxes
pub fn intersect(
    a: (f64, f64, f64, f64),
    b: (f64, f64, f64, f64),
) -> Option<(f64, f64, f64, f64)> {
    let west = a.0.max(b.0);
    let south = a.1.max(b.1);
    let east = a.2.min(b.2);
    let north = a.3.min(b.3);
    (west < east && south < north).then_some((west, south, east, north))
}

/// One animated particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub lon: f64,
    pub lat: f64,
    pub age: u32,
    /// Wind speed at the current position, m/s
    pub speed: f64,
    /// Recent `(lon, lat)` positions, oldest first
    pub trail: VecDeque<(f64, f64)>,
}

/// The set of particles animated over a wind grid
#[derive(Debug)]
pub struct ParticleField {
    particles: Vec<Particle>,
    rng: StdRng,
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::new()
    }
}

impl ParticleField {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            particles: Vec::new(),
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Particle count for a viewport
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "viewport area is positive and bounded"
    )]
    pub fn target_count(viewport: Rect) -> usize {
        ((viewport.area() / PIXELS_PER_PARTICLE) as usize).min(MAX_PARTICLES)
    }

    fn spawn(&mut self, area: (f64, f64, f64, f64)) -> Particle {
        let lon = self.rng.gen_range(area.0..area.2);
        let lat = self.rng.gen_range(area.1..area.3);
        Particle {
            lon,
            lat,
            age: self.rng.gen_range(0..MAX_PARTICLE_AGE),
            speed: 0.0,
            trail: VecDeque::from([(lon, lat)]),
        }
    }

    /// Advance every particle by one frame
    ///
    /// `area` is where particles may exist (grid extent clipped to the
    /// view); `pixels_per_ms` converts m/s into screen pixels per frame.
    pub fn step(
        &mut self,
        grid: &VelocityGrid,
        mapping: &ScreenMapping,
        area: Option<(f64, f64, f64, f64)>,
        count: usize,
        pixels_per_ms: f32,
    ) {
        let Some(area) = area else {
            self.particles.clear();
            return;
        };

        self.particles.truncate(count);
        while self.particles.len() < count {
            let particle = self.spawn(area);
            self.particles.push(particle);
        }

        let inside = |lon: f64, lat: f64| {
            (area.0..=area.2).contains(&lon) && (area.1..=area.3).contains(&lat)
        };

        for index in 0..self.particles.len() {
            let particle = &self.particles[index];
            let wind = if particle.age >= MAX_PARTICLE_AGE || !inside(particle.lon, particle.lat) {
                None
            } else {
                grid.sample(particle.lon, particle.lat)
            };

            let Some(wind) = wind else {
                self.particles[index] = self.spawn(area);
                continue;
            };

            let particle = &mut self.particles[index];
            let (lon, lat) = advect(mapping, particle.lon, particle.lat, wind, pixels_per_ms);
            particle.lon = lon;
            particle.lat = lat;
            particle.age += 1;
            particle.speed = wind.speed();
            particle.trail.push_back((lon, lat));
            while particle.trail.len() > TRAIL_LENGTH {
                particle.trail.pop_front();
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation, reason = "per-frame displacement is small")]
fn advect(mapping: &ScreenMapping, lon: f64, lat: f64, wind: WindVector, pixels_per_ms: f32) -> (f64, f64) {
    let screen = mapping.to_screen(lon, lat);
    let delta = Vec2::new(wind.u as f32, -(wind.v as f32)) * pixels_per_ms;
    mapping.to_geo(screen + delta)
}
