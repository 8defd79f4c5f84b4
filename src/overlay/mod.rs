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

//! Data overlays drawn on top of the basemap.
//!
//! Each overlay is created empty with fixed styling and receives its dataset
//! once. Drawing happens through walkers plugins borrowed from the overlay
//! every frame.

pub mod heatmap;
pub mod particles;
pub mod velocity;

pub use heatmap::HeatmapOverlay;
pub use velocity::VelocityOverlay;

/// Data state of an overlay: empty until its dataset arrives, then bound
/// for the rest of the session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum OverlayState<T> {
    #[default]
    Empty,
    Bound(T),
}

impl<T> OverlayState<T> {
    /// Bind `data` if nothing is bound yet. Returns the data back when the
    /// overlay already holds a dataset.
    pub fn bind(&mut self, data: T) -> Result<(), T> {
        if self.is_bound() {
            return Err(data);
        }
        *self = Self::Bound(data);
        Ok(())
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Bound(data) => Some(data),
            Self::Empty => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binds_once() {
        let mut state = OverlayState::default();
        assert!(!state.is_bound());
        assert_eq!(state.bind(1), Ok(()));
        assert_eq!(state.bind(2), Err(2));
        assert_eq!(state.get(), Some(&1));
    }
}
