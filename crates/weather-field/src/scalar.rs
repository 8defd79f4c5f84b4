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

//! Point-sampled scalar fields (mean sea-level pressure).
//!
//! The raw dataset is a JSON array of `[lat, lng, value]` triples. The
//! heatmap overlay wants named points plus the value range, which
//! [`ScalarField::from_samples`] produces in a single pass.

use serde::{Deserialize, Serialize};

/// Starting value for the running minimum.
pub const MIN_SENTINEL: f64 = 10_000.0;

/// Starting value for the running maximum.
pub const MAX_SENTINEL: f64 = 0.0;

/// One raw observation: `[latitude, longitude, value]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarSample(pub f64, pub f64, pub f64);

impl ScalarSample {
    #[must_use]
    pub const fn new(lat: f64, lng: f64, value: f64) -> Self {
        Self(lat, lng, value)
    }
}

/// A named heatmap point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarPoint {
    pub lat: f64,
    pub lng: f64,
    pub value: f64,
}

impl From<ScalarSample> for ScalarPoint {
    fn from(sample: ScalarSample) -> Self {
        Self {
            lat: sample.0,
            lng: sample.1,
            value: sample.2,
        }
    }
}

/// Heatmap payload: the points and the scanned value range.
///
/// `min` and `max` start at [`MIN_SENTINEL`] and [`MAX_SENTINEL`]. Only a
/// value strictly past a sentinel replaces it, so an empty dataset (or one
/// whose values never cross a sentinel) reports the sentinel unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarField {
    pub min: f64,
    pub max: f64,
    pub data: Vec<ScalarPoint>,
}

impl Default for ScalarField {
    fn default() -> Self {
        Self {
            min: MIN_SENTINEL,
            max: MAX_SENTINEL,
            data: Vec::new(),
        }
    }
}

impl ScalarField {
    /// Reshape raw samples into points, tracking min/max as they are appended.
    #[must_use]
    pub fn from_samples(samples: &[ScalarSample]) -> Self {
        let mut field = Self {
            data: Vec::with_capacity(samples.len()),
            ..Self::default()
        };

        for &sample in samples {
            field.data.push(ScalarPoint::from(sample));
            if sample.2 > field.max {
                field.max = sample.2;
            }
            if sample.2 < field.min {
                field.min = sample.2;
            }
        }

        field
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Position of `value` inside `[min, max]`, clamped to `0.0..=1.0`.
    ///
    /// Returns 0 when the range is empty or inverted (the sentinel case).
    #[must_use]
    pub fn normalized(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_keeps_sentinels() {
        let field = ScalarField::from_samples(&[]);
        assert_eq!(
            field,
            ScalarField {
                min: 10_000.0,
                max: 0.0,
                data: vec![],
            }
        );
    }

    #[test]
    fn test_mixed_values_scenario() {
        let samples: Vec<ScalarSample> =
            serde_json::from_str("[[10,20,5],[11,21,15000],[12,22,-3]]").unwrap();
        let field = ScalarField::from_samples(&samples);

        assert_eq!(field.min, -3.0);
        assert_eq!(field.max, 15_000.0);
        assert_eq!(
            field.data,
            vec![
                ScalarPoint { lat: 10.0, lng: 20.0, value: 5.0 },
                ScalarPoint { lat: 11.0, lng: 21.0, value: 15_000.0 },
                ScalarPoint { lat: 12.0, lng: 22.0, value: -3.0 },
            ]
        );
    }

    #[test]
    fn test_points_keep_order_and_fields() {
        let samples = vec![
            ScalarSample::new(70.0, 30.0, 1013.2),
            ScalarSample::new(55.0, 11.0, 998.4),
            ScalarSample::new(-95.0, 400.0, 1001.0),
        ];
        let field = ScalarField::from_samples(&samples);

        assert_eq!(field.len(), samples.len());
        for (point, sample) in field.data.iter().zip(&samples) {
            assert_eq!(point.lat, sample.0);
            assert_eq!(point.lng, sample.1);
            assert_eq!(point.value, sample.2);
        }
    }

    #[test]
    fn test_pressure_range_is_true_extremes() {
        let samples = vec![
            ScalarSample::new(60.0, 15.0, 1002.0),
            ScalarSample::new(61.0, 16.0, 1021.5),
            ScalarSample::new(62.0, 17.0, 987.25),
            ScalarSample::new(63.0, 18.0, 1010.0),
        ];
        let field = ScalarField::from_samples(&samples);
        assert_eq!(field.min, 987.25);
        assert_eq!(field.max, 1021.5);
    }

    #[test]
    fn test_values_that_never_cross_sentinels() {
        // All values above 10000: the minimum is never replaced.
        let high = ScalarField::from_samples(&[ScalarSample::new(0.0, 0.0, 20_000.0)]);
        assert_eq!(high.min, MIN_SENTINEL);
        assert_eq!(high.max, 20_000.0);

        // All values below 0: the maximum is never replaced.
        let low = ScalarField::from_samples(&[ScalarSample::new(0.0, 0.0, -5.0)]);
        assert_eq!(low.min, -5.0);
        assert_eq!(low.max, MAX_SENTINEL);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let sample = ScalarSample::new(1.0, 2.0, 3.0);
        let field = ScalarField::from_samples(&[sample, sample]);
        assert_eq!(field.len(), 2);
    }

    #[test]
    fn test_normalized() {
        let field = ScalarField::from_samples(&[
            ScalarSample::new(0.0, 0.0, 1000.0),
            ScalarSample::new(0.0, 0.0, 1020.0),
        ]);
        assert!((field.normalized(1010.0) - 0.5).abs() < 1e-12);
        assert_eq!(field.normalized(900.0), 0.0);
        assert_eq!(field.normalized(2000.0), 1.0);

        assert_eq!(ScalarField::default().normalized(5.0), 0.0);
    }
}
