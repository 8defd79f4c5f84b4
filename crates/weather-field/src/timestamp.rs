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

//! Reference-time label shown on the map.

/// Build the "as of" label from a wind header `refTime`.
///
/// Takes characters 0..10 (the date) and 11..19 (the time) of an
/// ISO-8601-like string and joins them with a space, so
/// `"2023-04-05T12:30:00Z"` becomes `"2023-04-05 12:30:00"`. Short input
/// yields whatever characters exist in each range.
#[must_use]
pub fn reference_label(ref_time: &str) -> String {
    let date: String = ref_time.chars().take(10).collect();
    let time: String = ref_time.chars().skip(11).take(8).collect();
    format!("{date} {time}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utc_reference_time() {
        assert_eq!(reference_label("2023-04-05T12:30:00Z"), "2023-04-05 12:30:00");
    }

    #[test]
    fn test_local_reference_time_without_offset() {
        assert_eq!(reference_label("2024-11-04T18:00:00"), "2024-11-04 18:00:00");
    }

    #[test]
    fn test_fractional_seconds_are_cut() {
        assert_eq!(
            reference_label("2024-01-31T23:59:59.123+01:00"),
            "2024-01-31 23:59:59"
        );
    }

    #[test]
    fn test_short_input() {
        assert_eq!(reference_label("2024-01-31"), "2024-01-31 ");
        assert_eq!(reference_label(""), " ");
        assert_eq!(reference_label("2024-01-31T10"), "2024-01-31 10");
    }
}
