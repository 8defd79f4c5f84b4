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

use walkers::sources::{Attribution, TileSource};
use walkers::TileId;

const SUBDOMAINS: [char; 4] = ['a', 'b', 'c', 'd'];

/// Raster basemap tiles from a `{s}`/`{z}`/`{x}`/`{y}` URL template
///
/// `{s}` rotates over the a-d subdomains by tile coordinate, the same
/// load balancing the Carto CDN expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasemapSource {
    template: String,
}

impl BasemapSource {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }
}

impl TileSource for BasemapSource {
    fn tile_url(&self, tile_id: TileId) -> String {
        let subdomain = SUBDOMAINS[((tile_id.x + tile_id.y) % 4) as usize];

        self.template
            .replace("{s}", &subdomain.to_string())
            .replace("{z}", &tile_id.zoom.to_string())
            .replace("{x}", &tile_id.x.to_string())
            .replace("{y}", &tile_id.y.to_string())
    }

    fn attribution(&self) -> Attribution {
        Attribution {
            text: "© OpenStreetMap contributors, © CARTO",
            url: "https://carto.com/attributions",
            logo_light: None,
            logo_dark: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn test_default_template_expansion() {
        let source = BasemapSource::new(AppConfig::default().basemap_url);
        let url = source.tile_url(TileId { x: 17, y: 9, zoom: 5 });
        assert_eq!(url, "https://c.basemaps.cartocdn.com/dark_all/5/17/9.png");
    }

    #[test]
    fn test_subdomain_rotation() {
        let source = BasemapSource::new("https://{s}.tiles.test/{z}/{x}/{y}.png");
        let hosts: Vec<String> = (0..4)
            .map(|x| source.tile_url(TileId { x, y: 0, zoom: 1 }))
            .collect();
        assert_eq!(hosts[0], "https://a.tiles.test/1/0/0.png");
        assert_eq!(hosts[3], "https://d.tiles.test/1/3/0.png");
    }

    #[test]
    fn test_template_without_subdomain() {
        let source = BasemapSource::new("https://tiles.test/{z}/{x}/{y}.png");
        assert_eq!(
            source.tile_url(TileId { x: 1, y: 2, zoom: 3 }),
            "https://tiles.test/3/1/2.png"
        );
    }
}
