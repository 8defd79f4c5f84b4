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

//! WindMap Desktop: MSL pressure heatmap and animated wind over a dark
//! basemap.

mod app;
mod config;
mod map;
mod overlay;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eframe::egui;
use log::{error, info, warn};
use weather_field::smhi::{SmhiClient, SmhiOptions};
use weather_field::DataSource;

use app::WindMapApp;
use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "windmap-desktop")]
#[command(about = "Wind particles and pressure heatmap over a slippy map")]
struct Args {
    /// Directory or http(s) base URL holding wind.json and msl.json
    #[arg(short, long)]
    data: Option<String>,

    /// Initial center latitude
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Initial center longitude
    #[arg(long, allow_negative_numbers = true)]
    lon: Option<f64>,

    /// Initial zoom level
    #[arg(long)]
    zoom: Option<f64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download the current SMHI fields and write wind.json and msl.json
    Fetch {
        /// Output directory (defaults to the configured data source)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use the MESAN analysis instead of the PMP forecast
        #[arg(long)]
        mesan: bool,

        /// Downsample factor for the wind grid
        #[arg(long)]
        wind_downsample: Option<u32>,

        /// Downsample factor for the pressure points
        #[arg(long)]
        msl_downsample: Option<u32>,
    },
}

impl Args {
    /// Apply one-run overrides on top of the stored configuration
    fn apply(&self, config: &mut AppConfig) {
        if let Some(data) = &self.data {
            config.data_source.clone_from(data);
        }
        if let Some(lat) = self.lat {
            config.center_latitude = lat;
        }
        if let Some(lon) = self.lon {
            config.center_longitude = lon;
        }
        if let Some(zoom) = self.zoom {
            config.default_zoom = zoom;
        }
    }
}

fn load_config() -> AppConfig {
    match AppConfig::load() {
        Ok(config) => {
            if let Ok(path) = AppConfig::get_config_path() {
                info!("Using config {}", path.display());
            }
            config
        }
        Err(e) => {
            warn!("Failed to load config, using defaults: {e}");
            AppConfig::default()
        }
    }
}

/// Directory the `fetch` command writes into
///
/// Without `--output` the configured data source is used, which must then
/// be a local directory.
fn fetch_output(config: &AppConfig, output: Option<PathBuf>) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(output) = output {
        return Ok(output);
    }
    match DataSource::parse(&config.data_source)? {
        DataSource::Directory(dir) => Ok(dir),
        DataSource::Http(url) => Err(format!(
            "data source {url} is not a local directory, pass --output to choose where to write"
        )
        .into()),
    }
}

fn fetch(
    config: &AppConfig,
    output: Option<PathBuf>,
    mesan: bool,
    wind_downsample: Option<u32>,
    msl_downsample: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = SmhiOptions::from(&config.smhi);
    options.mesan |= mesan;
    if let Some(n) = wind_downsample {
        options.wind_downsample = n;
    }
    if let Some(n) = msl_downsample {
        options.msl_downsample = n;
    }
    let output = fetch_output(config, output)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let client = SmhiClient::new(options.base_url());
        let datasets = client.fetch(&options).await?;
        datasets.write_to(&output).await?;
        info!("Wind reference time {}", datasets.ref_time);
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = load_config();
    args.apply(&mut config);

    if let Some(Command::Fetch {
        output,
        mesan,
        wind_downsample,
        msl_downsample,
    }) = args.command
    {
        return fetch(&config, output, mesan, wind_downsample, msl_downsample);
    }

    let source = DataSource::parse(&config.data_source)?;
    info!("Starting WindMap Desktop");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_title("WindMap Desktop"),
        ..Default::default()
    };

    eframe::run_native(
        "WindMap Desktop",
        options,
        Box::new(move |cc| Ok(Box::new(WindMapApp::new(&cc.egui_ctx, &config, source)))),
    )
    .map_err(|e| -> Box<dyn std::error::Error> {
        error!("Window failed: {e}");
        Box::new(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "windmap-desktop",
            "--data",
            "https://example.com/data",
            "--lat",
            "-33.5",
            "--zoom",
            "7",
        ]);
        let mut config = AppConfig::default();
        args.apply(&mut config);

        assert_eq!(config.data_source, "https://example.com/data");
        assert_eq!(config.center_latitude, -33.5);
        assert_eq!(config.default_zoom, 7.0);
        assert_eq!(config.center_longitude, AppConfig::default().center_longitude);
        assert!(args.command.is_none());
    }

    #[test]
    fn test_fetch_subcommand() {
        let args = Args::parse_from([
            "windmap-desktop",
            "fetch",
            "--output",
            "/tmp/wm",
            "--mesan",
            "--wind-downsample",
            "30",
        ]);
        match args.command {
            Some(Command::Fetch {
                output,
                mesan,
                wind_downsample,
                msl_downsample,
            }) => {
                assert_eq!(output, Some(PathBuf::from("/tmp/wm")));
                assert!(mesan);
                assert_eq!(wind_downsample, Some(30));
                assert_eq!(msl_downsample, None);
            }
            None => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_fetch_output_defaults_to_data_directory() {
        let config = AppConfig {
            data_source: "./html".into(),
            ..Default::default()
        };
        assert_eq!(fetch_output(&config, None).unwrap(), PathBuf::from("./html"));
        assert_eq!(
            fetch_output(&config, Some(PathBuf::from("/tmp/out"))).unwrap(),
            PathBuf::from("/tmp/out")
        );
    }

    #[test]
    fn test_fetch_output_rejects_http_source() {
        let config = AppConfig {
            data_source: "https://example.com/data".into(),
            ..Default::default()
        };
        assert!(fetch_output(&config, None).is_err());
        assert_eq!(
            fetch_output(&config, Some(PathBuf::from("out"))).unwrap(),
            PathBuf::from("out")
        );
    }
}
