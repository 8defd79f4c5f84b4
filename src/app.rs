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

use eframe::egui;
use log::{error, info};
use tokio::task::JoinHandle;
use weather_field::{spawn_loads, DataSource, OverlaySink};

use crate::config::AppConfig;
use crate::map::{MapComposition, OverlayBinder};

pub struct WindMapApp {
    composition: MapComposition,
    binder: OverlayBinder,
}

impl WindMapApp {
    /// Compose the map with empty overlays, then start both loads.
    pub fn new(ctx: &egui::Context, config: &AppConfig, source: DataSource) -> Self {
        let composition = MapComposition::new(ctx, config);
        let (sink, binder) = OverlayBinder::channel(ctx.clone());
        start_loads(source, sink);

        Self {
            composition,
            binder,
        }
    }
}

/// Run the loads on their own runtime thread, leaving the UI thread free.
fn start_loads<S: OverlaySink>(source: DataSource, sink: S) {
    info!("Loading datasets from {source}");
    std::thread::spawn(move || {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                error!("Failed to start load runtime: {e}");
                return;
            }
        };
        rt.block_on(async move {
            let handles = spawn_loads(source, sink);
            // Keep the runtime alive until both tasks have delivered.
            join_load("Wind", handles.wind).await;
            join_load("Pressure", handles.pressure).await;
        });
    });
}

/// Wait for a load task, logging it if it panicked. Returns whether it
/// ran to completion.
async fn join_load(name: &str, handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(e) => {
            error!("{name} load task failed: {e}");
            false
        }
    }
}

impl eframe::App for WindMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.binder.drain(&mut self.composition.overlays);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                self.composition.show(ui);
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_join_load_reports_panicked_task() {
        let failed = tokio::spawn(async { panic!("malformed grid") });
        assert!(!join_load("Wind", failed).await);

        let finished = tokio::spawn(async {});
        assert!(join_load("Pressure", finished).await);
    }
}
