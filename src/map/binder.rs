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

//! Hands finished loads to the overlays on the UI thread.
//!
//! Load tasks run on a background runtime and send their results over an
//! unbounded channel. The binder drains that channel at the start of each
//! frame, so all overlay state is touched from one thread only.

use eframe::egui;
use log::{info, warn};
use tokio::sync::mpsc;
use weather_field::{LoadEvent, OverlaySink};

use super::composition::Overlays;
use super::controls::TimestampControl;

/// Sink used by the load tasks: forwards the event and wakes the UI.
#[derive(Debug, Clone)]
pub struct RepaintSink {
    tx: mpsc::UnboundedSender<LoadEvent>,
    ctx: egui::Context,
}

impl OverlaySink for RepaintSink {
    fn deliver(&self, event: LoadEvent) {
        self.tx.deliver(event);
        self.ctx.request_repaint();
    }
}

/// UI-side end of the load channel
#[derive(Debug)]
pub struct OverlayBinder {
    rx: mpsc::UnboundedReceiver<LoadEvent>,
}

impl OverlayBinder {
    pub fn new(rx: mpsc::UnboundedReceiver<LoadEvent>) -> Self {
        Self { rx }
    }

    /// Binder plus the sink the load tasks deliver into
    pub fn channel(ctx: egui::Context) -> (RepaintSink, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (RepaintSink { tx, ctx }, Self::new(rx))
    }

    /// Bind every event received so far. Returns how many were handled.
    pub fn drain(&mut self, overlays: &mut Overlays) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.rx.try_recv() {
            bind(event, overlays);
            handled += 1;
        }
        handled
    }
}

/// Attach one load result to its overlay
///
/// Wind data goes to the velocity overlay unchanged. Its first record's
/// `refTime` then becomes the timestamp heading. Data arriving for an overlay
/// that is already bound is discarded.
pub fn bind(event: LoadEvent, overlays: &mut Overlays) {
    match event {
        LoadEvent::Wind(dataset) => {
            let ref_time = dataset.ref_time().map(str::to_owned);
            if overlays.velocity.set_data(dataset).is_err() {
                warn!("Wind overlay already has data, ignoring update");
                return;
            }
            match ref_time {
                Some(ref_time) => {
                    let control = TimestampControl::from_ref_time(&ref_time);
                    info!("Wind reference time {}", control.label());
                    overlays.controls.add(Box::new(control));
                }
                None => warn!("Wind data has no refTime, timestamp not shown"),
            }
        }
        LoadEvent::Pressure(field) => {
            if overlays.heatmap.set_data(field).is_err() {
                warn!("Pressure overlay already has data, ignoring update");
            }
        }
    }
}
