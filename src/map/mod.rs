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

//! Map view and its plumbing.
//!
//! This module provides the basemap tile source, overlay composition,
//! map controls and the binding of loaded data to overlays.

pub mod basemap;
pub mod binder;
pub mod color;
pub mod composition;
pub mod controls;

pub use binder::OverlayBinder;
pub use composition::MapComposition;
