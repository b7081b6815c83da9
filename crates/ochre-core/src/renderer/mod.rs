// Copyright 2025 eraflo
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

//! Provides the public rendering contracts for Ochre.
//!
//! This module defines the "common language" shared by every layer: resource
//! handles, the per-frame camera, draw calls and their shader variants, frame
//! settings, diagnostics, and the [`RenderBackend`] trait. The hot path lives in
//! `ochre-lanes`; a concrete backend lives in `ochre-infra`.

pub mod camera;
pub mod draw_call;
pub mod error;
pub mod handles;
pub mod light;
pub mod palette;
pub mod settings;
pub mod stats;
pub mod texture;
pub mod traits;
pub mod transform;

// Re-export the most important traits and types for easier use.
pub use self::camera::RenderCamera;
pub use self::draw_call::{
    LightIdList, PixelShaderType, RenderDrawCall, RenderLightingType, RenderTexture,
    TextureSamplingType, VaryingTexture, VertexShaderType, MAX_LIGHTS,
};
pub use self::error::{RenderError, ResourceError};
pub use self::handles::*;
pub use self::light::Light;
pub use self::settings::{DitheringMode, PoolLimits, RenderFrameSettings, RenderInitSettings};
pub use self::stats::ProfilerData;
pub use self::texture::{LockedTexture, TexelFormat, TextureBuilder};
pub use self::traits::RenderBackend;
pub use self::transform::RenderTransform;
