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

//! Renderer configuration: initialization and per-frame settings.

use super::handles::ObjectTextureId;
use serde::{Deserialize, Serialize};

/// How the per-pixel light level is perturbed in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DitheringMode {
    /// No dithering; equal intensities always give equal light levels.
    #[default]
    None,
    /// A fixed 2x2 checker that darkens every other pixel by one level.
    Classic,
    /// Four ordered 2x2 masks chosen by the fractional light level.
    Modern,
}

impl DitheringMode {
    /// Number of boolean mask layers the dither buffer holds for this mode.
    #[inline]
    pub const fn mask_count(self) -> usize {
        match self {
            DitheringMode::None => 0,
            DitheringMode::Classic => 1,
            DitheringMode::Modern => 4,
        }
    }
}

impl TryFrom<i32> for DitheringMode {
    type Error = i32;

    /// Converts the integer option value (0 none, 1 classic, 2 modern).
    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DitheringMode::None),
            1 => Ok(DitheringMode::Classic),
            2 => Ok(DitheringMode::Modern),
            other => Err(other),
        }
    }
}

/// Upper bounds on the number of live entries in each resource pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolLimits {
    /// Maximum number of vertex position buffers.
    pub vertex_position_buffers: usize,
    /// Maximum number of vertex attribute buffers.
    pub vertex_attribute_buffers: usize,
    /// Maximum number of index buffers.
    pub index_buffers: usize,
    /// Maximum number of object textures.
    pub object_textures: usize,
    /// Maximum number of uniform buffers.
    pub uniform_buffers: usize,
    /// Maximum number of lights.
    pub lights: usize,
}

impl Default for PoolLimits {
    fn default() -> Self {
        Self {
            vertex_position_buffers: 4096,
            vertex_attribute_buffers: 4096,
            index_buffers: 4096,
            object_textures: 8192,
            uniform_buffers: 4096,
            lights: 1024,
        }
    }
}

/// Settings used once when the renderer is initialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderInitSettings {
    /// Frame buffer width in pixels.
    pub width: usize,
    /// Frame buffer height in pixels.
    pub height: usize,
    /// Initial dithering mode; the dither buffer is built for it right away.
    pub dithering_mode: DitheringMode,
    /// Capacities of the resource pools.
    pub pool_limits: PoolLimits,
}

impl Default for RenderInitSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 400,
            dithering_mode: DitheringMode::Classic,
            pool_limits: PoolLimits::default(),
        }
    }
}

/// Frame-wide inputs supplied alongside the draw call list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderFrameSettings {
    /// 32-bit texture with one color per palette index.
    pub palette_texture_id: ObjectTextureId,
    /// 8-bit texture whose rows are light levels and columns palette indices.
    pub light_table_texture_id: ObjectTextureId,
    /// 8-bit sky texture; its first texel is the horizon mirror fallback.
    pub sky_bg_texture_id: ObjectTextureId,
    /// Ambient light in `[0, 1]` added before per-pixel lights.
    pub ambient_percent: f64,
    /// Dithering mode for per-pixel lit draw calls.
    pub dithering_mode: DitheringMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dithering_mode_from_legacy_integer() {
        assert_eq!(DitheringMode::try_from(0), Ok(DitheringMode::None));
        assert_eq!(DitheringMode::try_from(2), Ok(DitheringMode::Modern));
        assert_eq!(DitheringMode::try_from(7), Err(7));
    }

    #[test]
    fn test_init_settings_from_partial_json() {
        let json = r#"{ "width": 320, "dithering_mode": "modern" }"#;
        let settings: RenderInitSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.width, 320);
        assert_eq!(settings.height, RenderInitSettings::default().height);
        assert_eq!(settings.dithering_mode, DitheringMode::Modern);
        assert_eq!(settings.pool_limits, PoolLimits::default());
    }
}
