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

//! Screen-space dither masks for per-pixel light levels.

use ochre_core::renderer::DitheringMode;

/// Boolean masks, one layer per mask, sized to the frame buffer.
///
/// Rebuilt only when the frame buffer size or the dithering mode changes.
#[derive(Debug, Clone, Default)]
pub struct DitherBuffer {
    width: usize,
    height: usize,
    mode: DitheringMode,
    masks: Vec<bool>,
}

impl DitherBuffer {
    /// Builds the masks for `mode`.
    pub fn new(width: usize, height: usize, mode: DitheringMode) -> Self {
        let layer_count = mode.mask_count();
        let mut masks = Vec::with_capacity(width * height * layer_count);
        for layer in 0..layer_count {
            for y in 0..height {
                for x in 0..width {
                    masks.push(mask_value(mode, layer, x, y));
                }
            }
        }
        log::debug!("Built {mode:?} dither buffer ({width}x{height}, {layer_count} masks).");
        Self {
            width,
            height,
            mode,
            masks,
        }
    }

    /// The mode the masks were built for.
    #[inline]
    pub fn mode(&self) -> DitheringMode {
        self.mode
    }

    /// Whether the light level at `(x, y)` should be pushed one step darker.
    ///
    /// `intensity` is the summed light in `[0, 1]` and `light_level_real` is
    /// that intensity scaled by the light table's level count.
    #[inline]
    pub fn should_dither(&self, x: usize, y: usize, intensity: f64, light_level_real: f64) -> bool {
        let layer = match self.mode {
            DitheringMode::None => return false,
            DitheringMode::Classic => 0,
            DitheringMode::Modern => {
                if intensity >= 1.0 {
                    return false;
                }
                let mask_count = self.mode.mask_count();
                let fraction = light_level_real - light_level_real.floor();
                ((mask_count as f64 * fraction) as i64).clamp(0, mask_count as i64 - 1) as usize
            }
        };
        let index = x + y * self.width + layer * self.width * self.height;
        self.masks.get(index).copied().unwrap_or(false)
    }
}

fn mask_value(mode: DitheringMode, layer: usize, x: usize, y: usize) -> bool {
    let checker = (x + y) & 1 == 0;
    match (mode, layer) {
        (DitheringMode::Classic, _) => checker,
        // Top left, bottom right and top right of each 2x2 block.
        (DitheringMode::Modern, 0) => checker || (x % 2 == 1 && y % 2 == 0),
        (DitheringMode::Modern, 1) => checker,
        (DitheringMode::Modern, 2) => x % 2 == 0 && y % 2 == 0,
        _ => false,
    }
}
