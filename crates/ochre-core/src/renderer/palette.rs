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

//! Palette indices with special meaning to the pixel shaders.

/// Texels with this index are never drawn by alpha-tested shaders.
pub const PALETTE_INDEX_TRANSPARENT: u8 = 0;

/// First light-level texel. Light-level texels re-shade the pixel already in
/// the frame buffer instead of contributing their own color.
pub const PALETTE_INDEX_LIGHT_LEVEL_LOWEST: u8 = 1;
/// Last light-level texel (inclusive).
pub const PALETTE_INDEX_LIGHT_LEVEL_HIGHEST: u8 = 13;

/// Source texel remapped to [`PALETTE_INDEX_LIGHT_LEVEL_DST1`].
pub const PALETTE_INDEX_LIGHT_LEVEL_SRC1: u8 = 14;
/// Source texel remapped to [`PALETTE_INDEX_LIGHT_LEVEL_DST2`].
pub const PALETTE_INDEX_LIGHT_LEVEL_SRC2: u8 = 15;
/// Light table column used in place of [`PALETTE_INDEX_LIGHT_LEVEL_SRC1`].
pub const PALETTE_INDEX_LIGHT_LEVEL_DST1: u8 = 158;
/// Light table column used in place of [`PALETTE_INDEX_LIGHT_LEVEL_SRC2`].
pub const PALETTE_INDEX_LIGHT_LEVEL_DST2: u8 = 159;

/// Reflective puddle texel for the horizon mirror shader.
pub const PALETTE_INDEX_PUDDLE_EVEN_ROW: u8 = 30;

/// Number of entries in a full 8-bit palette.
pub const PALETTE_LENGTH: usize = 256;

/// Returns `true` if the texel is one of the light-level sentinels.
#[inline]
pub fn is_light_level_texel(texel: u8) -> bool {
    (PALETTE_INDEX_LIGHT_LEVEL_LOWEST..=PALETTE_INDEX_LIGHT_LEVEL_HIGHEST).contains(&texel)
}
