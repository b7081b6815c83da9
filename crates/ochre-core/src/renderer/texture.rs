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

//! Texture formats, CPU-side texture descriptions and locked texel access.

use serde::{Deserialize, Serialize};

/// The storage format of an object texture's texels.
///
/// Only two widths exist: an 8-bit palette index or a packed 32-bit color.
/// Any other width cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TexelFormat {
    /// One byte per texel holding a palette index.
    Paletted8,
    /// Four bytes per texel holding a packed `0xAARRGGBB` color.
    TrueColor32,
}

impl TexelFormat {
    /// Returns the number of bytes a single texel occupies.
    #[inline]
    pub const fn bytes_per_texel(self) -> usize {
        match self {
            TexelFormat::Paletted8 => 1,
            TexelFormat::TrueColor32 => 4,
        }
    }

    /// Maps a raw bytes-per-texel count to a format, if one exists.
    pub fn from_bytes_per_texel(bytes: usize) -> Option<Self> {
        match bytes {
            1 => Some(TexelFormat::Paletted8),
            4 => Some(TexelFormat::TrueColor32),
            _ => None,
        }
    }
}

/// Decoded texel data handed to the renderer by an upstream asset loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureBuilder {
    /// Palette-indexed texels, row-major.
    Paletted {
        /// Width in texels.
        width: usize,
        /// Height in texels.
        height: usize,
        /// `width * height` palette indices.
        texels: Vec<u8>,
    },
    /// True-color texels, row-major.
    TrueColor {
        /// Width in texels.
        width: usize,
        /// Height in texels.
        height: usize,
        /// `width * height` packed colors.
        texels: Vec<u32>,
    },
}

impl TextureBuilder {
    /// Width in texels.
    pub fn width(&self) -> usize {
        match self {
            TextureBuilder::Paletted { width, .. } | TextureBuilder::TrueColor { width, .. } => {
                *width
            }
        }
    }

    /// Height in texels.
    pub fn height(&self) -> usize {
        match self {
            TextureBuilder::Paletted { height, .. } | TextureBuilder::TrueColor { height, .. } => {
                *height
            }
        }
    }

    /// The texel format the built texture will use.
    pub fn format(&self) -> TexelFormat {
        match self {
            TextureBuilder::Paletted { .. } => TexelFormat::Paletted8,
            TextureBuilder::TrueColor { .. } => TexelFormat::TrueColor32,
        }
    }

    /// The texel data as raw bytes in native endianness.
    pub fn texel_bytes(&self) -> &[u8] {
        match self {
            TextureBuilder::Paletted { texels, .. } => texels,
            TextureBuilder::TrueColor { texels, .. } => bytemuck::cast_slice(texels),
        }
    }
}

/// Direct CPU access to a texture's texel storage.
///
/// Returned by `lock_object_texture`. Storage is host memory, so writes are
/// visible to the next submitted frame without any upload step.
#[derive(Debug)]
pub struct LockedTexture<'a> {
    /// The texel bytes, `width * height * format.bytes_per_texel()` long.
    pub texels: &'a mut [u8],
    /// The format of the texels.
    pub format: TexelFormat,
}

impl LockedTexture<'_> {
    /// Number of bytes per texel.
    #[inline]
    pub fn bytes_per_texel(&self) -> usize {
        self.format.bytes_per_texel()
    }
}
