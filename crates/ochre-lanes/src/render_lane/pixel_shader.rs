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

//! Pixel shader variants and the texture, light table and palette views they sample.
//!
//! A shader decides which palette index a covered pixel receives, or that the
//! pixel is left untouched. Writing the index, depth and final color is the
//! raster lane's job, so every variant shares the same write rules.

use ochre_core::math::{texel_index, Vec2};
use ochre_core::renderer::palette::{
    is_light_level_texel, PALETTE_INDEX_LIGHT_LEVEL_DST1, PALETTE_INDEX_LIGHT_LEVEL_DST2,
    PALETTE_INDEX_LIGHT_LEVEL_LOWEST, PALETTE_INDEX_LIGHT_LEVEL_SRC1,
    PALETTE_INDEX_LIGHT_LEVEL_SRC2, PALETTE_INDEX_PUDDLE_EVEN_ROW, PALETTE_INDEX_TRANSPARENT,
    PALETTE_LENGTH,
};
use ochre_core::renderer::TextureSamplingType;

/// Highest value each RGB channel of the existing pixel may have for
/// [`PixelShader::AlphaTestedWithPreviousBrightnessLimit`] to draw over it.
pub const BRIGHTNESS_LIMIT: u32 = 0x3F;

const BRIGHTNESS_MASK: u32 = !BRIGHTNESS_LIMIT & 0xFF;
const BRIGHTNESS_MASK_RGB: u32 = (BRIGHTNESS_MASK << 16) | (BRIGHTNESS_MASK << 8) | BRIGHTNESS_MASK;

// --- Sampled Resources ---

/// An 8-bit texture bound to a shader, with its sampling mode.
#[derive(Debug, Clone, Copy)]
pub struct ShaderTexture<'a> {
    texels: &'a [u8],
    width: usize,
    height: usize,
    sampling: TextureSamplingType,
}

impl<'a> ShaderTexture<'a> {
    /// Wraps paletted texels. Returns `None` unless `texels` holds exactly
    /// `width * height` values and neither dimension is zero.
    pub fn new(
        texels: &'a [u8],
        width: usize,
        height: usize,
        sampling: TextureSamplingType,
    ) -> Option<Self> {
        (width > 0 && height > 0 && texels.len() == width * height).then_some(Self {
            texels,
            width,
            height,
            sampling,
        })
    }

    #[inline]
    fn texel(&self, x: usize, y: usize) -> u8 {
        self.texels[x + y * self.width]
    }

    /// Nearest-neighbor lookup at a normalized coordinate.
    #[inline]
    pub fn sample_uv(&self, uv: Vec2) -> u8 {
        self.texel(texel_index(uv.x, self.width), texel_index(uv.y, self.height))
    }

    /// U follows the screen X position; V covers the texture twice over the screen height.
    #[inline]
    pub fn sample_screen_space_repeat_y(&self, x_percent: f64, y_percent: f64) -> u8 {
        let v = y_percent * 2.0;
        let v = if v >= 1.0 { v - 1.0 } else { v };
        self.texel(texel_index(x_percent, self.width), texel_index(v, self.height))
    }

    /// Samples according to the texture's sampling mode.
    #[inline]
    pub fn sample(&self, input: &PixelInput) -> u8 {
        match self.sampling {
            TextureSamplingType::Default => self.sample_uv(input.texel_percent),
            TextureSamplingType::ScreenSpaceRepeatY => {
                self.sample_screen_space_repeat_y(input.x_percent, input.y_percent)
            }
        }
    }
}

/// Rows of shaded palette indices, one row per light level.
///
/// Row 0 is the brightest. Every row has at least one column per palette entry.
#[derive(Debug, Clone, Copy)]
pub struct LightTable<'a> {
    texels: &'a [u8],
    texels_per_level: usize,
    level_count: usize,
}

impl<'a> LightTable<'a> {
    /// Wraps a light table texture. Returns `None` if it has no rows, fewer
    /// than 256 columns, or the wrong number of texels.
    pub fn new(texels: &'a [u8], width: usize, height: usize) -> Option<Self> {
        (width >= PALETTE_LENGTH && height > 0 && texels.len() == width * height).then_some(Self {
            texels,
            texels_per_level: width,
            level_count: height,
        })
    }

    /// Number of light levels.
    #[inline]
    pub fn level_count(&self) -> usize {
        self.level_count
    }

    /// The darkest valid light level.
    #[inline]
    pub fn darkest_level(&self) -> usize {
        self.level_count - 1
    }

    /// Maps an intensity in `[0, 1]` to a light level, darker levels being higher.
    ///
    /// Also returns the unclamped `intensity * level_count` used for dithering.
    #[inline]
    pub fn light_level(&self, intensity: f64) -> (usize, f64) {
        let level_real = intensity * self.level_count as f64;
        let brightness = (level_real as i64).clamp(0, self.darkest_level() as i64) as usize;
        (self.darkest_level() - brightness, level_real)
    }

    /// Looks up `column` in the row of `level`.
    #[inline]
    pub fn lookup(&self, column: u8, level: usize) -> u8 {
        self.texels[column as usize + level * self.texels_per_level]
    }
}

/// The 256 colors palette indices expand to.
#[derive(Debug, Clone, Copy)]
pub struct Palette<'a>(&'a [u32; PALETTE_LENGTH]);

impl<'a> Palette<'a> {
    /// Wraps a true-color texture. Returns `None` if it has fewer than 256 entries.
    pub fn new(colors: &'a [u32]) -> Option<Self> {
        colors
            .get(..PALETTE_LENGTH)
            .and_then(|c| <&[u32; PALETTE_LENGTH]>::try_from(c).ok())
            .map(Palette)
    }

    /// The color of a palette index.
    #[inline]
    pub fn color(&self, index: u8) -> u32 {
        self.0[index as usize]
    }
}

/// A 256-entry palette index remap.
#[derive(Debug, Clone, Copy)]
pub struct PaletteLookup<'a>(&'a [u8; PALETTE_LENGTH]);

impl<'a> PaletteLookup<'a> {
    /// Wraps a lookup texture. Returns `None` if it has fewer than 256 texels.
    pub fn new(texels: &'a [u8]) -> Option<Self> {
        texels
            .get(..PALETTE_LENGTH)
            .and_then(|t| <&[u8; PALETTE_LENGTH]>::try_from(t).ok())
            .map(PaletteLookup)
    }

    /// The replacement for `texel`.
    #[inline]
    pub fn remap(&self, texel: u8) -> u8 {
        self.0[texel as usize]
    }
}

// --- Shaders ---

/// A pixel shader variant with the resources it needs beyond texture slot 0.
#[derive(Debug, Clone, Copy)]
pub enum PixelShader<'a> {
    /// Always writes the lit texel.
    Opaque,
    /// Overlay texel by UV, or the base texture in screen space where the overlay is transparent.
    OpaqueWithAlphaTestLayer {
        /// The overlay texture.
        layer: ShaderTexture<'a>,
    },
    /// Discards transparent texels.
    AlphaTested,
    /// Alpha tested, U remapped into `[u_min, 1]`.
    AlphaTestedWithVariableTexCoordUMin {
        /// Lower bound of U.
        u_min: f64,
    },
    /// Alpha tested, V remapped into `[v_min, 1]`.
    AlphaTestedWithVariableTexCoordVMin {
        /// Lower bound of V.
        v_min: f64,
    },
    /// Alpha tested, texel remapped before lighting.
    AlphaTestedWithPaletteIndexLookup {
        /// The remap table.
        lookup: PaletteLookup<'a>,
    },
    /// Alpha tested, regular lighting.
    AlphaTestedWithLightLevelColor,
    /// Light-level texels re-shade what is already in the frame buffer.
    AlphaTestedWithLightLevelOpacity,
    /// Draws the unlit texel over dark pixels only.
    AlphaTestedWithPreviousBrightnessLimit,
    /// Puddle texels mirror the frame buffer across the horizon.
    AlphaTestedWithHorizonMirror {
        /// Index used where the mirrored pixel falls off screen.
        fallback_sky_color: u8,
    },
}

/// Per-pixel values computed by the raster lane.
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelInput {
    /// Row-major index of the pixel.
    pub pixel_index: usize,
    /// Pixel center X over frame buffer width.
    pub x_percent: f64,
    /// Pixel center Y over frame buffer height.
    pub y_percent: f64,
    /// Perspective-correct texture coordinate.
    pub texel_percent: Vec2,
    /// Selected light table row.
    pub light_level: usize,
    /// Pixel mirrored across the horizon, if it lies inside the frame buffer.
    pub reflected_pixel_index: Option<usize>,
}

#[inline]
fn is_transparent(texel: u8) -> bool {
    texel == PALETTE_INDEX_TRANSPARENT
}

/// Shared environment of every pixel in one draw call.
#[derive(Debug, Clone, Copy)]
pub struct ShaderResources<'a> {
    /// Texture slot 0.
    pub texture: ShaderTexture<'a>,
    /// The frame's light table.
    pub light_table: LightTable<'a>,
    /// The frame's palette.
    pub palette: Palette<'a>,
}

impl PixelShader<'_> {
    /// Runs the shader for one pixel.
    ///
    /// `palette_indices` is the frame buffer as it stands before this pixel is
    /// written. Returns the palette index to write, or `None` to leave the
    /// pixel untouched.
    pub fn shade(
        &self,
        res: &ShaderResources<'_>,
        input: &PixelInput,
        palette_indices: &[u8],
    ) -> Option<u8> {
        let lit = |texel: u8| res.light_table.lookup(texel, input.light_level);
        let texture = &res.texture;

        match *self {
            PixelShader::Opaque => Some(lit(texture.sample(input))),
            PixelShader::OpaqueWithAlphaTestLayer { layer } => {
                let overlay = layer.sample_uv(input.texel_percent);
                let texel = if is_transparent(overlay) {
                    texture.sample_screen_space_repeat_y(input.x_percent, input.y_percent)
                } else {
                    overlay
                };
                Some(lit(texel))
            }
            PixelShader::AlphaTested | PixelShader::AlphaTestedWithLightLevelColor => {
                let texel = texture.sample_uv(input.texel_percent);
                (!is_transparent(texel)).then(|| lit(texel))
            }
            PixelShader::AlphaTestedWithVariableTexCoordUMin { u_min } => {
                let u = (u_min + (1.0 - u_min) * input.texel_percent.x).clamp(u_min, 1.0);
                let texel = texture.sample_uv(Vec2::new(u, input.texel_percent.y));
                (!is_transparent(texel)).then(|| lit(texel))
            }
            PixelShader::AlphaTestedWithVariableTexCoordVMin { v_min } => {
                let v = (v_min + (1.0 - v_min) * input.texel_percent.y).clamp(v_min, 1.0);
                let texel = texture.sample_uv(Vec2::new(input.texel_percent.x, v));
                (!is_transparent(texel)).then(|| lit(texel))
            }
            PixelShader::AlphaTestedWithPaletteIndexLookup { lookup } => {
                let texel = texture.sample_uv(input.texel_percent);
                (!is_transparent(texel)).then(|| lit(lookup.remap(texel)))
            }
            PixelShader::AlphaTestedWithLightLevelOpacity => {
                let texel = texture.sample_uv(input.texel_percent);
                if is_transparent(texel) {
                    return None;
                }
                let table = &res.light_table;
                let shaded = if is_light_level_texel(texel) {
                    let level = ((texel - PALETTE_INDEX_LIGHT_LEVEL_LOWEST) as usize)
                        .min(table.darkest_level());
                    table.lookup(palette_indices[input.pixel_index], level)
                } else if texel == PALETTE_INDEX_LIGHT_LEVEL_SRC1 {
                    lit(PALETTE_INDEX_LIGHT_LEVEL_DST1)
                } else if texel == PALETTE_INDEX_LIGHT_LEVEL_SRC2 {
                    lit(PALETTE_INDEX_LIGHT_LEVEL_DST2)
                } else {
                    lit(texel)
                };
                Some(shaded)
            }
            PixelShader::AlphaTestedWithPreviousBrightnessLimit => {
                let previous = res.palette.color(palette_indices[input.pixel_index]);
                if previous & BRIGHTNESS_MASK_RGB != 0 {
                    return None;
                }
                let texel = texture.sample_uv(input.texel_percent);
                (!is_transparent(texel)).then_some(texel)
            }
            PixelShader::AlphaTestedWithHorizonMirror { fallback_sky_color } => {
                let texel = texture.sample_uv(input.texel_percent);
                if is_transparent(texel) {
                    return None;
                }
                if texel == PALETTE_INDEX_PUDDLE_EVEN_ROW {
                    Some(match input.reflected_pixel_index {
                        Some(index) => palette_indices[index],
                        None => fallback_sky_color,
                    })
                } else {
                    Some(lit(texel))
                }
            }
        }
    }
}
