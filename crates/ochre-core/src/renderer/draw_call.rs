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

//! Describes one unit of geometry submitted for rendering in a frame.

use super::handles::{
    IndexBufferId, LightId, ObjectTextureId, UniformBufferId, VertexAttributeBufferId,
    VertexPositionBufferId,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Maximum number of lights a single per-pixel lit draw call can reference.
pub const MAX_LIGHTS: usize = 8;

// --- Shader Variants ---

/// Selects how a draw call's vertices are brought into clip space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VertexShaderType {
    /// `clip = projection * view * model * vertex`.
    #[default]
    Basic,
    /// Same math as [`VertexShaderType::Basic`], used for entity meshes.
    Entity,
    /// Scales the mesh around a pivot before the model transform, so that a
    /// door can sink into or rise from the floor.
    RaisingDoor {
        /// Uniform buffer whose element 0 is the pivot offset as a `Vec3`.
        pre_scale_translation_buffer_id: UniformBufferId,
    },
}

/// Selects how each covered pixel is shaded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PixelShaderType {
    /// Always writes the lit texel.
    #[default]
    Opaque,
    /// Samples the overlay texture (slot 1) by UV; transparent overlay texels
    /// fall back to the base texture (slot 0) sampled in screen space.
    OpaqueWithAlphaTestLayer,
    /// Discards transparent texels.
    AlphaTested,
    /// Like [`PixelShaderType::AlphaTested`] with U remapped into `[u_min, 1]`.
    AlphaTestedWithVariableTexCoordUMin {
        /// Lower bound of the remapped U axis.
        u_min: f64,
    },
    /// Like [`PixelShaderType::AlphaTested`] with V remapped into `[v_min, 1]`.
    AlphaTestedWithVariableTexCoordVMin {
        /// Lower bound of the remapped V axis.
        v_min: f64,
    },
    /// Remaps the texel through a 256-entry lookup texture (slot 1) before lighting.
    AlphaTestedWithPaletteIndexLookup,
    /// Alpha test followed by a regular light table lookup.
    AlphaTestedWithLightLevelColor,
    /// Light-level texels re-shade the pixel already in the frame buffer.
    AlphaTestedWithLightLevelOpacity,
    /// Draws the raw texel only where the existing pixel is dark enough.
    AlphaTestedWithPreviousBrightnessLimit,
    /// Puddle texels mirror the frame buffer across the horizon line.
    AlphaTestedWithHorizonMirror,
}

/// How texture coordinates for one texture slot are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureSamplingType {
    /// Perspective-correct interpolated UVs.
    #[default]
    Default,
    /// U follows screen X; V repeats twice over the screen height.
    ScreenSpaceRepeatY,
}

// --- Textures ---

/// A texture slot whose contents are chosen by the scene each frame.
///
/// Clones share the same cell, so a draw call list built once can pick up a
/// new texture (e.g. an animation frame) without being rebuilt.
#[derive(Debug, Clone, Default)]
pub struct VaryingTexture(Arc<AtomicUsize>);

impl VaryingTexture {
    const UNSET: usize = usize::MAX;

    /// Creates a cell pointing at `id`.
    pub fn new(id: ObjectTextureId) -> Self {
        let cell = Self(Arc::new(AtomicUsize::new(Self::UNSET)));
        cell.set(Some(id));
        cell
    }

    /// Points the cell at a texture, or at nothing.
    pub fn set(&self, id: Option<ObjectTextureId>) {
        let raw = id.map_or(Self::UNSET, |id| id.0);
        self.0.store(raw, Ordering::Relaxed);
    }

    /// The texture currently referenced, if any.
    pub fn get(&self) -> Option<ObjectTextureId> {
        match self.0.load(Ordering::Relaxed) {
            Self::UNSET => None,
            raw => Some(ObjectTextureId(raw)),
        }
    }
}

/// One texture slot of a draw call.
#[derive(Debug, Clone)]
pub enum RenderTexture {
    /// A texture fixed when the draw call was built.
    Fixed(ObjectTextureId),
    /// A texture read from a shared cell at submit time.
    Varying(VaryingTexture),
}

impl RenderTexture {
    /// Resolves the slot to a texture handle.
    #[inline]
    pub fn resolve(&self) -> Option<ObjectTextureId> {
        match self {
            RenderTexture::Fixed(id) => Some(*id),
            RenderTexture::Varying(cell) => cell.get(),
        }
    }
}

impl From<ObjectTextureId> for RenderTexture {
    fn from(id: ObjectTextureId) -> Self {
        RenderTexture::Fixed(id)
    }
}

impl From<VaryingTexture> for RenderTexture {
    fn from(cell: VaryingTexture) -> Self {
        RenderTexture::Varying(cell)
    }
}

// --- Lighting ---

/// A bounded list of lights affecting one draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightIdList {
    ids: [LightId; MAX_LIGHTS],
    count: usize,
}

impl LightIdList {
    /// Creates an empty list.
    pub const fn new() -> Self {
        Self {
            ids: [LightId(0); MAX_LIGHTS],
            count: 0,
        }
    }

    /// Appends a light. Returns `false` and leaves the list unchanged once it is full.
    pub fn push(&mut self, id: LightId) -> bool {
        if self.count == MAX_LIGHTS {
            return false;
        }
        self.ids[self.count] = id;
        self.count += 1;
        true
    }

    /// Removes every light from the list.
    pub fn clear(&mut self) {
        self.count = 0;
    }

    /// Number of lights in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if the list holds no lights.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The lights as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[LightId] {
        &self.ids[..self.count]
    }
}

impl Default for LightIdList {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a LightIdList {
    type Item = &'a LightId;
    type IntoIter = std::slice::Iter<'a, LightId>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

/// How the light intensity of a draw call's pixels is computed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderLightingType {
    /// A single intensity in `[0, 1]` for the whole mesh. Never dithered.
    PerMesh(f64),
    /// Ambient plus the falloff of each listed light, evaluated per pixel.
    PerPixel(LightIdList),
}

impl Default for RenderLightingType {
    fn default() -> Self {
        RenderLightingType::PerMesh(1.0)
    }
}

// --- Draw Call ---

/// Everything needed to draw one mesh instance.
#[derive(Debug, Clone)]
pub struct RenderDrawCall {
    /// Vertex positions, three components per vertex.
    pub position_buffer_id: VertexPositionBufferId,
    /// Texture coordinates, two components per vertex.
    pub tex_coord_buffer_id: VertexAttributeBufferId,
    /// Triangle indices.
    pub index_buffer_id: IndexBufferId,
    /// Uniform buffer of [`RenderTransform`](super::transform::RenderTransform)s.
    pub transform_buffer_id: UniformBufferId,
    /// Element of `transform_buffer_id` used for this draw call.
    pub transform_index: usize,
    /// Texture slots 0 and 1. Slot 1 is only read by two-texture shaders.
    pub textures: [Option<RenderTexture>; 2],
    /// Sampling mode per texture slot.
    pub texture_sampling_types: [TextureSamplingType; 2],
    /// Vertex shader variant.
    pub vertex_shader_type: VertexShaderType,
    /// Pixel shader variant, with its parameters.
    pub pixel_shader_type: PixelShaderType,
    /// Per-mesh or per-pixel lighting.
    pub lighting: RenderLightingType,
    /// Test incoming depth against the depth buffer.
    pub enable_depth_read: bool,
    /// Store the depth of written pixels.
    pub enable_depth_write: bool,
}

impl RenderDrawCall {
    /// Creates an opaque, depth-tested, fully lit draw call with a single texture.
    pub fn new(
        position_buffer_id: VertexPositionBufferId,
        tex_coord_buffer_id: VertexAttributeBufferId,
        index_buffer_id: IndexBufferId,
        transform_buffer_id: UniformBufferId,
        texture: impl Into<RenderTexture>,
    ) -> Self {
        Self {
            position_buffer_id,
            tex_coord_buffer_id,
            index_buffer_id,
            transform_buffer_id,
            transform_index: 0,
            textures: [Some(texture.into()), None],
            texture_sampling_types: [TextureSamplingType::Default; 2],
            vertex_shader_type: VertexShaderType::Basic,
            pixel_shader_type: PixelShaderType::Opaque,
            lighting: RenderLightingType::default(),
            enable_depth_read: true,
            enable_depth_write: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_light_id_list_is_bounded() {
        let mut list = LightIdList::new();
        for i in 0..MAX_LIGHTS {
            assert!(list.push(LightId(i)));
        }
        assert!(!list.push(LightId(99)));
        assert_eq!(list.len(), MAX_LIGHTS);
        assert_eq!(list.as_slice().last(), Some(&LightId(MAX_LIGHTS - 1)));
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn test_varying_texture_is_shared_between_clones() {
        let cell = VaryingTexture::new(ObjectTextureId(3));
        let slot = RenderTexture::Varying(cell.clone());
        assert_eq!(slot.resolve(), Some(ObjectTextureId(3)));

        cell.set(Some(ObjectTextureId(7)));
        assert_eq!(slot.resolve(), Some(ObjectTextureId(7)));

        cell.set(None);
        assert_eq!(slot.resolve(), None);
    }
}
