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

use crate::math::Vec3;
use crate::renderer::camera::RenderCamera;
use crate::renderer::draw_call::RenderDrawCall;
use crate::renderer::error::{RenderError, ResourceError};
use crate::renderer::handles::*;
use crate::renderer::settings::{RenderFrameSettings, RenderInitSettings};
use crate::renderer::stats::ProfilerData;
use crate::renderer::texture::{LockedTexture, TexelFormat, TextureBuilder};
use std::fmt::Debug;

/// A renderer that owns pooled geometry, textures, uniforms and lights, and
/// turns a list of draw calls into a finished 32-bit color buffer.
///
/// Every creation call either returns a fresh handle or fails without side
/// effects. Every populate call either copies all of the incoming data or
/// nothing. Callers are responsible for the order of draw calls: no sorting is
/// done on submission.
pub trait RenderBackend: Send + Debug {
    // --- Lifecycle ---

    /// Allocates the frame buffers and resource pools.
    fn init(&mut self, settings: &RenderInitSettings) -> Result<(), RenderError>;

    /// Releases every resource and frame buffer.
    fn shutdown(&mut self);

    /// Returns `true` between a successful [`RenderBackend::init`] and [`RenderBackend::shutdown`].
    fn is_initialized(&self) -> bool;

    /// Reallocates and clears the frame buffers for a new output size.
    fn resize(&mut self, width: usize, height: usize) -> Result<(), RenderError>;

    // --- Geometry Buffers ---

    /// Allocates a zeroed vertex position buffer.
    ///
    /// Draw calls read `x, y, z` from the start of each vertex and skip any
    /// further components; a buffer with fewer than three is skipped at draw time.
    /// ## Errors
    /// * `ResourceError::InvalidDimensions` - If the vertex count is zero or
    ///   `components_per_vertex < 2`.
    /// * `ResourceError::PoolExhausted` - If no slot is free.
    fn try_create_vertex_position_buffer(
        &mut self,
        vertex_count: usize,
        components_per_vertex: usize,
    ) -> Result<VertexPositionBufferId, ResourceError>;

    /// Copies positions into a buffer. The length must match the allocated size exactly.
    fn populate_vertex_position_buffer(
        &mut self,
        id: VertexPositionBufferId,
        positions: &[f64],
    ) -> Result<(), ResourceError>;

    /// Returns a vertex position buffer's slot to its pool.
    fn free_vertex_position_buffer(&mut self, id: VertexPositionBufferId) -> Result<(), ResourceError>;

    /// Allocates a zeroed vertex attribute buffer. Draw calls read `u, v` from
    /// the start of each vertex.
    fn try_create_vertex_attribute_buffer(
        &mut self,
        vertex_count: usize,
        components_per_vertex: usize,
    ) -> Result<VertexAttributeBufferId, ResourceError>;

    /// Copies attributes into a buffer. The length must match the allocated size exactly.
    fn populate_vertex_attribute_buffer(
        &mut self,
        id: VertexAttributeBufferId,
        attributes: &[f64],
    ) -> Result<(), ResourceError>;

    /// Returns a vertex attribute buffer's slot to its pool.
    fn free_vertex_attribute_buffer(&mut self, id: VertexAttributeBufferId) -> Result<(), ResourceError>;

    /// Allocates a zeroed index buffer.
    /// ## Errors
    /// * `ResourceError::InvalidDimensions` - If `index_count` is zero or not a multiple of 3.
    fn try_create_index_buffer(&mut self, index_count: usize) -> Result<IndexBufferId, ResourceError>;

    /// Copies indices into a buffer. The length must match the allocated size exactly.
    fn populate_index_buffer(&mut self, id: IndexBufferId, indices: &[u32]) -> Result<(), ResourceError>;

    /// Returns an index buffer's slot to its pool.
    fn free_index_buffer(&mut self, id: IndexBufferId) -> Result<(), ResourceError>;

    // --- Uniform Buffers ---

    /// Allocates a zeroed buffer of `element_count` elements of `size_of_element` bytes,
    /// each starting on an `alignment_of_element` boundary.
    fn try_create_uniform_buffer(
        &mut self,
        element_count: usize,
        size_of_element: usize,
        alignment_of_element: usize,
    ) -> Result<UniformBufferId, ResourceError>;

    /// Overwrites every element. `bytes` must hold exactly `element_count * size_of_element` bytes.
    fn populate_uniform_buffer(&mut self, id: UniformBufferId, bytes: &[u8]) -> Result<(), ResourceError>;

    /// Overwrites one element. `bytes` must hold exactly `size_of_element` bytes.
    fn populate_uniform_at_index(
        &mut self,
        id: UniformBufferId,
        index: usize,
        bytes: &[u8],
    ) -> Result<(), ResourceError>;

    /// Returns a uniform buffer's slot to its pool.
    fn free_uniform_buffer(&mut self, id: UniformBufferId) -> Result<(), ResourceError>;

    /// Allocates a uniform buffer sized and aligned for `element_count` values of `T`.
    fn try_create_uniform_buffer_for<T: bytemuck::Pod>(
        &mut self,
        element_count: usize,
    ) -> Result<UniformBufferId, ResourceError>
    where
        Self: Sized,
    {
        self.try_create_uniform_buffer(
            element_count,
            std::mem::size_of::<T>(),
            std::mem::align_of::<T>(),
        )
    }

    /// Writes one typed value at `index`.
    fn populate_uniform_value_at_index<T: bytemuck::Pod>(
        &mut self,
        id: UniformBufferId,
        index: usize,
        value: &T,
    ) -> Result<(), ResourceError>
    where
        Self: Sized,
    {
        self.populate_uniform_at_index(id, index, bytemuck::bytes_of(value))
    }

    // --- Lights ---

    /// Allocates a light at the origin with zero radii.
    fn try_create_light(&mut self) -> Result<LightId, ResourceError>;

    /// Moves a light.
    fn set_light_position(&mut self, id: LightId, point: Vec3) -> Result<(), ResourceError>;

    /// Sets a light's falloff radii.
    /// ## Errors
    /// * `ResourceError::InvalidDimensions` - Unless `end_radius >= start_radius >= 0`.
    fn set_light_radius(
        &mut self,
        id: LightId,
        start_radius: f64,
        end_radius: f64,
    ) -> Result<(), ResourceError>;

    /// Returns a light's slot to its pool.
    fn free_light(&mut self, id: LightId) -> Result<(), ResourceError>;

    // --- Object Textures ---

    /// Allocates a zero-filled texture.
    fn try_create_object_texture(
        &mut self,
        width: usize,
        height: usize,
        format: TexelFormat,
    ) -> Result<ObjectTextureId, ResourceError>;

    /// Allocates a texture and copies the builder's texels into it.
    fn try_create_object_texture_from(
        &mut self,
        builder: &TextureBuilder,
    ) -> Result<ObjectTextureId, ResourceError>;

    /// Returns `(width, height)` of a texture.
    fn try_get_object_texture_dims(&self, id: ObjectTextureId) -> Result<(usize, usize), ResourceError>;

    /// Grants mutable access to a texture's texel bytes.
    fn lock_object_texture(&mut self, id: ObjectTextureId) -> Result<LockedTexture<'_>, ResourceError>;

    /// Ends a [`RenderBackend::lock_object_texture`] access.
    fn unlock_object_texture(&mut self, id: ObjectTextureId);

    /// Returns a texture's slot to its pool.
    fn free_object_texture(&mut self, id: ObjectTextureId) -> Result<(), ResourceError>;

    // --- Frame ---

    /// Counters describing the last submitted frame and the current pools.
    fn get_profiler_data(&self) -> ProfilerData;

    /// Renders `draw_calls` in order and writes `width * height` packed colors to `output`.
    ///
    /// ## Errors
    /// * `RenderError::NotInitialized` - If called before [`RenderBackend::init`].
    /// * `RenderError::InvalidFrameSettings` - If the palette or light table cannot be used,
    ///   or `output` has the wrong length.
    fn submit_frame(
        &mut self,
        camera: &RenderCamera,
        draw_calls: &[RenderDrawCall],
        settings: &RenderFrameSettings,
        output: &mut [u32],
    ) -> Result<(), RenderError>;

    /// Hands the last frame to the presentation layer.
    fn present(&mut self);
}
