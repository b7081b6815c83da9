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

//! The CPU implementation of the [`RenderBackend`] trait.

use super::pool::Pool;
use super::resources::{IndexBuffer, ObjectTexture, UniformBuffer, VertexBuffer};
use ochre_core::math::Vec3;
use ochre_core::renderer::{
    IndexBufferId, Light, LightId, LockedTexture, ObjectTextureId, PixelShaderType, PoolLimits,
    ProfilerData, RenderBackend, RenderCamera, RenderDrawCall, RenderError, RenderFrameSettings,
    RenderInitSettings, RenderLightingType, RenderTexture, RenderTransform, ResourceError,
    TexelFormat, TextureBuilder, UniformBufferId, VertexAttributeBufferId, VertexPositionBufferId,
    VertexShaderType, MAX_LIGHTS,
};
use ochre_lanes::render_lane::{
    process_mesh, rasterize_triangles, DitherBuffer, DrawState, FrameBufferView, FrameBuffers,
    FrameContext, FrameStats, GeometryError, LightTable, LightingMode, MeshInput, Palette,
    PaletteLookup, PixelShader, RasterFrame, ShaderResources, ShaderTexture, VertexShader,
};
use thiserror::Error;

/// Clipped triangles reserved per mesh up front.
const MESH_TRIANGLE_CAPACITY: usize = 4096;

/// Why a single draw call was skipped. The rest of the frame still renders.
#[derive(Debug, Error)]
enum DrawCallError {
    #[error(transparent)]
    Resource(#[from] ResourceError),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("texture slot {slot} is empty")]
    MissingTexture { slot: usize },
    #[error("texture {id:?} cannot be used as {usage}")]
    UnusableTexture {
        id: ObjectTextureId,
        usage: &'static str,
    },
}

/// Every resource pool, indexed by the handles handed out to callers.
#[derive(Debug)]
struct ResourcePools {
    vertex_position_buffers: Pool<VertexBuffer>,
    vertex_attribute_buffers: Pool<VertexBuffer>,
    index_buffers: Pool<IndexBuffer>,
    object_textures: Pool<ObjectTexture>,
    uniform_buffers: Pool<UniformBuffer>,
    lights: Pool<Light>,
}

impl ResourcePools {
    fn new(limits: &PoolLimits) -> Self {
        Self {
            vertex_position_buffers: Pool::new(
                "vertex position buffer",
                limits.vertex_position_buffers,
            ),
            vertex_attribute_buffers: Pool::new(
                "vertex attribute buffer",
                limits.vertex_attribute_buffers,
            ),
            index_buffers: Pool::new("index buffer", limits.index_buffers),
            object_textures: Pool::new("object texture", limits.object_textures),
            uniform_buffers: Pool::new("uniform buffer", limits.uniform_buffers),
            lights: Pool::new("light", limits.lights),
        }
    }

    fn texture(&self, id: ObjectTextureId) -> Result<&ObjectTexture, ResourceError> {
        self.object_textures.get(id.0)
    }
}

/// Frame-wide lookups resolved once per submitted frame.
#[derive(Debug, Clone, Copy)]
struct FrameEnvironment<'a> {
    palette: Palette<'a>,
    light_table: LightTable<'a>,
    sky_color: u8,
    ambient_percent: f64,
}

impl<'a> FrameEnvironment<'a> {
    fn resolve(pools: &'a ResourcePools, settings: &RenderFrameSettings) -> Result<Self, RenderError> {
        let invalid = |id: ObjectTextureId, requirement: &str| {
            RenderError::InvalidFrameSettings(format!("texture {id:?} {requirement}"))
        };

        let palette_id = settings.palette_texture_id;
        let palette = pools
            .texture(palette_id)?
            .texels_32bit()
            .and_then(Palette::new)
            .ok_or_else(|| invalid(palette_id, "must hold at least 256 true-color texels"))?;

        let light_table_id = settings.light_table_texture_id;
        let light_table_texture = pools.texture(light_table_id)?;
        let light_table = light_table_texture
            .texels_8bit()
            .and_then(|texels| {
                LightTable::new(
                    texels,
                    light_table_texture.width(),
                    light_table_texture.height(),
                )
            })
            .ok_or_else(|| invalid(light_table_id, "must be 8-bit and at least 256 texels wide"))?;

        let sky_id = settings.sky_bg_texture_id;
        let sky_color = pools
            .texture(sky_id)?
            .texels_8bit()
            .and_then(|texels| texels.first().copied())
            .ok_or_else(|| invalid(sky_id, "must be 8-bit"))?;

        Ok(Self {
            palette,
            light_table,
            sky_color,
            ambient_percent: settings.ambient_percent,
        })
    }
}

/// A single-threaded software rasterizer writing 8-bit palette indices and
/// their 32-bit colors.
///
/// Resource calls work before [`RenderBackend::init`] using default pool
/// limits; `init` replaces every pool with ones sized from its settings.
#[derive(Debug)]
pub struct SoftwareRenderer {
    initialized: bool,
    pools: ResourcePools,
    frame_buffers: FrameBuffers,
    dither: DitherBuffer,
    frame_context: FrameContext,
    last_frame_stats: FrameStats,
}

impl Default for SoftwareRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftwareRenderer {
    /// Creates an uninitialized renderer.
    pub fn new() -> Self {
        Self {
            initialized: false,
            pools: ResourcePools::new(&PoolLimits::default()),
            frame_buffers: FrameBuffers::default(),
            dither: DitherBuffer::default(),
            frame_context: FrameContext::default(),
            last_frame_stats: FrameStats::default(),
        }
    }

    /// The palette indices of the last submitted frame.
    pub fn palette_indices(&self) -> &[u8] {
        self.frame_buffers.palette_indices()
    }

    /// The depth buffer of the last submitted frame.
    pub fn depth(&self) -> &[f64] {
        self.frame_buffers.depth()
    }
}

fn check_frame_size(width: usize, height: usize) -> Result<(), RenderError> {
    if width == 0 || height == 0 {
        return Err(ResourceError::InvalidDimensions(format!("{width}x{height} frame buffer")).into());
    }
    Ok(())
}

// --- Draw Call Resolution ---

fn slot_texture<'a>(
    pools: &'a ResourcePools,
    draw_call: &RenderDrawCall,
    slot: usize,
) -> Result<(ObjectTextureId, &'a ObjectTexture), DrawCallError> {
    let id = draw_call.textures[slot]
        .as_ref()
        .and_then(RenderTexture::resolve)
        .ok_or(DrawCallError::MissingTexture { slot })?;
    Ok((id, pools.texture(id)?))
}

fn shader_texture<'a>(
    pools: &'a ResourcePools,
    draw_call: &RenderDrawCall,
    slot: usize,
) -> Result<ShaderTexture<'a>, DrawCallError> {
    let (id, texture) = slot_texture(pools, draw_call, slot)?;
    texture
        .texels_8bit()
        .and_then(|texels| {
            ShaderTexture::new(
                texels,
                texture.width(),
                texture.height(),
                draw_call.texture_sampling_types[slot],
            )
        })
        .ok_or(DrawCallError::UnusableTexture {
            id,
            usage: "an 8-bit shader texture",
        })
}

fn pixel_shader<'a>(
    pools: &'a ResourcePools,
    draw_call: &RenderDrawCall,
    env: &FrameEnvironment<'_>,
) -> Result<PixelShader<'a>, DrawCallError> {
    Ok(match draw_call.pixel_shader_type {
        PixelShaderType::Opaque => PixelShader::Opaque,
        PixelShaderType::OpaqueWithAlphaTestLayer => PixelShader::OpaqueWithAlphaTestLayer {
            layer: shader_texture(pools, draw_call, 1)?,
        },
        PixelShaderType::AlphaTested => PixelShader::AlphaTested,
        PixelShaderType::AlphaTestedWithVariableTexCoordUMin { u_min } => {
            PixelShader::AlphaTestedWithVariableTexCoordUMin { u_min }
        }
        PixelShaderType::AlphaTestedWithVariableTexCoordVMin { v_min } => {
            PixelShader::AlphaTestedWithVariableTexCoordVMin { v_min }
        }
        PixelShaderType::AlphaTestedWithPaletteIndexLookup => {
            let (id, texture) = slot_texture(pools, draw_call, 1)?;
            let lookup = texture
                .texels_8bit()
                .and_then(PaletteLookup::new)
                .ok_or(DrawCallError::UnusableTexture {
                    id,
                    usage: "a 256-entry palette lookup",
                })?;
            PixelShader::AlphaTestedWithPaletteIndexLookup { lookup }
        }
        PixelShaderType::AlphaTestedWithLightLevelColor => {
            PixelShader::AlphaTestedWithLightLevelColor
        }
        PixelShaderType::AlphaTestedWithLightLevelOpacity => {
            PixelShader::AlphaTestedWithLightLevelOpacity
        }
        PixelShaderType::AlphaTestedWithPreviousBrightnessLimit => {
            PixelShader::AlphaTestedWithPreviousBrightnessLimit
        }
        PixelShaderType::AlphaTestedWithHorizonMirror => {
            PixelShader::AlphaTestedWithHorizonMirror {
                fallback_sky_color: env.sky_color,
            }
        }
    })
}

/// Runs one draw call through the geometry and raster lanes.
///
/// Every resource is resolved before any geometry is processed, so a skipped
/// draw call leaves the frame counters untouched.
fn draw_mesh(
    pools: &ResourcePools,
    draw_call: &RenderDrawCall,
    env: &FrameEnvironment<'_>,
    frame: &RasterFrame<'_>,
    ctx: &mut FrameContext,
    target: &mut FrameBufferView<'_>,
) -> Result<(), DrawCallError> {
    let transform: RenderTransform = pools
        .uniform_buffers
        .get(draw_call.transform_buffer_id.0)?
        .get(draw_call.transform_index)?;

    let vertex_shader = match draw_call.vertex_shader_type {
        VertexShaderType::Basic => VertexShader::Basic,
        VertexShaderType::Entity => VertexShader::Entity,
        VertexShaderType::RaisingDoor {
            pre_scale_translation_buffer_id,
        } => VertexShader::RaisingDoor {
            pre_scale_translation: pools
                .uniform_buffers
                .get(pre_scale_translation_buffer_id.0)?
                .get::<Vec3>(0)?,
        },
    };

    let positions = pools
        .vertex_position_buffers
        .get(draw_call.position_buffer_id.0)?;
    let tex_coords = pools
        .vertex_attribute_buffers
        .get(draw_call.tex_coord_buffer_id.0)?;
    let mesh = MeshInput {
        positions: positions.values(),
        position_stride: positions.components_per_vertex(),
        tex_coords: tex_coords.values(),
        tex_coord_stride: tex_coords.components_per_vertex(),
        indices: pools
            .index_buffers
            .get(draw_call.index_buffer_id.0)?
            .indices(),
    };

    let mut lights = [Light::default(); MAX_LIGHTS];
    let lighting = match &draw_call.lighting {
        RenderLightingType::PerMesh(percent) => LightingMode::PerMesh(*percent),
        RenderLightingType::PerPixel(ids) => {
            for (slot, id) in lights.iter_mut().zip(ids) {
                *slot = *pools.lights.get(id.0)?;
            }
            LightingMode::PerPixel {
                ambient: env.ambient_percent,
                lights: &lights[..ids.len()],
            }
        }
    };

    let draw = DrawState {
        shader: pixel_shader(pools, draw_call, env)?,
        resources: ShaderResources {
            texture: shader_texture(pools, draw_call, 0)?,
            light_table: env.light_table,
            palette: env.palette,
        },
        lighting,
        enable_depth_read: draw_call.enable_depth_read,
        enable_depth_write: draw_call.enable_depth_write,
    };

    let camera = frame.camera;
    let visible = process_mesh(
        &mesh,
        &transform,
        &camera.view_matrix,
        &camera.projection_matrix,
        vertex_shader,
        ctx,
    )?;
    if visible > 0 {
        rasterize_triangles(&ctx.mesh_triangles, &draw, frame, target, &mut ctx.stats);
    }
    Ok(())
}

impl RenderBackend for SoftwareRenderer {
    // --- Lifecycle ---

    fn init(&mut self, settings: &RenderInitSettings) -> Result<(), RenderError> {
        check_frame_size(settings.width, settings.height)?;
        let (width, height) = (settings.width, settings.height);

        self.pools = ResourcePools::new(&settings.pool_limits);
        self.frame_buffers = FrameBuffers::new(width, height);
        self.dither = DitherBuffer::new(width, height, settings.dithering_mode);
        self.frame_context = FrameContext::with_capacity(MESH_TRIANGLE_CAPACITY);
        self.last_frame_stats = FrameStats::default();
        self.initialized = true;

        log::info!(
            "SoftwareRenderer initialized at {width}x{height} ({:?} dithering).",
            settings.dithering_mode
        );
        Ok(())
    }

    fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }
        *self = Self::new();
        log::info!("SoftwareRenderer shut down.");
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn resize(&mut self, width: usize, height: usize) -> Result<(), RenderError> {
        if !self.initialized {
            return Err(RenderError::NotInitialized);
        }
        check_frame_size(width, height)?;

        self.frame_buffers.resize(width, height);
        self.dither = DitherBuffer::new(width, height, self.dither.mode());
        log::info!("SoftwareRenderer resized to {width}x{height}.");
        Ok(())
    }

    // --- Geometry Buffers ---

    fn try_create_vertex_position_buffer(
        &mut self,
        vertex_count: usize,
        components_per_vertex: usize,
    ) -> Result<VertexPositionBufferId, ResourceError> {
        VertexBuffer::new(vertex_count, components_per_vertex)
            .and_then(|buffer| self.pools.vertex_position_buffers.try_alloc(buffer))
            .map(VertexPositionBufferId)
            .inspect_err(|err| log::error!("Couldn't create vertex position buffer: {err}"))
    }

    fn populate_vertex_position_buffer(
        &mut self,
        id: VertexPositionBufferId,
        positions: &[f64],
    ) -> Result<(), ResourceError> {
        self.pools
            .vertex_position_buffers
            .get_mut(id.0)
            .and_then(|buffer| buffer.populate(positions))
            .inspect_err(|err| log::error!("Couldn't populate vertex position buffer {id:?}: {err}"))
    }

    fn free_vertex_position_buffer(&mut self, id: VertexPositionBufferId) -> Result<(), ResourceError> {
        self.pools.vertex_position_buffers.free(id.0).map(drop)
    }

    fn try_create_vertex_attribute_buffer(
        &mut self,
        vertex_count: usize,
        components_per_vertex: usize,
    ) -> Result<VertexAttributeBufferId, ResourceError> {
        VertexBuffer::new(vertex_count, components_per_vertex)
            .and_then(|buffer| self.pools.vertex_attribute_buffers.try_alloc(buffer))
            .map(VertexAttributeBufferId)
            .inspect_err(|err| log::error!("Couldn't create vertex attribute buffer: {err}"))
    }

    fn populate_vertex_attribute_buffer(
        &mut self,
        id: VertexAttributeBufferId,
        attributes: &[f64],
    ) -> Result<(), ResourceError> {
        self.pools
            .vertex_attribute_buffers
            .get_mut(id.0)
            .and_then(|buffer| buffer.populate(attributes))
            .inspect_err(|err| log::error!("Couldn't populate vertex attribute buffer {id:?}: {err}"))
    }

    fn free_vertex_attribute_buffer(&mut self, id: VertexAttributeBufferId) -> Result<(), ResourceError> {
        self.pools.vertex_attribute_buffers.free(id.0).map(drop)
    }

    fn try_create_index_buffer(&mut self, index_count: usize) -> Result<IndexBufferId, ResourceError> {
        IndexBuffer::new(index_count)
            .and_then(|buffer| self.pools.index_buffers.try_alloc(buffer))
            .map(IndexBufferId)
            .inspect_err(|err| log::error!("Couldn't create index buffer: {err}"))
    }

    fn populate_index_buffer(&mut self, id: IndexBufferId, indices: &[u32]) -> Result<(), ResourceError> {
        self.pools
            .index_buffers
            .get_mut(id.0)
            .and_then(|buffer| buffer.populate(indices))
            .inspect_err(|err| log::error!("Couldn't populate index buffer {id:?}: {err}"))
    }

    fn free_index_buffer(&mut self, id: IndexBufferId) -> Result<(), ResourceError> {
        self.pools.index_buffers.free(id.0).map(drop)
    }

    // --- Uniform Buffers ---

    fn try_create_uniform_buffer(
        &mut self,
        element_count: usize,
        size_of_element: usize,
        alignment_of_element: usize,
    ) -> Result<UniformBufferId, ResourceError> {
        UniformBuffer::new(element_count, size_of_element, alignment_of_element)
            .and_then(|buffer| self.pools.uniform_buffers.try_alloc(buffer))
            .map(UniformBufferId)
            .inspect_err(|err| log::error!("Couldn't create uniform buffer: {err}"))
    }

    fn populate_uniform_buffer(&mut self, id: UniformBufferId, bytes: &[u8]) -> Result<(), ResourceError> {
        self.pools
            .uniform_buffers
            .get_mut(id.0)
            .and_then(|buffer| buffer.populate(bytes))
            .inspect_err(|err| log::error!("Couldn't populate uniform buffer {id:?}: {err}"))
    }

    fn populate_uniform_at_index(
        &mut self,
        id: UniformBufferId,
        index: usize,
        bytes: &[u8],
    ) -> Result<(), ResourceError> {
        self.pools
            .uniform_buffers
            .get_mut(id.0)
            .and_then(|buffer| buffer.populate_at_index(index, bytes))
            .inspect_err(|err| {
                log::error!("Couldn't populate uniform buffer {id:?} index {index}: {err}")
            })
    }

    fn free_uniform_buffer(&mut self, id: UniformBufferId) -> Result<(), ResourceError> {
        self.pools.uniform_buffers.free(id.0).map(drop)
    }

    // --- Lights ---

    fn try_create_light(&mut self) -> Result<LightId, ResourceError> {
        self.pools
            .lights
            .try_alloc(Light::default())
            .map(LightId)
            .inspect_err(|err| log::error!("Couldn't create light: {err}"))
    }

    fn set_light_position(&mut self, id: LightId, point: Vec3) -> Result<(), ResourceError> {
        self.pools.lights.get_mut(id.0)?.point = point;
        Ok(())
    }

    fn set_light_radius(
        &mut self,
        id: LightId,
        start_radius: f64,
        end_radius: f64,
    ) -> Result<(), ResourceError> {
        if !Light::radii_are_valid(start_radius, end_radius) {
            log::error!("Invalid radii for light {id:?}: start {start_radius}, end {end_radius}.");
            return Err(ResourceError::InvalidDimensions(format!(
                "light radii {start_radius}..{end_radius}"
            )));
        }
        let light = self.pools.lights.get_mut(id.0)?;
        light.start_radius = start_radius;
        light.end_radius = end_radius;
        Ok(())
    }

    fn free_light(&mut self, id: LightId) -> Result<(), ResourceError> {
        self.pools.lights.free(id.0).map(drop)
    }

    // --- Object Textures ---

    fn try_create_object_texture(
        &mut self,
        width: usize,
        height: usize,
        format: TexelFormat,
    ) -> Result<ObjectTextureId, ResourceError> {
        ObjectTexture::new(width, height, format)
            .and_then(|texture| self.pools.object_textures.try_alloc(texture))
            .map(ObjectTextureId)
            .inspect_err(|err| log::error!("Couldn't create {width}x{height} object texture: {err}"))
    }

    fn try_create_object_texture_from(
        &mut self,
        builder: &TextureBuilder,
    ) -> Result<ObjectTextureId, ResourceError> {
        ObjectTexture::from_builder(builder)
            .and_then(|texture| self.pools.object_textures.try_alloc(texture))
            .map(ObjectTextureId)
            .inspect_err(|err| {
                log::warn!(
                    "Couldn't create {}x{} object texture: {err}",
                    builder.width(),
                    builder.height()
                )
            })
    }

    fn try_get_object_texture_dims(&self, id: ObjectTextureId) -> Result<(usize, usize), ResourceError> {
        let texture = self.pools.texture(id)?;
        Ok((texture.width(), texture.height()))
    }

    fn lock_object_texture(&mut self, id: ObjectTextureId) -> Result<LockedTexture<'_>, ResourceError> {
        let texture = self.pools.object_textures.get_mut(id.0)?;
        let format = texture.format();
        Ok(LockedTexture {
            texels: texture.texel_bytes_mut(),
            format,
        })
    }

    fn unlock_object_texture(&mut self, _id: ObjectTextureId) {
        // Texels live in host memory; writes are already visible.
    }

    fn free_object_texture(&mut self, id: ObjectTextureId) -> Result<(), ResourceError> {
        self.pools.object_textures.free(id.0).map(drop)
    }

    // --- Frame ---

    fn get_profiler_data(&self) -> ProfilerData {
        let stats = &self.last_frame_stats;
        ProfilerData {
            width: self.frame_buffers.width(),
            height: self.frame_buffers.height(),
            thread_count: 1,
            draw_call_count: stats.draw_call_count,
            scene_triangle_count: stats.scene_triangle_count,
            vis_triangle_count: stats.vis_triangle_count,
            texture_count: self.pools.object_textures.len(),
            texture_byte_count: self
                .pools
                .object_textures
                .iter()
                .map(ObjectTexture::byte_count)
                .sum(),
            total_light_count: self.pools.lights.len(),
            total_depth_tests: stats.depth_tests,
            total_color_writes: stats.color_writes,
        }
    }

    fn submit_frame(
        &mut self,
        camera: &RenderCamera,
        draw_calls: &[RenderDrawCall],
        settings: &RenderFrameSettings,
        output: &mut [u32],
    ) -> Result<(), RenderError> {
        if !self.initialized {
            return Err(RenderError::NotInitialized);
        }

        let (width, height) = (self.frame_buffers.width(), self.frame_buffers.height());
        if self.dither.mode() != settings.dithering_mode {
            self.dither = DitherBuffer::new(width, height, settings.dithering_mode);
        }

        let pools = &self.pools;
        let env = FrameEnvironment::resolve(pools, settings)?;
        let output_len = output.len();
        let mut target = self
            .frame_buffers
            .view(output)
            .ok_or(ResourceError::SizeMismatch {
                expected: width * height,
                actual: output_len,
            })?;
        target.clear();

        let ctx = &mut self.frame_context;
        ctx.begin_frame(draw_calls.len());
        let frame = RasterFrame {
            camera,
            dither: &self.dither,
        };

        for (index, draw_call) in draw_calls.iter().enumerate() {
            if let Err(err) = draw_mesh(pools, draw_call, &env, &frame, ctx, &mut target) {
                log::error!("Skipping draw call {index}: {err}");
            }
        }

        self.last_frame_stats = ctx.stats;
        log::trace!(
            "Submitted frame: {} draw calls, {} visible triangles, {} color writes.",
            ctx.stats.draw_call_count,
            ctx.stats.vis_triangle_count,
            ctx.stats.color_writes
        );
        Ok(())
    }

    fn present(&mut self) {}
}
