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

//! Scene fixtures shared by the renderer scenario tests.

#![allow(dead_code)]

use ochre_core::math::Vec3;
use ochre_core::renderer::palette::PALETTE_LENGTH;
use ochre_core::renderer::{
    DitheringMode, IndexBufferId, ObjectTextureId, RenderBackend, RenderCamera, RenderDrawCall,
    RenderFrameSettings, RenderInitSettings, RenderTransform, TextureBuilder, UniformBufferId,
    VertexAttributeBufferId, VertexPositionBufferId,
};
use ochre_infra::SoftwareRenderer;

pub const WIDTH: usize = 16;
pub const HEIGHT: usize = 12;
pub const ASPECT: f64 = WIDTH as f64 / HEIGHT as f64;
pub const LIGHT_LEVELS: usize = 13;
/// First texel of the sky texture, the horizon mirror fallback.
pub const SKY_TEXEL: u8 = 200;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Camera at the origin looking down -Z with a 90 degree vertical FOV.
pub fn camera() -> RenderCamera {
    RenderCamera::new(Vec3::ZERO, -Vec3::Z, 90.0, ASPECT, 1.0)
}

/// A counter-clockwise quad in the XY plane at z = 0.
pub struct QuadMesh {
    pub positions: VertexPositionBufferId,
    pub tex_coords: VertexAttributeBufferId,
    pub indices: IndexBufferId,
}

pub struct Scene {
    pub renderer: SoftwareRenderer,
    pub quad: QuadMesh,
    pub settings: RenderFrameSettings,
    pub output: Vec<u32>,
}

impl Scene {
    /// A renderer with a quad mesh and frame textures.
    ///
    /// The palette maps index `i` to `0xFF000000 | i` and light level `n`
    /// adds `n` to the index, so outputs can be read back exactly.
    pub fn new(dithering_mode: DitheringMode) -> Self {
        init_logging();
        let mut renderer = SoftwareRenderer::new();
        renderer
            .init(&RenderInitSettings {
                width: WIDTH,
                height: HEIGHT,
                dithering_mode,
                ..RenderInitSettings::default()
            })
            .unwrap();

        let palette = renderer
            .try_create_object_texture_from(&TextureBuilder::TrueColor {
                width: PALETTE_LENGTH,
                height: 1,
                texels: (0..PALETTE_LENGTH as u32).map(|i| 0xFF00_0000 | i).collect(),
            })
            .unwrap();
        let light_table = renderer
            .try_create_object_texture_from(&TextureBuilder::Paletted {
                width: PALETTE_LENGTH,
                height: LIGHT_LEVELS,
                texels: (0..LIGHT_LEVELS)
                    .flat_map(|level| (0..PALETTE_LENGTH).map(move |c| (c + level) as u8))
                    .collect(),
            })
            .unwrap();
        let sky = solid_texture(&mut renderer, SKY_TEXEL);

        let quad = create_quad(&mut renderer, 1.0, 1.0);
        Self {
            renderer,
            quad,
            settings: RenderFrameSettings {
                palette_texture_id: palette,
                light_table_texture_id: light_table,
                sky_bg_texture_id: sky,
                ambient_percent: 1.0,
                dithering_mode,
            },
            output: vec![0; WIDTH * HEIGHT],
        }
    }

    pub fn transform_buffer(&mut self, transform: RenderTransform) -> UniformBufferId {
        let id = self
            .renderer
            .try_create_uniform_buffer_for::<RenderTransform>(1)
            .unwrap();
        self.renderer
            .populate_uniform_value_at_index(id, 0, &transform)
            .unwrap();
        id
    }

    /// A quad that covers 99% of the viewport at `depth` units in front of the camera.
    pub fn screen_filling_transform(depth: f64) -> RenderTransform {
        let half_height = depth * 0.99;
        RenderTransform::from_parts(
            Vec3::new(0.0, 0.0, -depth),
            0.0,
            Vec3::new(half_height * ASPECT, half_height, 1.0),
        )
    }

    pub fn quad_draw_call(&mut self, transform: RenderTransform, texture: ObjectTextureId) -> RenderDrawCall {
        let transform_buffer = self.transform_buffer(transform);
        RenderDrawCall::new(
            self.quad.positions,
            self.quad.tex_coords,
            self.quad.indices,
            transform_buffer,
            texture,
        )
    }

    pub fn submit(&mut self, draw_calls: &[RenderDrawCall]) {
        let camera = camera();
        self.renderer
            .submit_frame(&camera, draw_calls, &self.settings, &mut self.output)
            .unwrap();
    }

    pub fn center_pixel(&self) -> u32 {
        self.output[WIDTH / 2 + (HEIGHT / 2) * WIDTH]
    }

    pub fn center_depth(&self) -> f64 {
        self.renderer.depth()[WIDTH / 2 + (HEIGHT / 2) * WIDTH]
    }
}

/// A quad spanning `[-half_width, half_width] x [-half_height, half_height]`.
pub fn create_quad(renderer: &mut SoftwareRenderer, half_width: f64, half_height: f64) -> QuadMesh {
    let positions = renderer.try_create_vertex_position_buffer(4, 3).unwrap();
    renderer
        .populate_vertex_position_buffer(
            positions,
            &[
                -half_width, -half_height, 0.0, //
                half_width, -half_height, 0.0, //
                half_width, half_height, 0.0, //
                -half_width, half_height, 0.0,
            ],
        )
        .unwrap();

    let tex_coords = renderer.try_create_vertex_attribute_buffer(4, 2).unwrap();
    renderer
        .populate_vertex_attribute_buffer(tex_coords, &[0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0])
        .unwrap();

    let indices = renderer.try_create_index_buffer(6).unwrap();
    renderer
        .populate_index_buffer(indices, &[0, 1, 2, 2, 3, 0])
        .unwrap();

    QuadMesh {
        positions,
        tex_coords,
        indices,
    }
}

/// A 1x1 paletted texture.
pub fn solid_texture(renderer: &mut SoftwareRenderer, texel: u8) -> ObjectTextureId {
    renderer
        .try_create_object_texture_from(&TextureBuilder::Paletted {
            width: 1,
            height: 1,
            texels: vec![texel],
        })
        .unwrap()
}

/// Normalized device depth of a camera-facing plane `depth` units ahead.
pub fn ndc_depth(depth: f64) -> f64 {
    let clip = camera().world_to_clip(Vec3::new(0.0, 0.0, -depth));
    clip.z / clip.w
}

pub fn palette_color(index: u8) -> u32 {
    0xFF00_0000 | index as u32
}
