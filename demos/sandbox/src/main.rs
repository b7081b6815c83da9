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

// Ochre Sandbox
// Renders one frame of a small room and writes it to disk.
//
// Usage: sandbox [init-settings.json] [output.png]

use std::f64::consts::FRAC_PI_2;
use std::path::PathBuf;

use anyhow::{Context, Result};
use ochre_core::math::{Mat4, Vec3};
use ochre_core::renderer::palette::PALETTE_LENGTH;
use ochre_core::renderer::{
    LightIdList, ObjectTextureId, PixelShaderType, RenderBackend, RenderCamera, RenderDrawCall,
    RenderFrameSettings, RenderInitSettings, RenderLightingType, RenderTransform, TextureBuilder,
};
use ochre_infra::SoftwareRenderer;

const SHADES_PER_RAMP: usize = 16;
const LIGHT_LEVELS: usize = 13;

/// Base colors of the 16 palette ramps.
const RAMPS: [[u8; 3]; 16] = [
    [255, 255, 255],
    [200, 60, 40],
    [60, 160, 70],
    [60, 90, 200],
    [220, 200, 80],
    [160, 110, 60],
    [120, 120, 130],
    [90, 200, 220],
    [200, 90, 200],
    [240, 150, 50],
    [140, 180, 90],
    [80, 60, 40],
    [170, 170, 200],
    [230, 120, 140],
    [40, 80, 60],
    [110, 150, 230],
];

fn palette_index(ramp: usize, shade: usize) -> u8 {
    (ramp * SHADES_PER_RAMP + shade) as u8
}

/// 256 colors, each ramp going from black (shade 0) to its base color (shade 15).
fn palette_texels() -> Vec<u32> {
    (0..PALETTE_LENGTH)
        .map(|index| {
            let [r, g, b] = RAMPS[index / SHADES_PER_RAMP];
            let shade = (index % SHADES_PER_RAMP) as u32;
            let scale = |c: u8| c as u32 * shade / (SHADES_PER_RAMP as u32 - 1);
            0xFF00_0000 | (scale(r) << 16) | (scale(g) << 8) | scale(b)
        })
        .collect()
}

/// Row 0 keeps every index, the last row maps everything to the darkest shade of its ramp.
fn light_table_texels() -> Vec<u8> {
    let darkest = LIGHT_LEVELS - 1;
    (0..LIGHT_LEVELS)
        .flat_map(|level| {
            (0..PALETTE_LENGTH).map(move |index| {
                let shade = index % SHADES_PER_RAMP;
                let dimmed = shade * (darkest - level) / darkest;
                palette_index(index / SHADES_PER_RAMP, dimmed)
            })
        })
        .collect()
}

fn checker_texture(renderer: &mut SoftwareRenderer, size: usize, a: u8, b: u8) -> Result<ObjectTextureId> {
    let texels = (0..size * size)
        .map(|i| if ((i % size) / 2 + (i / size) / 2) % 2 == 0 { a } else { b })
        .collect();
    Ok(renderer.try_create_object_texture_from(&TextureBuilder::Paletted {
        width: size,
        height: size,
        texels,
    })?)
}

fn solid_texture(renderer: &mut SoftwareRenderer, texel: u8) -> Result<ObjectTextureId> {
    Ok(renderer.try_create_object_texture_from(&TextureBuilder::Paletted {
        width: 1,
        height: 1,
        texels: vec![texel],
    })?)
}

/// A unit quad in the XY plane, returned as a draw call template.
struct Quad {
    draw_call: RenderDrawCall,
}

impl Quad {
    fn new(renderer: &mut SoftwareRenderer, texture: ObjectTextureId) -> Result<Self> {
        let positions = renderer.try_create_vertex_position_buffer(4, 3)?;
        renderer.populate_vertex_position_buffer(
            positions,
            &[
                -1.0, -1.0, 0.0, //
                1.0, -1.0, 0.0, //
                1.0, 1.0, 0.0, //
                -1.0, 1.0, 0.0,
            ],
        )?;
        let tex_coords = renderer.try_create_vertex_attribute_buffer(4, 2)?;
        renderer.populate_vertex_attribute_buffer(tex_coords, &[0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0])?;
        let indices = renderer.try_create_index_buffer(6)?;
        renderer.populate_index_buffer(indices, &[0, 1, 2, 2, 3, 0])?;

        let transforms = renderer.try_create_uniform_buffer_for::<RenderTransform>(1)?;
        Ok(Self {
            draw_call: RenderDrawCall::new(positions, tex_coords, indices, transforms, texture),
        })
    }

    fn placed(
        mut self,
        renderer: &mut SoftwareRenderer,
        transform: RenderTransform,
    ) -> Result<RenderDrawCall> {
        renderer.populate_uniform_value_at_index(self.draw_call.transform_buffer_id, 0, &transform)?;
        Ok(self.draw_call)
    }
}

fn load_init_settings(path: Option<&String>) -> Result<RenderInitSettings> {
    let Some(path) = path else {
        return Ok(RenderInitSettings::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let init_settings = load_init_settings(args.get(1))?;
    let output_path = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("ochre_frame.png"));

    let mut renderer = SoftwareRenderer::new();
    renderer.init(&init_settings)?;
    let (width, height) = (init_settings.width, init_settings.height);

    let palette = renderer.try_create_object_texture_from(&TextureBuilder::TrueColor {
        width: PALETTE_LENGTH,
        height: 1,
        texels: palette_texels(),
    })?;
    let light_table = renderer.try_create_object_texture_from(&TextureBuilder::Paletted {
        width: PALETTE_LENGTH,
        height: LIGHT_LEVELS,
        texels: light_table_texels(),
    })?;
    let sky = solid_texture(&mut renderer, palette_index(15, 12))?;

    let floor_texture = checker_texture(&mut renderer, 8, palette_index(6, 15), palette_index(6, 10))?;
    let wall_texture = checker_texture(&mut renderer, 8, palette_index(5, 15), palette_index(11, 15))?;
    let crate_texture = solid_texture(&mut renderer, palette_index(9, 15))?;

    let mut lights = LightIdList::new();
    for (point, radius) in [(Vec3::new(-2.0, 0.5, -4.0), 4.0), (Vec3::new(2.5, 1.0, -7.0), 5.0)] {
        let light = renderer.try_create_light()?;
        renderer.set_light_position(light, point)?;
        renderer.set_light_radius(light, radius * 0.25, radius)?;
        lights.push(light);
    }
    let lit = RenderLightingType::PerPixel(lights);

    let mut floor = Quad::new(&mut renderer, floor_texture)?.placed(
        &mut renderer,
        RenderTransform {
            rotation: Mat4::from_rotation_x(-FRAC_PI_2),
            ..RenderTransform::from_parts(Vec3::new(0.0, -1.0, -6.0), 0.0, Vec3::new(5.0, 5.0, 1.0))
        },
    )?;
    floor.lighting = lit;

    let mut back_wall = Quad::new(&mut renderer, wall_texture)?.placed(
        &mut renderer,
        RenderTransform::from_parts(Vec3::new(0.0, 1.0, -11.0), 0.0, Vec3::new(5.0, 2.0, 1.0)),
    )?;
    back_wall.lighting = lit;

    let mut side_wall = Quad::new(&mut renderer, wall_texture)?.placed(
        &mut renderer,
        RenderTransform::from_parts(Vec3::new(-5.0, 1.0, -6.0), FRAC_PI_2, Vec3::new(5.0, 2.0, 1.0)),
    )?;
    side_wall.lighting = lit;

    let mut crate_front = Quad::new(&mut renderer, crate_texture)?.placed(
        &mut renderer,
        RenderTransform::from_parts(Vec3::new(1.5, -0.5, -5.0), -0.4, Vec3::new(0.5, 0.5, 1.0)),
    )?;
    crate_front.lighting = RenderLightingType::PerMesh(0.8);
    crate_front.pixel_shader_type = PixelShaderType::AlphaTested;

    let camera = RenderCamera::new(
        Vec3::new(0.0, 0.2, 0.0),
        Vec3::new(0.0, -0.1, -1.0),
        70.0,
        width as f64 / height as f64,
        1.0,
    );
    let frame_settings = RenderFrameSettings {
        palette_texture_id: palette,
        light_table_texture_id: light_table,
        sky_bg_texture_id: sky,
        ambient_percent: 0.25,
        dithering_mode: init_settings.dithering_mode,
    };

    let mut output = vec![0u32; width * height];
    renderer.submit_frame(
        &camera,
        &[back_wall, side_wall, floor, crate_front],
        &frame_settings,
        &mut output,
    )?;
    renderer.present();

    let profile = renderer.get_profiler_data();
    log::info!(
        "Rendered {} draw calls: {} of {} triangles visible, {} depth tests, {} color writes.",
        profile.draw_call_count,
        profile.vis_triangle_count,
        profile.scene_triangle_count,
        profile.total_depth_tests,
        profile.total_color_writes,
    );

    let rgba: Vec<u8> = output
        .iter()
        .flat_map(|&argb| {
            let [a, r, g, b] = argb.to_be_bytes();
            [r, g, b, a]
        })
        .collect();
    let image = image::RgbaImage::from_raw(width as u32, height as u32, rgba)
        .context("frame size does not match the output buffer")?;
    image
        .save(&output_path)
        .with_context(|| format!("writing {}", output_path.display()))?;
    log::info!("Saved frame to {}.", output_path.display());

    renderer.shutdown();
    Ok(())
}
