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

mod common;

use approx::assert_abs_diff_eq;
use common::*;
use ochre_core::math::{Mat4, Vec3};
use ochre_core::renderer::palette::PALETTE_INDEX_PUDDLE_EVEN_ROW;
use ochre_core::renderer::{
    DitheringMode, LightIdList, PixelShaderType, RenderBackend, RenderCamera, RenderError,
    RenderLightingType, RenderTransform, ResourceError, TextureSamplingType, VaryingTexture,
    VertexShaderType,
};

#[test]
fn test_screen_filling_quad_writes_every_pixel_once() {
    let mut scene = Scene::new(DitheringMode::None);
    let texture = solid_texture(&mut scene.renderer, 7);
    let draw_call = scene.quad_draw_call(Scene::screen_filling_transform(2.0), texture);

    scene.submit(&[draw_call]);

    assert!(scene.output.iter().all(|&color| color == palette_color(7)));
    let profile = scene.renderer.get_profiler_data();
    assert_eq!(profile.total_color_writes, WIDTH * HEIGHT);
    assert_eq!(profile.total_depth_tests, WIDTH * HEIGHT);
    assert_eq!(profile.draw_call_count, 1);
    assert_eq!(profile.scene_triangle_count, 2);
    assert_eq!(profile.vis_triangle_count, 2);
    assert_eq!((profile.width, profile.height), (WIDTH, HEIGHT));
    assert_eq!(profile.thread_count, 1);
    for &depth in scene.renderer.depth() {
        assert_abs_diff_eq!(depth, ndc_depth(2.0), epsilon = 1e-9);
    }
}

#[test]
fn test_wide_vertex_buffers_render_like_packed_ones() {
    let mut scene = Scene::new(DitheringMode::None);
    let texture = solid_texture(&mut scene.renderer, 7);

    let positions = scene.renderer.try_create_vertex_position_buffer(4, 4).unwrap();
    scene
        .renderer
        .populate_vertex_position_buffer(
            positions,
            &[
                -1.0, -1.0, 0.0, 1.0, //
                1.0, -1.0, 0.0, 1.0, //
                1.0, 1.0, 0.0, 1.0, //
                -1.0, 1.0, 0.0, 1.0,
            ],
        )
        .unwrap();
    let tex_coords = scene.renderer.try_create_vertex_attribute_buffer(4, 3).unwrap();
    scene
        .renderer
        .populate_vertex_attribute_buffer(
            tex_coords,
            &[0.0, 1.0, 5.0, 1.0, 1.0, 5.0, 1.0, 0.0, 5.0, 0.0, 0.0, 5.0],
        )
        .unwrap();

    let mut draw_call = scene.quad_draw_call(Scene::screen_filling_transform(2.0), texture);
    draw_call.position_buffer_id = positions;
    draw_call.tex_coord_buffer_id = tex_coords;
    scene.submit(&[draw_call]);

    assert!(scene.output.iter().all(|&color| color == palette_color(7)));
    assert_eq!(scene.renderer.get_profiler_data().total_color_writes, WIDTH * HEIGHT);
}

#[test]
fn test_two_component_positions_skip_the_draw_call() {
    let mut scene = Scene::new(DitheringMode::None);
    let texture = solid_texture(&mut scene.renderer, 7);
    let positions = scene.renderer.try_create_vertex_position_buffer(4, 2).unwrap();
    scene
        .renderer
        .populate_vertex_position_buffer(positions, &[-1.0, -1.0, 1.0, -1.0, 1.0, 1.0, -1.0, 1.0])
        .unwrap();

    let mut draw_call = scene.quad_draw_call(Scene::screen_filling_transform(2.0), texture);
    draw_call.position_buffer_id = positions;
    scene.submit(&[draw_call]);

    let profile = scene.renderer.get_profiler_data();
    assert_eq!(profile.total_color_writes, 0);
    assert_eq!(profile.scene_triangle_count, 0);
    assert!(scene.output.iter().all(|&color| color == 0));
}

#[test]
fn test_oversized_quad_is_clipped_but_still_fills_the_screen() {
    let mut scene = Scene::new(DitheringMode::None);
    let texture = solid_texture(&mut scene.renderer, 7);
    let transform = RenderTransform::from_parts(
        Vec3::new(0.0, 0.0, -2.0),
        0.0,
        Vec3::new(10.0, 10.0, 1.0),
    );
    let draw_call = scene.quad_draw_call(transform, texture);

    scene.submit(&[draw_call]);

    assert!(scene.output.iter().all(|&color| color == palette_color(7)));
    let profile = scene.renderer.get_profiler_data();
    assert_eq!(profile.scene_triangle_count, 2);
    assert!(profile.vis_triangle_count > 2);
}

#[test]
fn test_back_facing_quad_draws_nothing() {
    let mut scene = Scene::new(DitheringMode::None);
    let texture = solid_texture(&mut scene.renderer, 7);
    // Turned around, the quad shows its back to the camera.
    let transform = RenderTransform::from_parts(
        Vec3::new(0.0, 0.0, -2.0),
        std::f64::consts::PI,
        Vec3::new(2.0, 1.5, 1.0),
    );
    let draw_call = scene.quad_draw_call(transform, texture);

    scene.submit(&[draw_call]);

    assert!(scene.output.iter().all(|&color| color == 0));
    let profile = scene.renderer.get_profiler_data();
    assert_eq!(profile.vis_triangle_count, 2);
    assert_eq!(profile.total_color_writes, 0);
}

#[test]
fn test_nearer_quad_wins_in_either_order() {
    let mut scene = Scene::new(DitheringMode::None);
    let near_texture = solid_texture(&mut scene.renderer, 10);
    let far_texture = solid_texture(&mut scene.renderer, 20);
    let near = scene.quad_draw_call(Scene::screen_filling_transform(2.0), near_texture);
    let far = scene.quad_draw_call(Scene::screen_filling_transform(4.0), far_texture);

    scene.submit(&[near.clone(), far.clone()]);
    assert_eq!(scene.center_pixel(), palette_color(10));
    assert_abs_diff_eq!(scene.center_depth(), ndc_depth(2.0), epsilon = 1e-9);

    scene.submit(&[far, near]);
    assert_eq!(scene.center_pixel(), palette_color(10));
    assert_abs_diff_eq!(scene.center_depth(), ndc_depth(2.0), epsilon = 1e-9);
}

#[test]
fn test_depth_read_disabled_lets_later_draws_overwrite() {
    let mut scene = Scene::new(DitheringMode::None);
    let near_texture = solid_texture(&mut scene.renderer, 10);
    let far_texture = solid_texture(&mut scene.renderer, 20);
    let near = scene.quad_draw_call(Scene::screen_filling_transform(2.0), near_texture);
    let mut far = scene.quad_draw_call(Scene::screen_filling_transform(4.0), far_texture);
    far.enable_depth_read = false;

    scene.submit(&[near, far]);

    assert_eq!(scene.center_pixel(), palette_color(20));
    assert_eq!(scene.renderer.get_profiler_data().total_depth_tests, WIDTH * HEIGHT);
}

#[test]
fn test_transparent_texels_never_write() {
    let mut scene = Scene::new(DitheringMode::None);
    let transparent = solid_texture(&mut scene.renderer, 0);
    let shaders = [
        PixelShaderType::AlphaTested,
        PixelShaderType::AlphaTestedWithVariableTexCoordUMin { u_min: 0.25 },
        PixelShaderType::AlphaTestedWithVariableTexCoordVMin { v_min: 0.25 },
        PixelShaderType::AlphaTestedWithLightLevelColor,
        PixelShaderType::AlphaTestedWithLightLevelOpacity,
        PixelShaderType::AlphaTestedWithPreviousBrightnessLimit,
        PixelShaderType::AlphaTestedWithHorizonMirror,
    ];

    for shader in shaders {
        let mut draw_call = scene.quad_draw_call(Scene::screen_filling_transform(2.0), transparent);
        draw_call.pixel_shader_type = shader;
        scene.submit(&[draw_call]);

        assert!(scene.output.iter().all(|&color| color == 0), "{shader:?}");
        assert!(scene.renderer.depth().iter().all(|d| d.is_infinite()), "{shader:?}");
        assert_eq!(scene.renderer.get_profiler_data().total_color_writes, 0, "{shader:?}");
    }
}

#[test]
fn test_no_dithering_gives_uniform_light_levels() {
    let mut scene = Scene::new(DitheringMode::None);
    scene.settings.ambient_percent = 0.5;
    let texture = solid_texture(&mut scene.renderer, 50);
    let mut draw_call = scene.quad_draw_call(Scene::screen_filling_transform(2.0), texture);
    draw_call.lighting = RenderLightingType::PerPixel(LightIdList::new());

    scene.submit(&[draw_call.clone()]);
    // 0.5 * 13 = 6.5, light level 12 - 6.
    assert!(scene.output.iter().all(|&color| color == palette_color(50 + 6)));

    scene.settings.dithering_mode = DitheringMode::Classic;
    scene.submit(&[draw_call]);
    assert_eq!(scene.output[0], palette_color(50 + 7));
    assert_eq!(scene.output[1], palette_color(50 + 6));
}

#[test]
fn test_per_pixel_light_brightens_nearby_pixels() {
    let mut scene = Scene::new(DitheringMode::None);
    scene.settings.ambient_percent = 0.0;
    let light = scene.renderer.try_create_light().unwrap();
    scene
        .renderer
        .set_light_position(light, Vec3::new(0.0, 0.0, -2.0))
        .unwrap();
    scene.renderer.set_light_radius(light, 0.5, 1.0).unwrap();

    let texture = solid_texture(&mut scene.renderer, 50);
    let mut lights = LightIdList::new();
    assert!(lights.push(light));
    let mut draw_call = scene.quad_draw_call(Scene::screen_filling_transform(2.0), texture);
    draw_call.lighting = RenderLightingType::PerPixel(lights);

    scene.submit(&[draw_call]);

    let darkest = palette_color(50 + (LIGHT_LEVELS - 1) as u8);
    assert_eq!(scene.output[0], darkest);
    assert_eq!(scene.center_pixel(), palette_color(50));
    assert_eq!(scene.renderer.get_profiler_data().total_light_count, 1);
}

#[test]
fn test_per_mesh_light_percent_selects_row() {
    let mut scene = Scene::new(DitheringMode::Classic);
    let texture = solid_texture(&mut scene.renderer, 50);
    let mut draw_call = scene.quad_draw_call(Scene::screen_filling_transform(2.0), texture);
    draw_call.lighting = RenderLightingType::PerMesh(0.0);

    scene.submit(&[draw_call]);

    // Per-mesh lighting is never dithered.
    let darkest = palette_color(50 + (LIGHT_LEVELS - 1) as u8);
    assert!(scene.output.iter().all(|&color| color == darkest));
}

#[test]
fn test_fully_lowered_door_draws_nothing() {
    let mut scene = Scene::new(DitheringMode::None);
    let texture = solid_texture(&mut scene.renderer, 7);
    let pivot = scene
        .renderer
        .try_create_uniform_buffer_for::<Vec3>(1)
        .unwrap();
    scene
        .renderer
        .populate_uniform_value_at_index(pivot, 0, &Vec3::new(0.0, 1.0, 0.0))
        .unwrap();

    let mut transform = Scene::screen_filling_transform(2.0);
    transform.scale = Mat4::from_scale(Vec3::new(2.0, 0.0, 1.0));
    let mut draw_call = scene.quad_draw_call(transform, texture);
    draw_call.vertex_shader_type = VertexShaderType::RaisingDoor {
        pre_scale_translation_buffer_id: pivot,
    };

    scene.submit(&[draw_call]);
    assert_eq!(scene.renderer.get_profiler_data().total_color_writes, 0);
}

#[test]
fn test_varying_texture_is_read_at_submit() {
    let mut scene = Scene::new(DitheringMode::None);
    let first = solid_texture(&mut scene.renderer, 30);
    let second = solid_texture(&mut scene.renderer, 40);
    let varying = VaryingTexture::new(first);
    let transform_buffer = scene.transform_buffer(Scene::screen_filling_transform(2.0));
    let draw_call = ochre_core::renderer::RenderDrawCall::new(
        scene.quad.positions,
        scene.quad.tex_coords,
        scene.quad.indices,
        transform_buffer,
        varying.clone(),
    );

    scene.submit(&[draw_call.clone()]);
    assert_eq!(scene.center_pixel(), palette_color(30));

    varying.set(Some(second));
    scene.submit(&[draw_call]);
    assert_eq!(scene.center_pixel(), palette_color(40));
}

#[test]
fn test_alpha_test_layer_falls_back_to_base_texture() {
    let mut scene = Scene::new(DitheringMode::None);
    let base = solid_texture(&mut scene.renderer, 60);
    let overlay = solid_texture(&mut scene.renderer, 0);
    let mut draw_call = scene.quad_draw_call(Scene::screen_filling_transform(2.0), base);
    draw_call.pixel_shader_type = PixelShaderType::OpaqueWithAlphaTestLayer;
    draw_call.textures[1] = Some(overlay.into());
    draw_call.texture_sampling_types[0] = TextureSamplingType::ScreenSpaceRepeatY;

    scene.submit(&[draw_call]);
    assert!(scene.output.iter().all(|&color| color == palette_color(60)));
}

#[test]
fn test_palette_index_lookup_recolors() {
    let mut scene = Scene::new(DitheringMode::None);
    let texture = solid_texture(&mut scene.renderer, 5);
    let mut remap: Vec<u8> = (0..=255).collect();
    remap[5] = 99;
    let lookup = scene
        .renderer
        .try_create_object_texture_from(&ochre_core::renderer::TextureBuilder::Paletted {
            width: 256,
            height: 1,
            texels: remap,
        })
        .unwrap();
    let mut draw_call = scene.quad_draw_call(Scene::screen_filling_transform(2.0), texture);
    draw_call.pixel_shader_type = PixelShaderType::AlphaTestedWithPaletteIndexLookup;
    draw_call.textures[1] = Some(lookup.into());

    scene.submit(&[draw_call]);
    assert_eq!(scene.center_pixel(), palette_color(99));
}

/// A puddle floor one unit below the eye, from `near` to `near + depth` in front of it.
fn puddle_floor(near: f64, depth: f64) -> RenderTransform {
    RenderTransform {
        rotation: Mat4::from_rotation_x(-std::f64::consts::FRAC_PI_2),
        ..RenderTransform::from_parts(
            Vec3::new(0.0, -1.0, -(near + depth * 0.5)),
            0.0,
            Vec3::new(4.0, depth * 0.5, 1.0),
        )
    }
}

#[test]
fn test_horizon_mirror_reflects_frame_buffer() {
    let mut scene = Scene::new(DitheringMode::None);
    let backdrop_texture = solid_texture(&mut scene.renderer, 70);
    let puddle = solid_texture(&mut scene.renderer, PALETTE_INDEX_PUDDLE_EVEN_ROW);

    // Covers the upper half of the screen only.
    let backdrop = RenderTransform::from_parts(
        Vec3::new(0.0, 4.0, -8.0),
        0.0,
        Vec3::new(8.0 * ASPECT * 0.99, 4.0, 1.0),
    );
    let backdrop = scene.quad_draw_call(backdrop, backdrop_texture);
    let mut floor = scene.quad_draw_call(puddle_floor(1.0, 4.0), puddle);
    floor.pixel_shader_type = PixelShaderType::AlphaTestedWithHorizonMirror;

    scene.submit(&[backdrop, floor]);

    let bottom_center = WIDTH / 2 + (HEIGHT - 1) * WIDTH;
    assert_eq!(scene.renderer.palette_indices()[bottom_center], 70);
    assert_eq!(scene.output[bottom_center], palette_color(70));
}

#[test]
fn test_horizon_mirror_off_screen_uses_sky_color() {
    let mut scene = Scene::new(DitheringMode::None);
    let puddle = solid_texture(&mut scene.renderer, PALETTE_INDEX_PUDDLE_EVEN_ROW);
    let mut floor = scene.quad_draw_call(puddle_floor(0.1, 4.8), puddle);
    floor.pixel_shader_type = PixelShaderType::AlphaTestedWithHorizonMirror;

    // Looking down pushes the horizon towards the top, so the bottom rows reflect off screen.
    let camera = RenderCamera::new(Vec3::ZERO, Vec3::new(0.0, -0.5, -1.0), 90.0, ASPECT, 1.0);
    scene
        .renderer
        .submit_frame(&camera, &[floor], &scene.settings, &mut scene.output)
        .unwrap();

    let bottom_center = WIDTH / 2 + (HEIGHT - 1) * WIDTH;
    assert_eq!(scene.renderer.palette_indices()[bottom_center], SKY_TEXEL);
}

#[test]
fn test_stale_handle_skips_only_that_draw_call() {
    let mut scene = Scene::new(DitheringMode::None);
    let good = solid_texture(&mut scene.renderer, 10);
    let stale = solid_texture(&mut scene.renderer, 20);
    scene.renderer.free_object_texture(stale).unwrap();

    let broken = scene.quad_draw_call(Scene::screen_filling_transform(2.0), stale);
    let working = scene.quad_draw_call(Scene::screen_filling_transform(3.0), good);
    scene.submit(&[broken, working]);

    assert_eq!(scene.center_pixel(), palette_color(10));
    let profile = scene.renderer.get_profiler_data();
    assert_eq!(profile.draw_call_count, 2);
    assert_eq!(profile.scene_triangle_count, 2);
    assert_eq!(profile.vis_triangle_count, 2);
}

#[test]
fn test_submit_rejects_bad_frames() {
    let mut scene = Scene::new(DitheringMode::None);
    let camera = camera();

    let mut short = vec![0u32; 3];
    assert_eq!(
        scene
            .renderer
            .submit_frame(&camera, &[], &scene.settings, &mut short),
        Err(RenderError::Resource(ResourceError::SizeMismatch {
            expected: WIDTH * HEIGHT,
            actual: 3
        }))
    );

    let mut settings = scene.settings;
    settings.palette_texture_id = settings.light_table_texture_id;
    assert!(matches!(
        scene
            .renderer
            .submit_frame(&camera, &[], &settings, &mut scene.output),
        Err(RenderError::InvalidFrameSettings(_))
    ));

    scene.renderer.shutdown();
    assert_eq!(
        scene
            .renderer
            .submit_frame(&camera, &[], &scene.settings, &mut scene.output),
        Err(RenderError::NotInitialized)
    );
}

#[test]
fn test_resize_changes_frame_size() {
    let mut scene = Scene::new(DitheringMode::Modern);
    scene.renderer.resize(8, 6).unwrap();
    let texture = solid_texture(&mut scene.renderer, 7);
    let draw_call = scene.quad_draw_call(Scene::screen_filling_transform(2.0), texture);

    let mut output = vec![0u32; 8 * 6];
    scene
        .renderer
        .submit_frame(&camera(), &[draw_call], &scene.settings, &mut output)
        .unwrap();

    assert!(output.iter().all(|&color| color == palette_color(7)));
    assert_eq!(scene.renderer.get_profiler_data().total_color_writes, 8 * 6);
    assert!(scene.renderer.resize(0, 6).is_err());
}
