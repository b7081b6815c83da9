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

use common::*;
use ochre_core::math::Vec3;
use ochre_core::renderer::{
    DitheringMode, PoolLimits, RenderBackend, RenderInitSettings, RenderTransform, ResourceError,
    TexelFormat,
};
use ochre_infra::SoftwareRenderer;

fn renderer_with_limits(pool_limits: PoolLimits) -> SoftwareRenderer {
    init_logging();
    let mut renderer = SoftwareRenderer::new();
    renderer
        .init(&RenderInitSettings {
            width: WIDTH,
            height: HEIGHT,
            dithering_mode: DitheringMode::None,
            pool_limits,
        })
        .unwrap();
    renderer
}

#[test]
fn test_free_then_allocate_reuses_slot() {
    let mut renderer = renderer_with_limits(PoolLimits {
        vertex_position_buffers: 1,
        ..PoolLimits::default()
    });

    for _ in 0..3 {
        let id = renderer.try_create_vertex_position_buffer(4, 3).unwrap();
        assert_eq!(
            renderer.try_create_vertex_position_buffer(4, 3),
            Err(ResourceError::PoolExhausted {
                pool: "vertex position buffer",
                capacity: 1
            })
        );
        renderer.populate_vertex_position_buffer(id, &[0.0; 12]).unwrap();
        renderer.free_vertex_position_buffer(id).unwrap();
    }
}

#[test]
fn test_freed_texture_slot_is_reused_and_counted() {
    let mut renderer = renderer_with_limits(PoolLimits::default());
    let a = renderer
        .try_create_object_texture(4, 4, TexelFormat::Paletted8)
        .unwrap();
    let b = renderer
        .try_create_object_texture(2, 2, TexelFormat::TrueColor32)
        .unwrap();

    let profile = renderer.get_profiler_data();
    assert_eq!(profile.texture_count, 2);
    assert_eq!(profile.texture_byte_count, 16 + 16);

    renderer.free_object_texture(a).unwrap();
    assert_eq!(renderer.get_profiler_data().texture_count, 1);
    assert_eq!(
        renderer.try_get_object_texture_dims(a),
        Err(ResourceError::InvalidHandle)
    );

    let c = renderer
        .try_create_object_texture(4, 4, TexelFormat::Paletted8)
        .unwrap();
    assert_eq!(c, a);
    assert_eq!(renderer.try_get_object_texture_dims(b), Ok((2, 2)));
}

#[test]
fn test_populate_requires_exact_sizes() {
    let mut renderer = renderer_with_limits(PoolLimits::default());

    let positions = renderer.try_create_vertex_position_buffer(3, 3).unwrap();
    assert_eq!(
        renderer.populate_vertex_position_buffer(positions, &[0.0; 8]),
        Err(ResourceError::SizeMismatch {
            expected: 9,
            actual: 8
        })
    );

    let uvs = renderer.try_create_vertex_attribute_buffer(3, 2).unwrap();
    assert!(renderer.populate_vertex_attribute_buffer(uvs, &[0.0; 7]).is_err());

    let indices = renderer.try_create_index_buffer(3).unwrap();
    assert!(renderer.populate_index_buffer(indices, &[0, 1]).is_err());
    assert!(renderer.try_create_index_buffer(4).is_err());

    let uniforms = renderer
        .try_create_uniform_buffer_for::<RenderTransform>(2)
        .unwrap();
    assert!(renderer.populate_uniform_buffer(uniforms, &[0; 8]).is_err());
    assert_eq!(
        renderer.populate_uniform_value_at_index(uniforms, 2, &RenderTransform::default()),
        Err(ResourceError::OutOfBounds { index: 2, len: 2 })
    );
    let all = [RenderTransform::default(); 2];
    renderer
        .populate_uniform_buffer(uniforms, bytemuck::cast_slice(&all))
        .unwrap();
}

#[test]
fn test_light_radius_is_validated() {
    let mut renderer = renderer_with_limits(PoolLimits::default());
    let light = renderer.try_create_light().unwrap();
    renderer.set_light_position(light, Vec3::ONE).unwrap();
    renderer.set_light_radius(light, 2.0, 6.0).unwrap();
    assert!(renderer.set_light_radius(light, 3.0, 1.0).is_err());
    assert!(renderer.set_light_radius(light, -1.0, 1.0).is_err());

    renderer.free_light(light).unwrap();
    assert_eq!(
        renderer.set_light_position(light, Vec3::ZERO),
        Err(ResourceError::InvalidHandle)
    );
    assert_eq!(renderer.get_profiler_data().total_light_count, 0);
}

#[test]
fn test_locked_texture_writes_show_up_in_next_frame() {
    let mut scene = Scene::new(DitheringMode::None);
    let texture = scene
        .renderer
        .try_create_object_texture(1, 1, TexelFormat::Paletted8)
        .unwrap();
    {
        let locked = scene.renderer.lock_object_texture(texture).unwrap();
        assert_eq!(locked.bytes_per_texel(), 1);
        assert_eq!(locked.texels.len(), 1);
        locked.texels[0] = 42;
    }
    scene.renderer.unlock_object_texture(texture);

    let draw_call = scene.quad_draw_call(Scene::screen_filling_transform(2.0), texture);
    scene.submit(&[draw_call]);
    assert_eq!(scene.center_pixel(), palette_color(42));
}

#[test]
fn test_shutdown_releases_everything() {
    let mut renderer = renderer_with_limits(PoolLimits::default());
    let texture = renderer
        .try_create_object_texture(8, 8, TexelFormat::Paletted8)
        .unwrap();
    renderer.try_create_light().unwrap();

    renderer.shutdown();

    assert!(!renderer.is_initialized());
    assert_eq!(
        renderer.try_get_object_texture_dims(texture),
        Err(ResourceError::InvalidHandle)
    );
    let profile = renderer.get_profiler_data();
    assert_eq!(profile.texture_count, 0);
    assert_eq!(profile.total_light_count, 0);
    assert_eq!((profile.width, profile.height), (0, 0));
}
