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

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ochre_core::math::Vec3;
use ochre_core::renderer::palette::PALETTE_LENGTH;
use ochre_core::renderer::{DitheringMode, Light, RenderCamera, RenderTransform, TextureSamplingType};
use ochre_lanes::render_lane::{
    process_mesh, rasterize_triangles, DitherBuffer, DrawState, FrameBuffers, FrameContext,
    LightTable, LightingMode, MeshInput, Palette, PixelShader, RasterFrame, ShaderResources,
    ShaderTexture, VertexShader, POSITION_COMPONENTS, TEX_COORD_COMPONENTS,
};

const WIDTH: usize = 320;
const HEIGHT: usize = 200;

// A wall filling most of the view, slightly rotated so it gets clipped.
const POSITIONS: [f64; 12] = [
    -3.0, -2.0, -2.5, //
    3.0, -2.0, -1.5, //
    3.0, 2.0, -1.5, //
    -3.0, 2.0, -2.5,
];
const TEX_COORDS: [f64; 8] = [0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
const INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

fn bench_frame(c: &mut Criterion) {
    let camera = RenderCamera::new(Vec3::ZERO, -Vec3::Z, 60.0, WIDTH as f64 / HEIGHT as f64, 1.2);
    let texels: Vec<u8> = (0..64 * 64).map(|i| (i % 255 + 1) as u8).collect();
    let light_table: Vec<u8> = (0..13)
        .flat_map(|level| (0..PALETTE_LENGTH).map(move |c| (c + level) as u8))
        .collect();
    let palette: Vec<u32> = (0..PALETTE_LENGTH as u32).map(|i| i * 0x0001_0101).collect();
    let dither = DitherBuffer::new(WIDTH, HEIGHT, DitheringMode::Modern);
    let lights = [
        Light::new(Vec3::new(0.0, 0.0, -1.0), 0.5, 3.0),
        Light::new(Vec3::new(2.0, 1.0, -2.0), 0.5, 2.0),
    ];

    let mesh = MeshInput {
        positions: &POSITIONS,
        position_stride: POSITION_COMPONENTS,
        tex_coords: &TEX_COORDS,
        tex_coord_stride: TEX_COORD_COMPONENTS,
        indices: &INDICES,
    };
    let resources = ShaderResources {
        texture: ShaderTexture::new(&texels, 64, 64, TextureSamplingType::Default).unwrap(),
        light_table: LightTable::new(&light_table, PALETTE_LENGTH, 13).unwrap(),
        palette: Palette::new(&palette).unwrap(),
    };
    let frame = RasterFrame {
        camera: &camera,
        dither: &dither,
    };

    let mut ctx = FrameContext::with_capacity(64);
    let mut buffers = FrameBuffers::new(WIDTH, HEIGHT);
    let mut colors = vec![0u32; WIDTH * HEIGHT];

    let mut group = c.benchmark_group("Software Raster");

    for (name, lighting) in [
        ("Per-mesh lighting", LightingMode::PerMesh(0.8)),
        (
            "Per-pixel lighting",
            LightingMode::PerPixel {
                ambient: 0.1,
                lights: &lights,
            },
        ),
    ] {
        let draw = DrawState {
            shader: PixelShader::AlphaTested,
            resources,
            lighting,
            enable_depth_read: true,
            enable_depth_write: true,
        };
        group.bench_function(name, |b| {
            b.iter(|| {
                ctx.begin_frame(1);
                let mut view = buffers.view(&mut colors).unwrap();
                view.clear();
                process_mesh(
                    &mesh,
                    &RenderTransform::default(),
                    &camera.view_matrix,
                    &camera.projection_matrix,
                    VertexShader::Basic,
                    &mut ctx,
                )
                .unwrap();
                rasterize_triangles(&ctx.mesh_triangles, &draw, &frame, &mut view, &mut ctx.stats);
                black_box(ctx.stats.color_writes);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_frame);
criterion_main!(benches);
