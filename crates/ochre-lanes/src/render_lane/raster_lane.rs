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

//! Rasterization of clipped triangles into the frame buffers.
//!
//! Each triangle is projected to screen space, culled if back-facing and
//! walked over its bounding box. Covered pixel centers are depth tested,
//! perspective-corrected, lit and handed to the draw call's pixel shader.

use super::clip::ClipTriangle;
use super::dither::DitherBuffer;
use super::frame_buffer::FrameBufferView;
use super::frame_context::FrameStats;
use super::pixel_shader::{PixelInput, PixelShader, ShaderResources};
use ochre_core::math::{Vec2, Vec3, Vec4};
use ochre_core::renderer::{Light, RenderCamera};

/// How a draw call's light intensity is obtained.
#[derive(Debug, Clone, Copy)]
pub enum LightingMode<'a> {
    /// One intensity for the whole mesh.
    PerMesh(f64),
    /// Ambient plus the contribution of each light at the pixel's world position.
    PerPixel {
        /// Base intensity before any light is added.
        ambient: f64,
        /// Lights affecting the draw call.
        lights: &'a [Light],
    },
}

impl LightingMode<'_> {
    #[inline]
    fn intensity_at(&self, world_point: Vec3) -> f64 {
        match *self {
            LightingMode::PerMesh(percent) => percent,
            LightingMode::PerPixel { ambient, lights } => {
                let mut sum = ambient;
                for light in lights {
                    sum += light.intensity_at(world_point);
                    if sum >= 1.0 {
                        return 1.0;
                    }
                }
                sum
            }
        }
    }

    #[inline]
    fn is_per_pixel(&self) -> bool {
        matches!(self, LightingMode::PerPixel { .. })
    }
}

/// Everything a draw call needs to rasterize its triangles.
#[derive(Debug, Clone, Copy)]
pub struct DrawState<'a> {
    /// The pixel shader and its parameters.
    pub shader: PixelShader<'a>,
    /// Texture slot 0, light table and palette.
    pub resources: ShaderResources<'a>,
    /// Light intensity source.
    pub lighting: LightingMode<'a>,
    /// Test against the depth buffer before shading.
    pub enable_depth_read: bool,
    /// Store depth for pixels the shader writes.
    pub enable_depth_write: bool,
}

/// Per-frame inputs shared by every draw call.
#[derive(Debug, Clone, Copy)]
pub struct RasterFrame<'a> {
    /// Camera the triangles were transformed with.
    pub camera: &'a RenderCamera,
    /// Dither masks matching the frame buffer size.
    pub dither: &'a DitherBuffer,
}

/// Maps normalized device coordinates to pixels, with Y pointing down.
#[inline]
pub fn ndc_to_screen(ndc: Vec3, width: f64, height: f64) -> Vec2 {
    Vec2::new((0.5 + ndc.x * 0.5) * width, (0.5 - ndc.y * 0.5) * height)
}

#[inline]
fn clip_to_ndc(clip: Vec4) -> Vec3 {
    clip.truncate() / clip.w
}

/// Screen position of the point one unit along the camera's horizon direction.
pub fn horizon_screen_point(camera: &RenderCamera, width: usize, height: usize) -> Vec2 {
    let clip = camera.world_to_clip(camera.position + camera.horizon_dir);
    ndc_to_screen(clip_to_ndc(clip), width as f64, height as f64)
}

#[inline]
fn lower_bounded_pixel(value: f64, count: usize) -> usize {
    (value.floor() as i64).clamp(0, count as i64) as usize
}

#[inline]
fn upper_bounded_pixel(value: f64, count: usize) -> usize {
    (value.ceil() as i64).clamp(0, count as i64) as usize
}

/// A triangle prepared for scan conversion.
struct ScreenTriangle {
    clip: [Vec4; 3],
    ndc_z: [f64; 3],
    uvs: [Vec2; 3],
    screen: [Vec2; 3],
    edges: [Vec2; 3],
    edge_perps: [Vec2; 3],
}

impl ScreenTriangle {
    /// Projects `tri`, or returns `None` if it faces away from the camera.
    fn new(tri: &ClipTriangle, width: f64, height: f64) -> Option<Self> {
        let ndc = tri.positions.map(clip_to_ndc);
        let screen = ndc.map(|p| ndc_to_screen(p, width, height));
        let e01 = screen[1] - screen[0];
        let e12 = screen[2] - screen[1];
        let e20 = screen[0] - screen[2];

        let winding = e12.cross(e01) + e20.cross(e12) + e01.cross(e20);
        if winding <= 0.0 {
            return None;
        }

        let edges = [e01, e12, e20];
        Some(Self {
            clip: tri.positions,
            ndc_z: ndc.map(|p| p.z),
            uvs: tri.uvs,
            screen,
            edges,
            edge_perps: edges.map(|e| e.right_perp()),
        })
    }

    #[inline]
    fn covers(&self, point: Vec2) -> bool {
        (0..3).all(|i| (point - self.screen[i]).dot(self.edge_perps[i]) >= 0.0)
    }

    /// Barycentric weights of `point` for vertices 0, 1 and 2.
    #[inline]
    fn barycentric(&self, point: Vec2) -> (f64, f64, f64) {
        let ss0 = self.edges[0];
        let ss1 = self.screen[2] - self.screen[0];
        let ss2 = point - self.screen[0];
        let dot00 = ss0.dot(ss0);
        let dot01 = ss0.dot(ss1);
        let dot11 = ss1.dot(ss1);
        let dot20 = ss2.dot(ss0);
        let dot21 = ss2.dot(ss1);
        let denominator = dot00 * dot11 - dot01 * dot01;
        let v = (dot11 * dot20 - dot01 * dot21) / denominator;
        let w = (dot00 * dot21 - dot01 * dot20) / denominator;
        (1.0 - v - w, v, w)
    }

    fn bounds(&self, width: usize, height: usize) -> (usize, usize, usize, usize) {
        let [s0, s1, s2] = self.screen;
        let x_min = s0.x.min(s1.x).min(s2.x);
        let x_max = s0.x.max(s1.x).max(s2.x);
        let y_min = s0.y.min(s1.y).min(s2.y);
        let y_max = s0.y.max(s1.y).max(s2.y);
        (
            lower_bounded_pixel(x_min, width),
            upper_bounded_pixel(x_max, width),
            lower_bounded_pixel(y_min, height),
            upper_bounded_pixel(y_max, height),
        )
    }
}

/// Rasterizes one draw call's clipped triangles.
///
/// Depth tests are counted whenever depth read is enabled, color writes only
/// when the pixel shader produces a palette index.
pub fn rasterize_triangles(
    triangles: &[ClipTriangle],
    draw: &DrawState<'_>,
    frame: &RasterFrame<'_>,
    target: &mut FrameBufferView<'_>,
    stats: &mut FrameStats,
) {
    let (width, height) = (target.width(), target.height());
    let (width_real, height_real) = (width as f64, height as f64);
    let camera = frame.camera;
    let light_table = &draw.resources.light_table;
    let per_pixel = draw.lighting.is_per_pixel();
    let horizon = matches!(draw.shader, PixelShader::AlphaTestedWithHorizonMirror { .. })
        .then(|| horizon_screen_point(camera, width, height));

    for triangle in triangles {
        let Some(tri) = ScreenTriangle::new(triangle, width_real, height_real) else {
            continue;
        };
        let (x_start, x_end, y_start, y_end) = tri.bounds(width, height);
        let [clip0, clip1, clip2] = tri.clip;
        let [uv0, uv1, uv2] = tri.uvs;

        for y in y_start..y_end {
            let y_percent = (y as f64 + 0.5) / height_real;
            for x in x_start..x_end {
                let x_percent = (x as f64 + 0.5) / width_real;
                let pixel_center = Vec2::new(x_percent * width_real, y_percent * height_real);
                if !tri.covers(pixel_center) {
                    continue;
                }

                let (u, v, w) = tri.barycentric(pixel_center);
                let depth = tri.ndc_z[0] * u + tri.ndc_z[1] * v + tri.ndc_z[2] * w;
                let pixel_index = x + y * width;

                if draw.enable_depth_read {
                    stats.depth_tests += 1;
                    if depth >= target.depth[pixel_index] {
                        continue;
                    }
                }

                let clip_point = Vec4::new(
                    (clip0.x / clip0.w) * u + (clip1.x / clip1.w) * v + (clip2.x / clip2.w) * w,
                    (clip0.y / clip0.w) * u + (clip1.y / clip1.w) * v + (clip2.y / clip2.w) * w,
                    (clip0.z / clip0.w) * u + (clip1.z / clip1.w) * v + (clip2.z / clip2.w) * w,
                    (1.0 / clip0.w) * u + (1.0 / clip1.w) * v + (1.0 / clip2.w) * w,
                );
                let texel_percent = Vec2::new(
                    ((uv0.x / clip0.w) * u + (uv1.x / clip1.w) * v + (uv2.x / clip2.w) * w)
                        / clip_point.w,
                    ((uv0.y / clip0.w) * u + (uv1.y / clip1.w) * v + (uv2.y / clip2.w) * w)
                        / clip_point.w,
                );

                let intensity = if per_pixel {
                    let homogeneous = Vec4::new(
                        clip_point.x / clip_point.w,
                        clip_point.y / clip_point.w,
                        clip_point.z / clip_point.w,
                        1.0 / clip_point.w,
                    );
                    let camera_point = camera.inverse_projection_matrix * homogeneous;
                    let world_point = camera.inverse_view_matrix * camera_point;
                    draw.lighting.intensity_at(world_point.truncate())
                } else {
                    draw.lighting.intensity_at(Vec3::ZERO)
                };

                let (mut light_level, light_level_real) = light_table.light_level(intensity);
                if per_pixel && frame.dither.should_dither(x, y, intensity, light_level_real) {
                    light_level = (light_level + 1).min(light_table.darkest_level());
                }

                let reflected_pixel_index = horizon.and_then(|horizon| {
                    let reflected_y = horizon.y + (horizon.y - pixel_center.y);
                    let rx = pixel_center.x as i64;
                    let ry = reflected_y as i64;
                    ((0..width as i64).contains(&rx) && (0..height as i64).contains(&ry))
                        .then(|| rx as usize + ry as usize * width)
                });

                let input = PixelInput {
                    pixel_index,
                    x_percent,
                    y_percent,
                    texel_percent,
                    light_level,
                    reflected_pixel_index,
                };
                let Some(palette_index) =
                    draw.shader.shade(&draw.resources, &input, &*target.palette_indices)
                else {
                    continue;
                };

                target.palette_indices[pixel_index] = palette_index;
                if draw.enable_depth_write {
                    target.depth[pixel_index] = depth;
                }
                target.colors[pixel_index] = draw.resources.palette.color(palette_index);
                stats.color_writes += 1;
            }
        }
    }
}
