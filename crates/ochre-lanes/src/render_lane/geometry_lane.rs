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

//! Vertex shading and frustum clipping of one draw call.
//!
//! The geometry lane reads a mesh through its index buffer, runs the vertex
//! shader on each triangle, clips the result against the frustum and leaves
//! the surviving clip-space triangles in [`FrameContext::mesh_triangles`].

use super::clip::ClipTriangle;
use super::error::GeometryError;
use super::frame_context::FrameContext;
use ochre_core::math::{Mat4, Vec2, Vec3, Vec4};
use ochre_core::renderer::RenderTransform;

/// Components read from each vertex of a position buffer.
pub const POSITION_COMPONENTS: usize = 3;
/// Components read from each vertex of a texture coordinate buffer.
pub const TEX_COORD_COMPONENTS: usize = 2;

/// A vertex shader with its resolved inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VertexShader {
    /// `clip = mvp * vertex`.
    Basic,
    /// Identical to [`VertexShader::Basic`].
    Entity,
    /// Scales around `pre_scale_translation` before the model transform.
    RaisingDoor {
        /// Pivot offset applied before scaling and removed after.
        pre_scale_translation: Vec3,
    },
}

/// The matrices a vertex shader needs.
#[derive(Debug, Clone, Copy)]
struct ShaderMatrices {
    transform: RenderTransform,
    view: Mat4,
    projection: Mat4,
    model_view_projection: Mat4,
}

impl ShaderMatrices {
    fn new(transform: &RenderTransform, view: &Mat4, projection: &Mat4) -> Self {
        Self {
            transform: *transform,
            view: *view,
            projection: *projection,
            model_view_projection: *projection * (*view * transform.model_matrix()),
        }
    }
}

impl VertexShader {
    #[inline]
    fn shade(&self, vertex: Vec3, m: &ShaderMatrices) -> Vec4 {
        match self {
            VertexShader::Basic | VertexShader::Entity => {
                m.model_view_projection * Vec4::from_vec3(vertex, 1.0)
            }
            VertexShader::RaisingDoor {
                pre_scale_translation,
            } => {
                let pivoted = Vec4::from_vec3(vertex + *pre_scale_translation, 1.0);
                let scaled = m.transform.scale * pivoted;
                let restored = scaled - Vec4::from_vec3(*pre_scale_translation, 0.0);
                m.projection
                    * (m.view * (m.transform.translation * (m.transform.rotation * restored)))
            }
        }
    }
}

/// A draw call's geometry, borrowed from the resource pools.
#[derive(Debug, Clone, Copy)]
pub struct MeshInput<'a> {
    /// Flat positions, `x, y, z` first in each vertex.
    pub positions: &'a [f64],
    /// Components stored per vertex in `positions`.
    pub position_stride: usize,
    /// Flat texture coordinates, `u, v` first in each vertex.
    pub tex_coords: &'a [f64],
    /// Components stored per vertex in `tex_coords`.
    pub tex_coord_stride: usize,
    /// Triangle indices into both buffers.
    pub indices: &'a [u32],
}

impl MeshInput<'_> {
    /// Checks every index against both buffers so processing cannot fail halfway.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.indices.len() % 3 != 0 {
            return Err(GeometryError::IncompleteTriangle(self.indices.len()));
        }
        check_stride("position", self.position_stride, POSITION_COMPONENTS)?;
        check_stride("texture coordinate", self.tex_coord_stride, TEX_COORD_COMPONENTS)?;
        let vertex_count = self.positions.len() / self.position_stride;
        let uv_count = self.tex_coords.len() / self.tex_coord_stride;
        for &index in self.indices {
            if index as usize >= vertex_count {
                return Err(GeometryError::PositionOutOfRange {
                    index,
                    vertex_count,
                });
            }
            if index as usize >= uv_count {
                return Err(GeometryError::TexCoordOutOfRange { index, uv_count });
            }
        }
        Ok(())
    }

    #[inline]
    fn position(&self, index: u32) -> Vec3 {
        let i = index as usize * self.position_stride;
        Vec3::new(self.positions[i], self.positions[i + 1], self.positions[i + 2])
    }

    #[inline]
    fn tex_coord(&self, index: u32) -> Vec2 {
        let i = index as usize * self.tex_coord_stride;
        Vec2::new(self.tex_coords[i], self.tex_coords[i + 1])
    }
}

fn check_stride(buffer: &'static str, components: usize, required: usize) -> Result<(), GeometryError> {
    if components < required {
        return Err(GeometryError::TooFewComponents {
            buffer,
            components,
            required,
        });
    }
    Ok(())
}

/// Shades and clips every triangle of a mesh.
///
/// Replaces the contents of `ctx.mesh_triangles` with the clipped triangles
/// and returns how many there are. Nothing is written if the mesh fails
/// validation.
pub fn process_mesh(
    mesh: &MeshInput<'_>,
    transform: &RenderTransform,
    view: &Mat4,
    projection: &Mat4,
    vertex_shader: VertexShader,
    ctx: &mut FrameContext,
) -> Result<usize, GeometryError> {
    mesh.validate()?;
    ctx.mesh_triangles.clear();

    let matrices = ShaderMatrices::new(transform, view, projection);
    let triangle_count = mesh.indices.len() / 3;

    for triangle in mesh.indices.chunks_exact(3) {
        let (i0, i1, i2) = (triangle[0], triangle[1], triangle[2]);
        let shaded = ClipTriangle::new(
            [
                vertex_shader.shade(mesh.position(i0), &matrices),
                vertex_shader.shade(mesh.position(i1), &matrices),
                vertex_shader.shade(mesh.position(i2), &matrices),
            ],
            [mesh.tex_coord(i0), mesh.tex_coord(i1), mesh.tex_coord(i2)],
        );

        ctx.clip_list.reset(shaded);
        ctx.clip_list.clip_against_frustum();
        ctx.mesh_triangles
            .extend_from_slice(ctx.clip_list.results());
    }

    let visible = ctx.mesh_triangles.len();
    ctx.stats.scene_triangle_count += triangle_count;
    ctx.stats.vis_triangle_count += visible;
    log::trace!("Processed mesh: {triangle_count} triangles in, {visible} clipped triangles out.");
    Ok(visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ochre_core::renderer::RenderCamera;

    fn camera() -> RenderCamera {
        RenderCamera::new(Vec3::ZERO, -Vec3::Z, 90.0, 1.0, 1.0)
    }

    const QUAD_POSITIONS: [f64; 12] = [
        -1.0, -1.0, -4.0, //
        1.0, -1.0, -4.0, //
        1.0, 1.0, -4.0, //
        -1.0, 1.0, -4.0,
    ];
    const QUAD_UVS: [f64; 8] = [0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
    const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

    fn quad() -> MeshInput<'static> {
        MeshInput {
            positions: &QUAD_POSITIONS,
            position_stride: POSITION_COMPONENTS,
            tex_coords: &QUAD_UVS,
            tex_coord_stride: TEX_COORD_COMPONENTS,
            indices: &QUAD_INDICES,
        }
    }

    #[test]
    fn test_visible_quad_passes_through_unclipped() {
        let camera = camera();
        let mut ctx = FrameContext::default();
        let count = process_mesh(
            &quad(),
            &RenderTransform::default(),
            &camera.view_matrix,
            &camera.projection_matrix,
            VertexShader::Basic,
            &mut ctx,
        )
        .unwrap();

        assert_eq!(count, 2);
        assert_eq!(ctx.stats.scene_triangle_count, 2);
        assert_eq!(ctx.stats.vis_triangle_count, 2);
        let first = ctx.mesh_triangles[0].positions[0];
        assert_abs_diff_eq!(first.x / first.w, -0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(first.w, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mesh_behind_camera_produces_nothing() {
        let camera = camera();
        let mut ctx = FrameContext::default();
        let transform = RenderTransform::from_parts(Vec3::new(0.0, 0.0, 8.0), 0.0, Vec3::ONE);
        let count = process_mesh(
            &quad(),
            &transform,
            &camera.view_matrix,
            &camera.projection_matrix,
            VertexShader::Entity,
            &mut ctx,
        )
        .unwrap();

        assert_eq!(count, 0);
        assert_eq!(ctx.stats.scene_triangle_count, 2);
        assert_eq!(ctx.stats.vis_triangle_count, 0);
    }

    #[test]
    fn test_out_of_range_index_is_rejected_without_output() {
        let indices = [0, 1, 7];
        let mesh = MeshInput {
            indices: &indices,
            ..quad()
        };
        let camera = camera();
        let mut ctx = FrameContext::default();
        ctx.mesh_triangles.push(ClipTriangle::default());

        let err = process_mesh(
            &mesh,
            &RenderTransform::default(),
            &camera.view_matrix,
            &camera.projection_matrix,
            VertexShader::Basic,
            &mut ctx,
        )
        .unwrap_err();

        assert_eq!(
            err,
            GeometryError::PositionOutOfRange {
                index: 7,
                vertex_count: 4
            }
        );
        assert_eq!(ctx.stats.scene_triangle_count, 0);
    }

    #[test]
    fn test_wide_vertices_are_read_by_stride() {
        let positions: Vec<f64> = QUAD_POSITIONS
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 1.0])
            .collect();
        let tex_coords: Vec<f64> = QUAD_UVS
            .chunks_exact(2)
            .flat_map(|uv| [uv[0], uv[1], 9.0])
            .collect();
        let wide = MeshInput {
            positions: &positions,
            position_stride: 4,
            tex_coords: &tex_coords,
            tex_coord_stride: 3,
            ..quad()
        };
        let camera = camera();
        let process = |mesh: &MeshInput<'_>| {
            let mut ctx = FrameContext::default();
            process_mesh(
                mesh,
                &RenderTransform::default(),
                &camera.view_matrix,
                &camera.projection_matrix,
                VertexShader::Basic,
                &mut ctx,
            )
            .unwrap();
            ctx.mesh_triangles
        };

        let expected = process(&quad());
        let actual = process(&wide);
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(&expected) {
            assert_eq!(a.positions, e.positions);
            assert_eq!(a.uvs, e.uvs);
        }
    }

    #[test]
    fn test_narrow_position_buffer_is_rejected() {
        let positions = [0.0; 8];
        let mesh = MeshInput {
            positions: &positions,
            position_stride: 2,
            ..quad()
        };
        assert_eq!(
            mesh.validate(),
            Err(GeometryError::TooFewComponents {
                buffer: "position",
                components: 2,
                required: POSITION_COMPONENTS
            })
        );
    }

    #[test]
    fn test_raising_door_scales_around_pivot() {
        let camera = camera();
        let scale = Vec3::new(1.0, 0.5, 1.0);
        let transform = RenderTransform {
            scale: Mat4::from_scale(scale),
            ..RenderTransform::default()
        };
        let matrices = ShaderMatrices::new(&transform, &camera.view_matrix, &camera.projection_matrix);
        let pivot = Vec3::new(0.0, 1.0, 0.0);
        let door = VertexShader::RaisingDoor {
            pre_scale_translation: pivot,
        };

        // A vertex at -pivot is the fixed point of the scale.
        let fixed = Vec3::new(0.0, -1.0, -4.0);
        let shaded = door.shade(fixed, &matrices);
        let expected = camera.world_to_clip(fixed);
        assert_abs_diff_eq!(shaded.y, expected.y, epsilon = 1e-12);

        // Vertices above it move halfway towards it.
        let top = door.shade(Vec3::new(0.0, 1.0, -4.0), &matrices);
        let expected_top = camera.world_to_clip(Vec3::new(0.0, 0.0, -4.0));
        assert_abs_diff_eq!(top.y, expected_top.y, epsilon = 1e-12);
    }
}
