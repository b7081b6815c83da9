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

//! The per-frame camera and its derived frustum.

use crate::math::{degrees_to_radians, Mat4, Vec3, Vec4};

/// Distance to the near clipping plane.
pub const NEAR_PLANE: f64 = 0.001;
/// Distance to the far clipping plane.
pub const FAR_PLANE: f64 = 1000.0;

/// Converts a vertical field of view in degrees to a projection zoom factor.
#[inline]
pub fn vertical_fov_to_zoom(fov_y_degrees: f64) -> f64 {
    1.0 / (degrees_to_radians(fov_y_degrees) * 0.5).tan()
}

/// Converts a vertical field of view and aspect ratio into a horizontal field of view.
#[inline]
pub fn vertical_fov_to_horizontal_fov(fov_y_degrees: f64, aspect_ratio: f64) -> f64 {
    let half_width = aspect_ratio * (degrees_to_radians(fov_y_degrees) * 0.5).tan();
    2.0 * half_width.atan().to_degrees()
}

/// A camera snapshot built once per frame.
///
/// Holds the orthonormal basis, the view and projection matrices with their
/// inverses, the four side frustum directions and inward normals, and the
/// horizon direction used by the mirror shader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderCamera {
    /// World-space eye position.
    pub position: Vec3,
    /// Normalized view direction.
    pub forward: Vec3,
    /// Normalized right vector, `forward x Y`.
    pub right: Vec3,
    /// Normalized up vector, `right x forward`.
    pub up: Vec3,
    /// Horizontal field of view in degrees.
    pub fov_x: f64,
    /// Vertical field of view in degrees.
    pub fov_y: f64,
    /// Width over height of the view.
    pub aspect_ratio: f64,
    /// `1 / tan(fov_y / 2)`.
    pub zoom: f64,
    /// Vertical stretch applied in the projection for non-square pixels.
    pub tall_pixel_correction: f64,

    /// World to camera space.
    pub view_matrix: Mat4,
    /// Camera to clip space.
    pub projection_matrix: Mat4,
    /// Camera to world space.
    pub inverse_view_matrix: Mat4,
    /// Clip to camera space.
    pub inverse_projection_matrix: Mat4,

    /// Direction along the left frustum edge.
    pub left_frustum_dir: Vec3,
    /// Direction along the right frustum edge.
    pub right_frustum_dir: Vec3,
    /// Direction along the bottom frustum edge.
    pub bottom_frustum_dir: Vec3,
    /// Direction along the top frustum edge.
    pub top_frustum_dir: Vec3,
    /// Normal of the left frustum plane, pointing into the view volume.
    pub left_frustum_normal: Vec3,
    /// Normal of the right frustum plane, pointing into the view volume.
    pub right_frustum_normal: Vec3,
    /// Normal of the bottom frustum plane, pointing into the view volume.
    pub bottom_frustum_normal: Vec3,
    /// Normal of the top frustum plane, pointing into the view volume.
    pub top_frustum_normal: Vec3,

    /// The forward vector flattened onto the XZ plane.
    pub horizon_dir: Vec3,
}

impl RenderCamera {
    /// Builds a camera from an eye position and view direction.
    ///
    /// # Arguments
    ///
    /// * `position`: World-space eye position.
    /// * `direction`: View direction, need not be normalized.
    /// * `fov_y`: Vertical field of view in degrees.
    /// * `aspect_ratio`: Width over height of the frame buffer.
    /// * `tall_pixel_correction`: Vertical scale for non-square pixels (1.0 for square).
    pub fn new(
        position: Vec3,
        direction: Vec3,
        fov_y: f64,
        aspect_ratio: f64,
        tall_pixel_correction: f64,
    ) -> Self {
        let forward = direction.normalize();
        let zoom = vertical_fov_to_zoom(fov_y);
        let forward_scaled = forward * zoom;

        let right = forward.cross(Vec3::Y).normalize();
        let right_scaled = right * aspect_ratio;
        let up = right.cross(forward).normalize();

        let left_frustum_dir = (forward_scaled - right_scaled).normalize();
        let right_frustum_dir = (forward_scaled + right_scaled).normalize();
        let bottom_frustum_dir = (forward_scaled - up).normalize();
        let top_frustum_dir = (forward_scaled + up).normalize();

        let view_matrix = Mat4::view(position, forward, right, up);
        let mut projection_matrix =
            Mat4::perspective_rh_no(zoom, aspect_ratio, NEAR_PLANE, FAR_PLANE);
        projection_matrix.cols[1].y *= tall_pixel_correction;

        Self {
            position,
            forward,
            right,
            up,
            fov_x: vertical_fov_to_horizontal_fov(fov_y, aspect_ratio),
            fov_y,
            aspect_ratio,
            zoom,
            tall_pixel_correction,
            view_matrix,
            projection_matrix,
            inverse_view_matrix: view_matrix.inverse().unwrap_or(Mat4::IDENTITY),
            inverse_projection_matrix: projection_matrix.inverse().unwrap_or(Mat4::IDENTITY),
            left_frustum_dir,
            right_frustum_dir,
            bottom_frustum_dir,
            top_frustum_dir,
            left_frustum_normal: left_frustum_dir.cross(up).normalize(),
            right_frustum_normal: up.cross(right_frustum_dir).normalize(),
            bottom_frustum_normal: right.cross(bottom_frustum_dir).normalize(),
            top_frustum_normal: top_frustum_dir.cross(right).normalize(),
            horizon_dir: Vec3::new(forward.x, 0.0, forward.z).normalize(),
        }
    }

    /// Transforms a world-space point all the way to clip space.
    #[inline]
    pub fn world_to_clip(&self, point: Vec3) -> Vec4 {
        self.projection_matrix * (self.view_matrix * Vec4::from_vec3(point, 1.0))
    }
}
