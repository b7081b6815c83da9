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

//! The per-draw-call model transform stored in uniform buffers.

use crate::math::{Mat4, Vec3};

/// Translation, rotation and scale matrices of one mesh instance.
///
/// Kept as three separate matrices so vertex shaders that need to scale
/// around a pivot can apply them individually.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct RenderTransform {
    /// Translation matrix.
    pub translation: Mat4,
    /// Rotation matrix.
    pub rotation: Mat4,
    /// Scale matrix.
    pub scale: Mat4,
}

impl RenderTransform {
    /// Builds a transform from a position, a rotation around Y (radians) and a scale.
    pub fn from_parts(position: Vec3, yaw: f64, scale: Vec3) -> Self {
        Self {
            translation: Mat4::from_translation(position),
            rotation: Mat4::from_rotation_y(yaw),
            scale: Mat4::from_scale(scale),
        }
    }

    /// The combined model matrix, `translation * rotation * scale`.
    #[inline]
    pub fn model_matrix(&self) -> Mat4 {
        self.translation * (self.rotation * self.scale)
    }
}

impl Default for RenderTransform {
    fn default() -> Self {
        Self {
            translation: Mat4::IDENTITY,
            rotation: Mat4::IDENTITY,
            scale: Mat4::IDENTITY,
        }
    }
}
