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

//! Defines the point light used for per-pixel lighting.

use crate::math::Vec3;

/// A point light with a linear falloff between two radii.
///
/// Inside `start_radius` the light contributes full intensity, beyond
/// `end_radius` it contributes nothing, and in between intensity ramps down
/// linearly.
///
/// # Examples
///
/// ```
/// use ochre_core::math::Vec3;
/// use ochre_core::renderer::light::Light;
///
/// let torch = Light::new(Vec3::ZERO, 2.0, 6.0);
/// assert_eq!(torch.intensity_at(Vec3::new(4.0, 0.0, 0.0)), 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// World-space position.
    pub point: Vec3,
    /// Distance up to which the light is at full intensity.
    pub start_radius: f64,
    /// Distance at and beyond which the light has no effect.
    pub end_radius: f64,
}

impl Light {
    /// Creates a light. Callers are expected to pass radii accepted by [`Light::radii_are_valid`].
    pub fn new(point: Vec3, start_radius: f64, end_radius: f64) -> Self {
        Self {
            point,
            start_radius,
            end_radius,
        }
    }

    /// Returns `true` if `end_radius >= start_radius >= 0`.
    #[inline]
    pub fn radii_are_valid(start_radius: f64, end_radius: f64) -> bool {
        start_radius >= 0.0 && end_radius >= start_radius
    }

    /// The contribution of this light at a world-space point, in `[0, 1]`.
    #[inline]
    pub fn intensity_at(&self, point: Vec3) -> f64 {
        let distance = self.point.distance(point);
        if distance <= self.start_radius {
            1.0
        } else if distance >= self.end_radius {
            0.0
        } else {
            let ramp = (distance - self.start_radius) / (self.end_radius - self.start_radius);
            (1.0 - ramp).clamp(0.0, 1.0)
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 0.0, 0.0)
    }
}
