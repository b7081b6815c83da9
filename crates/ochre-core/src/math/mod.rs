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

//! Provides the double-precision math primitives used by the rasterizer.
//!
//! Vertex transformation, clipping and barycentric interpolation all run in
//! `f64`. The types here are deliberately small: vectors, a column-major 4x4
//! matrix, and a handful of scalar helpers.
//!
//! All angular functions in this module operate in **radians**, unless
//! explicitly specified otherwise (e.g., `degrees_to_radians`).

// --- Fundamental Constants ---

/// A small constant for floating-point comparisons.
pub const EPSILON: f64 = 1e-10;

pub use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

/// The factor to convert degrees to radians (PI / 180.0).
pub const DEG_TO_RAD: f64 = PI / 180.0;

// --- Declare Sub-Modules ---

pub mod matrix;
pub mod vector;

// --- Re-export Principal Types ---

pub use self::matrix::Mat4;
pub use self::vector::{Vec2, Vec3, Vec4};

// --- Utility Functions ---

/// Converts an angle from degrees to radians.
///
/// # Examples
///
/// ```
/// use ochre_core::math::{degrees_to_radians, PI};
/// assert_eq!(degrees_to_radians(180.0), PI);
/// ```
#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * DEG_TO_RAD
}

/// Clamps a value to the `[0.0, 1.0]` range.
#[inline]
pub fn saturate(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Converts a normalized coordinate into a texel index in `[0, size - 1]`.
///
/// Coordinates outside `[0, 1)` clamp to the nearest edge texel.
#[inline]
pub fn texel_index(coord: f64, size: usize) -> usize {
    let max = size.saturating_sub(1) as i64;
    ((coord * size as f64) as i64).clamp(0, max) as usize
}
