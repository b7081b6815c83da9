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

//! Clip-space triangle clipping against the six frustum planes.
//!
//! A triangle is tested against `-w <= x <= w`, `-w <= y <= w` and
//! `-w <= z <= w` one plane at a time. Each test keeps, shrinks, splits or
//! drops the triangle while preserving its winding order, so the rasterizer's
//! back-face test gives the same answer before and after clipping.

use ochre_core::math::{Vec2, Vec4};

/// The most triangles clipping a single triangle against one plane can produce.
pub const MAX_TRIANGLE_CLIP_RESULTS: usize = 2;

/// Capacity of the per-triangle clip list. Six planes at most double the
/// working set each, and processed entries stay in place behind the front index.
pub const MAX_CLIPPED_TRIANGLE_TRIANGLES: usize = 64;

/// A triangle in clip space with its texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClipTriangle {
    /// Clip-space positions, before the perspective divide.
    pub positions: [Vec4; 3],
    /// Texture coordinates of each vertex.
    pub uvs: [Vec2; 3],
}

impl ClipTriangle {
    /// Creates a triangle from its vertices.
    #[inline]
    pub fn new(positions: [Vec4; 3], uvs: [Vec2; 3]) -> Self {
        Self { positions, uvs }
    }
}

/// One of the six clip-space half-spaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClipPlane {
    /// `x >= -w`
    NegativeX,
    /// `x <= w`
    PositiveX,
    /// `y >= -w`
    NegativeY,
    /// `y <= w`
    PositiveY,
    /// `z >= -w`, the near plane.
    NegativeZ,
    /// `z <= w`, the far plane.
    PositiveZ,
}

impl ClipPlane {
    /// All planes in the order they are tested.
    pub const ALL: [ClipPlane; 6] = [
        ClipPlane::NegativeX,
        ClipPlane::PositiveX,
        ClipPlane::NegativeY,
        ClipPlane::PositiveY,
        ClipPlane::NegativeZ,
        ClipPlane::PositiveZ,
    ];

    /// Signed difference between a vertex component and its bound.
    #[inline]
    pub fn diff(self, v: Vec4) -> f64 {
        match self {
            ClipPlane::NegativeX => v.x - (-v.w),
            ClipPlane::PositiveX => v.x - v.w,
            ClipPlane::NegativeY => v.y - (-v.w),
            ClipPlane::PositiveY => v.y - v.w,
            ClipPlane::NegativeZ => v.z - (-v.w),
            ClipPlane::PositiveZ => v.z - v.w,
        }
    }

    /// Whether a vertex with the given [`ClipPlane::diff`] lies inside.
    #[inline]
    pub fn is_inside(self, diff: f64) -> bool {
        match self {
            ClipPlane::NegativeX | ClipPlane::NegativeY | ClipPlane::NegativeZ => diff >= 0.0,
            ClipPlane::PositiveX | ClipPlane::PositiveY | ClipPlane::PositiveZ => diff <= 0.0,
        }
    }
}

/// The zero, one or two triangles left after clipping against one plane.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClipResult {
    triangles: [ClipTriangle; MAX_TRIANGLE_CLIP_RESULTS],
    count: usize,
}

impl ClipResult {
    fn none() -> Self {
        Self::default()
    }

    fn one(a: ClipTriangle) -> Self {
        Self {
            triangles: [a, ClipTriangle::default()],
            count: 1,
        }
    }

    fn two(a: ClipTriangle, b: ClipTriangle) -> Self {
        Self {
            triangles: [a, b],
            count: 2,
        }
    }

    /// The surviving triangles.
    #[inline]
    pub fn as_slice(&self) -> &[ClipTriangle] {
        &self.triangles[..self.count]
    }
}

/// The point where edge `a -> b` crosses the plane, with its interpolated UV.
#[inline]
fn intersect(
    tri: &ClipTriangle,
    diffs: &[f64; 3],
    a: usize,
    b: usize,
) -> (Vec4, Vec2) {
    // Only called for edges whose endpoints straddle the plane, so the
    // denominator is never zero.
    let t = diffs[a] / (diffs[a] - diffs[b]);
    (
        Vec4::lerp(tri.positions[a], tri.positions[b], t),
        Vec2::lerp(tri.uvs[a], tri.uvs[b], t),
    )
}

/// Clips one triangle against one plane.
pub fn clip_triangle(tri: &ClipTriangle, plane: ClipPlane) -> ClipResult {
    let [v0, v1, v2] = tri.positions;
    let [uv0, uv1, uv2] = tri.uvs;
    let diffs = [plane.diff(v0), plane.diff(v1), plane.diff(v2)];
    let inside = [
        plane.is_inside(diffs[0]),
        plane.is_inside(diffs[1]),
        plane.is_inside(diffs[2]),
    ];

    match inside {
        [true, true, true] => ClipResult::one(*tri),
        [true, true, false] => {
            let (p12, uv12) = intersect(tri, &diffs, 1, 2);
            let (p20, uv20) = intersect(tri, &diffs, 2, 0);
            ClipResult::two(
                ClipTriangle::new([v0, v1, p12], [uv0, uv1, uv12]),
                ClipTriangle::new([p12, p20, v0], [uv12, uv20, uv0]),
            )
        }
        [true, false, true] => {
            let (p01, uv01) = intersect(tri, &diffs, 0, 1);
            let (p12, uv12) = intersect(tri, &diffs, 1, 2);
            ClipResult::two(
                ClipTriangle::new([v0, p01, p12], [uv0, uv01, uv12]),
                ClipTriangle::new([p12, v2, v0], [uv12, uv2, uv0]),
            )
        }
        [true, false, false] => {
            let (p01, uv01) = intersect(tri, &diffs, 0, 1);
            let (p20, uv20) = intersect(tri, &diffs, 2, 0);
            ClipResult::one(ClipTriangle::new([v0, p01, p20], [uv0, uv01, uv20]))
        }
        [false, true, true] => {
            let (p01, uv01) = intersect(tri, &diffs, 0, 1);
            let (p20, uv20) = intersect(tri, &diffs, 2, 0);
            ClipResult::two(
                ClipTriangle::new([p01, v1, v2], [uv01, uv1, uv2]),
                ClipTriangle::new([v2, p20, p01], [uv2, uv20, uv01]),
            )
        }
        [false, true, false] => {
            let (p01, uv01) = intersect(tri, &diffs, 0, 1);
            let (p12, uv12) = intersect(tri, &diffs, 1, 2);
            ClipResult::one(ClipTriangle::new([p01, v1, p12], [uv01, uv1, uv12]))
        }
        [false, false, true] => {
            let (p12, uv12) = intersect(tri, &diffs, 1, 2);
            let (p20, uv20) = intersect(tri, &diffs, 2, 0);
            ClipResult::one(ClipTriangle::new([p12, v2, p20], [uv12, uv2, uv20]))
        }
        [false, false, false] => ClipResult::none(),
    }
}

/// A bounded work queue for clipping one triangle against all planes.
///
/// Entries before `front` have already been replaced by their clip results
/// and are never tested again. After [`ClipList::clip_against_frustum`], the
/// entries in `front..size` are the fully clipped triangles.
#[derive(Debug, Clone)]
pub struct ClipList {
    triangles: [ClipTriangle; MAX_CLIPPED_TRIANGLE_TRIANGLES],
    size: usize,
    front: usize,
}

impl ClipList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            triangles: [ClipTriangle::default(); MAX_CLIPPED_TRIANGLE_TRIANGLES],
            size: 0,
            front: 0,
        }
    }

    /// Empties the list and seeds it with a single triangle.
    #[inline]
    pub fn reset(&mut self, seed: ClipTriangle) {
        self.triangles[0] = seed;
        self.size = 1;
        self.front = 0;
    }

    fn push(&mut self, tri: ClipTriangle) {
        debug_assert!(self.size < MAX_CLIPPED_TRIANGLE_TRIANGLES, "clip list overflow");
        if let Some(slot) = self.triangles.get_mut(self.size) {
            *slot = tri;
            self.size += 1;
        } else {
            log::warn!("Clip list full, dropping a clipped triangle.");
        }
    }

    /// Clips every pending triangle against each plane in turn.
    pub fn clip_against_frustum(&mut self) {
        for plane in ClipPlane::ALL {
            let pending = self.size - self.front;
            for _ in 0..pending {
                let current = self.triangles[self.front];
                let result = clip_triangle(&current, plane);
                for tri in result.as_slice() {
                    self.push(*tri);
                }
                self.front += 1;
            }
        }
    }

    /// The triangles that have not been replaced by later clip results.
    #[inline]
    pub fn results(&self) -> &[ClipTriangle] {
        &self.triangles[self.front..self.size]
    }
}

impl Default for ClipList {
    fn default() -> Self {
        Self::new()
    }
}
