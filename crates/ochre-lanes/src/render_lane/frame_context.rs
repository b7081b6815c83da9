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

//! Scratch state owned by one renderer and reused across frames.

use super::clip::{ClipList, ClipTriangle};

/// Counters accumulated over one submitted frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Draw calls in the submitted list.
    pub draw_call_count: usize,
    /// Triangles read from index buffers, before clipping.
    pub scene_triangle_count: usize,
    /// Triangles handed to the rasterizer, after clipping.
    pub vis_triangle_count: usize,
    /// Depth comparisons performed.
    pub depth_tests: usize,
    /// Pixels written to the color buffer.
    pub color_writes: usize,
}

/// Working memory for the geometry and raster lanes.
///
/// One context serves one frame at a time. It is reset at the start of
/// every frame, keeps its allocations, and must not be shared between two
/// frames in flight.
#[derive(Debug, Default)]
pub struct FrameContext {
    /// Queue used while clipping a single triangle.
    pub clip_list: ClipList,
    /// Clipped triangles of the draw call currently being processed.
    pub mesh_triangles: Vec<ClipTriangle>,
    /// Counters for the frame in progress.
    pub stats: FrameStats,
}

impl FrameContext {
    /// Creates a context with room for `triangle_capacity` clipped triangles per mesh.
    pub fn with_capacity(triangle_capacity: usize) -> Self {
        Self {
            clip_list: ClipList::new(),
            mesh_triangles: Vec::with_capacity(triangle_capacity),
            stats: FrameStats::default(),
        }
    }

    /// Clears all per-frame state.
    pub fn begin_frame(&mut self, draw_call_count: usize) {
        self.mesh_triangles.clear();
        self.stats = FrameStats {
            draw_call_count,
            ..FrameStats::default()
        };
    }
}
