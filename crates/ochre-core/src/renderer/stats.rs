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

//! Per-frame diagnostics reported by a render backend.

/// Counters describing the most recently submitted frame.
///
/// Only meant for on-screen diagnostics; nothing here is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfilerData {
    /// Frame buffer width in pixels.
    pub width: usize,
    /// Frame buffer height in pixels.
    pub height: usize,
    /// Worker threads used for rasterization. Always 1.
    pub thread_count: usize,
    /// Draw calls in the last submitted list.
    pub draw_call_count: usize,
    /// Triangles referenced by those draw calls before clipping.
    pub scene_triangle_count: usize,
    /// Triangles that survived clipping.
    pub vis_triangle_count: usize,
    /// Live object textures.
    pub texture_count: usize,
    /// Bytes of texel storage held by those textures.
    pub texture_byte_count: usize,
    /// Live lights.
    pub total_light_count: usize,
    /// Depth comparisons performed.
    pub total_depth_tests: usize,
    /// Pixels written to the color buffer.
    pub total_color_writes: usize,
}
