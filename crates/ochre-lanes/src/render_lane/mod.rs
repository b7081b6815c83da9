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

//! Rendering lane - hot path of the software rasterizer.
//!
//! A draw call flows through the lanes in two steps:
//! [`process_mesh`] shades and clips its triangles into a [`FrameContext`],
//! then [`rasterize_triangles`] scan converts them into a [`FrameBufferView`].

mod clip;
mod dither;
mod error;
mod frame_buffer;
mod frame_context;
mod geometry_lane;
mod pixel_shader;
mod raster_lane;

pub use clip::*;
pub use dither::*;
pub use error::*;
pub use frame_buffer::*;
pub use frame_context::*;
pub use geometry_lane::*;
pub use pixel_shader::*;
pub use raster_lane::*;
