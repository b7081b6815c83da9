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

//! Errors raised while reading a draw call's geometry.

use thiserror::Error;

/// A draw call references data its buffers do not contain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// An index points past the end of the position buffer.
    #[error("vertex index {index} is out of range for {vertex_count} positions")]
    PositionOutOfRange {
        /// The offending index.
        index: u32,
        /// Number of whole vertices in the position buffer.
        vertex_count: usize,
    },
    /// An index points past the end of the texture coordinate buffer.
    #[error("vertex index {index} is out of range for {uv_count} texture coordinates")]
    TexCoordOutOfRange {
        /// The offending index.
        index: u32,
        /// Number of whole UV pairs in the attribute buffer.
        uv_count: usize,
    },
    /// The index count is not a multiple of three.
    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
    /// A buffer holds fewer components per vertex than the geometry lane reads.
    #[error("{buffer} buffer has {components} components per vertex, needs at least {required}")]
    TooFewComponents {
        /// Which buffer is too narrow.
        buffer: &'static str,
        /// Components per vertex stored in the buffer.
        components: usize,
        /// Components per vertex the lane reads.
        required: usize,
    },
}
