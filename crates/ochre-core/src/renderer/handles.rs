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

//! Opaque handles referencing entries in the renderer's resource pools.
//!
//! A handle is only meaningful to the backend that issued it. Using a handle
//! after it has been freed is a caller bug; backends report it as
//! [`ResourceError::InvalidHandle`](super::error::ResourceError::InvalidHandle)
//! when they can detect it.

use serde::{Deserialize, Serialize};

/// An opaque handle to a buffer of vertex positions (3 components per vertex).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexPositionBufferId(pub usize);

/// An opaque handle to a buffer of per-vertex attributes (e.g. texture coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexAttributeBufferId(pub usize);

/// An opaque handle to a buffer of triangle indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndexBufferId(pub usize);

/// An opaque handle to an object texture (paletted or true color).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectTextureId(pub usize);

/// An opaque handle to an element-indexed uniform buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UniformBufferId(pub usize);

/// An opaque handle to a point light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LightId(pub usize);
