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

//! Defines the hierarchy of error types for the rendering subsystem.

use std::fmt;

/// An error related to the creation, population or lookup of a pooled resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// The pool for this kind of resource has no free slots left.
    PoolExhausted {
        /// A human readable name of the pool (e.g. "vertex position buffer").
        pool: &'static str,
        /// The configured capacity of the pool.
        capacity: usize,
    },
    /// A width, height or element count was zero or otherwise unusable.
    InvalidDimensions(String),
    /// The incoming data does not exactly match the allocated size.
    SizeMismatch {
        /// The number of elements the resource was allocated with.
        expected: usize,
        /// The number of elements that were provided.
        actual: usize,
    },
    /// The handle does not reference a live resource.
    InvalidHandle,
    /// An element index lies outside the resource.
    OutOfBounds {
        /// The offending index.
        index: usize,
        /// The number of addressable elements.
        len: usize,
    },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::PoolExhausted { pool, capacity } => {
                write!(f, "The {pool} pool is exhausted (capacity {capacity}).")
            }
            ResourceError::InvalidDimensions(msg) => write!(f, "Invalid dimensions: {msg}"),
            ResourceError::SizeMismatch { expected, actual } => {
                write!(f, "Size mismatch: expected {expected} elements, got {actual}.")
            }
            ResourceError::InvalidHandle => write!(f, "Invalid resource handle or ID."),
            ResourceError::OutOfBounds { index, len } => {
                write!(f, "Resource access out of bounds: index {index}, length {len}.")
            }
        }
    }
}

impl std::error::Error for ResourceError {}

/// A high-level error that can occur within the rendering system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A frame or resize was requested before the renderer was initialized.
    NotInitialized,
    /// The frame settings reference textures that cannot serve their role.
    InvalidFrameSettings(String),
    /// An error related to a resource.
    Resource(ResourceError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::NotInitialized => write!(f, "The renderer has not been initialized."),
            RenderError::InvalidFrameSettings(msg) => write!(f, "Invalid frame settings: {msg}"),
            RenderError::Resource(e) => write!(f, "Resource error: {e}"),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Resource(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::Resource(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_error_display() {
        let err = ResourceError::SizeMismatch {
            expected: 9,
            actual: 6,
        };
        assert_eq!(err.to_string(), "Size mismatch: expected 9 elements, got 6.");
    }

    #[test]
    fn test_render_error_wraps_resource_error() {
        let err: RenderError = ResourceError::InvalidHandle.into();
        assert_eq!(err, RenderError::Resource(ResourceError::InvalidHandle));
        assert!(std::error::Error::source(&err).is_some());
    }
}
