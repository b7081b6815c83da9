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

//! Host-memory storage for the renderer's resources.

use ochre_core::renderer::{ResourceError, TexelFormat, TextureBuilder};

fn check_len(expected: usize, actual: usize) -> Result<(), ResourceError> {
    if expected == actual {
        Ok(())
    } else {
        Err(ResourceError::SizeMismatch { expected, actual })
    }
}

// --- Geometry ---

/// Flat `f64` vertex data, `vertex_count * components_per_vertex` long.
///
/// Backs both vertex position and vertex attribute handles.
#[derive(Debug, Clone)]
pub struct VertexBuffer {
    values: Vec<f64>,
    components_per_vertex: usize,
}

impl VertexBuffer {
    /// Allocates a zeroed buffer.
    pub fn new(vertex_count: usize, components_per_vertex: usize) -> Result<Self, ResourceError> {
        if vertex_count == 0 || components_per_vertex < 2 {
            return Err(ResourceError::InvalidDimensions(format!(
                "{vertex_count} vertices with {components_per_vertex} components"
            )));
        }
        Ok(Self {
            values: vec![0.0; vertex_count * components_per_vertex],
            components_per_vertex,
        })
    }

    /// Replaces the whole contents. The length must match exactly.
    pub fn populate(&mut self, values: &[f64]) -> Result<(), ResourceError> {
        check_len(self.values.len(), values.len())?;
        self.values.copy_from_slice(values);
        Ok(())
    }

    /// The flat values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of components each vertex holds.
    pub fn components_per_vertex(&self) -> usize {
        self.components_per_vertex
    }
}

/// Triangle indices; the count is a positive multiple of three.
#[derive(Debug, Clone)]
pub struct IndexBuffer {
    indices: Vec<u32>,
}

impl IndexBuffer {
    /// Allocates a zeroed index buffer.
    pub fn new(index_count: usize) -> Result<Self, ResourceError> {
        if index_count == 0 || index_count % 3 != 0 {
            return Err(ResourceError::InvalidDimensions(format!(
                "{index_count} indices is not a whole number of triangles"
            )));
        }
        Ok(Self {
            indices: vec![0; index_count],
        })
    }

    /// Replaces the whole contents. The length must match exactly.
    pub fn populate(&mut self, indices: &[u32]) -> Result<(), ResourceError> {
        check_len(self.indices.len(), indices.len())?;
        self.indices.copy_from_slice(indices);
        Ok(())
    }

    /// The indices.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }
}

// --- Textures ---

/// A texture whose texels are either palette indices or packed colors.
#[derive(Debug, Clone)]
pub struct ObjectTexture {
    // Word storage keeps 32-bit views aligned; 8-bit textures use a byte view of it.
    storage: Vec<u32>,
    width: usize,
    height: usize,
    format: TexelFormat,
}

impl ObjectTexture {
    /// Allocates a texture with every texel zeroed.
    pub fn new(width: usize, height: usize, format: TexelFormat) -> Result<Self, ResourceError> {
        if width == 0 || height == 0 {
            return Err(ResourceError::InvalidDimensions(format!(
                "{width}x{height} texture"
            )));
        }
        let byte_count = width * height * format.bytes_per_texel();
        Ok(Self {
            storage: vec![0; byte_count.div_ceil(4)],
            width,
            height,
            format,
        })
    }

    /// Allocates a texture and copies the builder's texels into it.
    pub fn from_builder(builder: &TextureBuilder) -> Result<Self, ResourceError> {
        let mut texture = Self::new(builder.width(), builder.height(), builder.format())?;
        let src = builder.texel_bytes();
        check_len(texture.byte_count(), src.len())?;
        texture.texel_bytes_mut().copy_from_slice(src);
        Ok(texture)
    }

    /// Width in texels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in texels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Texel format.
    pub fn format(&self) -> TexelFormat {
        self.format
    }

    /// Number of texels.
    pub fn texel_count(&self) -> usize {
        self.width * self.height
    }

    /// Size of the texel data in bytes.
    pub fn byte_count(&self) -> usize {
        self.texel_count() * self.format.bytes_per_texel()
    }

    /// All texel bytes, whatever the format.
    pub fn texel_bytes_mut(&mut self) -> &mut [u8] {
        let byte_count = self.byte_count();
        &mut bytemuck::cast_slice_mut::<u32, u8>(&mut self.storage)[..byte_count]
    }

    /// Palette-index texels, or `None` for a true-color texture.
    pub fn texels_8bit(&self) -> Option<&[u8]> {
        match self.format {
            TexelFormat::Paletted8 => {
                Some(&bytemuck::cast_slice::<u32, u8>(&self.storage)[..self.texel_count()])
            }
            TexelFormat::TrueColor32 => None,
        }
    }

    /// Packed color texels, or `None` for a paletted texture.
    pub fn texels_32bit(&self) -> Option<&[u32]> {
        match self.format {
            TexelFormat::TrueColor32 => Some(&self.storage[..self.texel_count()]),
            TexelFormat::Paletted8 => None,
        }
    }
}

// --- Uniforms ---

/// An array of fixed-size elements stored as bytes.
///
/// Elements are laid out `stride` bytes apart, the element size rounded up to
/// its alignment.
#[derive(Debug, Clone)]
pub struct UniformBuffer {
    bytes: Vec<u8>,
    element_count: usize,
    size_of_element: usize,
    stride: usize,
}

impl UniformBuffer {
    /// Allocates zeroed storage for `element_count` elements.
    pub fn new(
        element_count: usize,
        size_of_element: usize,
        alignment_of_element: usize,
    ) -> Result<Self, ResourceError> {
        if size_of_element == 0 || !alignment_of_element.is_power_of_two() {
            return Err(ResourceError::InvalidDimensions(format!(
                "uniform of {size_of_element} bytes aligned to {alignment_of_element}"
            )));
        }
        let stride = size_of_element.next_multiple_of(alignment_of_element);
        Ok(Self {
            bytes: vec![0; element_count * stride],
            element_count,
            size_of_element,
            stride,
        })
    }

    /// Number of elements.
    pub fn element_count(&self) -> usize {
        self.element_count
    }

    /// Number of bytes a full populate must supply.
    pub fn valid_byte_count(&self) -> usize {
        self.bytes.len()
    }

    /// Replaces every element at once.
    pub fn populate(&mut self, bytes: &[u8]) -> Result<(), ResourceError> {
        check_len(self.valid_byte_count(), bytes.len())?;
        self.bytes.copy_from_slice(bytes);
        Ok(())
    }

    fn element_range(&self, index: usize) -> Result<std::ops::Range<usize>, ResourceError> {
        if index >= self.element_count {
            return Err(ResourceError::OutOfBounds {
                index,
                len: self.element_count,
            });
        }
        let start = index * self.stride;
        Ok(start..start + self.size_of_element)
    }

    /// Replaces one element. `bytes` must be exactly one element long.
    pub fn populate_at_index(&mut self, index: usize, bytes: &[u8]) -> Result<(), ResourceError> {
        check_len(self.size_of_element, bytes.len())?;
        let range = self.element_range(index)?;
        self.bytes[range].copy_from_slice(bytes);
        Ok(())
    }

    /// Reads element `index` as a `T`, which must be the element's size.
    pub fn get<T: bytemuck::Pod>(&self, index: usize) -> Result<T, ResourceError> {
        check_len(self.size_of_element, std::mem::size_of::<T>())?;
        let range = self.element_range(index)?;
        Ok(bytemuck::pod_read_unaligned(&self.bytes[range]))
    }
}
