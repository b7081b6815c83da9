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

//! Frame buffer storage and the borrowed view the rasterizer writes through.

/// The palette-index and depth buffers that persist between frames.
///
/// Only resized on init and window resize events.
#[derive(Debug, Clone, Default)]
pub struct FrameBuffers {
    width: usize,
    height: usize,
    palette_indices: Vec<u8>,
    depth: Vec<f64>,
}

impl FrameBuffers {
    /// Allocates cleared buffers.
    pub fn new(width: usize, height: usize) -> Self {
        let mut buffers = Self::default();
        buffers.resize(width, height);
        buffers
    }

    /// Reallocates and clears both buffers.
    pub fn resize(&mut self, width: usize, height: usize) {
        let pixel_count = width * height;
        self.width = width;
        self.height = height;
        self.palette_indices.clear();
        self.palette_indices.resize(pixel_count, 0);
        self.depth.clear();
        self.depth.resize(pixel_count, f64::INFINITY);
    }

    /// Frees both buffers.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// The palette indices written by the last frame.
    pub fn palette_indices(&self) -> &[u8] {
        &self.palette_indices
    }

    /// The depth values written by the last frame.
    pub fn depth(&self) -> &[f64] {
        &self.depth
    }

    /// Borrows the buffers together with a caller-owned color buffer.
    ///
    /// Returns `None` if `colors` does not hold exactly one value per pixel.
    pub fn view<'a>(&'a mut self, colors: &'a mut [u32]) -> Option<FrameBufferView<'a>> {
        if colors.len() != self.pixel_count() {
            return None;
        }
        Some(FrameBufferView {
            palette_indices: &mut self.palette_indices,
            depth: &mut self.depth,
            colors,
            width: self.width,
            height: self.height,
        })
    }
}

/// A view into the palette-index, depth and color buffers of one frame.
///
/// All three slices hold `width * height` values in row-major order.
#[derive(Debug)]
pub struct FrameBufferView<'a> {
    /// 8-bit palette indices, read back by some pixel shaders.
    pub palette_indices: &'a mut [u8],
    /// NDC depth; smaller is closer.
    pub depth: &'a mut [f64],
    /// Final packed colors.
    pub colors: &'a mut [u32],
    width: usize,
    height: usize,
}

impl FrameBufferView<'_> {
    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Resets indices to 0, depth to +infinity and colors to 0.
    pub fn clear(&mut self) {
        self.palette_indices.fill(0);
        self.depth.fill(f64::INFINITY);
        self.colors.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_requires_matching_color_buffer() {
        let mut buffers = FrameBuffers::new(4, 3);
        let mut too_small = vec![0u32; 11];
        assert!(buffers.view(&mut too_small).is_none());

        let mut colors = vec![0u32; 12];
        let view = buffers.view(&mut colors).unwrap();
        assert_eq!((view.width(), view.height()), (4, 3));
    }

    #[test]
    fn test_clear_resets_all_buffers() {
        let mut buffers = FrameBuffers::new(2, 2);
        let mut colors = vec![7u32; 4];
        {
            let mut view = buffers.view(&mut colors).unwrap();
            view.palette_indices[1] = 9;
            view.depth[2] = 0.5;
            view.clear();
        }
        assert!(buffers.palette_indices().iter().all(|&i| i == 0));
        assert!(buffers.depth().iter().all(|d| d.is_infinite()));
        assert!(colors.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_resize_reallocates() {
        let mut buffers = FrameBuffers::new(2, 2);
        buffers.resize(8, 5);
        assert_eq!(buffers.pixel_count(), 40);
        assert_eq!(buffers.depth().len(), 40);
    }
}
