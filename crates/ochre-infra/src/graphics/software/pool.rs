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

//! Fixed-capacity slot storage behind every resource handle.

use ochre_core::renderer::ResourceError;

/// A slot allocator that recycles freed indices.
///
/// Handles are plain slot indices. A freed slot is handed out again by the
/// next allocation, so a handle kept after `free` may alias a newer resource.
#[derive(Debug, Clone)]
pub struct Pool<T> {
    name: &'static str,
    capacity: usize,
    slots: Vec<Option<T>>,
    freed_slots: Vec<usize>,
    live_count: usize,
}

impl<T> Pool<T> {
    /// Creates an empty pool that holds at most `capacity` live values.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            capacity,
            slots: Vec::new(),
            freed_slots: Vec::new(),
            live_count: 0,
        }
    }

    /// Stores `value` in a recycled or new slot and returns its index.
    pub fn try_alloc(&mut self, value: T) -> Result<usize, ResourceError> {
        if let Some(index) = self.freed_slots.pop() {
            self.slots[index] = Some(value);
            self.live_count += 1;
            return Ok(index);
        }

        if self.slots.len() >= self.capacity {
            return Err(ResourceError::PoolExhausted {
                pool: self.name,
                capacity: self.capacity,
            });
        }

        self.slots.push(Some(value));
        self.live_count += 1;
        Ok(self.slots.len() - 1)
    }

    /// The value in slot `index`, if it is live.
    pub fn get(&self, index: usize) -> Result<&T, ResourceError> {
        self.slots
            .get(index)
            .and_then(Option::as_ref)
            .ok_or(ResourceError::InvalidHandle)
    }

    /// Mutable access to the value in slot `index`, if it is live.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, ResourceError> {
        self.slots
            .get_mut(index)
            .and_then(Option::as_mut)
            .ok_or(ResourceError::InvalidHandle)
    }

    /// Empties slot `index` and returns its value.
    pub fn free(&mut self, index: usize) -> Result<T, ResourceError> {
        let value = self
            .slots
            .get_mut(index)
            .and_then(Option::take)
            .ok_or(ResourceError::InvalidHandle)?;
        self.freed_slots.push(index);
        self.live_count -= 1;
        Ok(value)
    }

    /// Number of live values.
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Whether the pool holds no live values.
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Iterates over live values.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Drops every value and forgets all slots.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.freed_slots.clear();
        self.live_count = 0;
    }
}
