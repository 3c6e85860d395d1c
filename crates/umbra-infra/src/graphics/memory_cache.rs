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

//! A vertex cache that keeps uploaded geometry in host memory.

use bytemuck::Pod;
use std::collections::HashMap;
use umbra_core::renderer::api::{BufferBinding, BufferId, VertexCacheHandle};
use umbra_core::renderer::VertexCache;

#[derive(Debug)]
struct CacheEntry {
    buffer: BufferId,
    bytes: Vec<u8>,
}

/// Stores each upload in its own buffer and hands out a handle to it.
///
/// Evicted handles stop resolving; handles are never reused.
#[derive(Debug, Default)]
pub struct MemoryVertexCache {
    entries: HashMap<VertexCacheHandle, CacheEntry>,
    next_handle: u32,
    used_bytes: usize,
}

impl MemoryVertexCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies `data` into the cache.
    pub fn upload<T: Pod>(&mut self, data: &[T]) -> VertexCacheHandle {
        self.next_handle += 1;
        let handle = VertexCacheHandle(self.next_handle);
        let bytes = bytemuck::cast_slice::<T, u8>(data).to_vec();
        self.used_bytes += bytes.len();
        log::debug!(
            "MemoryVertexCache: uploaded {} bytes as {:?}",
            bytes.len(),
            handle
        );
        self.entries.insert(
            handle,
            CacheEntry {
                buffer: BufferId(handle.0),
                bytes,
            },
        );
        handle
    }

    /// Copies a 32-bit index list into the cache.
    pub fn upload_indexes(&mut self, indexes: &[u32]) -> VertexCacheHandle {
        self.upload(indexes)
    }

    /// The raw bytes behind `handle`.
    pub fn bytes(&self, handle: VertexCacheHandle) -> Option<&[u8]> {
        self.entries.get(&handle).map(|e| e.bytes.as_slice())
    }

    /// Reads the contents back as `T`, or `None` if the handle is gone or the size
    /// does not divide into whole `T`s.
    pub fn read<T: Pod>(&self, handle: VertexCacheHandle) -> Option<Vec<T>> {
        let bytes = self.bytes(handle)?;
        if bytes.len() % std::mem::size_of::<T>() != 0 {
            return None;
        }
        Some(bytemuck::pod_collect_to_vec(bytes))
    }

    /// Drops the data behind `handle`. Returns `false` if it was not resident.
    pub fn evict(&mut self, handle: VertexCacheHandle) -> bool {
        match self.entries.remove(&handle) {
            Some(entry) => {
                self.used_bytes -= entry.bytes.len();
                true
            }
            None => false,
        }
    }

    /// Total bytes currently resident.
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }
}

impl VertexCache for MemoryVertexCache {
    fn resolve(&self, handle: VertexCacheHandle) -> Option<BufferBinding> {
        self.entries.get(&handle).map(|e| BufferBinding {
            buffer: e.buffer,
            offset: 0,
        })
    }
}
