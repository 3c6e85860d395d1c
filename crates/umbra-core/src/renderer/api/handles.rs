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

//! Opaque handles for GPU objects and for entries of the per-frame arena.

/// An opaque handle representing a linked GPU program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramId(pub u32);

/// An opaque handle representing a compiled shader stage object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderObjectId(pub u32);

/// An opaque handle representing a GPU buffer owned by the vertex cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u32);

/// An opaque handle representing an image managed by the asset system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub u32);

/// An opaque handle the vertex cache hands out for an uploaded block of data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexCacheHandle(pub u32);

/// A buffer plus a byte offset, the result of resolving a [`VertexCacheHandle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferBinding {
    /// The buffer holding the data.
    pub buffer: BufferId,
    /// Byte offset of the block inside `buffer`.
    pub offset: usize,
}

/// The location of a uniform inside a linked program.
///
/// Follows GL semantics: `-1` means the uniform is absent (optimized out or never
/// declared), and writes to it are silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

impl UniformLocation {
    /// The location reported for a uniform the program does not contain.
    pub const ABSENT: Self = Self(-1);

    /// Returns `true` if the uniform exists in the program.
    #[inline]
    pub fn is_present(&self) -> bool {
        self.0 >= 0
    }
}

impl Default for UniformLocation {
    fn default() -> Self {
        Self::ABSENT
    }
}

/// Index of a [`DrawSurface`](super::DrawSurface) in the frame arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub usize);

/// Index of a [`ViewEntity`](super::ViewEntity) in the frame arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpaceId(pub usize);

/// Index of a [`SurfaceMaterial`](super::SurfaceMaterial) in the frame arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub usize);

/// Index of a [`LightMaterial`](super::LightMaterial) in the frame arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LightMaterialId(pub usize);
