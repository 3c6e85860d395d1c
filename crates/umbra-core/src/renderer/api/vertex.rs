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

//! Vertex layouts stored in the vertex cache and the attribute slots they feed.

use crate::math::{Vec3, Vec4};
use std::mem::{offset_of, size_of};

/// Generic attribute slot carrying the texture coordinate.
pub const ATTR_TEXCOORD: u32 = 8;
/// Generic attribute slot carrying the first tangent.
pub const ATTR_TANGENT: u32 = 9;
/// Generic attribute slot carrying the second tangent (bitangent).
pub const ATTR_BITANGENT: u32 = 10;
/// Generic attribute slot carrying the normal.
pub const ATTR_NORMAL: u32 = 11;

/// Every generic attribute slot the interaction program reads, with its GLSL name.
pub const INTERACTION_ATTRIBUTES: [(u32, &str); 4] = [
    (ATTR_TEXCOORD, "attr_TexCoord"),
    (ATTR_TANGENT, "attr_Tangent"),
    (ATTR_BITANGENT, "attr_Bitangent"),
    (ATTR_NORMAL, "attr_Normal"),
];

/// The interleaved vertex used for lit surfaces.
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct DrawVert {
    /// Object-space position.
    pub xyz: Vec3,
    /// Texture coordinate.
    pub st: [f32; 2],
    /// Object-space normal.
    pub normal: Vec3,
    /// Tangent (`[0]`) and bitangent (`[1]`).
    pub tangents: [Vec3; 2],
    /// Vertex color, one byte per channel.
    pub color: [u8; 4],
}

/// The homogeneous vertex used by extruded shadow volumes.
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct ShadowVert {
    /// Position; `w = 0` marks a vertex projected to infinity.
    pub xyzw: Vec4,
}

/// The scalar type of a vertex array component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// 32-bit float.
    Float32,
    /// Unsigned byte, normalized to `[0, 1]`.
    Unorm8,
}

/// Where one vertex array lives inside a resolved buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexPointer {
    /// Number of components per vertex (1 to 4).
    pub components: u32,
    /// The component type.
    pub component_type: ComponentType,
    /// Byte distance between consecutive vertices.
    pub stride: usize,
    /// Byte offset of the first component, relative to the buffer binding.
    pub offset: usize,
}

impl VertexPointer {
    const fn float(components: u32, stride: usize, offset: usize) -> Self {
        Self {
            components,
            component_type: ComponentType::Float32,
            stride,
            offset,
        }
    }
}

impl DrawVert {
    /// Size in bytes of one vertex.
    pub const STRIDE: usize = size_of::<DrawVert>();

    /// The fixed-function position array.
    pub const fn position_pointer() -> VertexPointer {
        VertexPointer::float(3, Self::STRIDE, offset_of!(DrawVert, xyz))
    }

    /// The fixed-function color array.
    pub const fn color_pointer() -> VertexPointer {
        VertexPointer {
            components: 4,
            component_type: ComponentType::Unorm8,
            stride: Self::STRIDE,
            offset: offset_of!(DrawVert, color),
        }
    }

    /// The generic attribute array for `slot`, or `None` if the slot is not one the
    /// interaction program reads.
    pub const fn attribute_pointer(slot: u32) -> Option<VertexPointer> {
        let tangent_size = size_of::<Vec3>();
        match slot {
            ATTR_TEXCOORD => Some(VertexPointer::float(
                2,
                Self::STRIDE,
                offset_of!(DrawVert, st),
            )),
            ATTR_TANGENT => Some(VertexPointer::float(
                3,
                Self::STRIDE,
                offset_of!(DrawVert, tangents),
            )),
            ATTR_BITANGENT => Some(VertexPointer::float(
                3,
                Self::STRIDE,
                offset_of!(DrawVert, tangents) + tangent_size,
            )),
            ATTR_NORMAL => Some(VertexPointer::float(
                3,
                Self::STRIDE,
                offset_of!(DrawVert, normal),
            )),
            _ => None,
        }
    }
}

impl ShadowVert {
    /// Size in bytes of one vertex.
    pub const STRIDE: usize = size_of::<ShadowVert>();

    /// The fixed-function position array; shadow vertices carry four components.
    pub const fn position_pointer() -> VertexPointer {
        VertexPointer::float(4, Self::STRIDE, offset_of!(ShadowVert, xyzw))
    }
}
