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

//! State descriptors handed to the graphics context.

use super::enums::*;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Which color channels a draw may write.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorWrites: u8 {
        /// The red channel.
        const RED = 1 << 0;
        /// The green channel.
        const GREEN = 1 << 1;
        /// The blue channel.
        const BLUE = 1 << 2;
        /// The alpha channel.
        const ALPHA = 1 << 3;
        /// All color channels.
        const ALL = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits() | Self::ALPHA.bits();
    }
}

/// A source/destination blend factor pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendState {
    /// Factor applied to the incoming fragment.
    pub src: BlendFactor,
    /// Factor applied to the value already in the framebuffer.
    pub dst: BlendFactor,
}

impl BlendState {
    /// `(one, one)`: light contributions accumulate.
    pub const ADDITIVE: Self = Self {
        src: BlendFactor::One,
        dst: BlendFactor::One,
    };
}

/// The color/depth state a pass sets before issuing its draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawState {
    /// Blend factors, or `None` to disable blending.
    pub blend: Option<BlendState>,
    /// If `true`, depth values will be written to the depth buffer.
    pub depth_write: bool,
    /// Color channels that may be written.
    pub color_writes: ColorWrites,
    /// The comparison function used for the depth test.
    pub depth_func: CompareFunction,
}

impl DrawState {
    /// State for lit interaction draws: additive blend over the laid-down depth, which is
    /// masked against writes, with the given depth test.
    pub fn interaction(depth_func: CompareFunction) -> Self {
        Self {
            blend: Some(BlendState::ADDITIVE),
            depth_write: false,
            color_writes: ColorWrites::ALL,
            depth_func,
        }
    }

    /// State for shadow volume draws: color and depth writes off, depth less.
    pub fn shadow_volume() -> Self {
        Self {
            blend: None,
            depth_write: false,
            color_writes: ColorWrites::empty(),
            depth_func: CompareFunction::Less,
        }
    }
}

/// A stencil test: compare `(reference & mask)` against `(stored & mask)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilFunc {
    /// The comparison function.
    pub compare: CompareFunction,
    /// The reference value.
    pub reference: u8,
    /// The read mask.
    pub mask: u8,
}

impl StencilFunc {
    /// Creates a new stencil test.
    pub const fn new(compare: CompareFunction, reference: u8, mask: u8) -> Self {
        Self {
            compare,
            reference,
            mask,
        }
    }

    /// Always passes; used while the light has no shadows and for translucent surfaces.
    pub const UNSHADOWED: Self = Self::new(CompareFunction::Always, 128, 255);
    /// Always passes with reference 1; set while shadow volumes are drawn.
    pub const SHADOW_VOLUME: Self = Self::new(CompareFunction::Always, 1, 255);
    /// Passes only where the stored count is at or below 128, the lit region.
    pub const LIT_ONLY: Self = Self::new(CompareFunction::GreaterEqual, 128, 255);
}

/// The operations to perform on the stencil buffer for one face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct StencilOps {
    /// The operation to perform if the stencil test fails.
    pub fail: StencilOperation,
    /// The operation to perform if the stencil test passes but the depth test fails.
    pub depth_fail: StencilOperation,
    /// The operation to perform if both the stencil and depth tests pass.
    pub depth_pass: StencilOperation,
}

impl StencilOps {
    /// Keep the stored value in every case.
    pub const KEEP: Self = Self {
        fail: StencilOperation::Keep,
        depth_fail: StencilOperation::Keep,
        depth_pass: StencilOperation::Keep,
    };

    /// Applies `op` only when the depth test fails.
    pub const fn on_depth_fail(op: StencilOperation) -> Self {
        Self {
            fail: StencilOperation::Keep,
            depth_fail: op,
            depth_pass: StencilOperation::Keep,
        }
    }

    /// Applies `op` whenever the stencil test passes, whatever the depth result.
    pub const fn on_stencil_pass(op: StencilOperation) -> Self {
        Self {
            fail: StencilOperation::Keep,
            depth_fail: op,
            depth_pass: op,
        }
    }

    /// Applies `op` only when both tests pass.
    pub const fn on_depth_pass(op: StencilOperation) -> Self {
        Self {
            fail: StencilOperation::Keep,
            depth_fail: StencilOperation::Keep,
            depth_pass: op,
        }
    }
}

/// A screen-space rectangle in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScissorRect {
    /// Left edge.
    pub x: i32,
    /// Bottom edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ScissorRect {
    /// Creates a new rectangle.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns this rectangle translated by the viewport origin.
    pub fn offset_by(&self, viewport: &ScissorRect) -> Self {
        Self {
            x: self.x + viewport.x,
            y: self.y + viewport.y,
            ..*self
        }
    }
}

/// Slope-scaled depth bias applied to shadow volumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolygonOffset {
    /// Scales with the polygon's depth slope.
    pub factor: f32,
    /// Constant bias in depth-buffer units.
    pub units: f32,
}

/// A depth range outside of which fragments are discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthBounds {
    /// Near bound, in window depth.
    pub min: f32,
    /// Far bound, in window depth.
    pub max: f32,
}

impl Default for DepthBounds {
    /// The full depth range.
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}
