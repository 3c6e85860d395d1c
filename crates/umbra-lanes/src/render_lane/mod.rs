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

//! Rendering lanes - hot path for the per-light interaction passes.
//!
//! A lane issues commands against the collaborators bundled in a [`PassContext`].
//! The context also carries the state that persists across lanes within one frame:
//! the texture stage cursor, the current scissor and space, and the statistics.

use umbra_core::renderer::{
    api::{GlobalImages, InteractionSettings, InteractionStats, ScissorRect, SpaceId},
    GraphicsContext, ImageBinder, VertexCache,
};

mod interaction_lane;
mod program_registry;
mod shadow_volume_lane;
pub mod shaders;
mod sub_draw;
mod texture_stage;
mod uniforms;

pub use interaction_lane::*;
pub use program_registry::*;
pub use shadow_volume_lane::*;
pub use sub_draw::*;
pub use texture_stage::*;
pub use uniforms::*;

/// The collaborators and frame-scoped state a lane draws with.
pub struct PassContext<'a> {
    /// The graphics context every command goes to.
    pub gpu: &'a mut dyn GraphicsContext,
    /// Binds images to texture units.
    pub images: &'a mut dyn ImageBinder,
    /// Resolves geometry handles.
    pub vertex_cache: &'a dyn VertexCache,
    /// Runtime toggles.
    pub settings: &'a InteractionSettings,
    /// Well-known fallback images.
    pub global_images: &'a GlobalImages,
    /// The active texture unit cursor.
    pub stages: &'a mut TextureStageBinder,
    /// Counters for the frame.
    pub stats: &'a mut InteractionStats,
    /// The scissor rectangle last applied, relative to the viewport.
    pub current_scissor: ScissorRect,
    /// The space whose model-view matrix is currently loaded.
    pub current_space: Option<SpaceId>,
}

impl<'a> PassContext<'a> {
    /// Creates a context with no scissor or space recorded.
    pub fn new(
        gpu: &'a mut dyn GraphicsContext,
        images: &'a mut dyn ImageBinder,
        vertex_cache: &'a dyn VertexCache,
        settings: &'a InteractionSettings,
        global_images: &'a GlobalImages,
        stages: &'a mut TextureStageBinder,
        stats: &'a mut InteractionStats,
    ) -> Self {
        Self {
            gpu,
            images,
            vertex_cache,
            settings,
            global_images,
            stages,
            stats,
            current_scissor: ScissorRect::default(),
            current_space: None,
        }
    }

    /// Selects `unit` through the stage binder.
    pub fn select_unit(&mut self, unit: u32) {
        self.stages.select_unit(&mut *self.gpu, unit);
    }
}

#[cfg(test)]
pub(crate) mod test_support;
