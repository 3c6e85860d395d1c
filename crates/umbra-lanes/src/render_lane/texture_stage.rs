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

//! Tracks the active texture unit and binds images to the interaction roles.

use umbra_core::renderer::{
    api::{ImageId, TextureRole, INTERACTION_TEXTURE_UNITS},
    GraphicsContext, ImageBinder,
};

/// The active texture unit cursor.
///
/// Selecting the unit that is already active issues nothing. The cursor starts at
/// [`TextureStageBinder::UNKNOWN_UNIT`] so the first selection always reaches the
/// context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureStageBinder {
    current: i32,
}

impl Default for TextureStageBinder {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureStageBinder {
    /// Sentinel meaning the active unit is not known.
    pub const UNKNOWN_UNIT: i32 = -1;

    /// Creates a binder with an unknown active unit.
    pub fn new() -> Self {
        Self {
            current: Self::UNKNOWN_UNIT,
        }
    }

    /// The unit last selected, or [`Self::UNKNOWN_UNIT`].
    pub fn current_unit(&self) -> i32 {
        self.current
    }

    /// Forgets the active unit so the next selection is always issued.
    pub fn invalidate(&mut self) {
        self.current = Self::UNKNOWN_UNIT;
    }

    /// Switches the active unit without touching client array state.
    pub fn select_unit(&mut self, gpu: &mut dyn GraphicsContext, unit: u32) {
        if self.current == unit as i32 {
            return;
        }
        gpu.active_texture(unit);
        self.current = unit as i32;
    }

    /// Selects the role's unit and binds `image` to it.
    pub fn bind_role(
        &mut self,
        gpu: &mut dyn GraphicsContext,
        images: &mut dyn ImageBinder,
        role: TextureRole,
        image: ImageId,
    ) {
        let unit = role.unit();
        self.select_unit(gpu, unit);
        images.bind(image, unit);
    }

    /// Unbinds every role unit from the highest down, then leaves unit 0 active.
    pub fn unbind_all(&mut self, gpu: &mut dyn GraphicsContext, images: &mut dyn ImageBinder) {
        for unit in (0..INTERACTION_TEXTURE_UNITS).rev() {
            self.select_unit(gpu, unit);
            images.bind_null(unit);
        }
        self.invalidate();
        self.select_unit(gpu, 0);
    }
}
