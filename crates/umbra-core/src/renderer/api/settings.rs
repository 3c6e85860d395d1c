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

//! Runtime settings for the interaction path.

use super::enums::CompareFunction;
use super::state::PolygonOffset;
use serde::{Deserialize, Serialize};

/// Toggles and comparisons the interaction path reads every frame.
///
/// Every field has a default, so a settings file only needs the fields it changes:
///
/// ```
/// use umbra_core::renderer::api::InteractionSettings;
/// let settings = InteractionSettings::from_ron_str("(skip_translucent: true)").unwrap();
/// assert!(settings.skip_translucent);
/// assert!(settings.use_scissor);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Restrict stencil clears and shadow draws to the light and caster scissors.
    pub use_scissor: bool,
    /// Extrude shadow volumes with the shadow program instead of fixed function.
    pub use_shadow_vertex_program: bool,
    /// Skip the translucent sub-pass entirely.
    pub skip_translucent: bool,
    /// Depth comparison for the shadowed interaction sub-passes.
    pub interaction_depth_func: CompareFunction,
    /// Depth comparison for the translucent sub-pass.
    pub translucent_depth_func: CompareFunction,
    /// Use single-draw two-sided stencil when the context supports it.
    pub use_two_sided_stencil: bool,
    /// Restrict shadow volume fragments to the light's depth range when supported.
    pub use_depth_bounds_test: bool,
    /// Depth bias applied to shadow volumes, if any.
    pub shadow_polygon_offset: Option<PolygonOffset>,
    /// Replace bump maps with the flat normal map.
    pub skip_bump: bool,
    /// Replace diffuse maps with the black image.
    pub skip_diffuse: bool,
    /// Replace specular maps with the black image.
    pub skip_specular: bool,
    /// Draw no shadow volumes.
    pub skip_shadows: bool,
    /// Draw no lit interactions.
    pub skip_interactions: bool,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            use_scissor: true,
            use_shadow_vertex_program: true,
            skip_translucent: false,
            interaction_depth_func: CompareFunction::Less,
            translucent_depth_func: CompareFunction::Equal,
            use_two_sided_stencil: true,
            use_depth_bounds_test: false,
            shadow_polygon_offset: None,
            skip_bump: false,
            skip_diffuse: false,
            skip_specular: false,
            skip_shadows: false,
            skip_interactions: false,
        }
    }
}

impl InteractionSettings {
    /// Parses settings from RON text.
    pub fn from_ron_str(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }
}
