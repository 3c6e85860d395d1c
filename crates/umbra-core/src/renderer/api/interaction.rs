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

//! The per-draw parameter block of a lit interaction and the texture roles it binds.

use super::handles::{ImageId, SurfaceId};
use crate::math::{Mat4, Vec4};
use serde::{Deserialize, Serialize};

/// How the per-vertex color participates in the lighting result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexColorMode {
    /// The vertex color is not used.
    #[default]
    Ignore,
    /// The result is multiplied by the vertex color.
    Modulate,
    /// The result is multiplied by one minus the vertex color.
    InverseModulate,
}

impl VertexColorMode {
    /// Returns the `(u_colorModulate, u_colorAdd)` pair the fragment program combines as
    /// `color * modulate + add`.
    pub const fn combine_pair(self) -> (Vec4, Vec4) {
        const ZERO: Vec4 = Vec4::new(0.0, 0.0, 0.0, 0.0);
        const ONE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
        const NEG_ONE: Vec4 = Vec4::new(-1.0, -1.0, -1.0, -1.0);
        match self {
            VertexColorMode::Ignore => (ZERO, ONE),
            VertexColorMode::Modulate => (ONE, ZERO),
            VertexColorMode::InverseModulate => (NEG_ONE, ONE),
        }
    }
}

/// A texture role of the interaction program, each pinned to one texture unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureRole {
    /// Per-surface normal map.
    Bump,
    /// Light falloff (attenuation along the light's Z).
    LightFalloff,
    /// Light projection (the light's shape).
    LightProjection,
    /// Per-surface diffuse map.
    Diffuse,
    /// Per-surface specular map.
    Specular,
    /// Specular exponent lookup table.
    SpecularTable,
}

impl TextureRole {
    /// All roles, ordered by unit.
    pub const ALL: [TextureRole; 6] = [
        TextureRole::Bump,
        TextureRole::LightFalloff,
        TextureRole::LightProjection,
        TextureRole::Diffuse,
        TextureRole::Specular,
        TextureRole::SpecularTable,
    ];

    /// The texture unit this role is bound to.
    pub const fn unit(self) -> u32 {
        match self {
            TextureRole::Bump => 0,
            TextureRole::LightFalloff => 1,
            TextureRole::LightProjection => 2,
            TextureRole::Diffuse => 3,
            TextureRole::Specular => 4,
            TextureRole::SpecularTable => 5,
        }
    }

    /// The GLSL sampler uniform for this role.
    pub const fn sampler_name(self) -> &'static str {
        match self {
            TextureRole::Bump => "u_bumpTexture",
            TextureRole::LightFalloff => "u_lightFalloffTexture",
            TextureRole::LightProjection => "u_lightProjectionTexture",
            TextureRole::Diffuse => "u_diffuseTexture",
            TextureRole::Specular => "u_specularTexture",
            TextureRole::SpecularTable => "u_specularFalloffTexture",
        }
    }
}

/// Number of texture units the interaction path uses.
pub const INTERACTION_TEXTURE_UNITS: u32 = 6;

/// Everything one lit draw of a (light, surface) pair needs.
///
/// All vectors are already in the surface's local space. The block is built by the
/// sub-draw iterator and consumed by exactly one draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawInteraction {
    /// The surface being lit.
    pub surface: SurfaceId,
    /// Light origin in local space, `w = 0`.
    pub local_light_origin: Vec4,
    /// View origin in local space, `w = 1`.
    pub local_view_origin: Vec4,
    /// Light projection planes S, T, Q and the falloff plane, in local space.
    pub light_projection: [Vec4; 4],
    /// S and T rows of the bump texture matrix.
    pub bump_matrix: [Vec4; 2],
    /// S and T rows of the diffuse texture matrix.
    pub diffuse_matrix: [Vec4; 2],
    /// S and T rows of the specular texture matrix.
    pub specular_matrix: [Vec4; 2],
    /// How the vertex color is combined.
    pub vertex_color: VertexColorMode,
    /// Light color times diffuse stage color.
    pub diffuse_color: Vec4,
    /// Light color times specular stage color.
    pub specular_color: Vec4,
    /// Image bound to [`TextureRole::Bump`].
    pub bump_image: ImageId,
    /// Image bound to [`TextureRole::LightFalloff`].
    pub light_falloff_image: ImageId,
    /// Image bound to [`TextureRole::LightProjection`].
    pub light_image: ImageId,
    /// Image bound to [`TextureRole::Diffuse`].
    pub diffuse_image: ImageId,
    /// Image bound to [`TextureRole::Specular`].
    pub specular_image: ImageId,
    /// The surface's model matrix.
    pub model_matrix: Mat4,
}

impl DrawInteraction {
    /// Returns the image this interaction binds for `role`, or `None` for roles bound
    /// once per batch.
    pub fn image_for(&self, role: TextureRole) -> Option<ImageId> {
        match role {
            TextureRole::Bump => Some(self.bump_image),
            TextureRole::LightFalloff => Some(self.light_falloff_image),
            TextureRole::LightProjection => Some(self.light_image),
            TextureRole::Diffuse => Some(self.diffuse_image),
            TextureRole::Specular => Some(self.specular_image),
            TextureRole::SpecularTable => None,
        }
    }
}
