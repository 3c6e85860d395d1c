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

//! Light and surface materials as the interaction path sees them.

use super::handles::ImageId;
use super::interaction::VertexColorMode;
use crate::math::Vec4;

/// A 2x3 texture coordinate transform: `s' = a*s + b*t + c`, `t' = d*s + e*t + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureMatrix {
    /// The two rows, `[[a, b, c], [d, e, f]]`.
    pub rows: [[f32; 3]; 2],
}

impl TextureMatrix {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    };

    /// Creates a scale and translate transform.
    pub const fn scale_translate(scale_s: f32, scale_t: f32, offset_s: f32, offset_t: f32) -> Self {
        Self {
            rows: [[scale_s, 0.0, offset_s], [0.0, scale_t, offset_t]],
        }
    }

    /// Expands the rows to the 4-component S/T vectors the shaders dot against
    /// `(s, t, 0, 1)`.
    pub fn to_shader_rows(&self) -> [Vec4; 2] {
        let [s, t] = self.rows;
        [
            Vec4::new(s[0], s[1], 0.0, s[2]),
            Vec4::new(t[0], t[1], 0.0, t[2]),
        ]
    }
}

impl Default for TextureMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One stage of a light material.
#[derive(Debug, Clone, PartialEq)]
pub struct LightStage {
    /// Whether the stage's condition currently holds.
    pub enabled: bool,
    /// The light color contributed by this stage.
    pub color: Vec4,
    /// The projected light image.
    pub image: ImageId,
    /// An optional transform of the projection's S and T planes.
    pub texture_matrix: Option<TextureMatrix>,
}

/// The material of a light.
#[derive(Debug, Clone, PartialEq)]
pub struct LightMaterial {
    /// Name for diagnostics.
    pub name: String,
    /// Fog lights are drawn by a separate pass.
    pub is_fog: bool,
    /// Blend lights are drawn by a separate pass.
    pub is_blend: bool,
    /// The attenuation image.
    pub falloff_image: ImageId,
    /// Ordered stages; each enabled stage lights the surface once.
    pub stages: Vec<LightStage>,
}

impl LightMaterial {
    /// Returns `true` for lights drawn by the interaction path.
    pub fn is_interaction_light(&self) -> bool {
        !self.is_fog && !self.is_blend
    }
}

/// What a surface stage contributes to an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    /// Normal map.
    Bump,
    /// Diffuse color map.
    Diffuse,
    /// Specular map.
    Specular,
    /// Unlit stage drawn by other passes.
    Ambient,
}

/// One stage of a surface material.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceStage {
    /// The stage's role.
    pub kind: StageKind,
    /// Whether the stage's condition currently holds.
    pub enabled: bool,
    /// The stage image.
    pub image: ImageId,
    /// The stage color.
    pub color: Vec4,
    /// The stage texture transform.
    pub texture_matrix: TextureMatrix,
    /// How the vertex color participates.
    pub vertex_color: VertexColorMode,
}

impl SurfaceStage {
    /// Creates an enabled stage with a white color, identity transform and ignored
    /// vertex color.
    pub fn new(kind: StageKind, image: ImageId) -> Self {
        Self {
            kind,
            enabled: true,
            image,
            color: Vec4::ONE,
            texture_matrix: TextureMatrix::IDENTITY,
            vertex_color: VertexColorMode::Ignore,
        }
    }

    /// Sets the stage color.
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    /// Sets the stage texture transform.
    pub fn with_texture_matrix(mut self, matrix: TextureMatrix) -> Self {
        self.texture_matrix = matrix;
        self
    }

    /// Sets the vertex color mode.
    pub fn with_vertex_color(mut self, mode: VertexColorMode) -> Self {
        self.vertex_color = mode;
        self
    }
}

/// The material of a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMaterial {
    /// Name for diagnostics.
    pub name: String,
    /// Ordered stages.
    pub stages: Vec<SurfaceStage>,
}

/// Well-known images the interaction path falls back on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalImages {
    /// The specular exponent lookup table bound to unit 5.
    pub specular_table: ImageId,
    /// Stands in for an absent or skipped diffuse/specular map.
    pub black: ImageId,
    /// Stands in for the bump map when bump mapping is skipped.
    pub flat_normal: ImageId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_texture_matrix_rows() {
        let [s, t] = TextureMatrix::IDENTITY.to_shader_rows();
        assert_eq!(s, Vec4::new(1.0, 0.0, 0.0, 0.0));
        assert_eq!(t, Vec4::new(0.0, 1.0, 0.0, 0.0));
    }

    #[test]
    fn scale_translate_rows_put_offset_in_w() {
        let [s, t] = TextureMatrix::scale_translate(2.0, 3.0, 0.5, 0.25).to_shader_rows();
        assert_eq!(s, Vec4::new(2.0, 0.0, 0.0, 0.5));
        assert_eq!(t, Vec4::new(0.0, 3.0, 0.0, 0.25));
    }

    #[test]
    fn fog_and_blend_lights_are_not_interaction_lights() {
        let mut material = LightMaterial {
            name: "lights/fog".to_string(),
            is_fog: true,
            is_blend: false,
            falloff_image: ImageId(0),
            stages: Vec::new(),
        };
        assert!(!material.is_interaction_light());
        material.is_fog = false;
        material.is_blend = true;
        assert!(!material.is_interaction_light());
        material.is_blend = false;
        assert!(material.is_interaction_light());
    }
}
