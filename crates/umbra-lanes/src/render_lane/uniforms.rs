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

//! Pushes a [`DrawInteraction`] into the interaction program's uniforms.

use super::program_registry::{ShaderProgram, Uniform};
use umbra_core::renderer::{api::DrawInteraction, GraphicsContext};

/// Writes every per-draw uniform of `interaction` to the bound `program`.
///
/// Projection planes and texture matrix rows go out as separate 4-vectors; the
/// vertex color mode selects one of the three fixed combine pairs.
pub fn bind_interaction_uniforms(
    gpu: &mut dyn GraphicsContext,
    program: &ShaderProgram,
    interaction: &DrawInteraction,
) {
    let vec4_uniforms = [
        (Uniform::LightOrigin, interaction.local_light_origin),
        (Uniform::ViewOrigin, interaction.local_view_origin),
        (Uniform::LightProjectionS, interaction.light_projection[0]),
        (Uniform::LightProjectionT, interaction.light_projection[1]),
        (Uniform::LightProjectionQ, interaction.light_projection[2]),
        (Uniform::LightFalloff, interaction.light_projection[3]),
        (Uniform::BumpMatrixS, interaction.bump_matrix[0]),
        (Uniform::BumpMatrixT, interaction.bump_matrix[1]),
        (Uniform::DiffuseMatrixS, interaction.diffuse_matrix[0]),
        (Uniform::DiffuseMatrixT, interaction.diffuse_matrix[1]),
        (Uniform::SpecularMatrixS, interaction.specular_matrix[0]),
        (Uniform::SpecularMatrixT, interaction.specular_matrix[1]),
    ];
    for (uniform, value) in vec4_uniforms {
        gpu.set_uniform_4fv(program.location(uniform), value);
    }

    let (modulate, add) = interaction.vertex_color.combine_pair();
    gpu.set_uniform_4fv(program.location(Uniform::ColorModulate), modulate);
    gpu.set_uniform_4fv(program.location(Uniform::ColorAdd), add);

    gpu.set_uniform_4fv(
        program.location(Uniform::DiffuseColor),
        interaction.diffuse_color,
    );
    gpu.set_uniform_4fv(
        program.location(Uniform::SpecularColor),
        interaction.specular_color,
    );
}
