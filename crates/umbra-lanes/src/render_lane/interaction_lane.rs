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

//! Draws the lit interactions of one light over a chain of surfaces.
//!
//! The lane owns no GPU state. It sets up the interaction program and the
//! tangent-space vertex arrays, issues one indexed draw per sub-draw and restores
//! the arrays, texture units and program before returning.

use super::{
    bind_interaction_uniforms, PassContext, ShaderProgram, SubDraws, Uniform,
};
use umbra_core::renderer::api::{
    ClientArray, CompareFunction, DrawState, DrawVert, InteractionSettings, InteractionStats,
    SurfaceId, TextureRole, ViewDef, ViewLight, ATTR_BITANGENT, ATTR_NORMAL, ATTR_TANGENT,
    ATTR_TEXCOORD,
};

/// Texture roles bound per sub-draw. The specular table is bound once per batch.
const PER_DRAW_ROLES: [TextureRole; 5] = [
    TextureRole::Bump,
    TextureRole::LightFalloff,
    TextureRole::LightProjection,
    TextureRole::Diffuse,
    TextureRole::Specular,
];

/// Attribute slots in the order their pointers are set.
const ATTRIBUTE_SLOTS: [u32; 4] = [ATTR_NORMAL, ATTR_BITANGENT, ATTR_TANGENT, ATTR_TEXCOORD];

/// Which sub-pass a chain of interactions belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionPass {
    /// Surfaces gated by the stencil shadow test.
    Shadowed,
    /// Translucent surfaces drawn without shadowing.
    Translucent,
}

impl InteractionPass {
    /// The depth comparison this pass draws with.
    pub fn depth_func(self, settings: &InteractionSettings) -> CompareFunction {
        match self {
            InteractionPass::Shadowed => settings.interaction_depth_func,
            InteractionPass::Translucent => settings.translucent_depth_func,
        }
    }

    fn record_draw(self, stats: &mut InteractionStats, indexes: u32) {
        match self {
            InteractionPass::Shadowed => stats.interaction_draws += 1,
            InteractionPass::Translucent => stats.translucent_draws += 1,
        }
        stats.indexes += u64::from(indexes);
    }
}

/// A lane that draws bump-mapped light interactions with the GLSL program.
#[derive(Debug, Default, Clone, Copy)]
pub struct InteractionLane;

impl InteractionLane {
    /// Creates a new `InteractionLane`.
    pub fn new() -> Self {
        Self
    }

    /// Returns the name of this strategy.
    pub fn strategy_name(&self) -> &'static str {
        "GlslInteraction"
    }

    /// Draws every sub-draw of `surfaces` lit by `light`.
    ///
    /// Does nothing for an empty chain, when interactions are skipped, or when the
    /// program is not linked.
    pub fn draw_interactions_for_light(
        &self,
        ctx: &mut PassContext<'_>,
        program: &ShaderProgram,
        view: &ViewDef,
        light: &ViewLight,
        surfaces: &[SurfaceId],
        pass: InteractionPass,
    ) {
        if surfaces.is_empty() || ctx.settings.skip_interactions {
            return;
        }
        let Some(program_id) = program.id() else {
            log::warn!("Interaction program is not linked, skipping {} surfaces", surfaces.len());
            return;
        };
        let settings = ctx.settings;
        let globals = ctx.global_images;

        ctx.gpu
            .set_draw_state(&DrawState::interaction(pass.depth_func(settings)));
        ctx.gpu.use_program(Some(program_id));
        for slot in ATTRIBUTE_SLOTS {
            ctx.gpu.enable_vertex_attrib_array(slot);
        }
        ctx.gpu.enable_client_array(ClientArray::Color);

        ctx.stages.bind_role(
            &mut *ctx.gpu,
            &mut *ctx.images,
            TextureRole::SpecularTable,
            globals.specular_table,
        );

        for &surface_id in surfaces {
            let Some(surface) = view.surface(surface_id) else {
                log::warn!("Interaction surface {surface_id:?} is not in the frame");
                continue;
            };
            let geometry = &surface.geometry;
            let Some(vertexes) = geometry
                .ambient_cache
                .and_then(|h| ctx.vertex_cache.resolve(h))
            else {
                log::warn!("Surface {surface_id:?} has no resident ambient cache, skipping");
                continue;
            };
            let Some(indexes) = geometry.index_cache.and_then(|h| ctx.vertex_cache.resolve(h))
            else {
                log::warn!("Surface {surface_id:?} has no resident index cache, skipping");
                continue;
            };
            let Some(space) = view.space(surface.space) else {
                log::warn!("Surface {surface_id:?} references a missing space");
                continue;
            };

            if ctx.current_space != Some(surface.space) {
                ctx.gpu.load_model_view(&space.model_view_matrix);
                ctx.current_space = Some(surface.space);
            }

            ctx.gpu.set_color_pointer(vertexes, DrawVert::color_pointer());
            for slot in ATTRIBUTE_SLOTS {
                if let Some(pointer) = DrawVert::attribute_pointer(slot) {
                    ctx.gpu.set_vertex_attrib_pointer(slot, vertexes, pointer);
                }
            }
            ctx.gpu.set_vertex_pointer(vertexes, DrawVert::position_pointer());
            ctx.gpu.set_uniform_matrix4(
                program.location(Uniform::ModelMatrix),
                &space.model_matrix,
            );

            for interaction in SubDraws::new(view, light, surface_id, settings, globals) {
                bind_interaction_uniforms(&mut *ctx.gpu, program, &interaction);
                for role in PER_DRAW_ROLES {
                    if let Some(image) = interaction.image_for(role) {
                        ctx.stages
                            .bind_role(&mut *ctx.gpu, &mut *ctx.images, role, image);
                    }
                }
                ctx.gpu.draw_elements(indexes, geometry.num_indexes);
                pass.record_draw(ctx.stats, geometry.num_indexes);
            }
        }

        for slot in ATTRIBUTE_SLOTS {
            ctx.gpu.disable_vertex_attrib_array(slot);
        }
        ctx.gpu.disable_client_array(ClientArray::Color);
        ctx.stages.unbind_all(&mut *ctx.gpu, &mut *ctx.images);
        ctx.gpu.use_program(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_lane::shaders::builtin_sources;
    use crate::render_lane::test_support::{Call, MockCache, MockContext, MockImages};
    use crate::render_lane::{ProgramKind, TextureStageBinder};
    use umbra_core::math::{Mat4, Vec3, Vec4};
    use umbra_core::renderer::api::{
        BufferBinding, BufferId, DrawSurface, GlobalImages, ImageId, LightMaterial, LightStage,
        ScissorRect, StageKind, SurfaceGeometry, SurfaceMaterial, SurfaceStage,
        VertexCacheHandle, ViewEntity,
    };

    const GLOBALS: GlobalImages = GlobalImages {
        specular_table: ImageId(100),
        black: ImageId(101),
        flat_normal: ImageId(102),
    };

    struct Harness {
        gpu: MockContext,
        images: MockImages,
        cache: MockCache,
        settings: InteractionSettings,
        stages: TextureStageBinder,
        stats: InteractionStats,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                gpu: MockContext::default(),
                images: MockImages::default(),
                cache: MockCache::default(),
                settings: InteractionSettings::default(),
                stages: TextureStageBinder::new(),
                stats: InteractionStats::default(),
            }
        }

        fn program(&mut self) -> ShaderProgram {
            let program =
                ShaderProgram::build(&mut self.gpu, &builtin_sources(), ProgramKind::Interaction)
                    .expect("builtin interaction program builds");
            self.gpu.calls.clear();
            program
        }

        fn run(
            &mut self,
            program: &ShaderProgram,
            view: &ViewDef,
            surfaces: &[SurfaceId],
            pass: InteractionPass,
        ) {
            let mut ctx = PassContext::new(
                &mut self.gpu,
                &mut self.images,
                &self.cache,
                &self.settings,
                &GLOBALS,
                &mut self.stages,
                &mut self.stats,
            );
            InteractionLane::new().draw_interactions_for_light(
                &mut ctx,
                program,
                view,
                &view.lights[0],
                surfaces,
                pass,
            );
        }
    }

    /// Two surfaces in one space, each with a bump and a diffuse layer.
    fn frame(stages: Vec<SurfaceStage>) -> ViewDef {
        let mut view = ViewDef::new(ScissorRect::new(0, 0, 640, 480), Vec3::ZERO);
        let space = view.add_space(ViewEntity {
            model_matrix: Mat4::IDENTITY,
            model_view_matrix: Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)),
        });
        let material = view.add_material(SurfaceMaterial {
            name: "textures/wall".to_string(),
            stages,
        });
        for i in 0..2 {
            view.add_surface(DrawSurface {
                geometry: SurfaceGeometry {
                    ambient_cache: Some(VertexCacheHandle(10 + i)),
                    index_cache: Some(VertexCacheHandle(20 + i)),
                    num_indexes: 36,
                    ..Default::default()
                },
                space,
                material: Some(material),
                scissor: ScissorRect::default(),
                view_inside_shadow: false,
            });
        }
        let light_material = view.add_light_material(LightMaterial {
            name: "lights/round".to_string(),
            is_fog: false,
            is_blend: false,
            falloff_image: ImageId(50),
            stages: vec![LightStage {
                enabled: true,
                color: Vec4::ONE,
                image: ImageId(51),
                texture_matrix: None,
            }],
        });
        view.lights
            .push(ViewLight::new(light_material, Vec3::new(0.0, 64.0, 0.0)));
        view
    }

    fn layer() -> Vec<SurfaceStage> {
        vec![
            SurfaceStage::new(StageKind::Bump, ImageId(1)),
            SurfaceStage::new(StageKind::Diffuse, ImageId(2)),
        ]
    }

    #[test]
    fn empty_chain_issues_nothing() {
        let mut h = Harness::new();
        let program = h.program();
        let view = frame(layer());
        h.run(&program, &view, &[], InteractionPass::Shadowed);
        assert!(h.gpu.calls.is_empty());
        assert!(h.images.calls.is_empty());
    }

    #[test]
    fn one_draw_per_surface_layer() {
        let mut h = Harness::new();
        let program = h.program();
        let view = frame(layer());
        h.run(
            &program,
            &view,
            &[SurfaceId(0), SurfaceId(1)],
            InteractionPass::Shadowed,
        );
        assert_eq!(h.gpu.draws(), 2);
        assert_eq!(h.stats.interaction_draws, 2);
        assert_eq!(h.stats.translucent_draws, 0);
        assert_eq!(h.stats.indexes, 72);
        let first_draw = Call::Draw(
            BufferBinding {
                buffer: BufferId(20),
                offset: 0,
            },
            36,
        );
        assert!(h.gpu.position(&first_draw).is_some());
    }

    #[test]
    fn setup_and_teardown_bracket_the_draws() {
        let mut h = Harness::new();
        let program = h.program();
        let view = frame(layer());
        h.run(&program, &view, &[SurfaceId(0)], InteractionPass::Shadowed);

        let calls = &h.gpu.calls;
        assert_eq!(
            calls[0],
            Call::DrawState(DrawState::interaction(CompareFunction::Less))
        );
        assert_eq!(calls[1], Call::UseProgram(program.id()));
        let draw = calls
            .iter()
            .position(|c| matches!(c, Call::Draw(..)))
            .unwrap();
        for slot in ATTRIBUTE_SLOTS {
            let enable = h.gpu.position(&Call::EnableAttrib(slot)).unwrap();
            let disable = h.gpu.position(&Call::DisableAttrib(slot)).unwrap();
            assert!(enable < draw && draw < disable);
        }
        assert_eq!(calls.last(), Some(&Call::UseProgram(None)));
        assert_eq!(h.stages.current_unit(), 0);
        // Every unit ends unbound.
        let nulls: Vec<_> = h
            .images
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::BindNull(unit) => Some(*unit),
                _ => None,
            })
            .collect();
        assert_eq!(nulls, vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn specular_table_bound_once_per_batch() {
        let mut h = Harness::new();
        let program = h.program();
        let view = frame(layer());
        h.run(
            &program,
            &view,
            &[SurfaceId(0), SurfaceId(1)],
            InteractionPass::Shadowed,
        );
        let table_binds = h
            .images
            .calls
            .iter()
            .filter(|c| **c == Call::BindImage(GLOBALS.specular_table, 5))
            .count();
        assert_eq!(table_binds, 1);
        assert!(h.images.calls.contains(&Call::BindImage(ImageId(1), 0)));
        assert!(h.images.calls.contains(&Call::BindImage(ImageId(50), 1)));
        assert!(h.images.calls.contains(&Call::BindImage(ImageId(51), 2)));
        assert!(h.images.calls.contains(&Call::BindImage(ImageId(2), 3)));
        assert!(h.images.calls.contains(&Call::BindImage(GLOBALS.black, 4)));
    }

    #[test]
    fn translucent_pass_uses_its_depth_func_and_counter() {
        let mut h = Harness::new();
        let program = h.program();
        let view = frame(layer());
        h.run(&program, &view, &[SurfaceId(0)], InteractionPass::Translucent);
        assert_eq!(
            h.gpu.calls[0],
            Call::DrawState(DrawState::interaction(CompareFunction::Equal))
        );
        assert_eq!(h.stats.translucent_draws, 1);
        assert_eq!(h.stats.interaction_draws, 0);
    }

    #[test]
    fn surface_without_ambient_cache_is_skipped() {
        let mut h = Harness::new();
        let program = h.program();
        let view = frame(layer());
        h.cache.evicted.push(VertexCacheHandle(10));
        h.run(
            &program,
            &view,
            &[SurfaceId(0), SurfaceId(1)],
            InteractionPass::Shadowed,
        );
        assert_eq!(h.gpu.draws(), 1);
    }

    #[test]
    fn model_view_loaded_once_per_space() {
        let mut h = Harness::new();
        let program = h.program();
        let view = frame(layer());
        h.run(
            &program,
            &view,
            &[SurfaceId(0), SurfaceId(1)],
            InteractionPass::Shadowed,
        );
        let loads = h
            .gpu
            .calls
            .iter()
            .filter(|c| matches!(c, Call::LoadModelView(_)))
            .count();
        assert_eq!(loads, 1);
    }

    #[test]
    fn material_without_bump_sets_pointers_but_draws_nothing() {
        let mut h = Harness::new();
        let program = h.program();
        let view = frame(vec![SurfaceStage::new(StageKind::Diffuse, ImageId(2))]);
        h.run(&program, &view, &[SurfaceId(0)], InteractionPass::Shadowed);
        assert_eq!(h.gpu.draws(), 0);
        assert!(h
            .gpu
            .calls
            .iter()
            .any(|c| matches!(c, Call::AttribPointer(ATTR_NORMAL, ..))));
    }

    #[test]
    fn skip_interactions_issues_nothing() {
        let mut h = Harness::new();
        h.settings.skip_interactions = true;
        let program = h.program();
        let view = frame(layer());
        h.run(&program, &view, &[SurfaceId(0)], InteractionPass::Shadowed);
        assert!(h.gpu.calls.is_empty());
    }

    #[test]
    fn unlinked_program_issues_nothing() {
        let mut h = Harness::new();
        let view = frame(layer());
        h.run(
            &ShaderProgram::new(ProgramKind::Interaction),
            &view,
            &[SurfaceId(0)],
            InteractionPass::Shadowed,
        );
        assert!(h.gpu.calls.is_empty());
    }
}
