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

//! Renders stencil shadow volumes for one light.
//!
//! Volumes are drawn with color and depth writes off. Each face counts into the
//! stencil buffer with wrapping increments and decrements so that, once the chain is
//! done, a pixel is lit exactly when its stencil value is at least 128.

use super::{PassContext, ShaderProgram, Uniform};
use umbra_core::renderer::api::{
    BufferBinding, ClientArray, ContextFeature, CullMode, DrawState, Face, ShadowVert,
    StencilFunc, StencilOperation, StencilOps, SurfaceGeometry, SurfaceId, ViewDef, ViewLight,
};

/// Which shadow list a chain of casters comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadowScope {
    /// Shadows cast onto every interaction of the light.
    Global,
    /// Shadows cast only by the light's local casters.
    Local,
}

impl ShadowScope {
    /// A label for diagnostics.
    pub const fn label(self) -> &'static str {
        match self {
            ShadowScope::Global => "global",
            ShadowScope::Local => "local",
        }
    }
}

/// A lane that counts shadow volumes into the stencil buffer.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShadowVolumeLane;

impl ShadowVolumeLane {
    /// Creates a new `ShadowVolumeLane`.
    pub fn new() -> Self {
        Self
    }

    /// Returns the name of this strategy.
    pub fn strategy_name(&self) -> &'static str {
        "StencilShadowVolume"
    }

    /// Draws the shadow volumes of `casters` for `light`.
    ///
    /// When `shadow_program` is given it must already be active; the lane only pushes
    /// the local light origin to it. Leaves the stencil test set to pass lit pixels.
    pub fn draw_shadow_volumes(
        &self,
        ctx: &mut PassContext<'_>,
        shadow_program: Option<&ShaderProgram>,
        view: &ViewDef,
        light: &ViewLight,
        casters: &[SurfaceId],
        scope: ShadowScope,
    ) {
        if casters.is_empty() || ctx.settings.skip_shadows {
            return;
        }
        log::trace!("Drawing {} {} shadow volumes", casters.len(), scope.label());
        let settings = ctx.settings;

        if ctx.stages.current_unit() < 0 {
            ctx.select_unit(0);
        }
        let unit = ctx.stages.current_unit().max(0) as u32;
        ctx.images.bind_null(unit);
        ctx.gpu.disable_client_array(ClientArray::TexCoord);
        ctx.gpu.set_draw_state(&DrawState::shadow_volume());
        if let Some(offset) = settings.shadow_polygon_offset {
            ctx.gpu.polygon_offset(Some(offset));
        }
        ctx.gpu.stencil_func(StencilFunc::SHADOW_VOLUME);

        let use_depth_bounds = settings.use_depth_bounds_test
            && ctx.gpu.supports(ContextFeature::DepthBoundsTest);
        if use_depth_bounds {
            ctx.gpu.depth_bounds(Some(light.depth_bounds));
        }
        let two_sided =
            settings.use_two_sided_stencil && ctx.gpu.supports(ContextFeature::TwoSidedStencil);

        ctx.current_space = None;
        for &caster_id in casters {
            let Some(caster) = view.surface(caster_id) else {
                log::warn!("Shadow caster {caster_id:?} is not in the frame");
                continue;
            };
            let Some(space) = view.space(caster.space) else {
                log::warn!("Shadow caster {caster_id:?} references a missing space");
                continue;
            };
            let geometry = &caster.geometry;
            let Some(vertexes) = geometry
                .shadow_cache
                .and_then(|h| ctx.vertex_cache.resolve(h))
            else {
                log::warn!("Shadow caster {caster_id:?} has no resident shadow cache, skipping");
                continue;
            };
            let Some(indexes) = geometry.index_cache.and_then(|h| ctx.vertex_cache.resolve(h))
            else {
                log::warn!("Shadow caster {caster_id:?} has no resident index cache, skipping");
                continue;
            };

            if settings.use_scissor && caster.scissor != ctx.current_scissor {
                ctx.current_scissor = caster.scissor;
                ctx.gpu.set_scissor(caster.scissor.offset_by(&view.viewport));
            }
            if ctx.current_space != Some(caster.space) {
                ctx.gpu.load_model_view(&space.model_view_matrix);
                ctx.current_space = Some(caster.space);
            }

            if let Some(program) = shadow_program {
                let Some(local_light) = space
                    .model_matrix
                    .global_point_to_local(light.global_light_origin)
                else {
                    log::warn!("Shadow caster {caster_id:?} has a degenerate model matrix");
                    continue;
                };
                ctx.gpu.set_uniform_4fv(
                    program.location(Uniform::LightOrigin),
                    local_light.extend(0.0),
                );
            }

            ctx.gpu
                .set_vertex_pointer(vertexes, ShadowVert::position_pointer());
            if two_sided {
                draw_two_sided(ctx, indexes, geometry, caster.view_inside_shadow);
            } else {
                draw_one_sided(ctx, indexes, geometry, caster.view_inside_shadow);
            }
        }

        ctx.gpu.set_cull(CullMode::Back);
        if settings.shadow_polygon_offset.is_some() {
            ctx.gpu.polygon_offset(None);
        }
        if use_depth_bounds {
            ctx.gpu.depth_bounds(None);
        }
        ctx.gpu.enable_client_array(ClientArray::TexCoord);
        ctx.gpu.stencil_func(StencilFunc::LIT_ONLY);
        ctx.gpu.stencil_op(StencilOps::KEEP);
    }
}

fn draw_counted(ctx: &mut PassContext<'_>, indexes: BufferBinding, count: u32) {
    ctx.gpu.draw_elements(indexes, count);
    ctx.stats.shadow_draws += 1;
    ctx.stats.indexes += u64::from(count);
}

/// Both faces in one draw, culling off.
fn draw_two_sided(
    ctx: &mut PassContext<'_>,
    indexes: BufferBinding,
    geometry: &SurfaceGeometry,
    view_inside: bool,
) {
    use StencilOperation::{DecrementWrap, IncrementWrap};

    ctx.gpu.set_cull(CullMode::None);
    if view_inside {
        ctx.gpu
            .stencil_op_separate(Face::Front, StencilOps::on_depth_fail(DecrementWrap));
        ctx.gpu
            .stencil_op_separate(Face::Back, StencilOps::on_depth_fail(IncrementWrap));
        draw_counted(ctx, indexes, geometry.num_indexes);
    } else {
        ctx.gpu
            .stencil_op_separate(Face::Front, StencilOps::on_depth_pass(IncrementWrap));
        ctx.gpu
            .stencil_op_separate(Face::Back, StencilOps::on_depth_pass(DecrementWrap));
        draw_counted(ctx, indexes, geometry.num_shadow_indexes_no_caps);
    }
}

/// Front and back faces in separate draws, switching the culled side.
///
/// A caster the view is inside first preloads the stencil with every face it has,
/// so the depth-pass pair that follows leaves the depth-fail count behind.
fn draw_one_sided(
    ctx: &mut PassContext<'_>,
    indexes: BufferBinding,
    geometry: &SurfaceGeometry,
    view_inside: bool,
) {
    use StencilOperation::{DecrementWrap, IncrementWrap};

    let count = if view_inside {
        ctx.gpu.set_cull(CullMode::Back);
        ctx.gpu.stencil_op(StencilOps::on_stencil_pass(DecrementWrap));
        draw_counted(ctx, indexes, geometry.num_indexes);
        ctx.gpu.set_cull(CullMode::Front);
        ctx.gpu.stencil_op(StencilOps::on_stencil_pass(IncrementWrap));
        draw_counted(ctx, indexes, geometry.num_indexes);
        geometry.num_indexes
    } else {
        geometry.num_shadow_indexes_no_caps
    };

    ctx.gpu.set_cull(CullMode::Back);
    ctx.gpu.stencil_op(StencilOps::on_depth_pass(IncrementWrap));
    draw_counted(ctx, indexes, count);
    ctx.gpu.set_cull(CullMode::Front);
    ctx.gpu.stencil_op(StencilOps::on_depth_pass(DecrementWrap));
    draw_counted(ctx, indexes, count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_lane::shaders::builtin_sources;
    use crate::render_lane::test_support::{Call, MockCache, MockContext, MockImages};
    use crate::render_lane::{ProgramKind, TextureStageBinder};
    use umbra_core::math::{Mat4, Vec3, Vec4};
    use umbra_core::renderer::api::{
        BufferId, DepthBounds, DrawSurface, GlobalImages, ImageId, InteractionSettings,
        InteractionStats, LightMaterialId, PolygonOffset, ScissorRect, VertexCacheHandle,
        ViewEntity,
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

        fn run(&mut self, program: Option<&ShaderProgram>, view: &ViewDef, casters: &[SurfaceId]) {
            let mut ctx = PassContext::new(
                &mut self.gpu,
                &mut self.images,
                &self.cache,
                &self.settings,
                &GLOBALS,
                &mut self.stages,
                &mut self.stats,
            );
            ShadowVolumeLane::new().draw_shadow_volumes(
                &mut ctx,
                program,
                view,
                &view.lights[0],
                casters,
                ShadowScope::Global,
            );
        }

        fn draws(&self) -> Vec<u32> {
            self.gpu
                .calls
                .iter()
                .filter_map(|c| match c {
                    Call::Draw(_, count) => Some(*count),
                    _ => None,
                })
                .collect()
        }
    }

    fn geometry(handle: u32) -> SurfaceGeometry {
        SurfaceGeometry {
            shadow_cache: Some(VertexCacheHandle(handle)),
            index_cache: Some(VertexCacheHandle(handle + 100)),
            num_indexes: 48,
            num_shadow_indexes_no_caps: 24,
            num_shadow_indexes_no_front_caps: 36,
            ..Default::default()
        }
    }

    /// A frame with one caster per entry of `inside`, all in one translated space.
    fn frame(inside: &[bool]) -> ViewDef {
        let mut view = ViewDef::new(ScissorRect::new(8, 16, 640, 480), Vec3::ZERO);
        let space = view.add_space(ViewEntity {
            model_matrix: Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)),
            model_view_matrix: Mat4::IDENTITY,
        });
        for (i, &view_inside_shadow) in inside.iter().enumerate() {
            view.add_surface(DrawSurface {
                geometry: geometry(i as u32 + 1),
                space,
                material: None,
                scissor: ScissorRect::new(0, 0, 100, 100),
                view_inside_shadow,
            });
        }
        let mut light = ViewLight::new(LightMaterialId(0), Vec3::new(0.0, 0.0, 32.0));
        light.depth_bounds = DepthBounds { min: 0.25, max: 0.75 };
        view.lights.push(light);
        view
    }

    fn ids(n: usize) -> Vec<SurfaceId> {
        (0..n).map(SurfaceId).collect()
    }

    #[test]
    fn empty_chain_issues_nothing() {
        let mut h = Harness::new();
        h.run(None, &frame(&[]), &[]);
        assert!(h.gpu.calls.is_empty());
        assert!(h.images.calls.is_empty());
    }

    #[test]
    fn depth_pass_pair_for_outside_casters() {
        let mut h = Harness::new();
        h.run(None, &frame(&[false]), &ids(1));
        assert_eq!(h.draws(), vec![24, 24]);
        let calls = &h.gpu.calls;
        let incr = h
            .gpu
            .position(&Call::StencilOp(StencilOps::on_depth_pass(
                StencilOperation::IncrementWrap,
            )))
            .unwrap();
        assert_eq!(calls[incr - 1], Call::Cull(CullMode::Back));
        let decr = h
            .gpu
            .position(&Call::StencilOp(StencilOps::on_depth_pass(
                StencilOperation::DecrementWrap,
            )))
            .unwrap();
        assert_eq!(calls[decr - 1], Call::Cull(CullMode::Front));
        assert_eq!(h.stats.shadow_draws, 2);
        assert_eq!(h.stats.indexes, 48);
    }

    #[test]
    fn inside_casters_preload_then_draw_capped_pair() {
        let mut h = Harness::new();
        h.run(None, &frame(&[true]), &ids(1));
        assert_eq!(h.draws(), vec![48, 48, 48, 48]);
        let preload = h
            .gpu
            .position(&Call::StencilOp(StencilOps::on_stencil_pass(
                StencilOperation::DecrementWrap,
            )))
            .unwrap();
        assert_eq!(h.gpu.calls[preload - 1], Call::Cull(CullMode::Back));
        assert!(h.gpu.calls.contains(&Call::StencilOp(StencilOps::on_stencil_pass(
            StencilOperation::IncrementWrap
        ))));
    }

    /// Depth test results of one caster's faces over a single pixel; `true` passes.
    struct Coverage {
        front: &'static [bool],
        back: &'static [bool],
    }

    fn stencil_delta(ops: StencilOps, depth_passes: bool) -> i32 {
        let op = if depth_passes { ops.depth_pass } else { ops.depth_fail };
        match op {
            StencilOperation::IncrementWrap => 1,
            StencilOperation::DecrementWrap => -1,
            _ => 0,
        }
    }

    /// Replays the recorded cull and stencil state over one pixel and returns the
    /// net stencil change. Caster `i` draws from index buffer `i + 101`.
    fn net_stencil(calls: &[Call], coverage: &[Coverage]) -> i32 {
        let mut cull = CullMode::Back;
        let mut front_ops = StencilOps::KEEP;
        let mut back_ops = StencilOps::KEEP;
        let mut value = 0;
        for call in calls {
            match call {
                Call::Cull(mode) => cull = *mode,
                Call::StencilOp(ops) => {
                    front_ops = *ops;
                    back_ops = *ops;
                }
                Call::StencilOpSeparate(Face::Front, ops) => front_ops = *ops,
                Call::StencilOpSeparate(Face::Back, ops) => back_ops = *ops,
                Call::Draw(binding, _) => {
                    let caster = &coverage[(binding.buffer.0 - 101) as usize];
                    if cull != CullMode::Front {
                        value += caster
                            .front
                            .iter()
                            .map(|&p| stencil_delta(front_ops, p))
                            .sum::<i32>();
                    }
                    if cull != CullMode::Back {
                        value += caster
                            .back
                            .iter()
                            .map(|&p| stencil_delta(back_ops, p))
                            .sum::<i32>();
                    }
                }
                _ => {}
            }
        }
        value
    }

    // The view is inside caster 0 and the pixel lies beyond its back face, so it adds
    // nothing. The pixel lies inside caster 1, which must leave it shadowed.
    const MIXED: [Coverage; 2] = [
        Coverage {
            front: &[],
            back: &[true],
        },
        Coverage {
            front: &[true],
            back: &[false],
        },
    ];

    #[test]
    fn one_sided_counts_each_caster_once() {
        let mut h = Harness::new();
        h.run(None, &frame(&[true, false]), &ids(2));
        assert_eq!(net_stencil(&h.gpu.calls, &MIXED), 1);

        let mut h = Harness::new();
        h.run(None, &frame(&[true]), &ids(1));
        let inside = [Coverage {
            front: &[],
            back: &[false],
        }];
        assert_eq!(net_stencil(&h.gpu.calls, &inside), 1);
    }

    #[test]
    fn one_and_two_sided_paths_agree() {
        let mut one = Harness::new();
        one.run(None, &frame(&[true, false]), &ids(2));
        let mut two = Harness::new();
        two.gpu.two_sided_stencil = true;
        two.run(None, &frame(&[true, false]), &ids(2));
        assert_eq!(
            net_stencil(&one.gpu.calls, &MIXED),
            net_stencil(&two.gpu.calls, &MIXED)
        );
    }

    #[test]
    fn two_sided_stencil_uses_one_draw_per_caster() {
        let mut h = Harness::new();
        h.gpu.two_sided_stencil = true;
        h.run(None, &frame(&[false, true]), &ids(2));
        assert_eq!(h.draws(), vec![24, 48]);
        assert!(h.gpu.calls.contains(&Call::Cull(CullMode::None)));
        assert!(h.gpu.calls.contains(&Call::StencilOpSeparate(
            Face::Front,
            StencilOps::on_depth_pass(StencilOperation::IncrementWrap)
        )));
        assert!(h.gpu.calls.contains(&Call::StencilOpSeparate(
            Face::Back,
            StencilOps::on_depth_fail(StencilOperation::IncrementWrap)
        )));
    }

    #[test]
    fn two_sided_needs_both_setting_and_support() {
        let mut h = Harness::new();
        h.gpu.two_sided_stencil = true;
        h.settings.use_two_sided_stencil = false;
        h.run(None, &frame(&[false]), &ids(1));
        assert_eq!(h.draws(), vec![24, 24]);
    }

    #[test]
    fn teardown_restores_lit_stencil_test() {
        let mut h = Harness::new();
        h.run(None, &frame(&[false]), &ids(1));
        let tail = &h.gpu.calls[h.gpu.calls.len() - 4..];
        assert_eq!(
            tail,
            &[
                Call::Cull(CullMode::Back),
                Call::EnableClient(ClientArray::TexCoord),
                Call::StencilFunc(StencilFunc::LIT_ONLY),
                Call::StencilOp(StencilOps::KEEP),
            ]
        );
        assert!(h.gpu.position(&Call::DisableClient(ClientArray::TexCoord)).unwrap() < 3);
        assert_eq!(h.images.calls, vec![Call::BindNull(0)]);
    }

    #[test]
    fn scissor_applied_once_and_offset_by_viewport() {
        let mut h = Harness::new();
        h.run(None, &frame(&[false, false]), &ids(2));
        let scissors: Vec<_> = h
            .gpu
            .calls
            .iter()
            .filter(|c| matches!(c, Call::Scissor(_)))
            .collect();
        assert_eq!(scissors, vec![&Call::Scissor(ScissorRect::new(8, 16, 100, 100))]);
    }

    #[test]
    fn shadow_program_receives_local_light_origin() {
        let mut h = Harness::new();
        let program =
            ShaderProgram::build(&mut h.gpu, &builtin_sources(), ProgramKind::Shadow).unwrap();
        h.gpu.calls.clear();
        h.run(Some(&program), &frame(&[false]), &ids(1));
        assert!(h.gpu.calls.contains(&Call::Uniform4fv(
            program.location(Uniform::LightOrigin),
            Vec4::new(-10.0, 0.0, 32.0, 0.0)
        )));
    }

    #[test]
    fn optional_state_is_set_and_cleared() {
        let mut h = Harness::new();
        h.gpu.depth_bounds = true;
        h.settings.use_depth_bounds_test = true;
        h.settings.shadow_polygon_offset = Some(PolygonOffset {
            factor: 1.0,
            units: 2.0,
        });
        h.run(None, &frame(&[false]), &ids(1));
        let calls = &h.gpu.calls;
        assert!(calls.contains(&Call::DepthBounds(Some(DepthBounds { min: 0.25, max: 0.75 }))));
        assert!(calls.contains(&Call::DepthBounds(None)));
        assert!(calls.contains(&Call::PolygonOffset(None)));
    }

    #[test]
    fn evicted_shadow_cache_skips_caster() {
        let mut h = Harness::new();
        h.cache.evicted.push(VertexCacheHandle(1));
        h.run(None, &frame(&[false, false]), &ids(2));
        assert_eq!(h.draws(), vec![24, 24]);
        assert!(h.gpu.calls.contains(&Call::VertexPointer(
            BufferBinding {
                buffer: BufferId(2),
                offset: 0,
            },
            ShadowVert::position_pointer()
        )));
    }
}
