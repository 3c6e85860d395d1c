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

//! Defines the InteractionRenderAgent, the per-frame driver of the light passes.

use umbra_core::renderer::{
    api::{
        ClientArray, DrawState, GlobalImages, InteractionSettings, InteractionStats,
        StencilFunc, ViewDef, ViewLight,
    },
    GraphicsContext, ImageBinder, RenderError, VertexCache,
};
use umbra_core::vfs::ShaderSourceProvider;
use umbra_lanes::render_lane::{
    InteractionLane, InteractionPass, PassContext, ProgramError, ProgramKind, ShaderProgram,
    ShadowScope, ShadowVolumeLane, TextureStageBinder,
};

/// Value the stencil buffer is cleared to before shadow volumes are counted in.
pub const STENCIL_CLEAR_VALUE: u8 = 128;

/// The agent responsible for the stencil-shadowed interaction path.
pub struct InteractionRenderAgent {
    // Where the GLSL sources are read from on init and reload.
    sources: Box<dyn ShaderSourceProvider>,
    settings: InteractionSettings,
    global_images: GlobalImages,
    // Program slots. An empty slot has no program id.
    interaction_program: ShaderProgram,
    shadow_program: ShaderProgram,
    // False until init succeeds, and after shutdown.
    allow_programmable_path: bool,
    interaction_lane: InteractionLane,
    shadow_lane: ShadowVolumeLane,
    stages: TextureStageBinder,
    // Counters for the last frame.
    stats: InteractionStats,
    frame_count: u64,
}

impl InteractionRenderAgent {
    /// Creates an agent whose programs are not built yet.
    pub fn new(
        sources: impl ShaderSourceProvider + 'static,
        settings: InteractionSettings,
        global_images: GlobalImages,
    ) -> Self {
        Self {
            sources: Box::new(sources),
            settings,
            global_images,
            interaction_program: ShaderProgram::new(ProgramKind::Interaction),
            shadow_program: ShaderProgram::new(ProgramKind::Shadow),
            allow_programmable_path: false,
            interaction_lane: InteractionLane::new(),
            shadow_lane: ShadowVolumeLane::new(),
            stages: TextureStageBinder::new(),
            stats: InteractionStats::default(),
            frame_count: 0,
        }
    }

    /// Builds both programs and enables the programmable path.
    ///
    /// # Errors
    /// Returns the first build failure. The path stays disabled so the caller can
    /// fall back to another renderer.
    pub fn init_shader_programs(
        &mut self,
        gpu: &mut dyn GraphicsContext,
    ) -> Result<(), RenderError> {
        self.allow_programmable_path = false;
        log::info!("---------- GLSL init ----------");
        let result = self.rebuild_programs(gpu);
        match &result {
            Ok(()) => {
                log::info!("Available.");
                self.allow_programmable_path = true;
            }
            Err(e) => log::error!("Not available: {e}"),
        }
        log::info!("-------------------------------");
        result.map_err(RenderError::from)
    }

    /// Rebuilds both programs from the current sources.
    ///
    /// Failures are logged. The programmable path is re-enabled either way; a slot
    /// whose program failed to build is skipped at draw time.
    pub fn reload_shader_programs(&mut self, gpu: &mut dyn GraphicsContext) {
        log::info!("---------- GLSL reload ----------");
        if let Err(e) = self.rebuild_programs(gpu) {
            log::error!("GLSL shaders failed to init: {e}");
        }
        self.allow_programmable_path = true;
        log::info!("---------------------------------");
    }

    fn rebuild_programs(&mut self, gpu: &mut dyn GraphicsContext) -> Result<(), ProgramError> {
        self.interaction_program.destroy(gpu);
        self.shadow_program.destroy(gpu);

        let interaction = ShaderProgram::build(gpu, self.sources.as_ref(), ProgramKind::Interaction);
        let shadow = ShaderProgram::build(gpu, self.sources.as_ref(), ProgramKind::Shadow);

        let mut first_error = None;
        for (slot, built) in [
            (&mut self.interaction_program, interaction),
            (&mut self.shadow_program, shadow),
        ] {
            match built {
                Ok(program) => *slot = program,
                Err(e) => {
                    log::warn!("{e}");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Draws every visible light's interactions for one frame.
    ///
    /// Does nothing but log when the programmable path is not allowed.
    pub fn draw_all_light_interactions(
        &mut self,
        gpu: &mut dyn GraphicsContext,
        images: &mut dyn ImageBinder,
        vertex_cache: &dyn VertexCache,
        view: &ViewDef,
    ) {
        self.stats = InteractionStats::default();
        self.frame_count += 1;
        if !self.allow_programmable_path {
            log::debug!(
                "Frame {}: programmable interaction path unavailable, skipping",
                self.frame_count
            );
            return;
        }

        let shadow_program = (self.settings.use_shadow_vertex_program
            && self.shadow_program.id().is_some())
        .then_some(&self.shadow_program);
        let passes = LightPasses {
            interaction_program: &self.interaction_program,
            shadow_program,
            interaction_lane: &self.interaction_lane,
            shadow_lane: &self.shadow_lane,
        };
        let mut ctx = PassContext::new(
            gpu,
            images,
            vertex_cache,
            &self.settings,
            &self.global_images,
            &mut self.stages,
            &mut self.stats,
        );

        ctx.select_unit(0);
        ctx.gpu.disable_client_array(ClientArray::TexCoord);

        for light in &view.lights {
            if !should_draw(view, light) {
                ctx.stats.lights_skipped += 1;
                continue;
            }
            ctx.stats.lights_processed += 1;
            passes.draw_light(&mut ctx, view, light);
        }

        ctx.gpu.stencil_func(StencilFunc::UNSHADOWED);
        ctx.select_unit(0);
        ctx.gpu.enable_client_array(ClientArray::TexCoord);

        log::trace!(
            "Frame {}: {} lights, {} draws",
            self.frame_count,
            self.stats.lights_processed,
            self.stats.total_draws()
        );
    }

    /// Deletes both programs and disables the programmable path.
    pub fn shutdown(&mut self, gpu: &mut dyn GraphicsContext) {
        self.interaction_program.destroy(gpu);
        self.shadow_program.destroy(gpu);
        self.allow_programmable_path = false;
        log::info!("Interaction render agent shut down");
    }

    /// Counters for the last frame.
    pub fn stats(&self) -> &InteractionStats {
        &self.stats
    }

    /// Frames drawn (or skipped) since creation.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Whether [`Self::draw_all_light_interactions`] will issue commands.
    pub fn is_programmable_path_allowed(&self) -> bool {
        self.allow_programmable_path
    }

    /// The interaction program slot.
    pub fn interaction_program(&self) -> &ShaderProgram {
        &self.interaction_program
    }

    /// The shadow program slot.
    pub fn shadow_program(&self) -> &ShaderProgram {
        &self.shadow_program
    }

    /// The current settings.
    pub fn settings(&self) -> &InteractionSettings {
        &self.settings
    }

    /// Mutable access to the settings, read at the start of every frame.
    pub fn settings_mut(&mut self) -> &mut InteractionSettings {
        &mut self.settings
    }
}

/// Fog and blend lights are drawn elsewhere; lights with nothing to light are skipped.
fn should_draw(view: &ViewDef, light: &ViewLight) -> bool {
    let Some(material) = view.light_material(light.light_material) else {
        log::warn!(
            "Light material {:?} is not in the frame",
            light.light_material
        );
        return false;
    };
    material.is_interaction_light() && light.has_interactions()
}

/// The programs and lanes one light is drawn with.
struct LightPasses<'p> {
    interaction_program: &'p ShaderProgram,
    shadow_program: Option<&'p ShaderProgram>,
    interaction_lane: &'p InteractionLane,
    shadow_lane: &'p ShadowVolumeLane,
}

impl LightPasses<'_> {
    fn draw_light(&self, ctx: &mut PassContext<'_>, view: &ViewDef, light: &ViewLight) {
        let settings = ctx.settings;

        if light.has_global_shadows() || light.has_local_shadows() {
            ctx.current_scissor = light.scissor;
            if settings.use_scissor {
                ctx.gpu.set_scissor(light.scissor.offset_by(&view.viewport));
            }
            ctx.gpu.clear_stencil(STENCIL_CLEAR_VALUE);
            ctx.stats.stencil_clears += 1;
        } else {
            ctx.gpu.stencil_func(StencilFunc::UNSHADOWED);
        }

        // Global shadows gate the local interactions and vice versa.
        self.activate_shadow_program(ctx);
        self.shadow_lane.draw_shadow_volumes(
            ctx,
            self.shadow_program,
            view,
            light,
            &light.global_shadows,
            ShadowScope::Global,
        );
        self.interaction_lane.draw_interactions_for_light(
            ctx,
            self.interaction_program,
            view,
            light,
            &light.local_interactions,
            InteractionPass::Shadowed,
        );

        self.activate_shadow_program(ctx);
        self.shadow_lane.draw_shadow_volumes(
            ctx,
            self.shadow_program,
            view,
            light,
            &light.local_shadows,
            ShadowScope::Local,
        );
        self.interaction_lane.draw_interactions_for_light(
            ctx,
            self.interaction_program,
            view,
            light,
            &light.global_interactions,
            InteractionPass::Shadowed,
        );
        if self.shadow_program.is_some() {
            // Stays bound if there were no global interactions.
            ctx.gpu.use_program(None);
        }

        if settings.skip_translucent {
            return;
        }
        ctx.gpu.stencil_func(StencilFunc::UNSHADOWED);
        self.interaction_lane.draw_interactions_for_light(
            ctx,
            self.interaction_program,
            view,
            light,
            &light.translucent_interactions,
            InteractionPass::Translucent,
        );
        ctx.gpu
            .set_draw_state(&DrawState::interaction(settings.interaction_depth_func));
    }

    fn activate_shadow_program(&self, ctx: &mut PassContext<'_>) {
        if let Some(program) = self.shadow_program {
            ctx.gpu.use_program(program.id());
        }
    }
}
