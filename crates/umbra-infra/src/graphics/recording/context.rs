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

//! A [`GraphicsContext`] that simulates GL object and state semantics in memory.

use super::command::{CommandRecorder, GpuCommand};
use std::collections::{BTreeSet, HashMap, HashSet};
use umbra_core::math::{Mat4, Vec4};
use umbra_core::renderer::api::{
    BufferBinding, ClientArray, CompareFunction, ContextFeature, CullMode, DepthBounds,
    DrawState, Face, PolygonOffset, ProgramId, ScissorRect, ShaderObjectId, ShaderStage,
    StencilFunc, StencilOps, UniformLocation, VertexPointer,
};
use umbra_core::renderer::{GraphicsContext, ShaderError};

#[derive(Debug)]
struct ShaderEntry {
    stage: ShaderStage,
    source: String,
}

#[derive(Debug, Default)]
struct ProgramEntry {
    shaders: Vec<ShaderObjectId>,
    linked: bool,
    validated: bool,
    info_log: String,
    uniforms: HashMap<String, UniformLocation>,
}

/// Fixed-function state as last set through the context.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineState {
    pub active_program: Option<ProgramId>,
    pub active_texture_unit: u32,
    pub enabled_attributes: BTreeSet<u32>,
    pub texcoord_array_enabled: bool,
    pub color_array_enabled: bool,
    pub draw_state: Option<DrawState>,
    pub stencil_func: StencilFunc,
    pub stencil_ops: StencilOps,
    pub scissor: Option<ScissorRect>,
    pub cull: CullMode,
    pub polygon_offset: Option<PolygonOffset>,
    pub depth_bounds: Option<DepthBounds>,
    pub model_view: Mat4,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            active_program: None,
            active_texture_unit: 0,
            enabled_attributes: BTreeSet::new(),
            // The engine keeps the texcoord array enabled between passes.
            texcoord_array_enabled: true,
            color_array_enabled: false,
            draw_state: None,
            stencil_func: StencilFunc::new(CompareFunction::Always, 0, 255),
            stencil_ops: StencilOps::KEEP,
            scissor: None,
            cull: CullMode::Back,
            polygon_offset: None,
            depth_bounds: None,
            model_view: Mat4::IDENTITY,
        }
    }
}

/// Records every command and tracks enough object state to answer the queries
/// the program registry makes.
///
/// A shader compiles when its source defines `main` and has no `#error` directive.
/// A program links when it has exactly one vertex and one fragment stage. Uniform
/// locations are assigned in declaration order at link time, so relinking the same
/// sources yields the same table.
#[derive(Debug)]
pub struct RecordingContext {
    recorder: CommandRecorder,
    shaders: HashMap<ShaderObjectId, ShaderEntry>,
    programs: HashMap<ProgramId, ProgramEntry>,
    next_shader_id: u32,
    next_program_id: u32,
    features: HashSet<ContextFeature>,
    fail_validation: bool,
    state: PipelineState,
}

impl RecordingContext {
    /// Creates a context with no optional features, writing to `recorder`.
    pub fn new(recorder: CommandRecorder) -> Self {
        Self {
            recorder,
            shaders: HashMap::new(),
            programs: HashMap::new(),
            next_shader_id: 1,
            next_program_id: 1,
            features: HashSet::new(),
            fail_validation: false,
            state: PipelineState::default(),
        }
    }

    /// Advertises an optional feature.
    pub fn with_feature(mut self, feature: ContextFeature) -> Self {
        self.features.insert(feature);
        self
    }

    /// Makes every program validation fail, as a driver rejecting the current state would.
    pub fn with_failing_validation(mut self) -> Self {
        self.fail_validation = true;
        self
    }

    /// The recorder this context writes to.
    pub fn recorder(&self) -> &CommandRecorder {
        &self.recorder
    }

    /// The fixed-function state as last set.
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Number of program objects currently alive.
    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }

    /// Number of shader objects currently alive.
    pub fn live_shaders(&self) -> usize {
        self.shaders.len()
    }

    fn record(&self, command: GpuCommand) {
        self.recorder.record(command);
    }

    fn try_link(&self, program: &ProgramEntry) -> Result<HashMap<String, UniformLocation>, String> {
        let mut vertex = 0;
        let mut fragment = 0;
        let mut uniforms = HashMap::new();
        for id in &program.shaders {
            let shader = self
                .shaders
                .get(id)
                .ok_or_else(|| format!("shader {id:?} was deleted"))?;
            match shader.stage {
                ShaderStage::Vertex => vertex += 1,
                ShaderStage::Fragment => fragment += 1,
            }
            for name in uniform_declarations(&shader.source) {
                let next = UniformLocation(uniforms.len() as i32);
                uniforms.entry(name.to_string()).or_insert(next);
            }
        }
        if vertex != 1 || fragment != 1 {
            return Err(format!(
                "expected one vertex and one fragment shader, found {vertex} and {fragment}"
            ));
        }
        Ok(uniforms)
    }
}

/// Yields the names of the `uniform` declarations in `source`.
fn uniform_declarations(source: &str) -> impl Iterator<Item = &str> {
    source.lines().filter_map(|line| {
        let declaration = line.trim().strip_prefix("uniform ")?;
        let declaration = declaration.split(';').next()?;
        let name = declaration.split_whitespace().last()?;
        Some(name.split('[').next().unwrap_or(name))
    })
}

fn defines_main(source: &str) -> bool {
    source.contains("void main")
}

impl GraphicsContext for RecordingContext {
    fn compile_shader(
        &mut self,
        label: &str,
        stage: ShaderStage,
        source: &str,
    ) -> Result<ShaderObjectId, ShaderError> {
        if let Some(line) = source.lines().find(|l| l.trim_start().starts_with("#error")) {
            return Err(ShaderError::CompilationError {
                label: label.to_string(),
                stage,
                details: line.trim().to_string(),
            });
        }
        if !defines_main(source) {
            return Err(ShaderError::CompilationError {
                label: label.to_string(),
                stage,
                details: "no definition of main".to_string(),
            });
        }

        let shader = ShaderObjectId(self.next_shader_id);
        self.next_shader_id += 1;
        self.shaders.insert(
            shader,
            ShaderEntry {
                stage,
                source: source.to_string(),
            },
        );
        self.record(GpuCommand::CompileShader {
            shader,
            stage,
            label: label.to_string(),
        });
        Ok(shader)
    }

    fn create_program(&mut self) -> ProgramId {
        let program = ProgramId(self.next_program_id);
        self.next_program_id += 1;
        self.programs.insert(program, ProgramEntry::default());
        self.record(GpuCommand::CreateProgram(program));
        program
    }

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderObjectId) {
        match self.programs.get_mut(&program) {
            Some(entry) => entry.shaders.push(shader),
            None => log::warn!("RecordingContext: attach to unknown program {program:?}"),
        }
        self.record(GpuCommand::AttachShader { program, shader });
    }

    fn bind_attrib_location(&mut self, program: ProgramId, index: u32, name: &str) {
        self.record(GpuCommand::BindAttribLocation {
            program,
            index,
            name: name.to_string(),
        });
    }

    fn link_program(&mut self, program: ProgramId) {
        let outcome = match self.programs.get(&program) {
            Some(entry) => self.try_link(entry),
            None => Err(format!("unknown program {program:?}")),
        };
        let success = outcome.is_ok();
        if let Some(entry) = self.programs.get_mut(&program) {
            match outcome {
                Ok(uniforms) => {
                    entry.linked = true;
                    entry.uniforms = uniforms;
                    entry.info_log.clear();
                }
                Err(log) => {
                    entry.linked = false;
                    entry.uniforms.clear();
                    entry.info_log = log;
                }
            }
        }
        self.record(GpuCommand::LinkProgram { program, success });
    }

    fn link_status(&self, program: ProgramId) -> bool {
        self.programs.get(&program).is_some_and(|p| p.linked)
    }

    fn validate_program(&mut self, program: ProgramId) {
        let fail_validation = self.fail_validation;
        let success = match self.programs.get_mut(&program) {
            Some(entry) => {
                entry.validated = entry.linked && !fail_validation;
                if !entry.validated {
                    entry.info_log = "validation failed for the current state".to_string();
                }
                entry.validated
            }
            None => false,
        };
        self.record(GpuCommand::ValidateProgram { program, success });
    }

    fn validate_status(&self, program: ProgramId) -> bool {
        self.programs.get(&program).is_some_and(|p| p.validated)
    }

    fn program_info_log(&self, program: ProgramId) -> String {
        self.programs
            .get(&program)
            .map(|p| p.info_log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.programs.remove(&program);
        if self.state.active_program == Some(program) {
            self.state.active_program = None;
        }
        self.record(GpuCommand::DeleteProgram(program));
    }

    fn delete_shader(&mut self, shader: ShaderObjectId) {
        self.shaders.remove(&shader);
        self.record(GpuCommand::DeleteShader(shader));
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> UniformLocation {
        self.programs
            .get(&program)
            .and_then(|p| p.uniforms.get(name).copied())
            .unwrap_or(UniformLocation::ABSENT)
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        if let Some(id) = program {
            if !self.link_status(id) {
                log::warn!("RecordingContext: using unlinked program {id:?}");
            }
        }
        self.state.active_program = program;
        self.record(GpuCommand::UseProgram(program));
    }

    fn set_uniform_1i(&mut self, location: UniformLocation, value: i32) {
        if location.is_present() {
            self.record(GpuCommand::Uniform1i { location, value });
        }
    }

    fn set_uniform_4fv(&mut self, location: UniformLocation, value: Vec4) {
        if location.is_present() {
            self.record(GpuCommand::Uniform4fv { location, value });
        }
    }

    fn set_uniform_matrix4(&mut self, location: UniformLocation, value: &Mat4) {
        if location.is_present() {
            self.record(GpuCommand::UniformMatrix4 {
                location,
                value: *value,
            });
        }
    }

    fn active_texture(&mut self, unit: u32) {
        self.state.active_texture_unit = unit;
        self.record(GpuCommand::ActiveTexture(unit));
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        self.state.enabled_attributes.insert(index);
        self.record(GpuCommand::EnableAttribArray(index));
    }

    fn disable_vertex_attrib_array(&mut self, index: u32) {
        self.state.enabled_attributes.remove(&index);
        self.record(GpuCommand::DisableAttribArray(index));
    }

    fn enable_client_array(&mut self, array: ClientArray) {
        match array {
            ClientArray::Color => self.state.color_array_enabled = true,
            ClientArray::TexCoord => self.state.texcoord_array_enabled = true,
        }
        self.record(GpuCommand::EnableClientArray(array));
    }

    fn disable_client_array(&mut self, array: ClientArray) {
        match array {
            ClientArray::Color => self.state.color_array_enabled = false,
            ClientArray::TexCoord => self.state.texcoord_array_enabled = false,
        }
        self.record(GpuCommand::DisableClientArray(array));
    }

    fn set_vertex_pointer(&mut self, binding: BufferBinding, pointer: VertexPointer) {
        self.record(GpuCommand::VertexPointer { binding, pointer });
    }

    fn set_color_pointer(&mut self, binding: BufferBinding, pointer: VertexPointer) {
        self.record(GpuCommand::ColorPointer { binding, pointer });
    }

    fn set_vertex_attrib_pointer(
        &mut self,
        index: u32,
        binding: BufferBinding,
        pointer: VertexPointer,
    ) {
        self.record(GpuCommand::AttribPointer {
            index,
            binding,
            pointer,
        });
    }

    fn set_draw_state(&mut self, state: &DrawState) {
        self.state.draw_state = Some(*state);
        self.record(GpuCommand::SetDrawState(*state));
    }

    fn clear_stencil(&mut self, value: u8) {
        self.record(GpuCommand::ClearStencil(value));
    }

    fn stencil_func(&mut self, func: StencilFunc) {
        self.state.stencil_func = func;
        self.record(GpuCommand::StencilFunc(func));
    }

    fn stencil_op(&mut self, ops: StencilOps) {
        self.state.stencil_ops = ops;
        self.record(GpuCommand::StencilOp(ops));
    }

    fn stencil_op_separate(&mut self, face: Face, ops: StencilOps) {
        if !self.supports(ContextFeature::TwoSidedStencil) {
            log::warn!("RecordingContext: separate stencil ops without two-sided support");
        }
        self.record(GpuCommand::StencilOpSeparate { face, ops });
    }

    fn set_scissor(&mut self, rect: ScissorRect) {
        self.state.scissor = Some(rect);
        self.record(GpuCommand::Scissor(rect));
    }

    fn set_cull(&mut self, mode: CullMode) {
        self.state.cull = mode;
        self.record(GpuCommand::Cull(mode));
    }

    fn polygon_offset(&mut self, offset: Option<PolygonOffset>) {
        self.state.polygon_offset = offset;
        self.record(GpuCommand::PolygonOffset(offset));
    }

    fn depth_bounds(&mut self, bounds: Option<DepthBounds>) {
        self.state.depth_bounds = bounds;
        self.record(GpuCommand::DepthBounds(bounds));
    }

    fn load_model_view(&mut self, matrix: &Mat4) {
        self.state.model_view = *matrix;
        self.record(GpuCommand::LoadModelView(*matrix));
    }

    fn draw_elements(&mut self, indexes: BufferBinding, count: u32) {
        self.record(GpuCommand::DrawElements { indexes, count });
    }

    fn supports(&self, feature: ContextFeature) -> bool {
        self.features.contains(&feature)
    }
}
