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

//! An in-crate mock context that records every call, for lane unit tests.

use std::collections::HashMap;
use umbra_core::math::{Mat4, Vec4};
use umbra_core::renderer::{
    api::*, GraphicsContext, ImageBinder, ShaderError, VertexCache,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CompileShader(ShaderObjectId),
    CreateProgram(ProgramId),
    Attach(ProgramId, ShaderObjectId),
    BindAttrib(ProgramId, u32, String),
    Link(ProgramId),
    Validate(ProgramId),
    DeleteProgram(ProgramId),
    DeleteShader(ShaderObjectId),
    UseProgram(Option<ProgramId>),
    Uniform1i(UniformLocation, i32),
    Uniform4fv(UniformLocation, Vec4),
    UniformMatrix4(UniformLocation, Mat4),
    ActiveTexture(u32),
    EnableAttrib(u32),
    DisableAttrib(u32),
    EnableClient(ClientArray),
    DisableClient(ClientArray),
    VertexPointer(BufferBinding, VertexPointer),
    ColorPointer(BufferBinding, VertexPointer),
    AttribPointer(u32, BufferBinding, VertexPointer),
    DrawState(DrawState),
    ClearStencil(u8),
    StencilFunc(StencilFunc),
    StencilOp(StencilOps),
    StencilOpSeparate(Face, StencilOps),
    Scissor(ScissorRect),
    Cull(CullMode),
    PolygonOffset(Option<PolygonOffset>),
    DepthBounds(Option<DepthBounds>),
    LoadModelView(Mat4),
    Draw(BufferBinding, u32),
    BindImage(ImageId, u32),
    BindNull(u32),
}

#[derive(Debug, Default)]
pub struct MockContext {
    pub calls: Vec<Call>,
    pub fail_link: bool,
    pub fail_validate: bool,
    pub two_sided_stencil: bool,
    pub depth_bounds: bool,
    next_id: u32,
    shader_sources: HashMap<ShaderObjectId, String>,
    program_shaders: HashMap<ProgramId, Vec<ShaderObjectId>>,
}

impl MockContext {
    pub fn position(&self, call: &Call) -> Option<usize> {
        self.calls.iter().position(|c| c == call)
    }

    pub fn draws(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Draw(..)))
            .count()
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl GraphicsContext for MockContext {
    fn compile_shader(
        &mut self,
        label: &str,
        stage: ShaderStage,
        source: &str,
    ) -> Result<ShaderObjectId, ShaderError> {
        if source.contains("#error") {
            return Err(ShaderError::CompilationError {
                label: label.to_string(),
                stage,
                details: "#error directive".to_string(),
            });
        }
        let id = ShaderObjectId(self.next());
        self.shader_sources.insert(id, source.to_string());
        self.calls.push(Call::CompileShader(id));
        Ok(id)
    }

    fn create_program(&mut self) -> ProgramId {
        let id = ProgramId(self.next());
        self.calls.push(Call::CreateProgram(id));
        id
    }

    fn attach_shader(&mut self, program: ProgramId, shader: ShaderObjectId) {
        self.program_shaders.entry(program).or_default().push(shader);
        self.calls.push(Call::Attach(program, shader));
    }

    fn bind_attrib_location(&mut self, program: ProgramId, index: u32, name: &str) {
        self.calls
            .push(Call::BindAttrib(program, index, name.to_string()));
    }

    fn link_program(&mut self, program: ProgramId) {
        self.calls.push(Call::Link(program));
    }

    fn link_status(&self, _program: ProgramId) -> bool {
        !self.fail_link
    }

    fn validate_program(&mut self, program: ProgramId) {
        self.calls.push(Call::Validate(program));
    }

    fn validate_status(&self, _program: ProgramId) -> bool {
        !self.fail_validate
    }

    fn program_info_log(&self, _program: ProgramId) -> String {
        "mock log".to_string()
    }

    fn delete_program(&mut self, program: ProgramId) {
        self.program_shaders.remove(&program);
        self.calls.push(Call::DeleteProgram(program));
    }

    fn delete_shader(&mut self, shader: ShaderObjectId) {
        self.calls.push(Call::DeleteShader(shader));
    }

    fn uniform_location(&self, program: ProgramId, name: &str) -> UniformLocation {
        // The byte offset of the name in the attached sources stands in for a location.
        let mut base = 0;
        for shader in self.program_shaders.get(&program).into_iter().flatten() {
            let source = &self.shader_sources[shader];
            if let Some(pos) = source.find(name) {
                return UniformLocation((base + pos) as i32);
            }
            base += source.len();
        }
        UniformLocation::ABSENT
    }

    fn use_program(&mut self, program: Option<ProgramId>) {
        self.calls.push(Call::UseProgram(program));
    }

    fn set_uniform_1i(&mut self, location: UniformLocation, value: i32) {
        self.calls.push(Call::Uniform1i(location, value));
    }

    fn set_uniform_4fv(&mut self, location: UniformLocation, value: Vec4) {
        self.calls.push(Call::Uniform4fv(location, value));
    }

    fn set_uniform_matrix4(&mut self, location: UniformLocation, value: &Mat4) {
        self.calls.push(Call::UniformMatrix4(location, *value));
    }

    fn active_texture(&mut self, unit: u32) {
        self.calls.push(Call::ActiveTexture(unit));
    }

    fn enable_vertex_attrib_array(&mut self, index: u32) {
        self.calls.push(Call::EnableAttrib(index));
    }

    fn disable_vertex_attrib_array(&mut self, index: u32) {
        self.calls.push(Call::DisableAttrib(index));
    }

    fn enable_client_array(&mut self, array: ClientArray) {
        self.calls.push(Call::EnableClient(array));
    }

    fn disable_client_array(&mut self, array: ClientArray) {
        self.calls.push(Call::DisableClient(array));
    }

    fn set_vertex_pointer(&mut self, binding: BufferBinding, pointer: VertexPointer) {
        self.calls.push(Call::VertexPointer(binding, pointer));
    }

    fn set_color_pointer(&mut self, binding: BufferBinding, pointer: VertexPointer) {
        self.calls.push(Call::ColorPointer(binding, pointer));
    }

    fn set_vertex_attrib_pointer(
        &mut self,
        index: u32,
        binding: BufferBinding,
        pointer: VertexPointer,
    ) {
        self.calls.push(Call::AttribPointer(index, binding, pointer));
    }

    fn set_draw_state(&mut self, state: &DrawState) {
        self.calls.push(Call::DrawState(*state));
    }

    fn clear_stencil(&mut self, value: u8) {
        self.calls.push(Call::ClearStencil(value));
    }

    fn stencil_func(&mut self, func: StencilFunc) {
        self.calls.push(Call::StencilFunc(func));
    }

    fn stencil_op(&mut self, ops: StencilOps) {
        self.calls.push(Call::StencilOp(ops));
    }

    fn stencil_op_separate(&mut self, face: Face, ops: StencilOps) {
        self.calls.push(Call::StencilOpSeparate(face, ops));
    }

    fn set_scissor(&mut self, rect: ScissorRect) {
        self.calls.push(Call::Scissor(rect));
    }

    fn set_cull(&mut self, mode: CullMode) {
        self.calls.push(Call::Cull(mode));
    }

    fn polygon_offset(&mut self, offset: Option<PolygonOffset>) {
        self.calls.push(Call::PolygonOffset(offset));
    }

    fn depth_bounds(&mut self, bounds: Option<DepthBounds>) {
        self.calls.push(Call::DepthBounds(bounds));
    }

    fn load_model_view(&mut self, matrix: &Mat4) {
        self.calls.push(Call::LoadModelView(*matrix));
    }

    fn draw_elements(&mut self, indexes: BufferBinding, count: u32) {
        self.calls.push(Call::Draw(indexes, count));
    }

    fn supports(&self, feature: ContextFeature) -> bool {
        match feature {
            ContextFeature::TwoSidedStencil => self.two_sided_stencil,
            ContextFeature::DepthBoundsTest => self.depth_bounds,
        }
    }
}

/// Records image binds into its own list.
#[derive(Debug, Default)]
pub struct MockImages {
    pub calls: Vec<Call>,
}

impl ImageBinder for MockImages {
    fn bind(&mut self, image: ImageId, unit: u32) {
        self.calls.push(Call::BindImage(image, unit));
    }

    fn bind_null(&mut self, unit: u32) {
        self.calls.push(Call::BindNull(unit));
    }
}

/// Maps every handle `n` to buffer `n` at offset 0, except the ones listed as evicted.
#[derive(Debug, Default)]
pub struct MockCache {
    pub evicted: Vec<VertexCacheHandle>,
}

impl VertexCache for MockCache {
    fn resolve(&self, handle: VertexCacheHandle) -> Option<BufferBinding> {
        if self.evicted.contains(&handle) {
            None
        } else {
            Some(BufferBinding {
                buffer: BufferId(handle.0),
                offset: 0,
            })
        }
    }
}
