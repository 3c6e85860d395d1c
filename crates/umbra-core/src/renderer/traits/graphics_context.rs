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

use crate::math::{Mat4, Vec4};
use crate::renderer::api::*;
use crate::renderer::error::ShaderError;

/// An immediate-mode graphics context with GL semantics.
///
/// Every call takes effect in order on the single context the caller owns for the
/// duration of a frame. Objects are referenced through opaque handles; uniform writes
/// to [`UniformLocation::ABSENT`] are ignored, never an error.
pub trait GraphicsContext {
    // --- Shader and program objects ---

    /// Compiles one shader stage.
    /// ## Arguments
    /// * `label` - A name used in diagnostics, usually the file name.
    /// * `stage` - The stage being compiled.
    /// * `source` - The GLSL source text.
    /// ## Errors
    /// * `ShaderError::CompilationError` - carrying the compiler info log.
    fn compile_shader(
        &mut self,
        label: &str,
        stage: ShaderStage,
        source: &str,
    ) -> Result<ShaderObjectId, ShaderError>;

    /// Creates an empty program object.
    fn create_program(&mut self) -> ProgramId;

    /// Attaches a compiled stage to a program.
    fn attach_shader(&mut self, program: ProgramId, shader: ShaderObjectId);

    /// Binds a generic attribute slot to an attribute name. Takes effect at the next link.
    fn bind_attrib_location(&mut self, program: ProgramId, index: u32, name: &str);

    /// Links the program's attached stages.
    fn link_program(&mut self, program: ProgramId);

    /// Returns `true` if the last link succeeded.
    fn link_status(&self, program: ProgramId) -> bool;

    /// Validates the program against the current state.
    fn validate_program(&mut self, program: ProgramId);

    /// Returns `true` if the last validation succeeded.
    fn validate_status(&self, program: ProgramId) -> bool;

    /// Returns the info log of the last link or validation.
    fn program_info_log(&self, program: ProgramId) -> String;

    /// Deletes a program object.
    fn delete_program(&mut self, program: ProgramId);

    /// Deletes a shader object.
    fn delete_shader(&mut self, shader: ShaderObjectId);

    // --- Uniforms ---

    /// Queries the location of a uniform in a linked program.
    fn uniform_location(&self, program: ProgramId, name: &str) -> UniformLocation;

    /// Makes `program` current, or unbinds any program with `None`.
    fn use_program(&mut self, program: Option<ProgramId>);

    /// Writes an integer uniform of the current program.
    fn set_uniform_1i(&mut self, location: UniformLocation, value: i32);

    /// Writes a 4-float uniform of the current program.
    fn set_uniform_4fv(&mut self, location: UniformLocation, value: Vec4);

    /// Writes a 4x4 matrix uniform of the current program, column-major.
    fn set_uniform_matrix4(&mut self, location: UniformLocation, value: &Mat4);

    // --- Textures ---

    /// Selects the active texture unit without touching client array state.
    fn active_texture(&mut self, unit: u32);

    // --- Vertex arrays ---

    /// Enables a generic attribute array.
    fn enable_vertex_attrib_array(&mut self, index: u32);

    /// Disables a generic attribute array.
    fn disable_vertex_attrib_array(&mut self, index: u32);

    /// Enables a fixed-function client array.
    fn enable_client_array(&mut self, array: ClientArray);

    /// Disables a fixed-function client array.
    fn disable_client_array(&mut self, array: ClientArray);

    /// Points the position array into a buffer.
    fn set_vertex_pointer(&mut self, binding: BufferBinding, pointer: VertexPointer);

    /// Points the color array into a buffer.
    fn set_color_pointer(&mut self, binding: BufferBinding, pointer: VertexPointer);

    /// Points a generic attribute array into a buffer.
    fn set_vertex_attrib_pointer(
        &mut self,
        index: u32,
        binding: BufferBinding,
        pointer: VertexPointer,
    );

    // --- Fixed-function state ---

    /// Applies blend, depth write, color write and depth test state.
    fn set_draw_state(&mut self, state: &DrawState);

    /// Clears the stencil buffer inside the current scissor to `value`.
    fn clear_stencil(&mut self, value: u8);

    /// Sets the stencil test for both faces.
    fn stencil_func(&mut self, func: StencilFunc);

    /// Sets the stencil operations for both faces.
    fn stencil_op(&mut self, ops: StencilOps);

    /// Sets the stencil operations for one face only.
    fn stencil_op_separate(&mut self, face: Face, ops: StencilOps);

    /// Sets the scissor rectangle, in window pixels.
    fn set_scissor(&mut self, rect: ScissorRect);

    /// Sets face culling.
    fn set_cull(&mut self, mode: CullMode);

    /// Enables depth bias with the given values, or disables it with `None`.
    fn polygon_offset(&mut self, offset: Option<PolygonOffset>);

    /// Enables the depth bounds test with the given range, or disables it with `None`.
    fn depth_bounds(&mut self, bounds: Option<DepthBounds>);

    /// Loads the fixed-function model-view matrix.
    fn load_model_view(&mut self, matrix: &Mat4);

    // --- Drawing ---

    /// Issues an indexed triangle draw of `count` indexes.
    fn draw_elements(&mut self, indexes: BufferBinding, count: u32);

    /// Returns `true` if the context exposes an optional capability.
    fn supports(&self, feature: ContextFeature) -> bool;
}
