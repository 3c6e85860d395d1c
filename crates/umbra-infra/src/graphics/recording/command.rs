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

//! The command stream captured by the recording backend.

use std::cell::RefCell;
use std::rc::Rc;
use umbra_core::math::{Mat4, Vec4};
use umbra_core::renderer::api::{
    BufferBinding, ClientArray, CullMode, DepthBounds, DrawState, Face, ImageId, PolygonOffset,
    ProgramId, ScissorRect, ShaderObjectId, ShaderStage, StencilFunc, StencilOps,
    UniformLocation, VertexPointer,
};

/// One command as it reached the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCommand {
    CompileShader {
        shader: ShaderObjectId,
        stage: ShaderStage,
        label: String,
    },
    CreateProgram(ProgramId),
    AttachShader {
        program: ProgramId,
        shader: ShaderObjectId,
    },
    BindAttribLocation {
        program: ProgramId,
        index: u32,
        name: String,
    },
    LinkProgram {
        program: ProgramId,
        success: bool,
    },
    ValidateProgram {
        program: ProgramId,
        success: bool,
    },
    DeleteProgram(ProgramId),
    DeleteShader(ShaderObjectId),
    UseProgram(Option<ProgramId>),
    Uniform1i {
        location: UniformLocation,
        value: i32,
    },
    Uniform4fv {
        location: UniformLocation,
        value: Vec4,
    },
    UniformMatrix4 {
        location: UniformLocation,
        value: Mat4,
    },
    ActiveTexture(u32),
    EnableAttribArray(u32),
    DisableAttribArray(u32),
    EnableClientArray(ClientArray),
    DisableClientArray(ClientArray),
    VertexPointer {
        binding: BufferBinding,
        pointer: VertexPointer,
    },
    ColorPointer {
        binding: BufferBinding,
        pointer: VertexPointer,
    },
    AttribPointer {
        index: u32,
        binding: BufferBinding,
        pointer: VertexPointer,
    },
    SetDrawState(DrawState),
    ClearStencil(u8),
    StencilFunc(StencilFunc),
    StencilOp(StencilOps),
    StencilOpSeparate {
        face: Face,
        ops: StencilOps,
    },
    Scissor(ScissorRect),
    Cull(CullMode),
    PolygonOffset(Option<PolygonOffset>),
    DepthBounds(Option<DepthBounds>),
    LoadModelView(Mat4),
    DrawElements {
        indexes: BufferBinding,
        count: u32,
    },
    BindImage {
        image: ImageId,
        unit: u32,
    },
    BindNull {
        unit: u32,
    },
}

impl GpuCommand {
    /// Returns `true` for indexed draws.
    pub fn is_draw(&self) -> bool {
        matches!(self, GpuCommand::DrawElements { .. })
    }
}

/// A shared, append-only command log.
///
/// The context and the image binder hold clones of the same recorder so their
/// commands interleave in issue order.
#[derive(Debug, Clone, Default)]
pub struct CommandRecorder {
    commands: Rc<RefCell<Vec<GpuCommand>>>,
}

impl CommandRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command.
    pub fn record(&self, command: GpuCommand) {
        log::trace!("gpu: {command:?}");
        self.commands.borrow_mut().push(command);
    }

    /// Returns a copy of every command recorded so far.
    pub fn commands(&self) -> Vec<GpuCommand> {
        self.commands.borrow().clone()
    }

    /// Removes and returns every command recorded so far.
    pub fn take(&self) -> Vec<GpuCommand> {
        std::mem::take(&mut *self.commands.borrow_mut())
    }

    /// Drops every recorded command.
    pub fn clear(&self) {
        self.commands.borrow_mut().clear();
    }

    /// Number of recorded commands.
    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }

    /// Counts the commands matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&GpuCommand) -> bool) -> usize {
        self.commands.borrow().iter().filter(|c| predicate(c)).count()
    }

    /// Index of the first command matching `predicate`.
    pub fn position(&self, predicate: impl Fn(&GpuCommand) -> bool) -> Option<usize> {
        self.commands.borrow().iter().position(predicate)
    }
}
