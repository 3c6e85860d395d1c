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

//! Loading, linking and uniform resolution of the two GLSL programs.

use umbra_core::renderer::{
    api::{
        ProgramId, ShaderObjectId, ShaderStage, TextureRole, UniformLocation,
        INTERACTION_ATTRIBUTES,
    },
    GraphicsContext, RenderError, ResourceError, ShaderError,
};
use umbra_core::vfs::ShaderSourceProvider;

/// Directory, relative to the source provider root, holding the GLSL programs.
pub const SHADER_DIRECTORY: &str = "gl2progs";

/// A failure while building a program.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProgramError {
    /// A stage could not be loaded or compiled.
    #[error(transparent)]
    Shader(#[from] ShaderError),
    /// Linking was attempted without one of the stages.
    #[error("program '{label}' has no {stage:?} stage")]
    MissingStage {
        /// The program label.
        label: &'static str,
        /// The absent stage.
        stage: ShaderStage,
    },
    /// The linker rejected the program.
    #[error("program '{label}' failed to link: {log}")]
    LinkFailed {
        /// The program label.
        label: &'static str,
        /// The linker info log.
        log: String,
    },
    /// The program linked but did not validate.
    #[error("program '{label}' failed to validate: {log}")]
    ValidateFailed {
        /// The program label.
        label: &'static str,
        /// The validation info log.
        log: String,
    },
}

impl From<ProgramError> for RenderError {
    fn from(err: ProgramError) -> Self {
        let resource = match err {
            ProgramError::Shader(e) => ResourceError::Shader(e),
            ProgramError::MissingStage { label, stage } => ResourceError::LinkFailed {
                label: label.to_string(),
                log: format!("missing {stage:?} stage"),
            },
            ProgramError::LinkFailed { label, log } => ResourceError::LinkFailed {
                label: label.to_string(),
                log,
            },
            ProgramError::ValidateFailed { label, log } => ResourceError::ValidationFailed {
                label: label.to_string(),
                log,
            },
        };
        RenderError::ResourceError(resource)
    }
}

/// The semantic uniforms the programs may declare. Each maps to one GLSL name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Uniform {
    LightOrigin,
    ViewOrigin,
    LightProjectionS,
    LightProjectionT,
    LightProjectionQ,
    LightFalloff,
    BumpMatrixS,
    BumpMatrixT,
    DiffuseMatrixS,
    DiffuseMatrixT,
    SpecularMatrixS,
    SpecularMatrixT,
    ColorModulate,
    ColorAdd,
    DiffuseColor,
    SpecularColor,
    ModelMatrix,
}

impl Uniform {
    /// Number of semantic uniforms.
    pub const COUNT: usize = 17;

    /// Every semantic uniform, in table order.
    pub const ALL: [Uniform; Self::COUNT] = [
        Uniform::LightOrigin,
        Uniform::ViewOrigin,
        Uniform::LightProjectionS,
        Uniform::LightProjectionT,
        Uniform::LightProjectionQ,
        Uniform::LightFalloff,
        Uniform::BumpMatrixS,
        Uniform::BumpMatrixT,
        Uniform::DiffuseMatrixS,
        Uniform::DiffuseMatrixT,
        Uniform::SpecularMatrixS,
        Uniform::SpecularMatrixT,
        Uniform::ColorModulate,
        Uniform::ColorAdd,
        Uniform::DiffuseColor,
        Uniform::SpecularColor,
        Uniform::ModelMatrix,
    ];

    /// The GLSL name of the uniform.
    pub const fn name(self) -> &'static str {
        match self {
            Uniform::LightOrigin => "u_lightOrigin",
            Uniform::ViewOrigin => "u_viewOrigin",
            Uniform::LightProjectionS => "u_lightProjectionS",
            Uniform::LightProjectionT => "u_lightProjectionT",
            Uniform::LightProjectionQ => "u_lightProjectionQ",
            Uniform::LightFalloff => "u_lightFalloff",
            Uniform::BumpMatrixS => "u_bumpMatrixS",
            Uniform::BumpMatrixT => "u_bumpMatrixT",
            Uniform::DiffuseMatrixS => "u_diffuseMatrixS",
            Uniform::DiffuseMatrixT => "u_diffuseMatrixT",
            Uniform::SpecularMatrixS => "u_specularMatrixS",
            Uniform::SpecularMatrixT => "u_specularMatrixT",
            Uniform::ColorModulate => "u_colorModulate",
            Uniform::ColorAdd => "u_colorAdd",
            Uniform::DiffuseColor => "u_diffuseColor",
            Uniform::SpecularColor => "u_specularColor",
            Uniform::ModelMatrix => "u_modelMatrix",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Which of the two fixed programs is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramKind {
    /// Lights bump-mapped surfaces.
    Interaction,
    /// Extrudes shadow volumes away from the light.
    Shadow,
}

impl ProgramKind {
    /// A label for diagnostics.
    pub const fn label(self) -> &'static str {
        match self {
            ProgramKind::Interaction => "interaction",
            ProgramKind::Shadow => "shadow",
        }
    }

    /// The file name of the given stage.
    pub const fn file_name(self, stage: ShaderStage) -> &'static str {
        match (self, stage) {
            (ProgramKind::Interaction, ShaderStage::Vertex) => "interaction.vert",
            (ProgramKind::Interaction, ShaderStage::Fragment) => "interaction.frag",
            (ProgramKind::Shadow, ShaderStage::Vertex) => "shadow.vert",
            (ProgramKind::Shadow, ShaderStage::Fragment) => "shadow.frag",
        }
    }

    /// Whether the program reads the generic tangent-space attributes.
    pub const fn needs_vertex_attributes(self) -> bool {
        matches!(self, ProgramKind::Interaction)
    }

    /// The uniforms queried after link.
    pub fn uniforms(self) -> &'static [Uniform] {
        match self {
            ProgramKind::Interaction => &Uniform::ALL,
            ProgramKind::Shadow => &[Uniform::LightOrigin],
        }
    }
}

/// A linked GPU program and its resolved uniform locations.
///
/// Immutable between builds: a reload builds a fresh program and destroys the old one.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderProgram {
    kind: ProgramKind,
    program: Option<ProgramId>,
    vertex_shader: Option<ShaderObjectId>,
    fragment_shader: Option<ShaderObjectId>,
    locations: [UniformLocation; Uniform::COUNT],
    validated: bool,
}

impl ShaderProgram {
    /// Creates an empty program slot of the given kind.
    pub fn new(kind: ProgramKind) -> Self {
        Self {
            kind,
            program: None,
            vertex_shader: None,
            fragment_shader: None,
            locations: [UniformLocation::ABSENT; Uniform::COUNT],
            validated: false,
        }
    }

    /// Loads, links, validates and resolves a program in one go.
    ///
    /// Validation failures are logged and do not fail the build. On any other failure
    /// every object created so far is deleted.
    pub fn build(
        gpu: &mut dyn GraphicsContext,
        sources: &dyn ShaderSourceProvider,
        kind: ProgramKind,
    ) -> Result<Self, ProgramError> {
        let mut program = Self::new(kind);
        if let Err(e) = program.load_and_link(gpu, sources) {
            program.destroy(gpu);
            return Err(e);
        }

        if let Err(e) = program.validate(gpu) {
            log::warn!("{e}");
        }
        program.resolve_uniforms(gpu);
        Ok(program)
    }

    fn load_and_link(
        &mut self,
        gpu: &mut dyn GraphicsContext,
        sources: &dyn ShaderSourceProvider,
    ) -> Result<(), ProgramError> {
        self.load(gpu, sources, ShaderStage::Vertex)?;
        self.load(gpu, sources, ShaderStage::Fragment)?;
        self.link(gpu)
    }

    /// Reads and compiles one stage from `gl2progs/<name>`.
    ///
    /// A missing file or a compile failure leaves the stage absent.
    pub fn load(
        &mut self,
        gpu: &mut dyn GraphicsContext,
        sources: &dyn ShaderSourceProvider,
        stage: ShaderStage,
    ) -> Result<(), ProgramError> {
        let name = self.kind.file_name(stage);
        let path = format!("{SHADER_DIRECTORY}/{name}");
        log::info!("{path}");

        let Some(source) = sources.read_source(&path) else {
            log::warn!("{path}: File not found");
            return Err(ShaderError::AssetMissing { path }.into());
        };

        let slot = match stage {
            ShaderStage::Vertex => &mut self.vertex_shader,
            ShaderStage::Fragment => &mut self.fragment_shader,
        };
        if let Some(old) = slot.take() {
            gpu.delete_shader(old);
        }

        match gpu.compile_shader(name, stage, &source) {
            Ok(shader) => {
                *slot = Some(shader);
                Ok(())
            }
            Err(e) => {
                log::warn!("{e}");
                Err(e.into())
            }
        }
    }

    /// Creates the program object, attaches both stages and links.
    pub fn link(&mut self, gpu: &mut dyn GraphicsContext) -> Result<(), ProgramError> {
        let label = self.kind.label();
        let vertex = self.vertex_shader.ok_or(ProgramError::MissingStage {
            label,
            stage: ShaderStage::Vertex,
        })?;
        let fragment = self.fragment_shader.ok_or(ProgramError::MissingStage {
            label,
            stage: ShaderStage::Fragment,
        })?;

        let program = gpu.create_program();
        self.program = Some(program);
        gpu.attach_shader(program, vertex);
        gpu.attach_shader(program, fragment);

        if self.kind.needs_vertex_attributes() {
            for (index, name) in INTERACTION_ATTRIBUTES {
                gpu.bind_attrib_location(program, index, name);
            }
        }

        gpu.link_program(program);
        if !gpu.link_status(program) {
            let log = gpu.program_info_log(program);
            log::error!("{label}: program failed to link");
            return Err(ProgramError::LinkFailed { label, log });
        }
        Ok(())
    }

    /// Runs driver validation and records the result.
    pub fn validate(&mut self, gpu: &mut dyn GraphicsContext) -> Result<(), ProgramError> {
        let label = self.kind.label();
        let Some(program) = self.program else {
            return Err(ProgramError::LinkFailed {
                label,
                log: "program was never linked".to_string(),
            });
        };
        gpu.validate_program(program);
        self.validated = gpu.validate_status(program);
        if self.validated {
            Ok(())
        } else {
            Err(ProgramError::ValidateFailed {
                label,
                log: gpu.program_info_log(program),
            })
        }
    }

    /// Queries every uniform location once and assigns sampler units.
    ///
    /// The program is made current for the sampler writes and unbound afterwards.
    pub fn resolve_uniforms(&mut self, gpu: &mut dyn GraphicsContext) {
        let Some(program) = self.program else {
            return;
        };
        self.locations = [UniformLocation::ABSENT; Uniform::COUNT];
        for &uniform in self.kind.uniforms() {
            self.locations[uniform.index()] = gpu.uniform_location(program, uniform.name());
        }

        if self.kind == ProgramKind::Interaction {
            gpu.use_program(Some(program));
            for role in TextureRole::ALL {
                let location = gpu.uniform_location(program, role.sampler_name());
                gpu.set_uniform_1i(location, role.unit() as i32);
            }
            gpu.use_program(None);
        }
    }

    /// Deletes the program and shader objects.
    pub fn destroy(&mut self, gpu: &mut dyn GraphicsContext) {
        if let Some(program) = self.program.take() {
            gpu.delete_program(program);
        }
        if let Some(shader) = self.vertex_shader.take() {
            gpu.delete_shader(shader);
        }
        if let Some(shader) = self.fragment_shader.take() {
            gpu.delete_shader(shader);
        }
        self.locations = [UniformLocation::ABSENT; Uniform::COUNT];
        self.validated = false;
    }

    /// The program kind.
    pub fn kind(&self) -> ProgramKind {
        self.kind
    }

    /// The linked program handle.
    pub fn id(&self) -> Option<ProgramId> {
        self.program
    }

    /// The location of `uniform`, or [`UniformLocation::ABSENT`].
    pub fn location(&self, uniform: Uniform) -> UniformLocation {
        self.locations[uniform.index()]
    }

    /// The full location table, in [`Uniform::ALL`] order.
    pub fn locations(&self) -> &[UniformLocation; Uniform::COUNT] {
        &self.locations
    }

    /// Whether the last validation passed.
    pub fn is_validated(&self) -> bool {
        self.validated
    }
}
