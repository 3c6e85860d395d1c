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

//! Defines the hierarchy of error types for the lighting pipeline.

use crate::renderer::api::ShaderStage;
use std::fmt;

/// An error related to loading or compiling a single shader stage.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// The shader source could not be found at the given path.
    AssetMissing {
        /// The path that was looked up through the source provider.
        path: String,
    },
    /// The shader source failed to compile.
    CompilationError {
        /// A descriptive label for the shader, usually its file name.
        label: String,
        /// The stage that failed.
        stage: ShaderStage,
        /// The compiler info log.
        details: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::AssetMissing { path } => {
                write!(f, "Shader source not found: '{path}'")
            }
            ShaderError::CompilationError {
                label,
                stage,
                details,
            } => {
                write!(
                    f,
                    "Shader compilation failed for '{label}' ({stage:?}): {details}"
                )
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// An error related to a GPU program as a whole.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceError {
    /// A shader-specific error occurred.
    Shader(ShaderError),
    /// The program failed to link.
    LinkFailed {
        /// A descriptive label for the program.
        label: String,
        /// The linker info log.
        log: String,
    },
    /// The program linked but did not validate against the current state.
    ValidationFailed {
        /// A descriptive label for the program.
        label: String,
        /// The validation info log.
        log: String,
    },
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceError::Shader(err) => write!(f, "Shader resource error: {err}"),
            ResourceError::LinkFailed { label, log } => {
                write!(f, "Program '{label}' failed to link: {log}")
            }
            ResourceError::ValidationFailed { label, log } => {
                write!(f, "Program '{label}' failed to validate: {log}")
            }
        }
    }
}

impl std::error::Error for ResourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResourceError::Shader(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ShaderError> for ResourceError {
    fn from(err: ShaderError) -> Self {
        ResourceError::Shader(err)
    }
}

/// A high-level error reported by the render agent.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderError {
    /// An error occurred while managing a GPU resource.
    ResourceError(ResourceError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::ResourceError(err) => {
                write!(f, "Graphics resource operation failed: {err}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::ResourceError(err) => Some(err),
        }
    }
}

impl From<ResourceError> for RenderError {
    fn from(err: ResourceError) -> Self {
        RenderError::ResourceError(err)
    }
}

impl From<ShaderError> for RenderError {
    fn from(err: ShaderError) -> Self {
        RenderError::ResourceError(err.into())
    }
}
