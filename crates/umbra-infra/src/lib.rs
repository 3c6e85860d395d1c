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

//! Concrete implementations of the `umbra-core` contracts.
//!
//! - [`graphics::recording`]: a graphics context and image binder that record the
//!   command stream in memory.
//! - [`graphics::MemoryVertexCache`]: geometry storage in host memory.
//! - [`vfs`]: shader sources read from disk, optionally layered over built-ins.
//! - [`config`]: RON settings files.

pub mod config;
pub mod graphics;
pub mod vfs;

pub use graphics::recording::{
    recording_backend, CommandRecorder, GpuCommand, RecordingContext, RecordingImageBinder,
};
pub use graphics::MemoryVertexCache;
