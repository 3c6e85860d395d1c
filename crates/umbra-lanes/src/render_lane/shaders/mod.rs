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

//! Built-in GLSL sources for the interaction and shadow programs.
//!
//! The sources are embedded at compile time. They are served through
//! [`builtin_sources`] under the same `gl2progs/` paths a directory-backed
//! provider would use, so the registry loads them the same way.

use umbra_core::vfs::MemorySourceProvider;

/// Vertex stage of the interaction program.
pub const INTERACTION_VERT: &str = include_str!("interaction.vert");

/// Fragment stage of the interaction program.
pub const INTERACTION_FRAG: &str = include_str!("interaction.frag");

/// Vertex stage of the shadow extrusion program.
pub const SHADOW_VERT: &str = include_str!("shadow.vert");

/// Fragment stage of the shadow extrusion program.
pub const SHADOW_FRAG: &str = include_str!("shadow.frag");

/// Returns a provider serving the built-in sources under `gl2progs/`.
pub fn builtin_sources() -> MemorySourceProvider {
    let mut sources = MemorySourceProvider::new();
    sources.insert("gl2progs/interaction.vert", INTERACTION_VERT);
    sources.insert("gl2progs/interaction.frag", INTERACTION_FRAG);
    sources.insert("gl2progs/shadow.vert", SHADOW_VERT);
    sources.insert("gl2progs/shadow.frag", SHADOW_FRAG);
    sources
}
