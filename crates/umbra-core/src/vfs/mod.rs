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

//! Source lookup for shader text.
//!
//! Shader sources are read through a [`ShaderSourceProvider`] so the program
//! registry never touches the file system directly. Paths are forward-slash,
//! relative to the provider's root (for example `gl2progs/interaction.vert`).

use std::collections::HashMap;

/// Reads text files by relative path.
pub trait ShaderSourceProvider {
    /// Returns the file's contents, or `None` if it does not exist or cannot be read.
    fn read_source(&self, path: &str) -> Option<String>;
}

/// A provider backed by an in-memory map, used for built-in sources and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySourceProvider {
    files: HashMap<String, String>,
}

impl MemorySourceProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, path: impl Into<String>, source: impl Into<String>) {
        self.files.insert(path.into(), source.into());
    }

    /// Removes a file, returning its previous contents.
    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.files.remove(path)
    }
}

impl ShaderSourceProvider for MemorySourceProvider {
    fn read_source(&self, path: &str) -> Option<String> {
        self.files.get(path).cloned()
    }
}
