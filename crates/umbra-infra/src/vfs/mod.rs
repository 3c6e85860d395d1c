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

//! File-system backed shader sources.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use umbra_core::vfs::ShaderSourceProvider;

/// Reads shader sources from files below a root directory.
#[derive(Debug, Clone)]
pub struct DirectorySourceProvider {
    root: PathBuf,
}

impl DirectorySourceProvider {
    /// Creates a provider rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory relative paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads `path` relative to the root.
    pub fn read(&self, path: &str) -> Result<String> {
        let full = self.root.join(path);
        fs::read_to_string(&full)
            .with_context(|| format!("Failed to read shader source {}", full.display()))
    }
}

impl ShaderSourceProvider for DirectorySourceProvider {
    fn read_source(&self, path: &str) -> Option<String> {
        match self.read(path) {
            Ok(source) => Some(source),
            Err(e) => {
                log::debug!("{e:#}");
                None
            }
        }
    }
}

/// Asks each provider in turn; the first one that has the file wins.
#[derive(Default)]
pub struct LayeredSourceProvider {
    layers: Vec<Box<dyn ShaderSourceProvider>>,
}

impl LayeredSourceProvider {
    /// Creates a provider with no layers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a layer below the existing ones.
    pub fn with_layer(mut self, layer: impl ShaderSourceProvider + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if there are no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl ShaderSourceProvider for LayeredSourceProvider {
    fn read_source(&self, path: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.read_source(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use umbra_core::vfs::MemorySourceProvider;

    #[test]
    fn reads_relative_to_root() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("gl2progs")).unwrap();
        fs::write(dir.path().join("gl2progs/shadow.vert"), "void main() {}").unwrap();
        let vfs = DirectorySourceProvider::new(dir.path());
        assert_eq!(
            vfs.read_source("gl2progs/shadow.vert").as_deref(),
            Some("void main() {}")
        );
        let err = vfs.read("gl2progs/missing.vert").unwrap_err();
        assert!(format!("{err:#}").contains("missing.vert"));
        assert!(vfs.read_source("gl2progs/missing.vert").is_none());
    }

    #[test]
    fn first_layer_with_the_file_wins() {
        let mut over = MemorySourceProvider::new();
        over.insert("gl2progs/shadow.vert", "override");
        let mut base = MemorySourceProvider::new();
        base.insert("gl2progs/shadow.vert", "base");
        base.insert("gl2progs/shadow.frag", "base frag");

        let vfs = LayeredSourceProvider::new().with_layer(over).with_layer(base);
        assert_eq!(vfs.len(), 2);
        assert_eq!(vfs.read_source("gl2progs/shadow.vert").as_deref(), Some("override"));
        assert_eq!(vfs.read_source("gl2progs/shadow.frag").as_deref(), Some("base frag"));
        assert!(vfs.read_source("gl2progs/other.vert").is_none());
    }
}
