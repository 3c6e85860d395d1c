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

//! Loading [`InteractionSettings`] from RON files.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use umbra_core::renderer::api::InteractionSettings;

/// Reads and parses a settings file. Fields missing from the file keep their defaults.
pub fn load_settings(path: &Path) -> Result<InteractionSettings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    let settings = InteractionSettings::from_ron_str(&text)
        .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
    log::info!("Loaded interaction settings from {}", path.display());
    Ok(settings)
}

/// Like [`load_settings`], but falls back to the defaults with a warning.
pub fn load_settings_or_default(path: &Path) -> InteractionSettings {
    load_settings(path).unwrap_or_else(|e| {
        log::warn!("{e:#}; using default interaction settings");
        InteractionSettings::default()
    })
}
