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

//! An [`ImageBinder`] that records binds and tracks what each unit holds.

use super::command::{CommandRecorder, GpuCommand};
use std::collections::BTreeMap;
use umbra_core::renderer::api::ImageId;
use umbra_core::renderer::ImageBinder;

/// Image binder writing into a shared [`CommandRecorder`].
#[derive(Debug)]
pub struct RecordingImageBinder {
    recorder: CommandRecorder,
    bound: BTreeMap<u32, ImageId>,
}

impl RecordingImageBinder {
    /// Creates a binder with every unit empty.
    pub fn new(recorder: CommandRecorder) -> Self {
        Self {
            recorder,
            bound: BTreeMap::new(),
        }
    }

    /// The image bound to `unit`, if any.
    pub fn bound(&self, unit: u32) -> Option<ImageId> {
        self.bound.get(&unit).copied()
    }

    /// Units that currently hold an image, ascending.
    pub fn occupied_units(&self) -> Vec<u32> {
        self.bound.keys().copied().collect()
    }
}

impl ImageBinder for RecordingImageBinder {
    fn bind(&mut self, image: ImageId, unit: u32) {
        self.bound.insert(unit, image);
        self.recorder.record(GpuCommand::BindImage { image, unit });
    }

    fn bind_null(&mut self, unit: u32) {
        self.bound.remove(&unit);
        self.recorder.record(GpuCommand::BindNull { unit });
    }
}
