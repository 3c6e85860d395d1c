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

//! An in-memory backend that records the command stream instead of drawing.
//!
//! The context and the image binder share one [`CommandRecorder`], so tests and
//! tools can inspect the exact interleaving of state changes, binds and draws a
//! frame produced. With `RUST_LOG=trace` every command is also logged as it is
//! recorded.

mod command;
mod context;
mod images;

pub use command::*;
pub use context::*;
pub use images::*;

/// Creates a context and image binder writing into one fresh recorder.
pub fn recording_backend() -> (RecordingContext, RecordingImageBinder, CommandRecorder) {
    let recorder = CommandRecorder::new();
    (
        RecordingContext::new(recorder.clone()),
        RecordingImageBinder::new(recorder.clone()),
        recorder,
    )
}
