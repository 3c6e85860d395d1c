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

//! Acts as the agent for the lit interaction path.
//!
//! The agent owns the two GLSL programs and their lifecycle, and walks the frame's
//! lights in order. For each light it clears the stencil buffer, counts shadow
//! volumes into it and draws the interactions the stencil lets through, then
//! draws the unshadowed translucent interactions. The per-surface GPU work is
//! delegated to the [`umbra_lanes`] render lanes.

mod agent;

pub use agent::*;
