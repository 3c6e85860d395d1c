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

//! Per-frame statistics for the interaction path.

/// Counters collected while drawing one frame's light interactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionStats {
    /// Lights that went through the stencil and sub-pass sequence.
    pub lights_processed: u32,
    /// Lights skipped as fog, blend or empty.
    pub lights_skipped: u32,
    /// Indexed draws issued for shadowed interactions.
    pub interaction_draws: u32,
    /// Indexed draws issued for shadow volumes.
    pub shadow_draws: u32,
    /// Indexed draws issued for translucent interactions.
    pub translucent_draws: u32,
    /// Total indexes submitted by all draws.
    pub indexes: u64,
    /// Stencil buffer clears.
    pub stencil_clears: u32,
}

impl InteractionStats {
    /// Total indexed draws of any kind.
    pub fn total_draws(&self) -> u32 {
        self.interaction_draws + self.shadow_draws + self.translucent_draws
    }
}
