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

//! Backend-agnostic rendering API.
//!
//! Organized into several logical sub-modules:
//!
//! - **[`handles`]**: GPU object handles and frame arena indices.
//! - **[`enums`]** and **[`state`]**: fixed-function state descriptors.
//! - **[`vertex`]**: cached vertex layouts and attribute slots.
//! - **[`interaction`]**: the per-draw parameter block and texture roles.
//! - **[`material`]** and **[`view`]**: the per-frame data model.
//! - **[`settings`]** and **[`stats`]**: configuration and counters.

pub mod enums;
pub mod handles;
pub mod interaction;
pub mod material;
pub mod settings;
pub mod state;
pub mod stats;
pub mod vertex;
pub mod view;

pub use self::enums::*;
pub use self::handles::*;
pub use self::interaction::*;
pub use self::material::*;
pub use self::settings::InteractionSettings;
pub use self::state::*;
pub use self::stats::InteractionStats;
pub use self::vertex::*;
pub use self::view::*;
