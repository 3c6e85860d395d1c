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

use crate::renderer::api::ImageId;

/// Binds images owned by the asset system to texture units.
///
/// The caller selects `unit` on the graphics context before calling; the unit is
/// passed along so implementations can track what each unit holds.
pub trait ImageBinder {
    /// Binds `image` to `unit`.
    fn bind(&mut self, image: ImageId, unit: u32);

    /// Unbinds whatever `unit` holds.
    fn bind_null(&mut self, unit: u32);
}
