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

//! Abstract traits defining the seams between the lighting pipeline and its collaborators.

mod graphics_context;
mod image_binder;
mod vertex_cache;

pub use self::graphics_context::GraphicsContext;
pub use self::image_binder::ImageBinder;
pub use self::vertex_cache::VertexCache;
