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

//! The per-frame arena the interaction path walks: spaces, surfaces, materials and lights.

use super::handles::{LightMaterialId, MaterialId, SpaceId, SurfaceId, VertexCacheHandle};
use super::material::{LightMaterial, SurfaceMaterial};
use super::state::{DepthBounds, ScissorRect};
use crate::math::{Mat4, Vec3, Vec4};

/// The transform space of one entity.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewEntity {
    /// Local to world.
    pub model_matrix: Mat4,
    /// Local to eye, loaded before drawing shadow volumes.
    pub model_view_matrix: Mat4,
}

/// Cached geometry of a surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceGeometry {
    /// [`DrawVert`](super::DrawVert) data for lit draws.
    pub ambient_cache: Option<VertexCacheHandle>,
    /// [`ShadowVert`](super::ShadowVert) data for shadow volumes.
    pub shadow_cache: Option<VertexCacheHandle>,
    /// Index data.
    pub index_cache: Option<VertexCacheHandle>,
    /// Full index count; for a shadow volume this includes both caps.
    pub num_indexes: u32,
    /// Shadow index count without either cap, used for depth-pass volumes.
    pub num_shadow_indexes_no_caps: u32,
    /// Shadow index count without the front cap.
    pub num_shadow_indexes_no_front_caps: u32,
}

/// One renderable surface taking part in the frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawSurface {
    /// Cached geometry.
    pub geometry: SurfaceGeometry,
    /// The entity the surface belongs to.
    pub space: SpaceId,
    /// The surface material; shadow volumes have none.
    pub material: Option<MaterialId>,
    /// Screen-space bounds of the surface.
    pub scissor: ScissorRect,
    /// The view origin is inside this shadow volume, forcing the capped depth-fail path.
    pub view_inside_shadow: bool,
}

/// One visible light and the surfaces it touches.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewLight {
    /// The light material.
    pub light_material: LightMaterialId,
    /// Screen-space bounds of the light.
    pub scissor: ScissorRect,
    /// Window-depth range the light can affect.
    pub depth_bounds: DepthBounds,
    /// World-space origin.
    pub global_light_origin: Vec3,
    /// World-space projection planes S, T, Q and falloff.
    pub light_project: [Vec4; 4],
    /// Surfaces lit by this light and shadowed by global shadows.
    pub local_interactions: Vec<SurfaceId>,
    /// Surfaces lit by this light and shadowed by local shadows.
    pub global_interactions: Vec<SurfaceId>,
    /// Surfaces lit without stencil shadowing.
    pub translucent_interactions: Vec<SurfaceId>,
    /// Shadow volumes that gate global interactions.
    pub local_shadows: Vec<SurfaceId>,
    /// Shadow volumes that gate local interactions.
    pub global_shadows: Vec<SurfaceId>,
}

impl ViewLight {
    /// Creates a light with empty surface lists.
    pub fn new(light_material: LightMaterialId, global_light_origin: Vec3) -> Self {
        Self {
            light_material,
            scissor: ScissorRect::default(),
            depth_bounds: DepthBounds::default(),
            global_light_origin,
            light_project: [Vec4::X, Vec4::Y, Vec4::W, Vec4::Z],
            local_interactions: Vec::new(),
            global_interactions: Vec::new(),
            translucent_interactions: Vec::new(),
            local_shadows: Vec::new(),
            global_shadows: Vec::new(),
        }
    }

    /// Returns `true` if any local shadow volume exists.
    pub fn has_local_shadows(&self) -> bool {
        !self.local_shadows.is_empty()
    }

    /// Returns `true` if any global shadow volume exists.
    pub fn has_global_shadows(&self) -> bool {
        !self.global_shadows.is_empty()
    }

    /// Returns `true` if the light has anything to light.
    pub fn has_interactions(&self) -> bool {
        !self.local_interactions.is_empty()
            || !self.global_interactions.is_empty()
            || !self.translucent_interactions.is_empty()
    }
}

/// Everything the interaction path reads for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewDef {
    /// The viewport in window pixels.
    pub viewport: ScissorRect,
    /// World-space eye position.
    pub view_origin: Vec3,
    /// Entity spaces.
    pub spaces: Vec<ViewEntity>,
    /// All surfaces referenced by any light.
    pub surfaces: Vec<DrawSurface>,
    /// Surface materials.
    pub materials: Vec<SurfaceMaterial>,
    /// Light materials.
    pub light_materials: Vec<LightMaterial>,
    /// Visible lights, in draw order.
    pub lights: Vec<ViewLight>,
}

impl ViewDef {
    /// Creates an empty frame for the given viewport and eye.
    pub fn new(viewport: ScissorRect, view_origin: Vec3) -> Self {
        Self {
            viewport,
            view_origin,
            ..Default::default()
        }
    }

    /// Adds an entity space and returns its id.
    pub fn add_space(&mut self, space: ViewEntity) -> SpaceId {
        self.spaces.push(space);
        SpaceId(self.spaces.len() - 1)
    }

    /// Adds a surface and returns its id.
    pub fn add_surface(&mut self, surface: DrawSurface) -> SurfaceId {
        self.surfaces.push(surface);
        SurfaceId(self.surfaces.len() - 1)
    }

    /// Adds a surface material and returns its id.
    pub fn add_material(&mut self, material: SurfaceMaterial) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    /// Adds a light material and returns its id.
    pub fn add_light_material(&mut self, material: LightMaterial) -> LightMaterialId {
        self.light_materials.push(material);
        LightMaterialId(self.light_materials.len() - 1)
    }

    /// Looks up a surface.
    pub fn surface(&self, id: SurfaceId) -> Option<&DrawSurface> {
        self.surfaces.get(id.0)
    }

    /// Looks up an entity space.
    pub fn space(&self, id: SpaceId) -> Option<&ViewEntity> {
        self.spaces.get(id.0)
    }

    /// Looks up a surface material.
    pub fn material(&self, id: MaterialId) -> Option<&SurfaceMaterial> {
        self.materials.get(id.0)
    }

    /// Looks up a light material.
    pub fn light_material(&self, id: LightMaterialId) -> Option<&LightMaterial> {
        self.light_materials.get(id.0)
    }
}
