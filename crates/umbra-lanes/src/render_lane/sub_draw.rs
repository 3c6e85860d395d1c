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

//! Expands one (light, surface) pair into the lit draws it needs.
//!
//! Every enabled light stage lights the surface once per surface layer. A layer is
//! a bump map with at most one diffuse and one specular map; a second map of the
//! same kind closes the layer and starts the next one.

use umbra_core::math::{Mat4, Vec4};
use umbra_core::renderer::api::{
    DrawInteraction, GlobalImages, ImageId, InteractionSettings, LightStage, SurfaceId,
    SurfaceStage, StageKind, TextureMatrix, VertexColorMode, ViewDef, ViewLight,
};

/// Light data already moved into the surface's local space.
#[derive(Debug, Clone)]
struct LocalLight {
    surface: SurfaceId,
    light_origin: Vec4,
    view_origin: Vec4,
    projection: [Vec4; 4],
    falloff_image: ImageId,
    model_matrix: Mat4,
}

#[derive(Debug, Clone, Copy)]
struct Layer {
    image: ImageId,
    matrix: [Vec4; 2],
    color: Vec4,
}

/// The interaction being accumulated for the current light stage.
#[derive(Debug, Clone)]
struct Pending {
    light_image: ImageId,
    light_color: Vec4,
    projection: [Vec4; 4],
    bump: Option<Layer>,
    diffuse: Option<Layer>,
    specular: Option<Layer>,
    vertex_color: VertexColorMode,
}

impl Pending {
    fn begin(local: &LocalLight, stage: &LightStage) -> Self {
        let mut projection = local.projection;
        if let Some(matrix) = &stage.texture_matrix {
            let [s, t, q, _] = local.projection;
            let [rs, rt] = matrix.rows;
            projection[0] = s * rs[0] + t * rs[1] + q * rs[2];
            projection[1] = s * rt[0] + t * rt[1] + q * rt[2];
        }
        Self {
            light_image: stage.image,
            light_color: stage.color,
            projection,
            bump: None,
            diffuse: None,
            specular: None,
            vertex_color: VertexColorMode::Ignore,
        }
    }

    fn layer(&self, stage: &SurfaceStage) -> Layer {
        Layer {
            image: stage.image,
            matrix: stage.texture_matrix.to_shader_rows(),
            color: self.light_color.mul_elem(stage.color),
        }
    }

    /// Applies one surface stage, returning the interaction it closed, if any.
    fn apply(
        &mut self,
        stage: &SurfaceStage,
        local: &LocalLight,
        settings: &InteractionSettings,
        globals: &GlobalImages,
    ) -> Option<DrawInteraction> {
        match stage.kind {
            StageKind::Ambient => None,
            StageKind::Bump => {
                let closed = self
                    .bump
                    .is_some()
                    .then(|| self.emit(local, settings, globals))
                    .flatten();
                self.diffuse = None;
                self.specular = None;
                self.bump = Some(self.layer(stage));
                closed
            }
            StageKind::Diffuse => {
                let closed = self
                    .diffuse
                    .is_some()
                    .then(|| self.emit(local, settings, globals))
                    .flatten();
                self.diffuse = Some(self.layer(stage));
                self.vertex_color = stage.vertex_color;
                closed
            }
            StageKind::Specular => {
                let closed = self
                    .specular
                    .is_some()
                    .then(|| self.emit(local, settings, globals))
                    .flatten();
                self.specular = Some(self.layer(stage));
                self.vertex_color = stage.vertex_color;
                closed
            }
        }
    }

    /// Builds the draw for the current layer. Nothing is drawn without a bump map.
    fn emit(
        &self,
        local: &LocalLight,
        settings: &InteractionSettings,
        globals: &GlobalImages,
    ) -> Option<DrawInteraction> {
        let bump = self.bump?;
        let identity = TextureMatrix::IDENTITY.to_shader_rows();
        let fill = |layer: Option<Layer>, skip: bool| match layer {
            Some(l) if !skip => l,
            Some(l) => Layer {
                image: globals.black,
                ..l
            },
            None => Layer {
                image: globals.black,
                matrix: identity,
                color: Vec4::ZERO,
            },
        };
        let diffuse = fill(self.diffuse, settings.skip_diffuse);
        let specular = fill(self.specular, settings.skip_specular);

        Some(DrawInteraction {
            surface: local.surface,
            local_light_origin: local.light_origin,
            local_view_origin: local.view_origin,
            light_projection: self.projection,
            bump_matrix: bump.matrix,
            diffuse_matrix: diffuse.matrix,
            specular_matrix: specular.matrix,
            vertex_color: self.vertex_color,
            diffuse_color: diffuse.color,
            specular_color: specular.color,
            bump_image: if settings.skip_bump {
                globals.flat_normal
            } else {
                bump.image
            },
            light_falloff_image: local.falloff_image,
            light_image: self.light_image,
            diffuse_image: diffuse.image,
            specular_image: specular.image,
            model_matrix: local.model_matrix,
        })
    }
}

/// Iterator over the [`DrawInteraction`]s of one surface under one light.
#[derive(Debug, Clone)]
pub struct SubDraws<'a> {
    local: Option<LocalLight>,
    light_stages: std::slice::Iter<'a, LightStage>,
    surface_stages: &'a [SurfaceStage],
    settings: &'a InteractionSettings,
    globals: &'a GlobalImages,
    cursor: usize,
    pending: Option<Pending>,
}

impl<'a> SubDraws<'a> {
    /// Prepares the sub-draws of `surface` lit by `light`.
    ///
    /// Yields nothing if the surface has no material or if any arena reference
    /// cannot be resolved.
    pub fn new(
        view: &'a ViewDef,
        light: &'a ViewLight,
        surface: SurfaceId,
        settings: &'a InteractionSettings,
        globals: &'a GlobalImages,
    ) -> Self {
        let mut draws = Self {
            local: None,
            light_stages: Default::default(),
            surface_stages: &[],
            settings,
            globals,
            cursor: 0,
            pending: None,
        };

        let Some(surf) = view.surface(surface) else {
            log::warn!("Sub-draws: surface {surface:?} is not in the frame");
            return draws;
        };
        let Some(material) = surf.material.and_then(|id| view.material(id)) else {
            return draws;
        };
        let Some(light_material) = view.light_material(light.light_material) else {
            log::warn!(
                "Sub-draws: light material {:?} is not in the frame",
                light.light_material
            );
            return draws;
        };
        let Some(space) = view.space(surf.space) else {
            log::warn!("Sub-draws: space {:?} is not in the frame", surf.space);
            return draws;
        };
        let model = space.model_matrix;
        let Some(inverse) = model.affine_inverse() else {
            log::warn!("Sub-draws: surface {surface:?} has a degenerate model matrix");
            return draws;
        };

        draws.local = Some(LocalLight {
            surface,
            light_origin: inverse
                .transform_point(light.global_light_origin)
                .extend(0.0),
            view_origin: inverse.transform_point(view.view_origin).extend(1.0),
            projection: light.light_project.map(|plane| model.global_plane_to_local(plane)),
            falloff_image: light_material.falloff_image,
            model_matrix: model,
        });
        draws.light_stages = light_material.stages.iter();
        draws.surface_stages = &material.stages;
        draws
    }
}

impl Iterator for SubDraws<'_> {
    type Item = DrawInteraction;

    fn next(&mut self) -> Option<DrawInteraction> {
        let local = self.local.as_ref()?;
        loop {
            if self.pending.is_none() {
                let stage = self.light_stages.by_ref().find(|s| s.enabled)?;
                self.pending = Some(Pending::begin(local, stage));
                self.cursor = 0;
            }
            let pending = self.pending.as_mut()?;

            while let Some(stage) = self.surface_stages.get(self.cursor) {
                self.cursor += 1;
                if !stage.enabled {
                    continue;
                }
                if let Some(closed) = pending.apply(stage, local, self.settings, self.globals) {
                    return Some(closed);
                }
            }

            let last = pending.emit(local, self.settings, self.globals);
            self.pending = None;
            if last.is_some() {
                return last;
            }
        }
    }
}
