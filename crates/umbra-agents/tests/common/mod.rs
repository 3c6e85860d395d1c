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

//! Scene fixtures shared by the agent integration tests.

#![allow(dead_code)]

use umbra_agents::InteractionRenderAgent;
use umbra_core::math::{Mat4, Vec3, Vec4};
use umbra_core::renderer::api::{
    BufferId, DrawSurface, DrawVert, GlobalImages, ImageId, InteractionSettings, LightMaterial,
    LightMaterialId, LightStage, MaterialId, ScissorRect, ShadowVert, SpaceId, StageKind,
    SurfaceGeometry, SurfaceId, SurfaceMaterial, SurfaceStage, VertexColorMode, ViewDef,
    ViewEntity, ViewLight,
};
use umbra_infra::{
    recording_backend, CommandRecorder, GpuCommand, MemoryVertexCache, RecordingContext,
    RecordingImageBinder,
};
use umbra_lanes::render_lane::shaders::builtin_sources;

pub const GLOBALS: GlobalImages = GlobalImages {
    specular_table: ImageId(900),
    black: ImageId(901),
    flat_normal: ImageId(902),
};

/// Light material slots created by [`Scene::new`].
pub const ROUND_LIGHT: LightMaterialId = LightMaterialId(0);
pub const FOG_LIGHT: LightMaterialId = LightMaterialId(1);
pub const BLEND_LIGHT: LightMaterialId = LightMaterialId(2);

/// Surface material slots created by [`Scene::new`].
pub const WALL: MaterialId = MaterialId(0);
pub const MODULATED_WALL: MaterialId = MaterialId(1);
pub const TWO_LAYER_WALL: MaterialId = MaterialId(2);

/// A frame under construction plus the geometry it references.
pub struct Scene {
    pub view: ViewDef,
    pub cache: MemoryVertexCache,
    pub space: SpaceId,
}

impl Scene {
    pub fn new() -> Self {
        let mut view = ViewDef::new(ScissorRect::new(0, 0, 800, 600), Vec3::new(0.0, -128.0, 32.0));
        let space = view.add_space(ViewEntity {
            model_matrix: Mat4::from_translation(Vec3::new(16.0, 0.0, 0.0)),
            model_view_matrix: Mat4::IDENTITY,
        });

        view.add_material(SurfaceMaterial {
            name: "textures/base_wall/lfwall13".to_string(),
            stages: vec![
                SurfaceStage::new(StageKind::Bump, ImageId(1)),
                SurfaceStage::new(StageKind::Diffuse, ImageId(2)),
                SurfaceStage::new(StageKind::Specular, ImageId(3)),
            ],
        });
        view.add_material(SurfaceMaterial {
            name: "textures/decals/blood".to_string(),
            stages: vec![
                SurfaceStage::new(StageKind::Bump, ImageId(4)),
                SurfaceStage::new(StageKind::Diffuse, ImageId(5))
                    .with_vertex_color(VertexColorMode::Modulate),
            ],
        });
        view.add_material(SurfaceMaterial {
            name: "textures/base_floor/grate".to_string(),
            stages: vec![
                SurfaceStage::new(StageKind::Bump, ImageId(6)),
                SurfaceStage::new(StageKind::Diffuse, ImageId(7)),
                SurfaceStage::new(StageKind::Bump, ImageId(8)),
                SurfaceStage::new(StageKind::Diffuse, ImageId(9)),
            ],
        });

        for (name, is_fog, is_blend) in [
            ("lights/round", false, false),
            ("fogs/basic", true, false),
            ("lights/blend", false, true),
        ] {
            view.add_light_material(LightMaterial {
                name: name.to_string(),
                is_fog,
                is_blend,
                falloff_image: ImageId(50),
                stages: vec![LightStage {
                    enabled: true,
                    color: Vec4::new(1.0, 0.9, 0.8, 1.0),
                    image: ImageId(51),
                    texture_matrix: None,
                }],
            });
        }

        Self {
            view,
            cache: MemoryVertexCache::new(),
            space,
        }
    }

    /// Adds a lit quad drawn with `material`.
    pub fn receiver(&mut self, material: MaterialId) -> SurfaceId {
        let verts: Vec<DrawVert> = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(64.0, 0.0, 0.0),
            Vec3::new(64.0, 0.0, 64.0),
            Vec3::new(0.0, 0.0, 64.0),
        ]
        .into_iter()
        .map(|xyz| DrawVert {
            xyz,
            normal: Vec3::new(0.0, -1.0, 0.0),
            tangents: [Vec3::X, Vec3::Z],
            color: [255; 4],
            ..Default::default()
        })
        .collect();
        let geometry = SurfaceGeometry {
            ambient_cache: Some(self.cache.upload(&verts)),
            index_cache: Some(self.cache.upload_indexes(&[0, 1, 2, 0, 2, 3])),
            num_indexes: 6,
            ..Default::default()
        };
        self.view.add_surface(DrawSurface {
            geometry,
            space: self.space,
            material: Some(material),
            scissor: ScissorRect::new(0, 0, 400, 300),
            view_inside_shadow: false,
        })
    }

    /// Adds an extruded shadow volume.
    pub fn caster(&mut self, view_inside_shadow: bool) -> SurfaceId {
        let verts: Vec<ShadowVert> = (0..8)
            .map(|i| ShadowVert {
                xyzw: Vec4::new(i as f32, 0.0, 0.0, if i < 4 { 1.0 } else { 0.0 }),
            })
            .collect();
        let indexes: Vec<u32> = (0..36).map(|i| i % 8).collect();
        let geometry = SurfaceGeometry {
            shadow_cache: Some(self.cache.upload(&verts)),
            index_cache: Some(self.cache.upload_indexes(&indexes)),
            num_indexes: 36,
            num_shadow_indexes_no_caps: 24,
            num_shadow_indexes_no_front_caps: 30,
            ..Default::default()
        };
        self.view.add_surface(DrawSurface {
            geometry,
            space: self.space,
            material: None,
            scissor: ScissorRect::new(10, 10, 100, 100),
            view_inside_shadow,
        })
    }

    /// Adds a light and returns a mutable handle to fill its lists.
    pub fn light(&mut self, material: LightMaterialId) -> &mut ViewLight {
        let mut light = ViewLight::new(material, Vec3::new(32.0, -32.0, 32.0));
        light.scissor = ScissorRect::new(0, 0, 400, 300);
        self.view.lights.push(light);
        let last = self.view.lights.len() - 1;
        &mut self.view.lights[last]
    }

    /// The buffer an index cache handle resolves to.
    pub fn index_buffer(&self, surface: SurfaceId) -> BufferId {
        let handle = self.view.surfaces[surface.0]
            .geometry
            .index_cache
            .expect("surface has indexes");
        BufferId(handle.0)
    }
}

/// A recording backend plus an agent built from the built-in sources.
pub struct Harness {
    pub gpu: RecordingContext,
    pub images: RecordingImageBinder,
    pub recorder: CommandRecorder,
    pub agent: InteractionRenderAgent,
}

impl Harness {
    pub fn new(settings: InteractionSettings) -> Self {
        let (gpu, images, recorder) = recording_backend();
        Self {
            gpu,
            images,
            recorder,
            agent: InteractionRenderAgent::new(builtin_sources(), settings, GLOBALS),
        }
    }

    /// Creates the harness, initialises the programs and clears the init commands.
    pub fn ready(settings: InteractionSettings) -> Self {
        let mut harness = Self::new(settings);
        harness
            .agent
            .init_shader_programs(&mut harness.gpu)
            .expect("built-in programs build");
        harness.recorder.clear();
        harness
    }

    pub fn draw(&mut self, scene: &Scene) -> Vec<GpuCommand> {
        self.agent.draw_all_light_interactions(
            &mut self.gpu,
            &mut self.images,
            &scene.cache,
            &scene.view,
        );
        self.recorder.take()
    }
}

/// Index buffers of every draw, in order.
pub fn drawn_buffers(commands: &[GpuCommand]) -> Vec<BufferId> {
    commands
        .iter()
        .filter_map(|c| match c {
            GpuCommand::DrawElements { indexes, .. } => Some(indexes.buffer),
            _ => None,
        })
        .collect()
}
