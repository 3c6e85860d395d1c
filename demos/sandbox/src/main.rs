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

// Umbra Sandbox
// Draws a small demo room through the interaction agent and reports what it recorded.
//
// Usage: sandbox [settings.ron] [shader root]

use anyhow::{bail, Result};
use std::path::Path;
use umbra_agents::InteractionRenderAgent;
use umbra_core::math::{Mat4, Vec3, Vec4};
use umbra_core::renderer::api::{
    DepthBounds, DrawSurface, DrawVert, GlobalImages, ImageId, LightMaterial, LightStage,
    MaterialId, ScissorRect, ShadowVert, SpaceId, StageKind, SurfaceGeometry, SurfaceId,
    SurfaceMaterial, SurfaceStage, TextureMatrix, VertexColorMode, ViewDef, ViewEntity,
    ViewLight,
};
use umbra_infra::config::load_settings_or_default;
use umbra_infra::vfs::{DirectorySourceProvider, LayeredSourceProvider};
use umbra_infra::{recording_backend, MemoryVertexCache};
use umbra_lanes::render_lane::shaders::builtin_sources;

const FRAMES: u32 = 3;
const DEFAULT_SETTINGS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/settings.ron");

const GLOBAL_IMAGES: GlobalImages = GlobalImages {
    specular_table: ImageId(1000),
    black: ImageId(1001),
    flat_normal: ImageId(1002),
};

fn quad(cache: &mut MemoryVertexCache, origin: Vec3, u: Vec3, v: Vec3) -> SurfaceGeometry {
    let normal = u.cross(v).normalize();
    let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
    let verts: Vec<DrawVert> = corners
        .iter()
        .map(|&(s, t)| DrawVert {
            xyz: origin + u * s + v * t,
            st: [s, t],
            normal,
            tangents: [u.normalize(), v.normalize()],
            color: [255, 255, 255, 255],
        })
        .collect();
    SurfaceGeometry {
        ambient_cache: Some(cache.upload(&verts)),
        index_cache: Some(cache.upload_indexes(&[0, 1, 2, 0, 2, 3])),
        num_indexes: 6,
        ..Default::default()
    }
}

/// A box extruded away from the light: four capped front vertices, four at infinity.
fn shadow_box(cache: &mut MemoryVertexCache, min: Vec3, size: f32) -> SurfaceGeometry {
    let mut verts = Vec::with_capacity(8);
    for w in [1.0, 0.0] {
        for (x, y) in [(0.0, 0.0), (size, 0.0), (size, size), (0.0, size)] {
            verts.push(ShadowVert {
                xyzw: Vec4::new(min.x + x, min.y + y, min.z, w),
            });
        }
    }
    let sides: [u32; 24] = [
        0, 1, 5, 0, 5, 4, 1, 2, 6, 1, 6, 5, 2, 3, 7, 2, 7, 6, 3, 0, 4, 3, 4, 7,
    ];
    let caps: [u32; 12] = [0, 2, 1, 0, 3, 2, 4, 5, 6, 4, 6, 7];
    let indexes: Vec<u32> = sides.iter().chain(caps.iter()).copied().collect();
    SurfaceGeometry {
        shadow_cache: Some(cache.upload(&verts)),
        index_cache: Some(cache.upload_indexes(&indexes)),
        num_indexes: indexes.len() as u32,
        num_shadow_indexes_no_caps: sides.len() as u32,
        num_shadow_indexes_no_front_caps: (sides.len() + 6) as u32,
        ..Default::default()
    }
}

fn surface(
    view: &mut ViewDef,
    geometry: SurfaceGeometry,
    space: SpaceId,
    material: Option<MaterialId>,
) -> SurfaceId {
    view.add_surface(DrawSurface {
        geometry,
        space,
        material,
        scissor: ScissorRect::new(0, 0, 1280, 720),
        view_inside_shadow: false,
    })
}

fn build_room(cache: &mut MemoryVertexCache) -> ViewDef {
    let mut view = ViewDef::new(ScissorRect::new(0, 0, 1280, 720), Vec3::new(0.0, -200.0, 64.0));
    let world = view.add_space(ViewEntity::default());
    let crate_space = view.add_space(ViewEntity {
        model_matrix: Mat4::from_translation(Vec3::new(40.0, 40.0, 0.0))
            * Mat4::from_rotation_z(0.4),
        model_view_matrix: Mat4::from_translation(Vec3::new(40.0, 40.0, -200.0)),
    });

    let wall = view.add_material(SurfaceMaterial {
        name: "textures/base_wall/lfwall27d".to_string(),
        stages: vec![
            SurfaceStage::new(StageKind::Bump, ImageId(1)),
            SurfaceStage::new(StageKind::Diffuse, ImageId(2)),
            SurfaceStage::new(StageKind::Specular, ImageId(3))
                .with_color(Vec4::new(0.6, 0.6, 0.6, 1.0)),
        ],
    });
    let floor = view.add_material(SurfaceMaterial {
        name: "textures/base_floor/a_stairs1".to_string(),
        stages: vec![
            SurfaceStage::new(StageKind::Bump, ImageId(4))
                .with_texture_matrix(TextureMatrix::scale_translate(4.0, 4.0, 0.0, 0.0)),
            SurfaceStage::new(StageKind::Diffuse, ImageId(5))
                .with_texture_matrix(TextureMatrix::scale_translate(4.0, 4.0, 0.0, 0.0)),
            SurfaceStage::new(StageKind::Bump, ImageId(6)),
            SurfaceStage::new(StageKind::Diffuse, ImageId(7))
                .with_vertex_color(VertexColorMode::Modulate),
        ],
    });
    let glass = view.add_material(SurfaceMaterial {
        name: "textures/glass/glass1".to_string(),
        stages: vec![
            SurfaceStage::new(StageKind::Bump, ImageId(8)),
            SurfaceStage::new(StageKind::Specular, ImageId(9)),
        ],
    });

    let back = quad(
        cache,
        Vec3::new(-128.0, 128.0, 0.0),
        Vec3::new(256.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 128.0),
    );
    let back = surface(&mut view, back, world, Some(wall));
    let ground = quad(
        cache,
        Vec3::new(-128.0, -128.0, 0.0),
        Vec3::new(256.0, 0.0, 0.0),
        Vec3::new(0.0, 256.0, 0.0),
    );
    let ground = surface(&mut view, ground, world, Some(floor));
    let pane = quad(
        cache,
        Vec3::new(-64.0, -32.0, 0.0),
        Vec3::new(64.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 96.0),
    );
    let pane = surface(&mut view, pane, world, Some(glass));
    let crate_box = shadow_box(cache, Vec3::new(-16.0, -16.0, 0.0), 32.0);
    let crate_shadow = surface(&mut view, crate_box, crate_space, None);
    let crate_top = quad(
        cache,
        Vec3::new(-16.0, -16.0, 32.0),
        Vec3::new(32.0, 0.0, 0.0),
        Vec3::new(0.0, 32.0, 0.0),
    );
    let crate_top = surface(&mut view, crate_top, crate_space, Some(wall));

    let round = view.add_light_material(LightMaterial {
        name: "lights/roundfire".to_string(),
        is_fog: false,
        is_blend: false,
        falloff_image: ImageId(60),
        stages: vec![LightStage {
            enabled: true,
            color: Vec4::new(1.0, 0.8, 0.6, 1.0),
            image: ImageId(61),
            texture_matrix: None,
        }],
    });
    let fog = view.add_light_material(LightMaterial {
        name: "fogs/basicfog".to_string(),
        is_fog: true,
        is_blend: false,
        falloff_image: ImageId(62),
        stages: Vec::new(),
    });

    let mut lamp = ViewLight::new(round, Vec3::new(0.0, 0.0, 110.0));
    lamp.scissor = ScissorRect::new(200, 100, 880, 520);
    lamp.depth_bounds = DepthBounds { min: 0.1, max: 0.9 };
    lamp.local_interactions = vec![back, ground];
    lamp.global_interactions = vec![crate_top];
    lamp.translucent_interactions = vec![pane];
    lamp.global_shadows = vec![crate_shadow];
    view.lights.push(lamp);

    let mut haze = ViewLight::new(fog, Vec3::new(0.0, 0.0, 64.0));
    haze.local_interactions = vec![ground];
    view.lights.push(haze);

    view
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let settings_path = args.next().unwrap_or_else(|| DEFAULT_SETTINGS.to_string());
    let settings = load_settings_or_default(Path::new(&settings_path));
    let mut sources = LayeredSourceProvider::new();
    if let Some(root) = args.next() {
        sources = sources.with_layer(DirectorySourceProvider::new(root));
    }
    let sources = sources.with_layer(builtin_sources());

    let (mut gpu, mut images, recorder) = recording_backend();
    let mut agent = InteractionRenderAgent::new(sources, settings, GLOBAL_IMAGES);
    if let Err(e) = agent.init_shader_programs(&mut gpu) {
        bail!("interaction path unavailable: {e}");
    }

    let mut cache = MemoryVertexCache::new();
    let view = build_room(&mut cache);
    log::info!(
        "Demo room: {} surfaces, {} lights, {} bytes of geometry",
        view.surfaces.len(),
        view.lights.len(),
        cache.used_bytes()
    );

    for frame in 1..=FRAMES {
        recorder.clear();
        agent.draw_all_light_interactions(&mut gpu, &mut images, &cache, &view);
        let stats = agent.stats();
        log::info!(
            "Frame {frame}: {} commands, {} lights drawn, {} skipped, {} interaction / {} shadow / {} translucent draws, {} indexes",
            recorder.len(),
            stats.lights_processed,
            stats.lights_skipped,
            stats.interaction_draws,
            stats.shadow_draws,
            stats.translucent_draws,
            stats.indexes
        );
    }

    agent.reload_shader_programs(&mut gpu);
    agent.shutdown(&mut gpu);
    Ok(())
}
