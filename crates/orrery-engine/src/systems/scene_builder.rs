//! Builds the scene graph from the catalog: starfield, central body, lights,
//! one orbit path and one node per body.

use std::f32::consts::TAU;

use glam::Vec3;

use crate::api::config::SceneConfig;
use crate::catalog::Catalog;
use crate::components::mesh::{Geometry, Material, Mesh};
use crate::components::node::SceneNode;
use crate::core::resources::ResourceLedger;
use crate::core::scene::{CentralBody, SceneGraph};
use crate::systems::lighting::{AmbientLight, LightState, PointLight};
use crate::systems::rng::Rng;

/// Sample `segments + 1` points of a circle of `radius` on the XZ plane.
/// The last point equals the first, closing the loop.
pub fn orbit_loop(radius: f32, segments: usize) -> Vec<Vec3> {
    let segments = segments.max(3);
    (0..=segments)
        .map(|i| {
            let angle = TAU * (i % segments) as f32 / segments as f32;
            Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
        })
        .collect()
}

/// Uniformly scatter `count` points inside a cube of edge `extent` centered on the origin.
pub fn scatter_stars(count: usize, extent: f32, seed: u64) -> Vec<Vec3> {
    let mut rng = Rng::new(seed);
    let half = extent / 2.0;
    (0..count)
        .map(|_| Vec3::new(rng.centered(half), rng.centered(half), rng.centered(half)))
        .collect()
}

/// Construct the full scene. Called once per mount.
pub fn build(catalog: &Catalog, config: &SceneConfig) -> SceneGraph {
    let mut ledger = ResourceLedger::new();

    let stars = Mesh::new(
        ledger.add_geometry(Geometry::Points {
            positions: scatter_stars(config.star_count, config.star_extent, config.star_seed),
        }),
        ledger.add_material(Material::points(config.star_color, config.star_size, config.star_opacity)),
    );

    let central = CentralBody {
        mesh: Mesh::new(
            ledger.add_geometry(Geometry::Sphere { radius: config.sun_radius }),
            ledger.add_material(Material::unlit(config.sun_color)),
        ),
        halo: Mesh::new(
            ledger.add_geometry(Geometry::Sphere { radius: config.halo_radius }),
            ledger.add_material(Material::unlit(config.halo_color).with_opacity(config.halo_opacity)),
        ),
        spin: 0.0,
        spin_rate: config.sun_spin,
    };

    let mut lights = LightState::new(AmbientLight {
        color: config.ambient_color,
        intensity: config.ambient_intensity,
    });
    lights.add(PointLight::new(Vec3::ZERO, config.light_color, config.light_intensity));

    // Orbit and ring materials are shared across bodies.
    let orbit_material = ledger.add_material(Material::line(config.orbit_color, config.orbit_opacity));
    let ring_material = catalog.iter().any(|b| b.rings).then(|| {
        ledger.add_material(
            Material::unlit(config.ring_color).with_opacity(config.ring_opacity),
        )
    });

    let mut bodies = Vec::with_capacity(catalog.len());
    for def in catalog.iter() {
        let orbit = Mesh::new(
            ledger.add_geometry(Geometry::LineLoop {
                points: orbit_loop(def.distance, config.orbit_segments),
            }),
            orbit_material,
        );

        let mesh = Mesh::new(
            ledger.add_geometry(Geometry::Sphere { radius: def.radius }),
            ledger.add_material(Material::standard(def.color)),
        );
        let mut node = SceneNode::new(def.id.clone(), mesh)
            .with_orbit(def.distance, def.speed)
            .with_spin_rate(def.rotation)
            .with_position(Vec3::new(def.distance, 0.0, 0.0));

        if let (true, Some(material)) = (def.rings, ring_material) {
            let ring = ledger.add_geometry(Geometry::Annulus {
                inner: def.radius * config.ring_inner,
                outer: def.radius * config.ring_outer,
                tilt: config.ring_tilt,
                segments: config.ring_segments,
            });
            node = node.with_ring(Mesh::new(ring, material));
        }

        bodies.push((node, orbit));
    }

    let mut scene = SceneGraph::new(central, stars, lights, ledger);
    for (node, orbit) in bodies {
        scene.push_body(node, orbit);
    }

    log::info!(
        "scene built: {} bodies, {} geometries, {} materials",
        scene.len(),
        scene.resources().live_geometries(),
        scene.resources().live_materials()
    );
    scene
}
