//! Per-frame projection of the scene into screen-space primitives.
//!
//! Stars and orbit paths are drawn first, in that order. Spheres and ring
//! segments are then sorted back to front and drawn over them.

use std::f32::consts::TAU;

use glam::{Mat4, Quat, Vec2, Vec3};

use super::camera::CameraRig;
use super::instance::{DiscInstance, QuadInstance, StarPoint};
use crate::api::types::ViewportSize;
use crate::components::mesh::{Geometry, Mesh, Shading};
use crate::core::resources::MaterialId;
use crate::core::scene::SceneGraph;

/// Stars never shrink below one device pixel.
const MIN_STAR_PX: f32 = 1.0;

/// A depth-sorted primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawItem {
    Disc(DiscInstance),
    Quad(QuadInstance),
}

impl DrawItem {
    pub fn depth(&self) -> f32 {
        match self {
            DrawItem::Disc(d) => d.depth,
            DrawItem::Quad(q) => q.depth,
        }
    }
}

/// An open polyline in pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    pub material: MaterialId,
    pub points: Vec<Vec2>,
}

/// Everything a surface needs to draw one frame.
/// Buffers are reused between frames.
pub struct FrameData {
    pub size: ViewportSize,
    pub stars: Vec<StarPoint>,
    pub star_material: Option<MaterialId>,
    pub lines: Vec<Polyline>,
    /// Discs and ring segments, farthest first.
    pub items: Vec<DrawItem>,
}

impl FrameData {
    pub fn new() -> Self {
        Self {
            size: ViewportSize::default(),
            stars: Vec::with_capacity(4096),
            star_material: None,
            lines: Vec::with_capacity(16),
            items: Vec::with_capacity(256),
        }
    }

    pub fn clear(&mut self) {
        self.stars.clear();
        self.star_material = None;
        self.lines.clear();
        self.items.clear();
    }

    pub fn discs(&self) -> impl Iterator<Item = &DiscInstance> {
        self.items.iter().filter_map(|item| match item {
            DrawItem::Disc(d) => Some(d),
            DrawItem::Quad(_) => None,
        })
    }

    pub fn quads(&self) -> impl Iterator<Item = &QuadInstance> {
        self.items.iter().filter_map(|item| match item {
            DrawItem::Quad(q) => Some(q),
            DrawItem::Disc(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty() && self.lines.is_empty() && self.items.is_empty()
    }
}

impl Default for FrameData {
    fn default() -> Self {
        Self::new()
    }
}

/// World to pixel mapping for one frame.
struct Projector {
    view_proj: Mat4,
    width: f32,
    height: f32,
    /// Pixels per world unit at view distance 1.
    focal: f32,
    near: f32,
}

impl Projector {
    fn new(rig: &CameraRig, size: ViewportSize) -> Self {
        let projection = rig.projection();
        Self {
            view_proj: rig.view_projection(),
            width: size.width,
            height: size.height,
            focal: size.height * 0.5 / (projection.fov_y * 0.5).tan(),
            near: projection.near,
        }
    }

    /// Pixel position and view distance, or `None` behind the near plane.
    fn project(&self, p: Vec3) -> Option<(Vec2, f32)> {
        let clip = self.view_proj * p.extend(1.0);
        if clip.w <= self.near {
            return None;
        }
        let inv_w = 1.0 / clip.w;
        let screen = Vec2::new(
            (clip.x * inv_w + 1.0) * 0.5 * self.width,
            (1.0 - clip.y * inv_w) * 0.5 * self.height,
        );
        Some((screen, clip.w))
    }

    fn on_screen(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width && p.y <= self.height
    }
}

/// Build a fresh frame. See [`build_frame_into`].
pub fn build_frame(scene: &SceneGraph, rig: &CameraRig, size: ViewportSize) -> FrameData {
    let mut frame = FrameData::new();
    build_frame_into(&mut frame, scene, rig, size);
    frame
}

/// Project `scene` as seen by `rig` into `frame`, replacing its contents.
///
/// The rig's pose must be current. A degenerate size or a disposed scene
/// yields an empty frame.
pub fn build_frame_into(frame: &mut FrameData, scene: &SceneGraph, rig: &CameraRig, size: ViewportSize) {
    frame.clear();
    frame.size = size;
    if size.is_degenerate() {
        return;
    }
    let projector = Projector::new(rig, size);

    push_stars(frame, &projector, scene);

    let resources = scene.resources();
    for orbit in scene.orbits() {
        if let (Some(Geometry::LineLoop { points }), Some(_)) = (
            resources.geometry(orbit.mesh.geometry),
            resources.material(orbit.mesh.material),
        ) {
            push_polylines(frame, &projector, points, orbit.mesh.material);
        }
    }

    let camera = rig.pose().position;
    // The halo is pushed right after the sun; the stable sort keeps it on top.
    let central = &scene.central;
    push_sphere(frame, &projector, scene, camera, central.mesh, Vec3::ZERO, central.spin);
    push_sphere(frame, &projector, scene, camera, central.halo, Vec3::ZERO, 0.0);
    for node in scene.nodes() {
        push_sphere(frame, &projector, scene, camera, node.mesh, node.position, node.spin);
        if let Some(ring) = node.ring {
            push_ring(frame, &projector, scene, ring, node.position);
        }
    }

    frame.items.sort_by(|a, b| b.depth().total_cmp(&a.depth()));
}

fn push_stars(frame: &mut FrameData, projector: &Projector, scene: &SceneGraph) {
    let resources = scene.resources();
    let (Some(Geometry::Points { positions }), Some(material)) = (
        resources.geometry(scene.stars.geometry),
        resources.material(scene.stars.material),
    ) else {
        return;
    };
    let world_size = match material.shading {
        Shading::Points { size } => size,
        _ => MIN_STAR_PX,
    };
    frame.star_material = Some(scene.stars.material);
    for &p in positions {
        let Some((screen, w)) = projector.project(p) else {
            continue;
        };
        if !projector.on_screen(screen) {
            continue;
        }
        frame.stars.push(StarPoint {
            x: screen.x,
            y: screen.y,
            size: (world_size * projector.height * 0.5 / w).max(MIN_STAR_PX),
            _pad: 0.0,
        });
    }
}

/// Split a world-space polyline at points behind the camera.
fn push_polylines(frame: &mut FrameData, projector: &Projector, points: &[Vec3], material: MaterialId) {
    let mut run = Vec::with_capacity(points.len());
    for &p in points {
        match projector.project(p) {
            Some((screen, _)) => run.push(screen),
            None => {
                if run.len() >= 2 {
                    frame.lines.push(Polyline { material, points: std::mem::take(&mut run) });
                } else {
                    run.clear();
                }
            }
        }
    }
    if run.len() >= 2 {
        frame.lines.push(Polyline { material, points: run });
    }
}

fn push_sphere(
    frame: &mut FrameData,
    projector: &Projector,
    scene: &SceneGraph,
    camera: Vec3,
    mesh: Mesh,
    center: Vec3,
    spin: f32,
) {
    let resources = scene.resources();
    let (Some(&Geometry::Sphere { radius }), Some(material)) = (
        resources.geometry(mesh.geometry),
        resources.material(mesh.material),
    ) else {
        return;
    };
    let Some((screen, w)) = projector.project(center) else {
        return;
    };
    let screen_radius = radius * projector.focal / w;

    let base = material.color;
    let (lit, shadow, highlight, shaded) = match material.shading {
        Shading::Standard { .. } => {
            let lights = &scene.lights;
            let to_light = lights
                .iter()
                .map(|l| (l.position - center).normalize_or_zero() * l.intensity)
                .sum::<Vec3>()
                .normalize_or_zero();
            let normal = if to_light == Vec3::ZERO {
                (camera - center).normalize_or_zero()
            } else {
                to_light
            };
            let lit = lights.shade(base, center + normal * radius, normal);
            let shadow = lights.shade(base, center - normal * radius, -normal);
            let highlight = if to_light == Vec3::ZERO || screen_radius <= 0.0 {
                Vec2::ZERO
            } else {
                projector
                    .project(center + to_light * radius)
                    .map(|(p, _)| ((p - screen) / screen_radius).clamp_length_max(1.0))
                    .unwrap_or(Vec2::ZERO)
            };
            (lit, shadow, highlight, 1.0)
        }
        _ => (base, base, Vec2::ZERO, 0.0),
    };

    frame.items.push(DrawItem::Disc(DiscInstance {
        x: screen.x,
        y: screen.y,
        radius: screen_radius,
        depth: w,
        r: lit.r,
        g: lit.g,
        b: lit.b,
        alpha: material.opacity,
        shadow_r: shadow.r,
        shadow_g: shadow.g,
        shadow_b: shadow.b,
        highlight_x: highlight.x,
        highlight_y: highlight.y,
        spin,
        shaded,
        material: mesh.material.0 as f32,
    }));
}

fn push_ring(frame: &mut FrameData, projector: &Projector, scene: &SceneGraph, mesh: Mesh, center: Vec3) {
    let resources = scene.resources();
    let (Some(&Geometry::Annulus { inner, outer, tilt, segments }), Some(_)) = (
        resources.geometry(mesh.geometry),
        resources.material(mesh.material),
    ) else {
        return;
    };
    let segments = segments.max(3);
    let rotation = Quat::from_rotation_x(tilt);
    let corner = |r: f32, i: usize| {
        let angle = TAU * (i % segments) as f32 / segments as f32;
        center + rotation * Vec3::new(r * angle.cos(), r * angle.sin(), 0.0)
    };

    for i in 0..segments {
        let world = [corner(inner, i), corner(outer, i), corner(outer, i + 1), corner(inner, i + 1)];
        let mut quad = QuadInstance {
            material: mesh.material.0 as f32,
            ..QuadInstance::default()
        };
        let mut visible = true;
        for (slot, &p) in quad.points.iter_mut().zip(world.iter()) {
            match projector.project(p) {
                Some((screen, w)) => {
                    *slot = screen.to_array();
                    quad.depth += w * 0.25;
                }
                None => {
                    visible = false;
                    break;
                }
            }
        }
        if visible {
            frame.items.push(DrawItem::Quad(quad));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::{CameraConfig, SceneConfig};
    use crate::api::types::{BodyId, Rgb};
    use crate::catalog::{BodyDefinition, Catalog};
    use crate::systems::scene_builder::build;

    const VIEWPORT: ViewportSize = ViewportSize { width: 800.0, height: 600.0 };

    fn rig(config: CameraConfig) -> CameraRig {
        let mut rig = CameraRig::new(&config);
        rig.set_viewport(VIEWPORT);
        rig.update();
        rig
    }

    fn probe_scene(distance: f32) -> SceneGraph {
        let catalog = Catalog::new(vec![BodyDefinition {
            id: BodyId::new("probe"),
            name: "Probe".into(),
            radius: 1.0,
            distance,
            color: Rgb::new(0.8, 0.8, 0.8),
            speed: 0.01,
            rotation: 0.03,
            rings: false,
        }])
        .unwrap();
        build(&catalog, &SceneConfig { star_count: 0, ..SceneConfig::default() })
    }

    fn default_scene() -> SceneGraph {
        build(&Catalog::default_planets(), &SceneConfig { star_count: 200, ..SceneConfig::default() })
    }

    #[test]
    fn degenerate_viewport_yields_empty_frame() {
        let scene = default_scene();
        let frame = build_frame(&scene, &rig(CameraConfig::default()), ViewportSize::new(0.0, 600.0));
        assert!(frame.is_empty());
    }

    #[test]
    fn default_view_contains_every_body() {
        let scene = default_scene();
        let frame = build_frame(&scene, &rig(CameraConfig::default()), VIEWPORT);
        // Eight planets plus the sun and its halo.
        assert_eq!(frame.discs().count(), 10);
        assert_eq!(frame.quads().count(), 64);
        assert_eq!(frame.lines.len(), 8);
        assert!(frame.lines.iter().all(|l| l.points.len() == 65));
    }

    #[test]
    fn items_are_sorted_back_to_front() {
        let scene = default_scene();
        let frame = build_frame(&scene, &rig(CameraConfig::default()), VIEWPORT);
        for pair in frame.items.windows(2) {
            assert!(pair[0].depth() >= pair[1].depth());
        }
    }

    #[test]
    fn sun_is_centered_with_perspective_radius() {
        let scene = default_scene();
        let frame = build_frame(&scene, &rig(CameraConfig::default()), VIEWPORT);
        let sun_material = scene.central.mesh.material.0 as f32;
        let sun = frame.discs().find(|d| d.material == sun_material).unwrap();
        assert!((sun.x - 400.0).abs() < 1e-2 && (sun.y - 300.0).abs() < 1e-2);
        let focal = 300.0 / 30.0_f32.to_radians().tan();
        assert!((sun.radius - 5.0 * focal / 58.0).abs() < 1e-2);
        assert!(!sun.is_shaded());
    }

    #[test]
    fn halo_draws_over_the_sun() {
        let scene = default_scene();
        let frame = build_frame(&scene, &rig(CameraConfig::default()), VIEWPORT);
        let sun_material = scene.central.mesh.material.0 as f32;
        let halo_material = scene.central.halo.material.0 as f32;
        let discs: Vec<_> = frame.discs().collect();
        let sun = discs.iter().position(|d| d.material == sun_material).unwrap();
        let halo = discs.iter().position(|d| d.material == halo_material).unwrap();
        assert!(halo > sun);
        assert_eq!(discs[halo].alpha, 0.25);
    }

    #[test]
    fn lit_side_faces_the_sun() {
        let scene = probe_scene(10.0);
        let rig = rig(CameraConfig {
            azimuth: std::f32::consts::FRAC_PI_2,
            elevation: 0.0,
            radius: 50.0,
            ..CameraConfig::default()
        });
        let frame = build_frame(&scene, &rig, VIEWPORT);
        let body_material = scene.nodes()[0].mesh.material.0 as f32;
        let body = frame.discs().find(|d| d.material == body_material).unwrap();
        assert!(body.x > 400.0);
        assert!(body.highlight_x < -0.5);
        assert!(body.highlight_y.abs() < 1e-3);
        assert!(body.r > body.shadow_r);
        assert!(body.is_shaded());
    }

    #[test]
    fn geometry_behind_camera_is_culled() {
        let scene = probe_scene(100.0);
        let rig = rig(CameraConfig {
            azimuth: 0.0,
            elevation: 0.0,
            radius: 50.0,
            ..CameraConfig::default()
        });
        let frame = build_frame(&scene, &rig, VIEWPORT);
        // Only the sun and halo remain.
        assert_eq!(frame.discs().count(), 2);
        let total: usize = frame.lines.iter().map(|l| l.points.len()).sum();
        assert!(total > 0 && total < 65);
        assert!(frame.lines.iter().all(|l| l.points.len() >= 2));
        assert!(frame
            .lines
            .iter()
            .flat_map(|l| l.points.iter())
            .all(|p| p.is_finite()));
    }

    #[test]
    fn stars_land_on_screen() {
        let scene = default_scene();
        let frame = build_frame(&scene, &rig(CameraConfig::default()), VIEWPORT);
        assert!(!frame.stars.is_empty());
        assert_eq!(frame.star_material, Some(scene.stars.material));
        for s in &frame.stars {
            assert!(s.x >= 0.0 && s.x <= 800.0 && s.y >= 0.0 && s.y <= 600.0);
            assert!(s.size >= MIN_STAR_PX);
        }
    }

    #[test]
    fn disposed_scene_draws_nothing() {
        let mut scene = default_scene();
        scene.dispose();
        let frame = build_frame(&scene, &rig(CameraConfig::default()), VIEWPORT);
        assert!(frame.is_empty());
        assert_eq!(frame.star_material, None);
    }

    #[test]
    fn reuse_replaces_previous_contents() {
        let scene = default_scene();
        let rig = rig(CameraConfig::default());
        let mut frame = FrameData::new();
        build_frame_into(&mut frame, &scene, &rig, VIEWPORT);
        let first = frame.items.len();
        build_frame_into(&mut frame, &scene, &rig, VIEWPORT);
        assert_eq!(frame.items.len(), first);
    }
}
