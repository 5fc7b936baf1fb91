use glam::Vec3;

use crate::api::types::Rgb;
use crate::core::resources::{GeometryId, MaterialId};

/// Shape data for a renderable. Stored once in the resource ledger and
/// referenced by id from meshes.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Sphere centered on the owning node's origin.
    Sphere { radius: f32 },
    /// Flat ring in the node's XY plane, rotated about the X axis by `tilt`.
    Annulus { inner: f32, outer: f32, tilt: f32, segments: usize },
    /// Closed polyline; the last point repeats the first.
    LineLoop { points: Vec<Vec3> },
    /// Point cloud in world space.
    Points { positions: Vec<Vec3> },
}

impl Geometry {
    /// Ray parameter where the ray enters this geometry translated to
    /// `center`. Only solid shapes are hit-testable, and only from outside.
    pub fn intersect_ray(&self, origin: Vec3, dir: Vec3, center: Vec3) -> Option<f32> {
        match *self {
            Geometry::Sphere { radius } => ray_sphere(origin, dir, center, radius),
            _ => None,
        }
    }
}

/// `dir` must be normalized. Returns the entry `t` when it lies ahead of the
/// origin; a ray starting inside the sphere never hits it.
fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    const EPS: f32 = 1e-4;
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t_near = -b - disc.sqrt();
    (t_near > EPS).then_some(t_near)
}

/// Shading model for a material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shading {
    /// Lit by the scene lights.
    Standard { roughness: f32, metalness: f32 },
    /// Flat color, ignores lights.
    Unlit,
    /// Line strokes.
    Line,
    /// Screen-facing points of the given world size.
    Points { size: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Rgb,
    /// 1.0 = opaque.
    pub opacity: f32,
    pub shading: Shading,
}

impl Material {
    pub fn standard(color: Rgb) -> Self {
        Self {
            color,
            opacity: 1.0,
            shading: Shading::Standard { roughness: 0.8, metalness: 0.1 },
        }
    }

    pub fn unlit(color: Rgb) -> Self {
        Self {
            color,
            opacity: 1.0,
            shading: Shading::Unlit,
        }
    }

    pub fn line(color: Rgb, opacity: f32) -> Self {
        Self {
            color,
            opacity,
            shading: Shading::Line,
        }
    }

    pub fn points(color: Rgb, size: f32, opacity: f32) -> Self {
        Self {
            color,
            opacity,
            shading: Shading::Points { size },
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// A geometry paired with a material. Both are ledger handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mesh {
    pub geometry: GeometryId,
    pub material: MaterialId,
}

impl Mesh {
    pub fn new(geometry: GeometryId, material: MaterialId) -> Self {
        Self { geometry, material }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_hits_sphere_front_face() {
        let g = Geometry::Sphere { radius: 1.0 };
        let t = g
            .intersect_ray(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, Vec3::ZERO)
            .unwrap();
        assert!((t - 9.0).abs() < 1e-5);
    }

    #[test]
    fn ray_misses_sphere() {
        let g = Geometry::Sphere { radius: 1.0 };
        let hit = g.intersect_ray(Vec3::new(2.0, 0.0, 10.0), Vec3::NEG_Z, Vec3::ZERO);
        assert!(hit.is_none());
    }

    #[test]
    fn sphere_behind_ray_is_ignored() {
        let g = Geometry::Sphere { radius: 1.0 };
        let hit = g.intersect_ray(Vec3::new(0.0, 0.0, 10.0), Vec3::Z, Vec3::ZERO);
        assert!(hit.is_none());
    }

    #[test]
    fn ray_from_inside_sphere_is_ignored() {
        let g = Geometry::Sphere { radius: 5.0 };
        assert!(g.intersect_ray(Vec3::new(1.0, 0.0, 0.0), Vec3::Y, Vec3::ZERO).is_none());
        assert!(g.intersect_ray(Vec3::ZERO, Vec3::NEG_X, Vec3::ZERO).is_none());
    }

    #[test]
    fn decorations_are_not_hit_testable() {
        let ring = Geometry::Annulus { inner: 1.0, outer: 2.0, tilt: 0.0, segments: 8 };
        assert!(ring.intersect_ray(Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y, Vec3::ZERO).is_none());
        let line = Geometry::LineLoop { points: vec![Vec3::X, Vec3::Z, Vec3::X] };
        assert!(line.intersect_ray(Vec3::ZERO, Vec3::X, Vec3::ZERO).is_none());
    }
}
