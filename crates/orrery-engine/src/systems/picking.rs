//! Ray picking: which body, if any, lies under a screen point.

use glam::{Vec2, Vec3};

use crate::api::types::{BodyId, ViewportSize};
use crate::core::scene::PickCandidate;
use crate::renderer::camera::CameraRig;

/// A ray with a normalized direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    /// Ray from the camera position through the near-plane point under `ndc`.
    pub fn from_ndc(ndc: Vec2, rig: &CameraRig) -> Self {
        let origin = rig.pose().position;
        let through = rig.unproject(ndc.x, ndc.y, 0.0);
        let mut dir = (through - origin).normalize_or_zero();
        if dir == Vec3::ZERO {
            // Near-plane point collapsed onto the eye; fall back to near→far.
            dir = (rig.unproject(ndc.x, ndc.y, 1.0) - through).normalize_or_zero();
        }
        Self { origin, dir }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Viewport pixel coordinates to normalized device coordinates in [-1, 1].
/// Screen y grows downward, device y grows upward. `None` for a degenerate viewport.
pub fn pixel_to_ndc(x: f32, y: f32, size: ViewportSize) -> Option<Vec2> {
    if size.is_degenerate() {
        return None;
    }
    Some(Vec2::new(
        (x / size.width) * 2.0 - 1.0,
        -(y / size.height) * 2.0 + 1.0,
    ))
}

/// Identifier of the nearest candidate hit by `ray`, or `None` on a miss.
pub fn pick<'a>(
    ray: &Ray,
    candidates: impl IntoIterator<Item = PickCandidate<'a>>,
) -> Option<BodyId> {
    if ray.dir == Vec3::ZERO {
        return None;
    }
    candidates
        .into_iter()
        .filter_map(|c| {
            c.geometry
                .intersect_ray(ray.origin, ray.dir, c.center)
                .map(|t| (t, c.body))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, body)| body.clone())
}
