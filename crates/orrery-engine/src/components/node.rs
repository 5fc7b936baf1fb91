use glam::Vec3;

use crate::api::types::BodyId;
use crate::components::mesh::Mesh;

/// One orbiting body in the scene: a group transform carrying the body mesh
/// and an optional ring. Only `position` and `spin` change after build.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Back-reference used to resolve picks.
    pub body: BodyId,
    /// Group position in world space.
    pub position: Vec3,
    /// Self-rotation angle of the body mesh about +Y (radians).
    pub spin: f32,
    /// Radians added to `spin` per frame.
    pub spin_rate: f32,
    /// Orbit radius.
    pub distance: f32,
    /// Angular speed (radians per second, before the phase factor).
    pub speed: f32,
    pub mesh: Mesh,
    /// Ring mesh; rides with the group but does not spin.
    pub ring: Option<Mesh>,
}

impl SceneNode {
    /// A node for `body` at the origin.
    pub fn new(body: BodyId, mesh: Mesh) -> Self {
        Self {
            body,
            position: Vec3::ZERO,
            spin: 0.0,
            spin_rate: 0.0,
            distance: 0.0,
            speed: 0.0,
            mesh,
            ring: None,
        }
    }

    // -- Builder pattern --

    pub fn with_orbit(mut self, distance: f32, speed: f32) -> Self {
        self.distance = distance;
        self.speed = speed;
        self
    }

    pub fn with_spin_rate(mut self, spin_rate: f32) -> Self {
        self.spin_rate = spin_rate;
        self
    }

    pub fn with_ring(mut self, ring: Mesh) -> Self {
        self.ring = Some(ring);
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }
}
