use glam::Vec3;

use crate::api::types::BodyId;
use crate::components::mesh::{Geometry, Mesh};
use crate::components::node::SceneNode;
use crate::core::resources::{ReleaseReport, ResourceLedger};
use crate::systems::lighting::LightState;

/// The fixed, non-orbiting light-emitting body at the origin.
#[derive(Debug, Clone)]
pub struct CentralBody {
    pub mesh: Mesh,
    /// Translucent glow sphere around the central body.
    pub halo: Mesh,
    /// Self-rotation about +Y (radians).
    pub spin: f32,
    /// Radians added to `spin` per frame.
    pub spin_rate: f32,
}

/// Orbit path decoration for one body.
#[derive(Debug, Clone)]
pub struct OrbitPath {
    pub body: BodyId,
    pub mesh: Mesh,
}

/// A body mesh eligible for hit testing, resolved to world space.
#[derive(Debug, Clone, Copy)]
pub struct PickCandidate<'a> {
    pub body: &'a BodyId,
    pub center: Vec3,
    pub geometry: &'a Geometry,
}

/// Everything drawn in the viewport.
///
/// Nodes are kept in catalog order in a flat Vec; after build only node
/// transforms and spin angles are mutated.
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    orbits: Vec<OrbitPath>,
    pub central: CentralBody,
    pub stars: Mesh,
    pub lights: LightState,
    resources: ResourceLedger,
}

impl SceneGraph {
    pub fn new(
        central: CentralBody,
        stars: Mesh,
        lights: LightState,
        resources: ResourceLedger,
    ) -> Self {
        Self {
            nodes: Vec::new(),
            orbits: Vec::new(),
            central,
            stars,
            lights,
            resources,
        }
    }

    /// Append a body node together with its orbit path.
    pub fn push_body(&mut self, node: SceneNode, orbit: Mesh) {
        self.orbits.push(OrbitPath {
            body: node.body.clone(),
            mesh: orbit,
        });
        self.nodes.push(node);
    }

    pub fn get(&self, id: &BodyId) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| &n.body == id)
    }

    pub fn get_mut(&mut self, id: &BodyId) -> Option<&mut SceneNode> {
        self.nodes.iter_mut().find(|n| &n.body == id)
    }

    /// Body nodes in catalog order.
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut SceneNode> {
        self.nodes.iter_mut()
    }

    pub fn orbits(&self) -> &[OrbitPath] {
        &self.orbits
    }

    pub fn resources(&self) -> &ResourceLedger {
        &self.resources
    }

    /// Body meshes only. Orbits, rings, stars, the central body and its
    /// halo are never candidates.
    pub fn pick_candidates(&self) -> impl Iterator<Item = PickCandidate<'_>> {
        self.nodes.iter().filter_map(move |node| {
            self.resources
                .geometry(node.mesh.geometry)
                .map(|geometry| PickCandidate {
                    body: &node.body,
                    center: node.position,
                    geometry,
                })
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Release every geometry and material. The graph is unusable afterwards
    /// for drawing and picking; a second call releases nothing.
    pub fn dispose(&mut self) -> ReleaseReport {
        self.resources.release_all()
    }
}
