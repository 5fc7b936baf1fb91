//! Pointer interaction: drag orbits the camera, wheel zooms, click picks.

use glam::Vec2;

use crate::api::config::InputConfig;
use crate::api::types::{BodyId, ViewportSize};
use crate::core::scene::SceneGraph;
use crate::renderer::camera::CameraRig;
use crate::systems::picking::{self, Ray};

/// Transient drag state; only meaningful between a press and the next release.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerDragState {
    pub dragging: bool,
    pub last: Vec2,
}

/// Translates pointer events into camera changes and pick requests.
pub struct PointerController {
    drag: PointerDragState,
    config: InputConfig,
}

impl PointerController {
    pub fn new(config: InputConfig) -> Self {
        Self {
            drag: PointerDragState::default(),
            config,
        }
    }

    pub fn drag_state(&self) -> PointerDragState {
        self.drag
    }

    pub fn on_pointer_down(&mut self, x: f32, y: f32) {
        self.drag = PointerDragState {
            dragging: true,
            last: Vec2::new(x, y),
        };
    }

    /// No-op unless a drag is active.
    pub fn on_pointer_move(&mut self, x: f32, y: f32, rig: &mut CameraRig) {
        if !self.drag.dragging {
            return;
        }
        let pos = Vec2::new(x, y);
        let delta = pos - self.drag.last;
        rig.rotate(
            -delta.x * self.config.azimuth_sensitivity,
            -delta.y * self.config.elevation_sensitivity,
        );
        self.drag.last = pos;
    }

    pub fn on_pointer_up(&mut self) {
        self.drag = PointerDragState::default();
    }

    pub fn on_wheel(&mut self, delta_y: f32, rig: &mut CameraRig) {
        rig.dolly(delta_y * self.config.zoom_sensitivity);
    }

    /// Resolve the body under viewport pixel (x, y), if any.
    ///
    /// Uses the rig's current pose, so the caller recomputes the pose before
    /// dispatching clicks.
    pub fn on_click(
        &mut self,
        x: f32,
        y: f32,
        viewport: ViewportSize,
        rig: &CameraRig,
        scene: &SceneGraph,
    ) -> Option<BodyId> {
        let ndc = picking::pixel_to_ndc(x, y, viewport)?;
        let ray = Ray::from_ndc(ndc, rig);
        let hit = picking::pick(&ray, scene.pick_candidates());
        log::debug!("pick at ({x:.1}, {y:.1}) ndc {ndc:?}: {hit:?}");
        hit
    }
}

impl Default for PointerController {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}
