//! Viewport lifecycle: mount, per-frame update, unmount.
//!
//! Everything that only exists while mounted lives in one [`FrameContext`],
//! created by [`Viewport::start`] and torn down by [`Viewport::stop`].

use crate::api::config::EngineConfig;
use crate::api::types::{BodyId, ViewportSize};
use crate::catalog::Catalog;
use crate::core::resources::ReleaseReport;
use crate::core::scene::SceneGraph;
use crate::core::time::spin_steps;
use crate::error::{HostError, ViewportError};
use crate::input::controller::PointerController;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::camera::CameraRig;
use crate::renderer::frame::{build_frame_into, FrameData};
use crate::renderer::traits::Surface;
use crate::runtime::host::{Host, ListenerHandle, ListenerKind};
use crate::runtime::render_loop::RenderLoop;
use crate::systems::{orbit, scene_builder};

/// Invoked with the id of each picked body.
pub type PickCallback = Box<dyn FnMut(&BodyId)>;
/// Invoked once, after the first frame has been scheduled.
pub type ReadyCallback = Box<dyn FnOnce()>;

/// State owned for the duration of one mount.
pub struct FrameContext<S: Surface> {
    pub scene: SceneGraph,
    pub rig: CameraRig,
    pub controller: PointerController,
    pub surface: S,
    /// Last non-degenerate container size.
    pub size: ViewportSize,
    frame: FrameData,
    listeners: Vec<ListenerHandle>,
}

impl<S: Surface> FrameContext<S> {
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn frame(&self) -> &FrameData {
        &self.frame
    }

    /// Apply a new container size. Degenerate sizes are skipped entirely.
    fn apply_resize(&mut self, size: ViewportSize) {
        if !self.rig.set_viewport(size) {
            log::debug!("skipping degenerate resize {}x{}", size.width, size.height);
            return;
        }
        self.size = size;
        self.surface.resize(size);
    }
}

/// The embeddable diagram.
pub struct Viewport<H: Host> {
    host: H,
    catalog: Catalog,
    config: EngineConfig,
    queue: InputQueue,
    render_loop: RenderLoop,
    context: Option<FrameContext<H::Surface>>,
    on_pick: PickCallback,
    on_ready: Option<ReadyCallback>,
}

impl<H: Host> Viewport<H> {
    pub fn new(
        host: H,
        catalog: Catalog,
        config: EngineConfig,
        on_pick: impl FnMut(&BodyId) + 'static,
    ) -> Self {
        Self {
            host,
            catalog,
            config,
            queue: InputQueue::new(),
            render_loop: RenderLoop::new(),
            context: None,
            on_pick: Box::new(on_pick),
            on_ready: None,
        }
    }

    pub fn with_ready(mut self, on_ready: impl FnOnce() + 'static) -> Self {
        self.on_ready = Some(Box::new(on_ready));
        self
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.context.is_some()
    }

    pub fn context(&self) -> Option<&FrameContext<H::Surface>> {
        self.context.as_ref()
    }

    /// Mount: create the surface, register listeners, build the scene and
    /// start the loop. A call while mounted does nothing.
    ///
    /// On error nothing stays registered and the viewport remains unmounted.
    pub fn start(&mut self) -> Result<(), ViewportError> {
        if self.context.is_some() {
            return Ok(());
        }

        let size = self.host.measure();
        let mut surface = self.host.create_surface(size)?;
        log::info!(
            "surface created ({}, {}x{})",
            surface.backend(),
            size.width,
            size.height
        );

        let listeners = match self.register_listeners() {
            Ok(listeners) => listeners,
            Err(err) => {
                surface.release();
                return Err(err.into());
            }
        };

        let scene = scene_builder::build(&self.catalog, &self.config.scene);
        surface.prepare(&scene);

        let mut rig = CameraRig::new(&self.config.camera);
        let mut measured = ViewportSize::default();
        if rig.set_viewport(size) {
            measured = size;
            surface.resize(size);
        } else {
            log::debug!("container measured degenerate at start");
        }
        rig.update();

        let context = FrameContext {
            scene,
            rig,
            controller: PointerController::new(self.config.input),
            surface,
            size: measured,
            frame: FrameData::new(),
            listeners,
        };
        self.queue.clear();
        self.context = Some(context);

        if let Err(err) = self.render_loop.start(&mut self.host) {
            let _ = self.teardown();
            return Err(err.into());
        }
        log::info!(
            "viewport started: {} bodies, {} listeners",
            self.catalog.len(),
            self.context.as_ref().map_or(0, FrameContext::listener_count)
        );

        if let Some(on_ready) = self.on_ready.take() {
            on_ready();
        }
        Ok(())
    }

    fn register_listeners(&mut self) -> Result<Vec<ListenerHandle>, HostError> {
        let mut handles = Vec::with_capacity(ListenerKind::ALL.len());
        for kind in ListenerKind::ALL {
            match self.host.add_listener(kind.target(), kind) {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    for handle in handles {
                        self.host.remove_listener(handle);
                    }
                    return Err(err);
                }
            }
        }
        Ok(handles)
    }

    /// Unmount: stop the loop, remove listeners, release the surface and
    /// dispose the scene. Safe to call repeatedly.
    ///
    /// Returns what the scene released, or `None` if nothing was mounted.
    pub fn stop(&mut self) -> Option<ReleaseReport> {
        if self.context.is_none() {
            return None;
        }
        self.teardown()
    }

    fn teardown(&mut self) -> Option<ReleaseReport> {
        self.render_loop.stop(&mut self.host);
        let mut context = self.context.take()?;
        let listeners = context.listeners.len();
        for handle in context.listeners.drain(..) {
            self.host.remove_listener(handle);
        }
        context.surface.release();
        let report = context.scene.dispose();
        self.queue.clear();
        log::info!(
            "viewport stopped: {} listeners removed, released {} geometries and {} materials",
            listeners,
            report.geometries,
            report.materials
        );
        Some(report)
    }

    /// Queue a host event for the next frame. Dropped while unmounted.
    pub fn push_input(&mut self, event: InputEvent) {
        if self.context.is_none() {
            log::warn!("input after unmount ignored: {event:?}");
            return;
        }
        self.queue.push(event);
    }

    /// Re-measure the container now.
    pub fn resize(&mut self) {
        let size = self.host.measure();
        if let Some(context) = self.context.as_mut() {
            context.apply_resize(size);
        }
    }

    /// Host frame callback: drain input, simulate, update the camera, draw,
    /// and schedule the next frame.
    pub fn on_frame(&mut self, now_ms: f64) {
        let Some(tick) = self.render_loop.frame(now_ms) else {
            log::warn!("frame delivered after stop ignored");
            return;
        };
        let Some(context) = self.context.as_mut() else {
            return;
        };

        for event in self.queue.drain() {
            match event {
                InputEvent::PointerDown { x, y } => context.controller.on_pointer_down(x, y),
                InputEvent::PointerMove { x, y } => {
                    context.controller.on_pointer_move(x, y, &mut context.rig)
                }
                InputEvent::PointerUp => context.controller.on_pointer_up(),
                InputEvent::Wheel { delta_y } => context.controller.on_wheel(delta_y, &mut context.rig),
                InputEvent::Click { x, y } => {
                    context.rig.update();
                    let hit = context.controller.on_click(
                        x,
                        y,
                        context.size,
                        &context.rig,
                        &context.scene,
                    );
                    if let Some(body) = hit {
                        (self.on_pick)(&body);
                    }
                }
                InputEvent::Resize(size) => context.apply_resize(size),
            }
        }

        orbit::advance(
            &mut context.scene,
            tick.elapsed,
            spin_steps(self.config.spin, tick.dt),
        );
        context.rig.update();
        build_frame_into(&mut context.frame, &context.scene, &context.rig, context.size);
        context.surface.draw(&context.frame);

        if let Err(err) = self.render_loop.rearm(&mut self.host) {
            log::error!("{err}; stopping");
            let _ = self.teardown();
        }
    }
}

impl<H: Host> Drop for Viewport<H> {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use glam::{Vec3, Vec4};

    use super::*;
    use crate::api::config::{SceneConfig, SpinMode};
    use crate::runtime::mock::MockHost;
    use crate::systems::orbit::orbital_position;

    fn config() -> EngineConfig {
        EngineConfig {
            scene: SceneConfig {
                star_count: 20,
                ..SceneConfig::default()
            },
            ..EngineConfig::default()
        }
    }

    fn viewport() -> (Viewport<MockHost>, Rc<RefCell<Vec<BodyId>>>) {
        let picks = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&picks);
        let vp = Viewport::new(MockHost::new(), Catalog::default_planets(), config(), move |id| {
            sink.borrow_mut().push(id.clone())
        });
        (vp, picks)
    }

    fn run_frame(vp: &mut Viewport<MockHost>, now_ms: f64) {
        vp.host_mut().now = now_ms;
        assert!(vp.host_mut().fire_frame().is_some());
        vp.on_frame(now_ms);
    }

    fn pixel_of(context: &FrameContext<crate::runtime::mock::MockSurface>, p: Vec3) -> (f32, f32) {
        let clip = context.rig.view_projection() * Vec4::new(p.x, p.y, p.z, 1.0);
        let ndc = clip.truncate() / clip.w;
        (
            (ndc.x + 1.0) / 2.0 * context.size.width,
            (1.0 - ndc.y) / 2.0 * context.size.height,
        )
    }

    #[test]
    fn start_registers_listeners_and_schedules_a_frame() {
        let (mut vp, _) = viewport();
        vp.start().unwrap();
        let host = vp.host();
        assert_eq!(host.live_listeners(), 6);
        assert_eq!(host.pending_frames(), 1);
        let log = host.surfaces.borrow();
        assert_eq!(log.created, 1);
        assert_eq!(log.prepared, 1);
        assert_eq!(log.resized, vec![ViewportSize::new(800.0, 600.0)]);
    }

    #[test]
    fn mount_unmount_mount_does_not_accumulate_listeners() {
        let (mut vp, _) = viewport();
        vp.start().unwrap();
        vp.stop();
        assert_eq!(vp.host().live_listeners(), 0);
        assert_eq!(vp.host().pending_frames(), 0);
        vp.start().unwrap();
        assert_eq!(vp.host().live_listeners(), 6);
        assert_eq!(vp.host().listeners_removed, 6);
        assert_eq!(vp.host().pending_frames(), 1);
    }

    #[test]
    fn start_while_running_is_a_no_op() {
        let (mut vp, _) = viewport();
        vp.start().unwrap();
        vp.start().unwrap();
        assert_eq!(vp.host().live_listeners(), 6);
        assert_eq!(vp.host().frames_requested, 1);
        assert_eq!(vp.host().surfaces.borrow().created, 1);
    }

    #[test]
    fn surface_failure_leaves_nothing_registered() {
        let (mut vp, _) = viewport();
        vp.host_mut().fail_surface = true;
        let ready = Rc::new(Cell::new(false));
        let flag = Rc::clone(&ready);
        let mut vp = vp.with_ready(move || flag.set(true));

        let err = vp.start().unwrap_err();
        assert_eq!(err, ViewportError::Host(HostError::NoRenderingContext));
        assert!(!vp.is_running());
        assert_eq!(vp.host().listeners_added, 0);
        assert_eq!(vp.host().frames_requested, 0);
        assert!(!ready.get());
    }

    #[test]
    fn listener_failure_rolls_back() {
        let (mut vp, _) = viewport();
        vp.host_mut().fail_listener_at = Some(3);
        assert!(matches!(vp.start(), Err(ViewportError::Host(HostError::Listener(_)))));
        assert_eq!(vp.host().live_listeners(), 0);
        assert_eq!(vp.host().listeners_removed, 3);
        assert_eq!(vp.host().surfaces.borrow().released, 1);

        vp.start().unwrap();
        assert_eq!(vp.host().live_listeners(), 6);
    }

    #[test]
    fn frame_schedule_failure_rolls_back() {
        let (mut vp, _) = viewport();
        vp.host_mut().fail_frames = true;
        assert!(matches!(vp.start(), Err(ViewportError::Host(HostError::Frame(_)))));
        assert!(!vp.is_running());
        assert_eq!(vp.host().live_listeners(), 0);
        assert_eq!(vp.host().surfaces.borrow().released, 1);
    }

    #[test]
    fn ready_fires_once_after_first_frame_is_scheduled() {
        let (vp, _) = viewport();
        let seen = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&seen);
        let mut vp = vp.with_ready(move || counter.set(counter.get() + 1));
        vp.start().unwrap();
        assert_eq!(seen.get(), 1);
        assert_eq!(vp.host().pending_frames(), 1);
        vp.stop();
        vp.start().unwrap();
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn stop_cancels_pending_frame_and_is_idempotent() {
        let (mut vp, _) = viewport();
        vp.start().unwrap();
        vp.stop();
        vp.stop();
        let host = vp.host();
        assert_eq!(host.frames_cancelled, 1);
        assert_eq!(host.pending_frames(), 0);
        assert_eq!(host.surfaces.borrow().released, 1);
    }

    #[test]
    fn late_frame_after_stop_draws_nothing() {
        let (mut vp, _) = viewport();
        vp.start().unwrap();
        vp.stop();
        vp.on_frame(1000.0);
        assert_eq!(vp.host().surfaces.borrow().draws, 0);
        assert_eq!(vp.host().frames_requested, 1);
    }

    #[test]
    fn each_frame_draws_and_rearms() {
        let (mut vp, _) = viewport();
        vp.start().unwrap();
        for i in 1..=3 {
            run_frame(&mut vp, i as f64 * 16.0);
        }
        let host = vp.host();
        assert_eq!(host.surfaces.borrow().draws, 3);
        assert_eq!(host.surfaces.borrow().last_discs, 10);
        assert_eq!(host.frames_requested, 4);
        assert_eq!(host.pending_frames(), 1);
    }

    #[test]
    fn bodies_follow_elapsed_time() {
        let (mut vp, _) = viewport();
        vp.host_mut().now = 1000.0;
        vp.start().unwrap();
        run_frame(&mut vp, 51_000.0);
        let scene = &vp.context().unwrap().scene;
        let mercury = scene.get(&BodyId::new("mercury")).unwrap();
        assert!(mercury.position.distance(orbital_position(8.0, 0.04, 50.0)) < 1e-3);
        // Per-frame spin: one step regardless of the 50 s gap.
        assert!((mercury.spin - 0.02).abs() < 1e-6);
    }

    #[test]
    fn timed_spin_scales_with_frame_time() {
        let picks = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&picks);
        let mut vp = Viewport::new(
            MockHost::new(),
            Catalog::default_planets(),
            EngineConfig {
                spin: SpinMode::Timed { reference_fps: 60.0 },
                ..config()
            },
            move |id| sink.borrow_mut().push(id.clone()),
        );
        vp.start().unwrap();
        run_frame(&mut vp, 500.0);
        let mercury = vp.context().unwrap().scene.nodes()[0].spin;
        // 0.5 s at 60 fps = 30 steps of 0.02.
        assert!((mercury - 0.6).abs() < 1e-4);
    }

    #[test]
    fn queued_drag_rotates_camera_and_wheel_zooms() {
        let (mut vp, _) = viewport();
        vp.start().unwrap();
        let before = *vp.context().unwrap().rig.state();
        vp.push_input(InputEvent::PointerDown { x: 100.0, y: 100.0 });
        vp.push_input(InputEvent::PointerMove { x: 140.0, y: 100.0 });
        vp.push_input(InputEvent::PointerUp);
        vp.push_input(InputEvent::Wheel { delta_y: 100.0 });
        run_frame(&mut vp, 16.0);
        let after = *vp.context().unwrap().rig.state();
        assert!((after.azimuth() - (before.azimuth() - 0.2)).abs() < 1e-5);
        assert!((after.radius() - (before.radius() + 2.0)).abs() < 1e-4);
        assert!(!vp.context().unwrap().controller.drag_state().dragging);
    }

    #[test]
    fn click_on_body_reports_exactly_one_pick() {
        let (mut vp, picks) = viewport();
        vp.start().unwrap();
        let context = vp.context().unwrap();
        let mercury = context.scene.get(&BodyId::new("mercury")).unwrap().position;
        let (px, py) = pixel_of(context, mercury);

        vp.push_input(InputEvent::Click { x: px, y: py });
        vp.push_input(InputEvent::Click { x: 2.0, y: 2.0 });
        run_frame(&mut vp, 0.0);
        assert_eq!(*picks.borrow(), vec![BodyId::new("mercury")]);

        run_frame(&mut vp, 16.0);
        assert_eq!(picks.borrow().len(), 1);
    }

    #[test]
    fn input_after_stop_is_dropped() {
        let (mut vp, picks) = viewport();
        vp.start().unwrap();
        vp.stop();
        vp.push_input(InputEvent::Click { x: 400.0, y: 300.0 });
        vp.start().unwrap();
        run_frame(&mut vp, 0.0);
        assert!(picks.borrow().is_empty());
    }

    #[test]
    fn degenerate_resize_is_skipped() {
        let (mut vp, _) = viewport();
        vp.start().unwrap();
        let aspect = vp.context().unwrap().rig.projection().aspect;

        vp.host_mut().size = ViewportSize::new(0.0, 600.0);
        vp.resize();
        vp.push_input(InputEvent::Resize(ViewportSize::new(640.0, 0.0)));
        run_frame(&mut vp, 16.0);
        let context = vp.context().unwrap();
        assert_eq!(context.rig.projection().aspect, aspect);
        assert_eq!(context.size, ViewportSize::new(800.0, 600.0));
        assert_eq!(vp.host().surfaces.borrow().resized.len(), 1);

        vp.push_input(InputEvent::Resize(ViewportSize::new(1000.0, 500.0)));
        run_frame(&mut vp, 32.0);
        assert_eq!(vp.context().unwrap().rig.projection().aspect, 2.0);
        assert_eq!(vp.host().surfaces.borrow().resized.len(), 2);
    }

    #[test]
    fn stop_releases_everything_acquired_at_start() {
        let (mut vp, _) = viewport();
        for _ in 0..2 {
            vp.start().unwrap();
            let resources = vp.context().unwrap().scene.resources();
            let acquired = ReleaseReport {
                geometries: resources.live_geometries(),
                materials: resources.live_materials(),
            };
            assert!(acquired.geometries > 0 && acquired.materials > 0);

            assert_eq!(vp.stop(), Some(acquired));
            assert!(vp.context().is_none());
        }
        assert_eq!(vp.stop(), None);
    }

    #[test]
    fn drop_unmounts() {
        let (mut vp, _) = viewport();
        vp.start().unwrap();
        let surfaces = Rc::clone(&vp.host().surfaces);
        drop(vp);
        assert_eq!(surfaces.borrow().released, 1);
    }
}
