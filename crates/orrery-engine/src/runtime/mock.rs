//! Test host: records every registration, schedule and surface call.

use std::cell::RefCell;
use std::rc::Rc;

use crate::api::types::ViewportSize;
use crate::core::scene::SceneGraph;
use crate::error::HostError;
use crate::renderer::frame::FrameData;
use crate::renderer::traits::Surface;
use crate::runtime::host::{FrameHandle, Host, ListenerHandle, ListenerKind, ListenerTarget};

/// Calls observed by surfaces created from one [`MockHost`].
#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub created: usize,
    pub prepared: usize,
    pub resized: Vec<ViewportSize>,
    pub draws: usize,
    pub released: usize,
    /// Disc count of the last drawn frame.
    pub last_discs: usize,
}

pub struct MockSurface {
    log: Rc<RefCell<SurfaceLog>>,
}

impl Surface for MockSurface {
    fn backend(&self) -> &'static str {
        "mock"
    }

    fn prepare(&mut self, _scene: &SceneGraph) {
        self.log.borrow_mut().prepared += 1;
    }

    fn resize(&mut self, size: ViewportSize) {
        self.log.borrow_mut().resized.push(size);
    }

    fn draw(&mut self, frame: &FrameData) {
        let mut log = self.log.borrow_mut();
        log.draws += 1;
        log.last_discs = frame.discs().count();
    }

    fn release(&mut self) {
        self.log.borrow_mut().released += 1;
    }
}

pub struct MockHost {
    pub size: ViewportSize,
    pub now: f64,
    pub fail_surface: bool,
    /// Fail the n-th listener registration (0-based, counted from creation).
    pub fail_listener_at: Option<usize>,
    pub fail_frames: bool,
    pub listeners: Vec<(ListenerHandle, ListenerTarget, ListenerKind)>,
    pub listeners_added: usize,
    pub listeners_removed: usize,
    pub frames_requested: usize,
    pub frames_cancelled: usize,
    pending: Vec<FrameHandle>,
    next_listener: u32,
    next_frame: i32,
    pub surfaces: Rc<RefCell<SurfaceLog>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            size: ViewportSize::new(800.0, 600.0),
            now: 0.0,
            fail_surface: false,
            fail_listener_at: None,
            fail_frames: false,
            listeners: Vec::new(),
            listeners_added: 0,
            listeners_removed: 0,
            frames_requested: 0,
            frames_cancelled: 0,
            pending: Vec::new(),
            next_listener: 0,
            next_frame: 1,
            surfaces: Rc::new(RefCell::new(SurfaceLog::default())),
        }
    }

    pub fn live_listeners(&self) -> usize {
        self.listeners.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    /// Deliver the oldest scheduled frame, as the host's frame callback would.
    pub fn fire_frame(&mut self) -> Option<FrameHandle> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }
}

impl Host for MockHost {
    type Surface = MockSurface;

    fn measure(&self) -> ViewportSize {
        self.size
    }

    fn create_surface(&mut self, _size: ViewportSize) -> Result<MockSurface, HostError> {
        if self.fail_surface {
            return Err(HostError::NoRenderingContext);
        }
        self.surfaces.borrow_mut().created += 1;
        Ok(MockSurface {
            log: Rc::clone(&self.surfaces),
        })
    }

    fn add_listener(
        &mut self,
        target: ListenerTarget,
        kind: ListenerKind,
    ) -> Result<ListenerHandle, HostError> {
        if self.fail_listener_at == Some(self.listeners_added) {
            self.fail_listener_at = None;
            return Err(HostError::Listener(kind.event_name().to_owned()));
        }
        let handle = ListenerHandle(self.next_listener);
        self.next_listener += 1;
        self.listeners_added += 1;
        self.listeners.push((handle, target, kind));
        Ok(handle)
    }

    fn remove_listener(&mut self, handle: ListenerHandle) {
        if let Some(i) = self.listeners.iter().position(|(h, _, _)| *h == handle) {
            self.listeners.remove(i);
            self.listeners_removed += 1;
        }
    }

    fn request_frame(&mut self) -> Result<FrameHandle, HostError> {
        if self.fail_frames {
            return Err(HostError::Frame("scheduler unavailable".into()));
        }
        let handle = FrameHandle(self.next_frame);
        self.next_frame += 1;
        self.frames_requested += 1;
        self.pending.push(handle);
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Some(i) = self.pending.iter().position(|h| *h == handle) {
            self.pending.remove(i);
            self.frames_cancelled += 1;
        }
    }

    fn now_ms(&self) -> f64 {
        self.now
    }
}
