//! Host services the viewport depends on.
//!
//! The browser bridge implements these with the DOM; tests use a mock that
//! counts registrations.

use crate::api::types::ViewportSize;
use crate::error::HostError;
use crate::renderer::traits::Surface;

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    /// Global window. Receives resize and pointer move/up, so a drag that
    /// leaves the surface still ends.
    Window,
    /// The drawing surface element.
    Surface,
}

/// Host events the viewport subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    Resize,
    PointerDown,
    PointerMove,
    PointerUp,
    Wheel,
    Click,
}

impl ListenerKind {
    /// Every kind, in registration order.
    pub const ALL: [ListenerKind; 6] = [
        ListenerKind::Resize,
        ListenerKind::PointerDown,
        ListenerKind::PointerMove,
        ListenerKind::PointerUp,
        ListenerKind::Wheel,
        ListenerKind::Click,
    ];

    pub fn target(self) -> ListenerTarget {
        match self {
            ListenerKind::Resize | ListenerKind::PointerMove | ListenerKind::PointerUp => {
                ListenerTarget::Window
            }
            ListenerKind::PointerDown | ListenerKind::Wheel | ListenerKind::Click => {
                ListenerTarget::Surface
            }
        }
    }

    /// DOM event type name.
    pub fn event_name(self) -> &'static str {
        match self {
            ListenerKind::Resize => "resize",
            ListenerKind::PointerDown => "pointerdown",
            ListenerKind::PointerMove => "pointermove",
            ListenerKind::PointerUp => "pointerup",
            ListenerKind::Wheel => "wheel",
            ListenerKind::Click => "click",
        }
    }
}

/// Opaque registration returned by [`Host::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u32);

/// Opaque scheduled-frame id returned by [`Host::request_frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// Services provided by the embedding environment.
pub trait Host {
    type Surface: Surface;

    /// Current size of the container, in CSS pixels.
    fn measure(&self) -> ViewportSize;

    /// Create a drawing surface attached to the container.
    fn create_surface(&mut self, size: ViewportSize) -> Result<Self::Surface, HostError>;

    fn add_listener(
        &mut self,
        target: ListenerTarget,
        kind: ListenerKind,
    ) -> Result<ListenerHandle, HostError>;

    /// Unregister synchronously. Unknown handles are ignored.
    fn remove_listener(&mut self, handle: ListenerHandle);

    /// Ask for one frame callback.
    fn request_frame(&mut self) -> Result<FrameHandle, HostError>;

    /// Cancel a scheduled frame. Unknown or already-run handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Monotonic clock in milliseconds.
    fn now_ms(&self) -> f64;
}
