use crate::api::types::ViewportSize;

/// Host events the viewport understands.
/// Pixel coordinates are relative to the drawing surface's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A press began at (x, y).
    PointerDown { x: f32, y: f32 },
    /// The pointer moved to (x, y).
    PointerMove { x: f32, y: f32 },
    /// The press ended (anywhere, including outside the surface).
    PointerUp,
    /// Scroll; positive `delta_y` zooms out.
    Wheel { delta_y: f32 },
    /// A click at (x, y).
    Click { x: f32, y: f32 },
    /// The container changed size.
    Resize(ViewportSize),
}

/// A queue of input events.
/// Host listeners push events; the viewport drains them once per frame,
/// before simulating and rendering.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop everything pending.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
