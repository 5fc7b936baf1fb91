//! DOM implementation of the engine's host services.
//!
//! Listener closures never touch the viewport. They push into a shared inbox
//! that the frame callback drains, so DOM events cannot re-enter a borrowed
//! viewport.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use orrery_engine::{
    FrameHandle, Host, HostError, InputEvent, ListenerHandle, ListenerKind, ListenerTarget,
    ViewportSize,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent, WheelEvent, Window};

use crate::canvas::CanvasSurface;

struct Registration {
    target: EventTarget,
    kind: ListenerKind,
    closure: Closure<dyn FnMut(Event)>,
}

pub struct WebHost {
    window: Window,
    container: HtmlElement,
    /// Canvas of the live surface; surface listeners attach here.
    canvas: Option<HtmlCanvasElement>,
    max_pixel_ratio: f64,
    inbox: Rc<RefCell<Vec<InputEvent>>>,
    listeners: HashMap<u32, Registration>,
    next_listener: u32,
    frame_callback: Option<js_sys::Function>,
}

impl WebHost {
    pub fn new(window: Window, container: HtmlElement, max_pixel_ratio: f64) -> Self {
        Self {
            window,
            container,
            canvas: None,
            max_pixel_ratio,
            inbox: Rc::new(RefCell::new(Vec::with_capacity(32))),
            listeners: HashMap::new(),
            next_listener: 0,
            frame_callback: None,
        }
    }

    /// Function invoked by `requestAnimationFrame`. Must outlive the host.
    pub fn set_frame_callback(&mut self, callback: js_sys::Function) {
        self.frame_callback = Some(callback);
    }

    /// Events received since the last call.
    pub fn take_input(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut *self.inbox.borrow_mut())
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn handler(&self, kind: ListenerKind) -> Closure<dyn FnMut(Event)> {
        let inbox = Rc::clone(&self.inbox);
        let canvas = self.canvas.clone();
        let container = self.container.clone();
        Closure::new(move |event: Event| {
            let input = match kind {
                ListenerKind::Resize => Some(InputEvent::Resize(measure_element(&container))),
                ListenerKind::PointerDown => event.dyn_ref::<MouseEvent>().map(|e| {
                    let (x, y) = local_position(canvas.as_ref(), e);
                    InputEvent::PointerDown { x, y }
                }),
                ListenerKind::PointerMove => event.dyn_ref::<MouseEvent>().map(|e| {
                    let (x, y) = local_position(canvas.as_ref(), e);
                    InputEvent::PointerMove { x, y }
                }),
                ListenerKind::PointerUp => Some(InputEvent::PointerUp),
                ListenerKind::Wheel => event
                    .dyn_ref::<WheelEvent>()
                    .map(|e| InputEvent::Wheel { delta_y: e.delta_y() as f32 }),
                ListenerKind::Click => event.dyn_ref::<MouseEvent>().map(|e| {
                    let (x, y) = local_position(canvas.as_ref(), e);
                    InputEvent::Click { x, y }
                }),
            };
            if let Some(input) = input {
                inbox.borrow_mut().push(input);
            }
        })
    }
}

/// Container size in CSS pixels.
fn measure_element(element: &HtmlElement) -> ViewportSize {
    ViewportSize::new(element.client_width() as f32, element.client_height() as f32)
}

/// Pointer position relative to the canvas' top-left corner.
fn local_position(canvas: Option<&HtmlCanvasElement>, event: &MouseEvent) -> (f32, f32) {
    let (left, top) = canvas
        .map(|c| {
            let rect = c.get_bounding_client_rect();
            (rect.left(), rect.top())
        })
        .unwrap_or((0.0, 0.0));
    (
        (event.client_x() as f64 - left) as f32,
        (event.client_y() as f64 - top) as f32,
    )
}

fn js_error(err: wasm_bindgen::JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

impl Host for WebHost {
    type Surface = CanvasSurface;

    fn measure(&self) -> ViewportSize {
        measure_element(&self.container)
    }

    fn create_surface(&mut self, size: ViewportSize) -> Result<CanvasSurface, HostError> {
        let surface = CanvasSurface::create(
            &self.window,
            self.container.clone(),
            size,
            self.max_pixel_ratio,
        )?;
        self.canvas = Some(surface.canvas().clone());
        Ok(surface)
    }

    fn add_listener(
        &mut self,
        target: ListenerTarget,
        kind: ListenerKind,
    ) -> Result<ListenerHandle, HostError> {
        let target: EventTarget = match target {
            ListenerTarget::Window => self.window.clone().into(),
            ListenerTarget::Surface => self
                .canvas
                .clone()
                .ok_or_else(|| HostError::Listener("no surface to attach to".into()))?
                .into(),
        };
        let closure = self.handler(kind);
        target
            .add_event_listener_with_callback(kind.event_name(), closure.as_ref().unchecked_ref())
            .map_err(|e| HostError::Listener(js_error(e)))?;

        let handle = ListenerHandle(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(handle.0, Registration { target, kind, closure });
        Ok(handle)
    }

    fn remove_listener(&mut self, handle: ListenerHandle) {
        let Some(reg) = self.listeners.remove(&handle.0) else {
            log::warn!("remove of unknown listener {}", handle.0);
            return;
        };
        if let Err(e) = reg.target.remove_event_listener_with_callback(
            reg.kind.event_name(),
            reg.closure.as_ref().unchecked_ref(),
        ) {
            log::warn!("failed to remove {} listener: {}", reg.kind.event_name(), js_error(e));
        }
    }

    fn request_frame(&mut self) -> Result<FrameHandle, HostError> {
        let callback = self
            .frame_callback
            .as_ref()
            .ok_or_else(|| HostError::Frame("no frame callback installed".into()))?;
        self.window
            .request_animation_frame(callback)
            .map(FrameHandle)
            .map_err(|e| HostError::Frame(js_error(e)))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if let Err(e) = self.window.cancel_animation_frame(handle.0) {
            log::warn!("cancel_animation_frame failed: {}", js_error(e));
        }
    }

    fn now_ms(&self) -> f64 {
        self.window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }
}
