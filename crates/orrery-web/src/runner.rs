use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use orrery_engine::{BodyId, Catalog, EngineConfig, Viewport};
use serde::{Deserialize, Serialize};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use crate::host::WebHost;

type SharedViewport = Rc<RefCell<Viewport<WebHost>>>;

/// Mount options accepted as JSON. Engine settings sit at the top level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    #[serde(flatten)]
    pub engine: EngineConfig,
    /// Upper bound for the canvas backing-store scale.
    pub max_pixel_ratio: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            max_pixel_ratio: 2.0,
        }
    }
}

impl ViewConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Results produced while the viewport is borrowed, delivered to JS after
/// the borrow ends so callbacks may unmount.
#[derive(Default, Clone)]
struct Outbox {
    picks: Rc<RefCell<Vec<BodyId>>>,
    ready: Rc<Cell<bool>>,
}

struct Callbacks {
    on_pick: js_sys::Function,
    on_ready: Option<js_sys::Function>,
}

impl Outbox {
    fn flush(&self, callbacks: &Callbacks) {
        let picks = std::mem::take(&mut *self.picks.borrow_mut());
        for id in picks {
            if let Err(e) = callbacks.on_pick.call1(&JsValue::NULL, &JsValue::from_str(id.as_str())) {
                log::warn!("pick callback threw: {e:?}");
            }
        }
        if self.ready.replace(false) {
            if let Some(on_ready) = &callbacks.on_ready {
                if let Err(e) = on_ready.call0(&JsValue::NULL) {
                    log::warn!("ready callback threw: {e:?}");
                }
            }
        }
    }
}

fn run_frame(view: &Weak<RefCell<Viewport<WebHost>>>, outbox: &Outbox, callbacks: &Callbacks, now_ms: f64) {
    {
        let Some(view) = view.upgrade() else {
            return;
        };
        let Ok(mut vp) = view.try_borrow_mut() else {
            log::warn!("frame skipped: viewport busy");
            return;
        };
        for event in vp.host_mut().take_input() {
            vp.push_input(event);
        }
        vp.on_frame(now_ms);
    }
    outbox.flush(callbacks);
}

/// Run `f` on the value unless it is already borrowed. Returns whether it ran.
fn with_idle<T>(cell: &RefCell<T>, f: impl FnOnce(&mut T)) -> bool {
    let Ok(mut value) = cell.try_borrow_mut() else {
        return false;
    };
    f(&mut *value);
    true
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// The orbital diagram mounted into a DOM container.
#[wasm_bindgen]
pub struct OrreryView {
    view: Option<SharedViewport>,
    /// Kept alive until the view is freed; an unmount from inside a callback
    /// runs while this closure is on the stack.
    _frame: Closure<dyn FnMut(f64)>,
}

#[wasm_bindgen]
impl OrreryView {
    /// Mount the built-in planet catalog with default settings.
    pub fn mount(
        container: HtmlElement,
        on_pick: js_sys::Function,
        on_ready: Option<js_sys::Function>,
    ) -> Result<OrreryView, JsValue> {
        Self::mount_with_catalog(container, None, None, on_pick, on_ready)
    }

    /// Mount a caller-supplied catalog (JSON array of bodies) and optional
    /// config overrides (JSON object).
    #[wasm_bindgen(js_name = mountWithCatalog)]
    pub fn mount_with_catalog(
        container: HtmlElement,
        catalog_json: Option<String>,
        config_json: Option<String>,
        on_pick: js_sys::Function,
        on_ready: Option<js_sys::Function>,
    ) -> Result<OrreryView, JsValue> {
        crate::init_logging();

        let catalog = match catalog_json {
            Some(json) => Catalog::from_json(&json).map_err(to_js)?,
            None => Catalog::default_planets(),
        };
        let config = match config_json {
            Some(json) => ViewConfig::from_json(&json).map_err(to_js)?,
            None => ViewConfig::default(),
        };
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let host = WebHost::new(window, container, config.max_pixel_ratio);

        let outbox = Outbox::default();
        let picks = Rc::clone(&outbox.picks);
        let ready = Rc::clone(&outbox.ready);
        let viewport = Viewport::new(host, catalog, config.engine, move |id: &BodyId| {
            picks.borrow_mut().push(id.clone())
        })
        .with_ready(move || ready.set(true));
        let view: SharedViewport = Rc::new(RefCell::new(viewport));

        let callbacks = Rc::new(Callbacks { on_pick, on_ready });
        let frame = {
            let weak = Rc::downgrade(&view);
            let outbox = outbox.clone();
            let callbacks = Rc::clone(&callbacks);
            Closure::<dyn FnMut(f64)>::new(move |now_ms: f64| {
                run_frame(&weak, &outbox, &callbacks, now_ms)
            })
        };

        {
            let mut vp = view.borrow_mut();
            vp.host_mut()
                .set_frame_callback(frame.as_ref().unchecked_ref::<js_sys::Function>().clone());
            vp.start().map_err(to_js)?;
        }
        outbox.flush(&callbacks);
        log::info!("orrery mounted");

        Ok(OrreryView {
            view: Some(view),
            _frame: frame,
        })
    }

    /// Stop rendering, remove every listener and release the canvas.
    /// Safe to call more than once.
    pub fn unmount(&mut self) {
        let Some(view) = self.view.take() else {
            return;
        };
        let stopped = with_idle(&*view, |vp| {
            vp.stop();
            log::info!("orrery unmounted ({} listeners left)", vp.host().listener_count());
        });
        if !stopped {
            log::warn!("unmount while viewport busy; teardown deferred to drop");
        }
    }

    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.view
            .as_ref()
            .and_then(|v| v.try_borrow().ok().map(|vp| vp.is_running()))
            .unwrap_or(false)
    }
}
