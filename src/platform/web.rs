//! Browser host glue
//!
//! `WebEngine` is the scoped owner of everything registered with the page:
//! window/document listeners, the layout MutationObserver, the settle timer
//! and the animation-frame callback. `stop()` (or dropping it) releases all
//! of them together, so mounting and unmounting repeatedly never leaves a
//! duplicate loop or listener behind. A canvas holds at most one live loop.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Once;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, HtmlCanvasElement, MouseEvent, Window};

use crate::engine::Engine;
use crate::platform::CanvasClaim;
use crate::renderer::CanvasSurface;
use crate::settings::Settings;
use crate::sim::{Rect, mode_catalog_json};

/// Elements whose bounds act as obstacles
pub const OBSTACLE_SELECTOR: &str = ".physics-obstacle";

static LOGGER: Once = Once::new();

/// Route `log` to the browser console and panics to console.error
pub fn init_logging() {
    LOGGER.call_once(|| {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
    });
}

/// Bounding rects of every marked obstacle element, in viewport coordinates
pub fn query_obstacles(document: &Document) -> Vec<Rect> {
    let Ok(nodes) = document.query_selector_all(OBSTACLE_SELECTOR) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .map(|el| {
            let r = el.get_bounding_client_rect();
            Rect::new(r.left() as f32, r.top() as f32, r.right() as f32, r.bottom() as f32)
        })
        .collect()
}

fn window_size(window: &Window) -> (u32, u32) {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (w.max(0.0) as u32, h.max(0.0) as u32)
}

/// State touched by every callback
struct Shared {
    engine: Engine,
    surface: CanvasSurface,
    document: Document,
}

impl Shared {
    fn refresh_obstacles(&mut self) {
        let rects = query_obstacles(&self.document);
        self.engine.refresh_obstacles(rects);
    }
}

/// An event listener that unregisters itself when dropped
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn register(
        target: &EventTarget,
        event: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    ) -> Option<Self> {
        match target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            Ok(()) => Some(Self {
                target: target.clone(),
                event,
                closure,
            }),
            Err(e) => {
                log::warn!("Failed to register {} listener: {:?}", event, e);
                None
            }
        }
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// Layout observer; disconnected on drop
struct LayoutObserver {
    observer: web_sys::MutationObserver,
    _closure: Closure<dyn FnMut(js_sys::Array, web_sys::MutationObserver)>,
}

impl Drop for LayoutObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// One-shot timer; cleared on drop if it has not fired
struct Timeout {
    window: Window,
    handle: i32,
    _closure: Closure<dyn FnMut()>,
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.window.clear_timeout_with_handle(self.handle);
    }
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// A mounted, running background
pub struct WebEngine {
    claim: Option<CanvasClaim>,
    shared: Rc<RefCell<Shared>>,
    window: Window,
    listeners: Vec<Listener>,
    observer: Option<LayoutObserver>,
    settle: Option<Timeout>,
    frame_handle: Rc<Cell<Option<i32>>>,
    frame_callback: FrameCallback,
}

impl WebEngine {
    /// Mount on the canvas with id `canvas_id` and start the loop
    ///
    /// Returns None when the page has no such canvas or no 2D context, when
    /// the settings are invalid, or when another live loop already owns the
    /// canvas; the background simply never starts.
    pub fn mount(canvas_id: &str, settings: Settings) -> Option<Self> {
        let claim = CanvasClaim::acquire(canvas_id)?;
        let window = web_sys::window()?;
        let document = window.document()?;

        let Some(canvas) = document
            .get_element_by_id(canvas_id)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::warn!("No canvas #{}; background disabled", canvas_id);
            return None;
        };
        let Some(surface) = CanvasSurface::new(canvas) else {
            log::warn!("2D context unavailable; background disabled");
            return None;
        };

        let (width, height) = window_size(&window);
        surface.resize(width, height);

        let seed = js_sys::Date::now() as u64;
        let mut engine = match Engine::new(&settings, width as f32, height as f32, seed) {
            Ok(engine) => engine,
            Err(e) => {
                log::warn!("{}; background disabled", e);
                return None;
            }
        };
        engine.refresh_obstacles(query_obstacles(&document));

        let shared = Rc::new(RefCell::new(Shared {
            engine,
            surface,
            document: document.clone(),
        }));

        let mut web = Self {
            claim: Some(claim),
            shared,
            window,
            listeners: Vec::new(),
            observer: None,
            settle: None,
            frame_handle: Rc::new(Cell::new(None)),
            frame_callback: Rc::new(RefCell::new(None)),
        };
        web.register_listeners(&document);
        web.observer = web.observe_layout(&document);
        web.settle = web.arm_settle_timer(settings.settle_delay_ms);

        web.shared.borrow_mut().engine.start();
        web.schedule_frames();
        Some(web)
    }

    fn register_listeners(&mut self, document: &Document) {
        let window_target: &EventTarget = self.window.as_ref();

        // Resize: canvas and field reset together
        {
            let shared = self.shared.clone();
            let window = self.window.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                let (width, height) = window_size(&window);
                let mut s = shared.borrow_mut();
                s.surface.resize(width, height);
                s.engine.resize(width as f32, height as f32);
                s.refresh_obstacles();
            });
            self.listeners
                .extend(Listener::register(window_target, "resize", closure));
        }

        // Scroll moves every obstacle in viewport coordinates
        {
            let shared = self.shared.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                shared.borrow_mut().refresh_obstacles();
            });
            self.listeners
                .extend(Listener::register(window_target, "scroll", closure));
        }

        {
            let shared = self.shared.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
                if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                    shared
                        .borrow_mut()
                        .engine
                        .pointer_moved(mouse.client_x() as f32, mouse.client_y() as f32);
                }
            });
            self.listeners
                .extend(Listener::register(window_target, "mousemove", closure));
        }

        // mouseleave only fires on elements, so listen on <html>
        {
            let shared = self.shared.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                shared.borrow_mut().engine.pointer_left();
            });
            let leave_target: EventTarget = match document.document_element() {
                Some(root) => root.into(),
                None => self.window.clone().into(),
            };
            self.listeners
                .extend(Listener::register(&leave_target, "mouseleave", closure));
        }
    }

    /// Refresh obstacles on structural or style/class changes under <body>
    fn observe_layout(&self, document: &Document) -> Option<LayoutObserver> {
        let body = document.body()?;
        let shared = self.shared.clone();
        let closure = Closure::<dyn FnMut(_, _)>::new(
            move |_records: js_sys::Array, _observer: web_sys::MutationObserver| {
                if let Ok(mut s) = shared.try_borrow_mut() {
                    s.refresh_obstacles();
                }
            },
        );
        let observer = web_sys::MutationObserver::new(closure.as_ref().unchecked_ref()).ok()?;

        let init = web_sys::MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        init.set_attributes(true);
        init.set_attribute_filter(&js_sys::Array::of2(&"style".into(), &"class".into()));
        if let Err(e) = observer.observe_with_options(&body, &init) {
            log::warn!("MutationObserver refused: {:?}", e);
            return None;
        }

        Some(LayoutObserver {
            observer,
            _closure: closure,
        })
    }

    /// Reseed once after the initial layout has settled
    fn arm_settle_timer(&self, delay_ms: u32) -> Option<Timeout> {
        let shared = self.shared.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut s = shared.borrow_mut();
            s.engine.reinitialize();
            s.refresh_obstacles();
            log::debug!("Layout settled; field reseeded");
        });
        let handle = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms.min(i32::MAX as u32) as i32,
            )
            .ok()?;
        Some(Timeout {
            window: self.window.clone(),
            handle,
            _closure: closure,
        })
    }

    /// Self-rescheduling animation-frame callback
    fn schedule_frames(&self) {
        let shared = self.shared.clone();
        let window = self.window.clone();
        let handle = self.frame_handle.clone();
        let callback = self.frame_callback.clone();

        *self.frame_callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |_time: f64| {
            let running = {
                let mut s = shared.borrow_mut();
                let Shared {
                    engine, surface, ..
                } = &mut *s;
                engine.frame(surface);
                engine.is_running()
            };
            handle.set(None);
            if !running {
                return;
            }
            if let Some(next) = callback.borrow().as_ref() {
                handle.set(window.request_animation_frame(next.as_ref().unchecked_ref()).ok());
            }
        }));

        if let Some(first) = self.frame_callback.borrow().as_ref() {
            self.frame_handle
                .set(self.window.request_animation_frame(first.as_ref().unchecked_ref()).ok());
        }
    }

    /// Stop the loop and release every registration. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.frame_handle.take() {
            let _ = self.window.cancel_animation_frame(handle);
        }
        // Breaks the callback's reference cycle
        self.frame_callback.borrow_mut().take();
        self.listeners.clear();
        self.observer = None;
        self.settle = None;
        if let Ok(mut s) = self.shared.try_borrow_mut() {
            s.engine.stop();
        }
        if let Some(claim) = self.claim.take() {
            log::info!("Background on #{} unmounted", claim.id());
        }
    }

    pub fn set_active_mode(&self, id: &str) -> crate::error::Result<()> {
        self.shared.borrow_mut().engine.set_active_mode(id)?;
        Ok(())
    }

    pub fn active_mode(&self) -> &'static str {
        self.shared.borrow().engine.mode().id()
    }

    /// Re-query obstacle geometry now
    pub fn refresh_obstacles(&self) {
        self.shared.borrow_mut().refresh_obstacles();
    }

    pub fn is_running(&self) -> bool {
        self.shared.borrow().engine.is_running()
    }
}

impl Drop for WebEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

/// JavaScript-facing handle for the control panel
#[wasm_bindgen]
pub struct LightingLab {
    inner: Option<WebEngine>,
}

#[wasm_bindgen]
impl LightingLab {
    /// Mount on `canvas_id`; `settings_json` is optional Settings JSON
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, settings_json: Option<String>) -> Result<LightingLab, JsError> {
        init_logging();
        let settings = match settings_json {
            Some(json) => Settings::from_json(&json).map_err(|e| JsError::new(&e.to_string()))?,
            None => Settings::default(),
        };
        Ok(LightingLab {
            inner: WebEngine::mount(canvas_id, settings),
        })
    }

    #[wasm_bindgen(js_name = setActiveMode)]
    pub fn set_active_mode(&self, id: &str) -> Result<(), JsError> {
        match &self.inner {
            Some(web) => web.set_active_mode(id).map_err(|e| JsError::new(&e.to_string())),
            None => Ok(()),
        }
    }

    #[wasm_bindgen(js_name = activeMode)]
    pub fn active_mode(&self) -> Option<String> {
        self.inner.as_ref().map(|web| web.active_mode().to_string())
    }

    /// JSON array of `{id, name, description}`
    #[wasm_bindgen(js_name = modeCatalog)]
    pub fn mode_catalog(&self) -> Result<String, JsError> {
        mode_catalog_json().map_err(|e| JsError::new(&e.to_string()))
    }

    #[wasm_bindgen(js_name = refreshObstacles)]
    pub fn refresh_obstacles(&self) {
        if let Some(web) = &self.inner {
            web.refresh_obstacles();
        }
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.inner.as_ref().is_some_and(WebEngine::is_running)
    }

    /// Tear down; the handle is inert afterwards
    pub fn stop(&mut self) {
        if let Some(mut web) = self.inner.take() {
            web.stop();
        }
    }
}
