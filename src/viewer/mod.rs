//! Viewer state machine and the browser binding.
//!
//! The platform-independent part is [`BitEngine`] plus its controllers, driven
//! through the [`Host`] trait. On wasm32 this module also provides the
//! `BitView` struct exported to JavaScript, which:
//! - Builds the scroll container, canvas and scroll spacer inside a host element
//! - Wires scroll, pointer and window resize listeners into the engine
//! - Renders synchronously or through a request-animation-frame callback
//!
//! Listeners are registered when the view is created and released by
//! `dispose` (or on drop); no manual JavaScript wiring is required.

mod engine;
mod host;
mod hover;
mod resize;
mod scroll;

#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg(target_arch = "wasm32")]
mod events;

pub use engine::{BitEngine, EngineEvent, HoverListener};
pub use host::{Host, ManualHost, Subscription, TimerHandle};
pub use hover::HoverTracker;
pub use resize::ResizeController;
pub use scroll::{DebounceState, ScrollRequest, ScrollVirtualizer, SCROLL_DEBOUNCE_MS};

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserHost;

#[cfg(target_arch = "wasm32")]
use std::cell::{Cell, RefCell};
#[cfg(target_arch = "wasm32")]
use std::rc::{Rc, Weak};

#[cfg(target_arch = "wasm32")]
use js_sys::Function;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use web_sys::{HtmlCanvasElement, HtmlDivElement, HtmlElement, MouseEvent};

#[cfg(target_arch = "wasm32")]
use crate::error::BitviewError;
#[cfg(target_arch = "wasm32")]
use crate::layout::LayoutParams;
#[cfg(target_arch = "wasm32")]
use crate::render::{CanvasSurface, FrameStats};

/// Shared state reachable from DOM listeners (wasm32 only)
#[cfg(target_arch = "wasm32")]
pub(crate) struct SharedState {
    /// `None` once disposed
    pub(crate) engine: Option<BitEngine>,
    pub(crate) host: BrowserHost,
    pub(crate) surface: CanvasSurface,
    /// Host element the view was mounted in; its width drives the layout
    pub(crate) container: HtmlElement,
    pub(crate) scroll_container: HtmlDivElement,
    pub(crate) spacer: HtmlDivElement,
    pub(crate) render_callback: Option<Function>,
    pub(crate) hover_callback: Option<Function>,
    /// Hover change recorded by the engine, delivered after the borrow ends
    pub(crate) pending_hover: Rc<Cell<Option<Option<usize>>>>,
    pub(crate) last_stats: FrameStats,
}

// Timing helper for WASM metrics.
#[cfg(target_arch = "wasm32")]
pub(crate) fn now_ms() -> f64 {
    if let Some(window) = web_sys::window() {
        if let Some(perf) = window.performance() {
            return perf.now();
        }
    }
    js_sys::Date::now()
}

#[cfg(target_arch = "wasm32")]
fn create_element<T: JsCast>(document: &web_sys::Document, tag: &str) -> Result<T, BitviewError> {
    document
        .create_element(tag)
        .map_err(|e| BitviewError::Host(format!("create <{}> failed: {:?}", tag, e)))?
        .dyn_into::<T>()
        .map_err(|_| BitviewError::Host(format!("<{}> has an unexpected type", tag)))
}

/// Border and height limit of the scroll container.
#[cfg(target_arch = "wasm32")]
fn apply_container_style(scroll_container: &HtmlDivElement, params: &LayoutParams) {
    let style = scroll_container.style();
    let border = params.border_pixel_width;
    let _ = style.set_property("border-style", "solid");
    let _ = style.set_property("border-width", &format!("{}px", border));
    let max_height = params.viewport_pixel_height.map_or_else(
        || "none".to_string(),
        |viewport| {
            let total = u64::from(viewport) + 2 * u64::from(border);
            format!("{}px", total)
        },
    );
    let _ = style.set_property("max-height", &max_height);
}

/// Bit grid viewer exported to JavaScript
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub struct BitView {
    state: Rc<RefCell<SharedState>>,
    canvas: HtmlCanvasElement,
    scroll_container: HtmlDivElement,
    /// Canvas pointer listeners, kept alive until dispose
    closures: Vec<(&'static str, Closure<dyn FnMut(MouseEvent)>)>,
    scroll_closure: Option<Closure<dyn FnMut(web_sys::Event)>>,
    disposed: bool,
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl BitView {
    /// Create a viewer inside `container`.
    ///
    /// `params` is a layout params object (`{ bitWidth, bitHeight,
    /// borderWidth?, maxHeight?, palette? }`); `dpr` is the device pixel ratio.
    #[wasm_bindgen(constructor)]
    pub fn new(container: HtmlElement, params: JsValue, dpr: f32) -> Result<BitView, JsValue> {
        console_error_panic_hook::set_once();

        let params = LayoutParams::from_js(params)?;
        let window = web_sys::window().ok_or_else(|| BitviewError::Host("no window".into()))?;
        let document = window
            .document()
            .ok_or_else(|| BitviewError::Host("no document".into()))?;

        let scroll_container: HtmlDivElement = create_element(&document, "div")?;
        let spacer: HtmlDivElement = create_element(&document, "div")?;
        let canvas: HtmlCanvasElement = create_element(&document, "canvas")?;
        let surface = CanvasSurface::new(canvas.clone())?;

        // Scroll container: native scrollbar over the full content height.
        let container_style = scroll_container.style();
        let _ = container_style.set_property("overflow", "auto");
        let _ = container_style.set_property("position", "relative");
        let _ = container_style.set_property("box-sizing", "border-box");
        apply_container_style(&scroll_container, &params);
        let _ = scroll_container.set_attribute("data-bitview-scroll", "");

        // Canvas: viewport-sized, moved to the scroll offset on every draw.
        let canvas_style = canvas.style();
        let _ = canvas_style.set_property("position", "absolute");
        let _ = canvas_style.set_property("left", "0");
        let _ = canvas_style.set_property("top", "0");
        let _ = canvas_style.set_property("display", "block");

        let _ = spacer.style().set_property(
            "min-height",
            &format!("{}px", params.bit_pixel_height),
        );

        let pending_hover = Rc::new(Cell::new(None));
        let state = Rc::new_cyclic(|weak: &Weak<RefCell<SharedState>>| {
            let on_timer = {
                let weak = Weak::clone(weak);
                move || {
                    if let Some(state) = weak.upgrade() {
                        BitView::timer_fired(&state);
                    }
                }
            };
            let on_resize = {
                let weak = Weak::clone(weak);
                move || {
                    if let Some(state) = weak.upgrade() {
                        BitView::measure(&state);
                    }
                }
            };
            RefCell::new(SharedState {
                engine: None,
                host: BrowserHost::new(window, on_timer, on_resize),
                surface,
                container: container.clone(),
                scroll_container: scroll_container.clone(),
                spacer: spacer.clone(),
                render_callback: None,
                hover_callback: None,
                pending_hover: Rc::clone(&pending_hover),
                last_stats: FrameStats::default(),
            })
        });

        {
            let mut guard = state.borrow_mut();
            let s = &mut *guard;
            let mut engine = BitEngine::attach(params, &mut s.host)?;
            engine.set_device_pixel_ratio(dpr);
            let sink = Rc::clone(&pending_hover);
            engine.set_hover_listener(Some(Box::new(move |hovered: Option<usize>| {
                sink.set(Some(hovered));
            })));
            s.engine = Some(engine);
        }

        // Build DOM structure
        let _ = scroll_container.append_child(&canvas);
        let _ = scroll_container.append_child(&spacer);
        let _ = container.append_child(&scroll_container);

        let scroll_closure = {
            let state = Rc::clone(&state);
            let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
                BitView::scrolled(&state);
            }) as Box<dyn FnMut(web_sys::Event)>);
            let _ = scroll_container
                .add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
            closure
        };

        let mut closures: Vec<(&'static str, Closure<dyn FnMut(MouseEvent)>)> = Vec::new();

        // Mouse move / over (hover)
        for (kind, entered) in [("mousemove", false), ("mouseover", true)] {
            let state = Rc::clone(&state);
            let canvas_ref = canvas.clone();
            let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
                let point = events::canvas_point(&canvas_ref, &event);
                let event = if entered {
                    EngineEvent::PointerEntered(point)
                } else {
                    EngineEvent::PointerMoved(point)
                };
                BitView::dispatch(&state, event);
            }) as Box<dyn FnMut(MouseEvent)>);
            let _ = canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closures.push((kind, closure));
        }

        // Mouse out (clear hover)
        {
            let state = Rc::clone(&state);
            let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                BitView::dispatch(&state, EngineEvent::PointerLeft);
            }) as Box<dyn FnMut(MouseEvent)>);
            let _ =
                canvas.add_event_listener_with_callback("mouseout", closure.as_ref().unchecked_ref());
            closures.push(("mouseout", closure));
        }

        let view = BitView {
            state,
            canvas,
            scroll_container,
            closures,
            scroll_closure: Some(scroll_closure),
            disposed: false,
        };
        // Establish the first layout from the container as mounted
        Self::measure(&view.state);
        Ok(view)
    }

    /// Replace the byte sequence and redraw.
    #[wasm_bindgen]
    pub fn set_bytes(&mut self, bytes: &[u8]) {
        Self::dispatch(&self.state, EngineEvent::BytesReplaced(bytes.to_vec()));
    }

    /// Apply new layout params, recomputing layout against the current width.
    #[wasm_bindgen]
    pub fn set_params(&mut self, params: JsValue) -> Result<(), JsValue> {
        let params = LayoutParams::from_js(params)?;
        apply_container_style(&self.scroll_container, &params);
        let changed = Self::with_engine(&self.state, |engine, _| engine.set_params(params))
            .transpose()?
            .unwrap_or(false);
        Self::after_update(&self.state, changed);
        // The border width is part of the measured inner width
        Self::measure(&self.state);
        Ok(())
    }

    /// Update the device pixel ratio (e.g. after moving between displays).
    #[wasm_bindgen]
    pub fn set_device_pixel_ratio(&mut self, dpr: f32) {
        let changed = Self::with_engine(&self.state, |engine, _| {
            engine.set_device_pixel_ratio(dpr);
            engine.needs_render()
        });
        Self::after_update(&self.state, changed.unwrap_or(false));
    }

    /// Re-measure the container; call when its size changes without a
    /// window resize.
    #[wasm_bindgen]
    pub fn relayout(&mut self) {
        Self::measure(&self.state);
    }

    /// Draw if anything changed since the last draw.
    #[wasm_bindgen]
    pub fn render(&mut self) {
        let needs_render = self
            .state
            .borrow()
            .engine
            .as_ref()
            .is_some_and(BitEngine::needs_render);
        if needs_render {
            Self::render_state(&self.state);
        }
    }

    /// Draw unconditionally and return the frame statistics.
    #[wasm_bindgen]
    pub fn render_with_metrics(&mut self) -> Result<JsValue, JsValue> {
        let stats = Self::render_state(&self.state);
        serde_wasm_bindgen::to_value(&stats).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Statistics of the most recent draw.
    #[wasm_bindgen]
    pub fn last_frame_stats(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.state.borrow().last_stats)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Register a JS callback to request a render on the next animation frame.
    /// Without one, every change renders synchronously.
    #[wasm_bindgen]
    pub fn set_render_callback(&mut self, callback: Option<Function>) {
        self.state.borrow_mut().render_callback = callback;
    }

    /// Register a JS callback receiving the hovered byte index or `null`.
    #[wasm_bindgen]
    pub fn set_hover_callback(&mut self, callback: Option<Function>) {
        self.state.borrow_mut().hover_callback = callback;
    }

    /// Pixel height of the full unscrolled content.
    /// The cast is safe: content heights stay far below 2^53.
    #[wasm_bindgen]
    #[allow(clippy::cast_precision_loss)]
    pub fn content_height(&self) -> f64 {
        self.state
            .borrow()
            .engine
            .as_ref()
            .map_or(0.0, |engine| engine.content_height() as f64)
    }

    #[wasm_bindgen]
    pub fn content_width(&self) -> u32 {
        self.state
            .borrow()
            .engine
            .as_ref()
            .map_or(0, BitEngine::content_width)
    }

    #[wasm_bindgen]
    pub fn hovered_byte(&self) -> Option<usize> {
        self.state
            .borrow()
            .engine
            .as_ref()
            .and_then(BitEngine::hovered_byte)
    }

    #[wasm_bindgen]
    pub fn scroll_offset(&self) -> f64 {
        self.state
            .borrow()
            .engine
            .as_ref()
            .map_or(0.0, BitEngine::scroll_offset)
    }

    /// Release listeners and the pending scroll timer, and detach the DOM.
    /// Further calls are no-ops.
    #[wasm_bindgen]
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        for (kind, closure) in &self.closures {
            let _ = self
                .canvas
                .remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        }
        if let Some(closure) = self.scroll_closure.take() {
            let _ = self
                .scroll_container
                .remove_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref());
        }

        {
            let mut guard = self.state.borrow_mut();
            let s = &mut *guard;
            s.render_callback = None;
            s.hover_callback = None;
            if let Some(engine) = s.engine.take() {
                engine.dispose(&mut s.host);
            }
        }
        self.scroll_container.remove();
        log::debug!("bit view disposed");
    }
}

#[cfg(target_arch = "wasm32")]
impl Drop for BitView {
    fn drop(&mut self) {
        self.dispose();
    }
}
