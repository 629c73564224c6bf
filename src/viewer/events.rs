//! Event routing for `BitView`.
//!
//! All methods here are `pub(crate)` helpers called from DOM listeners and
//! from the wasm-exported API in `mod.rs`. Each one takes the shared state,
//! feeds the engine, and releases the borrow before calling back into JS.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, HtmlDivElement, MouseEvent};

use super::engine::{BitEngine, EngineEvent};
use super::{now_ms, BitView, BrowserHost, SharedState};
use crate::layout::Point;
use crate::render::{DrawSurface, FrameStats};

/// Scroll offset as a float; `scrollTop` is fractional on high-DPI displays.
pub(crate) fn scroll_top_f64(element: &HtmlDivElement) -> f64 {
    js_sys::Reflect::get(element.as_ref(), &JsValue::from_str("scrollTop"))
        .ok()
        .and_then(|value| value.as_f64())
        .unwrap_or_else(|| f64::from(element.scroll_top()))
}

/// Host width less the scroll container's border on both sides.
pub(crate) fn inner_width(host_width: i32, border: u32) -> f64 {
    (f64::from(host_width) - 2.0 * f64::from(border)).max(0.0)
}

/// Pointer position relative to the canvas' top-left corner.
pub(crate) fn canvas_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Point {
    let rect = canvas.get_bounding_client_rect();
    Point::new(
        f64::from(event.client_x()) - rect.left(),
        f64::from(event.client_y()) - rect.top(),
    )
}

impl BitView {
    /// Feed one event to the engine and follow up with hover notification
    /// and rendering.
    pub(crate) fn dispatch(state: &Rc<RefCell<SharedState>>, event: EngineEvent) {
        let redraw = Self::with_engine(state, |engine, host| engine.handle(event, host));
        if let Some(redraw) = redraw {
            Self::after_update(state, redraw);
        }
    }

    /// Run `f` against the live engine. `None` once disposed.
    pub(crate) fn with_engine<R>(
        state: &Rc<RefCell<SharedState>>,
        f: impl FnOnce(&mut BitEngine, &mut BrowserHost) -> R,
    ) -> Option<R> {
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        let engine = s.engine.as_mut()?;
        Some(f(engine, &mut s.host))
    }

    /// Deliver a queued hover change and schedule or perform a redraw.
    pub(crate) fn after_update(state: &Rc<RefCell<SharedState>>, redraw: bool) {
        let (hover, render_callback) = {
            let s = state.borrow();
            let hover = s
                .pending_hover
                .take()
                .and_then(|hovered| s.hover_callback.clone().map(|cb| (cb, hovered)));
            (hover, s.render_callback.clone())
        };

        if let Some((callback, hovered)) = hover {
            let value = hovered.map_or(JsValue::NULL, JsValue::from);
            let _ = callback.call1(&JsValue::NULL, &value);
        }

        if !redraw {
            return;
        }
        if render_callback.is_some() {
            Self::invoke_render_callback(render_callback);
        } else {
            Self::render_state(state);
        }
    }

    pub(crate) fn invoke_render_callback(callback: Option<Function>) {
        if let Some(callback) = callback {
            let _ = callback.call0(&JsValue::NULL);
        }
    }

    /// Debounce timer fired. The browser only ever has the engine's current
    /// timer outstanding, so it is delivered under that handle.
    pub(crate) fn timer_fired(state: &Rc<RefCell<SharedState>>) {
        let handle = state
            .borrow()
            .engine
            .as_ref()
            .and_then(BitEngine::pending_timer);
        if let Some(handle) = handle {
            Self::dispatch(state, EngineEvent::ScrollTimerFired(handle));
        }
    }

    /// Measure the host element and report the width inside the scroll
    /// container's border. The host never shows the scroll container's
    /// scrollbar, so the width is stable as content grows.
    pub(crate) fn measure(state: &Rc<RefCell<SharedState>>) {
        let container_width = {
            let s = state.borrow();
            let border = s
                .engine
                .as_ref()
                .map_or(0, |engine| engine.params().border_pixel_width);
            inner_width(s.container.client_width(), border)
        };
        Self::dispatch(state, EngineEvent::Resized { container_width });
    }

    pub(crate) fn scrolled(state: &Rc<RefCell<SharedState>>) {
        let offset = scroll_top_f64(&state.borrow().scroll_container);
        Self::dispatch(state, EngineEvent::Scrolled { offset });
    }

    /// Draw now and sync the canvas position and scroll spacer.
    pub(crate) fn render_state(state: &Rc<RefCell<SharedState>>) -> FrameStats {
        let start = now_ms();
        let mut guard = state.borrow_mut();
        let s = &mut *guard;
        let Some(engine) = s.engine.as_mut() else {
            return FrameStats::default();
        };

        let mut stats = engine.draw(&mut s.surface);
        s.surface.set_top(engine.scroll_offset());
        let _ = s
            .spacer
            .style()
            .set_property("min-height", &format!("{}px", engine.content_height()));

        stats.draw_ms = now_ms() - start;
        if !stats.skipped {
            log::debug!(
                "rendered {} bytes into {}x{} in {:.2}ms",
                stats.bytes_drawn,
                s.surface.width(),
                s.surface.height(),
                stats.draw_ms
            );
        }
        s.last_stats = stats;
        stats
    }
}
