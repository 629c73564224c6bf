//! The rendering engine state object.
//!
//! `BitEngine` owns every piece of mutable viewer state (bytes, layout, scroll,
//! hover) and changes it only in response to [`EngineEvent`]s. Drawing is a
//! separate step against any [`DrawSurface`], so the same engine drives the
//! browser canvas and the recording surface used in tests.

use crate::error::Result;
use crate::layout::{visible_range, LayoutModel, LayoutParams, Point, VisibleRange};
use crate::render::{render_frame, BitMaskTable, DrawSurface, FrameStats, RenderParams};

use super::host::{Host, Subscription, TimerHandle};
use super::hover::HoverTracker;
use super::resize::ResizeController;
use super::scroll::{DebounceState, ScrollRequest, ScrollVirtualizer};

/// Input events, all in logical pixels relative to the drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// The host measured a new container width
    Resized { container_width: f64 },
    /// Raw scroll offset from the host's scroll container
    Scrolled { offset: f64 },
    /// A timer scheduled through [`Host::set_timeout`] fired
    ScrollTimerFired(TimerHandle),
    PointerEntered(Point),
    PointerMoved(Point),
    PointerLeft,
    /// The host replaced the byte sequence
    BytesReplaced(Vec<u8>),
    /// The host supplied new layout parameters
    ParamsChanged(LayoutParams),
}

/// Hover notification: the in-range hovered byte, or `None`.
pub type HoverListener = Box<dyn FnMut(Option<usize>)>;

pub struct BitEngine {
    params: LayoutParams,
    bytes: Vec<u8>,
    masks: BitMaskTable,
    resize: ResizeController,
    scroll: ScrollVirtualizer,
    hover: HoverTracker,
    resize_subscription: Option<Subscription>,
    hover_listener: Option<HoverListener>,
    /// Last value handed to the hover listener
    notified_hover: Option<usize>,
    device_pixel_ratio: f32,
    needs_render: bool,
}

impl std::fmt::Debug for BitEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitEngine")
            .field("params", &self.params)
            .field("byte_count", &self.bytes.len())
            .field("layout", &self.resize.layout())
            .field("scroll", &self.scroll)
            .field("hover", &self.hover)
            .field("needs_render", &self.needs_render)
            .finish_non_exhaustive()
    }
}

impl BitEngine {
    /// Validate `params` and subscribe to container resizes.
    ///
    /// No layout exists until the first [`EngineEvent::Resized`].
    pub fn attach(params: LayoutParams, host: &mut dyn Host) -> Result<Self> {
        let params = params.validate()?;
        let resize_subscription = host.subscribe_resize()?;
        log::debug!(
            "attached: bit cell {}x{}px, viewport {:?}",
            params.bit_pixel_width,
            params.bit_pixel_height,
            params.viewport_pixel_height
        );
        Ok(Self {
            params,
            bytes: Vec::new(),
            masks: BitMaskTable::new(),
            resize: ResizeController::new(),
            scroll: ScrollVirtualizer::new(),
            hover: HoverTracker::new(),
            resize_subscription: Some(resize_subscription),
            hover_listener: None,
            notified_hover: None,
            device_pixel_ratio: 1.0,
            needs_render: true,
        })
    }

    /// Apply one event. Returns `true` if a redraw is needed.
    pub fn handle(&mut self, event: EngineEvent, host: &mut dyn Host) -> bool {
        let redraw = match event {
            EngineEvent::Resized { container_width } => {
                if self.resize.container_resized(container_width, &self.params) {
                    self.refresh_hover();
                    true
                } else {
                    false
                }
            }
            EngineEvent::Scrolled { offset } => match self.scroll.request(offset, host) {
                ScrollRequest::Committed => {
                    self.refresh_hover();
                    true
                }
                ScrollRequest::Deferred | ScrollRequest::Coalesced => false,
            },
            EngineEvent::ScrollTimerFired(handle) => {
                if self.scroll.fire(handle) {
                    self.refresh_hover();
                    true
                } else {
                    log::trace!("ignoring stale scroll timer {:?}", handle);
                    false
                }
            }
            EngineEvent::PointerEntered(point) | EngineEvent::PointerMoved(point) => {
                let offset = self.scroll.offset();
                let changed = self.hover.pointer_moved(point, offset, self.resize.layout());
                if changed {
                    self.notify_hover();
                }
                changed
            }
            EngineEvent::PointerLeft => {
                let changed = self.hover.pointer_left();
                if changed {
                    self.notify_hover();
                }
                changed
            }
            EngineEvent::BytesReplaced(bytes) => {
                self.set_bytes(bytes);
                true
            }
            EngineEvent::ParamsChanged(params) => match self.set_params(params) {
                Ok(changed) => changed,
                Err(e) => {
                    log::warn!("rejected layout params: {e}");
                    false
                }
            },
        };
        self.needs_render |= redraw;
        redraw
    }

    /// Replace the byte sequence. Scroll and pointer state are kept.
    pub fn set_bytes(&mut self, bytes: Vec<u8>) {
        log::debug!("byte sequence replaced: {} bytes", bytes.len());
        self.bytes = bytes;
        self.needs_render = true;
        self.notify_hover();
    }

    /// Validate and apply new params, recomputing layout against the last
    /// measured width. Returns `true` if anything changed.
    pub fn set_params(&mut self, params: LayoutParams) -> Result<bool> {
        let params = params.validate()?;
        if params == self.params {
            return Ok(false);
        }
        self.params = params;
        // Any params change redraws, whether or not the layout moved
        let _ = self.resize.relayout(&self.params);
        self.refresh_hover();
        self.needs_render = true;
        Ok(true)
    }

    pub fn set_device_pixel_ratio(&mut self, dpr: f32) {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        if (self.device_pixel_ratio - dpr).abs() > f32::EPSILON {
            self.device_pixel_ratio = dpr;
            self.needs_render = true;
        }
    }

    /// Register the hover listener. It is called only when the in-range
    /// hovered byte changes.
    pub fn set_hover_listener(&mut self, listener: Option<HoverListener>) {
        self.hover_listener = listener;
    }

    /// Draw the current state. With no established layout the surface is
    /// collapsed to 0x0, so no earlier frame stays visible, and the returned
    /// stats are marked `skipped`.
    pub fn draw<S: DrawSurface + ?Sized>(&mut self, surface: &mut S) -> FrameStats {
        self.needs_render = false;
        let Some(layout) = self.resize.layout().copied() else {
            log::debug!(
                "skipping draw: container width {} fits no byte column",
                self.resize.container_width()
            );
            surface.resize(0, 0, self.device_pixel_ratio);
            return FrameStats {
                skipped: true,
                ..FrameStats::default()
            };
        };

        surface.resize(
            layout.content_width(),
            self.surface_height(),
            self.device_pixel_ratio,
        );
        let range = self.visible_range();
        let params = RenderParams {
            bytes: &self.bytes,
            layout: &layout,
            scroll_offset: self.scroll.offset(),
            masks: &self.masks,
            palette: &self.params.palette,
        };
        let stats = render_frame(surface, &params, range, self.hover.hovered());
        log::trace!(
            "drew bytes {}..{} ({} drawn, highlight: {})",
            range.start,
            range.end,
            stats.bytes_drawn,
            stats.highlighted
        );
        stats
    }

    /// Release the resize subscription and any pending scroll timer.
    ///
    /// Consumes the engine, so no event can reach it afterwards.
    pub fn dispose(mut self, host: &mut dyn Host) {
        if self.scroll.cancel(host) {
            log::debug!("cancelled pending scroll timer on dispose");
        }
        if let Some(subscription) = self.resize_subscription.take() {
            host.unsubscribe(subscription);
        }
        self.hover_listener = None;
    }

    pub fn params(&self) -> &LayoutParams {
        &self.params
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn layout(&self) -> Option<&LayoutModel> {
        self.resize.layout()
    }

    pub fn needs_render(&self) -> bool {
        self.needs_render
    }

    /// Committed scroll offset.
    pub fn scroll_offset(&self) -> f64 {
        self.scroll.offset()
    }

    /// Outstanding debounce timer, if any.
    pub fn pending_timer(&self) -> Option<TimerHandle> {
        match self.scroll.state() {
            DebounceState::Pending { timer, .. } => Some(timer),
            DebounceState::Idle => None,
        }
    }

    /// Hovered byte bounded by the byte count.
    pub fn hovered_byte(&self) -> Option<usize> {
        self.hover.hovered().filter(|&i| i < self.bytes.len())
    }

    /// Pixel height of the full unscrolled content. Without a layout this is
    /// one row.
    pub fn content_height(&self) -> u64 {
        self.resize.layout().map_or_else(
            || u64::from(self.params.bit_pixel_height),
            |layout| layout.content_height(self.bytes.len()),
        )
    }

    /// Width of whole byte columns, 0 without a layout.
    pub fn content_width(&self) -> u32 {
        self.resize.content_width()
    }

    /// Logical surface height: the viewport when set, else the full content.
    pub fn surface_height(&self) -> u32 {
        self.params.viewport_pixel_height.unwrap_or_else(|| {
            u32::try_from(self.content_height()).unwrap_or(u32::MAX)
        })
    }

    /// Bytes a draw at the committed scroll offset would cover.
    pub fn visible_range(&self) -> VisibleRange {
        self.resize.layout().map_or_else(VisibleRange::default, |layout| {
            visible_range(
                self.scroll.offset(),
                self.params.viewport_pixel_height,
                layout,
                self.bytes.len(),
            )
        })
    }

    fn refresh_hover(&mut self) {
        self.hover.refresh(self.scroll.offset(), self.resize.layout());
        self.notify_hover();
    }

    fn notify_hover(&mut self) {
        let current = self.hovered_byte();
        if current == self.notified_hover {
            return;
        }
        self.notified_hover = current;
        if let Some(listener) = self.hover_listener.as_mut() {
            listener(current);
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::render::{DrawCommand, RecordingSurface};
    use crate::viewer::host::ManualHost;

    fn engine(host: &mut ManualHost) -> BitEngine {
        let params = LayoutParams::new(5, 20).with_viewport_height(40);
        let mut engine = BitEngine::attach(params, host).unwrap();
        engine.handle(
            EngineEvent::Resized {
                container_width: 400.0,
            },
            host,
        );
        engine.handle(EngineEvent::BytesReplaced(vec![0xAA; 100]), host);
        engine
    }

    #[test]
    fn test_attach_rejects_invalid_params() {
        let mut host = ManualHost::new();
        assert!(BitEngine::attach(LayoutParams::new(0, 20), &mut host).is_err());
        assert_eq!(host.active_subscriptions(), 0);
    }

    #[test]
    fn test_attach_subscribes_and_dispose_unsubscribes() {
        let mut host = ManualHost::new();
        let engine = engine(&mut host);
        assert_eq!(host.active_subscriptions(), 1);
        engine.dispose(&mut host);
        assert_eq!(host.active_subscriptions(), 0);
    }

    #[test]
    fn test_draw_before_layout_is_skipped() {
        let mut host = ManualHost::new();
        let mut engine = BitEngine::attach(LayoutParams::new(5, 20), &mut host).unwrap();
        let mut surface = RecordingSurface::new();
        let stats = engine.draw(&mut surface);
        assert!(stats.skipped);
        assert_eq!(
            surface.commands(),
            &[DrawCommand::Resize {
                width: 0,
                height: 0,
                dpr: 1.0
            }]
        );
        assert_eq!(engine.content_width(), 0);
        assert_eq!(engine.content_height(), 20);
    }

    #[test]
    fn test_draw_sizes_surface_to_viewport() {
        let mut host = ManualHost::new();
        let mut engine = engine(&mut host);
        let mut surface = RecordingSurface::new();
        let stats = engine.draw(&mut surface);
        assert_eq!((surface.width(), surface.height()), (400, 40));
        assert_eq!(stats.range, VisibleRange::new(0, 30));
        assert!(!engine.needs_render());
    }

    #[test]
    fn test_surface_height_without_viewport_is_content_height() {
        let mut host = ManualHost::new();
        let mut engine = BitEngine::attach(LayoutParams::new(5, 20), &mut host).unwrap();
        engine.handle(EngineEvent::Resized { container_width: 400.0 }, &mut host);
        engine.handle(EngineEvent::BytesReplaced(vec![1; 25]), &mut host);
        assert_eq!(engine.content_height(), 60);
        assert_eq!(engine.surface_height(), 60);
        assert_eq!(engine.visible_range(), VisibleRange::new(0, 25));
    }

    #[test]
    fn test_scroll_commits_on_timer() {
        let mut host = ManualHost::new();
        let mut engine = engine(&mut host);
        assert!(!engine.handle(EngineEvent::Scrolled { offset: 40.0 }, &mut host));
        let timer = engine.pending_timer().unwrap();
        assert!(engine.handle(EngineEvent::ScrollTimerFired(timer), &mut host));
        assert_eq!(engine.scroll_offset(), 40.0);
        assert_eq!(engine.visible_range(), VisibleRange::new(20, 50));
    }

    #[test]
    fn test_hover_listener_sees_in_range_changes_only() {
        let mut host = ManualHost::new();
        let mut engine = engine(&mut host);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        engine.set_hover_listener(Some(Box::new(move |hovered: Option<usize>| {
            sink.borrow_mut().push(hovered);
        })));

        engine.handle(EngineEvent::PointerEntered(Point::new(5.0, 5.0)), &mut host);
        engine.handle(EngineEvent::PointerMoved(Point::new(6.0, 6.0)), &mut host);
        engine.handle(EngineEvent::PointerMoved(Point::new(45.0, 5.0)), &mut host);
        engine.handle(EngineEvent::PointerLeft, &mut host);

        assert_eq!(*seen.borrow(), vec![Some(0), Some(1), None]);
    }

    #[test]
    fn test_shrinking_bytes_drops_hover_out_of_range() {
        let mut host = ManualHost::new();
        let mut engine = engine(&mut host);
        engine.handle(EngineEvent::PointerMoved(Point::new(85.0, 25.0)), &mut host);
        assert_eq!(engine.hovered_byte(), Some(12));
        engine.handle(EngineEvent::BytesReplaced(vec![0; 5]), &mut host);
        assert_eq!(engine.hovered_byte(), None);
    }

    #[test]
    fn test_params_change_relayouts_against_last_width() {
        let mut host = ManualHost::new();
        let mut engine = engine(&mut host);
        let params = LayoutParams::new(10, 20).with_viewport_height(40);
        assert!(engine.handle(EngineEvent::ParamsChanged(params.clone()), &mut host));
        assert_eq!(engine.layout().unwrap().bytes_per_row, 5);
        assert!(!engine.handle(EngineEvent::ParamsChanged(params), &mut host));
    }

    #[test]
    fn test_invalid_params_event_is_rejected() {
        let mut host = ManualHost::new();
        let mut engine = engine(&mut host);
        assert!(!engine.handle(EngineEvent::ParamsChanged(LayoutParams::new(5, 0)), &mut host));
        assert_eq!(engine.params().bit_pixel_height, 20);
    }

    #[test]
    fn test_device_pixel_ratio_reaches_surface() {
        let mut host = ManualHost::new();
        let mut engine = engine(&mut host);
        engine.set_device_pixel_ratio(2.0);
        let mut surface = RecordingSurface::new();
        engine.draw(&mut surface);
        assert_eq!(surface.dpr(), 2.0);
    }
}
