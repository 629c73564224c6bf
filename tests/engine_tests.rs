//! Engine lifecycle tests
//!
//! Drives `BitEngine` with a `ManualHost` clock and draws into a
//! `RecordingSurface`: scroll debouncing, resize, hover and disposal.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::cell::RefCell;
use std::rc::Rc;

use bitview::layout::{LayoutParams, Point, VisibleRange};
use bitview::render::{DrawCommand, DrawSurface, RecordingSurface};
use bitview::viewer::{BitEngine, EngineEvent, ManualHost, SCROLL_DEBOUNCE_MS};

/// Engine with the reference layout: 10 bytes per row, 20px rows, 40px viewport.
fn attached(byte_count: usize) -> (BitEngine, ManualHost) {
    let mut host = ManualHost::new();
    let params = LayoutParams::new(5, 20).with_viewport_height(40);
    let mut engine = BitEngine::attach(params, &mut host).unwrap();
    engine.handle(
        EngineEvent::Resized {
            container_width: 400.0,
        },
        &mut host,
    );
    engine.handle(EngineEvent::BytesReplaced(vec![0xF0; byte_count]), &mut host);
    (engine, host)
}

/// Advance the clock and deliver fired timers; returns how many asked for a redraw.
fn run_timers(engine: &mut BitEngine, host: &mut ManualHost, ms: u64) -> usize {
    host.advance(ms)
        .into_iter()
        .filter(|&timer| engine.handle(EngineEvent::ScrollTimerFired(timer), host))
        .count()
}

// ============================================================================
// Scroll debouncing
// ============================================================================

#[test]
fn test_scroll_burst_commits_once_with_last_offset() {
    let (mut engine, mut host) = attached(1000);
    let mut redraws = 0;
    for i in 1..=10u32 {
        if engine.handle(
            EngineEvent::Scrolled {
                offset: f64::from(i) * 20.0,
            },
            &mut host,
        ) {
            redraws += 1;
        }
        redraws += run_timers(&mut engine, &mut host, 4);
    }
    assert_eq!(redraws, 0, "nothing commits inside the debounce window");
    assert_eq!(engine.scroll_offset(), 0.0);
    assert_eq!(host.pending_timers(), 1);

    redraws += run_timers(&mut engine, &mut host, u64::from(SCROLL_DEBOUNCE_MS));
    assert_eq!(redraws, 1);
    assert_eq!(engine.scroll_offset(), 200.0);
    assert_eq!(host.pending_timers(), 0);
}

#[test]
fn test_scroll_after_commit_starts_a_new_window() {
    let (mut engine, mut host) = attached(1000);
    engine.handle(EngineEvent::Scrolled { offset: 20.0 }, &mut host);
    assert_eq!(run_timers(&mut engine, &mut host, 50), 1);
    engine.handle(EngineEvent::Scrolled { offset: 60.0 }, &mut host);
    assert_eq!(host.pending_timers(), 1);
    assert_eq!(run_timers(&mut engine, &mut host, 50), 1);
    assert_eq!(engine.scroll_offset(), 60.0);
}

#[test]
fn test_draw_uses_committed_offset_only() {
    let (mut engine, mut host) = attached(1000);
    engine.handle(EngineEvent::Scrolled { offset: 100.0 }, &mut host);
    let mut surface = RecordingSurface::new();
    assert_eq!(engine.draw(&mut surface).range, VisibleRange::new(0, 30));

    run_timers(&mut engine, &mut host, 50);
    let stats = engine.draw(&mut surface);
    assert_eq!(stats.range, VisibleRange::new(50, 80));
}

#[test]
fn test_scroll_without_timers_commits_immediately() {
    let (mut engine, mut host) = attached(1000);
    host.refuse_timers(true);
    assert!(engine.handle(EngineEvent::Scrolled { offset: 40.0 }, &mut host));
    assert_eq!(engine.scroll_offset(), 40.0);
    assert!(engine.needs_render());
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_resize_changes_columns_and_content_height() {
    let (mut engine, mut host) = attached(100);
    assert_eq!(engine.content_height(), 200);
    assert!(engine.handle(
        EngineEvent::Resized {
            container_width: 800.0
        },
        &mut host
    ));
    assert_eq!(engine.content_width(), 800);
    assert_eq!(engine.content_height(), 100);
}

#[test]
fn test_resize_within_same_column_count_is_quiet() {
    let (mut engine, mut host) = attached(100);
    assert!(!engine.handle(
        EngineEvent::Resized {
            container_width: 439.0
        },
        &mut host
    ));
}

#[test]
fn test_too_narrow_container_draws_nothing() {
    let (mut engine, mut host) = attached(100);
    engine.handle(
        EngineEvent::Resized {
            container_width: 20.0,
        },
        &mut host,
    );
    let mut surface = RecordingSurface::new();
    let stats = engine.draw(&mut surface);
    assert!(stats.skipped);
    assert_eq!(surface.fills().count(), 0);
    assert_eq!(surface.frame_count(), 0);
    assert_eq!(engine.content_width(), 0);
    assert_eq!(engine.visible_range(), VisibleRange::default());
}

#[test]
fn test_shrinking_to_no_columns_empties_previous_frame() {
    let (mut engine, mut host) = attached(100);
    let mut surface = RecordingSurface::new();
    let first = engine.draw(&mut surface);
    assert_eq!(first.bytes_drawn, 30);
    assert!(surface.fills().count() > 0);
    assert_eq!((surface.width(), surface.height()), (400, 40));
    surface.take();

    assert!(engine.handle(
        EngineEvent::Resized {
            container_width: 20.0
        },
        &mut host
    ));
    let stats = engine.draw(&mut surface);
    assert!(stats.skipped);
    assert_eq!(
        surface.take(),
        vec![DrawCommand::Resize {
            width: 0,
            height: 0,
            dpr: 1.0
        }]
    );
    assert_eq!((surface.width(), surface.height()), (0, 0));
    assert_eq!(engine.content_width(), 0);
}

#[test]
fn test_surface_is_sized_to_content_width_and_viewport() {
    let (mut engine, _host) = attached(100);
    engine.set_device_pixel_ratio(2.0);
    let mut surface = RecordingSurface::new();
    engine.draw(&mut surface);
    assert_eq!(
        surface.commands().first(),
        Some(&DrawCommand::Resize {
            width: 400,
            height: 40,
            dpr: 2.0
        })
    );
    assert_eq!(surface.width(), 400);
}

// ============================================================================
// Hover
// ============================================================================

#[test]
fn test_hover_highlights_byte_under_pointer() {
    let (mut engine, mut host) = attached(100);
    assert!(engine.handle(EngineEvent::PointerEntered(Point::new(125.0, 30.0)), &mut host));
    assert_eq!(engine.hovered_byte(), Some(13));
    let mut surface = RecordingSurface::new();
    assert!(engine.draw(&mut surface).highlighted);
    assert_eq!(surface.clears().count(), 1);
}

#[test]
fn test_hover_accounts_for_scroll_offset() {
    let (mut engine, mut host) = attached(100);
    host.refuse_timers(true);
    engine.handle(EngineEvent::Scrolled { offset: 40.0 }, &mut host);
    engine.handle(EngineEvent::PointerMoved(Point::new(0.0, 0.0)), &mut host);
    assert_eq!(engine.hovered_byte(), Some(20));
}

#[test]
fn test_hover_past_last_byte_never_highlights() {
    let (mut engine, mut host) = attached(25);
    // Row 2, column 7: index 27 is past the 25 bytes
    engine.handle(EngineEvent::PointerMoved(Point::new(290.0, 45.0)), &mut host);
    assert_eq!(engine.hovered_byte(), None);

    let mut surface = RecordingSurface::new();
    let stats = engine.draw(&mut surface);
    assert!(!stats.highlighted);
    assert_eq!(surface.clears().count(), 0);
}

#[test]
fn test_pointer_jitter_inside_cell_does_not_redraw() {
    let (mut engine, mut host) = attached(100);
    assert!(engine.handle(EngineEvent::PointerMoved(Point::new(1.0, 1.0)), &mut host));
    assert!(!engine.handle(EngineEvent::PointerMoved(Point::new(39.0, 19.0)), &mut host));
    assert!(engine.handle(EngineEvent::PointerLeft, &mut host));
    assert!(!engine.handle(EngineEvent::PointerLeft, &mut host));
}

#[test]
fn test_hover_listener_receives_changes() {
    let (mut engine, mut host) = attached(25);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    engine.set_hover_listener(Some(Box::new(move |hovered: Option<usize>| {
        sink.borrow_mut().push(hovered);
    })));

    engine.handle(EngineEvent::PointerMoved(Point::new(0.0, 0.0)), &mut host);
    // Out of range: reported as no hover
    engine.handle(EngineEvent::PointerMoved(Point::new(290.0, 45.0)), &mut host);
    // Still out of range: no repeat notification
    engine.handle(EngineEvent::PointerMoved(Point::new(330.0, 45.0)), &mut host);
    // Growing the sequence brings the hovered index into range
    engine.handle(EngineEvent::BytesReplaced(vec![0; 40]), &mut host);

    assert_eq!(*seen.borrow(), vec![Some(0), None, Some(28)]);
}

// ============================================================================
// Disposal
// ============================================================================

#[test]
fn test_dispose_with_pending_timer_releases_everything() {
    let (mut engine, mut host) = attached(1000);
    engine.handle(EngineEvent::Scrolled { offset: 80.0 }, &mut host);
    assert_eq!(host.pending_timers(), 1);
    assert_eq!(host.active_subscriptions(), 1);

    engine.dispose(&mut host);
    assert_eq!(host.pending_timers(), 0);
    assert_eq!(host.active_subscriptions(), 0);
    // The cancelled timer never comes due
    assert!(host.advance(10_000).is_empty());
}

#[test]
fn test_stale_timer_after_new_window_is_ignored() {
    let (mut engine, mut host) = attached(1000);
    engine.handle(EngineEvent::Scrolled { offset: 20.0 }, &mut host);
    let first = host.advance(50);
    assert_eq!(first.len(), 1);
    assert!(engine.handle(EngineEvent::ScrollTimerFired(first[0]), &mut host));
    // Redelivering the same handle does nothing
    assert!(!engine.handle(EngineEvent::ScrollTimerFired(first[0]), &mut host));
}
