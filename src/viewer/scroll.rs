//! Debounced scroll offset.
//!
//! Raw scroll events only update a pending value; the first one of a burst
//! starts a single timer, and the timer commits whatever offset is pending
//! when it fires. This caps redraws to one per debounce window while always
//! rendering the settled offset.

use super::host::{Host, TimerHandle};

/// Delay (ms) between the first scroll event of a burst and its commit.
pub const SCROLL_DEBOUNCE_MS: u32 = 50;

/// Debounce slot. At most one timer is outstanding, and only in `Pending`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebounceState {
    /// No timer outstanding
    Idle,
    /// A timer is outstanding and will commit `offset`
    Pending { offset: f64, timer: TimerHandle },
}

/// What a scroll request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollRequest {
    /// Started the debounce timer
    Deferred,
    /// Folded into the already pending timer
    Coalesced,
    /// The host could not schedule a timer; committed immediately
    Committed,
}

/// Owns the committed scroll offset and the debounce state machine.
#[derive(Debug)]
pub struct ScrollVirtualizer {
    committed: f64,
    state: DebounceState,
    delay_ms: u32,
}

impl Default for ScrollVirtualizer {
    fn default() -> Self {
        Self::new()
    }
}

fn sanitize(offset: f64) -> f64 {
    if offset.is_finite() {
        offset.max(0.0)
    } else {
        0.0
    }
}

impl ScrollVirtualizer {
    pub fn new() -> Self {
        Self::with_delay(SCROLL_DEBOUNCE_MS)
    }

    pub fn with_delay(delay_ms: u32) -> Self {
        Self {
            committed: 0.0,
            state: DebounceState::Idle,
            delay_ms,
        }
    }

    /// Last committed offset; the one drawing uses.
    pub fn offset(&self) -> f64 {
        self.committed
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::Pending { .. })
    }

    /// Record a raw scroll offset from the host's scroll container.
    pub fn request(&mut self, offset: f64, host: &mut dyn Host) -> ScrollRequest {
        let offset = sanitize(offset);
        match self.state {
            DebounceState::Pending { timer, .. } => {
                self.state = DebounceState::Pending { offset, timer };
                ScrollRequest::Coalesced
            }
            DebounceState::Idle => match host.set_timeout(self.delay_ms) {
                Ok(timer) => {
                    self.state = DebounceState::Pending { offset, timer };
                    ScrollRequest::Deferred
                }
                Err(e) => {
                    log::warn!("scroll debounce unavailable ({e}); committing immediately");
                    self.committed = offset;
                    ScrollRequest::Committed
                }
            },
        }
    }

    /// Timer callback. Commits the pending offset if `handle` is the
    /// outstanding timer; returns whether a commit happened.
    pub fn fire(&mut self, handle: TimerHandle) -> bool {
        match self.state {
            DebounceState::Pending { offset, timer } if timer == handle => {
                self.committed = offset;
                self.state = DebounceState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Cancel the outstanding timer, dropping the pending offset.
    pub fn cancel(&mut self, host: &mut dyn Host) -> bool {
        match self.state {
            DebounceState::Pending { timer, .. } => {
                host.clear_timeout(timer);
                self.state = DebounceState::Idle;
                true
            }
            DebounceState::Idle => false,
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
    use super::*;
    use crate::viewer::host::ManualHost;

    #[test]
    fn test_first_request_starts_one_timer() {
        let mut host = ManualHost::new();
        let mut scroll = ScrollVirtualizer::new();
        assert_eq!(scroll.request(100.0, &mut host), ScrollRequest::Deferred);
        assert_eq!(host.pending_timers(), 1);
        assert_eq!(scroll.offset(), 0.0);
    }

    #[test]
    fn test_burst_coalesces_into_last_offset() {
        let mut host = ManualHost::new();
        let mut scroll = ScrollVirtualizer::new();
        scroll.request(10.0, &mut host);
        for offset in [20.0, 30.0, 40.0] {
            assert_eq!(scroll.request(offset, &mut host), ScrollRequest::Coalesced);
        }
        assert_eq!(host.pending_timers(), 1);

        let fired = host.advance(u64::from(SCROLL_DEBOUNCE_MS));
        assert_eq!(fired.len(), 1);
        assert!(scroll.fire(fired[0]));
        assert_eq!(scroll.offset(), 40.0);
        assert!(!scroll.is_pending());
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let mut host = ManualHost::new();
        let mut scroll = ScrollVirtualizer::new();
        scroll.request(10.0, &mut host);
        assert!(!scroll.fire(TimerHandle(-1)));
        assert!(scroll.is_pending());
    }

    #[test]
    fn test_cancel_clears_host_timer() {
        let mut host = ManualHost::new();
        let mut scroll = ScrollVirtualizer::new();
        scroll.request(10.0, &mut host);
        assert!(scroll.cancel(&mut host));
        assert_eq!(host.pending_timers(), 0);
        assert!(host.advance(1000).is_empty());
        assert_eq!(scroll.offset(), 0.0);
        assert!(!scroll.cancel(&mut host));
    }

    #[test]
    fn test_commits_immediately_without_timers() {
        let mut host = ManualHost::new();
        host.refuse_timers(true);
        let mut scroll = ScrollVirtualizer::new();
        assert_eq!(scroll.request(60.0, &mut host), ScrollRequest::Committed);
        assert_eq!(scroll.offset(), 60.0);
    }

    #[test]
    fn test_negative_and_nan_offsets_clamp_to_zero() {
        let mut host = ManualHost::new();
        host.refuse_timers(true);
        let mut scroll = ScrollVirtualizer::new();
        scroll.request(-5.0, &mut host);
        assert_eq!(scroll.offset(), 0.0);
        scroll.request(f64::NAN, &mut host);
        assert_eq!(scroll.offset(), 0.0);
    }
}
