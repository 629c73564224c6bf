//! Host environment interface.
//!
//! The engine never touches globals: timers and the resize subscription go
//! through [`Host`], so the same engine runs against the browser
//! (`BrowserHost`) or against [`ManualHost`] with a fake clock.

use std::collections::{BTreeSet, HashSet};

use crate::error::{BitviewError, Result};

/// Handle of an outstanding one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub i32);

/// Handle of a registered resize listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(pub u32);

/// Services the engine needs from its environment.
pub trait Host {
    /// Schedule a one-shot timer. When it fires the host delivers
    /// `EngineEvent::ScrollTimerFired` with the returned handle.
    fn set_timeout(&mut self, delay_ms: u32) -> Result<TimerHandle>;

    /// Cancel a timer. Unknown or already-fired handles are ignored.
    fn clear_timeout(&mut self, handle: TimerHandle);

    /// Start delivering container resize notifications.
    fn subscribe_resize(&mut self) -> Result<Subscription>;

    /// Stop delivering resize notifications for `subscription`.
    fn unsubscribe(&mut self, subscription: Subscription);
}

/// Deterministic host with a manually advanced clock.
///
/// Timers fire only from [`advance`](Self::advance); nothing runs in the
/// background.
#[derive(Debug, Default)]
pub struct ManualHost {
    now_ms: u64,
    next_timer: i32,
    next_subscription: u32,
    /// Outstanding timers ordered by (deadline, handle)
    timers: BTreeSet<(u64, TimerHandle)>,
    subscriptions: HashSet<u32>,
    refuse_timers: bool,
}

impl ManualHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current fake time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Move the clock forward and return the timers that came due, in
    /// firing order. Returned timers are no longer outstanding.
    pub fn advance(&mut self, ms: u64) -> Vec<TimerHandle> {
        self.now_ms = self.now_ms.saturating_add(ms);
        let now = self.now_ms;
        let due: Vec<(u64, TimerHandle)> = self
            .timers
            .iter()
            .take_while(|(deadline, _)| *deadline <= now)
            .copied()
            .collect();
        for entry in &due {
            self.timers.remove(entry);
        }
        due.into_iter().map(|(_, handle)| handle).collect()
    }

    /// Number of timers scheduled and not yet fired or cancelled.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Number of live resize subscriptions.
    pub fn active_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    /// Make subsequent `set_timeout` calls fail, as a host without timers would.
    pub fn refuse_timers(&mut self, refuse: bool) {
        self.refuse_timers = refuse;
    }
}

impl Host for ManualHost {
    fn set_timeout(&mut self, delay_ms: u32) -> Result<TimerHandle> {
        if self.refuse_timers {
            return Err(BitviewError::Host("timers unavailable".into()));
        }
        self.next_timer = self.next_timer.wrapping_add(1);
        let handle = TimerHandle(self.next_timer);
        let deadline = self.now_ms.saturating_add(u64::from(delay_ms));
        self.timers.insert((deadline, handle));
        Ok(handle)
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.timers.retain(|(_, h)| *h != handle);
    }

    fn subscribe_resize(&mut self) -> Result<Subscription> {
        self.next_subscription = self.next_subscription.wrapping_add(1);
        self.subscriptions.insert(self.next_subscription);
        Ok(Subscription(self.next_subscription))
    }

    fn unsubscribe(&mut self, subscription: Subscription) {
        self.subscriptions.remove(&subscription.0);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_at_deadline() {
        let mut host = ManualHost::new();
        let handle = host.set_timeout(50).unwrap();
        assert!(host.advance(49).is_empty());
        assert_eq!(host.advance(1), vec![handle]);
        assert_eq!(host.now_ms(), 50);
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn test_timers_fire_in_deadline_order() {
        let mut host = ManualHost::new();
        let late = host.set_timeout(30).unwrap();
        let early = host.set_timeout(10).unwrap();
        assert_eq!(host.advance(100), vec![early, late]);
    }

    #[test]
    fn test_cleared_timer_never_fires() {
        let mut host = ManualHost::new();
        let handle = host.set_timeout(10).unwrap();
        host.clear_timeout(handle);
        assert!(host.advance(100).is_empty());
    }

    #[test]
    fn test_refused_timers() {
        let mut host = ManualHost::new();
        host.refuse_timers(true);
        assert!(host.set_timeout(10).is_err());
    }

    #[test]
    fn test_subscriptions_are_tracked() {
        let mut host = ManualHost::new();
        let a = host.subscribe_resize().unwrap();
        let b = host.subscribe_resize().unwrap();
        assert_ne!(a, b);
        assert_eq!(host.active_subscriptions(), 2);
        host.unsubscribe(a);
        assert_eq!(host.active_subscriptions(), 1);
    }
}
