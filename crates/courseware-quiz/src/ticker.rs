//! Cancellable one-second tick sources.
//!
//! The session owns its tick source and polls it; nothing fires behind its
//! back. [`ManualTicker`] lets tests and replays advance time explicitly,
//! [`WallClockTicker`] follows the monotonic clock.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// A source of whole-second ticks.
pub trait TickSource {
    /// Seconds elapsed since the previous poll. Always 0 once cancelled.
    fn poll(&mut self) -> u64;

    /// Stop producing ticks for good.
    fn cancel(&mut self);

    fn is_cancelled(&self) -> bool;
}

/// Ticks only when told to.
///
/// Clones share state, so a test can keep one handle and give the other to
/// the session.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    pending: Arc<AtomicU64>,
    cancelled: Arc<AtomicBool>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `seconds` ticks for the next poll. Ignored after cancellation.
    pub fn advance(&self, seconds: u64) {
        if !self.cancelled.load(Ordering::Acquire) {
            self.pending.fetch_add(seconds, Ordering::AcqRel);
        }
    }
}

impl TickSource for ManualTicker {
    fn poll(&mut self) -> u64 {
        if self.cancelled.load(Ordering::Acquire) {
            return 0;
        }
        self.pending.swap(0, Ordering::AcqRel)
    }

    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Release);
        self.pending.store(0, Ordering::Release);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Ticks once per elapsed wall-clock second.
#[derive(Debug)]
pub struct WallClockTicker {
    started: Instant,
    delivered: u64,
    cancelled: bool,
}

impl Default for WallClockTicker {
    fn default() -> Self {
        Self::start()
    }
}

impl WallClockTicker {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            delivered: 0,
            cancelled: false,
        }
    }

    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

impl TickSource for WallClockTicker {
    fn poll(&mut self) -> u64 {
        if self.cancelled {
            return 0;
        }
        let whole_seconds = self.elapsed().as_secs();
        let due = whole_seconds.saturating_sub(self.delivered);
        self.delivered = whole_seconds.max(self.delivered);
        due
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}
