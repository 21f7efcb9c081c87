//! Hooks for progress reporting and delays.

use std::time::Duration;

use resi_model::ImportRunStats;

use crate::state::BatchOutcome;

/// Receives progress events from the batch loop.
pub trait ImportObserver {
    fn on_batch_started(&mut self, _batch: usize, _batch_count: usize, _size: usize) {}

    /// A record was classified during per-record fallback.
    fn on_record(&mut self, _stats: &ImportRunStats) {}

    fn on_batch_finished(&mut self, _batch: usize, _outcome: BatchOutcome, _stats: &ImportRunStats) {}
}

/// Observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ImportObserver for NoopObserver {}

/// Source of the backoff and inter-batch pauses.
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}

/// Blocks the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSleep;

impl Sleeper for NoSleep {
    fn sleep(&self, _duration: Duration) {}
}
