//! Download statistics.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by all workers of a queue.
#[derive(Debug, Default)]
pub struct QueueStats {
    downloaded: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
    cancelled: AtomicU64,
    pages: AtomicU64,
}

impl QueueStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fully downloaded episode.
    pub fn record_downloaded(&self, pages: usize) {
        self.downloaded.fetch_add(1, Ordering::Relaxed);
        self.pages.fetch_add(pages as u64, Ordering::Relaxed);
    }

    /// Record an episode skipped because its directory already existed.
    pub fn record_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cancelled(&self) {
        self.cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summary(&self) -> QueueSummary {
        QueueSummary {
            downloaded: self.downloaded.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            pages: self.pages.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of [`QueueStats`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueSummary {
    pub downloaded: u64,
    pub skipped: u64,
    pub failed: u64,
    pub cancelled: u64,
    pub pages: u64,
}

impl QueueSummary {
    /// Episodes that left the queue, whatever their outcome.
    pub fn total_processed(&self) -> u64 {
        self.downloaded + self.skipped + self.failed + self.cancelled
    }
}

/// Statistics across all series of a run.
#[derive(Debug, Default)]
pub struct RunState {
    pub series_processed: u64,
    pub series_failed: u64,
    pub episodes_queued: u64,
}

impl RunState {
    pub fn mark_series_queued(&mut self, episodes: u64) {
        self.series_processed += 1;
        self.episodes_queued += episodes;
    }

    pub fn mark_series_failed(&mut self) {
        self.series_failed += 1;
    }
}
