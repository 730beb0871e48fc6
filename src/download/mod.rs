//! Download module.
//!
//! This module provides:
//! - Episode page downloading with per-page resume
//! - The episode download queue and its worker pool
//! - Download statistics

pub mod episode;
pub mod queue;
pub mod stats;
pub mod worker;

pub use episode::{download_episode, download_pages_into};
pub use queue::DownloadQueue;
pub use stats::{QueueStats, QueueSummary, RunState};
pub use worker::{QueueEvent, WorkerState};
