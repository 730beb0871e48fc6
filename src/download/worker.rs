//! Download worker task.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::{broadcast, mpsc, watch, Mutex};
use tokio_util::sync::CancellationToken;

use crate::context::AppContext;
use crate::download::episode::download_episode;
use crate::download::stats::QueueStats;
use crate::error::{Error, Result};
use crate::fs::{episode_folder, sanitize_path_component};
use crate::metadata::{cached_or_fetch_series, Episode, EpisodeId, EpisodePage};

/// What a worker is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Waiting for the next episode.
    Idle,
    /// Resolving the series and destination of a dequeued episode.
    Fetching,
    Downloading,
    /// Terminal: the queue was drained or the worker was cancelled.
    Stopped,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerState::Idle => write!(f, "idle"),
            WorkerState::Fetching => write!(f, "fetching"),
            WorkerState::Downloading => write!(f, "downloading"),
            WorkerState::Stopped => write!(f, "stopped"),
        }
    }
}

/// Per-episode progress notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueEvent {
    Started(EpisodeId),
    Downloaded { episode: EpisodeId, pages: usize },
    Skipped(EpisodeId),
    Failed { episode: EpisodeId, error: String },
    Cancelled(EpisodeId),
}

impl QueueEvent {
    pub fn episode(&self) -> EpisodeId {
        match self {
            QueueEvent::Started(id) | QueueEvent::Skipped(id) | QueueEvent::Cancelled(id) => *id,
            QueueEvent::Downloaded { episode, .. } | QueueEvent::Failed { episode, .. } => *episode,
        }
    }

    /// Whether this event ends the processing of its episode.
    pub fn is_finished(&self) -> bool {
        !matches!(self, QueueEvent::Started(_))
    }
}

/// State shared between a queue and its workers.
pub(crate) struct Shared {
    pub(crate) context: AppContext,
    pub(crate) receiver: Mutex<mpsc::Receiver<Episode>>,
    pub(crate) cancel: CancellationToken,
    /// Episodes enqueued but not yet finished.
    pub(crate) pending: watch::Sender<usize>,
    pub(crate) stats: Arc<QueueStats>,
    pub(crate) events: broadcast::Sender<QueueEvent>,
    pub(crate) delay_ms: (u64, u64),
}

pub(crate) struct Worker {
    pub(crate) id: usize,
    pub(crate) shared: Arc<Shared>,
    pub(crate) state: watch::Sender<WorkerState>,
}

impl Worker {
    pub(crate) async fn run(self) {
        tracing::debug!("Worker {} started", self.id);

        while let Some(episode) = self.next_episode().await {
            let id = episode.id();
            self.emit(QueueEvent::Started(id));

            let result = self.process(&episode).await;
            let downloaded = result.is_ok();
            let cancelled = matches!(result, Err(Error::Cancelled));
            self.report(id, result);
            self.shared.pending.send_modify(|n| *n = n.saturating_sub(1));

            if cancelled {
                break;
            }
            if downloaded {
                self.pause().await;
            }
        }

        self.set_state(WorkerState::Stopped);
        tracing::debug!("Worker {} stopped", self.id);
    }

    /// Next episode, or `None` once the queue is closed and drained or the
    /// worker is cancelled.
    async fn next_episode(&self) -> Option<Episode> {
        self.set_state(WorkerState::Idle);

        tokio::select! {
            biased;
            _ = self.shared.cancel.cancelled() => None,
            episode = async { self.shared.receiver.lock().await.recv().await } => episode,
        }
    }

    async fn process(&self, episode: &Episode) -> Result<Vec<EpisodePage>> {
        let ctx = &self.shared.context;
        let cancel = &self.shared.cancel;

        self.set_state(WorkerState::Fetching);
        let series = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            series = cached_or_fetch_series(&ctx.client, &ctx.cache, episode.series) => series?,
        };
        // Folder and file names must agree on the slug.
        let slug = sanitize_path_component(&series.slug)?;
        let destination = episode_folder(&ctx.library_path, &slug, episode.index)?;

        self.set_state(WorkerState::Downloading);
        tracing::debug!(
            "Worker {} downloading {} to {}",
            self.id,
            episode.id(),
            destination.display()
        );
        let pages =
            download_episode(&ctx.client, episode, &slug, &destination, cancel).await?;

        tracing::info!(
            "Downloaded {} '{}' ({} pages) to {}",
            episode.id(),
            episode.title,
            pages.len(),
            destination.display()
        );
        Ok(pages)
    }

    fn report(&self, id: EpisodeId, result: Result<Vec<EpisodePage>>) {
        let stats = &self.shared.stats;
        match result {
            Ok(pages) => {
                stats.record_downloaded(pages.len());
                self.emit(QueueEvent::Downloaded {
                    episode: id,
                    pages: pages.len(),
                });
            }
            Err(Error::DirectoryExists(path)) => {
                tracing::info!(
                    "Skipping {}: {} already exists, assuming it is downloaded",
                    id,
                    path.display()
                );
                stats.record_skipped();
                self.emit(QueueEvent::Skipped(id));
            }
            Err(Error::Cancelled) => {
                tracing::warn!("Download of {} was interrupted", id);
                stats.record_cancelled();
                self.emit(QueueEvent::Cancelled(id));
            }
            Err(e) => {
                tracing::warn!("Failed to download {}: {}", id, e);
                stats.record_failed();
                self.emit(QueueEvent::Failed {
                    episode: id,
                    error: e.to_string(),
                });
            }
        }
    }

    /// Random pause between episodes; returns early on cancellation.
    async fn pause(&self) {
        let (min, max) = self.shared.delay_ms;
        if max == 0 {
            return;
        }

        let delay = rand::thread_rng().gen_range(min..=max);
        tokio::select! {
            _ = self.shared.cancel.cancelled() => {}
            _ = tokio::time::sleep(Duration::from_millis(delay)) => {}
        }
    }

    fn emit(&self, event: QueueEvent) {
        // No subscribers is fine.
        let _ = self.shared.events.send(event);
    }

    fn set_state(&self, state: WorkerState) {
        self.state.send_replace(state);
    }
}
