//! Episode download queue and worker pool.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::validation::validate_queue;
use crate::config::QueueConfig;
use crate::context::AppContext;
use crate::download::stats::{QueueStats, QueueSummary};
use crate::download::worker::{QueueEvent, Shared, Worker, WorkerState};
use crate::error::{Error, Result};
use crate::metadata::Episode;

const EVENT_CAPACITY: usize = 1024;

/// FIFO queue of episodes served by a fixed pool of download workers.
///
/// Shutdown happens in two phases: the queue first stops accepting episodes
/// and waits until everything already enqueued has been processed, then
/// cancels the workers still waiting for work and joins them.
pub struct DownloadQueue {
    sender: Mutex<Option<mpsc::Sender<Episode>>>,
    shared: Arc<Shared>,
    workers: JoinSet<()>,
    states: Vec<watch::Receiver<WorkerState>>,
    grace: Duration,
}

impl DownloadQueue {
    /// Create the queue and spawn its workers on the current runtime.
    ///
    /// Fails before spawning anything when `config` is invalid.
    pub fn start(context: AppContext, config: &QueueConfig) -> Result<Self> {
        validate_queue(config)?;

        let (sender, receiver) = mpsc::channel(config.capacity);
        let (pending, _) = watch::channel(0usize);
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let shared = Arc::new(Shared {
            context,
            receiver: Mutex::new(receiver),
            cancel: CancellationToken::new(),
            pending,
            stats: Arc::new(QueueStats::new()),
            events,
            delay_ms: (config.delay_min_ms, config.delay_max_ms),
        });

        let count = config.workers;
        let mut workers = JoinSet::new();
        let mut states = Vec::with_capacity(count);
        for id in 0..count {
            let (state, state_rx) = watch::channel(WorkerState::Idle);
            states.push(state_rx);
            workers.spawn(
                Worker {
                    id,
                    shared: Arc::clone(&shared),
                    state,
                }
                .run(),
            );
        }

        tracing::debug!("Download queue started with {} worker(s)", count);

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            shared,
            workers,
            states,
            grace: config.shutdown_grace(),
        })
    }

    /// Append an episode to the queue.
    ///
    /// Waits only while the queue is at capacity. Fails with
    /// [`Error::QueueClosed`] once the queue has been closed or aborted.
    pub async fn enqueue(&self, episode: Episode) -> Result<()> {
        let id = episode.id();
        let sender = {
            let guard = self.sender.lock().await;
            let sender = match guard.as_ref() {
                Some(sender) if !self.shared.cancel.is_cancelled() => sender.clone(),
                _ => return Err(Error::QueueClosed),
            };
            // Counted before the lock is released so a concurrent shutdown
            // cannot observe an empty queue while this episode is in flight.
            self.shared.pending.send_modify(|n| *n += 1);
            sender
        };

        let sent = tokio::select! {
            biased;
            _ = self.shared.cancel.cancelled() => false,
            result = sender.send(episode) => result.is_ok(),
        };

        if !sent {
            self.shared.pending.send_modify(|n| *n = n.saturating_sub(1));
            return Err(Error::QueueClosed);
        }

        tracing::debug!("Queued {}", id);
        Ok(())
    }

    /// Stop accepting episodes. Already queued episodes are still processed
    /// and idle workers stop once the queue is empty.
    pub async fn close(&self) {
        if self.sender.lock().await.take().is_some() {
            tracing::debug!("Download queue closed");
        }
    }

    /// Cancel all workers now. Downloads in progress stop at the next chunk
    /// boundary and queued episodes are abandoned.
    pub fn abort(&self) {
        tracing::debug!("Download queue aborted");
        self.shared.cancel.cancel();
    }

    /// Token cancelled by [`abort`](Self::abort) and at the end of shutdown.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.shared.cancel.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.shared.events.subscribe()
    }

    pub fn worker_states(&self) -> Vec<WorkerState> {
        self.states.iter().map(|state| *state.borrow()).collect()
    }

    /// Episodes enqueued but not finished yet.
    pub fn pending(&self) -> usize {
        *self.shared.pending.borrow()
    }

    pub fn summary(&self) -> QueueSummary {
        self.shared.stats.summary()
    }

    /// Close the queue, wait for it to drain, then stop the workers.
    ///
    /// Worker cancellations are not errors; a panicked worker is reported as
    /// [`Error::WorkerPanicked`].
    pub async fn shutdown(mut self) -> Result<QueueSummary> {
        self.close().await;

        let mut pending = self.shared.pending.subscribe();
        let mut states = self.states.clone();
        tokio::select! {
            _ = self.shared.cancel.cancelled() => {
                tracing::debug!("Queue cancelled before it drained");
            }
            _ = pending.wait_for(|n| *n == 0) => {
                tracing::debug!("Queue drained");
            }
            _ = all_stopped(&mut states) => {
                tracing::warn!("All workers stopped before the queue drained");
            }
        }

        self.shared.cancel.cancel();
        join_workers(&mut self.workers, self.grace).await?;

        let summary = self.shared.stats.summary();
        tracing::debug!("Download queue shut down: {:?}", summary);
        Ok(summary)
    }
}

/// Resolves once every worker reports `Stopped` or has gone away.
async fn all_stopped(states: &mut [watch::Receiver<WorkerState>]) {
    for state in states.iter_mut() {
        let _ = state.wait_for(|s| *s == WorkerState::Stopped).await;
    }
}

/// Join all workers, aborting those still running after `grace`.
async fn join_workers(workers: &mut JoinSet<()>, grace: Duration) -> Result<()> {
    let deadline = tokio::time::sleep(grace);
    tokio::pin!(deadline);

    let mut aborted = false;
    let mut panics = Vec::new();

    loop {
        tokio::select! {
            joined = workers.join_next() => match joined {
                None => break,
                Some(Ok(())) => {}
                Some(Err(e)) if e.is_cancelled() => {}
                Some(Err(e)) => {
                    tracing::error!("Download worker failed: {}", e);
                    panics.push(e.to_string());
                }
            },
            _ = &mut deadline, if !aborted => {
                tracing::warn!(
                    "{} worker(s) still running after {:?}, aborting",
                    workers.len(),
                    grace
                );
                workers.abort_all();
                aborted = true;
            }
        }
    }

    if panics.is_empty() {
        Ok(())
    } else {
        Err(Error::WorkerPanicked(panics.join("; ")))
    }
}
