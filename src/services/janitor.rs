//! Delayed deletion of replaced images.
//!
//! A single tracked worker drains a FIFO queue. Every job carries the same
//! delay, so FIFO order is also due-time order. Failures go to a dedicated
//! channel owned by whoever started the worker.
//!
//! There is no ordering guarantee against requests: a client can still fetch
//! (or re-reference) the old file until its delay has elapsed.

use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, sleep_until},
};

use crate::{error::AppError, services::images::ImageStore};

#[derive(Debug)]
struct PendingDelete {
    url: String,
    due: Instant,
}

/// A deletion that failed after its delay.
#[derive(Debug)]
pub struct DeleteFailure {
    pub url: String,
    pub error: AppError,
}

/// Handle for scheduling deletions. Clones share the same worker.
#[derive(Debug, Clone)]
pub struct ImageJanitor {
    queue: mpsc::UnboundedSender<PendingDelete>,
    delay: Duration,
}

/// The running worker. It finishes once every [`ImageJanitor`] clone is dropped
/// and the queue is drained.
pub struct JanitorWorker {
    pub handle: JoinHandle<()>,
    pub failures: mpsc::UnboundedReceiver<DeleteFailure>,
}

impl ImageJanitor {
    /// Spawns the worker on the current tokio runtime.
    pub fn start(store: ImageStore, delay: Duration) -> (Self, JanitorWorker) {
        let (queue, mut jobs) = mpsc::unbounded_channel::<PendingDelete>();
        let (failed, failures) = mpsc::unbounded_channel();

        let handle = tokio::spawn(async move {
            while let Some(job) = jobs.recv().await {
                sleep_until(job.due).await;
                if let Err(error) = store.delete(&job.url).await {
                    let failure = DeleteFailure { url: job.url, error };
                    if let Err(mpsc::error::SendError(failure)) = failed.send(failure) {
                        tracing::warn!(
                            url = %failure.url,
                            error = %failure.error,
                            "deferred image deletion failed"
                        );
                    }
                }
            }
            tracing::debug!("image janitor stopped");
        });

        (Self { queue, delay }, JanitorWorker { handle, failures })
    }

    /// Queues `url` for deletion once the delay has elapsed.
    pub fn schedule(&self, url: impl Into<String>) {
        let job = PendingDelete {
            url: url.into(),
            due: Instant::now() + self.delay,
        };
        if let Err(rejected) = self.queue.send(job) {
            tracing::warn!(url = %rejected.0.url, "image janitor is gone, file left on disk");
        }
    }
}
