//! Fixed-size pool of ingest workers fed from a bounded queue.

use std::sync::{Arc, Mutex, PoisonError};

use futures::future::join_all;
use tokio::sync::{Mutex as AsyncMutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::worker::{IngestJob, Outcome, ingest_file};

/// Error from submitting to a [`WorkerPool`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// The pool has been drained and takes no more work
    #[error("worker pool is closed")]
    Closed,
}

type JobQueue = Arc<AsyncMutex<mpsc::Receiver<IngestJob>>>;

/// Runs ingest jobs on a fixed number of tokio tasks.
///
/// Workers share one receiver; whichever is idle takes the next job. The
/// parsing itself runs on the blocking thread pool.
pub struct WorkerPool {
    size: usize,
    /// `None` once draining has started.
    sender: Mutex<Option<mpsc::Sender<IngestJob>>>,
    /// A slot is emptied as soon as its worker has been joined.
    workers: AsyncMutex<Vec<Option<JoinHandle<()>>>>,
}

impl WorkerPool {
    /// Start `size` workers (at least one). Must be called inside a tokio
    /// runtime.
    pub fn spawn(size: usize) -> Self {
        let size = size.max(1);
        let (sender, receiver) = mpsc::channel(size);
        let queue: JobQueue = Arc::new(AsyncMutex::new(receiver));

        let workers = (0..size)
            .map(|worker| Some(tokio::spawn(run_worker(worker, Arc::clone(&queue)))))
            .collect();
        info!(workers = size, "Started ingest workers");

        Self {
            size,
            sender: Mutex::new(Some(sender)),
            workers: AsyncMutex::new(workers),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Queue a job, waiting for space if every slot is taken.
    pub async fn submit(&self, job: IngestJob) -> Result<(), PoolError> {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(PoolError::Closed)?;

        sender.send(job).await.map_err(|_| PoolError::Closed)
    }

    /// Stop taking jobs and wait for everything queued or running to finish.
    ///
    /// Safe to call more than once and from several tasks; later callers
    /// wait for the first drain and then return. Dropping a drain part way
    /// through is fine: the next call waits for the workers still running.
    pub async fn drain(&self) {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let mut workers = self.workers.lock().await;
        if workers.is_empty() {
            return;
        }

        join_all(workers.iter_mut().map(|slot| async move {
            if let Some(handle) = slot.as_mut() {
                let result = handle.await;
                *slot = None;
                if let Err(e) = result {
                    warn!(error = %e, "Ingest worker failed");
                }
            }
        }))
        .await;
        workers.clear();
        info!("Ingest workers drained");
    }
}

async fn run_worker(worker: usize, queue: JobQueue) {
    loop {
        // Only the receive is serialized; jobs run concurrently.
        let job = queue.lock().await.recv().await;
        let Some(job) = job else {
            break;
        };

        let path = job.path.clone();
        match tokio::task::spawn_blocking(move || ingest_file(&job)).await {
            Ok(report) => match report.outcome {
                Outcome::Completed => {
                    debug!(worker, path = %path.display(), added = report.added, "Job finished")
                }
                Outcome::Cancelled | Outcome::Abandoned { .. } => {
                    debug!(worker, path = %path.display(), outcome = ?report.outcome, "Job stopped early")
                }
            },
            Err(e) => warn!(worker, path = %path.display(), error = %e, "Ingest job panicked"),
        }
    }
    debug!(worker, "Ingest worker exiting");
}
