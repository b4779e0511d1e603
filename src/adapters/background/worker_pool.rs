//! WorkerPool - Bounded, supervised executor for background jobs.
//!
//! A fixed number of workers pull from a bounded channel. Submitting never
//! waits: a full queue is reported to the caller as `QueueError::Full`.
//! Each job runs in its own task so a panic is contained and logged with the
//! job name instead of taking the worker down.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `workers` | 4 | Concurrent jobs |
//! | `queue_capacity` | 256 | Jobs waiting before submits are refused |
//!
//! ## Graceful Shutdown
//!
//! On the shutdown signal the workers finish the jobs already queued, then
//! stop. Submits after that point fail with `QueueError::Closed`.

use std::sync::Arc;

use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;

use crate::ports::{Job, JobQueue, QueueError};

/// Configuration for the worker pool.
#[derive(Debug, Clone)]
pub struct WorkerPoolConfig {
    pub workers: usize,
    pub queue_capacity: usize,
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 256,
        }
    }
}

impl WorkerPoolConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }
}

/// Submitting side of the pool. Cheap to clone.
#[derive(Clone)]
pub struct WorkerPool {
    sender: mpsc::Sender<Job>,
    capacity: usize,
}

/// Owns the worker tasks.
pub struct WorkerPoolHandle {
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns the workers onto the current runtime.
    pub fn start(config: WorkerPoolConfig, shutdown: watch::Receiver<bool>) -> (Self, WorkerPoolHandle) {
        let capacity = config.queue_capacity.max(1);
        let (sender, receiver) = mpsc::channel(capacity);
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..config.workers.max(1))
            .map(|worker_id| {
                tokio::spawn(worker_loop(worker_id, receiver.clone(), shutdown.clone()))
            })
            .collect();

        tracing::info!(workers = config.workers.max(1), capacity, "Worker pool started");

        (Self { sender, capacity }, WorkerPoolHandle { workers })
    }
}

impl JobQueue for WorkerPool {
    fn try_submit(&self, job: Job) -> Result<(), QueueError> {
        self.sender.try_send(job).map_err(|e| match e {
            mpsc::error::TrySendError::Full(job) => {
                tracing::warn!(job = job.name, capacity = self.capacity, "Job queue full");
                QueueError::Full {
                    capacity: self.capacity,
                }
            }
            mpsc::error::TrySendError::Closed(_) => QueueError::Closed,
        })
    }
}

impl WorkerPoolHandle {
    /// Waits for every worker to exit.
    pub async fn join(self) {
        for worker in self.workers {
            if let Err(e) = worker.await {
                tracing::error!(error = %e, "Worker task ended abnormally");
            }
        }
    }
}

enum Next {
    Run(Job),
    Stop,
}

async fn worker_loop(
    worker_id: usize,
    receiver: Arc<Mutex<mpsc::Receiver<Job>>>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        let next = {
            let mut rx = receiver.lock().await;
            let next = if *shutdown.borrow() {
                Next::Stop
            } else {
                tokio::select! {
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            Next::Stop
                        } else {
                            continue;
                        }
                    }
                    job = rx.recv() => match job {
                        Some(job) => Next::Run(job),
                        None => Next::Stop,
                    },
                }
            };
            if matches!(next, Next::Stop) {
                // Refuse new submits; buffered jobs stay readable.
                rx.close();
            }
            next
        };

        match next {
            Next::Run(job) => run_job(worker_id, job).await,
            Next::Stop => break,
        }
    }

    // Drain what was queued before the signal.
    loop {
        let job = receiver.lock().await.try_recv();
        match job {
            Ok(job) => run_job(worker_id, job).await,
            Err(_) => break,
        }
    }
    tracing::debug!(worker_id, "Worker stopped");
}

async fn run_job(worker_id: usize, job: Job) {
    let name = job.name;
    match tokio::spawn(job.task).await {
        Ok(Ok(())) => {
            tracing::debug!(worker_id, job = name, "Background job finished");
        }
        Ok(Err(e)) => {
            tracing::error!(worker_id, job = name, error = %e, "Background job failed");
        }
        Err(e) => {
            tracing::error!(worker_id, job = name, error = %e, "Background job panicked");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::JobFailure;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counting_job(counter: Arc<AtomicUsize>) -> Job {
        Job::new("count", async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    #[tokio::test]
    async fn runs_submitted_jobs() {
        let (_tx, rx) = watch::channel(false);
        let (pool, _handle) = WorkerPool::start(WorkerPoolConfig::default().with_workers(2), rx);
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..5 {
            pool.try_submit(counting_job(counter.clone())).unwrap();
        }
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn full_queue_rejects_without_blocking() {
        let (_tx, rx) = watch::channel(false);
        let (pool, _handle) = WorkerPool::start(
            WorkerPoolConfig::default().with_workers(1).with_queue_capacity(1),
            rx,
        );
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        // Occupy the only worker.
        pool.try_submit(Job::new("block", async move {
            let _ = release_rx.await;
            Ok(())
        }))
        .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let counter = Arc::new(AtomicUsize::new(0));
        pool.try_submit(counting_job(counter.clone())).unwrap();
        let err = pool.try_submit(counting_job(counter.clone())).unwrap_err();

        assert_eq!(err, QueueError::Full { capacity: 1 });
        let _ = release_tx.send(());
    }

    #[tokio::test]
    async fn failing_and_panicking_jobs_do_not_stop_workers() {
        let (_tx, rx) = watch::channel(false);
        let (pool, _handle) = WorkerPool::start(WorkerPoolConfig::default().with_workers(1), rx);
        let counter = Arc::new(AtomicUsize::new(0));

        pool.try_submit(Job::new("fails", async { Err(JobFailure("boom".to_string())) }))
            .unwrap();
        pool.try_submit(Job::new("panics", async { panic!("boom") })).unwrap();
        pool.try_submit(counting_job(counter.clone())).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn shutdown_drains_queue_then_closes() {
        let (tx, rx) = watch::channel(false);
        let (pool, handle) = WorkerPool::start(WorkerPoolConfig::default().with_workers(2), rx);
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..10 {
            pool.try_submit(counting_job(counter.clone())).unwrap();
        }
        tx.send(true).unwrap();
        handle.join().await;

        assert_eq!(counter.load(Ordering::SeqCst), 10);
        assert_eq!(
            pool.try_submit(counting_job(counter.clone())).unwrap_err(),
            QueueError::Closed
        );
    }

    #[tokio::test]
    async fn submits_are_refused_while_a_busy_worker_finishes() {
        let (tx, rx) = watch::channel(false);
        let (pool, handle) = WorkerPool::start(WorkerPoolConfig::default().with_workers(2), rx);
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        pool.try_submit(Job::new("block", async move {
            let _ = release_rx.await;
            Ok(())
        }))
        .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        tx.send(true).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let counter = Arc::new(AtomicUsize::new(0));
        assert_eq!(
            pool.try_submit(counting_job(counter.clone())).unwrap_err(),
            QueueError::Closed
        );

        let _ = release_tx.send(());
        handle.join().await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn config_defaults_are_reasonable() {
        let config = WorkerPoolConfig::default();

        assert_eq!(config.workers, 4);
        assert_eq!(config.queue_capacity, 256);
    }
}
