//! Shared execution context for all client operations
//!
//! A single multi-threaded tokio runtime runs every operation. The host owns
//! the [`WorkerPool`] and must stop it before releasing the services that its
//! tasks touch; services only ever hold a [`Spawner`].

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::runtime::{Builder, Handle, Runtime};

const THREAD_NAME: &str = "rewards-io";
const MIN_WORKER_THREADS: usize = 2;
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Number of worker threads for a configured override, clamped to at least two
pub fn pool_size(configured: Option<usize>) -> usize {
    configured
        .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, usize::from))
        .max(MIN_WORKER_THREADS)
}

/// Owner of the shared worker threads
pub struct WorkerPool {
    runtime: Option<Runtime>,
    spawner: Spawner,
    threads: usize,
}

impl WorkerPool {
    /// Starts a pool with `pool_size(worker_threads)` threads
    pub fn new(worker_threads: Option<usize>) -> Result<Self> {
        let threads = pool_size(worker_threads);
        let runtime = Builder::new_multi_thread()
            .worker_threads(threads)
            .thread_name(THREAD_NAME)
            .enable_all()
            .build()
            .context("Failed to start worker thread pool")?;

        tracing::info!(threads, "Worker pool started");

        let spawner = Spawner::new(runtime.handle().clone());
        Ok(Self {
            runtime: Some(runtime),
            spawner,
            threads,
        })
    }

    /// Returns a handle for submitting work to this pool
    pub fn spawner(&self) -> Spawner {
        self.spawner.clone()
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn is_stopped(&self) -> bool {
        self.runtime.is_none()
    }

    /// Stops accepting work and shuts the worker threads down
    ///
    /// Pending operations are dropped without resuming. Outside of an async
    /// context this waits for the workers to exit; idempotent.
    pub fn stop(&mut self) {
        self.spawner.stopped.store(true, Ordering::SeqCst);

        let Some(runtime) = self.runtime.take() else {
            return;
        };

        if Handle::try_current().is_ok() {
            // Blocking here would panic inside another runtime
            runtime.shutdown_background();
        } else {
            runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
        }
        tracing::info!("Worker pool stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Cloneable fire-and-forget submitter
#[derive(Debug, Clone)]
pub struct Spawner {
    handle: Handle,
    stopped: Arc<AtomicBool>,
}

impl Spawner {
    /// Creates a spawner on an existing runtime
    ///
    /// Hosts that already run tokio can use their own runtime instead of a
    /// [`WorkerPool`]; shutdown ordering is then the host's responsibility.
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a spawner on the runtime of the calling task
    pub fn current() -> Self {
        Self::new(Handle::current())
    }

    /// Submits an operation without waiting for it
    ///
    /// Returns false, dropping the operation, once the pool has been stopped.
    pub fn spawn<F>(&self, future: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.stopped.load(Ordering::SeqCst) {
            tracing::debug!("Worker pool stopped, dropping operation");
            return false;
        }
        drop(self.handle.spawn(future));
        true
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}
