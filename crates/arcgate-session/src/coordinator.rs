//! Handing work to the task that owns live-session state.
//!
//! The owner holds a [`TaskQueue`]; everyone else holds a cloneable
//! [`SessionCoordinator`]. A submission is a closure plus a oneshot reply
//! channel, the same command/reply shape an actor uses, except the
//! "command" is the closure itself.

use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::CoordinatorError;

type Job<R> = Box<dyn FnOnce(&mut R) + Send>;

/// Tuning for a [`SessionCoordinator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// How long [`SessionCoordinator::run`] waits for a reply, queueing
    /// time included.
    pub task_timeout: Duration,

    /// Capacity of the task queue. Submitters wait (within the timeout)
    /// while it is full.
    pub queue_capacity: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            task_timeout: Duration::from_secs(5),
            queue_capacity: 256,
        }
    }
}

/// Submits closures to the task that owns a registry `R` and awaits their
/// results.
///
/// Cheap to clone; every clone feeds the same queue. The queue closes when
/// the last coordinator is dropped.
pub struct SessionCoordinator<R> {
    sender: mpsc::Sender<Job<R>>,
    task_timeout: Duration,
}

impl<R> Clone for SessionCoordinator<R> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            task_timeout: self.task_timeout,
        }
    }
}

impl<R: Send + 'static> SessionCoordinator<R> {
    /// Creates a coordinator and the queue its owner must drive.
    pub fn channel(config: CoordinatorConfig) -> (Self, TaskQueue<R>) {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let coordinator = Self {
            sender,
            task_timeout: config.task_timeout,
        };
        (coordinator, TaskQueue { receiver })
    }

    /// Moves `registry` onto a dedicated Tokio task and returns a
    /// coordinator for it. The task stops once every coordinator is gone.
    pub fn spawn(registry: R, config: CoordinatorConfig) -> Self {
        let (coordinator, queue) = Self::channel(config);
        tokio::spawn(queue.run(registry));
        coordinator
    }

    /// Runs `task` on the owning task and returns its result.
    ///
    /// # Errors
    /// - [`CoordinatorError::Timeout`] — no reply within `task_timeout`;
    ///   if the task has not started by then, it is skipped
    /// - [`CoordinatorError::Unavailable`] — the owner is gone
    /// - [`CoordinatorError::TaskPanicked`] — `task` panicked
    pub async fn run<T, F>(&self, task: F) -> Result<T, CoordinatorError>
    where
        F: FnOnce(&mut R) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        let job: Job<R> = Box::new(move |registry: &mut R| {
            // The submitter timed out and already reported failure.
            if reply_tx.is_closed() {
                tracing::warn!("skipping session task abandoned after timeout");
                return;
            }
            let result =
                panic::catch_unwind(AssertUnwindSafe(|| task(registry)));
            if result.is_err() {
                tracing::error!("session task panicked");
            }
            let _ = reply_tx.send(result);
        });

        let exchange = async {
            self.sender
                .send(job)
                .await
                .map_err(|_| CoordinatorError::Unavailable)?;
            match reply_rx.await {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(_)) => Err(CoordinatorError::TaskPanicked),
                Err(_) => Err(CoordinatorError::Unavailable),
            }
        };

        match tokio::time::timeout(self.task_timeout, exchange).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    timeout = ?self.task_timeout,
                    "session task timed out"
                );
                Err(CoordinatorError::Timeout(self.task_timeout))
            }
        }
    }

    /// The configured reply timeout.
    pub fn task_timeout(&self) -> Duration {
        self.task_timeout
    }

    /// Returns `true` once the owner has stopped accepting tasks.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// The owner's end of a [`SessionCoordinator`].
///
/// Either hand it a registry with [`run`](Self::run) (typically on its own
/// task), or call [`drain`](Self::drain) from an existing loop between
/// ticks.
pub struct TaskQueue<R> {
    receiver: mpsc::Receiver<Job<R>>,
}

impl<R: Send + 'static> TaskQueue<R> {
    /// Runs tasks until the queue is closed and empty, then hands the
    /// registry back.
    pub async fn run(mut self, mut registry: R) -> R {
        tracing::info!("session coordinator started");
        while let Some(job) = self.receiver.recv().await {
            job(&mut registry);
        }
        tracing::info!("session coordinator stopped");
        registry
    }

    /// Waits for one task and runs it. Returns `false` if the queue is
    /// closed and empty.
    pub async fn run_next(&mut self, registry: &mut R) -> bool {
        match self.receiver.recv().await {
            Some(job) => {
                job(registry);
                true
            }
            None => false,
        }
    }

    /// Runs every task already queued without waiting. Returns how many
    /// ran.
    pub fn drain(&mut self, registry: &mut R) -> usize {
        let mut ran = 0;
        while let Ok(job) = self.receiver.try_recv() {
            job(registry);
            ran += 1;
        }
        ran
    }

    /// Stops accepting new tasks. Already-queued tasks still run.
    pub fn close(&mut self) {
        self.receiver.close();
    }
}
