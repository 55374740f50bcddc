//! Bounded task pool for page fetches
//!
//! A fixed set of named worker threads pulls jobs from a bounded channel.
//! Each submitted task gets its own one-shot result channel, so a caller
//! can wait on tasks in whatever order it submitted them regardless of the
//! order in which they finish. A task's result, including an error, is held
//! until the caller asks for it.
//!
//! There is no cancellation: once a job is picked up it runs to completion.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::{debug, warn};

use crate::error::{QueryError, QueryResult};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Pending result of a submitted task
#[derive(Debug)]
pub struct TaskHandle<T> {
    receiver: Receiver<T>,
}

impl<T> TaskHandle<T> {
    /// Block until the task has finished and return its result.
    ///
    /// Fails with [`QueryError::TaskLost`] if the worker died (panicked)
    /// before producing a result.
    pub fn wait(self) -> QueryResult<T> {
        self.receiver.recv().map_err(|_| QueryError::TaskLost)
    }
}

/// Fixed-size pool of worker threads
pub struct TaskPool {
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
}

impl TaskPool {
    /// Spawn `size` workers named `{name}-{index}`
    pub fn new(size: usize, name: &str) -> QueryResult<Self> {
        let size = size.max(1);
        let (sender, receiver) = bounded::<Job>(size);

        let mut workers = Vec::with_capacity(size);
        for id in 0..size {
            let receiver = receiver.clone();
            let handle = thread::Builder::new()
                .name(format!("{}-{}", name, id))
                .spawn(move || worker_loop(receiver))
                .map_err(QueryError::WorkerSpawn)?;
            workers.push(handle);
        }

        debug!(workers = size, name, "Task pool started");

        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Queue a task. Its result is available through the returned handle.
    pub fn submit<T, F>(&self, task: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (result_tx, result_rx) = bounded(1);
        let job: Job = Box::new(move || {
            // The handle may already be gone; the result is then discarded.
            let _ = result_tx.send(task());
        });

        if let Some(sender) = &self.sender {
            if sender.send(job).is_err() {
                warn!("Task pool has no live workers; task dropped");
            }
        }

        TaskHandle {
            receiver: result_rx,
        }
    }
}

impl Drop for TaskPool {
    /// Close the queue, let workers finish what they picked up, and join them
    fn drop(&mut self) {
        self.sender.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("Page fetch worker panicked");
            }
        }
    }
}

fn worker_loop(receiver: Receiver<Job>) {
    for job in receiver.iter() {
        job();
    }
}
