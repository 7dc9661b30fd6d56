//! Worker threads
//!
//! A [`Worker`] is anything that can drive one stage of the pipeline: it
//! receives a [`ChainPosition`] and loops pop → process → push until it
//! observes the poison token, forwards it, and returns. Closures implement
//! `Worker` directly, so one-off stages need no named type.
//!
//! [`WorkerThread`] owns the spawned thread and joins it on drop, so the
//! chain can never leak a running stage.

use super::ChainPosition;
use std::thread::JoinHandle;

/// A pipeline stage that runs on its own thread.
pub trait Worker: Send + 'static {
    /// Process blocks at `position` until poison is observed. The
    /// implementation must forward exactly one poison token downstream
    /// before returning; constructing a [`Link`](crate::Link) over the
    /// position does this automatically.
    fn run(self, position: ChainPosition);
}

impl<F> Worker for F
where
    F: FnOnce(ChainPosition) + Send + 'static,
{
    fn run(self, position: ChainPosition) {
        self(position)
    }
}

/// An owned stage thread, joined when dropped.
pub(crate) struct WorkerThread {
    handle: Option<JoinHandle<()>>,
}

impl WorkerThread {
    pub(crate) fn spawn<W: Worker>(position: ChainPosition, worker: W) -> Self {
        let handle = std::thread::spawn(move || {
            tracing::trace!("worker thread started");
            worker.run(position);
            tracing::trace!("worker thread exiting");
        });
        Self {
            handle: Some(handle),
        }
    }
}

impl Drop for WorkerThread {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("worker thread panicked");
            }
        }
    }
}
