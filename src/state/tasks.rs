//! Background work delivered back to the owning thread.
//!
//! Work runs on the global rayon pool and reports through a one-shot channel. The owner polls the
//! handle from its own thread, so results are applied in the same place as every other command.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;

/// Shared cancellation flag tied to the lifetime of whatever requested the work.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Fresh, not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark cancelled. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// `true` once [`CancellationToken::cancel`] has been called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Result of polling a [`TaskHandle`].
#[derive(Debug)]
pub enum TaskPoll<T> {
    /// Still running.
    Pending,
    /// Finished; the value is handed out exactly once.
    Ready(T),
    /// Cancelled, already taken, or the worker went away without a value.
    Gone,
}

/// Handle to a value computed on the rayon pool.
#[derive(Debug)]
pub struct TaskHandle<T> {
    rx: Option<mpsc::Receiver<T>>,
    token: CancellationToken,
}

impl<T: Send + 'static> TaskHandle<T> {
    /// Run `work` on the rayon pool.
    ///
    /// `work` is skipped if `token` is cancelled before it starts, and its result is dropped if the
    /// token is cancelled before it is taken.
    pub fn spawn<F>(token: CancellationToken, work: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel::<T>(1);
        let worker_token = token.clone();
        rayon::spawn(move || {
            if worker_token.is_cancelled() {
                return;
            }
            let out = work();
            if !worker_token.is_cancelled() {
                let _ = tx.send(out);
            }
        });
        Self {
            rx: Some(rx),
            token,
        }
    }
}

impl<T> TaskHandle<T> {
    /// The token this task observes.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Non-blocking poll.
    pub fn try_take(&mut self) -> TaskPoll<T> {
        if self.token.is_cancelled() {
            self.rx = None;
            return TaskPoll::Gone;
        }
        let Some(rx) = self.rx.as_ref() else {
            return TaskPoll::Gone;
        };
        match rx.try_recv() {
            Ok(v) => {
                self.rx = None;
                TaskPoll::Ready(v)
            }
            Err(mpsc::TryRecvError::Empty) => TaskPoll::Pending,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.rx = None;
                TaskPoll::Gone
            }
        }
    }

    /// Block until the task finishes. `None` if it was cancelled or already taken.
    pub fn wait(&mut self) -> Option<T> {
        let rx = self.rx.take()?;
        let v = rx.recv().ok()?;
        if self.token.is_cancelled() {
            return None;
        }
        Some(v)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/tasks.rs"]
mod tests;
