//! Poll-based handles for background work.
//!
//! The GUI never blocks: work runs on a background thread and the result is
//! collected with a non-blocking poll each frame.

use anyhow::{anyhow, Result};
use std::sync::mpsc::{Receiver, TryRecvError};

/// Handle to a background task producing a single result.
pub struct AsyncJob<T> {
    receiver: Option<Receiver<Result<T>>>,
}

impl<T> AsyncJob<T> {
    pub fn new(receiver: Receiver<Result<T>>) -> Self {
        Self {
            receiver: Some(receiver),
        }
    }

    /// Poll for completion. Returns `Some(result)` exactly once when the task
    /// has finished, `None` while it is still running.
    pub fn poll(&mut self) -> Option<Result<T>> {
        if let Some(rx) = &self.receiver {
            match rx.try_recv() {
                Ok(res) => {
                    self.receiver = None;
                    return Some(res);
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    self.receiver = None;
                    return Some(Err(anyhow!("Worker task disconnected")));
                }
            }
        }
        None
    }

    pub fn is_running(&self) -> bool {
        self.receiver.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_poll_returns_result_once() {
        let (tx, rx) = mpsc::channel();
        let mut job: AsyncJob<u32> = AsyncJob::new(rx);

        assert!(job.is_running());
        assert!(job.poll().is_none());

        tx.send(Ok(7)).unwrap();
        let res = job.poll().expect("job completed");
        assert_eq!(res.unwrap(), 7);

        assert!(!job.is_running());
        assert!(job.poll().is_none());
    }

    #[test]
    fn test_poll_surfaces_disconnected_worker() {
        let (tx, rx) = mpsc::channel::<Result<u32>>();
        let mut job = AsyncJob::new(rx);
        drop(tx);

        let res = job.poll().expect("disconnect reported");
        assert!(res.is_err());
        assert!(!job.is_running());
    }
}
