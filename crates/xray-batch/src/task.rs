use std::{
    path::PathBuf,
    sync::mpsc::{self, Receiver, TryRecvError},
    thread::JoinHandle,
};

use crate::{coordinator::process_batch, error::BatchError, result::BatchResult};

/// A batch run on a background thread.
///
/// The worker processes the images one after the other and sends exactly one completion
/// message. The handle is consumed by [`BatchTask::wait`], so the result can only be taken
/// once; [`BatchTask::try_wait`] lets an interactive caller poll without blocking.
///
/// There is no cancellation: once spawned, the batch runs to the end.
///
/// # Example
///
/// ```no_run
/// use xray_batch::BatchTask;
///
/// let task = BatchTask::spawn(vec!["chest.png".into(), "hand.jpg".into()]);
/// let batch = task.wait().unwrap();
/// println!("processed {} images", batch.len());
/// ```
pub struct BatchTask {
    rx: Receiver<Result<BatchResult, BatchError>>,
    handle: Option<JoinHandle<()>>,
}

impl BatchTask {
    /// Start processing `paths` on a new worker thread.
    pub fn spawn(paths: Vec<PathBuf>) -> Self {
        Self::spawn_worker(move || {
            log::debug!("batch worker started on {} paths", paths.len());
            Ok(process_batch(&paths))
        })
    }

    fn spawn_worker<F>(work: F) -> Self
    where
        F: FnOnce() -> Result<BatchResult, BatchError> + Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(1);

        let handle = std::thread::spawn(move || {
            let res = work();
            // the receiver may be gone if the caller dropped the task
            if tx.send(res).is_err() {
                log::debug!("batch result dropped, nobody is waiting");
            }
        });

        Self {
            rx,
            handle: Some(handle),
        }
    }

    /// Block until the worker delivers its result.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::WorkerDisconnected`] if the worker died before sending.
    pub fn wait(mut self) -> Result<BatchResult, BatchError> {
        let res = self
            .rx
            .recv()
            .unwrap_or(Err(BatchError::WorkerDisconnected));
        self.join();
        res
    }

    /// Check for the result without blocking.
    ///
    /// Returns `None` while the worker is still running. Once a result has been returned the
    /// channel is empty, later calls report [`BatchError::WorkerDisconnected`].
    pub fn try_wait(&mut self) -> Option<Result<BatchResult, BatchError>> {
        match self.rx.try_recv() {
            Ok(res) => {
                self.join();
                Some(res)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.join();
                Some(Err(BatchError::WorkerDisconnected))
            }
        }
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("batch worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::BatchTask;
    use crate::{error::BatchError, result::BatchResult};
    use std::time::Duration;

    #[test]
    fn test_wait_on_panicked_worker() {
        let task = BatchTask::spawn_worker(|| panic!("worker failure"));
        assert!(matches!(task.wait(), Err(BatchError::WorkerDisconnected)));
    }

    #[test]
    fn test_try_wait_on_panicked_worker() {
        let mut task = BatchTask::spawn_worker(|| panic!("worker failure"));
        let res = loop {
            if let Some(res) = task.try_wait() {
                break res;
            }
            std::thread::sleep(Duration::from_millis(5));
        };
        assert!(matches!(res, Err(BatchError::WorkerDisconnected)));
    }

    #[test]
    fn test_worker_result_is_forwarded() -> Result<(), BatchError> {
        let batch = BatchTask::spawn_worker(|| Ok(BatchResult::new())).wait()?;
        assert!(batch.is_empty());
        Ok(())
    }
}
