//! Tracking for detached background refreshes.

use std::future::Future;

use tokio::sync::Mutex;
use tokio::task::JoinSet;

/// Background tasks that may outlive the request that started them.
///
/// Tasks run detached; [`Refreshes::settle`] joins them when a caller needs
/// to observe their effects. Dropping the set aborts whatever is still running.
#[derive(Debug, Default)]
pub struct Refreshes {
    tasks: Mutex<JoinSet<()>>,
}

impl Refreshes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `task` onto the current runtime, reaping tasks that already finished.
    pub async fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut tasks = self.tasks.lock().await;
        while let Some(done) = tasks.try_join_next() {
            log_join(done);
        }
        tasks.spawn(task);
    }

    /// Number of tasks not yet joined.
    pub async fn pending(&self) -> usize {
        self.tasks.lock().await.len()
    }

    /// Wait for every outstanding task.
    ///
    /// Tasks spawned while settling are left for the next call.
    pub async fn settle(&self) {
        let mut tasks = std::mem::take(&mut *self.tasks.lock().await);
        while let Some(done) = tasks.join_next().await {
            log_join(done);
        }
    }
}

fn log_join(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, "background refresh task did not complete");
    }
}
