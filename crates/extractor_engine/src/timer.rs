use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// A single cancelable one-shot timer on a tokio runtime.
///
/// Arming an armed timer replaces it, so at most one callback per handle is
/// ever pending. Dropping the handle cancels it.
pub struct TimerHandle {
    runtime: Handle,
    task: Option<JoinHandle<()>>,
}

impl TimerHandle {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            task: None,
        }
    }

    pub fn arm<F>(&mut self, delay: Duration, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.task = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            callback();
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
