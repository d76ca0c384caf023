//! Periodic collection timer.
//!
//! One background tokio task per timer; all sampling work for an instance
//! is serialized onto that task, so ticks never overlap; a tick that
//! outlives the interval simply delays the next one. Stopping signals the
//! task and waits for it to finish, including any tick already in
//! progress.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Errors from collection lifecycle transitions.
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("collection is already running")]
    AlreadyRunning,
}

/// Handle to a running periodic collection task.
#[derive(Debug)]
pub struct CollectionTimer {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl CollectionTimer {
    /// Spawns the timer task. `tick` runs once immediately and then once
    /// per interval, always on the spawned task.
    pub fn spawn<F>(interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (stop, mut stopped) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    // Check the stop signal first so a pending stop wins
                    // over a pending tick.
                    biased;

                    _ = stopped.changed() => break,
                    _ = timer.tick() => tick(),
                }
            }

            debug!("Collection task exited");
        });

        Self { stop, task }
    }

    /// Signals the task to stop and waits for it to finish. Any tick
    /// already in progress completes before this returns.
    pub async fn shutdown(mut self) {
        let _ = self.stop.send(true);
        let _ = (&mut self.task).await;
    }
}

impl Drop for CollectionTimer {
    fn drop(&mut self) {
        // Backstop for handles dropped without shutdown(); after a normal
        // shutdown the task has already finished and abort is a no-op.
        let _ = self.stop.send(true);
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_timer_ticks_and_drains_on_shutdown() {
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks);

        let timer = CollectionTimer::spawn(Duration::from_millis(5), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(40)).await;
        timer.shutdown().await;

        let after_stop = ticks.load(Ordering::SeqCst);
        assert!(after_stop > 0);

        // No ticks after shutdown returns.
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), after_stop);
    }

    #[tokio::test]
    async fn test_dropping_the_handle_ends_the_task() {
        let ticks = Arc::new(AtomicU64::new(0));
        let counter = Arc::clone(&ticks);

        let timer = CollectionTimer::spawn(Duration::from_millis(5), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(timer);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let after_drop = ticks.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), after_drop);
    }
}
