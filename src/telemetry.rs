//! Process metrics views: publisher and collection lifecycle.
//!
//! [`ProcessMetricsViews`] owns the four process metric views, performs
//! the sample → compensate → record tick, and optionally drives it on a
//! fixed cadence via a background collection task.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

use crate::ballast;
use crate::catalog;
use crate::collection::{CollectionError, CollectionTimer};
use crate::sampler::{ProcStatsSource, RuntimeStatsSource};
use crate::views::View;

/// Default cadence for background collection.
pub const DEFAULT_COLLECTION_INTERVAL: Duration = Duration::from_secs(5);

// View indices, matching the order of `catalog::descriptors()`.
const HEAP_ALLOC: usize = 0;
const TOTAL_ALLOC: usize = 1;
const TOTAL_SYS_MEMORY: usize = 2;
const CPU_SECONDS: usize = 3;

/// The process metric views and their sampling logic.
///
/// Construction builds the views but registers nothing and starts no
/// timer; the caller registers `views()` with its aggregation registry and
/// then either calls [`start_collection`](Self::start_collection) or
/// drives ticks itself with [`update_views`](Self::update_views).
/// Independent instances share no state and may run concurrently.
pub struct ProcessMetricsViews<S = ProcStatsSource> {
    ballast_size_bytes: u64,
    source: Arc<S>,
    views: Vec<View>,
    timer: Mutex<Option<CollectionTimer>>,
}

impl ProcessMetricsViews<ProcStatsSource> {
    /// Creates the view set for this process. `ballast_size_bytes = 0`
    /// disables heap compensation.
    pub fn new(ballast_size_bytes: u64) -> Self {
        Self::with_source(ballast_size_bytes, ProcStatsSource::new())
    }
}

impl<S: RuntimeStatsSource> ProcessMetricsViews<S> {
    /// Creates the view set with an injected statistics source.
    pub fn with_source(ballast_size_bytes: u64, source: S) -> Self {
        let views = catalog::descriptors().into_iter().map(View::new).collect();
        Self {
            ballast_size_bytes,
            source: Arc::new(source),
            views,
            timer: Mutex::new(None),
        }
    }

    /// The four process metric views, in stable catalog order.
    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Performs one collection tick synchronously: sample, compensate the
    /// heap reading, record every view. Also serves as the deterministic
    /// hook for tests.
    ///
    /// Statistics that could not be read this tick are skipped; the
    /// remaining views still record. The next tick re-samples everything,
    /// so no retry happens here.
    pub fn update_views(&self) {
        record_tick(&*self.source, self.ballast_size_bytes, &self.views);
    }
}

impl<S: RuntimeStatsSource + 'static> ProcessMetricsViews<S> {
    /// Starts background collection at `interval`. The first tick runs
    /// immediately, subsequent ticks once per interval, never overlapping.
    /// Must be called from within a tokio runtime.
    ///
    /// Returns [`CollectionError::AlreadyRunning`] if collection is
    /// already active; the running timer is left untouched.
    pub fn start_collection(&self, interval: Duration) -> Result<(), CollectionError> {
        let mut slot = self.timer.lock().expect("collection timer lock poisoned");
        if slot.is_some() {
            return Err(CollectionError::AlreadyRunning);
        }

        let source = Arc::clone(&self.source);
        let views = self.views.clone();
        let ballast_size_bytes = self.ballast_size_bytes;
        *slot = Some(CollectionTimer::spawn(interval, move || {
            record_tick(&*source, ballast_size_bytes, &views);
        }));

        debug!(
            interval_secs = interval.as_secs_f64(),
            "Process metrics collection started"
        );
        Ok(())
    }

    /// Stops background collection, waiting for any in-flight tick to
    /// finish. No view is written after this returns. Calling it while
    /// already stopped is a no-op.
    pub async fn stop_collection(&self) {
        let timer = self
            .timer
            .lock()
            .expect("collection timer lock poisoned")
            .take();

        if let Some(timer) = timer {
            timer.shutdown().await;
            debug!("Process metrics collection stopped");
        }
    }
}

/// One sample → compensate → record pass over the views.
fn record_tick<S: RuntimeStatsSource>(source: &S, ballast_size_bytes: u64, views: &[View]) {
    let sample = source.sample();

    let heap_alloc = ballast::compensate(sample.heap_alloc_bytes, ballast_size_bytes);
    views[HEAP_ALLOC].record(heap_alloc as f64);
    views[TOTAL_ALLOC].record(sample.total_alloc_bytes as f64);

    match sample.total_sys_memory_bytes {
        Some(bytes) => views[TOTAL_SYS_MEMORY].record(bytes as f64),
        None => debug!("Total system memory unavailable this tick"),
    }

    match sample.cpu_seconds {
        Some(seconds) => views[CPU_SECONDS].record(seconds),
        None => debug!("Process CPU time unavailable this tick"),
    }
}
