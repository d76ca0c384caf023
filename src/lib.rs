//! process-telemetry
//!
//! Samples the running process's own resource consumption (heap usage,
//! cumulative allocation, resident system memory, accumulated CPU time)
//! and republishes the samples as named, queryable last-value metric views
//! for downstream observability pipelines.
//!
//! # Features
//!
//! - **Fixed metric catalog**: four stable, slash-namespaced metric names
//! - **Ballast compensation**: subtracts a configured memory ballast from
//!   the reported heap usage so real memory pressure stays visible
//! - **Last-value views**: one untagged row per metric, overwritten on
//!   every tick, registrable with any aggregation registry
//! - **Background collection**: fixed-cadence tokio task with
//!   non-overlapping ticks and synchronous drain on stop
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use process_telemetry::{LastValueRegistry, MetricRegistry, ProcessMetricsViews};
//!
//! let pmv = Arc::new(ProcessMetricsViews::new(0));
//!
//! let registry = LastValueRegistry::new();
//! registry.register(pmv.views()).unwrap();
//!
//! // One synchronous tick; in production use start_collection() instead.
//! pmv.update_views();
//!
//! for view in pmv.views() {
//!     let rows = registry.retrieve_data(view.name()).unwrap();
//!     println!("{}: {:?}", view.name(), rows);
//! }
//!
//! registry.unregister(pmv.views());
//! ```
//!
//! Heap statistics come from the allocator seam; install
//! [`heap::CountingAllocator`] as the global allocator to enable them
//! (without it the heap views report zero).

pub mod ballast;
pub mod catalog;
pub mod collection;
pub mod config;
pub mod heap;
pub mod sampler;
pub mod telemetry;
pub mod views;

// Re-export main types for convenience
pub use collection::CollectionError;
pub use config::TelemetryConfig;
pub use sampler::{ProcStatsSource, ProcessSample, RuntimeStatsSource};
pub use telemetry::{ProcessMetricsViews, DEFAULT_COLLECTION_INTERVAL};
pub use views::{
    Aggregation, LastValueRegistry, MetricDescriptor, MetricRegistry, RegistryError, Row, View,
};
