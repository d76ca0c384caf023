//! Last-value metric views and the aggregation-registry capability.
//!
//! A view is a named, queryable projection of one metric's most recent
//! value. Views in this crate carry no tag dimensions: a query returns
//! either no row (nothing recorded yet) or exactly one untagged row.
//! The registry is modeled as a capability trait so the embedding process
//! can plug in its own aggregation library; [`LastValueRegistry`] is the
//! in-memory implementation used when none is supplied.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// How recorded measurements are aggregated on query.
///
/// Only last-value aggregation is supported: each recorded measurement
/// overwrites the previous one and no history is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    LastValue,
}

/// Immutable description of one metric.
///
/// Names are a stable contract with downstream consumers: adding a metric
/// is fine, renaming or removing one is a breaking change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    /// UCUM unit string, e.g. "By" for bytes or "s" for seconds.
    pub unit: &'static str,
    pub aggregation: Aggregation,
}

/// One result row for a view query.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// Tag dimensions. Always empty for the process metric views.
    pub tags: Vec<(String, String)>,
    pub value: f64,
}

/// A named last-value view for a single metric.
///
/// Cloning a view yields another handle to the same underlying cell, so a
/// registry can hold clones and still observe every recorded value.
#[derive(Debug, Clone)]
pub struct View {
    descriptor: MetricDescriptor,
    cell: Arc<RwLock<Option<f64>>>,
}

impl View {
    pub fn new(descriptor: MetricDescriptor) -> Self {
        Self {
            descriptor,
            cell: Arc::new(RwLock::new(None)),
        }
    }

    pub fn name(&self) -> &'static str {
        self.descriptor.name
    }

    pub fn descriptor(&self) -> &MetricDescriptor {
        &self.descriptor
    }

    /// Records a measurement, overwriting any previous value.
    pub fn record(&self, value: f64) {
        let mut cell = self.cell.write().expect("view cell lock poisoned");
        *cell = Some(value);
    }

    /// The most recently recorded value, or `None` if nothing has been
    /// recorded yet.
    pub fn last_value(&self) -> Option<f64> {
        *self.cell.read().expect("view cell lock poisoned")
    }

    /// Query result rows: empty before the first record, exactly one
    /// untagged row afterwards. An empty result means "not yet sampled",
    /// not an error.
    pub fn rows(&self) -> Vec<Row> {
        match self.last_value() {
            Some(value) => vec![Row {
                tags: Vec::new(),
                value,
            }],
            None => Vec::new(),
        }
    }
}

/// Errors surfaced by view registration.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("a view named {0:?} is already registered")]
    DuplicateName(String),
}

/// Aggregation-registry capability.
///
/// The publisher only needs these three operations; it never assumes
/// anything about registry internals. Registration and recording happen on
/// the sampling task, while `retrieve_data` may be called concurrently by
/// arbitrary external readers, so implementations must make row reads safe
/// under concurrent recording.
pub trait MetricRegistry {
    /// Registers the views. Must be all-or-nothing: on a name collision no
    /// view from `views` is registered.
    fn register(&self, views: &[View]) -> Result<(), RegistryError>;

    /// Removes the views. Unknown names are ignored.
    fn unregister(&self, views: &[View]);

    /// Current rows for a registered view, or `None` for an unknown name.
    fn retrieve_data(&self, name: &str) -> Option<Vec<Row>>;
}

/// In-memory registry with last-value semantics.
#[derive(Debug, Default)]
pub struct LastValueRegistry {
    views: RwLock<HashMap<&'static str, View>>,
}

impl LastValueRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MetricRegistry for LastValueRegistry {
    fn register(&self, views: &[View]) -> Result<(), RegistryError> {
        let mut map = self.views.write().expect("registry lock poisoned");
        for view in views {
            if map.contains_key(view.name()) {
                return Err(RegistryError::DuplicateName(view.name().to_string()));
            }
        }
        for view in views {
            map.insert(view.name(), view.clone());
        }
        Ok(())
    }

    fn unregister(&self, views: &[View]) {
        let mut map = self.views.write().expect("registry lock poisoned");
        for view in views {
            map.remove(view.name());
        }
    }

    fn retrieve_data(&self, name: &str) -> Option<Vec<Row>> {
        let map = self.views.read().expect("registry lock poisoned");
        map.get(name).map(View::rows)
    }
}
