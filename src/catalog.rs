//! The catalog of process metric descriptors.
//!
//! Four metrics, fixed at construction time. Changing a metric name is a
//! breaking change for downstream consumers; adding new metrics is fine as
//! long as the existing names and order stay stable.

use crate::views::{Aggregation, MetricDescriptor};

pub const HEAP_ALLOC_BYTES: &str = "process/runtime/heap_alloc_bytes";
pub const TOTAL_ALLOC_BYTES: &str = "process/runtime/total_alloc_bytes";
pub const TOTAL_SYS_MEMORY_BYTES: &str = "process/runtime/total_sys_memory_bytes";
pub const CPU_SECONDS: &str = "process/cpu_seconds";

// UCUM unit strings.
const UNIT_BYTES: &str = "By";
const UNIT_SECONDS: &str = "s";

/// The process metric descriptors, in stable order.
pub fn descriptors() -> Vec<MetricDescriptor> {
    vec![
        MetricDescriptor {
            name: HEAP_ALLOC_BYTES,
            description: "Bytes of allocated heap objects (net of the configured ballast)",
            unit: UNIT_BYTES,
            aggregation: Aggregation::LastValue,
        },
        MetricDescriptor {
            name: TOTAL_ALLOC_BYTES,
            description: "Cumulative bytes allocated for heap objects",
            unit: UNIT_BYTES,
            aggregation: Aggregation::LastValue,
        },
        MetricDescriptor {
            name: TOTAL_SYS_MEMORY_BYTES,
            description: "Total physical memory reserved from the system for the process",
            unit: UNIT_BYTES,
            aggregation: Aggregation::LastValue,
        },
        MetricDescriptor {
            name: CPU_SECONDS,
            description: "Total CPU user and system time in seconds",
            unit: UNIT_SECONDS,
            aggregation: Aggregation::LastValue,
        },
    ]
}
