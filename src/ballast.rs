//! Ballast compensation for heap-usage reporting.
//!
//! A ballast is a large allocation deliberately retained for the process
//! lifetime to raise allocator pacing thresholds and reduce collection
//! frequency. Left uncorrected it dominates the reported heap usage, so
//! the publisher subtracts the configured ballast size from the raw
//! reading before recording it. This module only accounts for the ballast;
//! it does not own the allocation itself.

/// Subtracts the ballast from a raw heap reading.
///
/// With a zero ballast this is the identity. A raw value transiently below
/// the ballast size (possible at startup before the ballast allocation is
/// resident) clamps to zero rather than reporting a negative quantity.
pub fn compensate(raw_heap_alloc_bytes: u64, ballast_size_bytes: u64) -> u64 {
    raw_heap_alloc_bytes.saturating_sub(ballast_size_bytes)
}
