//! Heap allocation accounting.
//!
//! Rust exposes no runtime heap statistics, so this crate counts them at
//! the allocator seam: [`CountingAllocator`] wraps the system allocator and
//! maintains two process-wide counters, bytes currently live on the heap
//! and cumulative bytes ever allocated. A binary opts in with:
//!
//! ```
//! use process_telemetry::heap::CountingAllocator;
//!
//! #[global_allocator]
//! static ALLOC: CountingAllocator = CountingAllocator;
//! # fn main() {}
//! ```
//!
//! Without the allocator installed both counters read zero and the sampler
//! publishes zero heap usage rather than failing.

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

static HEAP_ALLOC_BYTES: AtomicU64 = AtomicU64::new(0);
static TOTAL_ALLOC_BYTES: AtomicU64 = AtomicU64::new(0);

/// System allocator wrapper that keeps the process-wide heap counters.
pub struct CountingAllocator;

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            HEAP_ALLOC_BYTES.fetch_add(layout.size() as u64, Ordering::Relaxed);
            TOTAL_ALLOC_BYTES.fetch_add(layout.size() as u64, Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
        HEAP_ALLOC_BYTES.fetch_sub(layout.size() as u64, Ordering::Relaxed);
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = System.realloc(ptr, layout, new_size);
        if !new_ptr.is_null() {
            if new_size >= layout.size() {
                // Growth counts as a fresh allocation of the delta.
                let grown = (new_size - layout.size()) as u64;
                HEAP_ALLOC_BYTES.fetch_add(grown, Ordering::Relaxed);
                TOTAL_ALLOC_BYTES.fetch_add(grown, Ordering::Relaxed);
            } else {
                HEAP_ALLOC_BYTES.fetch_sub((layout.size() - new_size) as u64, Ordering::Relaxed);
            }
        }
        new_ptr
    }
}

/// Bytes currently allocated on the heap.
pub fn heap_alloc_bytes() -> u64 {
    HEAP_ALLOC_BYTES.load(Ordering::Relaxed)
}

/// Cumulative bytes allocated for heap objects since process start.
/// Monotonically non-decreasing.
pub fn total_alloc_bytes() -> u64 {
    TOTAL_ALLOC_BYTES.load(Ordering::Relaxed)
}
