//! Point-in-time sampling of the process's own resource usage.
//!
//! The production source reads heap counters from the allocator seam and
//! resident memory / CPU time from the `/proc/self` filesystem. The source
//! is a trait so tests (or embedders with their own statistics plumbing)
//! can inject fixed samples.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use tracing::debug;

use crate::heap;

/// Get system clock ticks per second (usually 100, but can vary).
fn get_clk_tck() -> f64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf is safe to call with _SC_CLK_TCK
        // Returns -1 on error, 0 if undefined - both are handled by the > 0 check
        unsafe {
            let tck = libc::sysconf(libc::_SC_CLK_TCK);
            if tck > 0 {
                return tck as f64;
            }
        }
    }
    // Fallback to common default for error cases or non-Unix platforms
    100.0
}

/// System clock ticks per second (for CPU time calculation).
static CLK_TCK: Lazy<f64> = Lazy::new(get_clk_tck);

/// One point-in-time reading of the process's resource usage.
///
/// Ephemeral: produced and consumed within one sampling tick. A `None`
/// field means the statistic could not be read on this platform or tick;
/// it is skipped for that tick rather than fabricated.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProcessSample {
    /// Bytes currently allocated on the heap (before ballast compensation).
    pub heap_alloc_bytes: u64,
    /// Cumulative bytes allocated for heap objects.
    pub total_alloc_bytes: u64,
    /// Resident memory reserved from the system for the process.
    pub total_sys_memory_bytes: Option<u64>,
    /// Accumulated CPU user+system time in seconds.
    pub cpu_seconds: Option<f64>,
}

/// Source of runtime/process statistics.
///
/// The sampling tick calls this exactly once; implementations must not
/// mutate process state beyond the read itself.
pub trait RuntimeStatsSource: Send + Sync {
    fn sample(&self) -> ProcessSample;
}

/// Production statistics source: allocator counters plus `/proc/self`.
#[derive(Debug, Clone)]
pub struct ProcStatsSource {
    proc_self: PathBuf,
}

impl ProcStatsSource {
    pub fn new() -> Self {
        Self {
            proc_self: PathBuf::from("/proc/self"),
        }
    }

    /// Points the procfs readers at an alternate base directory.
    pub fn with_proc_path(proc_self: impl Into<PathBuf>) -> Self {
        Self {
            proc_self: proc_self.into(),
        }
    }
}

impl Default for ProcStatsSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeStatsSource for ProcStatsSource {
    fn sample(&self) -> ProcessSample {
        let total_sys_memory_bytes = match read_resident_set_bytes(&self.proc_self) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                debug!("Failed to read resident set size: {}", e);
                None
            }
        };

        let cpu_seconds = match read_cpu_seconds(&self.proc_self) {
            Ok(seconds) => Some(seconds),
            Err(e) => {
                debug!("Failed to read process CPU time: {}", e);
                None
            }
        };

        ProcessSample {
            heap_alloc_bytes: heap::heap_alloc_bytes(),
            total_alloc_bytes: heap::total_alloc_bytes(),
            total_sys_memory_bytes,
            cpu_seconds,
        }
    }
}

/// Parse resident set size in bytes from the `VmRSS:` line of
/// `<base>/status`.
pub fn read_resident_set_bytes(proc_path: &Path) -> Result<u64, std::io::Error> {
    let content = fs::read_to_string(proc_path.join("status"))?;

    for line in content.lines() {
        if let Some(rest) = line.strip_prefix("VmRSS:") {
            // Format: "VmRSS:     1234 kB"
            let kb: u64 = rest
                .split_whitespace()
                .next()
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| std::io::Error::other("Invalid VmRSS line"))?;
            return Ok(kb * 1024);
        }
    }

    Err(std::io::Error::other("No VmRSS line in status file"))
}

/// Parse total CPU time (user+system) in seconds from `<base>/stat`.
pub fn read_cpu_seconds(proc_path: &Path) -> Result<f64, std::io::Error> {
    let content = fs::read_to_string(proc_path.join("stat"))?;

    let parts: Vec<&str> = content.split_whitespace().collect();
    if parts.len() <= 14 {
        return Err(std::io::Error::other("Invalid stat format"));
    }

    // Fields 14 and 15 (0-indexed: 13 and 14) are utime and stime in clock ticks.
    let utime: f64 = parts[13]
        .parse()
        .map_err(|_| std::io::Error::other("Failed to parse utime field"))?;
    let stime: f64 = parts[14]
        .parse()
        .map_err(|_| std::io::Error::other("Failed to parse stime field"))?;

    Ok((utime + stime) / *CLK_TCK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const STAT_LINE: &str = "1234 (test_process) S 1 1234 1234 0 -1 4194304 100 0 0 0 1000 500 0 0 20 0 1 0 12345 12345678 1234 18446744073709551615 4194304 4238788 140736466511168 0 0 0 0 0 0 0 0 0 17 1 0 0 0 0 0";

    #[test]
    fn test_read_resident_set_bytes() {
        let dir = tempdir().expect("Failed to create temp dir");
        let status = "Name:\ttest_process\nVmPeak:\t  20000 kB\nVmRSS:\t  16384 kB\nVmSwap:\t      0 kB\n";
        std::fs::write(dir.path().join("status"), status).expect("Failed to write status file");

        let bytes = read_resident_set_bytes(dir.path()).unwrap();
        assert_eq!(bytes, 16384 * 1024);
    }

    #[test]
    fn test_read_resident_set_bytes_missing_line() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("status"), "Name:\ttest_process\n")
            .expect("Failed to write status file");

        assert!(read_resident_set_bytes(dir.path()).is_err());
    }

    #[test]
    fn test_read_resident_set_bytes_missing_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        assert!(read_resident_set_bytes(dir.path()).is_err());
    }

    #[test]
    fn test_read_cpu_seconds() {
        let dir = tempdir().expect("Failed to create temp dir");
        // utime=1000 ticks, stime=500 ticks -> 1500 / CLK_TCK seconds
        std::fs::write(dir.path().join("stat"), STAT_LINE).expect("Failed to write stat file");

        let seconds = read_cpu_seconds(dir.path()).unwrap();
        let expected = 1500.0 / *CLK_TCK;
        assert!(
            (seconds - expected).abs() < 0.001,
            "Expected ~{:.3}, got {:.3}",
            expected,
            seconds
        );
    }

    #[test]
    fn test_read_cpu_seconds_invalid_stat() {
        let dir = tempdir().expect("Failed to create temp dir");
        std::fs::write(dir.path().join("stat"), "1234 (test) S 1 2 3")
            .expect("Failed to write stat file");

        assert!(read_cpu_seconds(dir.path()).is_err());
    }

    #[test]
    fn test_sample_degrades_to_none_on_unreadable_procfs() {
        let dir = tempdir().expect("Failed to create temp dir");
        let source = ProcStatsSource::with_proc_path(dir.path());

        let sample = source.sample();
        assert_eq!(sample.total_sys_memory_bytes, None);
        assert_eq!(sample.cpu_seconds, None);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_sample_reads_own_process_stats() {
        let sample = ProcStatsSource::new().sample();
        assert!(sample.total_sys_memory_bytes.unwrap() > 0);
        assert!(sample.cpu_seconds.unwrap() >= 0.0);
    }
}
