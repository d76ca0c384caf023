//! Configuration shape for process self-telemetry.
//!
//! The surrounding process owns configuration files and CLI flags; this
//! module only defines the deserializable structure and its defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Process telemetry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Size of the memory ballast in MiB (default: 0, compensation disabled)
    #[serde(default = "default_ballast_size_mib")]
    pub ballast_size_mib: u64,

    /// Sampling interval in seconds (default: 5)
    #[serde(default = "default_sample_interval_secs")]
    pub sample_interval_secs: u64,
}

fn default_ballast_size_mib() -> u64 {
    0
}
fn default_sample_interval_secs() -> u64 {
    5
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            ballast_size_mib: default_ballast_size_mib(),
            sample_interval_secs: default_sample_interval_secs(),
        }
    }
}

impl TelemetryConfig {
    /// Ballast size in bytes, as expected by
    /// [`ProcessMetricsViews::new`](crate::ProcessMetricsViews::new).
    pub fn ballast_size_bytes(&self) -> u64 {
        self.ballast_size_mib * 1024 * 1024
    }

    /// Sampling interval as a [`Duration`].
    pub fn sample_interval(&self) -> Duration {
        Duration::from_secs(self.sample_interval_secs)
    }
}
