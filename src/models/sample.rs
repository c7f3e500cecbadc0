//! Throughput samples and session state

use serde::{Deserialize, Serialize};

/// Bits per second in one megabit per second
pub const BITS_PER_MEGABIT: f64 = 1_000_000.0;

/// Convert a raw bits-per-second reading into Mbps
pub fn bps_to_mbps(bits_per_second: f64) -> f64 {
    bits_per_second / BITS_PER_MEGABIT
}

/// Format a Mbps value the way every display surface shows it
pub fn format_mbps(mbps: f64) -> String {
    format!("{:.2}", mbps)
}

/// Result of one successful round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Download throughput in Mbps
    pub download_mbps: f64,

    /// Upload throughput in Mbps
    pub upload_mbps: f64,
}

impl Sample {
    /// Build a sample from raw bits-per-second readings
    pub fn from_bps(download_bps: f64, upload_bps: f64) -> Self {
        Self {
            download_mbps: bps_to_mbps(download_bps),
            upload_mbps: bps_to_mbps(upload_bps),
        }
    }
}

/// Ordered samples of the current session
pub type RunSequence = Vec<Sample>;

/// Download column of a run sequence
pub fn download_series(samples: &[Sample]) -> Vec<f64> {
    samples.iter().map(|s| s.download_mbps).collect()
}

/// Upload column of a run sequence
pub fn upload_series(samples: &[Sample]) -> Vec<f64> {
    samples.iter().map(|s| s.upload_mbps).collect()
}

/// Lifecycle of one benchmark session as seen by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Running,
    Stopping,
    Finished,
}

impl SessionState {
    /// Whether the start control accepts input
    pub fn can_start(&self) -> bool {
        matches!(self, Self::Idle | Self::Finished)
    }

    /// Whether the stop control accepts input
    pub fn can_stop(&self) -> bool {
        matches!(self, Self::Running)
    }

    /// A runner task is alive in this state
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running | Self::Stopping)
    }
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    /// All configured rounds were attempted
    Completed,
    /// The stop signal ended the loop early
    Stopped,
    /// No server could be resolved, no rounds ran
    ServerUnavailable,
}

impl SessionOutcome {
    pub fn description(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Stopped => "stopped",
            Self::ServerUnavailable => "server unavailable",
        }
    }
}
