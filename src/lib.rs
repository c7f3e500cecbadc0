//! Network Benchmark
//!
//! Repeatedly measures download and upload throughput against a speed-test
//! server, keeps running min/max/mean statistics and charts the results in a
//! terminal UI (or prints them in headless mode).

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod provider;
pub mod runner;
pub mod stats;
pub mod ui;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{Config, RunSequence, Sample, SessionOutcome, SessionState};
pub use provider::{CloudflareProvider, MeasurementProvider, ServerInfo};
pub use runner::{BenchmarkRunner, RunnerEvent, StopSignal};
pub use stats::{Aggregate, SessionStats};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Build metadata from build.rs
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const TARGET_TRIPLE: &str = env!("TARGET_TRIPLE");
pub const GIT_COMMIT: Option<&str> = option_env!("GIT_COMMIT");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_RUNS: u32 = 20;
    pub const MAX_RUNS: u32 = 1000;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_SERVERS: &[&str] = &["https://speed.cloudflare.com"];
    pub const DEFAULT_DOWNLOAD_BYTES: u64 = 25_000_000;
    pub const DEFAULT_UPLOAD_BYTES: u64 = 10_000_000;
    pub const MAX_PAYLOAD_BYTES: u64 = 1_000_000_000;
    pub const DEFAULT_ENABLE_COLOR: bool = true;
    /// Delay before an auto-started session begins
    pub const AUTO_START_DELAY: Duration = Duration::from_secs(1);
}
