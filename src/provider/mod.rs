//! Measurement providers
//!
//! A provider resolves a measurement server and performs single download and
//! upload throughput measurements against it. The benchmark runner treats it
//! as a black box that returns bits per second or an error.

pub mod cloudflare;

pub use cloudflare::CloudflareProvider;

use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Server selected for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Base URL measurements are issued against
    pub base_url: String,
    /// Host name reported by the server
    pub host: String,
    /// Site or data-center name
    pub name: String,
    /// Country code of the site
    pub country: String,
    /// Best round-trip observed while selecting
    pub latency_ms: f64,
}

impl ServerInfo {
    /// One-line description used in the session log
    pub fn describe(&self) -> String {
        format!("{} located in {}, {}", self.host, self.name, self.country)
    }
}

/// Throughput measurement backend
#[async_trait]
pub trait MeasurementProvider: Send + Sync {
    /// Pick the server used for every round of a session
    async fn find_best_server(&self) -> Result<ServerInfo>;

    /// Measure download throughput in bits per second
    async fn measure_download(&self, server: &ServerInfo) -> Result<f64>;

    /// Measure upload throughput in bits per second
    async fn measure_upload(&self, server: &ServerInfo) -> Result<f64>;

    /// Provider name for logs
    fn name(&self) -> &str;
}

/// Bits per second for `bytes` transferred in `elapsed`
pub fn throughput_bps(bytes: u64, elapsed: Duration) -> Result<f64> {
    let secs = elapsed.as_secs_f64();

    if bytes == 0 {
        return Err(AppError::test_execution("no bytes transferred"));
    }

    if secs <= 0.0 {
        return Err(AppError::test_execution("transfer finished in zero time"));
    }

    Ok((bytes as f64 * 8.0) / secs)
}
