//! Configuration data model and validation

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of measurement rounds per session
    #[serde(default = "default_runs")]
    pub runs: u32,

    /// Single-round test mode (`--test`)
    #[serde(default)]
    pub test_mode: bool,

    /// Start a session shortly after launch without user input
    #[serde(default)]
    pub auto_start: bool,

    /// Candidate measurement server base URLs
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,

    /// Payload size requested per download measurement
    #[serde(default = "default_download_bytes")]
    pub download_bytes: u64,

    /// Payload size sent per upload measurement
    #[serde(default = "default_upload_bytes")]
    pub upload_bytes: u64,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_seconds: u64,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Run without the terminal UI
    #[serde(default)]
    pub headless: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runs: default_runs(),
            test_mode: false,
            auto_start: false,
            servers: default_servers(),
            download_bytes: default_download_bytes(),
            upload_bytes: default_upload_bytes(),
            timeout_seconds: default_timeout_secs(),
            enable_color: default_enable_color(),
            headless: false,
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Label for the start control
    pub fn start_label(&self) -> String {
        if self.test_mode {
            "Start Benchmark (Test Mode)".to_string()
        } else {
            format!("Start Benchmark ({} Runs)", self.runs)
        }
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.runs == 0 {
            return Err(AppError::config("Run count must be greater than 0"));
        }

        if self.runs > crate::defaults::MAX_RUNS {
            return Err(AppError::config(format!(
                "Run count cannot exceed {}",
                crate::defaults::MAX_RUNS
            )));
        }

        if self.servers.is_empty() {
            return Err(AppError::config("At least one measurement server is required"));
        }

        for server in &self.servers {
            if server.is_empty() {
                return Err(AppError::config("Server URL cannot be empty"));
            }

            match url::Url::parse(server) {
                Ok(parsed) => {
                    if parsed.scheme() != "http" && parsed.scheme() != "https" {
                        return Err(AppError::config(format!(
                            "Server URL must use http or https: {}",
                            server
                        )));
                    }
                }
                Err(e) => {
                    return Err(AppError::config(format!("Invalid server URL '{}': {}", server, e)));
                }
            }
        }

        if self.download_bytes == 0 || self.download_bytes > crate::defaults::MAX_PAYLOAD_BYTES {
            return Err(AppError::config(format!(
                "Download size must be between 1 and {} bytes",
                crate::defaults::MAX_PAYLOAD_BYTES
            )));
        }

        if self.upload_bytes == 0 || self.upload_bytes > crate::defaults::MAX_PAYLOAD_BYTES {
            return Err(AppError::config(format!(
                "Upload size must be between 1 and {} bytes",
                crate::defaults::MAX_PAYLOAD_BYTES
            )));
        }

        if self.timeout_seconds == 0 {
            return Err(AppError::config("Timeout must be greater than 0"));
        }

        if self.timeout_seconds > 600 {
            return Err(AppError::config("Timeout cannot exceed 600 seconds"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(runs) = std::env::var("BENCH_RUNS") {
            self.runs = runs
                .parse()
                .map_err(|e| AppError::config(format!("Invalid BENCH_RUNS value '{}': {}", runs, e)))?;
        }

        if let Ok(servers) = std::env::var("BENCH_SERVERS") {
            self.servers = servers
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        if let Ok(timeout) = std::env::var("BENCH_TIMEOUT_SECONDS") {
            self.timeout_seconds = timeout.parse().map_err(|e| {
                AppError::config(format!("Invalid BENCH_TIMEOUT_SECONDS value '{}': {}", timeout, e))
            })?;
        }

        if let Ok(bytes) = std::env::var("BENCH_DOWNLOAD_BYTES") {
            self.download_bytes = bytes.parse().map_err(|e| {
                AppError::config(format!("Invalid BENCH_DOWNLOAD_BYTES value '{}': {}", bytes, e))
            })?;
        }

        if let Ok(bytes) = std::env::var("BENCH_UPLOAD_BYTES") {
            self.upload_bytes = bytes.parse().map_err(|e| {
                AppError::config(format!("Invalid BENCH_UPLOAD_BYTES value '{}': {}", bytes, e))
            })?;
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.parse().map_err(|e| {
                AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e))
            })?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_runs() -> u32 {
    crate::defaults::DEFAULT_RUNS
}

fn default_servers() -> Vec<String> {
    crate::defaults::DEFAULT_SERVERS
        .iter()
        .map(|&s| s.to_string())
        .collect()
}

fn default_download_bytes() -> u64 {
    crate::defaults::DEFAULT_DOWNLOAD_BYTES
}

fn default_upload_bytes() -> u64 {
    crate::defaults::DEFAULT_UPLOAD_BYTES
}

fn default_timeout_secs() -> u64 {
    crate::defaults::DEFAULT_TIMEOUT.as_secs()
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
