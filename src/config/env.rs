//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        if Path::new(".env").exists() {
            dotenv::from_filename(".env")
                .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;

            if debug {
                eprintln!("Loaded configuration from .env file");
            }
        }

        Ok(())
    }

    /// Supported variables as (name, description, example)
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("BENCH_RUNS", "Number of rounds per session", "20"),
            ("BENCH_SERVERS", "Comma-separated server base URLs", "https://speed.cloudflare.com"),
            ("BENCH_TIMEOUT_SECONDS", "Per-request timeout in seconds", "30"),
            ("BENCH_DOWNLOAD_BYTES", "Bytes requested per download", "25000000"),
            ("BENCH_UPLOAD_BYTES", "Bytes sent per upload", "10000000"),
            ("ENABLE_COLOR", "Colored console output (true/false)", "true"),
        ]
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        match key {
            "BENCH_RUNS" => {
                let runs: u32 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid BENCH_RUNS value '{}': {}", value, e)))?;
                if runs == 0 || runs > crate::defaults::MAX_RUNS {
                    return Err(AppError::config(format!(
                        "BENCH_RUNS must be between 1 and {}, got: {}",
                        crate::defaults::MAX_RUNS,
                        runs
                    )));
                }
            }
            "BENCH_SERVERS" => {
                for server in value.split(',') {
                    let server = server.trim();
                    if !server.is_empty() {
                        url::Url::parse(server).map_err(|e| {
                            AppError::config(format!("Invalid BENCH_SERVERS entry '{}': {}", server, e))
                        })?;
                    }
                }
            }
            "BENCH_TIMEOUT_SECONDS" => {
                let timeout: u64 = value.parse().map_err(|e| {
                    AppError::config(format!("Invalid BENCH_TIMEOUT_SECONDS value '{}': {}", value, e))
                })?;
                if timeout == 0 || timeout > 600 {
                    return Err(AppError::config(format!(
                        "BENCH_TIMEOUT_SECONDS must be between 1 and 600, got: {}",
                        timeout
                    )));
                }
            }
            "BENCH_DOWNLOAD_BYTES" | "BENCH_UPLOAD_BYTES" => {
                let bytes: u64 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if bytes == 0 {
                    return Err(AppError::config(format!("{} must be greater than 0", key)));
                }
            }
            "ENABLE_COLOR" => {
                value.parse::<bool>().map_err(|e| {
                    AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", value, e))
                })?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Validate every supported variable currently set; returns the names checked
    pub fn validate_current_env() -> Result<Vec<String>> {
        let mut checked = Vec::new();

        for (name, _, _) in Self::get_supported_env_vars() {
            if let Ok(value) = std::env::var(name) {
                Self::validate_env_var(name, &value)?;
                checked.push(name.to_string());
            }
        }

        Ok(checked)
    }
}
