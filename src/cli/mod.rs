//! Command-line interface

use clap::{ArgAction, Parser};

/// Network Benchmark - repeatedly measure download/upload throughput
#[derive(Parser, Debug, Clone)]
#[command(name = "netbench")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Test mode: run a single round and start automatically
    #[arg(long)]
    pub test: bool,

    /// Number of measurement rounds per session [default: 20]
    #[arg(short, long, value_parser = parse_runs)]
    pub runs: Option<u32>,

    /// Run without the terminal UI and print results to stdout
    #[arg(long)]
    pub headless: bool,

    /// Measurement server base URL (can be used multiple times)
    #[arg(long = "server", action = ArgAction::Append)]
    pub servers: Vec<String>,

    /// Bytes requested per download measurement
    #[arg(long)]
    pub download_bytes: Option<u64>,

    /// Bytes sent per upload measurement
    #[arg(long)]
    pub upload_bytes: Option<u64>,

    /// Request timeout in seconds
    #[arg(short, long, value_parser = parse_duration)]
    pub timeout: Option<u64>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        if self.no_color {
            false
        } else {
            supports_color()
        }
    }

    /// Round count after applying `--test` precedence
    pub fn effective_runs(&self) -> Option<u32> {
        if self.test {
            Some(1)
        } else {
            self.runs
        }
    }

    /// Get configuration summary for display
    pub fn get_config_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("Configuration Summary:\n");
        match self.effective_runs() {
            Some(runs) => summary.push_str(&format!("  Runs: {}\n", runs)),
            None => summary.push_str("  Runs: default\n"),
        }
        summary.push_str(&format!("  Test mode: {}\n", self.test));
        summary.push_str(&format!("  Headless: {}\n", self.headless));
        summary.push_str(&format!("  Colored output: {}\n", self.use_colors()));
        summary.push_str(&format!("  Verbose mode: {}\n", self.verbose));
        summary.push_str(&format!("  Debug mode: {}\n", self.debug));

        if !self.servers.is_empty() {
            summary.push_str(&format!("  Servers: {}\n", self.servers.join(", ")));
        }

        summary
    }
}

/// Parse a positive round count
fn parse_runs(s: &str) -> Result<u32, String> {
    s.parse::<u32>()
        .map_err(|_| format!("Invalid run count: {}", s))
        .and_then(|runs| {
            if runs == 0 {
                Err("Run count must be greater than 0".to_string())
            } else if runs > crate::defaults::MAX_RUNS {
                Err(format!("Run count cannot exceed {}", crate::defaults::MAX_RUNS))
            } else {
                Ok(runs)
            }
        })
}

/// Parse duration from seconds string
fn parse_duration(s: &str) -> Result<u64, String> {
    if s.starts_with('+') || s.starts_with("0x") || s.starts_with("0X") {
        return Err(format!("Invalid duration: {}", s));
    }

    s.parse::<u64>()
        .map_err(|_| format!("Invalid duration: {}", s))
        .and_then(|secs| {
            if secs == 0 {
                Err("Duration must be greater than 0".to_string())
            } else if secs > 600 {
                Err("Duration cannot exceed 600 seconds".to_string())
            } else {
                Ok(secs)
            }
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
