//! Configuration parsing from CLI arguments and environment variables

use crate::{cli::Cli, config::env::EnvManager, error::Result, models::Config};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<Config> {
        let mut config = Config::default();

        self.load_env_file()?;

        config.merge_from_env()?;

        self.apply_cli_overrides(&mut config);

        config.validate()?;

        Ok(config)
    }

    fn load_env_file(&self) -> Result<()> {
        EnvManager::load_env_file(self.cli.debug)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        if let Some(runs) = self.cli.runs {
            config.runs = runs;
        }

        // --test is applied after --runs so it always wins
        if self.cli.test {
            config.test_mode = true;
            config.auto_start = true;
            config.runs = 1;
        }

        if !self.cli.servers.is_empty() {
            config.servers = self.cli.servers.clone();
        }

        if let Some(bytes) = self.cli.download_bytes {
            config.download_bytes = bytes;
        }

        if let Some(bytes) = self.cli.upload_bytes {
            config.upload_bytes = bytes;
        }

        if let Some(timeout) = self.cli.timeout {
            config.timeout_seconds = timeout;
        }

        if self.cli.no_color {
            config.enable_color = false;
        }

        config.headless = self.cli.headless;
        config.verbose = self.cli.verbose;
        config.debug = self.cli.debug;

        if config.debug && config.headless {
            eprintln!("Applied CLI overrides to configuration");
            eprintln!(
                "Final config: runs={}, timeout={}s, servers={}",
                config.runs,
                config.timeout_seconds,
                config.servers.join(",")
            );
        }
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    let parser = ConfigParser::new(cli);
    parser.parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Runs: {}", config.runs));
    summary.push(format!("Test Mode: {}", config.test_mode));
    summary.push(format!("Servers: {}", config.servers.join(", ")));
    summary.push(format!("Download Bytes: {}", config.download_bytes));
    summary.push(format!("Upload Bytes: {}", config.upload_bytes));
    summary.push(format!("Timeout: {}s", config.timeout_seconds));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Headless: {}", config.headless));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
