//! Network Benchmark - Main CLI Application
//!
//! Repeatedly measures download and upload throughput and shows the results
//! in a terminal UI, or as plain console lines with `--headless`.

use clap::Parser;
use network_benchmark::{
    cli::Cli,
    config::{display_config_summary, load_config, EnvManager},
    error::Result,
    logging::Logger,
    output::{print_summary, session_result, HeadlessReporter, OutputFormatterFactory},
    provider::{CloudflareProvider, MeasurementProvider},
    runner::{BenchmarkRunner, StopSignal},
    ui::{self, App},
    BUILD_TIME, GIT_COMMIT, PKG_DESCRIPTION, PKG_NAME, TARGET_TRIPLE, VERSION,
};
use std::io;
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Leave raw mode before reporting a panic, or the message is unreadable
    std::panic::set_hook(Box::new(|panic_info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
        eprintln!("Application panic: {}", panic_info);
        process::exit(1);
    }));

    let cli = Cli::parse();
    let use_color = cli.use_colors();

    if let Err(e) = run_application(cli).await {
        eprintln!("{}", e.format_for_console(use_color));
        eprintln!();
        eprintln!("{}", e.user_friendly_message());
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    if cli.debug {
        eprintln!("{} v{} - {}", PKG_NAME, VERSION, PKG_DESCRIPTION);
        eprintln!(
            "Built {} for {} (commit {})",
            BUILD_TIME,
            TARGET_TRIPLE,
            GIT_COMMIT.unwrap_or("unknown")
        );
        eprintln!("{}", cli.get_config_summary());
    }

    let config = load_config(cli)?;
    if !config.enable_color {
        colored::control::set_override(false);
    }

    let logger = Logger::with_config("MAIN", &config);

    if config.debug {
        eprintln!("Configuration loaded successfully:");
        eprintln!("{}", display_config_summary(&config));
        let checked = EnvManager::validate_current_env()?;
        if !checked.is_empty() {
            eprintln!("Environment overrides: {}", checked.join(", "));
        }
        eprintln!();
    }

    let provider: Arc<dyn MeasurementProvider> = Arc::new(CloudflareProvider::from_config(&config)?);

    logger
        .info("Starting benchmark")
        .field("runs", config.runs)
        .field("headless", config.headless)
        .field("servers", &config.servers)
        .log()
        .await;

    let report = if config.headless {
        let runner = BenchmarkRunner::new(provider, config.runs, logger.clone());
        let formatter = OutputFormatterFactory::create_formatter(config.enable_color);
        HeadlessReporter::new(io::stdout(), formatter)
            .run(runner, StopSignal::new())
            .await?
    } else {
        let app = App::new(config.clone(), provider, logger.clone());
        let result = ui::run(app, config.auto_start).await;
        // Entries held back while the UI owned the screen
        logger.flush_buffer().await;
        result?
    };

    let formatter = OutputFormatterFactory::create_formatter(config.enable_color);
    print_summary(&mut io::stdout(), formatter.as_ref(), &report)?;

    session_result(&report)
}
