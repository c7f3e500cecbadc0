//! Console output for headless sessions and end-of-session summaries
//!
//! Runner events become timestamped lines on stdout. The summary table is
//! printed once a session ends, in either UI mode.

mod colored;
mod formatter;

pub use self::colored::{ColorScheme, ColoredFormatter};
pub use formatter::{LineKind, OutputFormatter, PlainFormatter, SessionReport};

use crate::{
    error::{AppError, Result},
    models::{RunSequence, SessionOutcome},
    runner::{BenchmarkRunner, RunnerEvent, StopSignal},
};
use chrono::Local;
use std::io::Write;
use tokio::sync::mpsc;

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color preference
    pub fn create_formatter(enable_color: bool) -> Box<dyn OutputFormatter> {
        if enable_color {
            Box::new(ColoredFormatter::new())
        } else {
            Box::new(PlainFormatter::new())
        }
    }
}

/// Prints runner events as they arrive
pub struct HeadlessReporter<W: Write> {
    out: W,
    formatter: Box<dyn OutputFormatter>,
    samples: RunSequence,
    outcome: Option<SessionOutcome>,
}

impl<W: Write> HeadlessReporter<W> {
    pub fn new(out: W, formatter: Box<dyn OutputFormatter>) -> Self {
        Self {
            out,
            formatter,
            samples: RunSequence::new(),
            outcome: None,
        }
    }

    /// Write one timestamped line
    pub fn line(&mut self, message: &str, kind: LineKind) -> Result<()> {
        let timestamp = Local::now().format("%H:%M:%S").to_string();
        let line = self.formatter.format_line(&timestamp, message, kind);
        writeln!(self.out, "{}", line)?;
        Ok(())
    }

    pub fn handle_event(&mut self, event: RunnerEvent) -> Result<()> {
        match event {
            RunnerEvent::Log(message) => {
                let kind = LineKind::classify(&message);
                self.line(&message, kind)
            }
            RunnerEvent::Status(status) => self.line(&status, LineKind::Status),
            RunnerEvent::ChartUpdated(samples) => {
                self.samples = samples;
                Ok(())
            }
            RunnerEvent::Finished { outcome, samples } => {
                self.samples = samples;
                self.outcome = Some(outcome);
                self.line("Benchmark finished.", LineKind::Info)
            }
            RunnerEvent::Progress(_) | RunnerEvent::StatsUpdated(_) => Ok(()),
        }
    }

    /// Drive a runner to completion; Ctrl-C raises the stop signal once
    pub async fn run(mut self, runner: BenchmarkRunner, stop: StopSignal) -> Result<SessionReport> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = runner.spawn(tx, stop.clone());

        // One listener for the whole session so no SIGINT falls between polls
        let interrupt = tokio::signal::ctrl_c();
        tokio::pin!(interrupt);

        let mut interrupt_armed = true;
        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Some(event) => self.handle_event(event)?,
                    None => break,
                },
                _ = &mut interrupt, if interrupt_armed => {
                    interrupt_armed = false;
                    stop.raise();
                    self.line("Stopping benchmark requested...", LineKind::Status)?;
                }
            }
        }

        let samples = handle
            .await
            .map_err(|e| AppError::internal(format!("benchmark task failed: {}", e)))?;
        self.samples = samples;
        self.out.flush()?;

        Ok(SessionReport {
            samples: self.samples,
            outcome: self.outcome,
        })
    }
}

/// Print the summary table for a finished session
pub fn print_summary<W: Write>(out: &mut W, formatter: &dyn OutputFormatter, report: &SessionReport) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", formatter.format_summary(report)?)?;
    Ok(())
}

/// Map a session report to the process result
///
/// A stopped session or one with at least one sample is a success.
pub fn session_result(report: &SessionReport) -> Result<()> {
    match report.outcome {
        Some(SessionOutcome::ServerUnavailable) => Err(AppError::server_selection(
            "no measurement server could be reached",
        )),
        Some(SessionOutcome::Stopped) => Ok(()),
        Some(SessionOutcome::Completed) if report.samples.is_empty() => Err(
            AppError::test_execution("every measurement round failed"),
        ),
        _ => Ok(()),
    }
}
