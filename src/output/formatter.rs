//! Core formatting trait and the plain text implementation

use crate::{
    error::{AppError, Result},
    models::{RunSequence, SessionOutcome},
    stats::SessionStats,
};
use std::fmt::Write as _;

/// Summary of a finished session as shown on the console
#[derive(Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub samples: RunSequence,
    pub outcome: Option<SessionOutcome>,
}

impl SessionReport {
    pub fn stats(&self) -> SessionStats {
        SessionStats::from_samples(&self.samples)
    }
}

/// Kind of console line, used for coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Info,
    Status,
    Result,
    Error,
}

impl LineKind {
    /// Classify a runner log line by its leading text
    pub fn classify(message: &str) -> Self {
        if message.starts_with("Error") {
            Self::Error
        } else if message.contains("Result:") {
            Self::Result
        } else {
            Self::Info
        }
    }
}

/// Main trait for console output formatting
pub trait OutputFormatter: Send + Sync {
    /// Format one timestamped session line
    fn format_line(&self, timestamp: &str, message: &str, kind: LineKind) -> String;

    /// Format a section header
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the end-of-session summary with the statistics table
    fn format_summary(&self, report: &SessionReport) -> Result<String>;
}

/// Header and rows of the statistics table
pub(crate) fn stats_table(stats: &SessionStats) -> (Vec<String>, Vec<Vec<String>>) {
    let headers = vec![
        String::new(),
        "Download (Mbps)".to_string(),
        "Upload (Mbps)".to_string(),
    ];
    let rows = stats
        .display_rows()
        .into_iter()
        .map(|(label, d, u)| vec![label.to_string(), d, u])
        .collect();
    (headers, rows)
}

/// Render a bordered table with left-aligned first column
pub(crate) fn create_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let columns = headers.len();
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .chain(std::iter::once(&headers[i]))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let border = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");
    let border = format!("+{}+", border);

    let line = |cells: &[String]| {
        let body = cells
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, w))| {
                if i == 0 {
                    format!(" {:<width$} ", cell, width = w)
                } else {
                    format!(" {:>width$} ", cell, width = w)
                }
            })
            .collect::<Vec<_>>()
            .join("|");
        format!("|{}|", body)
    };

    let mut output = String::new();
    output.push_str(&border);
    output.push('\n');
    output.push_str(&line(headers));
    output.push('\n');
    output.push_str(&border);
    output.push('\n');
    for row in rows {
        output.push_str(&line(row));
        output.push('\n');
    }
    output.push_str(&border);
    output
}

/// Outcome line shared by both formatters
pub(crate) fn outcome_text(report: &SessionReport) -> String {
    let outcome = report
        .outcome
        .map(|o| o.description())
        .unwrap_or("not started");
    format!("{} ({} samples)", outcome, report.samples.len())
}

/// Plain text formatter without colors
pub struct PlainFormatter;

impl PlainFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_line(&self, timestamp: &str, message: &str, _kind: LineKind) -> String {
        format!("[{}] {}", timestamp, message)
    }

    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.len() + 4);

        writeln!(output, "{}", border)
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        writeln!(output, "  {}  ", title)
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        write!(output, "{}", border)
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;

        Ok(output)
    }

    fn format_summary(&self, report: &SessionReport) -> Result<String> {
        let mut output = self.format_header("Benchmark Summary")?;
        let (headers, rows) = stats_table(&report.stats());

        writeln!(output)
            .and_then(|_| writeln!(output, "Outcome: {}", outcome_text(report)))
            .and_then(|_| writeln!(output, "{}", create_table(&headers, &rows)))
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;

        Ok(output)
    }
}
