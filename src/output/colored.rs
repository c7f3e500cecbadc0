//! Colored formatter implementation with terminal color support

use super::formatter::{
    create_table, outcome_text, stats_table, LineKind, OutputFormatter, SessionReport,
};
use crate::{
    error::{AppError, Result},
    models::SessionOutcome,
};
use colored::*;
use std::fmt::Write as _;

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            muted: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    pub fn new() -> Self {
        Self::with_scheme(ColorScheme::default())
    }

    pub fn with_scheme(color_scheme: ColorScheme) -> Self {
        Self { color_scheme }
    }

    fn outcome_color(&self, outcome: Option<SessionOutcome>) -> Color {
        match outcome {
            Some(SessionOutcome::Completed) => self.color_scheme.success,
            Some(SessionOutcome::Stopped) => self.color_scheme.warning,
            Some(SessionOutcome::ServerUnavailable) => self.color_scheme.error,
            None => self.color_scheme.muted,
        }
    }
}

impl Default for ColoredFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_line(&self, timestamp: &str, message: &str, kind: LineKind) -> String {
        let stamp = format!("[{}]", timestamp).color(self.color_scheme.muted);
        let body = match kind {
            LineKind::Info => message.normal(),
            LineKind::Status => message.color(self.color_scheme.info),
            LineKind::Result => message.color(self.color_scheme.success),
            LineKind::Error => message.color(self.color_scheme.error).bold(),
        };
        format!("{} {}", stamp, body)
    }

    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "═".repeat(title.chars().count() + 4);

        writeln!(output, "{}", border.color(self.color_scheme.muted))
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        writeln!(output, "  {}  ", title.bold().color(self.color_scheme.header))
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;
        write!(output, "{}", border.color(self.color_scheme.muted))
            .map_err(|e| AppError::io(format!("Failed to format header: {}", e)))?;

        Ok(output)
    }

    fn format_summary(&self, report: &SessionReport) -> Result<String> {
        let mut output = self.format_header("Benchmark Summary")?;
        let (headers, rows) = stats_table(&report.stats());
        let table = create_table(&headers, &rows);

        writeln!(output)
            .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        writeln!(
            output,
            "Outcome: {}",
            outcome_text(report).color(self.outcome_color(report.outcome))
        )
        .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;

        // Color whole lines so column widths stay intact
        for (i, line) in table.lines().enumerate() {
            let styled = if line.starts_with('+') {
                line.color(self.color_scheme.muted)
            } else if i == 1 {
                line.bold()
            } else {
                line.normal()
            };
            writeln!(output, "{}", styled)
                .map_err(|e| AppError::io(format!("Failed to format summary: {}", e)))?;
        }

        Ok(output)
    }
}
