//! Frame layout and widgets for the terminal UI
//!
//! Drawing only reads [`App`]; all state changes happen in the event loop.

use super::app::App;
use super::chart::{CHART_TITLE, X_AXIS_TITLE, Y_AXIS_TITLE};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Dataset, Gauge, GraphType, LegendPosition, Paragraph,
        Row, Table,
    },
    Frame,
};

const DOWNLOAD_COLOR: Color = Color::Green;
const UPLOAD_COLOR: Color = Color::Cyan;

pub fn draw(f: &mut Frame, app: &App) {
    let main = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Start / Stop
            Constraint::Length(3),  // Progress
            Constraint::Length(3),  // Status
            Constraint::Length(10), // Stats + log
            Constraint::Min(8),     // Chart
            Constraint::Length(1),  // Key help
        ])
        .split(f.area());

    draw_controls(f, main[0], app);
    draw_progress(f, main[1], app);
    draw_status(f, main[2], app);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(20)])
        .split(main[3]);
    draw_stats(f, middle[0], app);
    draw_log(f, middle[1], app);

    draw_chart(f, main[4], app);

    let help = Paragraph::new(Line::from(vec![
        Span::styled(" s/Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" start  "),
        Span::styled("x/Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" stop  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" quit"),
    ]));
    f.render_widget(help, main[5]);
}

fn button<'a>(label: String, key: &'a str, enabled: bool, color: Color) -> Paragraph<'a> {
    let style = if enabled {
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    Paragraph::new(Line::from(vec![
        Span::styled(format!("[{}] ", key), style),
        Span::styled(label, style),
    ]))
    .block(Block::default().borders(Borders::ALL).border_style(style))
}

fn draw_controls(f: &mut Frame, area: Rect, app: &App) {
    let row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    f.render_widget(button(app.start_label(), "s", app.can_start(), Color::Green), row[0]);
    f.render_widget(
        button("Stop Benchmark".to_string(), "x", app.can_stop(), Color::Red),
        row[1],
    );
}

fn draw_progress(f: &mut Frame, area: Rect, app: &App) {
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(Color::Blue))
        .ratio(app.progress_ratio())
        .label(format!("{}/{}", app.progress(), app.total_runs()));
    f.render_widget(gauge, area);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let status = Paragraph::new(app.status().to_string())
        .block(Block::default().borders(Borders::ALL).title("Status"));
    f.render_widget(status, area);
}

fn draw_stats(f: &mut Frame, area: Rect, app: &App) {
    let header = Row::new(vec![
        Cell::from(""),
        Cell::from("Download (Mbps)").style(Style::default().fg(DOWNLOAD_COLOR)),
        Cell::from("Upload (Mbps)").style(Style::default().fg(UPLOAD_COLOR)),
    ])
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = app
        .stats()
        .display_rows()
        .into_iter()
        .map(|(label, download, upload)| Row::new(vec![Cell::from(label), Cell::from(download), Cell::from(upload)]));

    let table = Table::new(
        rows,
        [Constraint::Length(8), Constraint::Length(16), Constraint::Length(14)],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title("Statistics"));
    f.render_widget(table, area);
}

fn draw_log(f: &mut Frame, area: Rect, app: &App) {
    // Follow the tail: show as many recent lines as fit inside the border
    let visible = area.height.saturating_sub(2) as usize;
    let lines = app.log_lines();
    let start = lines.len().saturating_sub(visible);

    let text: Vec<Line> = lines[start..]
        .iter()
        .map(|l| Line::from(l.as_str()))
        .collect();
    let log = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Log"));
    f.render_widget(log, area);
}

fn draw_chart(f: &mut Frame, area: Rect, app: &App) {
    let data = app.chart();

    let datasets = vec![
        Dataset::default()
            .name("Download")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(DOWNLOAD_COLOR))
            .data(&data.download),
        Dataset::default()
            .name("Upload")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(UPLOAD_COLOR))
            .data(&data.upload),
    ];

    let chart = Chart::new(datasets)
        .block(Block::default().borders(Borders::ALL).title(CHART_TITLE))
        .x_axis(
            Axis::default()
                .title(X_AXIS_TITLE)
                .bounds(data.x_bounds)
                .labels(data.x_labels().into_iter().map(Span::from).collect::<Vec<_>>()),
        )
        .y_axis(
            Axis::default()
                .title(Y_AXIS_TITLE)
                .bounds(data.y_bounds)
                .labels(data.y_labels().into_iter().map(Span::from).collect::<Vec<_>>()),
        )
        .legend_position(Some(LegendPosition::TopLeft))
        .hidden_legend_constraints((Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)));
    f.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Logger;
    use crate::models::Config;
    use crate::models::{Sample, SessionOutcome};
    use crate::runner::{testing::ScriptedProvider, RunnerEvent};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        App::new(Config::default(), Arc::new(ScriptedProvider::new()), Logger::new("TEST"))
    }

    #[test]
    fn test_idle_screen_shows_controls_and_empty_chart() {
        let screen = render(&app());
        assert!(screen.contains("Start Benchmark (20 Runs)"));
        assert!(screen.contains("Stop Benchmark"));
        assert!(screen.contains(CHART_TITLE));
        assert!(screen.contains("Highest"));
        assert!(screen.contains("0/20"));
    }

    #[test]
    fn test_finished_session_shows_stats_and_log() {
        let mut app = app();
        app.apply_event(RunnerEvent::Log("Run 1 Result: D=94.20 Mbps, U=11.00 Mbps".to_string()));
        app.apply_event(RunnerEvent::Finished {
            outcome: SessionOutcome::Completed,
            samples: vec![Sample {
                download_mbps: 94.2,
                upload_mbps: 11.0,
            }],
        });

        let screen = render(&app);
        assert!(screen.contains("94.20"));
        assert!(screen.contains("Benchmark finished."));
        assert!(screen.contains("Finished"));
    }
}
