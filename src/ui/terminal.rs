//! Terminal setup and the UI event loop

use super::app::{App, Session};
use super::render;
use crate::{
    defaults::AUTO_START_DELAY,
    error::{ErrorContext, Result},
    output::SessionReport,
    runner::RunnerEvent,
};
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Restores the terminal even when the loop bails out with an error
struct TerminalGuard {
    terminal: Tui,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout)).context("create terminal")?;
        terminal.clear().context("clear terminal")?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Run the interactive UI until the user quits; reports the last session
pub async fn run(mut app: App, auto_start: bool) -> Result<SessionReport> {
    let mut guard = TerminalGuard::enter()?;

    let mut keys = EventStream::new();
    let mut tick = tokio::time::interval(TICK);
    let auto_start_timer = tokio::time::sleep(AUTO_START_DELAY);
    tokio::pin!(auto_start_timer);
    let mut auto_start_pending = auto_start;
    let mut session: Option<Session> = None;

    while !app.should_quit() {
        tokio::select! {
            _ = tick.tick() => {
                guard
                    .terminal
                    .draw(|f| render::draw(f, &app))
                    .context("draw frame")?;
            }
            _ = &mut auto_start_timer, if auto_start_pending => {
                auto_start_pending = false;
                if let Some(started) = app.start() {
                    session = Some(started);
                }
            }
            maybe_key = keys.next() => {
                let Some(Ok(Event::Key(key))) = maybe_key else { continue };
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match (key.modifiers, key.code) {
                    (_, KeyCode::Char('q')) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => app.quit(),
                    (_, KeyCode::Char('s')) | (_, KeyCode::Enter) => {
                        if let Some(started) = app.start() {
                            auto_start_pending = false;
                            session = Some(started);
                        }
                    }
                    (_, KeyCode::Char('x')) | (_, KeyCode::Esc) => app.stop(),
                    _ => {}
                }
            }
            maybe_event = next_runner_event(&mut session) => {
                match maybe_event {
                    Some(event) => app.apply_event(event),
                    // Runner task is done and its sender dropped
                    None => session = None,
                }
            }
        }
    }

    // An in-flight transfer is not worth waiting for once the user has left
    if let Some(active) = session.take() {
        active.handle.abort();
    }

    drop(guard);

    Ok(SessionReport {
        samples: app.samples().clone(),
        outcome: app.outcome(),
    })
}

async fn next_runner_event(session: &mut Option<Session>) -> Option<RunnerEvent> {
    match session {
        Some(active) => active.events.recv().await,
        None => std::future::pending().await,
    }
}
