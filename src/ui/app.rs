//! Session state owned by the UI task

use super::chart::ChartData;
use crate::{
    logging::Logger,
    models::{Config, RunSequence, SessionOutcome, SessionState},
    provider::MeasurementProvider,
    runner::{BenchmarkRunner, RunnerEvent, StopSignal},
    stats::SessionStats,
};
use chrono::Local;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;

/// Channel and task of a running session
pub struct Session {
    pub events: UnboundedReceiver<RunnerEvent>,
    pub handle: JoinHandle<RunSequence>,
}

/// Everything the renderer reads
pub struct App {
    config: Config,
    provider: Arc<dyn MeasurementProvider>,
    logger: Logger,
    state: SessionState,
    log: Vec<String>,
    samples: RunSequence,
    stats: SessionStats,
    chart: ChartData,
    progress: u32,
    status: String,
    stop: StopSignal,
    outcome: Option<SessionOutcome>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, provider: Arc<dyn MeasurementProvider>, logger: Logger) -> Self {
        Self {
            config,
            provider,
            logger: logger.named("UI"),
            state: SessionState::Idle,
            log: Vec::new(),
            samples: RunSequence::new(),
            stats: SessionStats::default(),
            chart: ChartData::default(),
            progress: 0,
            status: "Ready".to_string(),
            stop: StopSignal::new(),
            outcome: None,
            should_quit: false,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn can_start(&self) -> bool {
        self.state.can_start()
    }

    pub fn can_stop(&self) -> bool {
        self.state.can_stop()
    }

    pub fn start_label(&self) -> String {
        self.config.start_label()
    }

    pub fn total_runs(&self) -> u32 {
        self.config.runs
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log
    }

    pub fn samples(&self) -> &RunSequence {
        &self.samples
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn chart(&self) -> &ChartData {
        &self.chart
    }

    pub fn progress(&self) -> u32 {
        self.progress
    }

    /// Completed fraction for the progress gauge
    pub fn progress_ratio(&self) -> f64 {
        if self.config.runs == 0 {
            return 0.0;
        }
        (self.progress as f64 / self.config.runs as f64).clamp(0.0, 1.0)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Reset the display and launch a runner; `None` when Start is disabled
    pub fn start(&mut self) -> Option<Session> {
        if !self.can_start() {
            return None;
        }

        self.log.clear();
        self.samples.clear();
        self.stats = SessionStats::default();
        self.chart = ChartData::default();
        self.progress = 0;
        self.outcome = None;
        self.status = "Running...".to_string();
        self.state = SessionState::Running;
        self.stop = StopSignal::new();

        let (tx, rx) = mpsc::unbounded_channel();
        let runner = BenchmarkRunner::new(
            Arc::clone(&self.provider),
            self.config.runs,
            self.logger.clone(),
        );
        let handle = runner.spawn(tx, self.stop.clone());

        Some(Session { events: rx, handle })
    }

    /// Ask the runner to finish at its next safe point
    pub fn stop(&mut self) {
        if !self.can_stop() {
            return;
        }

        self.stop.raise();
        self.status = "Stopping...".to_string();
        self.push_log("Stopping benchmark requested...");
        self.state = SessionState::Stopping;
    }

    /// Leave the event loop; a live session is told to stop
    pub fn quit(&mut self) {
        if self.state.is_active() {
            self.stop.raise();
        }
        self.should_quit = true;
    }

    pub fn apply_event(&mut self, event: RunnerEvent) {
        match event {
            RunnerEvent::Log(line) => self.push_log(&line),
            RunnerEvent::Status(status) => {
                // A stop request keeps its status until the session ends
                if self.state == SessionState::Running {
                    self.status = status;
                }
            }
            RunnerEvent::Progress(round) => self.progress = round,
            RunnerEvent::StatsUpdated(stats) => self.stats = stats,
            RunnerEvent::ChartUpdated(samples) => {
                self.chart = ChartData::from_samples(&samples);
                self.samples = samples;
            }
            // Stats and chart arrive as their own events just before this one
            RunnerEvent::Finished { outcome, samples } => {
                self.samples = samples;
                self.outcome = Some(outcome);
                self.state = SessionState::Finished;
                self.status = "Finished".to_string();
                self.push_log("Benchmark finished.");
            }
        }
    }

    fn push_log(&mut self, message: &str) {
        self.log
            .push(format!("[{}] {}", Local::now().format("%H:%M:%S"), message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sample;
    use crate::runner::testing::{drain, ScriptedProvider};

    fn app_with(provider: ScriptedProvider, runs: u32) -> App {
        let config = Config {
            runs,
            ..Config::default()
        };
        App::new(config, Arc::new(provider), Logger::new("TEST"))
    }

    fn ok_provider(rounds: usize) -> ScriptedProvider {
        ScriptedProvider::new()
            .downloads((0..rounds).map(|i| Ok((i + 1) as f64 * 1e6)).collect())
            .uploads((0..rounds).map(|_| Ok(1e6)).collect())
    }

    async fn run_to_end(app: &mut App, session: Session) {
        let Session { mut events, handle } = session;
        handle.await.unwrap();
        for event in drain(&mut events) {
            app.apply_event(event);
        }
    }

    fn has_line(app: &App, text: &str) -> bool {
        app.log_lines().iter().any(|l| l.ends_with(text))
    }

    #[tokio::test]
    async fn test_control_availability_follows_state() {
        let mut app = app_with(ok_provider(1), 1);
        assert!(app.can_start());
        assert!(!app.can_stop());

        let session = app.start().unwrap();
        assert_eq!(app.state(), SessionState::Running);
        assert!(!app.can_start());
        assert!(app.can_stop());
        assert!(app.start().is_none());

        app.stop();
        assert_eq!(app.state(), SessionState::Stopping);
        assert!(!app.can_start());
        assert!(!app.can_stop());

        run_to_end(&mut app, session).await;
        assert_eq!(app.state(), SessionState::Finished);
        assert!(app.can_start());
        assert!(!app.can_stop());
    }

    #[tokio::test]
    async fn test_full_session_updates_display() {
        let mut app = app_with(ok_provider(3), 3);

        let session = app.start().unwrap();
        assert_eq!(app.status(), "Running...");
        run_to_end(&mut app, session).await;

        assert_eq!(app.samples().len(), 3);
        assert_eq!(app.progress(), 3);
        assert_eq!(app.progress_ratio(), 1.0);
        assert_eq!(app.status(), "Finished");
        assert_eq!(app.outcome(), Some(SessionOutcome::Completed));
        assert_eq!(app.chart().download.len(), 3);
        assert_eq!(app.stats().display_rows()[0].1, "3.00");
        assert!(has_line(&app, "Benchmark finished."));
        assert!(app.log_lines()[0].starts_with('['));
    }

    #[tokio::test]
    async fn test_restart_clears_previous_session() {
        let provider = ScriptedProvider::new()
            .downloads(vec![Ok(9e6), Ok(9e6), Ok(1e6)])
            .uploads(vec![Ok(9e6), Ok(9e6)]);
        let mut app = app_with(provider, 2);

        let session = app.start().unwrap();
        run_to_end(&mut app, session).await;
        assert_eq!(app.samples().len(), 2);

        let session = app.start().unwrap();
        assert!(app.log_lines().is_empty());
        assert!(app.samples().is_empty());
        assert!(app.chart().is_empty());
        assert_eq!(app.progress(), 0);
        assert!(app.stats().display_rows().iter().all(|(_, d, u)| d == "-" && u == "-"));

        run_to_end(&mut app, session).await;
        assert!(app.samples().is_empty());
        assert_eq!(app.stats().display_rows()[2].1, "-");
    }

    #[tokio::test]
    async fn test_stop_is_ignored_unless_running() {
        let mut app = app_with(ok_provider(1), 1);
        app.stop();
        assert_eq!(app.state(), SessionState::Idle);
        assert!(app.log_lines().is_empty());
    }

    #[tokio::test]
    async fn test_stop_keeps_status_until_finished() {
        let mut app = app_with(ok_provider(1), 1);
        let _session = app.start().unwrap();

        app.stop();
        assert_eq!(app.status(), "Stopping...");
        assert!(has_line(&app, "Stopping benchmark requested..."));

        app.apply_event(RunnerEvent::Status("Running Test 1/1...".to_string()));
        assert_eq!(app.status(), "Stopping...");

        app.apply_event(RunnerEvent::Finished {
            outcome: SessionOutcome::Stopped,
            samples: vec![Sample {
                download_mbps: 1.0,
                upload_mbps: 2.0,
            }],
        });
        assert_eq!(app.status(), "Finished");
        assert_eq!(app.state(), SessionState::Finished);
        assert_eq!(app.samples().len(), 1);
    }

    #[tokio::test]
    async fn test_snapshots_update_display_before_finished() {
        let mut app = app_with(ok_provider(2), 2);
        let _session = app.start().unwrap();

        let first = vec![Sample {
            download_mbps: 12.5,
            upload_mbps: 3.0,
        }];
        app.apply_event(RunnerEvent::Progress(1));
        app.apply_event(RunnerEvent::StatsUpdated(SessionStats::from_samples(&first)));
        app.apply_event(RunnerEvent::ChartUpdated(first.clone()));

        assert_eq!(app.state(), SessionState::Running);
        assert_eq!(app.progress_ratio(), 0.5);
        let rows = app.stats().display_rows();
        assert_eq!(rows[0], ("Highest", "12.50".to_string(), "3.00".to_string()));
        assert_eq!(rows[2].1, "12.50");
        assert_eq!(app.chart().download.len(), 1);
        assert_eq!(app.samples(), &first);
        assert!(app.outcome().is_none());
    }

    #[tokio::test]
    async fn test_quit_only_stops_live_session() {
        let mut idle = app_with(ok_provider(1), 1);
        idle.quit();
        assert!(idle.should_quit());
        assert!(!idle.stop.is_raised());

        let mut running = app_with(ok_provider(1), 1);
        let _session = running.start().unwrap();
        running.quit();
        assert!(running.should_quit());
        assert!(running.stop.is_raised());
    }

    #[test]
    fn test_start_label() {
        let provider: Arc<dyn MeasurementProvider> = Arc::new(ScriptedProvider::new());
        let app = App::new(Config::default(), Arc::clone(&provider), Logger::new("TEST"));
        assert_eq!(app.start_label(), "Start Benchmark (20 Runs)");

        let test_config = Config {
            runs: 1,
            test_mode: true,
            ..Config::default()
        };
        let app = App::new(test_config, provider, Logger::new("TEST"));
        assert_eq!(app.start_label(), "Start Benchmark (Test Mode)");
    }
}
