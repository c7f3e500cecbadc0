//! Benchmark runner
//!
//! Runs the configured number of rounds strictly one after another on a
//! spawned task. Every observable step is sent to the UI as a [`RunnerEvent`]
//! over a single unbounded channel, so the UI sees events in program order.
//! The runner owns the run sequence; the UI only receives cloned snapshots.

#[cfg(test)]
pub(crate) mod testing;

use crate::{
    error::AppError,
    logging::Logger,
    models::{
        sample::{format_mbps, Sample},
        RunSequence, SessionOutcome,
    },
    provider::{MeasurementProvider, ServerInfo},
    stats::SessionStats,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Events sent from the runner to whoever displays the session
#[derive(Debug, Clone, PartialEq)]
pub enum RunnerEvent {
    /// Line for the session log
    Log(String),
    /// Replacement status text
    Status(String),
    /// Index of the last successfully completed round
    Progress(u32),
    /// Statistics recomputed over the current run sequence
    StatsUpdated(SessionStats),
    /// Snapshot of the run sequence for the chart
    ChartUpdated(RunSequence),
    /// Session is over; no further events follow
    Finished {
        outcome: SessionOutcome,
        samples: RunSequence,
    },
}

/// Cooperative cancellation flag shared between UI and runner
///
/// The runner only checks it at round boundaries and between the download
/// and upload calls; an in-flight measurement always runs to completion.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

enum RoundResult {
    Completed(Sample),
    Failed,
    Interrupted,
}

/// Orchestrates sequential measurement rounds against one provider
pub struct BenchmarkRunner {
    provider: Arc<dyn MeasurementProvider>,
    rounds: u32,
    logger: Logger,
}

impl BenchmarkRunner {
    pub fn new(provider: Arc<dyn MeasurementProvider>, rounds: u32, logger: Logger) -> Self {
        Self {
            provider,
            rounds,
            logger: logger.named("RUNNER"),
        }
    }

    /// Configured round count
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Run the session on its own task
    pub fn spawn(self, events: UnboundedSender<RunnerEvent>, stop: StopSignal) -> JoinHandle<RunSequence> {
        tokio::spawn(async move { self.run(&events, &stop).await })
    }

    /// Run a full session and return the final run sequence
    pub async fn run(&self, events: &UnboundedSender<RunnerEvent>, stop: &StopSignal) -> RunSequence {
        let mut samples = RunSequence::with_capacity(self.rounds as usize);
        let session_id = self.logger.new_session().await;

        self.logger
            .info("Benchmark session started")
            .field("session", &session_id)
            .field("provider", self.provider.name())
            .field("rounds", self.rounds)
            .log()
            .await;

        emit(events, RunnerEvent::Log("Getting best server...".to_string()));
        let server = match self.provider.find_best_server().await {
            Ok(server) => {
                emit(events, RunnerEvent::Log(format!("Found best server: {}", server.describe())));
                self.logger
                    .info("Server selected")
                    .field("base_url", &server.base_url)
                    .field("latency_ms", server.latency_ms)
                    .log()
                    .await;
                server
            }
            Err(e) => {
                emit(events, RunnerEvent::Log(format!("Error finding server: {}", e)));
                self.logger.error("Server selection failed").error_info(&e).log().await;
                emit(
                    events,
                    RunnerEvent::Finished {
                        outcome: SessionOutcome::ServerUnavailable,
                        samples: samples.clone(),
                    },
                );
                return samples;
            }
        };

        let mut outcome = SessionOutcome::Completed;
        for round in 1..=self.rounds {
            if stop.is_raised() {
                outcome = SessionOutcome::Stopped;
                break;
            }

            emit(events, RunnerEvent::Status(format!("Running Test {}/{}...", round, self.rounds)));

            match self.run_round(round, &server, events, stop).await {
                RoundResult::Completed(sample) => {
                    samples.push(sample);
                    emit(
                        events,
                        RunnerEvent::Log(format!(
                            "Run {} Result: D={} Mbps, U={} Mbps",
                            round,
                            format_mbps(sample.download_mbps),
                            format_mbps(sample.upload_mbps)
                        )),
                    );
                    emit(events, RunnerEvent::Progress(round));
                    emit(events, RunnerEvent::StatsUpdated(SessionStats::from_samples(&samples)));
                    emit(events, RunnerEvent::ChartUpdated(samples.clone()));
                }
                RoundResult::Failed => continue,
                RoundResult::Interrupted => {
                    outcome = SessionOutcome::Stopped;
                    break;
                }
            }
        }

        if outcome == SessionOutcome::Stopped {
            emit(
                events,
                RunnerEvent::Log(format!(
                    "Benchmark stopped after {} completed rounds",
                    samples.len()
                )),
            );
        }

        self.logger
            .info("Benchmark session finished")
            .field("outcome", outcome.description())
            .field("samples", samples.len())
            .log()
            .await;

        emit(events, RunnerEvent::StatsUpdated(SessionStats::from_samples(&samples)));
        emit(events, RunnerEvent::ChartUpdated(samples.clone()));
        emit(
            events,
            RunnerEvent::Finished {
                outcome,
                samples: samples.clone(),
            },
        );

        samples
    }

    async fn run_round(
        &self,
        round: u32,
        server: &ServerInfo,
        events: &UnboundedSender<RunnerEvent>,
        stop: &StopSignal,
    ) -> RoundResult {
        emit(events, RunnerEvent::Log(format!("Run {}: Testing Download...", round)));
        let started = Instant::now();
        let download_bps = match self.provider.measure_download(server).await {
            Ok(bps) => bps,
            Err(e) => {
                self.round_failed(round, "download", &e, None, events).await;
                return RoundResult::Failed;
            }
        };
        self.log_measurement(round, "download", download_bps, started).await;

        if stop.is_raised() {
            return RoundResult::Interrupted;
        }

        emit(events, RunnerEvent::Log(format!("Run {}: Testing Upload...", round)));
        let started = Instant::now();
        let upload_bps = match self.provider.measure_upload(server).await {
            Ok(bps) => bps,
            Err(e) => {
                let sample = Sample::from_bps(download_bps, 0.0);
                self.round_failed(round, "upload", &e, Some(sample.download_mbps), events)
                    .await;
                return RoundResult::Failed;
            }
        };
        self.log_measurement(round, "upload", upload_bps, started).await;

        RoundResult::Completed(Sample::from_bps(download_bps, upload_bps))
    }

    /// One log line per failed round; a measured download is named, not kept
    async fn round_failed(
        &self,
        round: u32,
        direction: &str,
        error: &AppError,
        discarded_download_mbps: Option<f64>,
        events: &UnboundedSender<RunnerEvent>,
    ) {
        let mut line = format!("Error in run {}: {}", round, error);
        if let Some(mbps) = discarded_download_mbps {
            line.push_str(&format!(" (discarded download of {} Mbps)", format_mbps(mbps)));
        }
        emit(events, RunnerEvent::Log(line));

        self.logger
            .warn("Round failed")
            .field("round", round)
            .field("direction", direction)
            .error_info(error)
            .log()
            .await;
    }

    async fn log_measurement(&self, round: u32, direction: &str, bps: f64, started: Instant) {
        self.logger
            .debug("Measurement complete")
            .field("round", round)
            .field("direction", direction)
            .field("mbps", bps / crate::models::sample::BITS_PER_MEGABIT)
            .field("elapsed_ms", started.elapsed().as_millis() as u64)
            .log()
            .await;
    }
}

// A closed receiver means the UI has gone away; the runner keeps going to the
// next safe point and its events are dropped.
fn emit(events: &UnboundedSender<RunnerEvent>, event: RunnerEvent) {
    let _ = events.send(event);
}
