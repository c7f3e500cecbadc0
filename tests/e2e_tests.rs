//! End-to-end tests against a local mock speed-test server
//!
//! The mock serves the trace, download and upload endpoints so full
//! sessions run offline, both through the library and through the binary.

use assert_cmd::prelude::*;
use network_benchmark::{
    logging::Logger,
    output::{session_result, HeadlessReporter, PlainFormatter},
    BenchmarkRunner, CloudflareProvider, Config, SessionOutcome, StopSignal,
};
use predicates::prelude::*;
use std::process::Command;
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TRACE: &str = "fl=1\nh=speed.example.net\ncolo=AMS\nloc=NL\n";

async fn speed_server(upload_status: u16) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cdn-cgi/trace"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TRACE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/__down"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 8192]))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/__up"))
        .respond_with(ResponseTemplate::new(upload_status))
        .mount(&server)
        .await;

    server
}

fn config_for(server: &MockServer, runs: u32) -> Config {
    Config {
        runs,
        servers: vec![server.uri()],
        download_bytes: 8192,
        upload_bytes: 4096,
        timeout_seconds: 5,
        headless: true,
        enable_color: false,
        ..Config::default()
    }
}

#[tokio::test]
async fn test_library_session_collects_every_round() {
    let server = speed_server(200).await;
    let config = config_for(&server, 3);

    let provider = Arc::new(CloudflareProvider::from_config(&config).unwrap());
    let runner = BenchmarkRunner::new(provider, config.runs, Logger::new("E2E"));
    let report = HeadlessReporter::new(Vec::new(), Box::new(PlainFormatter::new()))
        .run(runner, StopSignal::new())
        .await
        .unwrap();

    assert_eq!(report.outcome, Some(SessionOutcome::Completed));
    assert_eq!(report.samples.len(), 3);
    assert!(report.samples.iter().all(|s| s.download_mbps > 0.0 && s.upload_mbps > 0.0));

    let stats = report.stats();
    let download = stats.download.unwrap();
    assert!(download.min <= download.mean && download.mean <= download.max);
    assert!(session_result(&report).is_ok());
}

#[tokio::test]
async fn test_library_session_with_failing_uploads() {
    let server = speed_server(500).await;
    let config = config_for(&server, 2);

    let provider = Arc::new(CloudflareProvider::from_config(&config).unwrap());
    let runner = BenchmarkRunner::new(provider, config.runs, Logger::new("E2E"));
    let report = HeadlessReporter::new(Vec::new(), Box::new(PlainFormatter::new()))
        .run(runner, StopSignal::new())
        .await
        .unwrap();

    assert_eq!(report.outcome, Some(SessionOutcome::Completed));
    assert!(report.samples.is_empty());
    assert_eq!(session_result(&report).unwrap_err().exit_code(), 6);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_headless_session() {
    let server = speed_server(200).await;
    let uri = server.uri();

    let assert = tokio::task::spawn_blocking(move || {
        let dir = TempDir::new().unwrap();
        Command::cargo_bin("netbench")
            .unwrap()
            .current_dir(dir.path())
            .env_remove("BENCH_RUNS")
            .env_remove("BENCH_SERVERS")
            .args([
                "--headless",
                "--no-color",
                "--runs",
                "2",
                "--download-bytes",
                "8192",
                "--upload-bytes",
                "4096",
                "--server",
                uri.as_str(),
            ])
            .assert()
    })
    .await
    .unwrap();

    assert
        .success()
        .stdout(predicate::str::contains(
            "Found best server: speed.example.net located in AMS, NL",
        ))
        .stdout(predicate::str::contains("Running Test 2/2..."))
        .stdout(predicate::str::contains("Run 2 Result: D="))
        .stdout(predicate::str::contains("Benchmark finished."))
        .stdout(predicate::str::contains("Benchmark Summary"))
        .stdout(predicate::str::contains("Outcome: completed (2 samples)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_binary_all_rounds_failing_exits_with_execution_code() {
    let server = speed_server(503).await;
    let uri = server.uri();

    let assert = tokio::task::spawn_blocking(move || {
        let dir = TempDir::new().unwrap();
        Command::cargo_bin("netbench")
            .unwrap()
            .current_dir(dir.path())
            .env_remove("BENCH_RUNS")
            .env_remove("BENCH_SERVERS")
            .args(["--headless", "--no-color", "--runs", "2", "--server", uri.as_str()])
            .assert()
    })
    .await
    .unwrap();

    assert
        .code(6)
        .stdout(predicate::str::contains("Error in run 1:"))
        .stdout(predicate::str::contains("discarded download of"))
        .stdout(predicate::str::contains("Error in run 2:"));
}

#[cfg(unix)]
#[tokio::test(flavor = "multi_thread")]
async fn test_binary_interrupt_stops_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cdn-cgi/trace"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TRACE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/__down"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(vec![0u8; 8192])
                .set_delay(std::time::Duration::from_millis(2500)),
        )
        .mount(&server)
        .await;
    let uri = server.uri();

    let output = tokio::task::spawn_blocking(move || {
        let dir = TempDir::new().unwrap();
        let child = Command::cargo_bin("netbench")
            .unwrap()
            .current_dir(dir.path())
            .env_remove("BENCH_RUNS")
            .env_remove("BENCH_SERVERS")
            .args(["--headless", "--no-color", "--runs", "5", "--server", uri.as_str()])
            .stdout(std::process::Stdio::piped())
            .spawn()
            .unwrap();

        // Land inside the first download
        std::thread::sleep(std::time::Duration::from_millis(1200));
        let status = Command::new("kill")
            .args(["-INT", &child.id().to_string()])
            .status()
            .unwrap();
        assert!(status.success());

        child.wait_with_output().unwrap()
    })
    .await
    .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout: {}", stdout);
    assert!(stdout.contains("Stopping benchmark requested..."));
    assert!(stdout.contains("Benchmark stopped after 0 completed rounds"));
    assert!(stdout.contains("Outcome: stopped (0 samples)"));
    assert!(!stdout.contains("Run 2:"));
}
