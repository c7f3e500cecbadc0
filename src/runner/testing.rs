//! Scripted provider for runner and UI tests

use super::{RunnerEvent, StopSignal};
use crate::{
    error::{AppError, Result},
    provider::{MeasurementProvider, ServerInfo},
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;

/// Returns queued results in call order; an empty queue is an error
pub(crate) struct ScriptedProvider {
    server_available: bool,
    downloads: Mutex<VecDeque<Result<f64>>>,
    uploads: Mutex<VecDeque<Result<f64>>>,
    download_calls: Mutex<u32>,
    raise_on_download: Option<(u32, StopSignal)>,
}

impl ScriptedProvider {
    pub(crate) fn new() -> Self {
        Self {
            server_available: true,
            downloads: Mutex::new(VecDeque::new()),
            uploads: Mutex::new(VecDeque::new()),
            download_calls: Mutex::new(0),
            raise_on_download: None,
        }
    }

    pub(crate) fn server_unavailable(mut self) -> Self {
        self.server_available = false;
        self
    }

    pub(crate) fn downloads(self, results: Vec<Result<f64>>) -> Self {
        *self.downloads.lock().unwrap() = results.into();
        self
    }

    pub(crate) fn uploads(self, results: Vec<Result<f64>>) -> Self {
        *self.uploads.lock().unwrap() = results.into();
        self
    }

    /// Raise `stop` while the given (1-based) download call is in flight
    pub(crate) fn raise_on_download(mut self, call: u32, stop: StopSignal) -> Self {
        self.raise_on_download = Some((call, stop));
        self
    }
}

#[async_trait]
impl MeasurementProvider for ScriptedProvider {
    async fn find_best_server(&self) -> Result<ServerInfo> {
        if !self.server_available {
            return Err(AppError::server_selection("no server responded"));
        }

        Ok(ServerInfo {
            base_url: "http://test.example".to_string(),
            host: "test.example".to_string(),
            name: "TST".to_string(),
            country: "ZZ".to_string(),
            latency_ms: 1.0,
        })
    }

    async fn measure_download(&self, _server: &ServerInfo) -> Result<f64> {
        let call = {
            let mut calls = self.download_calls.lock().unwrap();
            *calls += 1;
            *calls
        };
        if let Some((at, stop)) = &self.raise_on_download {
            if *at == call {
                stop.raise();
            }
        }

        self.downloads
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::internal("download script exhausted")))
    }

    async fn measure_upload(&self, _server: &ServerInfo) -> Result<f64> {
        self.uploads
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::internal("upload script exhausted")))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Collect everything queued on a receiver whose sender is gone
pub(crate) fn drain(rx: &mut UnboundedReceiver<RunnerEvent>) -> Vec<RunnerEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
