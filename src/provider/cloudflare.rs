//! Cloudflare-style speed test endpoints over HTTP
//!
//! Servers expose `/cdn-cgi/trace` (key=value site information),
//! `/__down?bytes=N` (returns N bytes) and `/__up` (accepts a POST body).

use super::{throughput_bps, MeasurementProvider, ServerInfo};
use crate::{
    error::{AppError, Result},
    models::Config,
};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Instant;

/// Probes per candidate when picking the best server
const LATENCY_PROBES: usize = 3;

/// Provider backed by Cloudflare speed-test compatible servers
pub struct CloudflareProvider {
    client: Client,
    candidates: Vec<String>,
    download_bytes: u64,
    upload_bytes: u64,
}

impl CloudflareProvider {
    /// Build a provider from the application configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(format!("{}/{}", crate::PKG_NAME, crate::VERSION))
            .build()?;

        Ok(Self {
            client,
            candidates: config
                .servers
                .iter()
                .map(|s| s.trim_end_matches('/').to_string())
                .collect(),
            download_bytes: config.download_bytes,
            upload_bytes: config.upload_bytes,
        })
    }

    /// Fetch the trace document of one candidate and time the round trip
    async fn probe(&self, base_url: &str) -> Result<ServerInfo> {
        let url = format!("{}/cdn-cgi/trace", base_url);
        let mut best_ms = f64::INFINITY;
        let mut trace = HashMap::new();

        for _ in 0..LATENCY_PROBES {
            let start = Instant::now();
            let response = self.client.get(&url).send().await?;
            let status = response.status();
            let body = response.text().await?;
            let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

            if !status.is_success() {
                return Err(AppError::http_request(format!("{} returned HTTP {}", url, status)));
            }

            best_ms = best_ms.min(elapsed_ms);
            trace = parse_trace(&body);
        }

        let fallback_host = url::Url::parse(base_url)?
            .host_str()
            .unwrap_or(base_url)
            .to_string();

        Ok(ServerInfo {
            base_url: base_url.to_string(),
            host: trace.remove("h").unwrap_or(fallback_host),
            name: trace.remove("colo").unwrap_or_else(|| "unknown".to_string()),
            country: trace.remove("loc").unwrap_or_else(|| "unknown".to_string()),
            latency_ms: best_ms,
        })
    }
}

#[async_trait]
impl MeasurementProvider for CloudflareProvider {
    async fn find_best_server(&self) -> Result<ServerInfo> {
        let mut best: Option<ServerInfo> = None;
        let mut last_error = None;

        for candidate in &self.candidates {
            match self.probe(candidate).await {
                Ok(info) => {
                    let better = best
                        .as_ref()
                        .map_or(true, |current| info.latency_ms < current.latency_ms);
                    if better {
                        best = Some(info);
                    }
                }
                Err(e) => last_error = Some(e),
            }
        }

        best.ok_or_else(|| {
            let reason = last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no candidate servers configured".to_string());
            AppError::server_selection(format!("no server responded: {}", reason))
        })
    }

    async fn measure_download(&self, server: &ServerInfo) -> Result<f64> {
        let url = format!("{}/__down?bytes={}", server.base_url, self.download_bytes);

        let start = Instant::now();
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::http_request(format!("download returned HTTP {}", status)));
        }

        let mut received: u64 = 0;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            received += chunk?.len() as u64;
        }

        throughput_bps(received, start.elapsed())
    }

    async fn measure_upload(&self, server: &ServerInfo) -> Result<f64> {
        let url = format!("{}/__up", server.base_url);
        let payload = vec![0u8; self.upload_bytes as usize];

        let start = Instant::now();
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(payload)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::http_request(format!("upload returned HTTP {}", status)));
        }
        let elapsed = start.elapsed();

        throughput_bps(self.upload_bytes, elapsed)
    }

    fn name(&self) -> &str {
        "cloudflare"
    }
}

/// Parse `key=value` lines of a trace document
pub fn parse_trace(body: &str) -> HashMap<String, String> {
    body.lines()
        .filter_map(|line| line.split_once('='))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .collect()
}
