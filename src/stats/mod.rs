//! Min/max/mean aggregation over throughput samples
//!
//! Statistics are recomputed from scratch on every update. Sessions hold at
//! most a few hundred samples, so there is no incremental state to keep in
//! sync with the run sequence.

use crate::{
    error::{AppError, Result},
    models::sample::{download_series, format_mbps, upload_series, Sample},
};
use serde::{Deserialize, Serialize};

/// Placeholder shown when a series has no data yet
pub const NO_DATA: &str = "-";

/// Summary of one series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Compute min, max and mean; an empty slice is a no-data error
pub fn aggregate(values: &[f64]) -> Result<Aggregate> {
    if values.is_empty() {
        return Err(AppError::statistics("no data"));
    }

    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mean = values.iter().sum::<f64>() / values.len() as f64;

    // Summation rounding can push the mean a hair outside [min, max]
    Ok(Aggregate {
        min,
        max,
        mean: mean.clamp(min, max),
    })
}

/// Download and upload aggregates for a session
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub download: Option<Aggregate>,
    pub upload: Option<Aggregate>,
    pub sample_count: usize,
}

impl SessionStats {
    /// Aggregate both columns of a run sequence
    pub fn from_samples(samples: &[Sample]) -> Self {
        Self {
            download: aggregate(&download_series(samples)).ok(),
            upload: aggregate(&upload_series(samples)).ok(),
            sample_count: samples.len(),
        }
    }

    /// No sample has been recorded
    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }

    /// Display rows as (label, download, upload), "-" when there is no data
    pub fn display_rows(&self) -> [(&'static str, String, String); 3] {
        let cell = |agg: Option<Aggregate>, pick: fn(&Aggregate) -> f64| {
            agg.map(|a| format_mbps(pick(&a)))
                .unwrap_or_else(|| NO_DATA.to_string())
        };

        [
            ("Highest", cell(self.download, |a| a.max), cell(self.upload, |a| a.max)),
            ("Lowest", cell(self.download, |a| a.min), cell(self.upload, |a| a.min)),
            ("Average", cell(self.download, |a| a.mean), cell(self.upload, |a| a.mean)),
        ]
    }
}

#[cfg(test)]
mod comprehensive_tests;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_basic() {
        let agg = aggregate(&[10.0, 20.0, 30.0]).unwrap();
        assert_eq!(agg.min, 10.0);
        assert_eq!(agg.max, 30.0);
        assert!((agg.mean - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_single_value() {
        let agg = aggregate(&[42.5]).unwrap();
        assert_eq!(agg.min, 42.5);
        assert_eq!(agg.max, 42.5);
        assert_eq!(agg.mean, 42.5);
    }

    #[test]
    fn test_aggregate_empty_is_no_data() {
        let err = aggregate(&[]).unwrap_err();
        assert!(matches!(err, AppError::Statistics(_)));
        assert!(err.to_string().contains("no data"));
    }

    #[test]
    fn test_session_stats_empty_shows_placeholders() {
        let stats = SessionStats::from_samples(&[]);
        assert!(stats.is_empty());
        assert!(stats.download.is_none());
        assert!(stats.upload.is_none());

        for (_, down, up) in stats.display_rows() {
            assert_eq!(down, NO_DATA);
            assert_eq!(up, NO_DATA);
        }
    }

    #[test]
    fn test_session_stats_display_rows() {
        let samples = vec![
            Sample { download_mbps: 100.0, upload_mbps: 20.0 },
            Sample { download_mbps: 50.0, upload_mbps: 10.0 },
        ];
        let stats = SessionStats::from_samples(&samples);
        let rows = stats.display_rows();

        assert_eq!(rows[0], ("Highest", "100.00".to_string(), "20.00".to_string()));
        assert_eq!(rows[1], ("Lowest", "50.00".to_string(), "10.00".to_string()));
        assert_eq!(rows[2], ("Average", "75.00".to_string(), "15.00".to_string()));
    }
}
