//! Chart series derived from a run sequence

use crate::models::Sample;

pub const CHART_TITLE: &str = "Network Speed over Time";
pub const X_AXIS_TITLE: &str = "Run #";
pub const Y_AXIS_TITLE: &str = "Speed (Mbps)";

/// Lowest top of the y axis, so an empty or slow session still has a scale
const MIN_Y_TOP: f64 = 10.0;
const Y_HEADROOM: f64 = 1.1;

/// Plot points and axis bounds for the speed chart
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub download: Vec<(f64, f64)>,
    pub upload: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl Default for ChartData {
    fn default() -> Self {
        Self::from_samples(&[])
    }
}

impl ChartData {
    /// Points are `(run index starting at 1, Mbps)`
    pub fn from_samples(samples: &[Sample]) -> Self {
        let point = |i: usize, v: f64| ((i + 1) as f64, v);

        let download: Vec<(f64, f64)> = samples
            .iter()
            .enumerate()
            .map(|(i, s)| point(i, s.download_mbps))
            .collect();
        let upload: Vec<(f64, f64)> = samples
            .iter()
            .enumerate()
            .map(|(i, s)| point(i, s.upload_mbps))
            .collect();

        let peak = samples
            .iter()
            .flat_map(|s| [s.download_mbps, s.upload_mbps])
            .fold(0.0_f64, f64::max);

        Self {
            download,
            upload,
            x_bounds: [1.0, samples.len().max(1) as f64],
            y_bounds: [0.0, (peak * Y_HEADROOM).max(MIN_Y_TOP)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.download.is_empty()
    }

    /// Tick labels for the x axis: first, middle and last run
    pub fn x_labels(&self) -> Vec<String> {
        let [lo, hi] = self.x_bounds;
        let mut labels = vec![format!("{:.0}", lo)];
        if hi - lo >= 2.0 {
            labels.push(format!("{:.0}", ((lo + hi) / 2.0).round()));
        }
        if hi > lo {
            labels.push(format!("{:.0}", hi));
        }
        labels
    }

    /// Tick labels for the y axis: zero, half and top
    pub fn y_labels(&self) -> Vec<String> {
        let top = self.y_bounds[1];
        vec!["0".to_string(), format!("{:.0}", top / 2.0), format!("{:.0}", top)]
    }
}
