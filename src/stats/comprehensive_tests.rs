//! Property-based tests for throughput aggregation

use super::{aggregate, SessionStats};
use crate::models::sample::Sample;
use proptest::collection::vec;
use proptest::prelude::*;

/// Property-based test generators
mod generators {
    use super::*;

    /// Plausible Mbps readings, from dial-up to multi-gigabit
    pub fn mbps() -> impl Strategy<Value = f64> {
        0.001f64..10_000.0
    }

    pub fn samples() -> impl Strategy<Value = Vec<Sample>> {
        vec(
            (mbps(), mbps()).prop_map(|(download_mbps, upload_mbps)| Sample {
                download_mbps,
                upload_mbps,
            }),
            1..200,
        )
    }
}

proptest! {
    /// Mean should always be between min and max
    #[test]
    fn mean_between_min_max(values in vec(generators::mbps(), 1..500)) {
        let agg = aggregate(&values).unwrap();
        prop_assert!(agg.max >= agg.mean);
        prop_assert!(agg.mean >= agg.min);
    }

    /// Min and max are members of the input
    #[test]
    fn extremes_come_from_input(values in vec(generators::mbps(), 1..500)) {
        let agg = aggregate(&values).unwrap();
        prop_assert!(values.contains(&agg.min));
        prop_assert!(values.contains(&agg.max));
    }

    /// Ordering never changes the result
    #[test]
    fn order_independent(mut values in vec(generators::mbps(), 1..100)) {
        let forward = aggregate(&values).unwrap();
        values.reverse();
        let backward = aggregate(&values).unwrap();
        prop_assert_eq!(forward.min, backward.min);
        prop_assert_eq!(forward.max, backward.max);
        prop_assert!((forward.mean - backward.mean).abs() < 1e-6);
    }

    /// Both directions hold the ordering invariant for any non-empty session
    #[test]
    fn session_stats_ordered(samples in generators::samples()) {
        let stats = SessionStats::from_samples(&samples);
        prop_assert_eq!(stats.sample_count, samples.len());

        for agg in [stats.download.unwrap(), stats.upload.unwrap()] {
            prop_assert!(agg.max >= agg.mean && agg.mean >= agg.min);
        }
    }
}

#[test]
fn identical_values_collapse() {
    let agg = aggregate(&[7.25; 30]).unwrap();
    assert_eq!(agg.min, 7.25);
    assert_eq!(agg.max, 7.25);
    assert_eq!(agg.mean, 7.25);
}
