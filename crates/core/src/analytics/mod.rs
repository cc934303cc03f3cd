//! Collection-wide rollups for the titles dashboard.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::gaps::{analyze_gaps, GapReport};
use crate::quality::{score_release, QualityTier};
use crate::release::{Release, ReleaseType};

/// Totals over a release collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TitleAnalytics {
    /// Sum of release sizes in bytes.
    pub total_size: u64,
    pub total_count: usize,
    pub by_type: BTreeMap<ReleaseType, usize>,
    pub by_quality: BTreeMap<QualityTier, usize>,
    /// Releases without a source are not counted here.
    pub by_source: BTreeMap<String, usize>,
    /// Distinct series titles with a known episode or season.
    pub series_count: usize,
    /// Approximate; see [`crate::gaps`].
    pub missing_episodes: u64,
    /// Releases whose state is neither error nor missing files.
    pub completed_count: usize,
    /// `completed_count / total_count * 100`, 0 for an empty collection.
    pub completion_rate: f64,
}

/// Percentage of `completed` over `total`, 0 when `total` is 0.
pub fn completion_rate(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

/// Aggregate a collection, running gap analysis on it.
pub fn aggregate(releases: &[Release]) -> TitleAnalytics {
    aggregate_with_gaps(releases, &analyze_gaps(releases))
}

/// Aggregate a collection reusing an existing gap report for it.
pub fn aggregate_with_gaps(releases: &[Release], gaps: &GapReport) -> TitleAnalytics {
    let mut analytics = TitleAnalytics {
        total_count: releases.len(),
        series_count: gaps.series_count(),
        missing_episodes: gaps.total_missing(),
        ..Default::default()
    };

    for release in releases {
        analytics.total_size += release.size;
        *analytics.by_type.entry(release.release_type).or_default() += 1;
        *analytics
            .by_quality
            .entry(score_release(release).level)
            .or_default() += 1;
        if let Some(source) = &release.source {
            *analytics.by_source.entry(source.clone()).or_default() += 1;
        }
        if release.state.is_completed() {
            analytics.completed_count += 1;
        }
    }

    analytics.completion_rate = completion_rate(analytics.completed_count, analytics.total_count);
    analytics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release::ReleaseState;

    #[test]
    fn test_completion_rate_example() {
        let mut releases: Vec<Release> = (0..7)
            .map(|i| Release::new(format!("ok{}", i), "x"))
            .collect();
        releases.push(Release::new("e1", "x").with_state(ReleaseState::Error));
        releases.push(Release::new("e2", "x").with_state(ReleaseState::Error));
        releases.push(Release::new("m1", "x").with_state(ReleaseState::MissingFiles));

        let analytics = aggregate(&releases);
        assert_eq!(analytics.total_count, 10);
        assert_eq!(analytics.completed_count, 7);
        assert!((analytics.completion_rate - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_collection() {
        let analytics = aggregate(&[]);
        assert_eq!(analytics.total_count, 0);
        assert_eq!(analytics.completion_rate, 0.0);
        assert!(analytics.completion_rate.is_finite());
        assert_eq!(analytics.total_size, 0);
    }

    #[test]
    fn test_breakdowns() {
        let releases = vec![
            Release::new("1", "A")
                .with_type(ReleaseType::Movie)
                .with_resolution("2160p")
                .with_source("bluray")
                .with_size(10),
            Release::new("2", "B")
                .with_type(ReleaseType::Movie)
                .with_resolution("1080p")
                .with_source("web")
                .with_size(20),
            Release::new("3", "C")
                .with_title("Show")
                .with_type(ReleaseType::Episode)
                .with_episode(1, 1)
                .with_size(30),
            Release::new("4", "D")
                .with_title("Show")
                .with_type(ReleaseType::Episode)
                .with_episode(1, 3)
                .with_source("web"),
        ];
        let analytics = aggregate(&releases);

        assert_eq!(analytics.total_size, 60);
        assert_eq!(analytics.by_type[&ReleaseType::Movie], 2);
        assert_eq!(analytics.by_type[&ReleaseType::Episode], 2);
        assert_eq!(analytics.by_quality[&QualityTier::Uhd], 1);
        assert_eq!(analytics.by_quality[&QualityTier::Fhd], 1);
        assert_eq!(analytics.by_quality[&QualityTier::Sd], 2);
        assert_eq!(analytics.by_source["web"], 2);
        assert_eq!(analytics.by_source["bluray"], 1);
        assert_eq!(analytics.by_source.values().sum::<usize>(), 3);
        assert_eq!(analytics.series_count, 1);
        assert_eq!(analytics.missing_episodes, 1);
    }

    #[test]
    fn test_serializes_enum_keys_as_strings() {
        let releases = vec![Release::new("1", "A").with_type(ReleaseType::Game)];
        let value = serde_json::to_value(aggregate(&releases)).unwrap();
        assert_eq!(value["by_type"]["game"], 1);
        assert_eq!(value["by_quality"]["sd"], 1);
    }
}
