//! Missing-episode detection for series titles.
//!
//! The true episode count of a season is not known here, so a gap is any
//! number in `1..=max(known episode)` that no release covers. Episodes past
//! the highest known one are never reported, and missing seasons (a series
//! with seasons 1 and 3 but not 2) are not flagged either. Callers should
//! present these numbers as an approximation.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::release::Release;

/// Inclusive run of missing episode numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EpisodeRange {
    pub start: u32,
    pub end: u32,
}

impl EpisodeRange {
    pub fn count(&self) -> u64 {
        u64::from(self.end - self.start) + 1
    }
}

/// Episode coverage of one series title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeriesGaps {
    pub title: String,
    pub known_episodes: BTreeSet<u32>,
    pub known_seasons: BTreeSet<u32>,
    /// Number of values in `1..=max(known_episodes)` not present.
    pub missing_count: u64,
    /// The same values as ascending inclusive runs.
    pub missing_ranges: Vec<EpisodeRange>,
}

impl SeriesGaps {
    pub fn missing_count(&self) -> u64 {
        self.missing_count
    }

    pub fn has_gaps(&self) -> bool {
        self.missing_count > 0
    }

    /// Whether any episode or season number is known for the title.
    pub fn has_numbering(&self) -> bool {
        !self.known_episodes.is_empty() || !self.known_seasons.is_empty()
    }
}

/// Gap analysis over all series titles of a collection, ordered by title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GapReport {
    pub series: Vec<SeriesGaps>,
}

impl GapReport {
    /// Sum of missing episodes across titles.
    pub fn total_missing(&self) -> u64 {
        self.series.iter().map(SeriesGaps::missing_count).sum()
    }

    /// Distinct series titles with at least one known episode or season.
    pub fn series_count(&self) -> usize {
        self.series.iter().filter(|s| s.has_numbering()).count()
    }

    pub fn for_title(&self, title: &str) -> Option<&SeriesGaps> {
        self.series.iter().find(|s| s.title == title)
    }
}

/// Runs of numbers in `1..=max(known)` absent from `known`.
///
/// Output size is bounded by `known.len() + 1` whatever the values are.
pub fn missing_ranges(known: &BTreeSet<u32>) -> Vec<EpisodeRange> {
    let mut ranges = Vec::new();
    let mut next = 1u32;
    for &n in known.range(1..) {
        if n > next {
            ranges.push(EpisodeRange {
                start: next,
                end: n - 1,
            });
        }
        match n.checked_add(1) {
            Some(after) => next = after,
            None => break,
        }
    }
    ranges
}

/// Count of numbers in `1..=max(known)` absent from `known`.
pub fn missing_count(known: &BTreeSet<u32>) -> u64 {
    let Some(&max) = known.last() else {
        return 0;
    };
    let present = known.range(1..).count() as u64;
    u64::from(max) - present
}

/// Analyze every title that has series or episode releases.
///
/// Each title is analyzed from its own releases only.
pub fn analyze_gaps(releases: &[Release]) -> GapReport {
    let mut by_title: BTreeMap<&str, SeriesGaps> = BTreeMap::new();

    for release in releases.iter().filter(|r| r.release_type.is_series()) {
        let title = release.group_key();
        let entry = by_title.entry(title).or_insert_with(|| SeriesGaps {
            title: title.to_string(),
            ..Default::default()
        });
        if let Some(episode) = release.episode {
            entry.known_episodes.insert(episode);
        }
        if let Some(season) = release.season {
            entry.known_seasons.insert(season);
        }
    }

    let series = by_title
        .into_values()
        .map(|mut gaps| {
            gaps.missing_count = missing_count(&gaps.known_episodes);
            gaps.missing_ranges = missing_ranges(&gaps.known_episodes);
            gaps
        })
        .collect();

    GapReport { series }
}
