//! Catalog assembly and memoization.
//!
//! A [`TitleCatalog`] is everything derived from one filtered snapshot:
//! ranked groups, the gap report and the analytics rollup. It is immutable
//! once built; rows are flattened from it on demand for any expansion state.
//! [`TitleEngine`] rebuilds a catalog only when the snapshot or the filter
//! changes.

use std::sync::Arc;

use tracing::debug;

use crate::analytics::{aggregate_with_gaps, TitleAnalytics};
use crate::config::EngineConfig;
use crate::filter::ReleaseFilter;
use crate::flatten::{flatten, visible_row_count, ExpansionState, FlatRows, Row, RowHeights};
use crate::gaps::{analyze_gaps, GapReport};
use crate::grouping::group_releases;
use crate::ranking::{rank_groups, RankedGroup};
use crate::release::Release;

/// Derived view over one release collection.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleCatalog {
    groups: Vec<RankedGroup>,
    gaps: GapReport,
    analytics: TitleAnalytics,
    row_heights: RowHeights,
}

impl TitleCatalog {
    pub fn build(releases: &[Release], config: &EngineConfig) -> Self {
        let groups = rank_groups(group_releases(releases), config.upgrade_tolerance);
        let gaps = analyze_gaps(releases);
        let analytics = aggregate_with_gaps(releases, &gaps);
        Self {
            groups,
            gaps,
            analytics,
            row_heights: config.row_heights,
        }
    }

    /// Ranked groups in title order.
    pub fn groups(&self) -> &[RankedGroup] {
        &self.groups
    }

    pub fn gaps(&self) -> &GapReport {
        &self.gaps
    }

    pub fn analytics(&self) -> &TitleAnalytics {
        &self.analytics
    }

    pub fn row_heights(&self) -> &RowHeights {
        &self.row_heights
    }

    /// Rows visible under `expanded`.
    pub fn rows<'a>(&'a self, expanded: &'a ExpansionState) -> FlatRows<'a, RankedGroup> {
        flatten(&self.groups, expanded)
    }

    pub fn visible_row_count(&self, expanded: &ExpansionState) -> usize {
        visible_row_count(&self.groups, expanded)
    }

    pub fn row_height(&self, row: &Row<'_, RankedGroup>) -> u32 {
        self.row_heights.for_row(row)
    }

    pub fn find_group(&self, title: &str) -> Option<&RankedGroup> {
        self.groups.iter().find(|g| g.group.title == title)
    }

    /// Group holding the release with `hash`, with the member index.
    pub fn find_release(&self, hash: &str) -> Option<(&RankedGroup, usize)> {
        self.groups.iter().find_map(|g| {
            g.group
                .members
                .iter()
                .position(|r| r.hash.eq_ignore_ascii_case(hash))
                .map(|idx| (g, idx))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

struct CacheEntry {
    snapshot: Arc<[Release]>,
    filter: ReleaseFilter,
    catalog: Arc<TitleCatalog>,
}

/// Memoizing catalog builder.
///
/// The cache key is the snapshot's allocation identity plus the filter, so a
/// poller that swaps in a fresh `Arc` invalidates it and one that keeps the
/// old `Arc` does not.
pub struct TitleEngine {
    config: EngineConfig,
    cache: Option<CacheEntry>,
    rebuilds: u64,
}

impl TitleEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            cache: None,
            rebuilds: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Catalog for `snapshot` narrowed by `filter`.
    pub fn catalog(
        &mut self,
        snapshot: &Arc<[Release]>,
        filter: &ReleaseFilter,
    ) -> Arc<TitleCatalog> {
        if let Some(entry) = &self.cache {
            if Arc::ptr_eq(&entry.snapshot, snapshot) && entry.filter == *filter {
                debug!(releases = snapshot.len(), "Catalog cache hit");
                return Arc::clone(&entry.catalog);
            }
        }

        let catalog = if filter.is_empty() {
            TitleCatalog::build(snapshot, &self.config)
        } else {
            TitleCatalog::build(&filter.apply(snapshot), &self.config)
        };
        let catalog = Arc::new(catalog);
        self.rebuilds += 1;

        debug!(
            releases = snapshot.len(),
            groups = catalog.groups().len(),
            rebuilds = self.rebuilds,
            "Rebuilt title catalog"
        );

        self.cache = Some(CacheEntry {
            snapshot: Arc::clone(snapshot),
            filter: filter.clone(),
            catalog: Arc::clone(&catalog),
        });
        catalog
    }

    /// Number of catalog builds so far.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Drop the cached catalog.
    pub fn invalidate(&mut self) {
        self.cache = None;
    }
}

impl Default for TitleEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::RowKind;
    use crate::release::ReleaseType;

    fn snapshot() -> Arc<[Release]> {
        vec![
            Release::new("a1", "Arrival.2016.2160p.BluRay.HDR.x265")
                .with_title("Arrival")
                .with_type(ReleaseType::Movie)
                .with_year(2016)
                .with_resolution("2160p")
                .with_source("BluRay")
                .with_hdr("HDR10")
                .with_codec("x265")
                .with_size(40_000),
            Release::new("a2", "Arrival.2016.1080p.WEB-DL")
                .with_title("Arrival")
                .with_type(ReleaseType::Movie)
                .with_year(2016)
                .with_resolution("1080p")
                .with_source("WEB-DL")
                .with_size(8_000),
            Release::new("d1", "Dark.S01E01.1080p")
                .with_title("Dark")
                .with_type(ReleaseType::Episode)
                .with_episode(1, 1)
                .with_resolution("1080p"),
            Release::new("d3", "Dark.S01E03.1080p")
                .with_title("Dark")
                .with_type(ReleaseType::Episode)
                .with_episode(1, 3)
                .with_resolution("1080p"),
        ]
        .into()
    }

    #[test]
    fn test_build_catalog() {
        let releases = snapshot();
        let catalog = TitleCatalog::build(&releases, &EngineConfig::default());

        assert_eq!(catalog.groups().len(), 2);
        assert_eq!(catalog.groups()[0].group.title, "Arrival");
        assert_eq!(catalog.groups()[1].group.title, "Dark");
        assert_eq!(catalog.find_group("Arrival").unwrap().best_member().hash, "a1");
        assert_eq!(catalog.gaps().total_missing(), 1);
        assert_eq!(catalog.analytics().total_count, 4);
        assert_eq!(catalog.analytics().missing_episodes, 1);
    }

    #[test]
    fn test_rows_and_heights() {
        let releases = snapshot();
        let catalog = TitleCatalog::build(&releases, &EngineConfig::default());

        let collapsed = ExpansionState::new();
        assert_eq!(catalog.visible_row_count(&collapsed), 2);

        let expanded = collapsed.expanded("Arrival").expanded("Arrival::2016");
        let rows: Vec<_> = catalog.rows(&expanded).collect();
        assert_eq!(rows.len(), catalog.visible_row_count(&expanded));
        let kinds: Vec<RowKind> = rows.iter().map(|r| r.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                RowKind::GroupHeader,
                RowKind::SubGroupHeader,
                RowKind::Leaf,
                RowKind::Leaf,
                RowKind::GroupHeader,
            ]
        );
        assert_eq!(catalog.row_height(&rows[0]), 72);
        assert_eq!(catalog.row_height(&rows[2]), 96);
    }

    #[test]
    fn test_find_release() {
        let releases = snapshot();
        let catalog = TitleCatalog::build(&releases, &EngineConfig::default());

        let (group, idx) = catalog.find_release("D3").unwrap();
        assert_eq!(group.group.title, "Dark");
        assert_eq!(group.group.members[idx].hash, "d3");
        assert!(catalog.find_release("zz").is_none());
    }

    #[test]
    fn test_engine_memoizes_per_snapshot_and_filter() {
        let mut engine = TitleEngine::default();
        let releases = snapshot();
        let all = ReleaseFilter::default();

        let first = engine.catalog(&releases, &all);
        let second = engine.catalog(&releases, &all);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(engine.rebuilds(), 1);

        let movies = ReleaseFilter::default().with_type("movie");
        let filtered = engine.catalog(&releases, &movies);
        assert_eq!(engine.rebuilds(), 2);
        assert_eq!(filtered.groups().len(), 1);
        assert_eq!(filtered.analytics().total_count, 2);

        // Same content in a new allocation is a new snapshot.
        let refreshed: Arc<[Release]> = releases.iter().cloned().collect();
        engine.catalog(&refreshed, &movies);
        assert_eq!(engine.rebuilds(), 3);
    }

    #[test]
    fn test_engine_invalidate() {
        let mut engine = TitleEngine::default();
        let releases = snapshot();
        let filter = ReleaseFilter::default();

        engine.catalog(&releases, &filter);
        engine.invalidate();
        engine.catalog(&releases, &filter);
        assert_eq!(engine.rebuilds(), 2);
    }

    #[test]
    fn test_engine_uses_configured_tolerance() {
        let releases = snapshot();
        let filter = ReleaseFilter::default();

        // 145 for the 4K HDR release, 85 for the 1080p WEB-DL one.
        let mut strict = TitleEngine::default();
        let catalog = strict.catalog(&releases, &filter);
        assert!(catalog.find_group("Arrival").unwrap().upgrades.is_empty());

        let mut lenient = TitleEngine::new(EngineConfig {
            upgrade_tolerance: 60,
            ..Default::default()
        });
        let catalog = lenient.catalog(&releases, &filter);
        let upgrades = &catalog.find_group("Arrival").unwrap().upgrades;
        assert_eq!(upgrades.len(), 1);
        assert_eq!(upgrades[0].hash, "a2");
    }
}
