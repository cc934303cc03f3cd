use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use titlerank_core::{
    Config, Release, ReleaseFilter, ReleaseSource, SanitizedConfig, SourceError, TitleCatalog,
    TitleEngine, TorrentActions,
};

use crate::metrics::{CATALOG_REBUILDS_TOTAL, SNAPSHOT_POLLS_TOTAL, SNAPSHOT_RELEASES};

/// Instance used when no upstream is configured.
const DEFAULT_INSTANCE: &str = "default";

/// Last fetched release collection.
#[derive(Debug, Clone)]
struct Snapshot {
    releases: Arc<[Release]>,
    total: usize,
    fetched_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            releases: Arc::from(Vec::new()),
            total: 0,
            fetched_at: None,
            last_error: None,
        }
    }
}

/// Snapshot metadata for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotInfo {
    /// Releases held locally.
    pub releases: usize,
    /// Collection size reported upstream.
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
    /// Error of the most recent failed fetch, cleared by a successful one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

/// Shared application state
pub struct AppState {
    config: Config,
    source: Option<Arc<dyn ReleaseSource>>,
    actions: Option<Arc<dyn TorrentActions>>,
    snapshot: RwLock<Snapshot>,
    engine: Mutex<TitleEngine>,
}

impl AppState {
    pub fn new(
        config: Config,
        source: Option<Arc<dyn ReleaseSource>>,
        actions: Option<Arc<dyn TorrentActions>>,
    ) -> Self {
        let engine = TitleEngine::new(config.engine.clone());
        Self {
            config,
            source,
            actions,
            snapshot: RwLock::new(Snapshot::default()),
            engine: Mutex::new(engine),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn source(&self) -> Option<&Arc<dyn ReleaseSource>> {
        self.source.as_ref()
    }

    pub fn actions(&self) -> Option<&Arc<dyn TorrentActions>> {
        self.actions.as_ref()
    }

    /// Instance whose releases are shown.
    pub fn instance_id(&self) -> &str {
        self.config
            .upstream
            .as_ref()
            .map(|u| u.instance_id.as_str())
            .unwrap_or(DEFAULT_INSTANCE)
    }

    /// Fetch the full collection and swap it in as the new snapshot.
    ///
    /// Filters are applied locally, so the fetch is always unfiltered. On
    /// failure the previous snapshot is kept and the error recorded.
    pub async fn refresh(&self) -> Result<usize, SourceError> {
        let source = self.source.as_ref().ok_or_else(|| {
            SourceError::Internal("no release source configured".to_string())
        })?;

        match source
            .fetch_titles(self.instance_id(), &ReleaseFilter::default())
            .await
        {
            Ok(page) => {
                let count = page.titles.len();
                let mut snapshot = self.snapshot.write().await;
                *snapshot = Snapshot {
                    releases: Arc::from(page.titles),
                    total: page.total,
                    fetched_at: Some(Utc::now()),
                    last_error: None,
                };
                drop(snapshot);

                SNAPSHOT_POLLS_TOTAL.with_label_values(&["ok"]).inc();
                SNAPSHOT_RELEASES.set(count as i64);
                info!(
                    source = source.name(),
                    instance = self.instance_id(),
                    releases = count,
                    "Snapshot refreshed"
                );
                Ok(count)
            }
            Err(e) => {
                self.snapshot.write().await.last_error = Some(e.to_string());
                SNAPSHOT_POLLS_TOTAL.with_label_values(&["error"]).inc();
                warn!(
                    source = source.name(),
                    instance = self.instance_id(),
                    error = %e,
                    "Snapshot refresh failed, keeping previous snapshot"
                );
                Err(e)
            }
        }
    }

    /// Catalog of the current snapshot narrowed by `filter`.
    pub async fn catalog(&self, filter: &ReleaseFilter) -> Arc<TitleCatalog> {
        let releases = Arc::clone(&self.snapshot.read().await.releases);

        let mut engine = self.engine.lock().unwrap_or_else(|e| e.into_inner());
        let before = engine.rebuilds();
        let catalog = engine.catalog(&releases, filter);
        if engine.rebuilds() > before {
            CATALOG_REBUILDS_TOTAL.inc();
        }
        catalog
    }

    pub async fn snapshot_info(&self) -> SnapshotInfo {
        let snapshot = self.snapshot.read().await;
        SnapshotInfo {
            releases: snapshot.releases.len(),
            total: snapshot.total,
            fetched_at: snapshot.fetched_at,
            last_error: snapshot.last_error.clone(),
        }
    }

    /// Replace the snapshot directly.
    pub async fn set_snapshot(&self, releases: Vec<Release>) {
        let total = releases.len();
        *self.snapshot.write().await = Snapshot {
            releases: Arc::from(releases),
            total,
            fetched_at: Some(Utc::now()),
            last_error: None,
        };
        SNAPSHOT_RELEASES.set(total as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use titlerank_core::testing::{fixtures, MockReleaseSource};

    fn state_with(source: Arc<MockReleaseSource>) -> AppState {
        AppState::new(
            Config::default(),
            Some(source as Arc<dyn ReleaseSource>),
            None,
        )
    }

    #[tokio::test]
    async fn test_refresh_swaps_snapshot() {
        let source = Arc::new(MockReleaseSource::with_titles(vec![
            fixtures::movie("m1", "Dune", 2021, "2160p"),
            fixtures::movie("m2", "Dune", 2021, "1080p"),
        ]));
        let state = state_with(Arc::clone(&source));

        assert_eq!(state.refresh().await.unwrap(), 2);
        let info = state.snapshot_info().await;
        assert_eq!(info.releases, 2);
        assert!(info.fetched_at.is_some());

        let catalog = state.catalog(&ReleaseFilter::default()).await;
        assert_eq!(catalog.groups().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let source = Arc::new(MockReleaseSource::with_titles(vec![fixtures::movie(
            "m1", "Dune", 2021, "2160p",
        )]));
        let state = state_with(Arc::clone(&source));
        state.refresh().await.unwrap();

        source.set_next_error(SourceError::Timeout).await;
        assert!(state.refresh().await.is_err());

        let info = state.snapshot_info().await;
        assert_eq!(info.releases, 1);
        assert!(info.last_error.is_some());
    }

    #[tokio::test]
    async fn test_catalog_is_memoized_until_refresh() {
        let source = Arc::new(MockReleaseSource::with_titles(vec![fixtures::movie(
            "m1", "Dune", 2021, "2160p",
        )]));
        let state = state_with(source);
        state.refresh().await.unwrap();

        let filter = ReleaseFilter::default();
        let a = state.catalog(&filter).await;
        let b = state.catalog(&filter).await;
        assert!(Arc::ptr_eq(&a, &b));

        state.refresh().await.unwrap();
        let c = state.catalog(&filter).await;
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[tokio::test]
    async fn test_refresh_without_source_fails() {
        let state = AppState::new(Config::default(), None, None);
        assert!(state.refresh().await.is_err());
        assert_eq!(state.instance_id(), "default");
        assert!(state.catalog(&ReleaseFilter::default()).await.is_empty());
    }

    #[tokio::test]
    async fn test_set_snapshot_without_source() {
        let state = AppState::new(Config::default(), None, None);
        state
            .set_snapshot(fixtures::season("dark-", "Dark", 1, &[1, 2, 4]))
            .await;

        let info = state.snapshot_info().await;
        assert_eq!(info.releases, 3);
        assert!(info.last_error.is_none());

        let catalog = state.catalog(&ReleaseFilter::default()).await;
        assert_eq!(catalog.groups().len(), 1);
        assert_eq!(catalog.analytics().missing_episodes, 1);
    }
}
