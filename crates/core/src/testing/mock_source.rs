//! Mock release source for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::filter::ReleaseFilter;
use crate::release::Release;
use crate::source::{ReleaseSource, SourceError, TitlesPage};

/// A recorded fetch for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedFetch {
    pub instance_id: String,
    pub filter: ReleaseFilter,
}

/// Mock implementation of the ReleaseSource trait.
///
/// Serves a configurable collection, applying the requested filter the way
/// the fleet API does, and can be told to fail the next fetch.
///
/// # Example
///
/// ```rust,ignore
/// let source = MockReleaseSource::new();
/// source.set_titles(vec![fixtures::movie("h1", "Dune", 2021, "2160p")]).await;
///
/// let page = source.fetch_titles("default", &ReleaseFilter::default()).await?;
/// assert_eq!(page.total, 1);
///
/// source.set_next_error(SourceError::Timeout).await;
/// assert!(source.fetch_titles("default", &ReleaseFilter::default()).await.is_err());
/// ```
#[derive(Debug, Default)]
pub struct MockReleaseSource {
    titles: Arc<RwLock<Vec<Release>>>,
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
    /// If set, the next fetch will fail with this error.
    next_error: Arc<RwLock<Option<SourceError>>>,
}

impl MockReleaseSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock serving `titles`.
    pub fn with_titles(titles: Vec<Release>) -> Self {
        Self {
            titles: Arc::new(RwLock::new(titles)),
            ..Self::default()
        }
    }

    /// Replace the served collection.
    pub async fn set_titles(&self, titles: Vec<Release>) {
        *self.titles.write().await = titles;
    }

    /// Make the next fetch fail.
    pub async fn set_next_error(&self, error: SourceError) {
        *self.next_error.write().await = Some(error);
    }

    /// Number of fetches made, including failed ones.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }

    /// All recorded fetches.
    pub async fn fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }
}

#[async_trait]
impl ReleaseSource for MockReleaseSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_titles(
        &self,
        instance_id: &str,
        filter: &ReleaseFilter,
    ) -> Result<TitlesPage, SourceError> {
        self.fetches.write().await.push(RecordedFetch {
            instance_id: instance_id.to_string(),
            filter: filter.clone(),
        });

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        let titles = filter.apply(&self.titles.read().await);
        Ok(TitlesPage {
            total: titles.len(),
            titles,
        })
    }
}
