//! Mock torrent action sink for testing.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::source::{validate_hashes, SourceError, TorrentAction, TorrentActions};

/// A recorded action for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedAction {
    pub instance_id: String,
    /// Normalized hashes, as the upstream would receive them.
    pub hashes: Vec<String>,
    pub action: TorrentAction,
    /// When the action was applied.
    pub timestamp: chrono::DateTime<Utc>,
}

/// Mock implementation of the TorrentActions trait.
#[derive(Debug, Default)]
pub struct MockTorrentActions {
    applied: Arc<RwLock<Vec<RecordedAction>>>,
    /// If set, the next action will fail with this error.
    next_error: Arc<RwLock<Option<SourceError>>>,
}

impl MockTorrentActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded actions.
    pub async fn applied(&self) -> Vec<RecordedAction> {
        self.applied.read().await.clone()
    }

    /// Clear recorded actions.
    pub async fn clear_recorded(&self) {
        self.applied.write().await.clear();
    }

    /// Make the next action fail.
    pub async fn set_next_error(&self, error: SourceError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl TorrentActions for MockTorrentActions {
    fn name(&self) -> &str {
        "mock"
    }

    async fn apply(
        &self,
        instance_id: &str,
        hashes: &[String],
        action: &TorrentAction,
    ) -> Result<(), SourceError> {
        let hashes = validate_hashes(hashes)?;

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        self.applied.write().await.push(RecordedAction {
            instance_id: instance_id.to_string(),
            hashes,
            action: action.clone(),
            timestamp: Utc::now(),
        });
        Ok(())
    }
}
