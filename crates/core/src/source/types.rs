//! Types for the release source and action seams.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::ReleaseFilter;
use crate::release::Release;

/// Errors from the upstream fleet API.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rejected before reaching the upstream.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SourceError {
    /// Whether the caller, not the upstream, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, SourceError::InvalidRequest(_))
    }
}

/// One fetch of the release collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitlesPage {
    pub titles: Vec<Release>,
    /// Size of the collection upstream, which may exceed `titles.len()`.
    #[serde(default)]
    pub total: usize,
}

/// Action applied to one or more torrents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TorrentAction {
    Pause,
    Resume,
    Recheck,
    Delete {
        /// Also remove downloaded data.
        delete_files: bool,
    },
    SetCategory {
        category: String,
    },
}

impl TorrentAction {
    /// Wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            TorrentAction::Pause => "pause",
            TorrentAction::Resume => "resume",
            TorrentAction::Recheck => "recheck",
            TorrentAction::Delete { .. } => "delete",
            TorrentAction::SetCategory { .. } => "category-change",
        }
    }

    /// Parse an action name with its optional arguments.
    ///
    /// `delete_files` defaults to false. A category change requires a
    /// non-empty category.
    pub fn from_name(
        name: &str,
        delete_files: Option<bool>,
        category: Option<&str>,
    ) -> Result<Self, SourceError> {
        match name.to_ascii_lowercase().as_str() {
            "pause" => Ok(TorrentAction::Pause),
            "resume" => Ok(TorrentAction::Resume),
            "recheck" => Ok(TorrentAction::Recheck),
            "delete" => Ok(TorrentAction::Delete {
                delete_files: delete_files.unwrap_or(false),
            }),
            "category-change" | "category" => match category.map(str::trim) {
                Some(category) if !category.is_empty() => Ok(TorrentAction::SetCategory {
                    category: category.to_string(),
                }),
                _ => Err(SourceError::InvalidRequest(
                    "category-change requires a category".to_string(),
                )),
            },
            other => Err(SourceError::InvalidRequest(format!(
                "unknown action: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for TorrentAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalize a hash set for an action: trim, lowercase, drop blanks and
/// duplicates (first occurrence wins). An empty result is rejected.
pub fn validate_hashes<S: AsRef<str>>(hashes: &[S]) -> Result<Vec<String>, SourceError> {
    let mut out: Vec<String> = Vec::with_capacity(hashes.len());
    for hash in hashes {
        let hash = hash.as_ref().trim().to_ascii_lowercase();
        if !hash.is_empty() && !out.contains(&hash) {
            out.push(hash);
        }
    }
    if out.is_empty() {
        return Err(SourceError::InvalidRequest(
            "at least one torrent hash is required".to_string(),
        ));
    }
    Ok(out)
}

/// Supplier of the flat release collection.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Fetch the releases of `instance_id` matching `filter`.
    async fn fetch_titles(
        &self,
        instance_id: &str,
        filter: &ReleaseFilter,
    ) -> Result<TitlesPage, SourceError>;
}

/// Sink for torrent actions.
#[async_trait]
pub trait TorrentActions: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Apply `action` to every torrent in `hashes`.
    ///
    /// Implementations must reject an empty hash set without contacting the
    /// upstream.
    async fn apply(
        &self,
        instance_id: &str,
        hashes: &[String],
        action: &TorrentAction,
    ) -> Result<(), SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_from_name() {
        assert_eq!(
            TorrentAction::from_name("pause", None, None).unwrap(),
            TorrentAction::Pause
        );
        assert_eq!(
            TorrentAction::from_name("RESUME", None, None).unwrap(),
            TorrentAction::Resume
        );
        assert_eq!(
            TorrentAction::from_name("delete", None, None).unwrap(),
            TorrentAction::Delete {
                delete_files: false
            }
        );
        assert_eq!(
            TorrentAction::from_name("delete", Some(true), None).unwrap(),
            TorrentAction::Delete { delete_files: true }
        );
        assert_eq!(
            TorrentAction::from_name("category-change", None, Some(" movies ")).unwrap(),
            TorrentAction::SetCategory {
                category: "movies".to_string()
            }
        );
    }

    #[test]
    fn test_action_from_name_rejects() {
        assert!(matches!(
            TorrentAction::from_name("explode", None, None),
            Err(SourceError::InvalidRequest(_))
        ));
        assert!(matches!(
            TorrentAction::from_name("category-change", None, Some("  ")),
            Err(SourceError::InvalidRequest(_))
        ));
        assert!(TorrentAction::from_name("category-change", None, None).is_err());
    }

    #[test]
    fn test_action_wire_names() {
        assert_eq!(TorrentAction::Recheck.as_str(), "recheck");
        assert_eq!(
            TorrentAction::SetCategory {
                category: "tv".to_string()
            }
            .to_string(),
            "category-change"
        );
    }

    #[test]
    fn test_validate_hashes() {
        let hashes = validate_hashes(&["ABC", " abc ", "", "def"]).unwrap();
        assert_eq!(hashes, vec!["abc".to_string(), "def".to_string()]);
    }

    #[test]
    fn test_validate_hashes_rejects_empty() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            validate_hashes(&empty),
            Err(SourceError::InvalidRequest(_))
        ));
        assert!(validate_hashes(&["  "]).is_err());
    }

    #[test]
    fn test_titles_page_deserialize() {
        let json = r#"{
            "titles": [
                {"hash": "h1", "name": "Dune.2021.2160p", "title": "Dune", "type": "movie", "year": 2021, "resolution": "2160p"},
                {"hash": "h2", "name": "Whatever", "type": "podcast", "state": "stalledUP"}
            ],
            "total": 7
        }"#;
        let page: TitlesPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.total, 7);
        assert_eq!(page.titles.len(), 2);
        assert_eq!(page.titles[0].title.as_deref(), Some("Dune"));
        assert_eq!(page.titles[1].release_type, crate::release::ReleaseType::Other);
    }
}
