//! Types for parsed releases.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Grouping key used when a release has neither a title nor a name.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Kind of content a release was parsed as.
///
/// Values the parser emits that are not listed here deserialize to
/// [`ReleaseType::Other`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    Movie,
    Series,
    Episode,
    App,
    Game,
    Music,
    #[default]
    #[serde(other)]
    Other,
}

impl ReleaseType {
    /// Returns the string representation for API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseType::Movie => "movie",
            ReleaseType::Series => "series",
            ReleaseType::Episode => "episode",
            ReleaseType::App => "app",
            ReleaseType::Game => "game",
            ReleaseType::Music => "music",
            ReleaseType::Other => "other",
        }
    }

    /// Whether releases of this type take part in season/episode handling.
    pub fn is_series(&self) -> bool {
        matches!(self, ReleaseType::Series | ReleaseType::Episode)
    }
}

/// Torrent state as reported by the client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReleaseState {
    Normal,
    Paused,
    Queued,
    Checking,
    Error,
    MissingFiles,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ReleaseState {
    /// Returns the string representation for API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReleaseState::Normal => "normal",
            ReleaseState::Paused => "paused",
            ReleaseState::Queued => "queued",
            ReleaseState::Checking => "checking",
            ReleaseState::Error => "error",
            ReleaseState::MissingFiles => "missingFiles",
            ReleaseState::Unknown => "unknown",
        }
    }

    /// A release counts as completed unless its torrent errored or lost its files.
    pub fn is_completed(&self) -> bool {
        !matches!(self, ReleaseState::Error | ReleaseState::MissingFiles)
    }
}

/// A single parsed torrent entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    /// Info hash, unique per release.
    pub hash: String,
    /// Raw release string.
    #[serde(default)]
    pub name: String,
    /// Normalized work title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub release_type: ReleaseType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,
    /// Season number. The parser calls this field `series`.
    #[serde(rename = "series", default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub codec: Vec<String>,
    #[serde(default)]
    pub audio: Vec<String>,
    /// HDR formats; empty means SDR.
    #[serde(default)]
    pub hdr: Vec<String>,
    #[serde(default)]
    pub edition: Vec<String>,
    /// Release group tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub state: ReleaseState,
    /// Unix timestamp (seconds) the torrent was added.
    #[serde(default)]
    pub added_on: i64,
}

impl Release {
    /// Create a release with only a hash and a name set.
    pub fn new(hash: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            name: name.into(),
            title: None,
            release_type: ReleaseType::Other,
            year: None,
            season: None,
            episode: None,
            resolution: None,
            source: None,
            codec: Vec::new(),
            audio: Vec::new(),
            hdr: Vec::new(),
            edition: Vec::new(),
            group: None,
            size: 0,
            state: ReleaseState::Normal,
            added_on: 0,
        }
    }

    /// The key releases are clustered by: the title, else the name, else
    /// [`UNKNOWN_TITLE`]. Empty strings count as absent.
    pub fn group_key(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ if !self.name.is_empty() => &self.name,
            _ => UNKNOWN_TITLE,
        }
    }

    /// Whether any HDR format was detected.
    pub fn has_hdr(&self) -> bool {
        !self.hdr.is_empty()
    }

    /// When the torrent was added, if the timestamp is representable.
    pub fn added_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.added_on, 0).single()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_type(mut self, release_type: ReleaseType) -> Self {
        self.release_type = release_type;
        self
    }

    pub fn with_year(mut self, year: u32) -> Self {
        self.year = Some(year);
        self
    }

    /// Set season and episode together.
    pub fn with_episode(mut self, season: u32, episode: u32) -> Self {
        self.season = Some(season);
        self.episode = Some(episode);
        self
    }

    pub fn with_season(mut self, season: u32) -> Self {
        self.season = Some(season);
        self
    }

    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_codec(mut self, codec: impl Into<String>) -> Self {
        self.codec.push(codec.into());
        self
    }

    pub fn with_hdr(mut self, hdr: impl Into<String>) -> Self {
        self.hdr.push(hdr.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_state(mut self, state: ReleaseState) -> Self {
        self.state = state;
        self
    }

    pub fn with_added_on(mut self, added_on: i64) -> Self {
        self.added_on = added_on;
        self
    }
}
