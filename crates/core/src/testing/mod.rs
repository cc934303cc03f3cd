//! Testing utilities and mock implementations.
//!
//! Mocks for the upstream seams plus release fixtures, so the engine and
//! the server can be exercised without a fleet API.
//!
//! # Example
//!
//! ```rust,ignore
//! use titlerank_core::testing::{fixtures, MockReleaseSource, MockTorrentActions};
//!
//! let source = MockReleaseSource::with_titles(vec![
//!     fixtures::movie("h1", "Dune", 2021, "2160p"),
//! ]);
//! let actions = MockTorrentActions::new();
//!
//! // Use in AppState...
//! ```

mod mock_actions;
mod mock_source;

pub use mock_actions::{MockTorrentActions, RecordedAction};
pub use mock_source::{MockReleaseSource, RecordedFetch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::release::{Release, ReleaseType};

    /// Create a test release with reasonable defaults.
    pub fn release(hash: &str, title: &str) -> Release {
        Release::new(hash, title.replace(' ', "."))
            .with_title(title)
            .with_size(1024 * 1024 * 700) // 700 MB
            .with_added_on(1_700_000_000)
    }

    /// Create a test movie release.
    pub fn movie(hash: &str, title: &str, year: u32, resolution: &str) -> Release {
        let mut release = release(hash, title)
            .with_type(ReleaseType::Movie)
            .with_year(year)
            .with_resolution(resolution)
            .with_size(1024 * 1024 * 1024 * 4); // 4 GB
        release.name = format!("{}.{}.{}", release.name, year, resolution);
        release
    }

    /// Create a test episode release.
    pub fn episode(hash: &str, title: &str, season: u32, episode: u32, resolution: &str) -> Release {
        let mut release = release(hash, title)
            .with_type(ReleaseType::Episode)
            .with_episode(season, episode)
            .with_resolution(resolution);
        release.name = format!(
            "{}.S{:02}E{:02}.{}",
            release.name, season, episode, resolution
        );
        release
    }

    /// Episodes `numbers` of one season of `title`, hashed `{prefix}{n}`.
    pub fn season(prefix: &str, title: &str, season: u32, numbers: &[u32]) -> Vec<Release> {
        numbers
            .iter()
            .map(|n| episode(&format!("{}{}", prefix, n), title, season, *n, "1080p"))
            .collect()
    }
}
