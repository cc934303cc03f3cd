//! Ranking, deduplication and grouping of parsed torrent releases.
//!
//! The flat release collection of a torrent client is grouped by title,
//! each release is scored, the best copy of every title is picked and
//! near-equal copies are flagged as upgrade candidates. Series get
//! approximate missing-episode detection, and the whole hierarchy is
//! flattened into rows for a windowed list.

pub mod analytics;
pub mod config;
pub mod engine;
pub mod filter;
pub mod flatten;
pub mod gaps;
pub mod grouping;
pub mod quality;
pub mod ranking;
pub mod release;
pub mod source;
pub mod testing;

pub use analytics::{aggregate, TitleAnalytics};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, EngineConfig,
    SanitizedConfig, UpstreamConfig,
};
pub use engine::{TitleCatalog, TitleEngine};
pub use filter::ReleaseFilter;
pub use flatten::{flatten, ExpansionState, Row, RowHeights, RowKind};
pub use gaps::{analyze_gaps, EpisodeRange, GapReport, SeriesGaps};
pub use grouping::{group_releases, TitleGroup};
pub use quality::{score_release, QualityScore, QualityTier};
pub use ranking::{RankedGroup, UpgradeCandidate};
pub use release::{Release, ReleaseState, ReleaseType};
pub use source::{FleetClient, ReleaseSource, SourceError, TitlesPage, TorrentAction, TorrentActions};
