//! Upstream release collection and torrent actions.
//!
//! The engine never talks to a torrent client directly. A [`ReleaseSource`]
//! supplies the flat release collection for an instance, and
//! [`TorrentActions`] forwards pause/resume/recheck/delete/category-change
//! requests. [`FleetClient`] implements both over the fleet HTTP API.

mod fleet;
mod types;

pub use fleet::FleetClient;
pub use types::*;
