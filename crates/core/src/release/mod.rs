//! Parsed torrent releases as delivered by the remote fleet API.
//!
//! A [`Release`] is an immutable input record: every derived structure in
//! this crate (groups, scores, rows, analytics) is computed from a slice of
//! them and never written back.

mod types;

pub use types::*;
