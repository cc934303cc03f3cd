//! Clustering of releases into title groups and season/year sub-groups.

mod grouper;
mod types;

pub use grouper::*;
pub use types::*;
