//! Technical quality scoring for parsed releases.
//!
//! Scores are integers on a fixed scale so releases of the same title can be
//! ranked against each other. The tier comes from the resolution alone; HDR,
//! source and codec only add bonus points.

mod scorer;
mod types;

pub use scorer::*;
pub use types::*;
