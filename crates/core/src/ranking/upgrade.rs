//! Upgrade candidate detection.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::quality::{is_hevc, QualityScore, QualityTier};
use crate::release::Release;

/// How far below the best score a member may be and still be surfaced as a
/// possible replacement. Overridable through `[engine] upgrade_tolerance`.
pub const DEFAULT_UPGRADE_TOLERANCE: i32 = 10;

/// One reason a candidate differs favourably from the current best.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Improvement {
    TierChange { from: QualityTier, to: QualityTier },
    Resolution { from: String, to: String },
    AddsHdr,
    BetterCodec,
}

impl fmt::Display for Improvement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Improvement::TierChange { from, to } => write!(f, "{} → {}", from, to),
            Improvement::Resolution { from, to } => write!(f, "Resolution: {} → {}", from, to),
            Improvement::AddsHdr => f.write_str("Adds HDR"),
            Improvement::BetterCodec => f.write_str("Better codec (x265/HEVC)"),
        }
    }
}

impl Serialize for Improvement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A non-best member scoring within the tolerance of the best.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpgradeCandidate {
    /// Index into the group's members.
    pub index: usize,
    pub hash: String,
    pub score: QualityScore,
    /// May be empty: proximity alone makes a candidate.
    pub improvements: Vec<Improvement>,
}

impl UpgradeCandidate {
    pub fn is_explained(&self) -> bool {
        !self.improvements.is_empty()
    }
}

/// Describe what `candidate` offers over `best`.
pub fn describe_improvements(
    best: &Release,
    best_score: &QualityScore,
    candidate: &Release,
    candidate_score: &QualityScore,
) -> Vec<Improvement> {
    let mut improvements = Vec::new();

    if candidate_score.level != best_score.level {
        improvements.push(Improvement::TierChange {
            from: best_score.level,
            to: candidate_score.level,
        });
    }

    if let (Some(from), Some(to)) = (best.resolution.as_deref(), candidate.resolution.as_deref()) {
        if !from.eq_ignore_ascii_case(to) {
            improvements.push(Improvement::Resolution {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
    }

    if candidate.has_hdr() && !best.has_hdr() {
        improvements.push(Improvement::AddsHdr);
    }

    if is_hevc(&candidate.codec) && !is_hevc(&best.codec) {
        improvements.push(Improvement::BetterCodec);
    }

    improvements
}

/// Members other than `best` scoring at least `best score - tolerance`,
/// in member order.
pub fn detect_upgrades(
    members: &[Release],
    scores: &[QualityScore],
    best: usize,
    tolerance: i32,
) -> Vec<UpgradeCandidate> {
    let (Some(best_release), Some(best_score)) = (members.get(best), scores.get(best)) else {
        return Vec::new();
    };
    let threshold = best_score.score - tolerance;

    members
        .iter()
        .zip(scores)
        .enumerate()
        .filter(|(idx, (_, score))| *idx != best && score.score >= threshold)
        .map(|(idx, (release, score))| UpgradeCandidate {
            index: idx,
            hash: release.hash.clone(),
            score: score.clone(),
            improvements: describe_improvements(best_release, best_score, release, score),
        })
        .collect()
}
