//! Best-release selection and upgrade detection within a title group.

mod best;
mod upgrade;

pub use best::*;
pub use upgrade::*;

use serde::Serialize;

use crate::grouping::TitleGroup;
use crate::quality::{score_release, QualityScore};
use crate::release::Release;

/// A title group with its members scored, its best member picked and its
/// upgrade candidates detected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedGroup {
    pub group: TitleGroup,
    /// Scores parallel to `group.members`.
    pub scores: Vec<QualityScore>,
    /// Index of the best member in `group.members`.
    pub best: usize,
    /// Never contains `best`.
    pub upgrades: Vec<UpgradeCandidate>,
}

impl RankedGroup {
    /// Score and rank a group. `None` only for a group without members,
    /// which the grouper never produces.
    pub fn rank(group: TitleGroup, tolerance: i32) -> Option<Self> {
        let scores: Vec<QualityScore> = group.members.iter().map(score_release).collect();
        let best = pick_best(&scores)?;
        let upgrades = detect_upgrades(&group.members, &scores, best, tolerance);
        Some(Self {
            group,
            scores,
            best,
            upgrades,
        })
    }

    pub fn best_member(&self) -> &Release {
        &self.group.members[self.best]
    }

    pub fn best_score(&self) -> &QualityScore {
        &self.scores[self.best]
    }

    /// Whether the member at `member` is listed as an upgrade candidate.
    pub fn is_upgrade(&self, member: usize) -> bool {
        self.upgrades.iter().any(|u| u.index == member)
    }

    /// Upgrade candidates with at least one stated improvement.
    pub fn explained_upgrades(&self) -> impl Iterator<Item = &UpgradeCandidate> {
        self.upgrades.iter().filter(|u| u.is_explained())
    }
}

impl AsRef<TitleGroup> for RankedGroup {
    fn as_ref(&self) -> &TitleGroup {
        &self.group
    }
}

/// Rank every group with the given upgrade tolerance.
pub fn rank_groups(groups: Vec<TitleGroup>, tolerance: i32) -> Vec<RankedGroup> {
    groups
        .into_iter()
        .filter_map(|group| RankedGroup::rank(group, tolerance))
        .collect()
}
