//! Best-member selection.

use crate::quality::QualityScore;

/// Index of the highest-scoring entry.
///
/// Scans once and replaces the incumbent only on a strictly greater score,
/// so the first of several equal maxima wins. `None` for empty input.
pub fn pick_best(scores: &[QualityScore]) -> Option<usize> {
    let mut best: Option<(usize, i32)> = None;
    for (idx, score) in scores.iter().enumerate() {
        match best {
            Some((_, incumbent)) if score.score <= incumbent => {}
            _ => best = Some((idx, score.score)),
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::score_release;
    use crate::release::Release;

    fn scores(releases: &[Release]) -> Vec<QualityScore> {
        releases.iter().map(score_release).collect()
    }

    #[test]
    fn test_pick_best_empty() {
        assert_eq!(pick_best(&[]), None);
    }

    #[test]
    fn test_pick_best_highest() {
        let releases = vec![
            Release::new("1", "x").with_resolution("720p"),
            Release::new("2", "x").with_resolution("2160p"),
            Release::new("3", "x").with_resolution("1080p"),
        ];
        assert_eq!(pick_best(&scores(&releases)), Some(1));
    }

    #[test]
    fn test_pick_best_tie_keeps_first() {
        let releases = vec![
            Release::new("1", "x").with_resolution("720p"),
            Release::new("2", "x").with_resolution("1080p").with_source("web"),
            Release::new("3", "x").with_resolution("1080p").with_codec("hevc"),
        ];
        // Both 1080p releases score 85.
        assert_eq!(pick_best(&scores(&releases)), Some(1));
    }
}
