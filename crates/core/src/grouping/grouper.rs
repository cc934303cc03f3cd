//! Release grouper.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::debug;

use crate::release::Release;

use super::TitleGroup;

/// Sub-group key for releases with neither a usable season nor a year.
pub const OTHER_SUB_GROUP: &str = "Other";

/// Sub-group key of a release.
///
/// Series and episodes with a season (0 included) go to `"Season {n}"`;
/// anything else with a year goes to the year; the rest to `"Other"`.
pub fn sub_group_key(release: &Release) -> String {
    match (release.release_type.is_series(), release.season, release.year) {
        (true, Some(season), _) => format!("Season {}", season),
        (_, _, Some(year)) => year.to_string(),
        _ => OTHER_SUB_GROUP.to_string(),
    }
}

/// Order titles the way a locale-aware collator would for plain titles:
/// case-insensitive first, byte order to break ties.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Cluster releases by [`Release::group_key`], ordered by title ascending.
///
/// Members keep input order. Empty input yields no groups.
pub fn group_releases(releases: &[Release]) -> Vec<TitleGroup> {
    let mut index_by_title: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<TitleGroup> = Vec::new();

    for release in releases {
        let key = release.group_key();
        let group_idx = match index_by_title.get(key) {
            Some(&idx) => idx,
            None => {
                groups.push(TitleGroup {
                    title: key.to_string(),
                    release_type: release.release_type,
                    members: Vec::new(),
                    total_size: 0,
                    sub_groups: HashMap::new(),
                });
                index_by_title.insert(key, groups.len() - 1);
                groups.len() - 1
            }
        };

        let group = &mut groups[group_idx];
        let member_idx = group.members.len();
        group.total_size += release.size;
        group
            .sub_groups
            .entry(sub_group_key(release))
            .or_default()
            .push(member_idx);
        group.members.push(release.clone());
    }

    groups.sort_by(|a, b| compare_titles(&a.title, &b.title));
    debug!(
        releases = releases.len(),
        groups = groups.len(),
        "Grouped releases by title"
    );
    groups
}
