//! Types for title groups.

use std::collections::HashMap;

use serde::Serialize;

use crate::release::{Release, ReleaseType};

/// Separator between a title and a sub-group key in composite node ids.
pub const SUB_GROUP_SEPARATOR: &str = "::";

/// Build the composite id of a sub-group node (`"{title}::{key}"`).
pub fn sub_group_id(title: &str, key: &str) -> String {
    format!("{}{}{}", title, SUB_GROUP_SEPARATOR, key)
}

/// All releases sharing one grouping key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleGroup {
    /// Grouping key, also the node id of the group.
    pub title: String,
    /// Type of the first member.
    pub release_type: ReleaseType,
    /// Members in input order.
    pub members: Vec<Release>,
    /// Sum of member sizes in bytes.
    pub total_size: u64,
    /// Sub-group key to indices into `members`. Partitions `members`.
    /// Key order carries no meaning; see [`TitleGroup::sub_group_keys`].
    pub sub_groups: HashMap<String, Vec<usize>>,
}

impl TitleGroup {
    /// Node id of the group header.
    pub fn id(&self) -> &str {
        &self.title
    }

    /// Sub-group keys in display order: descending string comparison, so
    /// years and seasons list newest first.
    pub fn sub_group_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.sub_groups.keys().map(String::as_str).collect();
        keys.sort_unstable_by(|a, b| b.cmp(a));
        keys
    }

    /// Members of one sub-group, in `members` order.
    pub fn sub_group_members<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a Release> + 'a {
        let indices: &'a [usize] = self.sub_groups.get(key).map(Vec::as_slice).unwrap_or(&[]);
        indices.iter().filter_map(move |&i| self.members.get(i))
    }

    /// Composite node id of one of this group's sub-groups.
    pub fn sub_group_id(&self, key: &str) -> String {
        sub_group_id(&self.title, key)
    }
}

impl AsRef<TitleGroup> for TitleGroup {
    fn as_ref(&self) -> &TitleGroup {
        self
    }
}
