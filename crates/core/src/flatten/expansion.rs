//! Caller-owned expansion state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::grouping::{sub_group_id, SUB_GROUP_SEPARATOR};

/// Set of expanded node ids: group titles and `"{title}::{key}"` sub-group ids.
///
/// Values are immutable: every toggle returns a new state, and the caller
/// replaces its copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpansionState {
    ids: BTreeSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn is_group_expanded(&self, title: &str) -> bool {
        self.is_expanded(title)
    }

    pub fn is_sub_group_expanded(&self, title: &str, key: &str) -> bool {
        self.ids.contains(&sub_group_id(title, key))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// State with `id` expanded.
    pub fn expanded(&self, id: &str) -> Self {
        let mut ids = self.ids.clone();
        ids.insert(id.to_string());
        Self { ids }
    }

    /// State with `id` and every descendant id (`"{id}::..."`) collapsed.
    ///
    /// Dropping descendants is what keeps leaves from reappearing under a
    /// parent that is not visibly expanded.
    ///
    /// Matching is by prefix, so collapsing `"Show"` also drops the ids of
    /// a group titled `"Show::Extras"` and of its sub-groups.
    pub fn collapsed(&self, id: &str) -> Self {
        let prefix = format!("{}{}", id, SUB_GROUP_SEPARATOR);
        let ids = self
            .ids
            .iter()
            .filter(|existing| existing.as_str() != id && !existing.starts_with(&prefix))
            .cloned()
            .collect();
        Self { ids }
    }

    /// Expand `id` if collapsed, collapse it (with descendants) otherwise.
    pub fn toggled(&self, id: &str) -> Self {
        if self.is_expanded(id) {
            self.collapsed(id)
        } else {
            self.expanded(id)
        }
    }

    pub fn toggled_group(&self, title: &str) -> Self {
        self.toggled(title)
    }

    pub fn toggled_sub_group(&self, title: &str, key: &str) -> Self {
        self.toggled(&sub_group_id(title, key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_expands_and_collapses() {
        let state = ExpansionState::new().toggled_group("Show X");
        assert!(state.is_group_expanded("Show X"));

        let state = state.toggled_group("Show X");
        assert!(state.is_empty());
    }

    #[test]
    fn test_collapse_cascades_to_sub_groups() {
        let state = ExpansionState::new()
            .toggled_group("Show X")
            .toggled_sub_group("Show X", "Season 1")
            .toggled_sub_group("Show X", "Season 2")
            .toggled_group("Other Show");
        assert_eq!(state.len(), 4);

        let collapsed = state.toggled_group("Show X");
        assert!(!collapsed.is_group_expanded("Show X"));
        assert!(!collapsed.is_sub_group_expanded("Show X", "Season 1"));
        assert!(!collapsed.is_sub_group_expanded("Show X", "Season 2"));
        assert!(collapsed.is_group_expanded("Other Show"));
        assert_eq!(collapsed.len(), 1);
    }

    #[test]
    fn test_collapse_keeps_similarly_named_groups() {
        let state = ExpansionState::from_ids(["Show", "Show 2", "Show 2::2020"]);
        let collapsed = state.collapsed("Show");
        let ids: Vec<_> = collapsed.ids().collect();
        assert_eq!(ids, vec!["Show 2", "Show 2::2020"]);
    }

    #[test]
    fn test_toggling_returns_new_value() {
        let original = ExpansionState::new();
        let _ = original.toggled_group("A");
        assert!(original.is_empty());
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let state = ExpansionState::from_ids(["b", "a"]);
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
    }
}
