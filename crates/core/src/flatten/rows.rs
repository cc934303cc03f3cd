//! Lazy row sequence.

use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::grouping::TitleGroup;
use crate::release::Release;

use super::ExpansionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    GroupHeader,
    SubGroupHeader,
    Leaf,
}

impl RowKind {
    /// Nesting depth rows of this kind are emitted at.
    pub fn depth(&self) -> u8 {
        match self {
            RowKind::GroupHeader => 0,
            RowKind::SubGroupHeader => 1,
            RowKind::Leaf => 2,
        }
    }
}

/// One display row. `G` is the group type the rows were flattened from.
#[derive(Debug)]
pub enum Row<'a, G> {
    GroupHeader {
        group: &'a G,
    },
    SubGroupHeader {
        group: &'a G,
        key: &'a str,
    },
    Leaf {
        group: &'a G,
        key: &'a str,
        /// Index into the group's members.
        index: usize,
        release: &'a Release,
    },
}

impl<G> Clone for Row<'_, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G> Copy for Row<'_, G> {}

impl<'a, G> Row<'a, G> {
    pub fn kind(&self) -> RowKind {
        match self {
            Row::GroupHeader { .. } => RowKind::GroupHeader,
            Row::SubGroupHeader { .. } => RowKind::SubGroupHeader,
            Row::Leaf { .. } => RowKind::Leaf,
        }
    }

    pub fn depth(&self) -> u8 {
        self.kind().depth()
    }

    pub fn group(&self) -> &'a G {
        match *self {
            Row::GroupHeader { group }
            | Row::SubGroupHeader { group, .. }
            | Row::Leaf { group, .. } => group,
        }
    }
}

enum Cursor<'a> {
    /// Next row is the current group's header.
    GroupHeader,
    /// Walking the sub-groups of an expanded group.
    SubGroups {
        keys: Vec<&'a str>,
        key_idx: usize,
        /// Next leaf position within the current sub-group, once its header
        /// has been emitted and it is expanded.
        leaf_idx: Option<usize>,
    },
}

/// Iterator over the visible rows of a list of groups.
pub struct FlatRows<'a, G> {
    groups: &'a [G],
    expanded: &'a ExpansionState,
    group_idx: usize,
    cursor: Cursor<'a>,
}

/// Flatten `groups` into the rows visible under `expanded`.
///
/// Every group emits its header. Sub-group headers follow only under an
/// expanded group, ordered by key descending. Leaves follow only under an
/// expanded sub-group, in member order.
pub fn flatten<'a, G: AsRef<TitleGroup>>(
    groups: &'a [G],
    expanded: &'a ExpansionState,
) -> FlatRows<'a, G> {
    FlatRows {
        groups,
        expanded,
        group_idx: 0,
        cursor: Cursor::GroupHeader,
    }
}

/// Number of rows [`flatten`] would yield, without visiting leaves.
pub fn visible_row_count<G: AsRef<TitleGroup>>(groups: &[G], expanded: &ExpansionState) -> usize {
    groups
        .iter()
        .map(|g| {
            let group = g.as_ref();
            if !expanded.is_group_expanded(&group.title) {
                return 1;
            }
            let nested: usize = group
                .sub_groups
                .iter()
                .map(|(key, members)| {
                    if expanded.is_sub_group_expanded(&group.title, key) {
                        1 + members.len()
                    } else {
                        1
                    }
                })
                .sum();
            1 + nested
        })
        .sum()
}

impl<'a, G: AsRef<TitleGroup>> Iterator for FlatRows<'a, G> {
    type Item = Row<'a, G>;

    fn next(&mut self) -> Option<Self::Item> {
        let groups = self.groups;
        loop {
            let owner = groups.get(self.group_idx)?;
            let group = owner.as_ref();

            match &mut self.cursor {
                Cursor::GroupHeader => {
                    if self.expanded.is_group_expanded(&group.title) {
                        self.cursor = Cursor::SubGroups {
                            keys: group.sub_group_keys(),
                            key_idx: 0,
                            leaf_idx: None,
                        };
                    } else {
                        self.group_idx += 1;
                    }
                    return Some(Row::GroupHeader { group: owner });
                }
                Cursor::SubGroups {
                    keys,
                    key_idx,
                    leaf_idx,
                } => {
                    let Some(&key) = keys.get(*key_idx) else {
                        self.group_idx += 1;
                        self.cursor = Cursor::GroupHeader;
                        continue;
                    };

                    match *leaf_idx {
                        None => {
                            if self.expanded.is_sub_group_expanded(&group.title, key) {
                                *leaf_idx = Some(0);
                            } else {
                                *key_idx += 1;
                            }
                            return Some(Row::SubGroupHeader { group: owner, key });
                        }
                        Some(pos) => {
                            let member = group
                                .sub_groups
                                .get(key)
                                .and_then(|members| members.get(pos))
                                .copied();
                            match member.and_then(|m| group.members.get(m).map(|r| (m, r))) {
                                Some((index, release)) => {
                                    *leaf_idx = Some(pos + 1);
                                    return Some(Row::Leaf {
                                        group: owner,
                                        key,
                                        index,
                                        release,
                                    });
                                }
                                None => {
                                    *leaf_idx = None;
                                    *key_idx += 1;
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining_groups = self.groups.len().saturating_sub(self.group_idx);
        let lower = match self.cursor {
            Cursor::GroupHeader => remaining_groups,
            Cursor::SubGroups { .. } => remaining_groups.saturating_sub(1),
        };
        (lower, None)
    }
}

impl<G: AsRef<TitleGroup>> FusedIterator for FlatRows<'_, G> {}
