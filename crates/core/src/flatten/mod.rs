//! Flattening of the title → sub-group → release hierarchy into display rows.
//!
//! The rendering host owns an [`ExpansionState`] and asks for rows given
//! that state. Rows are produced lazily, so a windowed list can pull only
//! what it needs; [`visible_row_count`] sizes the scrollbar without walking
//! leaves. Row heights are looked up from `(kind, depth)` alone.

mod expansion;
mod rows;

pub use expansion::*;
pub use rows::*;

use serde::{Deserialize, Serialize};

/// Estimated row heights, in pixels, per row kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowHeights {
    #[serde(default = "default_group_header")]
    pub group_header: u32,
    #[serde(default = "default_sub_group_header")]
    pub sub_group_header: u32,
    /// Leaves show several badge rows plus action controls.
    #[serde(default = "default_leaf")]
    pub leaf: u32,
}

impl Default for RowHeights {
    fn default() -> Self {
        Self {
            group_header: default_group_header(),
            sub_group_header: default_sub_group_header(),
            leaf: default_leaf(),
        }
    }
}

fn default_group_header() -> u32 {
    72
}

fn default_sub_group_header() -> u32 {
    48
}

fn default_leaf() -> u32 {
    96
}

impl RowHeights {
    /// Height hint for a row of `kind` at `depth`.
    ///
    /// A depth that does not match the kind's usual depth falls back to the
    /// kind's height.
    pub fn hint(&self, kind: RowKind, depth: u8) -> u32 {
        match (kind, depth) {
            (RowKind::GroupHeader, 0) => self.group_header,
            (RowKind::SubGroupHeader, 1) => self.sub_group_header,
            (RowKind::Leaf, 2) => self.leaf,
            (RowKind::GroupHeader, _) => self.group_header,
            (RowKind::SubGroupHeader, _) => self.sub_group_header,
            (RowKind::Leaf, _) => self.leaf,
        }
    }

    /// Height hint for a concrete row.
    pub fn for_row<G>(&self, row: &Row<'_, G>) -> u32 {
        self.hint(row.kind(), row.depth())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hints() {
        let heights = RowHeights::default();
        assert_eq!(heights.hint(RowKind::GroupHeader, 0), 72);
        assert_eq!(heights.hint(RowKind::SubGroupHeader, 1), 48);
        assert_eq!(heights.hint(RowKind::Leaf, 2), 96);
    }

    #[test]
    fn test_hint_depth_fallback() {
        let heights = RowHeights {
            group_header: 10,
            sub_group_header: 20,
            leaf: 30,
        };
        assert_eq!(heights.hint(RowKind::Leaf, 5), 30);
        assert_eq!(heights.hint(RowKind::SubGroupHeader, 0), 20);
    }

    #[test]
    fn test_partial_heights_deserialize_with_defaults() {
        let heights: RowHeights = toml::from_str("leaf = 120").unwrap();
        assert_eq!(heights.leaf, 120);
        assert_eq!(heights.group_header, 72);
        assert_eq!(heights.sub_group_header, 48);
    }
}
