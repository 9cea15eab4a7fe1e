//! Layout index: grouping panes by their position triple.
//!
//! The renderer walks panes in a fixed structural order (columns, then rows
//! within a column, then slots within a row), so the flat pane list from the
//! config is regrouped into a three-level map first. `BTreeMap` nesting
//! gives the sorted iteration order for free.

use std::collections::BTreeMap;

use tracing::warn;

use crate::config::PaneConfig;
use crate::position::Position;

type SlotMap = BTreeMap<u32, PaneConfig>;
type RowMap = BTreeMap<u32, SlotMap>;

/// Panes grouped by column, row, and column-in-row.
///
/// Built fresh for each tab render; never persisted. Exactly one pane
/// occupies each position — a later duplicate silently replaces an earlier
/// one.
#[derive(Debug, Default)]
pub struct LayoutIndex {
    columns: BTreeMap<u32, RowMap>,
}

impl LayoutIndex {
    /// Group a tab's panes by their parsed positions.
    ///
    /// A pane whose position fails to parse is logged and skipped; one
    /// malformed pane must not abort an otherwise-valid layout. The
    /// normalized `"column/row/slot"` string is written back onto the
    /// stored pane so the renderer can use it as a session-map key.
    pub fn build(panes: &[PaneConfig]) -> Self {
        let mut index = Self::default();

        for pane in panes {
            let position = match Position::parse(&pane.position) {
                Ok(p) => p,
                Err(e) => {
                    warn!("skipping pane: {e}");
                    continue;
                }
            };

            let mut pane = pane.clone();
            pane.position = position.to_string();

            index
                .columns
                .entry(position.column)
                .or_default()
                .entry(position.row)
                .or_default()
                .insert(position.slot, pane);
        }

        index
    }

    /// Sorted column numbers.
    pub fn columns(&self) -> impl Iterator<Item = u32> + '_ {
        self.columns.keys().copied()
    }

    /// Sorted row numbers within a column.
    pub fn rows(&self, column: u32) -> impl Iterator<Item = u32> + '_ {
        self.columns
            .get(&column)
            .into_iter()
            .flat_map(|rows| rows.keys().copied())
    }

    /// Sorted slot numbers within a row.
    pub fn slots(&self, column: u32, row: u32) -> impl Iterator<Item = u32> + '_ {
        self.columns
            .get(&column)
            .and_then(|rows| rows.get(&row))
            .into_iter()
            .flat_map(|slots| slots.keys().copied())
    }

    /// The pane at an exact position, if any.
    pub fn pane(&self, column: u32, row: u32, slot: u32) -> Option<&PaneConfig> {
        self.columns.get(&column)?.get(&row)?.get(&slot)
    }

    /// Number of indexed panes.
    pub fn len(&self) -> usize {
        self.columns
            .values()
            .flat_map(|rows| rows.values())
            .map(|slots| slots.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pane(position: &str) -> PaneConfig {
        PaneConfig {
            position: position.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn groups_panes_into_leaves() {
        let panes = vec![pane("1/1/1"), pane("2/1/1"), pane("2/2/1"), pane("2/2/2")];
        let index = LayoutIndex::build(&panes);

        assert_eq!(index.len(), 4);
        assert!(index.pane(1, 1, 1).is_some());
        assert!(index.pane(2, 1, 1).is_some());
        assert!(index.pane(2, 2, 1).is_some());
        assert!(index.pane(2, 2, 2).is_some());
        assert!(index.pane(1, 2, 1).is_none());
    }

    #[test]
    fn duplicate_position_keeps_last_pane() {
        let mut first = pane("1/1/1");
        first.title = Some("first".into());
        let mut second = pane("1/1/1");
        second.title = Some("second".into());

        let index = LayoutIndex::build(&[first, second]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.pane(1, 1, 1).unwrap().title.as_deref(), Some("second"));
    }

    #[test]
    fn normalizes_partial_positions() {
        let index = LayoutIndex::build(&[pane("3")]);
        let stored = index.pane(3, 1, 1).unwrap();
        assert_eq!(stored.position, "3/1/1");
    }

    #[test]
    fn malformed_position_is_skipped() {
        let index = LayoutIndex::build(&[pane("1/1/1"), pane("nope"), pane("2/1/1")]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn iteration_order_is_sorted() {
        let index = LayoutIndex::build(&[pane("3"), pane("1"), pane("2/2"), pane("2")]);
        let cols: Vec<_> = index.columns().collect();
        assert_eq!(cols, [1, 2, 3]);
        let rows: Vec<_> = index.rows(2).collect();
        assert_eq!(rows, [1, 2]);
    }
}
