//! Column reconciliation.
//!
//! The two header rows are walked side by side and merged into a
//! [`ColumnLayout`]: a list of unified columns, each naming the source column
//! on the old side, the new side, or both. Neither input sheet is modified;
//! the merge step reads both sheets through [`AlignedSheet`] views.

use crate::header::{header_texts, HeaderMap};
use sheetdelta_sheet::{Cell, Sheet};

/// Which input a view reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Old,
    New,
}

/// One unified column: the 1-based source column on each side, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSlot {
    pub old: Option<usize>,
    pub new: Option<usize>,
}

impl ColumnSlot {
    #[must_use]
    pub fn both(old: usize, new: usize) -> Self {
        ColumnSlot {
            old: Some(old),
            new: Some(new),
        }
    }

    #[must_use]
    pub fn old_only(old: usize) -> Self {
        ColumnSlot {
            old: Some(old),
            new: None,
        }
    }

    #[must_use]
    pub fn new_only(new: usize) -> Self {
        ColumnSlot {
            old: None,
            new: Some(new),
        }
    }

    #[must_use]
    pub fn source(&self, side: Side) -> Option<usize> {
        match side {
            Side::Old => self.old,
            Side::New => self.new,
        }
    }
}

/// The unified column order shared by both sides of a sheet comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnLayout {
    slots: Vec<ColumnSlot>,
}

impl ColumnLayout {
    /// Reconcile the header rows of two sheets.
    ///
    /// A header missing from the other side's map gets a column of its own
    /// with nothing opposite it. When both current headers are missing from
    /// the other side, the old column is placed first. Empty headers are
    /// never found in a map, so they always get a column of their own.
    #[must_use]
    pub fn reconcile(
        old: &Sheet,
        new: &Sheet,
        header_row: usize,
        old_map: &HeaderMap,
        new_map: &HeaderMap,
    ) -> Self {
        Self::from_headers(
            &header_texts(old, header_row),
            &header_texts(new, header_row),
            old_map,
            new_map,
        )
    }

    /// Reconcile two header rows already read as text
    #[must_use]
    pub fn from_headers(
        old_headers: &[String],
        new_headers: &[String],
        old_map: &HeaderMap,
        new_map: &HeaderMap,
    ) -> Self {
        let mut slots = Vec::with_capacity(old_headers.len().max(new_headers.len()));
        let (mut i, mut j) = (0, 0);

        loop {
            match (old_headers.get(i), new_headers.get(j)) {
                (None, None) => break,
                (Some(_), None) => {
                    slots.push(ColumnSlot::old_only(i + 1));
                    i += 1;
                }
                (None, Some(_)) => {
                    slots.push(ColumnSlot::new_only(j + 1));
                    j += 1;
                }
                (Some(old_header), Some(new_header)) => {
                    let old_missing = !new_map.contains(old_header);
                    let new_missing = !old_map.contains(new_header);

                    match (old_missing, new_missing) {
                        (true, true) => {
                            slots.push(ColumnSlot::old_only(i + 1));
                            slots.push(ColumnSlot::new_only(j + 1));
                            i += 1;
                            j += 1;
                        }
                        (true, false) => {
                            slots.push(ColumnSlot::old_only(i + 1));
                            i += 1;
                        }
                        (false, true) => {
                            slots.push(ColumnSlot::new_only(j + 1));
                            j += 1;
                        }
                        (false, false) => {
                            slots.push(ColumnSlot::both(i + 1, j + 1));
                            i += 1;
                            j += 1;
                        }
                    }
                }
            }
        }

        ColumnLayout { slots }
    }

    /// Number of unified columns
    #[must_use]
    pub fn width(&self) -> usize {
        self.slots.len()
    }

    /// Slot of a 1-based unified column
    #[must_use]
    pub fn slot(&self, col: usize) -> Option<ColumnSlot> {
        col.checked_sub(1).and_then(|idx| self.slots.get(idx)).copied()
    }

    #[must_use]
    pub fn slots(&self) -> &[ColumnSlot] {
        &self.slots
    }

    /// Source column on `side` for a 1-based unified column
    #[must_use]
    pub fn source(&self, side: Side, col: usize) -> Option<usize> {
        self.slot(col).and_then(|slot| slot.source(side))
    }
}

/// Read-only view of one input sheet in unified column order.
#[derive(Debug, Clone, Copy)]
pub struct AlignedSheet<'a> {
    sheet: &'a Sheet,
    layout: &'a ColumnLayout,
    side: Side,
}

impl<'a> AlignedSheet<'a> {
    #[must_use]
    pub fn new(sheet: &'a Sheet, layout: &'a ColumnLayout, side: Side) -> Self {
        AlignedSheet {
            sheet,
            layout,
            side,
        }
    }

    #[must_use]
    pub fn sheet(&self) -> &'a Sheet {
        self.sheet
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// Unified width, identical for both sides
    #[must_use]
    pub fn width(&self) -> usize {
        self.layout.width()
    }

    #[must_use]
    pub fn last_used_row(&self) -> usize {
        self.sheet.last_used_row()
    }

    /// Source column behind a unified column
    #[must_use]
    pub fn source_column(&self, col: usize) -> Option<usize> {
        self.layout.source(self.side, col)
    }

    /// Cell at a row and unified column; `None` for placeholder columns
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&'a Cell> {
        self.source_column(col)
            .and_then(|source| self.sheet.cell(row, source))
    }

    #[must_use]
    pub fn text(&self, row: usize, col: usize) -> String {
        self.cell(row, col).map(Cell::text).unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).map_or(true, Cell::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn layout_of(old: &[&str], new: &[&str]) -> ColumnLayout {
        let old = Sheet::from_data(vec![old.to_vec()]);
        let new = Sheet::from_data(vec![new.to_vec()]);
        ColumnLayout::reconcile(
            &old,
            &new,
            1,
            &HeaderMap::build(&old, 1),
            &HeaderMap::build(&new, 1),
        )
    }

    fn headers(layout: &ColumnLayout, sheet: &[&str], side: Side) -> Vec<String> {
        let sheet = Sheet::from_data(vec![sheet.to_vec()]);
        let view = AlignedSheet::new(&sheet, layout, side);
        (1..=view.width()).map(|col| view.text(1, col)).collect()
    }

    #[test]
    fn test_identical_headers_pair_up() {
        let layout = layout_of(&["ID", "Name"], &["ID", "Name"]);
        assert_eq!(
            layout.slots(),
            &[ColumnSlot::both(1, 1), ColumnSlot::both(2, 2)]
        );
    }

    #[test]
    fn test_removed_column_gets_placeholder_on_new_side() {
        let old = ["X", "Y", "Z"];
        let new = ["X", "Z"];
        let layout = layout_of(&old, &new);

        assert_eq!(headers(&layout, &old, Side::Old), vec!["X", "Y", "Z"]);
        assert_eq!(headers(&layout, &new, Side::New), vec!["X", "", "Z"]);
    }

    #[test]
    fn test_added_column_gets_placeholder_on_old_side() {
        let old = ["X"];
        let new = ["Y", "X"];
        let layout = layout_of(&old, &new);

        assert_eq!(headers(&layout, &old, Side::Old), vec!["", "X"]);
        assert_eq!(headers(&layout, &new, Side::New), vec!["Y", "X"]);
    }

    #[test]
    fn test_both_missing_places_old_first() {
        let old = ["P", "Q"];
        let new = ["R", "S"];
        let layout = layout_of(&old, &new);

        assert_eq!(headers(&layout, &old, Side::Old), vec!["P", "", "Q", ""]);
        assert_eq!(headers(&layout, &new, Side::New), vec!["", "R", "", "S"]);
    }

    #[test]
    fn test_reordered_columns_stay_positional() {
        let old = ["A", "B"];
        let new = ["B", "A"];
        let layout = layout_of(&old, &new);
        assert_eq!(
            layout.slots(),
            &[ColumnSlot::both(1, 1), ColumnSlot::both(2, 2)]
        );
    }

    #[test]
    fn test_every_header_appears_once_per_side() {
        let old = ["K", "A", "B", "C", "D"];
        let new = ["K", "C", "E", "A", "F", "G"];
        let layout = layout_of(&old, &new);

        let old_seen = headers(&layout, &old, Side::Old);
        let new_seen = headers(&layout, &new, Side::New);
        assert_eq!(old_seen.len(), new_seen.len());

        for header in old {
            assert_eq!(old_seen.iter().filter(|h| *h == header).count(), 1);
        }
        for header in new {
            assert_eq!(new_seen.iter().filter(|h| *h == header).count(), 1);
        }
    }

    #[test]
    fn test_empty_headers_get_their_own_columns() {
        let old = Sheet::from_data(vec![vec!["ID", ""], vec!["1", "x"]]);
        let new = Sheet::from_data(vec![vec!["ID", ""], vec!["1", "y"]]);
        let layout = ColumnLayout::reconcile(
            &old,
            &new,
            1,
            &HeaderMap::build(&old, 1),
            &HeaderMap::build(&new, 1),
        );
        assert_eq!(
            layout.slots(),
            &[
                ColumnSlot::both(1, 1),
                ColumnSlot::old_only(2),
                ColumnSlot::new_only(2)
            ]
        );
    }

    #[test]
    fn test_data_columns_beyond_headers_are_covered() {
        let old = Sheet::from_data(vec![vec!["ID", ""], vec!["1", "extra"]]);
        let new = Sheet::from_data(vec![vec!["ID"], vec!["1"]]);
        let layout = ColumnLayout::reconcile(
            &old,
            &new,
            1,
            &HeaderMap::build(&old, 1),
            &HeaderMap::build(&new, 1),
        );
        let view = AlignedSheet::new(&old, &layout, Side::Old);
        assert_eq!(view.width(), 2);
        assert_eq!(view.text(2, 2), "extra");
    }
}
