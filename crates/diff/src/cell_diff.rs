use crate::options::DiffPalette;
use sheetdelta_sheet::{Cell, CellValue, TextRun};

/// What comparing two cells found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOutcome {
    /// Neither side has a value
    Empty,
    /// Same displayed text on both sides
    Unchanged,
    /// Only the old side has a value
    Deleted,
    /// Only the new side has a value
    Added,
    /// Both sides have values with different text
    Changed,
}

impl CellOutcome {
    #[must_use]
    pub fn is_difference(self) -> bool {
        matches!(
            self,
            CellOutcome::Deleted | CellOutcome::Added | CellOutcome::Changed
        )
    }
}

fn has_value(cell: Option<&Cell>) -> bool {
    cell.is_some_and(|c| !c.is_empty())
}

fn value_of(cell: Option<&Cell>) -> CellValue {
    cell.map(|c| c.value.clone()).unwrap_or_default()
}

/// Compare two cells by displayed text and render the merged cell.
///
/// Formatting on the inputs is ignored: unchanged cells come out unstyled,
/// and a changed cell becomes two rich text runs, old then new.
#[must_use]
pub fn diff_cell(old: Option<&Cell>, new: Option<&Cell>, palette: &DiffPalette) -> (Cell, CellOutcome) {
    match (has_value(old), has_value(new)) {
        (false, false) => (Cell::default(), CellOutcome::Empty),
        (true, false) => (
            Cell::styled(value_of(old), palette.deleted_style()),
            CellOutcome::Deleted,
        ),
        (false, true) => (
            Cell::styled(value_of(new), palette.added_style()),
            CellOutcome::Added,
        ),
        (true, true) => {
            let old_text = old.map(Cell::text).unwrap_or_default();
            let new_text = new.map(Cell::text).unwrap_or_default();
            if old_text == new_text {
                (Cell::new(value_of(old)), CellOutcome::Unchanged)
            } else {
                let runs = vec![
                    TextRun::new(old_text, palette.deleted_style()),
                    TextRun::new(new_text, palette.added_style()),
                ];
                (Cell::new(CellValue::RichText(runs)), CellOutcome::Changed)
            }
        }
    }
}

/// Render a cell of a wholly deleted row; blanks keep the deleted style too
#[must_use]
pub fn mark_deleted(cell: Option<&Cell>, palette: &DiffPalette) -> Cell {
    Cell::styled(value_of(cell), palette.deleted_style())
}

/// Render a cell of a wholly added row; blanks keep the added style too
#[must_use]
pub fn mark_added(cell: Option<&Cell>, palette: &DiffPalette) -> Cell {
    Cell::styled(value_of(cell), palette.added_style())
}
