use crate::error::Result;
use sheetdelta_sheet::{Cell, Sheet};

/// Append-only accumulator for one output sheet.
///
/// Rows are written at a cursor that starts on the header row and only moves
/// forward. The builder also carries the sheet's difference flag and the row
/// held back for relocation.
#[derive(Debug, Clone)]
pub struct SheetBuilder {
    sheet: Sheet,
    next_row: usize,
    has_differences: bool,
    deferred_row: Option<usize>,
}

impl SheetBuilder {
    #[must_use]
    pub fn new(name: &str, first_row: usize) -> Self {
        SheetBuilder {
            sheet: Sheet::with_name(name),
            next_row: first_row,
            has_differences: false,
            deferred_row: None,
        }
    }

    /// Row the next `push_row` writes to
    #[must_use]
    pub fn next_row(&self) -> usize {
        self.next_row
    }

    /// Write cells at the cursor, starting in column 1, and advance it.
    /// Returns the row written.
    pub fn push_row(&mut self, cells: Vec<Cell>) -> Result<usize> {
        let row = self.next_row;
        for (idx, cell) in cells.into_iter().enumerate() {
            if cell.is_empty() && cell.style.is_plain() {
                continue;
            }
            self.sheet.set_cell(row, idx + 1, cell)?;
        }
        self.next_row += 1;
        Ok(row)
    }

    /// Write a cell outside the cursor, e.g. preamble rows above the header
    pub fn put(&mut self, row: usize, col: usize, cell: Cell) -> Result<()> {
        self.sheet.set_cell(row, col, cell)?;
        Ok(())
    }

    pub fn mark_difference(&mut self) {
        self.has_differences = true;
    }

    #[must_use]
    pub fn has_differences(&self) -> bool {
        self.has_differences
    }

    /// Hold back an old-side row; a later call replaces an earlier one
    pub fn defer_row(&mut self, row: usize) {
        self.deferred_row = Some(row);
    }

    #[must_use]
    pub fn deferred_row(&self) -> Option<usize> {
        self.deferred_row
    }

    #[must_use]
    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    pub fn sheet_mut(&mut self) -> &mut Sheet {
        &mut self.sheet
    }

    /// The finished sheet and whether it differs
    #[must_use]
    pub fn finish(self) -> (Sheet, bool) {
        (self.sheet, self.has_differences)
    }
}
