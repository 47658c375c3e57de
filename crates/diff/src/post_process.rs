//! Cleanup applied to an output sheet once every row has been rendered.

use crate::builder::SheetBuilder;
use crate::error::Result;
use crate::layout::AlignedSheet;
use crate::options::DiffPalette;
use sheetdelta_sheet::{Cell, Sheet};

/// Carry column widths over and format the header row.
///
/// A unified column takes its width and header boldness from the old side
/// when it has a source there. Columns that exist only on the new side take
/// the new width, and their header is bold in the added color.
pub fn apply_column_formats(
    out: &mut Sheet,
    old: &AlignedSheet<'_>,
    new: &AlignedSheet<'_>,
    header_row: usize,
    palette: &DiffPalette,
) -> Result<()> {
    for col in 1..=old.width() {
        match (old.source_column(col), new.source_column(col)) {
            (Some(source), new_source) => {
                let width = old
                    .sheet()
                    .column_width(source)
                    .or_else(|| new_source.and_then(|c| new.sheet().column_width(c)));
                if let Some(width) = width {
                    out.set_column_width(col, width);
                }
                let bold = old
                    .sheet()
                    .cell(header_row, source)
                    .is_some_and(|cell| cell.style.bold);
                if bold {
                    out.cell_mut(header_row, col)?.style.bold = true;
                }
            }
            (None, Some(source)) => {
                if let Some(width) = new.sheet().column_width(source) {
                    out.set_column_width(col, width);
                }
                let header = out.cell_mut(header_row, col)?;
                header.style.bold = true;
                header.style.font_color = Some(palette.added);
            }
            (None, None) => {}
        }
    }
    Ok(())
}

/// Copy a held-back old-side row, values and styles, to the end of the output.
/// Returns the row it was written to.
pub fn relocate_row(builder: &mut SheetBuilder, old: &AlignedSheet<'_>, row: usize) -> Result<usize> {
    let cells: Vec<Cell> = (1..=old.width())
        .map(|col| old.cell(row, col).cloned().unwrap_or_default())
        .collect();
    builder.push_row(cells)
}

/// Delete rows `from..=to` that hold no value, bottom-up. Rows past the end
/// of the stored grid are skipped. Returns how many rows were deleted.
pub fn prune_empty_rows(sheet: &mut Sheet, from: usize, to: usize) -> Result<usize> {
    let mut deleted = 0;
    for row in (from.max(1)..=to).rev() {
        if row > sheet.row_count() {
            continue;
        }
        if sheet.is_row_empty(row) {
            sheet.delete_row(row)?;
            deleted += 1;
        }
    }
    Ok(deleted)
}

/// Delete columns whose header cell is empty, right to left, between the
/// first and last used columns. Returns how many columns were deleted.
pub fn prune_empty_columns(sheet: &mut Sheet, header_row: usize) -> Result<usize> {
    let first = sheet.first_used_column();
    let last = sheet.last_used_column();
    if last == 0 {
        return Ok(0);
    }

    let mut deleted = 0;
    for col in (first..=last).rev() {
        if sheet.is_cell_empty(header_row, col) {
            sheet.delete_column(col)?;
            deleted += 1;
        }
    }
    Ok(deleted)
}
