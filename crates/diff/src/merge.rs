//! Per-sheet comparison.
//!
//! A sheet pair goes through four phases: column reconciliation, header
//! comparison, the keyed row scan and cleanup. Ignored sheets skip all of
//! them and are copied from the new side as they are.

use crate::builder::SheetBuilder;
use crate::cell_diff::{diff_cell, mark_added, mark_deleted};
use crate::error::{DiffError, Result};
use crate::header::HeaderMap;
use crate::layout::{AlignedSheet, ColumnLayout, Side};
use crate::options::{CompareOptions, RowClassifier};
use crate::post_process;
use crate::row_key::RowKeyer;
use sheetdelta_sheet::{Cell, Sheet};
use tracing::debug;

/// Output of one sheet comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetDiff {
    pub sheet: Sheet,
    pub has_differences: bool,
}

#[derive(Debug, Clone, Copy)]
enum WholeRow {
    Deleted,
    Added,
}

/// Compares one sheet of the old book with the sheet at the same index of
/// the new book.
pub struct SheetMerger<'a> {
    options: &'a CompareOptions,
    classifier: &'a dyn RowClassifier,
}

impl<'a> SheetMerger<'a> {
    #[must_use]
    pub fn new(options: &'a CompareOptions, classifier: &'a dyn RowClassifier) -> Self {
        SheetMerger {
            options,
            classifier,
        }
    }

    /// Merge `old` and `new` into one annotated sheet named after `new`.
    pub fn merge(&self, sheet_index: usize, old: &Sheet, new: &Sheet) -> Result<SheetDiff> {
        if self.options.is_ignored(sheet_index) {
            debug!(sheet_index, name = new.name(), "sheet ignored, copying new side");
            return Ok(SheetDiff {
                sheet: new.clone(),
                has_differences: false,
            });
        }

        self.options.validate()?;
        let header_row = self.options.header_row(sheet_index)?;
        check_header_row(old, header_row)?;
        check_header_row(new, header_row)?;

        let mut builder = SheetBuilder::new(new.name(), header_row);
        copy_preamble(old, new, header_row, &mut builder)?;

        let old_headers = HeaderMap::build(old, header_row);
        let new_headers = HeaderMap::build(new, header_row);
        let layout = ColumnLayout::reconcile(old, new, header_row, &old_headers, &new_headers);
        let old_view = AlignedSheet::new(old, &layout, Side::Old);
        let new_view = AlignedSheet::new(new, &layout, Side::New);
        debug!(
            sheet_index,
            name = new.name(),
            header_row,
            columns = layout.width(),
            "columns reconciled"
        );

        self.compare_header(
            &old_view,
            &new_view,
            header_row,
            &old_headers,
            &new_headers,
            &mut builder,
        )?;
        self.scan_rows(&old_view, &new_view, header_row, &mut builder)?;

        post_process::apply_column_formats(
            builder.sheet_mut(),
            &old_view,
            &new_view,
            header_row,
            &self.options.palette,
        )?;
        if let Some(row) = builder.deferred_row() {
            if self.options.relocates_on(sheet_index) {
                let written = post_process::relocate_row(&mut builder, &old_view, row)?;
                debug!(sheet_index, from = row, to = written, "relocated held-back row");
            } else {
                debug!(sheet_index, row, "dropping held-back row");
            }
        }

        let last_written = builder.next_row().saturating_sub(1);
        let (mut sheet, has_differences) = builder.finish();
        post_process::prune_empty_rows(&mut sheet, header_row, last_written)?;
        post_process::prune_empty_columns(&mut sheet, header_row)?;

        debug!(sheet_index, name = sheet.name(), has_differences, "sheet compared");
        Ok(SheetDiff {
            sheet,
            has_differences,
        })
    }

    fn compare_header(
        &self,
        old: &AlignedSheet<'_>,
        new: &AlignedSheet<'_>,
        header_row: usize,
        old_headers: &HeaderMap,
        new_headers: &HeaderMap,
        builder: &mut SheetBuilder,
    ) -> Result<()> {
        if new_headers.contains(&old.text(header_row, 1)) {
            self.diff_rows(old, header_row, new, header_row, builder)?;
        } else {
            self.render_whole_row(old, header_row, WholeRow::Deleted, builder)?;
        }

        if !old_headers.contains(&new.text(header_row, 1)) {
            self.render_whole_row(new, header_row, WholeRow::Added, builder)?;
        }
        Ok(())
    }

    fn scan_rows(
        &self,
        old: &AlignedSheet<'_>,
        new: &AlignedSheet<'_>,
        header_row: usize,
        builder: &mut SheetBuilder,
    ) -> Result<()> {
        let keyer = RowKeyer::new(&self.options.unique_columns);
        let old_rows = keyer.build_map(old, header_row);
        let new_rows = keyer.build_map(new, header_row);
        let last_row = old.last_used_row().max(new.last_used_row());

        for row in header_row + 1..=last_row {
            if self.classifier.is_relocatable(&old.text(row, 1)) {
                builder.defer_row(row);
                continue;
            }

            match new_rows.get(&keyer.key(old, row)) {
                Some(new_row) => self.diff_rows(old, row, new, new_row, builder)?,
                None => self.render_whole_row(old, row, WholeRow::Deleted, builder)?,
            }

            if !old_rows.contains(&keyer.key(new, row)) {
                self.render_whole_row(new, row, WholeRow::Added, builder)?;
            }
        }
        Ok(())
    }

    fn diff_rows(
        &self,
        old: &AlignedSheet<'_>,
        old_row: usize,
        new: &AlignedSheet<'_>,
        new_row: usize,
        builder: &mut SheetBuilder,
    ) -> Result<()> {
        let mut differs = false;
        let cells: Vec<Cell> = (1..=old.width())
            .map(|col| {
                let (cell, outcome) = diff_cell(
                    old.cell(old_row, col),
                    new.cell(new_row, col),
                    &self.options.palette,
                );
                differs |= outcome.is_difference();
                cell
            })
            .collect();

        if differs {
            builder.mark_difference();
        }
        builder.push_row(cells)?;
        Ok(())
    }

    fn render_whole_row(
        &self,
        view: &AlignedSheet<'_>,
        row: usize,
        mark: WholeRow,
        builder: &mut SheetBuilder,
    ) -> Result<()> {
        let palette = &self.options.palette;
        let cells: Vec<Cell> = (1..=view.width())
            .map(|col| match mark {
                WholeRow::Deleted => mark_deleted(view.cell(row, col), palette),
                WholeRow::Added => mark_added(view.cell(row, col), palette),
            })
            .collect();

        // Blank rows are rendered too, then pruned; they are not a difference.
        if cells.iter().any(|cell| !cell.is_empty()) {
            builder.mark_difference();
        }
        builder.push_row(cells)?;
        Ok(())
    }
}

fn check_header_row(sheet: &Sheet, header_row: usize) -> Result<()> {
    let last_used_row = sheet.last_used_row();
    if header_row == 0 || header_row > last_used_row {
        return Err(DiffError::HeaderRowOutOfRange {
            sheet: sheet.name().to_string(),
            row: header_row,
            last_used_row,
        });
    }
    Ok(())
}

/// Rows above the header come from the old side unchanged, at their
/// physical columns. Columns slotted in by reconciliation do not move them;
/// pruned columns do.
fn copy_preamble(old: &Sheet, new: &Sheet, header_row: usize, builder: &mut SheetBuilder) -> Result<()> {
    let max_columns = old.last_used_column().max(new.last_used_column());
    for row in 1..header_row {
        for (idx, cell) in old.row_cells(row).iter().enumerate().take(max_columns) {
            if cell.is_empty() && cell.style.is_plain() {
                continue;
            }
            builder.put(row, idx + 1, cell.clone())?;
        }
    }
    Ok(())
}
