//! Document-level comparison and the byte-level entry point.

use crate::error::{DiffError, Result};
use crate::logging::report_error;
use crate::merge::SheetMerger;
use crate::options::{CompareOptions, CompareRequest, MarkerClassifier, RowClassifier};
use sheetdelta_sheet::Book;
use tracing::{debug, info};

/// Name of the only sheet of the warm-up document
pub const WARM_UP_SHEET: &str = "WarmUpSheet";

/// Result of comparing two books.
#[derive(Debug, Clone, PartialEq)]
pub struct BookDiff {
    /// One sheet per sheet of the new book, in its order and under its names
    pub book: Book,
    pub has_differences: bool,
}

/// Result of the byte-level comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareOutcome {
    /// The annotated document as XLSX
    pub result_excel: Vec<u8>,
    pub are_files_different: bool,
}

/// Compare two books, relocating rows that contain the configured marker.
pub fn compare_books(old: &Book, new: &Book, options: &CompareOptions) -> Result<BookDiff> {
    let classifier = MarkerClassifier::new(&options.relocation.marker);
    compare_books_with(old, new, options, &classifier)
}

/// Compare two books with a caller-supplied row classifier.
///
/// Sheets are paired by index; every sheet of `new` needs a counterpart in
/// `old`. The first sheet that fails aborts the whole comparison.
pub fn compare_books_with(
    old: &Book,
    new: &Book,
    options: &CompareOptions,
    classifier: &dyn RowClassifier,
) -> Result<BookDiff> {
    let merger = SheetMerger::new(options, classifier);
    let mut book = Book::new();
    let mut has_differences = false;

    for (index, (name, new_sheet)) in new.sheets().enumerate() {
        let merged = old
            .get_sheet_by_index(index)
            .map_err(|_| DiffError::MissingSheet {
                index,
                available: old.sheet_count(),
            })
            .and_then(|old_sheet| merger.merge(index, old_sheet, new_sheet));

        let diff = match merged {
            Ok(diff) => diff,
            Err(err) => {
                report_error(&format!("Failed to process sheet index {index}"), &err);
                return Err(DiffError::SheetFailed {
                    index,
                    name: name.to_string(),
                    source: Box::new(err),
                });
            }
        };

        has_differences |= diff.has_differences;
        book.add_sheet(name, diff.sheet)?;
    }

    info!(
        sheets = book.sheet_count(),
        has_differences, "books compared"
    );
    Ok(BookDiff {
        book,
        has_differences,
    })
}

/// Compare two XLSX documents and return the annotated document.
///
/// With `request.warm_up` set the inputs are not read at all; see [`warm_up`].
///
/// # Examples
///
/// ```
/// use sheetdelta_diff::{compare, CompareRequest};
///
/// let outcome = compare(&[], &[], &CompareRequest {
///     warm_up: true,
///     ..CompareRequest::default()
/// })
/// .unwrap();
/// assert!(!outcome.are_files_different);
/// assert!(!outcome.result_excel.is_empty());
/// ```
pub fn compare(excel_a: &[u8], excel_b: &[u8], request: &CompareRequest) -> Result<CompareOutcome> {
    if request.warm_up {
        return warm_up();
    }

    run(excel_a, excel_b, request).map_err(|err| {
        if !is_reported(&err) {
            report_error("Comparison failed", &err);
        }
        err
    })
}

/// Sheet failures are logged by [`compare_books_with`] as they happen
fn is_reported(err: &DiffError) -> bool {
    matches!(err, DiffError::SheetFailed { .. })
}

fn run(excel_a: &[u8], excel_b: &[u8], request: &CompareRequest) -> Result<CompareOutcome> {
    let options = request.to_options()?;
    let old = Book::from_xlsx_bytes(excel_a)?;
    let new = Book::from_xlsx_bytes(excel_b)?;
    debug!(
        old_sheets = old.sheet_count(),
        new_sheets = new.sheet_count(),
        "documents loaded"
    );

    let diff = compare_books(&old, &new, &options)?;
    Ok(CompareOutcome {
        result_excel: diff.book.to_xlsx_bytes()?,
        are_files_different: diff.has_differences,
    })
}

/// Build, write and read back a one-cell document so the XLSX codec is
/// loaded before the first real comparison.
pub fn warm_up() -> Result<CompareOutcome> {
    let mut book = Book::new();
    book.add_empty_sheet(WARM_UP_SHEET)?.set_a1("A1", "Warm-up")?;

    let result_excel = book.to_xlsx_bytes()?;
    let check = Book::from_xlsx_bytes(&result_excel)?;
    debug!(sheets = check.sheet_count(), bytes = result_excel.len(), "warm-up done");

    Ok(CompareOutcome {
        result_excel,
        are_files_different: false,
    })
}
