//! Structural comparison of two spreadsheet documents.
//!
//! Sheets are paired by index. For each pair the header rows are reconciled
//! into one unified column order, data rows are matched by a composite key
//! built from configurable unique columns, and every cell is rendered into an
//! output sheet: unchanged values plainly, deleted content struck through in
//! red, added content underlined in green, and changed cells as two rich text
//! runs holding the old and the new text.
//!
//! # Examples
//!
//! ```
//! use sheetdelta_diff::{compare_books, CompareOptions};
//! use sheetdelta_sheet::{Book, Sheet};
//!
//! let mut old = Book::new();
//! old.add_sheet("People", Sheet::from_data(vec![
//!     vec!["ID", "Name"],
//!     vec!["1", "Alice"],
//!     vec!["2", "Bob"],
//! ])).unwrap();
//!
//! let mut new = Book::new();
//! new.add_sheet("People", Sheet::from_data(vec![
//!     vec!["ID", "Name"],
//!     vec!["1", "Alicia"],
//!     vec!["3", "Carol"],
//! ])).unwrap();
//!
//! let options = CompareOptions {
//!     header_rows: vec![1],
//!     unique_columns: vec![1],
//!     ..CompareOptions::default()
//! };
//! let diff = compare_books(&old, &new, &options).unwrap();
//!
//! assert!(diff.has_differences);
//! let sheet = diff.book.get_sheet("People").unwrap();
//! assert_eq!(sheet.text(2, 2), "AliceAlicia");
//! assert_eq!(sheet.text(3, 2), "Bob");
//! assert_eq!(sheet.text(4, 2), "Carol");
//! ```

pub mod builder;
pub mod cell_diff;
pub mod compare;
pub mod error;
pub mod header;
pub mod layout;
pub mod logging;
pub mod merge;
pub mod options;
pub mod post_process;
pub mod row_key;

pub use builder::SheetBuilder;
pub use cell_diff::{diff_cell, CellOutcome};
pub use compare::{compare, compare_books, compare_books_with, warm_up, BookDiff, CompareOutcome};
pub use error::{DiffError, Result};
pub use header::HeaderMap;
pub use layout::{AlignedSheet, ColumnLayout, ColumnSlot, Side};
pub use merge::{SheetDiff, SheetMerger};
pub use options::{
    CompareOptions, CompareRequest, DiffPalette, MarkerClassifier, RelocationPolicy, RowClassifier,
};
pub use row_key::{RowKeyer, RowMap};
