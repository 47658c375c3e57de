//! Worksheet model for sheetdelta
//!
//! A [`Book`] is an ordered set of named [`Sheet`]s. Sheets hold styled
//! [`Cell`]s addressed by 1-based (row, column), the way spreadsheet
//! applications number them. Books are read from XLSX through `calamine`
//! (values) and `umya-spreadsheet` (fonts, number formats, column widths), and
//! written through `rust_xlsxwriter`.
//!
//! # Examples
//!
//! ```
//! use sheetdelta_sheet::{Book, Sheet};
//!
//! let sheet = Sheet::from_data(vec![
//!     vec!["ID", "Name"],
//!     vec!["1", "Alice"],
//! ]);
//!
//! assert_eq!(sheet.text(2, 2), "Alice");
//! assert_eq!(sheet.last_used_row(), 2);
//! assert_eq!(sheet.last_used_column(), 2);
//!
//! let mut book = Book::new();
//! book.add_sheet("People", sheet).unwrap();
//! assert_eq!(book.sheet_names(), vec!["People"]);
//! ```
//!
//! ## XLSX round trip
//!
//! ```
//! use sheetdelta_sheet::{Book, Sheet};
//!
//! let mut book = Book::new();
//! book.add_sheet("Data", Sheet::from_data(vec![vec!["a", "b"]])).unwrap();
//!
//! let bytes = book.to_xlsx_bytes().unwrap();
//! let loaded = Book::from_xlsx_bytes(&bytes).unwrap();
//! assert_eq!(loaded.get_sheet("Data").unwrap().text(1, 2), "b");
//! ```

mod a1_notation;
mod book;
mod cell;
mod error;
mod sheet;
mod xlsx;

/// Re-export book type.
pub use book::Book;
/// Re-export cell types.
pub use cell::{Cell, CellStyle, CellValue, Color, ExcelDate, TextRun};
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export sheet type.
pub use sheet::Sheet;
