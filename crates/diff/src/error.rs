use sheetdelta_sheet::SheetError;
use thiserror::Error;

/// Errors raised while comparing two books
#[derive(Error, Debug)]
pub enum DiffError {
    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error("Invalid {field} list '{value}': expected comma-separated non-negative integers")]
    InvalidIndexList { field: &'static str, value: String },

    #[error("No unique columns given")]
    NoUniqueColumns,

    #[error("Unique column positions are 1-based, got 0")]
    ZeroUniqueColumn,

    #[error("No header row given for sheet index {sheet_index}")]
    MissingHeaderRow { sheet_index: usize },

    #[error("Header row {row} is outside sheet '{sheet}' (last used row {last_used_row})")]
    HeaderRowOutOfRange {
        sheet: String,
        row: usize,
        last_used_row: usize,
    },

    #[error("Old document has no sheet at index {index} ({available} sheets)")]
    MissingSheet { index: usize, available: usize },

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Failed to process sheet index {index} ('{name}')")]
    SheetFailed {
        index: usize,
        name: String,
        #[source]
        source: Box<DiffError>,
    },
}

pub type Result<T> = std::result::Result<T, DiffError>;
