use sheetdelta_sheet::Sheet;
use std::collections::HashMap;

/// Header text of one sheet mapped to its 1-based column.
///
/// Texts are compared exactly as displayed: no trimming, case-sensitive.
/// Empty header cells are never keys. When the same text heads several
/// columns the rightmost one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    columns: HashMap<String, usize>,
}

impl HeaderMap {
    /// Read the header row over columns 1..=last used column
    #[must_use]
    pub fn build(sheet: &Sheet, header_row: usize) -> Self {
        let headers = header_texts(sheet, header_row);
        let mut columns = HashMap::with_capacity(headers.len());

        for (idx, text) in headers.into_iter().enumerate() {
            if text.is_empty() {
                continue;
            }
            if let Some(previous) = columns.insert(text, idx + 1) {
                tracing::debug!(
                    sheet = sheet.name(),
                    column = idx + 1,
                    previous,
                    "duplicate header text, keeping the later column"
                );
            }
        }

        HeaderMap { columns }
    }

    #[must_use]
    pub fn contains(&self, header: &str) -> bool {
        self.columns.contains_key(header)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Header row texts for columns 1..=last used column of the sheet
#[must_use]
pub fn header_texts(sheet: &Sheet, header_row: usize) -> Vec<String> {
    (1..=sheet.last_used_column())
        .map(|col| sheet.text(header_row, col))
        .collect()
}
