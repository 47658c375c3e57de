use crate::layout::AlignedSheet;
use std::collections::HashMap;

/// Builds composite row keys from unified column positions.
#[derive(Debug, Clone, Copy)]
pub struct RowKeyer<'a> {
    unique_columns: &'a [usize],
}

impl<'a> RowKeyer<'a> {
    #[must_use]
    pub fn new(unique_columns: &'a [usize]) -> Self {
        RowKeyer { unique_columns }
    }

    /// Key of a row: the texts of the unique columns, concatenated in the
    /// configured order. A row whose first unified column is empty always
    /// gets the empty key, so blank trailing rows never match each other.
    #[must_use]
    pub fn key(&self, view: &AlignedSheet<'_>, row: usize) -> String {
        if view.is_empty(row, 1) {
            return String::new();
        }
        self.unique_columns
            .iter()
            .map(|&col| view.text(row, col))
            .collect()
    }

    /// Map every keyed data row below the header to its row number
    #[must_use]
    pub fn build_map(&self, view: &AlignedSheet<'_>, header_row: usize) -> RowMap {
        let mut rows = HashMap::new();

        for row in header_row + 1..=view.last_used_row() {
            let key = self.key(view, row);
            if key.is_empty() {
                continue;
            }
            if let Some(previous) = rows.insert(key, row) {
                tracing::debug!(
                    sheet = view.sheet().name(),
                    row,
                    previous,
                    "duplicate row key, keeping the later row"
                );
            }
        }

        RowMap { rows }
    }
}

/// Row key to 1-based row number for one side of a sheet comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowMap {
    rows: HashMap<String, usize>,
}

impl RowMap {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<usize> {
        self.rows.get(key).copied()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.rows.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
