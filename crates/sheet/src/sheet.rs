use crate::a1_notation::parse_a1;
use crate::cell::{Cell, CellValue};
use crate::error::{Result, SheetError};
use std::collections::BTreeMap;

/// A sheet: a grid of styled cells addressed by 1-based (row, column).
///
/// Storage is row-major and ragged; reading a cell outside the stored area
/// yields an empty cell, writing one grows the grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<Cell>>,
    column_widths: BTreeMap<usize, f64>,
}

impl Sheet {
    /// Create a new empty sheet
    #[must_use]
    pub fn new() -> Self {
        Self::with_name("Sheet1")
    }

    /// Create a new empty sheet with a name
    #[must_use]
    pub fn with_name(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            rows: Vec::new(),
            column_widths: BTreeMap::new(),
        }
    }

    /// Create a sheet from a 2D vector of values; `data[0][0]` lands in A1.
    #[must_use]
    pub fn from_data<T: Into<CellValue>>(data: Vec<Vec<T>>) -> Self {
        let rows = data
            .into_iter()
            .map(|row| row.into_iter().map(Cell::new).collect())
            .collect();

        Sheet {
            name: "Sheet1".to_string(),
            rows,
            column_widths: BTreeMap::new(),
        }
    }

    /// Get the sheet name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Highest row number holding a non-empty cell (0 for an empty sheet)
    #[must_use]
    pub fn last_used_row(&self) -> usize {
        self.rows
            .iter()
            .rposition(|row| row.iter().any(|cell| !cell.is_empty()))
            .map_or(0, |idx| idx + 1)
    }

    /// Highest column number holding a non-empty cell (0 for an empty sheet)
    #[must_use]
    pub fn last_used_column(&self) -> usize {
        self.rows
            .iter()
            .filter_map(|row| row.iter().rposition(|cell| !cell.is_empty()))
            .map(|idx| idx + 1)
            .max()
            .unwrap_or(0)
    }

    /// Lowest column number holding a non-empty cell (0 for an empty sheet)
    #[must_use]
    pub fn first_used_column(&self) -> usize {
        self.rows
            .iter()
            .filter_map(|row| row.iter().position(|cell| !cell.is_empty()))
            .map(|idx| idx + 1)
            .min()
            .unwrap_or(0)
    }

    /// Number of stored rows, including trailing rows that only carry style
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if the sheet holds no values at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.last_used_row() == 0
    }

    // ===== Cell Access =====

    /// Get a stored cell (1-based); `None` when never written
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        if row == 0 || col == 0 {
            return None;
        }
        self.rows.get(row - 1).and_then(|r| r.get(col - 1))
    }

    /// Displayed text of a cell; empty for cells never written
    #[must_use]
    pub fn text(&self, row: usize, col: usize) -> String {
        self.cell(row, col).map(Cell::text).unwrap_or_default()
    }

    /// True when the cell holds no value
    #[must_use]
    pub fn is_cell_empty(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).map_or(true, Cell::is_empty)
    }

    /// Get a mutable cell (1-based), growing the grid as needed
    pub fn cell_mut(&mut self, row: usize, col: usize) -> Result<&mut Cell> {
        if row == 0 || col == 0 {
            return Err(SheetError::IndexOutOfBounds { row, col });
        }
        if self.rows.len() < row {
            self.rows.resize_with(row, Vec::new);
        }
        let cells = &mut self.rows[row - 1];
        if cells.len() < col {
            cells.resize_with(col, Cell::default);
        }
        Ok(&mut cells[col - 1])
    }

    /// Replace a cell (1-based)
    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) -> Result<()> {
        *self.cell_mut(row, col)? = cell;
        Ok(())
    }

    /// Set a cell value (1-based), keeping its style
    pub fn set_value<T: Into<CellValue>>(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.cell_mut(row, col)?.value = value.into();
        Ok(())
    }

    /// Set a cell value by A1 notation
    pub fn set_a1<T: Into<CellValue>>(&mut self, notation: &str, value: T) -> Result<()> {
        let (row, col) = parse_a1(notation)?;
        self.set_value(row, col, value)
    }

    /// Stored cells of a row (1-based); empty slice for rows never written
    #[must_use]
    pub fn row_cells(&self, row: usize) -> &[Cell] {
        if row == 0 {
            return &[];
        }
        self.rows.get(row - 1).map_or(&[], Vec::as_slice)
    }

    /// True when no cell of the row holds a value
    #[must_use]
    pub fn is_row_empty(&self, row: usize) -> bool {
        self.row_cells(row).iter().all(Cell::is_empty)
    }

    /// Iterate over stored cells that carry a value or a style, as
    /// `(row, col, cell)` with 1-based coordinates
    pub fn used_cells(&self) -> impl Iterator<Item = (usize, usize, &Cell)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, cell)| !cell.is_empty() || !cell.style.is_plain())
                .map(move |(c, cell)| (r + 1, c + 1, cell))
        })
    }

    // ===== Structure =====

    /// Delete a row (1-based), shifting the rows below it up
    pub fn delete_row(&mut self, row: usize) -> Result<Vec<Cell>> {
        if row == 0 || row > self.rows.len() {
            return Err(SheetError::RowIndexOutOfBounds {
                index: row,
                count: self.rows.len(),
            });
        }
        Ok(self.rows.remove(row - 1))
    }

    /// Delete a column (1-based), shifting columns to its right left; the
    /// column widths shift with it
    pub fn delete_column(&mut self, col: usize) -> Result<()> {
        if col == 0 {
            let count = self.rows.iter().map(Vec::len).max().unwrap_or(0);
            return Err(SheetError::ColumnIndexOutOfBounds { index: col, count });
        }

        for cells in &mut self.rows {
            if cells.len() >= col {
                cells.remove(col - 1);
            }
        }

        self.column_widths = std::mem::take(&mut self.column_widths)
            .into_iter()
            .filter(|(c, _)| *c != col)
            .map(|(c, w)| if c > col { (c - 1, w) } else { (c, w) })
            .collect();
        Ok(())
    }

    /// Width of a column (1-based), if one was set
    #[must_use]
    pub fn column_width(&self, col: usize) -> Option<f64> {
        self.column_widths.get(&col).copied()
    }

    /// Set the width of a column (1-based)
    pub fn set_column_width(&mut self, col: usize, width: f64) {
        if col > 0 {
            self.column_widths.insert(col, width);
        }
    }

    /// All explicitly set column widths, keyed by 1-based column
    #[must_use]
    pub fn column_widths(&self) -> &BTreeMap<usize, f64> {
        &self.column_widths
    }

    /// Displayed text of every stored cell, row by row; trailing empties kept
    #[must_use]
    pub fn to_text_grid(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(Cell::text).collect())
            .collect()
    }
}
