use crate::error::{Result, SheetError};

/// Parse A1-style cell notation (e.g., "A1", "Z99", "AA1")
/// Returns (row, column) as 1-based indices
pub fn parse_a1(notation: &str) -> Result<(usize, usize)> {
    let notation = notation.trim().to_uppercase();
    let split_pos = notation
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(|| SheetError::InvalidCellNotation(notation.clone()))?;

    let (col_part, row_part) = notation.split_at(split_pos);
    if col_part.is_empty() || !col_part.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(SheetError::InvalidCellNotation(notation));
    }

    let row = row_part
        .parse::<usize>()
        .map_err(|_| SheetError::InvalidCellNotation(notation.clone()))?;
    if row == 0 {
        return Err(SheetError::InvalidCellNotation(notation));
    }

    Ok((row, parse_column_letters(col_part)))
}

/// Column letters to a 1-based index (A=1, Z=26, AA=27)
fn parse_column_letters(letters: &str) -> usize {
    letters
        .bytes()
        .fold(0, |acc, b| acc * 26 + usize::from(b - b'A' + 1))
}
