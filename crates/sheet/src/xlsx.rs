use crate::book::Book;
use crate::cell::{Cell, CellStyle, CellValue, Color, ExcelDate, TextRun};
use crate::error::{Result, SheetError};
use crate::sheet::Sheet;
use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{Color as XlsxColor, Format, FormatUnderline, Workbook, Worksheet};
use std::io::Cursor;
use std::path::Path;

/// Width of the widest digit of the default font, in pixels
const MAX_DIGIT_WIDTH: f64 = 7.0;
/// Cell padding Excel adds to every stored column width, in pixels
const COLUMN_PADDING: f64 = 5.0;

/// Convert calamine Data to CellValue
fn data_to_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::String(s.clone()),
        // Excel stores dates as days since 1899-12-30
        Data::DateTime(dt) => CellValue::DateTime(ExcelDate::from_serial(dt.as_f64())),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::String(format!("#ERROR: {e:?}")),
    }
}

/// Build a writer format for a style; `None` for the default style
fn style_to_format(style: &CellStyle) -> Option<Format> {
    if style.is_plain() {
        return None;
    }

    let mut format = Format::new();
    if let Some(color) = style.font_color {
        format = format.set_font_color(XlsxColor::RGB(color.rgb()));
    }
    if style.bold {
        format = format.set_bold();
    }
    if style.strikethrough {
        format = format.set_font_strikethrough();
    }
    if style.underline {
        format = format.set_underline(FormatUnderline::Single);
    }
    Some(format)
}

fn to_row_num(row: usize, col: usize) -> Result<u32> {
    row.checked_sub(1)
        .and_then(|r| u32::try_from(r).ok())
        .ok_or(SheetError::IndexOutOfBounds { row, col })
}

fn to_col_num(row: usize, col: usize) -> Result<u16> {
    col.checked_sub(1)
        .and_then(|c| u16::try_from(c).ok())
        .ok_or(SheetError::IndexOutOfBounds { row, col })
}

/// Font attributes of a stored style; theme colors carry no RGB value and
/// read as no color
fn font_style(style: &umya_spreadsheet::Style) -> CellStyle {
    let Some(font) = style.get_font() else {
        return CellStyle::default();
    };

    let argb = font.get_color().get_argb();
    let font_color = argb
        .get(argb.len().saturating_sub(6)..)
        .filter(|rgb| rgb.len() == 6)
        .and_then(|rgb| u32::from_str_radix(rgb, 16).ok())
        .map(Color);
    let underline = font.get_underline();

    CellStyle {
        font_color,
        bold: *font.get_bold(),
        strikethrough: *font.get_strikethrough(),
        underline: !underline.is_empty() && underline != "none",
    }
}

/// Stored column width (character cells plus padding) back to the width in
/// characters that the writer takes
fn stored_to_character_width(stored: f64) -> f64 {
    let characters = (stored * MAX_DIGIT_WIDTH - COLUMN_PADDING) / MAX_DIGIT_WIDTH;
    (characters.max(0.0) * 100.0).round() / 100.0
}

/// Copy fonts, date formats and column widths of a stored worksheet onto the
/// values already read into `sheet`
fn apply_stored_styles(sheet: &mut Sheet, stored: &umya_spreadsheet::Worksheet) -> Result<()> {
    for stored_cell in stored.get_cell_collection() {
        let coordinate = stored_cell.get_coordinate();
        let row = *coordinate.get_row_num() as usize;
        let col = *coordinate.get_col_num() as usize;

        let style = font_style(stored_cell.get_style());
        if !style.is_plain() {
            sheet.cell_mut(row, col)?.style = style;
        }

        let is_date = matches!(
            sheet.cell(row, col).map(|cell| &cell.value),
            Some(CellValue::DateTime(_))
        );
        if let (true, Some(format)) = (is_date, stored_cell.get_style().get_number_format()) {
            if let CellValue::DateTime(date) = &mut sheet.cell_mut(row, col)?.value {
                date.number_format = format.get_format_code().to_string();
            }
        }
    }

    for column in stored.get_column_dimensions() {
        let width = *column.get_width();
        if width > 0.0 {
            sheet.set_column_width(
                *column.get_col_num() as usize,
                stored_to_character_width(width),
            );
        }
    }

    Ok(())
}

/// Read every sheet: values through calamine, styles through umya-spreadsheet
fn read_workbook(bytes: &[u8]) -> Result<Book> {
    let mut workbook: Xlsx<Cursor<&[u8]>> = Xlsx::new(Cursor::new(bytes))?;
    let stored = umya_spreadsheet::reader::xlsx::read_reader(Cursor::new(bytes), true)
        .map_err(|err| SheetError::XlsxStyle(err.to_string()))?;
    let mut book = Book::new();

    for sheet_name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&sheet_name)?;
        let mut sheet = Sheet::with_name(&sheet_name);

        // Ranges start at the first used cell, not necessarily at A1
        if let Some((row0, col0)) = range.start() {
            for (r, c, data) in range.used_cells() {
                sheet.set_value(
                    row0 as usize + r + 1,
                    col0 as usize + c + 1,
                    data_to_cell_value(data),
                )?;
            }
        }

        if let Some(stored_sheet) = stored.get_sheet_by_name(&sheet_name) {
            apply_stored_styles(&mut sheet, stored_sheet)?;
        }

        book.add_sheet(&sheet_name, sheet)?;
    }

    Ok(book)
}

/// Write rich text runs, skipping runs without text
fn write_rich_text(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    runs: &[TextRun],
    cell_format: Option<&Format>,
) -> Result<()> {
    let formats: Vec<(Format, &str)> = runs
        .iter()
        .filter(|run| !run.text.is_empty())
        .map(|run| {
            (
                style_to_format(&run.style).unwrap_or_else(Format::new),
                run.text.as_str(),
            )
        })
        .collect();
    if formats.is_empty() {
        return Ok(());
    }

    let segments: Vec<(&Format, &str)> = formats.iter().map(|(f, t)| (f, *t)).collect();
    match cell_format {
        Some(format) => worksheet.write_rich_string_with_format(row, col, &segments, format)?,
        None => worksheet.write_rich_string(row, col, &segments)?,
    };
    Ok(())
}

fn write_cell(worksheet: &mut Worksheet, row: usize, col: usize, cell: &Cell) -> Result<()> {
    let row_num = to_row_num(row, col)?;
    let col_num = to_col_num(row, col)?;
    let format = style_to_format(&cell.style);

    match (&cell.value, &format) {
        (CellValue::Null, Some(format)) => {
            worksheet.write_blank(row_num, col_num, format)?;
        }
        (CellValue::Null, None) => {}
        (CellValue::Bool(b), Some(format)) => {
            worksheet.write_boolean_with_format(row_num, col_num, *b, format)?;
        }
        (CellValue::Bool(b), None) => {
            worksheet.write_boolean(row_num, col_num, *b)?;
        }
        // Note: Excel stores all numbers as f64, so integers > 2^53 may lose precision
        (CellValue::Int(i), Some(format)) => {
            worksheet.write_number_with_format(row_num, col_num, *i as f64, format)?;
        }
        (CellValue::Int(i), None) => {
            worksheet.write_number(row_num, col_num, *i as f64)?;
        }
        (CellValue::Float(f), Some(format)) => {
            worksheet.write_number_with_format(row_num, col_num, *f, format)?;
        }
        (CellValue::Float(f), None) => {
            worksheet.write_number(row_num, col_num, *f)?;
        }
        (CellValue::String(s), Some(format)) => {
            worksheet.write_string_with_format(row_num, col_num, s, format)?;
        }
        (CellValue::String(s), None) => {
            worksheet.write_string(row_num, col_num, s)?;
        }
        (CellValue::DateTime(date), format) => {
            let format = format
                .clone()
                .unwrap_or_else(Format::new)
                .set_num_format(&date.number_format);
            worksheet.write_number_with_format(row_num, col_num, date.serial, &format)?;
        }
        (CellValue::RichText(runs), format) => {
            write_rich_text(worksheet, row_num, col_num, runs, format.as_ref())?;
        }
    }
    Ok(())
}

/// Write one sheet, its styled cells and its column widths
fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet) -> Result<()> {
    worksheet.set_name(sheet.name())?;

    for (&col, &width) in sheet.column_widths() {
        worksheet.set_column_width(to_col_num(1, col)?, width)?;
    }

    for (row, col, cell) in sheet.used_cells() {
        write_cell(worksheet, row, col, cell)?;
    }

    Ok(())
}

impl Book {
    /// Load a book from XLSX bytes: all sheets with their values, font
    /// styles, date formats and column widths
    ///
    /// # Errors
    ///
    /// Returns error if the bytes are not a readable XLSX container.
    pub fn from_xlsx_bytes(bytes: &[u8]) -> Result<Self> {
        read_workbook(bytes)
    }

    /// Load a book from an Excel file (all sheets)
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be opened or read.
    pub fn from_xlsx<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_xlsx_bytes(&bytes)
    }

    /// Serialize the book to XLSX bytes, styles and rich text included
    ///
    /// # Errors
    ///
    /// Returns error if a sheet name or cell cannot be represented in XLSX.
    pub fn to_xlsx_bytes(&self) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();

        for (_, sheet) in self.sheets() {
            let worksheet = workbook.add_worksheet();
            write_sheet(worksheet, sheet)?;
        }

        Ok(workbook.save_to_buffer()?)
    }

    /// Save the book to an Excel file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or written.
    pub fn save_as_xlsx<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_xlsx_bytes()?;
        std::fs::write(path.as_ref(), bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_style_to_format_plain_is_none() {
        assert!(style_to_format(&CellStyle::default()).is_none());
        assert!(style_to_format(&CellStyle::default().with_bold(true)).is_some());
    }

    #[test]
    fn test_bytes_roundtrip_values() {
        let mut book = Book::new();
        let mut sheet = Sheet::from_data(vec![vec!["Name", "Age"], vec!["Alice", "30"]]);
        sheet.set_value(3, 2, 42).unwrap();
        sheet.set_value(3, 3, true).unwrap();
        book.add_sheet("People", sheet).unwrap();

        let bytes = book.to_xlsx_bytes().unwrap();
        let loaded = Book::from_xlsx_bytes(&bytes).unwrap();

        let people = loaded.get_sheet("People").unwrap();
        assert_eq!(people.text(1, 1), "Name");
        assert_eq!(people.text(2, 2), "30");
        assert_eq!(people.text(3, 2), "42");
        assert_eq!(people.text(3, 3), "TRUE");
        assert_eq!(people.last_used_row(), 3);
    }

    #[test]
    fn test_styled_and_rich_cells_are_written() {
        let deleted = CellStyle::default()
            .with_font_color(Color::RED)
            .with_strikethrough();
        let added = CellStyle::default()
            .with_font_color(Color::GREEN)
            .with_underline();

        let mut sheet = Sheet::new();
        sheet
            .set_cell(
                1,
                1,
                Cell::new(CellValue::RichText(vec![
                    TextRun::new("Alice", deleted.clone()),
                    TextRun::new("Alicia", added),
                ])),
            )
            .unwrap();
        sheet.set_cell(1, 2, Cell::styled("gone", deleted.clone())).unwrap();
        sheet.set_cell(2, 2, Cell::styled(CellValue::Null, deleted)).unwrap();
        sheet.set_column_width(1, 24.0);

        let mut book = Book::new();
        book.add_sheet("Diff", sheet).unwrap();
        let loaded = Book::from_xlsx_bytes(&book.to_xlsx_bytes().unwrap()).unwrap();

        let diff = loaded.get_sheet("Diff").unwrap();
        assert_eq!(diff.text(1, 1), "AliceAlicia");
        assert_eq!(diff.text(1, 2), "gone");
        assert!(diff.is_cell_empty(2, 2));
    }

    #[test]
    fn test_fonts_and_widths_are_read_back() {
        let mut sheet = Sheet::from_data(vec![vec!["ID", "Name"], vec!["1", "Alice"]]);
        sheet.cell_mut(1, 1).unwrap().style = CellStyle::default().with_bold(true);
        sheet.cell_mut(2, 2).unwrap().style = CellStyle::default()
            .with_font_color(Color::RED)
            .with_strikethrough();
        sheet
            .set_cell(3, 1, Cell::styled(CellValue::Null, CellStyle::default().with_bold(true)))
            .unwrap();
        sheet.set_column_width(2, 30.0);

        let mut book = Book::new();
        book.add_sheet("People", sheet).unwrap();
        let loaded = Book::from_xlsx_bytes(&book.to_xlsx_bytes().unwrap()).unwrap();
        let people = loaded.get_sheet("People").unwrap();

        assert!(people.cell(1, 1).unwrap().style.bold);
        assert!(!people.cell(1, 2).unwrap().style.bold);
        let deleted = &people.cell(2, 2).unwrap().style;
        assert_eq!(deleted.font_color, Some(Color::RED));
        assert!(deleted.strikethrough);
        assert!(!deleted.bold);
        assert!(people.cell(3, 1).unwrap().style.bold);
        assert!(people.is_cell_empty(3, 1));

        let width = people.column_width(2).unwrap();
        assert!((width - 30.0).abs() < 0.01, "width {width}");
        assert_eq!(people.column_width(1), None);
    }

    #[test]
    fn test_dates_keep_their_number_format() {
        let mut sheet = Sheet::from_data(vec![vec!["Due"]]);
        sheet
            .set_value(2, 1, ExcelDate::new(45366.0, "yyyy-mm-dd"))
            .unwrap();

        let mut book = Book::new();
        book.add_sheet("Dates", sheet).unwrap();
        let loaded = Book::from_xlsx_bytes(&book.to_xlsx_bytes().unwrap()).unwrap();
        let dates = loaded.get_sheet("Dates").unwrap();

        assert_eq!(
            dates.cell(2, 1).unwrap().value,
            CellValue::DateTime(ExcelDate::new(45366.0, "yyyy-mm-dd"))
        );
        assert_eq!(dates.text(2, 1), "2024-03-15");
    }

    #[test]
    fn test_stored_width_conversion() {
        // 30 characters are stored as 30.7109375
        assert!((stored_to_character_width(30.710_937_5) - 30.0).abs() < f64::EPSILON);
        assert!((stored_to_character_width(50.710_937_5) - 50.0).abs() < f64::EPSILON);
        assert!(stored_to_character_width(0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_file_roundtrip_keeps_sheet_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book.xlsx");

        let mut book = Book::new();
        book.add_sheet("Numbers", Sheet::from_data(vec![vec![1, 2, 3]])).unwrap();
        book.add_sheet("Letters", Sheet::from_data(vec![vec!["a", "b", "c"]])).unwrap();
        book.save_as_xlsx(&path).unwrap();

        let loaded = Book::from_xlsx(&path).unwrap();
        assert_eq!(loaded.sheet_names(), vec!["Numbers", "Letters"]);
        assert_eq!(loaded.get_sheet("Numbers").unwrap().text(1, 3), "3");
    }

    #[test]
    fn test_garbage_bytes_fail() {
        let result = Book::from_xlsx_bytes(b"definitely not a zip");
        assert!(matches!(result, Err(SheetError::XlsxRead(_))));
    }
}
