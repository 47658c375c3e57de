use sheetdelta_diff::{compare, CompareRequest, DiffError};
use sheetdelta_sheet::{Book, CellStyle, Color, ExcelDate, Sheet};

fn xlsx(sheets: Vec<(&str, Vec<Vec<&str>>)>) -> Vec<u8> {
    let mut book = Book::new();
    for (name, data) in sheets {
        book.add_sheet(name, Sheet::from_data(data)).unwrap();
    }
    book.to_xlsx_bytes().unwrap()
}

fn request(unique_columns: &str, header_rows: &str) -> CompareRequest {
    CompareRequest {
        unique_columns: unique_columns.to_string(),
        header_rows: header_rows.to_string(),
        ..CompareRequest::default()
    }
}

#[test]
fn test_compare_documents() {
    let old = xlsx(vec![
        (
            "People",
            vec![vec!["ID", "Name"], vec!["1", "Alice"], vec!["2", "Bob"]],
        ),
        ("Readme", vec![vec!["v1"]]),
    ]);
    let new = xlsx(vec![
        (
            "People",
            vec![vec!["ID", "Name"], vec!["1", "Alicia"], vec!["3", "Carol"]],
        ),
        ("Readme", vec![vec!["v2"]]),
    ]);
    let request = CompareRequest {
        sheets_to_ignore: "1".to_string(),
        ..request("1", "1,1")
    };

    let outcome = compare(&old, &new, &request).unwrap();
    assert!(outcome.are_files_different);

    let result = Book::from_xlsx_bytes(&outcome.result_excel).unwrap();
    assert_eq!(result.sheet_names(), vec!["People", "Readme"]);

    let people = result.get_sheet("People").unwrap();
    assert_eq!(people.text(2, 2), "AliceAlicia");
    assert_eq!(people.text(3, 2), "Bob");
    assert_eq!(people.text(4, 2), "Carol");
    assert_eq!(result.get_sheet("Readme").unwrap().text(1, 1), "v2");
}

fn assert_width(sheet: &Sheet, col: usize, expected: f64) {
    let width = sheet.column_width(col).unwrap_or_default();
    assert!(
        (width - expected).abs() < 0.01,
        "column {col} width {width}, expected {expected}"
    );
}

#[test]
fn test_input_styles_survive_comparison() {
    let mut people = Sheet::from_data(vec![vec!["ID", "Name"], vec!["1", "Alice"]]);
    people.cell_mut(1, 1).unwrap().style = CellStyle::default().with_bold(true);
    people.cell_mut(1, 2).unwrap().style = CellStyle::default().with_bold(true);
    people.set_column_width(2, 30.0);

    let mut old = Book::new();
    old.add_sheet("People", people).unwrap();
    old.add_sheet("Notes", Sheet::from_data(vec![vec!["old note"]]))
        .unwrap();

    let mut notes = Sheet::from_data(vec![vec!["Read me"]]);
    notes.cell_mut(1, 1).unwrap().style = CellStyle::default()
        .with_bold(true)
        .with_font_color(Color::RED);
    notes.set_column_width(1, 50.0);

    let mut new = Book::new();
    new.add_sheet(
        "People",
        Sheet::from_data(vec![vec!["ID", "Name"], vec!["1", "Alicia"]]),
    )
    .unwrap();
    new.add_sheet("Notes", notes).unwrap();

    let request = CompareRequest {
        sheets_to_ignore: "1".to_string(),
        ..request("1", "1")
    };
    let outcome = compare(
        &old.to_xlsx_bytes().unwrap(),
        &new.to_xlsx_bytes().unwrap(),
        &request,
    )
    .unwrap();
    assert!(outcome.are_files_different);
    let result = Book::from_xlsx_bytes(&outcome.result_excel).unwrap();

    // Header emphasis and widths of the compared sheet come from the old side
    let people = result.get_sheet("People").unwrap();
    assert!(people.cell(1, 1).unwrap().style.bold);
    assert!(people.cell(1, 2).unwrap().style.bold);
    assert_width(people, 2, 30.0);
    assert_eq!(people.text(2, 2), "AliceAlicia");

    // The ignored sheet is the new side, styles and widths included
    let notes = result.get_sheet("Notes").unwrap();
    let note = notes.cell(1, 1).unwrap();
    assert_eq!(note.value.to_string(), "Read me");
    assert!(note.style.bold);
    assert_eq!(note.style.font_color, Some(Color::RED));
    assert_width(notes, 1, 50.0);
}

#[test]
fn test_dates_compare_as_dates() {
    let mut old_sheet = Sheet::from_data(vec![vec!["ID", "Due"]]);
    old_sheet.set_value(2, 1, "1").unwrap();
    old_sheet
        .set_value(2, 2, ExcelDate::new(45366.0, "yyyy-mm-dd"))
        .unwrap();
    let mut new_sheet = old_sheet.clone();
    new_sheet
        .set_value(2, 2, ExcelDate::new(45367.0, "yyyy-mm-dd"))
        .unwrap();

    let mut old = Book::new();
    old.add_sheet("Plan", old_sheet).unwrap();
    let mut new = Book::new();
    new.add_sheet("Plan", new_sheet).unwrap();

    let outcome = compare(
        &old.to_xlsx_bytes().unwrap(),
        &new.to_xlsx_bytes().unwrap(),
        &request("1", "1"),
    )
    .unwrap();
    assert!(outcome.are_files_different);

    let result = Book::from_xlsx_bytes(&outcome.result_excel).unwrap();
    assert_eq!(
        result.get_sheet("Plan").unwrap().text(2, 2),
        "2024-03-152024-03-16"
    );
}

#[test]
fn test_identical_documents() {
    let data = vec![vec!["ID", "Qty"], vec!["1", "4"], vec!["2", "9"]];
    let bytes = xlsx(vec![("S", data)]);

    let outcome = compare(&bytes, &bytes, &request("1", "1")).unwrap();
    assert!(!outcome.are_files_different);

    let result = Book::from_xlsx_bytes(&outcome.result_excel).unwrap();
    let sheet = result.get_sheet("S").unwrap();
    assert_eq!(sheet.text(3, 2), "9");
}

#[test]
fn test_result_written_to_file() {
    let old = xlsx(vec![("S", vec![vec!["ID"], vec!["1"]])]);
    let new = xlsx(vec![("S", vec![vec!["ID"], vec!["1"], vec!["2"]])]);
    let outcome = compare(&old, &new, &request("1", "1")).unwrap();
    assert!(outcome.are_files_different);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("result.xlsx");
    std::fs::write(&path, &outcome.result_excel).unwrap();

    let result = Book::from_xlsx(&path).unwrap();
    assert_eq!(result.get_sheet("S").unwrap().text(3, 1), "2");
}

#[test]
fn test_bad_request_strings() {
    let bytes = xlsx(vec![("S", vec![vec!["ID"], vec!["1"]])]);

    assert!(matches!(
        compare(&bytes, &bytes, &request("one", "1")),
        Err(DiffError::InvalidIndexList { field: "unique column", .. })
    ));
    assert!(matches!(
        compare(&bytes, &bytes, &request("0", "1")),
        Err(DiffError::SheetFailed { .. })
    ));
    assert!(matches!(
        compare(&bytes, &bytes, &request("1", "")),
        Err(DiffError::SheetFailed { .. })
    ));
}

#[test]
fn test_fewer_old_sheets() {
    let old = xlsx(vec![("A", vec![vec!["ID"]])]);
    let new = xlsx(vec![("A", vec![vec!["ID"]]), ("B", vec![vec!["ID"]])]);

    let err = compare(&old, &new, &request("1", "1,1")).unwrap_err();
    assert!(matches!(
        err,
        DiffError::SheetFailed { index: 1, ref source, .. }
            if matches!(**source, DiffError::MissingSheet { index: 1, available: 1 })
    ));
}

#[test]
fn test_warm_up_ignores_inputs() {
    let request = CompareRequest {
        warm_up: true,
        ..CompareRequest::default()
    };
    let outcome = compare(b"garbage", b"", &request).unwrap();
    assert!(!outcome.are_files_different);

    let book = Book::from_xlsx_bytes(&outcome.result_excel).unwrap();
    assert_eq!(book.sheet_names(), vec!["WarmUpSheet"]);
    assert_eq!(book.get_sheet("WarmUpSheet").unwrap().text(1, 1), "Warm-up");
}
