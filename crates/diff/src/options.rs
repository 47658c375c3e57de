//! Comparison options and the host request they are parsed from.

use crate::error::{DiffError, Result};
use serde::{Deserialize, Serialize};
use sheetdelta_sheet::{CellStyle, Color};

/// Marker text that flags the row moved to the end of a sheet
pub const DEFAULT_RELOCATION_MARKER: &str = "Access Area Restrictions";
/// Document type for which row relocation is enabled
pub const RELOCATION_DOCUMENT_TYPE: &str = "BAMatrix";
/// Process kind for which row relocation is enabled
pub const RELOCATION_PROCESS_KIND: &str = "Standardisation";

/// Decides whether a row is held back during the row scan and relocated to
/// the end of the sheet. Receives the displayed text of the row's first
/// unified column on the old side.
pub trait RowClassifier {
    fn is_relocatable(&self, first_cell: &str) -> bool;
}

impl<F> RowClassifier for F
where
    F: Fn(&str) -> bool,
{
    fn is_relocatable(&self, first_cell: &str) -> bool {
        self(first_cell)
    }
}

/// Matches rows whose first cell contains a marker substring.
#[derive(Debug, Clone)]
pub struct MarkerClassifier {
    marker: String,
}

impl MarkerClassifier {
    #[must_use]
    pub fn new(marker: &str) -> Self {
        MarkerClassifier {
            marker: marker.to_string(),
        }
    }
}

impl RowClassifier for MarkerClassifier {
    fn is_relocatable(&self, first_cell: &str) -> bool {
        !self.marker.is_empty() && first_cell.contains(&self.marker)
    }
}

/// When a held-back row is moved to the end of the output sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelocationPolicy {
    /// Substring identifying the row to relocate
    pub marker: String,
    pub required_document_type: String,
    pub required_process_kind: String,
    /// Only relocate on the sheet at index 0
    pub first_sheet_only: bool,
}

impl Default for RelocationPolicy {
    fn default() -> Self {
        RelocationPolicy {
            marker: DEFAULT_RELOCATION_MARKER.to_string(),
            required_document_type: RELOCATION_DOCUMENT_TYPE.to_string(),
            required_process_kind: RELOCATION_PROCESS_KIND.to_string(),
            first_sheet_only: true,
        }
    }
}

impl RelocationPolicy {
    /// Exact string match on both kinds, plus the sheet position rule
    #[must_use]
    pub fn applies(&self, document_type: &str, process_kind: &str, sheet_index: usize) -> bool {
        document_type == self.required_document_type
            && process_kind == self.required_process_kind
            && (!self.first_sheet_only || sheet_index == 0)
    }
}

/// Font colors used to mark differences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffPalette {
    pub deleted: Color,
    pub added: Color,
}

impl Default for DiffPalette {
    fn default() -> Self {
        DiffPalette {
            deleted: Color::RED,
            added: Color::GREEN,
        }
    }
}

impl DiffPalette {
    /// Deleted content: colored and struck through
    #[must_use]
    pub fn deleted_style(&self) -> CellStyle {
        CellStyle::default()
            .with_font_color(self.deleted)
            .with_strikethrough()
    }

    /// Added content: colored and underlined
    #[must_use]
    pub fn added_style(&self) -> CellStyle {
        CellStyle::default()
            .with_font_color(self.added)
            .with_underline()
    }
}

/// Everything a comparison run needs besides the two books.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareOptions {
    /// 1-based header row, one entry per sheet index
    pub header_rows: Vec<usize>,
    /// 1-based unified column positions forming the row key, in key order
    pub unique_columns: Vec<usize>,
    /// 0-based sheet indices copied through without diffing
    pub ignored_sheets: Vec<usize>,
    pub document_type: String,
    pub process_kind: String,
    pub relocation: RelocationPolicy,
    pub palette: DiffPalette,
}

impl CompareOptions {
    /// Parse options from JSON; absent fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the parts of the options that do not depend on the books
    pub fn validate(&self) -> Result<()> {
        if self.unique_columns.is_empty() {
            return Err(DiffError::NoUniqueColumns);
        }
        if self.unique_columns.contains(&0) {
            return Err(DiffError::ZeroUniqueColumn);
        }
        Ok(())
    }

    /// Header row for a sheet index
    pub fn header_row(&self, sheet_index: usize) -> Result<usize> {
        self.header_rows
            .get(sheet_index)
            .copied()
            .ok_or(DiffError::MissingHeaderRow { sheet_index })
    }

    #[must_use]
    pub fn is_ignored(&self, sheet_index: usize) -> bool {
        self.ignored_sheets.contains(&sheet_index)
    }

    /// Whether a held-back row on this sheet is moved to the end
    #[must_use]
    pub fn relocates_on(&self, sheet_index: usize) -> bool {
        self.relocation
            .applies(&self.document_type, &self.process_kind, sheet_index)
    }
}

/// The host-facing request: every list is a comma-separated string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompareRequest {
    /// 1-based unified column positions, e.g. "1,3"
    pub unique_columns: String,
    /// 0-based sheet indices, empty for none
    pub sheets_to_ignore: String,
    /// 1-based header rows, one per sheet, e.g. "1,2"
    pub header_rows: String,
    pub document_type: String,
    pub process_kind: String,
    /// Skip the comparison and only exercise the codec
    pub warm_up: bool,
}

impl CompareRequest {
    /// Parse the request strings into options with default policy and palette.
    /// Only the list syntax is checked here; `CompareOptions::validate` runs
    /// per compared sheet.
    pub fn to_options(&self) -> Result<CompareOptions> {
        let options = CompareOptions {
            header_rows: parse_index_list("header row", &self.header_rows)?,
            unique_columns: parse_index_list("unique column", &self.unique_columns)?,
            ignored_sheets: parse_index_list("ignored sheet", &self.sheets_to_ignore)?,
            document_type: self.document_type.clone(),
            process_kind: self.process_kind.clone(),
            ..CompareOptions::default()
        };
        Ok(options)
    }
}

/// Parse "1, 2,3" into `[1, 2, 3]`; an empty or blank string is an empty list
pub fn parse_index_list(field: &'static str, value: &str) -> Result<Vec<usize>> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }

    value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .map_err(|_| DiffError::InvalidIndexList {
                    field,
                    value: value.to_string(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index_list() {
        assert_eq!(parse_index_list("x", "1,2, 3").unwrap(), vec![1, 2, 3]);
        assert!(parse_index_list("x", "").unwrap().is_empty());
        assert!(parse_index_list("x", "  ").unwrap().is_empty());
        assert!(matches!(
            parse_index_list("unique column", "1,a"),
            Err(DiffError::InvalidIndexList { field: "unique column", .. })
        ));
        assert!(parse_index_list("x", "1,,2").is_err());
        assert!(parse_index_list("x", "-1").is_err());
    }

    #[test]
    fn test_request_to_options() {
        let request = CompareRequest {
            unique_columns: "2,1".to_string(),
            sheets_to_ignore: String::new(),
            header_rows: "1,3".to_string(),
            document_type: "BAMatrix".to_string(),
            process_kind: "Standardisation".to_string(),
            warm_up: false,
        };
        let options = request.to_options().unwrap();
        assert_eq!(options.unique_columns, vec![2, 1]);
        assert_eq!(options.header_rows, vec![1, 3]);
        assert!(options.ignored_sheets.is_empty());
        assert_eq!(options.header_row(1).unwrap(), 3);
        assert!(matches!(
            options.header_row(2),
            Err(DiffError::MissingHeaderRow { sheet_index: 2 })
        ));
        assert!(options.relocates_on(0));
        assert!(!options.relocates_on(1));
    }

    #[test]
    fn test_request_rejects_bad_unique_columns() {
        let request = CompareRequest {
            unique_columns: "0".to_string(),
            header_rows: "1".to_string(),
            ..CompareRequest::default()
        };
        let options = request.to_options().unwrap();
        assert!(matches!(options.validate(), Err(DiffError::ZeroUniqueColumn)));

        let request = CompareRequest {
            header_rows: "1".to_string(),
            ..CompareRequest::default()
        };
        let options = request.to_options().unwrap();
        assert!(matches!(options.validate(), Err(DiffError::NoUniqueColumns)));
    }

    #[test]
    fn test_relocation_policy_requires_exact_match() {
        let policy = RelocationPolicy::default();
        assert!(policy.applies("BAMatrix", "Standardisation", 0));
        assert!(!policy.applies("bamatrix", "Standardisation", 0));
        assert!(!policy.applies("BAMatrix", "Other", 0));
        assert!(!policy.applies("BAMatrix", "Standardisation", 1));

        let any_sheet = RelocationPolicy {
            first_sheet_only: false,
            ..RelocationPolicy::default()
        };
        assert!(any_sheet.applies("BAMatrix", "Standardisation", 4));
    }

    #[test]
    fn test_marker_classifier() {
        let classifier = MarkerClassifier::new(DEFAULT_RELOCATION_MARKER);
        assert!(classifier.is_relocatable("Notes: Access Area Restrictions apply"));
        assert!(!classifier.is_relocatable("access area restrictions"));
        assert!(!MarkerClassifier::new("").is_relocatable("anything"));

        let closure = |text: &str| text.starts_with("TOTAL");
        assert!(closure.is_relocatable("TOTAL 12"));
    }

    #[test]
    fn test_options_from_json_fills_defaults() {
        let options = CompareOptions::from_json_str(
            r#"{"header_rows": [2], "unique_columns": [1, 3], "palette": {"added": 255}}"#,
        )
        .unwrap();
        assert_eq!(options.header_rows, vec![2]);
        assert_eq!(options.unique_columns, vec![1, 3]);
        assert_eq!(options.palette.added, Color(255));
        assert_eq!(options.palette.deleted, Color::RED);
        assert_eq!(options.relocation, RelocationPolicy::default());

        assert!(matches!(
            CompareOptions::from_json_str("{not json"),
            Err(DiffError::Config(_))
        ));
    }
}
