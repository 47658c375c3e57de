use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An RGB font color (`0xRRGGBB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub const RED: Color = Color(0xFF_0000);
    pub const GREEN: Color = Color(0x00_8000);

    /// The raw `0xRRGGBB` value.
    #[must_use]
    pub fn rgb(self) -> u32 {
        self.0
    }
}

/// Font styling attached to a cell or to a rich text run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    pub font_color: Option<Color>,
    pub bold: bool,
    pub strikethrough: bool,
    pub underline: bool,
}

impl CellStyle {
    /// True when no attribute differs from the default style.
    #[must_use]
    pub fn is_plain(&self) -> bool {
        *self == CellStyle::default()
    }

    #[must_use]
    pub fn with_font_color(mut self, color: Color) -> Self {
        self.font_color = Some(color);
        self
    }

    #[must_use]
    pub fn with_bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    #[must_use]
    pub fn with_strikethrough(mut self) -> Self {
        self.strikethrough = true;
        self
    }

    #[must_use]
    pub fn with_underline(mut self) -> Self {
        self.underline = true;
        self
    }
}

/// One fragment of a rich text value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub style: CellStyle,
}

impl TextRun {
    #[must_use]
    pub fn new<S: Into<String>>(text: S, style: CellStyle) -> Self {
        TextRun {
            text: text.into(),
            style,
        }
    }
}

/// A date or time: an Excel serial day number plus the number format it was
/// stored with, so that writing it back keeps it a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcelDate {
    pub serial: f64,
    pub number_format: String,
}

impl ExcelDate {
    /// Format used when the source carries none
    pub const DATE_FORMAT: &'static str = "yyyy-mm-dd";
    pub const DATE_TIME_FORMAT: &'static str = "yyyy-mm-dd hh:mm:ss";

    #[must_use]
    pub fn new<S: Into<String>>(serial: f64, number_format: S) -> Self {
        ExcelDate {
            serial,
            number_format: number_format.into(),
        }
    }

    /// A date with the default format for its serial: date only for whole
    /// days, date and time otherwise
    #[must_use]
    pub fn from_serial(serial: f64) -> Self {
        let format = if serial.fract() == 0.0 {
            Self::DATE_FORMAT
        } else {
            Self::DATE_TIME_FORMAT
        };
        Self::new(serial, format)
    }

    /// Calendar date and time of the serial, to the second.
    ///
    /// Serials before 1900-03-01 come out one day early: Excel counts the
    /// nonexistent 1900-02-29.
    #[must_use]
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
        let seconds = (self.serial * 86_400.0).round();
        if !seconds.is_finite() {
            return None;
        }
        epoch.checked_add_signed(TimeDelta::try_seconds(seconds as i64)?)
    }
}

impl fmt::Display for ExcelDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) if dt.num_seconds_from_midnight() == 0 => {
                write!(f, "{}", dt.format("%Y-%m-%d"))
            }
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            None => write!(f, "{}", self.serial),
        }
    }
}

/// Represents a cell value in a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    DateTime(ExcelDate),
    RichText(Vec<TextRun>),
}

impl CellValue {
    /// Check if the value is null.
    ///
    /// Empty strings and rich text without any text count as null, the way a
    /// spreadsheet treats a cell holding `""` as blank.
    #[must_use]
    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.is_empty(),
            CellValue::RichText(runs) => runs.iter().all(|run| run.text.is_empty()),
            _ => false,
        }
    }

    /// The rich text runs, if this is a rich text value
    #[must_use]
    pub fn runs(&self) -> Option<&[TextRun]> {
        match self {
            CellValue::RichText(runs) => Some(runs),
            _ => None,
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Null
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, ""),
            CellValue::Bool(true) => write!(f, "TRUE"),
            CellValue::Bool(false) => write!(f, "FALSE"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(fl) => write!(f, "{fl}"),
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::DateTime(date) => write!(f, "{date}"),
            CellValue::RichText(runs) => runs.iter().try_for_each(|run| f.write_str(&run.text)),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Int(i64::from(i))
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<ExcelDate> for CellValue {
    fn from(date: ExcelDate) -> Self {
        CellValue::DateTime(date)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => CellValue::Null,
        }
    }
}

/// A cell: its value plus the style applied to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    pub style: CellStyle,
}

impl Cell {
    #[must_use]
    pub fn new<T: Into<CellValue>>(value: T) -> Self {
        Cell {
            value: value.into(),
            style: CellStyle::default(),
        }
    }

    #[must_use]
    pub fn styled<T: Into<CellValue>>(value: T, style: CellStyle) -> Self {
        Cell {
            value: value.into(),
            style,
        }
    }

    /// A cell is empty iff it holds no value; style alone does not count.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_null()
    }

    /// The displayed text of the cell.
    #[must_use]
    pub fn text(&self) -> String {
        self.value.to_string()
    }
}
