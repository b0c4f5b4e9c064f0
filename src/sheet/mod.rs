//! Worksheet access
//!
//! Wraps calamine behind a small [`Sheet`] type holding the first worksheet
//! as rows of cell strings. The validator and extractor only ever see this
//! type, so their logic is testable without workbook fixtures.

pub mod validator;

pub use validator::SheetValidator;

use calamine::{open_workbook_auto, Data, Reader};
use std::path::Path;
use thiserror::Error;

/// Marker identifying spreadsheet files during the folder walk.
pub const SPREADSHEET_MARKER: &str = "xlsx";

/// Office lock files ("~$name.xlsx") are not spreadsheets.
pub const LOCKFILE_MARKER: &str = "~$";

/// Word-list sheets must present exactly this many rows.
pub const REQUIRED_ROWS: usize = 65;

/// First word row; rows 8..65 are the 57 word slots.
pub const WORD_ROWS_START: usize = 8;

/// Errors opening or reading a workbook
#[derive(Debug, Error)]
pub enum SheetError {
    #[error("failed to open workbook '{path}': {source}")]
    Workbook {
        path: String,
        source: calamine::Error,
    },

    #[error("workbook '{0}' has no worksheets")]
    NoWorksheet(String),
}

/// The first worksheet of a workbook, as trimmed-to-string cells.
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Open a workbook and snapshot its first worksheet.
    pub fn open(path: &Path) -> Result<Self, SheetError> {
        let display = path.display().to_string();
        let mut workbook = open_workbook_auto(path).map_err(|source| SheetError::Workbook {
            path: display.clone(),
            source,
        })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| SheetError::NoWorksheet(display.clone()))?
            .map_err(|source| SheetError::Workbook {
                path: display.clone(),
                source: source.into(),
            })?;

        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();

        Ok(Self {
            name: display,
            rows,
        })
    }

    /// Build a sheet directly from rows. Used by tests and anything that
    /// already has tabular data in memory.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Display name (usually the workbook path).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell content at 0-based (row, column); "" for anything out of range.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Cell parsed as a float, if possible.
    pub fn cell_f64(&self, row: usize, col: usize) -> Option<f64> {
        self.cell(row, col).trim().parse().ok()
    }

    /// Loose boolean reading for flag columns: empty, "0", "false", "n" and
    /// "no" are false, anything else true.
    pub fn cell_truthy(&self, row: usize, col: usize) -> bool {
        !matches!(
            self.cell(row, col).trim().to_lowercase().as_str(),
            "" | "0" | "false" | "n" | "no"
        )
    }
}

/// Render one worksheet cell as a string. Numeric cells drop a trailing
/// ".0" so codes and counts read the way they were typed.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => format_number(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format_number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

fn format_number(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// True for files that count as the folder's data spreadsheet.
pub fn is_spreadsheet_name(file_name: &str) -> bool {
    file_name.contains(SPREADSHEET_MARKER) && !file_name.contains(LOCKFILE_MARKER)
}
