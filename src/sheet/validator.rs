//! Fixed-layout validation of word-list sheets
//!
//! The template puts known labels in column 0 of the header rows and the
//! contributed values beside them. A label mismatch is an error and marks
//! the sheet not-ok; an empty value cell is only a warning. Word rows are
//! scanned for indigenous words missing their media file.

use super::{Sheet, REQUIRED_ROWS, WORD_ROWS_START};
use crate::issue::Issue;

/// Header cells to check: (row, column, expected label if any).
const HEADER_CHECKS: &[(usize, usize, Option<&str>)] = &[
    (0, 0, Some("Language name")),
    (0, 1, None),
    (0, 2, None),
    (1, 0, Some("AIATSIS code")),
    (1, 1, None),
    (2, 0, Some("Speaker's name")),
    (2, 1, None),
    (2, 2, None),
    (3, 0, Some("Other people who helped to get the list produced")),
    (3, 1, None),
    (4, 0, Some("Permission form received (Y/N)?")),
    (4, 1, None),
    (6, 0, Some("Date received")),
    (6, 1, None),
];

/// Validates one sheet against the template layout.
///
/// The validator never rejects a sheet itself; callers decide. `ok()` is
/// false once any label mismatch has been seen; warnings alone leave it
/// true.
pub struct SheetValidator {
    ok: bool,
}

impl SheetValidator {
    pub fn new() -> Self {
        Self { ok: true }
    }

    /// Whether the last `verify` found the layout intact.
    pub fn ok(&self) -> bool {
        self.ok
    }

    /// Check the fixed layout and word rows, returning all issues found.
    pub fn verify(&mut self, sheet: &Sheet) -> Vec<Issue> {
        let mut issues = Vec::new();

        for &(row, col, expected) in HEADER_CHECKS {
            self.check_cell(sheet, row, col, expected, &mut issues);
        }

        // Word slots: indigenous word in column 1, media file in column 2.
        for row in WORD_ROWS_START..REQUIRED_ROWS {
            let word = sheet.cell(row, 1);
            if !word.is_empty() && sheet.cell(row, 2).is_empty() {
                issues.push(Issue::warning(
                    "Missing media file for word",
                    format!("'{}': no media file for '{}'.", sheet.name(), word),
                ));
            }
        }

        issues
    }

    fn check_cell(
        &mut self,
        sheet: &Sheet,
        row: usize,
        col: usize,
        expected: Option<&str>,
        issues: &mut Vec<Issue>,
    ) {
        let actual = sheet.cell(row, col);
        if let Some(expected) = expected {
            if actual != expected {
                self.ok = false;
                issues.push(Issue::error(
                    "Sheet verification incorrect data",
                    format!(
                        "'{}': unexpected value at row {}, column {}. Expected: {}, got: {}",
                        sheet.name(),
                        row,
                        col,
                        expected,
                        actual
                    ),
                ));
                return;
            }
        }
        if actual.is_empty() {
            // 1-based coordinates so the message matches what contributors
            // see in their spreadsheet program.
            issues.push(Issue::warning(
                "Sheet verification missing data",
                format!(
                    "'{}': empty cell at row {}, column {}. Value expected.",
                    sheet.name(),
                    row + 1,
                    col + 1
                ),
            ));
        }
    }
}

impl Default for SheetValidator {
    fn default() -> Self {
        Self::new()
    }
}
