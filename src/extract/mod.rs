//! Language data extraction from per-language folders
//!
//! Each leaf folder under the data root holds one 65-row word-list
//! spreadsheet plus the media files it references. Extraction validates
//! the sheet, parses the header and word rows into a draft, and merges the
//! draft into the record store for the sheet's code. A bad folder degrades
//! only itself; the walk continues.

use crate::geography::RegistryTable;
use crate::issue::{Issue, IssueLog};
use crate::sheet::{is_spreadsheet_name, Sheet, SheetValidator, REQUIRED_ROWS, WORD_ROWS_START};
use crate::types::{normalize_code, MediaSource, NamedMedia, RecordStore, WordEntry};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use walkdir::WalkDir;

/// Media cell markers deciding whether a reference is video or audio.
pub const VIDEO_EXT_MARKER: &str = ".mov";
pub const AUDIO_EXT_MARKER: &str = ".wav";

/// Walk every folder under `data_dir` and extract its language data into
/// the store. Deterministic order: folders are visited sorted by name.
pub fn extract_all(
    data_dir: &Path,
    store: &mut RecordStore,
    registry: &RegistryTable,
    issues: &mut IssueLog,
) {
    for entry in WalkDir::new(data_dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable path under {}: {}", data_dir.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_dir() || entry.path() == data_dir {
            continue;
        }
        process_folder(entry.path(), store, registry, issues);
    }
}

/// Handle one input folder: locate its single spreadsheet, validate it,
/// and merge its contents.
fn process_folder(
    folder: &Path,
    store: &mut RecordStore,
    registry: &RegistryTable,
    issues: &mut IssueLog,
) {
    let (mut sheets, has_subdir) = scan_folder(folder);

    if sheets.len() > 1 {
        issues.push(Issue::error(
            "Multiple spreadsheets",
            format!(
                "Found more than one data spreadsheet in folder '{}'. Skipping this folder.",
                folder.display()
            ),
        ));
        return;
    }
    let Some(sheet_path) = sheets.pop() else {
        // Folders that only hold subfolders are organizational; a true
        // leaf without a sheet is worth flagging.
        if !has_subdir {
            issues.push(Issue::warning(
                "No spreadsheet found",
                format!(
                    "No data spreadsheet in folder '{}'. Skipping this folder.",
                    folder.display()
                ),
            ));
        }
        return;
    };

    info!("Processing: {}", folder.display());

    let sheet = match Sheet::open(&sheet_path) {
        Ok(sheet) => sheet,
        Err(e) => {
            issues.push(Issue::error(
                "Bad spreadsheet",
                format!("'{}' could not be read: {}", sheet_path.display(), e),
            ));
            return;
        }
    };

    if sheet.row_count() != REQUIRED_ROWS {
        issues.push(Issue::error(
            "Bad spreadsheet",
            format!(
                "'{}' in '{}' isn't exactly {} rows - is it correct?",
                sheet_path.display(),
                folder.display(),
                REQUIRED_ROWS
            ),
        ));
        return;
    }

    info!("Verifying {}", sheet.name());
    let mut validator = SheetValidator::new();
    issues.extend(validator.verify(&sheet));
    if !validator.ok() {
        error!("Errors found in sheet - skipping this folder.");
        return;
    }

    extract_sheet(&sheet, folder, store, registry, issues);
}

/// Spreadsheet files directly inside `folder` (lock files excluded), plus
/// whether the folder has subfolders.
fn scan_folder(folder: &Path) -> (Vec<PathBuf>, bool) {
    let mut sheets = Vec::new();
    let mut has_subdir = false;
    let Ok(entries) = std::fs::read_dir(folder) else {
        return (sheets, has_subdir);
    };
    let mut children: Vec<_> = entries.flatten().collect();
    children.sort_by_key(|e| e.file_name());
    for child in children {
        let Ok(file_type) = child.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            has_subdir = true;
        } else if is_spreadsheet_name(&child.file_name().to_string_lossy()) {
            sheets.push(child.path());
        }
    }
    (sheets, has_subdir)
}

/// Parse a validated sheet and merge it into the store.
///
/// Store properties win over the draft on collision: the merge only fills
/// fields that are still empty, so geometry-derived code, name and source
/// are never overwritten from a sheet.
pub(crate) fn extract_sheet(
    sheet: &Sheet,
    folder: &Path,
    store: &mut RecordStore,
    registry: &RegistryTable,
    issues: &mut IssueLog,
) {
    info!("Extracting language data from {}", sheet.name());

    let draft = parse_draft(sheet, folder);
    let code = normalize_code(&draft.code);

    if !store.contains_code(&code) {
        // The reconciler never saw this code; fall back to a registry stub
        // looked up by language name.
        match registry.stub_record(&draft.language.name) {
            Some(stub) => {
                issues.push(Issue::warning(
                    "Using Austlang data",
                    format!("Using Austlang data for '{}' '{}'", code, draft.language.name),
                ));
                store.insert(code.clone(), stub);
            }
            None => {
                issues.push(Issue::error(
                    "Language not found in Gambay or Austlang",
                    format!(
                        "'{}' '{}' not found in either the Gambay or Austlang data",
                        code, draft.language.name
                    ),
                ));
                return;
            }
        }
    }

    let words: Vec<WordEntry> = (WORD_ROWS_START..sheet.row_count())
        .filter_map(|row| parse_word_row(sheet, row, folder))
        .collect();

    let record = match store.get_mut(&code) {
        Some(record) => record,
        None => return,
    };
    let props = &mut record.properties;
    if props.language.is_none() {
        props.language = Some(draft.language);
    }
    if props.speaker.is_none() {
        props.speaker = Some(draft.speaker);
    }
    if props.words.is_none() {
        props.words = Some(words);
    }
    if props.thankyou.is_none() && !draft.thankyou.is_empty() {
        props.thankyou = Some(draft.thankyou);
    }
    if props.date_received.is_none() && !draft.date_received.is_empty() {
        props.date_received = Some(draft.date_received);
    }
}

/// Header fields of one sheet, before merging.
struct SheetDraft {
    code: String,
    language: NamedMedia,
    speaker: NamedMedia,
    thankyou: String,
    date_received: String,
}

fn parse_draft(sheet: &Sheet, folder: &Path) -> SheetDraft {
    SheetDraft {
        code: sheet.cell(1, 1).trim().to_string(),
        language: NamedMedia {
            name: sheet.cell(0, 1).trim().to_string(),
            media: audio_ref_from_cell(sheet.cell(0, 2), folder),
        },
        speaker: NamedMedia {
            name: sheet.cell(2, 1).trim().to_string(),
            media: audio_ref_from_cell(sheet.cell(2, 2), folder),
        },
        thankyou: sheet.cell(3, 1).trim().to_string(),
        date_received: sheet.cell(6, 1).trim().to_string(),
    }
}

fn audio_ref_from_cell(cell: &str, folder: &Path) -> MediaSource {
    let cell = cell.trim();
    if cell.is_empty() {
        MediaSource::default()
    } else {
        MediaSource::audio_ref(folder.join(cell))
    }
}

/// One word row. Fully blank slots produce no entry; a word whose media
/// cell names neither a video nor an audio file keeps an empty reference
/// (the validator already warned about it).
fn parse_word_row(sheet: &Sheet, row: usize, folder: &Path) -> Option<WordEntry> {
    let english = sheet.cell(row, 0).trim().to_string();
    let indigenous = sheet.cell(row, 1).trim().to_lowercase();
    if english.is_empty() && indigenous.is_empty() {
        return None;
    }

    let media_cell = sheet.cell(row, 2).trim();
    let media = if media_cell.contains(VIDEO_EXT_MARKER) {
        MediaSource::video_ref(folder.join(media_cell))
    } else if media_cell.contains(AUDIO_EXT_MARKER) {
        MediaSource::audio_ref(folder.join(media_cell))
    } else {
        MediaSource::default()
    };

    let english_alternate = Some(sheet.cell(row, 3).trim().to_string()).filter(|s| !s.is_empty());

    Some(WordEntry {
        english,
        indigenous,
        english_alternate,
        media,
        language: None,
    })
}
