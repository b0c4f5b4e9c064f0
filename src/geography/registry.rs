//! The authoritative code registry (AIATSIS)
//!
//! A workbook with one language per row: code, name, coordinates and an
//! override flag. Entries are keyed by language name; reconciliation and
//! the extractor both look languages up by name when a community record
//! carries no code.

use super::GeographyError;
use crate::sheet::Sheet;
use crate::types::{normalize_code, Geometry, LanguageRecord, RecordProperties, Source};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Fixed registry workbook columns.
const COL_CODE: usize = 0;
const COL_NAME: usize = 1;
const COL_LAT: usize = 3;
const COL_LNG: usize = 4;
const COL_OVERRIDE: usize = 7;

/// One authoritative registry row. Immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub code: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub override_flag: bool,
}

impl RegistryEntry {
    /// Synthesize a point-geometry record from this entry. Used for
    /// override entries, registry-only codes, and extractor fallback stubs.
    pub fn to_record(&self) -> LanguageRecord {
        let mut properties =
            RecordProperties::new(normalize_code(&self.code), &self.name, Source::Austlang);
        properties.selected = Some(false);
        LanguageRecord::new(Geometry::point(self.lng, self.lat), properties)
    }
}

/// Registry entries keyed by language name.
#[derive(Debug, Clone, Default)]
pub struct RegistryTable {
    entries: BTreeMap<String, RegistryEntry>,
}

impl RegistryTable {
    /// Load the registry workbook. A missing or unreadable workbook is
    /// fatal to the whole run.
    pub fn load(path: &Path) -> Result<Self, GeographyError> {
        let sheet = Sheet::open(path)?;
        let table = Self::from_sheet(&sheet);
        info!(
            "Loaded {} registry entries from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse registry rows from a worksheet, skipping the header row.
    pub fn from_sheet(sheet: &Sheet) -> Self {
        let mut entries = BTreeMap::new();
        for row in 1..sheet.row_count() {
            let name = sheet.cell(row, COL_NAME).trim().to_string();
            if name.is_empty() {
                continue;
            }
            let entry = RegistryEntry {
                code: sheet.cell(row, COL_CODE).trim().to_string(),
                name: name.clone(),
                lat: sheet.cell_f64(row, COL_LAT).unwrap_or(0.0),
                lng: sheet.cell_f64(row, COL_LNG).unwrap_or(0.0),
                override_flag: sheet.cell_truthy(row, COL_OVERRIDE),
            };
            entries.insert(name, entry);
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stub record for a language known only by name. The extractor calls
    /// this when a sheet's code is absent from the record store.
    pub fn stub_record(&self, name: &str) -> Option<LanguageRecord> {
        self.get(name).map(RegistryEntry::to_record)
    }
}
