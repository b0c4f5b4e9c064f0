//! Core types for the language repository
//!
//! The central entity is [`LanguageRecord`], one per language code, held in
//! the [`RecordStore`] that every pipeline stage reads or enriches. All
//! record fields are fixed-shape structs so that the merge-precedence rules
//! (geometry-derived fields win over sheet drafts) are visible in the types
//! rather than buried in map-merge order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Normalized uppercase language code (e.g. "N151")
pub type LanguageCode = String;

/// Canonical form of a language code: trimmed and uppercased.
pub fn normalize_code(raw: &str) -> LanguageCode {
    raw.trim().to_uppercase()
}

/// Which registry a record's geography came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
    Gambay,
    Austlang,
}

/// GeoJSON geometry. Coordinates stay as raw JSON so non-point community
/// geometries pass through untouched; synthetic registry records are always
/// points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: serde_json::Value,
}

impl Geometry {
    /// Point geometry from registry coordinates. GeoJSON order is [lng, lat].
    pub fn point(lng: f64, lat: f64) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: serde_json::json!([lng, lat]),
        }
    }
}

/// Media references for one item, before and after the build stage.
///
/// Pre-build an item carries at most one of `audio_file`/`video_file` (a
/// local source path). The builder replaces the reference with `audio`/
/// `video`, a list of dist-root-relative output paths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<Vec<String>>,
}

impl MediaSource {
    pub fn audio_ref(path: PathBuf) -> Self {
        Self {
            audio_file: Some(path),
            ..Default::default()
        }
    }

    pub fn video_ref(path: PathBuf) -> Self {
        Self {
            video_file: Some(path),
            ..Default::default()
        }
    }

    /// True when the item has neither a source reference nor built outputs.
    pub fn is_empty(&self) -> bool {
        self.audio_file.is_none()
            && self.video_file.is_none()
            && self.audio.is_none()
            && self.video.is_none()
    }
}

/// A named media item: the language name recording or the speaker recording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedMedia {
    pub name: String,
    #[serde(flatten)]
    pub media: MediaSource,
}

/// Back-reference from an indexed word to its owning language.
///
/// A non-owning cross-reference: the word index holds copies of words, not
/// the records themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordLanguageRef {
    pub code: LanguageCode,
    pub name: String,
}

/// One word from a word-list sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordEntry {
    pub english: String,
    pub indigenous: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub english_alternate: Option<String>,
    #[serde(flatten)]
    pub media: MediaSource,
    /// Set only on copies pushed into the global word index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<WordLanguageRef>,
}

/// Properties of a language record.
///
/// `code`, `name` and `source` are fixed at reconciliation time; the
/// remaining fields are filled by the extractor and rewritten by the
/// builder. The extractor only ever fills fields that are `None`, so
/// geometry-derived data always wins on collision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordProperties {
    pub code: LanguageCode,
    pub name: String,
    pub source: Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<NamedMedia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<NamedMedia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<WordEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thankyou: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_received: Option<String>,
}

impl RecordProperties {
    pub fn new(code: LanguageCode, name: impl Into<String>, source: Source) -> Self {
        Self {
            code,
            name: name.into(),
            source,
            selected: None,
            language: None,
            speaker: None,
            words: None,
            thankyou: None,
            date_received: None,
        }
    }
}

/// The central entity: one merged record per language code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageRecord {
    #[serde(rename = "type")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: RecordProperties,
}

impl LanguageRecord {
    pub fn new(geometry: Geometry, properties: RecordProperties) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry,
            properties,
        }
    }

    pub fn code(&self) -> &str {
        &self.properties.code
    }
}

/// In-memory table of merged language records, keyed by normalized code.
///
/// BTreeMap so every downstream pass (build, master indices) runs in a
/// stable order.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: BTreeMap<LanguageCode, LanguageRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record for `code`. Last writer wins; the
    /// reconciliation step order is the precedence rule.
    pub fn insert(&mut self, code: LanguageCode, record: LanguageRecord) {
        self.records.insert(code, record);
    }

    pub fn get(&self, code: &str) -> Option<&LanguageRecord> {
        self.records.get(code)
    }

    pub fn get_mut(&mut self, code: &str) -> Option<&mut LanguageRecord> {
        self.records.get_mut(code)
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.records.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LanguageCode, &LanguageRecord)> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&LanguageCode, &mut LanguageRecord)> {
        self.records.iter_mut()
    }

    pub fn values(&self) -> impl Iterator<Item = &LanguageRecord> {
        self.records.values()
    }
}
