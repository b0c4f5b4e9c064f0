//! Master index files at the top of the repository tree
//!
//! Four artifacts summarize a run: `languages.json` (every record, with the
//! word list collapsed to a has-words flag), the per-gloss shard files plus
//! their `words.json` directory, `errors.json` (the full issue log), and
//! `gambay-additions.json` (fields injected from the registry).

use super::words::{shard_name, WordIndex};
use super::{RepositoryError, REPOSITORY_DIR};
use crate::geography::GambayAddition;
use crate::issue::IssueLog;
use crate::types::RecordStore;
use chrono::Utc;
use serde_json::json;
use std::fs;
use std::path::Path;
use tracing::info;

/// Timestamp written into the audit indices.
const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn write_master_indices(
    dist_dir: &Path,
    store: &RecordStore,
    index: &WordIndex,
    issues: &IssueLog,
    additions: &[GambayAddition],
) -> Result<(), RepositoryError> {
    let repo = dist_dir.join(REPOSITORY_DIR);
    fs::create_dir_all(&repo).map_err(|e| RepositoryError::io(&repo, e))?;

    write_languages(&repo, store)?;
    write_words(&repo, index)?;

    let date = Utc::now().format(DATE_FORMAT).to_string();
    write_json(
        &repo.join("errors.json"),
        &json!({ "date": date, "errors": issues.as_slice() }),
    )?;
    write_json(
        &repo.join("gambay-additions.json"),
        &json!({ "date": date, "additions": additions }),
    )?;

    info!(
        "Wrote master indices: {} languages, {} words, {} issues, {} additions",
        store.len(),
        index.len(),
        issues.len(),
        additions.len()
    );
    Ok(())
}

/// `languages.json`: every record, `properties.words` collapsed to a bool
/// so the file stays small enough to serve as the map's initial payload.
fn write_languages(repo: &Path, store: &RecordStore) -> Result<(), RepositoryError> {
    let mut languages = Vec::with_capacity(store.len());
    for record in store.values() {
        let mut value = serde_json::to_value(record)?;
        let has_words = value["properties"].get("words").is_some();
        value["properties"]["words"] = serde_json::Value::Bool(has_words);
        languages.push(value);
    }
    write_json(&repo.join("languages.json"), &json!({ "languages": languages }))
}

/// One shard file per gloss, plus the `words.json` directory mapping each
/// gloss to its shard file name.
fn write_words(repo: &Path, index: &WordIndex) -> Result<(), RepositoryError> {
    let mut words = Vec::with_capacity(index.len());
    for (gloss, entries) in index.iter() {
        let shard = shard_name(gloss);
        write_json(&repo.join(&shard), entries)?;
        words.push(json!({ "name": gloss, "index": shard }));
    }
    write_json(&repo.join("words.json"), &json!({ "words": words }))
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), RepositoryError> {
    let raw = serde_json::to_string_pretty(value)?;
    fs::write(path, raw).map_err(|e| RepositoryError::io(path, e))
}
